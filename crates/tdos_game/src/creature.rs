//! Patrolling creatures and the mushrooms that launch smaller ones.

use glam::Vec2;
use rand::Rng;

use tdos_core::animation::{AnimationTable, Animator};

use crate::body::Body;
use crate::collision::HitSides;
use crate::config::{CreatureConfig, CreatureKindConfig};
use crate::engine::SpriteId;
use crate::pose::Facing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreatureKind {
    /// Placed by the level; periodically launches small mushrooms.
    Mushroom,
    SmallMushroom,
}

/// Everything needed to spawn one kind of creature, resolved at init.
#[derive(Debug, Clone)]
pub struct Archetype {
    pub kind: CreatureKind,
    pub texture: String,
    pub size: Vec2,
    pub speed: f32,
    pub launch_speed: f32,
    pub points: u64,
    pub animations: AnimationTable<Facing>,
}

impl Archetype {
    pub fn from_config(kind: CreatureKind, config: &CreatureKindConfig, size: Vec2) -> Self {
        Self {
            kind,
            texture: config.texture.clone(),
            size,
            speed: config.speed,
            launch_speed: config.launch_speed,
            points: config.points,
            animations: config.animations.to_table(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Creature {
    pub body: Body,
    pub kind: CreatureKind,
    pub facing: Facing,
    pub speed: f32,
    pub launch_speed: f32,
    pub points: u64,
    pub animator: Animator<Facing>,
    pub sprite: Option<SpriteId>,
    last_spawn_ms: f64,
}

impl Creature {
    /// A creature standing on `foot` (its bottom-left corner), walking left.
    pub fn spawn(archetype: &Archetype, foot: Vec2, now_ms: f64) -> Self {
        let mut body = Body::new(
            Vec2::new(foot.x, foot.y - archetype.size.y),
            archetype.size,
        );
        body.velocity.x = -archetype.speed;
        Self {
            body,
            kind: archetype.kind,
            facing: Facing::Left,
            speed: archetype.speed,
            launch_speed: archetype.launch_speed,
            points: archetype.points,
            animator: Animator::new(),
            sprite: None,
            last_spawn_ms: now_ms,
        }
    }

    /// Turn around at walls, then ease horizontal speed back toward the patrol
    /// speed (launched creatures start faster or slower than they walk).
    pub fn update(
        &mut self,
        hits: HitSides,
        now_ms: f64,
        animations: &AnimationTable<Facing>,
        damping_divisor: f32,
    ) -> Option<usize> {
        if hits.right {
            self.facing = Facing::Left;
            self.body.velocity.x = -self.speed;
        } else if hits.left {
            self.facing = Facing::Right;
            self.body.velocity.x = self.speed;
        }

        let vx = self.body.velocity.x;
        let diff = vx.abs() - self.speed;
        if diff != 0.0 {
            let damp = diff / damping_divisor;
            self.body.velocity.x = if vx > 0.0 { vx - damp } else { vx + damp };
        }

        self.animator.tick(now_ms, self.facing, animations)
    }

    /// Mushrooms past their cooldown may launch a small mushroom from their head.
    pub fn try_spawn(
        &mut self,
        now_ms: f64,
        small: &Archetype,
        config: &CreatureConfig,
        rng: &mut impl Rng,
    ) -> Option<Creature> {
        if self.kind != CreatureKind::Mushroom {
            return None;
        }
        if now_ms <= self.last_spawn_ms + f64::from(config.spawn_interval_ms) {
            return None;
        }
        if rng.gen::<f32>() >= config.spawn_chance {
            return None;
        }

        let mut child = Creature::spawn(small, self.body.position, now_ms);
        child.body.velocity.x *= rng.gen_range(0.0..2.0f32);
        if rng.gen_bool(0.5) {
            child.body.velocity.x = -child.body.velocity.x;
        }
        child.body.velocity.y = -child.launch_speed;
        self.last_spawn_ms = now_ms;
        Some(child)
    }
}
