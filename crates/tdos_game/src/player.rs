//! The player's movement state machine.
//!
//! `Player` only decides velocities and pose. Whether a move is legal is the
//! collider's call, and health, lives and score belong to `GameState`.

use glam::Vec2;

use tdos_core::animation::{AnimationTable, Animator};

use crate::body::Body;
use crate::collision::HitSides;
use crate::config::PlayerConfig;
use crate::engine::SpriteId;
use crate::pose::{Facing, Motion, PlayerState};

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub state: PlayerState,
    pub animator: Animator<PlayerState>,
    pub sprite: Option<SpriteId>,
    spawn: Vec2,
    invincible_until: Option<f64>,
    tuning: PlayerConfig,
}

impl Player {
    /// `spawn` is the body's top-left corner at (re)spawn.
    pub fn new(spawn: Vec2, size: Vec2, tuning: PlayerConfig) -> Self {
        Self {
            body: Body::new(spawn, size),
            state: PlayerState::default(),
            animator: Animator::new(),
            sprite: None,
            spawn,
            invincible_until: None,
            tuning,
        }
    }

    pub fn spawn_point(&self) -> Vec2 {
        self.spawn
    }

    pub fn is_jumping(&self) -> bool {
        self.state.motion == Motion::Jumping
    }

    /// A dying player falls through the level and ignores input.
    pub fn is_dying(&self) -> bool {
        !self.body.collidable
    }

    /// Only downward speed counts; walking off a ledge onto a creature kills it too.
    pub fn is_kill_shot(&self) -> bool {
        self.body.velocity.y > self.tuning.kill_shot_speed
    }

    pub fn is_invincible(&self, now_ms: f64) -> bool {
        self.invincible_until.is_some_and(|until| now_ms <= until)
    }

    pub fn start_invincibility(&mut self, now_ms: f64) {
        self.invincible_until = Some(now_ms + f64::from(self.tuning.invincible_ms));
    }

    pub fn jump(&mut self) {
        if self.is_jumping() {
            return;
        }
        self.body.velocity.y = -self.tuning.jump_speed;
        self.state.motion = Motion::Jumping;
    }

    pub fn left(&mut self, dt_ms: f32) {
        let t = &self.tuning;
        let vx = self.body.velocity.x - t.acceleration * dt_ms;
        self.body.velocity.x = vx.clamp(-t.run_speed, -t.walk_speed);
        self.state.facing = Facing::Left;
        self.walk();
    }

    pub fn right(&mut self, dt_ms: f32) {
        let t = &self.tuning;
        let vx = self.body.velocity.x + t.acceleration * dt_ms;
        self.body.velocity.x = vx.clamp(t.walk_speed, t.run_speed);
        self.state.facing = Facing::Right;
        self.walk();
    }

    /// Decelerate toward standing still.
    pub fn slow(&mut self, dt_ms: f32) {
        let step = self.tuning.deceleration * dt_ms;
        let vx = self.body.velocity.x;
        if vx.abs() <= step {
            self.body.velocity.x = 0.0;
            if !self.is_jumping() {
                self.state.motion = Motion::Stopped;
            }
        } else {
            self.body.velocity.x = vx - step * vx.signum();
        }
    }

    /// Knock-back after touching a creature without killing it.
    pub fn rebound(&mut self, creature: &Body) {
        let t = &self.tuning;
        self.body.velocity.x = if creature.position.x >= self.body.position.x {
            -t.run_speed
        } else {
            t.run_speed
        };
        self.body.velocity.y = if creature.position.y >= self.body.position.y {
            -t.jump_speed
        } else {
            t.jump_speed
        };
        self.state.motion = Motion::Jumping;
    }

    /// Spring off a creature that was just stomped.
    pub fn bounce(&mut self, creature: &Body) {
        let t = &self.tuning;
        if creature.position.y >= self.body.position.y {
            self.body.velocity.y = -t.jump_speed;
            self.body.position.y -= t.bounce_clearance;
        } else {
            self.body.velocity.y = t.jump_speed;
            self.body.position.y += t.bounce_clearance;
        }
        self.body.velocity.x = 0.0;
        self.state.motion = Motion::Jumping;
    }

    pub fn die(&mut self) {
        self.body.collidable = false;
        self.body.velocity = Vec2::new(0.0, -self.tuning.jump_speed);
    }

    pub fn respawn(&mut self) {
        self.body.collidable = true;
        self.body.velocity = Vec2::ZERO;
        self.body.position = self.spawn;
        self.state.motion = Motion::Stopped;
    }

    /// React to the frame's collision result and advance the animation.
    /// Returns the sprite frame to show when it changed.
    pub fn update(
        &mut self,
        hits: HitSides,
        now_ms: f64,
        animations: &AnimationTable<PlayerState>,
    ) -> Option<usize> {
        if hits.bottom && self.is_jumping() {
            self.state.motion = if self.body.velocity.x != 0.0 {
                Motion::Walking
            } else {
                Motion::Stopped
            };
        }
        if self.invincible_until.is_some_and(|until| now_ms > until) {
            self.invincible_until = None;
        }
        self.animator.tick(now_ms, self.state, animations)
    }

    fn walk(&mut self) {
        if !self.is_jumping() {
            self.state.motion = Motion::Walking;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerAnimations;

    fn player() -> Player {
        Player::new(
            Vec2::new(64.0, 32.0),
            Vec2::new(32.0, 64.0),
            PlayerConfig::default(),
        )
    }

    fn creature_at(x: f32, y: f32) -> Body {
        Body::new(Vec2::new(x, y), Vec2::new(32.0, 32.0))
    }

    #[test]
    fn jump_only_from_the_ground() {
        let mut p = player();
        p.jump();
        assert_eq!(p.body.velocity.y, -1.2);
        assert!(p.is_jumping());

        p.body.velocity.y = 0.3;
        p.jump();
        assert_eq!(p.body.velocity.y, 0.3, "no double jump");
    }

    #[test]
    fn walking_starts_at_walk_speed_and_caps_at_run_speed() {
        let mut p = player();
        p.right(16.0);
        assert_eq!(p.body.velocity.x, 0.03);
        assert_eq!(p.state, PlayerState::new(Facing::Right, Motion::Walking));

        for _ in 0..100 {
            p.right(16.0);
        }
        assert_eq!(p.body.velocity.x, 0.6);

        p.left(16.0);
        assert_eq!(p.body.velocity.x, -0.03, "reversing drops straight to walk speed");
        assert_eq!(p.state.facing, Facing::Left);
    }

    #[test]
    fn steering_in_the_air_keeps_the_jump_pose() {
        let mut p = player();
        p.jump();
        p.left(16.0);
        assert_eq!(p.state, PlayerState::new(Facing::Left, Motion::Jumping));
        p.slow(16.0);
        assert_eq!(p.state.motion, Motion::Jumping);
    }

    #[test]
    fn slow_decelerates_then_stops() {
        let mut p = player();
        p.body.velocity.x = 0.1;
        p.state.motion = Motion::Walking;
        p.slow(16.0);
        assert!((p.body.velocity.x - 0.084).abs() < 1e-6);
        assert_eq!(p.state.motion, Motion::Walking);

        p.body.velocity.x = -0.01;
        p.slow(16.0);
        assert_eq!(p.body.velocity.x, 0.0);
        assert_eq!(p.state.motion, Motion::Stopped);
    }

    #[test]
    fn landing_picks_pose_from_horizontal_speed() {
        let table = PlayerAnimations::default().to_table();
        let ground = HitSides {
            bottom: true,
            ..HitSides::default()
        };

        let mut p = player();
        p.jump();
        p.update(ground, 0.0, &table);
        assert_eq!(p.state.motion, Motion::Stopped);

        p.jump();
        p.body.velocity.x = 0.2;
        p.update(ground, 16.0, &table);
        assert_eq!(p.state.motion, Motion::Walking);
    }

    #[test]
    fn rebound_pushes_away_from_creature() {
        let mut p = player();
        p.rebound(&creature_at(80.0, 64.0));
        assert_eq!(p.body.velocity, Vec2::new(-0.6, -1.2));
        assert!(p.is_jumping());

        p.rebound(&creature_at(10.0, 0.0));
        assert_eq!(p.body.velocity, Vec2::new(0.6, 1.2));
    }

    #[test]
    fn bounce_clears_the_overlap() {
        let mut p = player();
        p.body.velocity = Vec2::new(0.3, 0.5);
        p.bounce(&creature_at(64.0, 90.0));
        assert_eq!(p.body.velocity, Vec2::new(0.0, -1.2));
        assert_eq!(p.body.position.y, 30.0);
        assert!(p.is_jumping());
    }

    #[test]
    fn kill_shot_needs_downward_speed() {
        let mut p = player();
        p.body.velocity.y = 0.1;
        assert!(!p.is_kill_shot());
        p.body.velocity.y = 0.11;
        assert!(p.is_kill_shot());
        p.body.velocity.y = -1.0;
        assert!(!p.is_kill_shot());
    }

    #[test]
    fn invincibility_expires_after_window() {
        let table = PlayerAnimations::default().to_table();
        let mut p = player();
        assert!(!p.is_invincible(0.0));
        p.start_invincibility(1000.0);
        assert!(p.is_invincible(1100.0));
        assert!(p.is_invincible(1200.0));
        p.update(HitSides::default(), 1201.0, &table);
        assert!(!p.is_invincible(1201.0));
    }

    #[test]
    fn die_then_respawn_restores_the_anchor() {
        let mut p = player();
        p.body.position = Vec2::new(500.0, 900.0);
        p.die();
        assert!(p.is_dying());
        assert_eq!(p.body.velocity, Vec2::new(0.0, -1.2));

        p.respawn();
        assert!(!p.is_dying());
        assert_eq!(p.body.position, Vec2::new(64.0, 32.0));
        assert_eq!(p.body.velocity, Vec2::ZERO);
        assert_eq!(p.state.motion, Motion::Stopped);
    }

    #[test]
    fn animation_follows_state_changes() {
        let table = PlayerAnimations::default().to_table();
        let mut p = player();
        assert_eq!(p.update(HitSides::default(), 0.0, &table), Some(0));
        assert_eq!(p.update(HitSides::default(), 10.0, &table), None);
        p.left(16.0);
        assert_eq!(p.update(HitSides::default(), 20.0, &table), Some(5));
    }
}
