//! Tile collision: the level's solid rectangles and the resolver that fits a
//! body's proposed motion between them.
//!
//! Resolution is **axis-sequenced**: the horizontal component is resolved
//! against every boundary and committed first, then the vertical component
//! is resolved from the corrected position. Resolving both axes at once makes
//! corner hits ambiguous (was it the wall or the floor?); sequencing gives a
//! single answer and lets bodies slide along surfaces.
//!
//! Boundaries are tested in load order and the first one that blocks an axis
//! wins. Overlapping boundaries can therefore resolve differently depending on
//! the order the level declared them in.

use glam::Vec2;

use crate::body::Body;
use crate::config::PhysicsConfig;

/// Axis-aligned rectangle, top-left origin, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(position: Vec2, size: Vec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    pub fn grown(&self, amount: f32) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.w + 2.0 * amount,
            self.h + 2.0 * amount,
        )
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Which faces of the body were blocked during one resolved move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitSides {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl HitSides {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }
}

#[derive(Debug, Clone)]
pub struct TileCollider {
    boundaries: Vec<Rect>,
    level_size: Vec2,
    round_positions: bool,
}

impl TileCollider {
    pub fn new(level_size: Vec2, round_positions: bool) -> Self {
        Self {
            boundaries: Vec::new(),
            level_size,
            round_positions,
        }
    }

    pub fn add_boundary(&mut self, rect: Rect) {
        self.boundaries.push(rect);
    }

    pub fn boundaries(&self) -> &[Rect] {
        &self.boundaries
    }

    pub fn level_size(&self) -> Vec2 {
        self.level_size
    }

    pub fn overlaps_any(&self, rect: &Rect) -> bool {
        self.boundaries.iter().any(|b| rect.overlaps(b))
    }

    /// Apply gravity to `body`, then resolve the resulting displacement.
    pub fn step(&self, body: &mut Body, physics: &PhysicsConfig, dt_ms: f32) -> HitSides {
        let displacement = body.integrate(physics.gravity, physics.max_fall_speed, dt_ms);
        self.resolve(body, displacement)
    }

    /// Move `body` by as much of `displacement` as the level allows, zeroing
    /// velocity on every blocked axis.
    pub fn resolve(&self, body: &mut Body, displacement: Vec2) -> HitSides {
        let mut hits = HitSides::default();
        let mut dx = displacement.x;
        let mut dy = displacement.y;

        // World edges apply even to non-collidable bodies.
        let start = body.rect();
        if start.x + dx < 0.0 {
            hits.left = true;
            body.velocity.x = 0.0;
            dx = 0.0;
        }
        if start.right() + dx > self.level_size.x {
            hits.right = true;
            body.velocity.x = 0.0;
            dx = 0.0;
        }

        if !body.collidable {
            body.position += Vec2::new(dx, dy);
            return hits;
        }

        let size = body.size;
        let mut position = body.position;

        for boundary in &self.boundaries {
            if dx == 0.0 {
                break;
            }
            let current = Rect::from_pos_size(position, size);
            if !current.translated(dx, 0.0).overlaps(boundary) {
                continue;
            }
            // Running into something no taller than a tile: climb it if the
            // spot one boundary-height up is free.
            let lifted = current.translated(dx, -boundary.h);
            if !self.overlaps_any(&lifted) {
                position.y -= boundary.h;
                dy = dy.min(0.0);
                continue;
            }
            if dx < 0.0 {
                position.x = boundary.right();
                hits.left = true;
            } else {
                position.x = boundary.x - size.x;
                hits.right = true;
            }
            body.velocity.x = 0.0;
            dx = 0.0;
        }
        position.x += dx;

        for boundary in &self.boundaries {
            if dy == 0.0 {
                break;
            }
            let current = Rect::from_pos_size(position, size);
            if !current.translated(0.0, dy).overlaps(boundary) {
                continue;
            }
            if dy < 0.0 {
                position.y = boundary.bottom();
                hits.top = true;
            } else {
                position.y = boundary.y - size.y;
                hits.bottom = true;
            }
            body.velocity.y = 0.0;
            dy = 0.0;
        }
        position.y += dy;

        if self.round_positions {
            position = position.round();
        }
        body.position = position;
        hits
    }
}
