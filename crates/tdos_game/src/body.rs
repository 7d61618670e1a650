use glam::Vec2;

use crate::collision::Rect;

/// Position, size and velocity of one moving sprite.
///
/// Integration only proposes a displacement; the tile collider decides how
/// much of it the body actually gets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Top-left corner in world pixels, y grows downward.
    pub position: Vec2,
    pub size: Vec2,
    /// Pixels per millisecond.
    pub velocity: Vec2,
    /// False while the body should pass through tiles (a dying player).
    pub collidable: bool,
}

impl Body {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            velocity: Vec2::ZERO,
            collidable: true,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        self.rect().overlaps(&other.rect())
    }

    /// Accumulate gravity and return the displacement proposed for this frame.
    pub fn integrate(&mut self, gravity: f32, max_fall_speed: f32, dt_ms: f32) -> Vec2 {
        self.velocity.y = (self.velocity.y + gravity * dt_ms).min(max_fall_speed);
        self.velocity * dt_ms
    }
}
