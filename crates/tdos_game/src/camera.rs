//! Viewport offset that follows the player through the level.
//!
//! The offset is what the renderer adds to world coordinates, so it runs
//! from `0` (level's top-left corner on screen) down to
//! `-(level_extent - viewport_extent)` on each axis.

use glam::Vec2;

use crate::collision::Rect;
use crate::config::CameraConfig;

#[derive(Debug, Clone)]
pub struct Camera {
    offset: Vec2,
    viewport: Vec2,
    level_size: Vec2,
    config: CameraConfig,
}

impl Camera {
    pub fn new(config: CameraConfig, level_size: Vec2) -> Self {
        Self {
            offset: Vec2::ZERO,
            viewport: Vec2::new(config.viewport_width, config.viewport_height),
            level_size,
            config,
        }
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Lowest allowed offset per axis. The upper bound is always zero.
    pub fn min_offset(&self) -> Vec2 {
        (self.viewport - self.level_size).min(Vec2::ZERO)
    }

    /// Offset that centres `rect` on screen, clamped to the level.
    pub fn target_for(&self, rect: &Rect) -> Vec2 {
        let raw = Vec2::new(
            -rect.x + (self.viewport.x - rect.w) / 2.0,
            -rect.y + (self.viewport.y - rect.h) / 2.0 + self.config.vertical_bias,
        );
        self.clamp(raw)
    }

    /// Move toward the offset that centres `rect`. `dt_ms == 0` snaps.
    pub fn follow(&mut self, rect: &Rect, dt_ms: f32) {
        let target = self.target_for(rect);
        if dt_ms <= 0.0 {
            self.offset = target;
            return;
        }

        let c = &self.config;
        let next = Vec2::new(
            approach(
                self.offset.x,
                target.x,
                c.horizontal_rate * dt_ms,
                c.min_step,
                c.horizontal_max_step,
                c.snap_threshold,
            ),
            approach(
                self.offset.y,
                target.y,
                c.vertical_rate * dt_ms,
                c.min_step,
                c.vertical_max_step,
                c.snap_threshold,
            ),
        );
        self.offset = if c.round_offset {
            self.clamp(next.round())
        } else {
            next
        };
    }

    pub fn snap_to(&mut self, rect: &Rect) {
        self.follow(rect, 0.0);
    }

    /// World-space area on screen, grown by `buffer` on every side.
    pub fn visible_rect(&self, buffer: f32) -> Rect {
        Rect::new(-self.offset.x, -self.offset.y, self.viewport.x, self.viewport.y).grown(buffer)
    }

    fn clamp(&self, offset: Vec2) -> Vec2 {
        let lo = self.min_offset();
        Vec2::new(
            offset.x.max(lo.x).min(0.0),
            offset.y.max(lo.y).min(0.0),
        )
    }
}

/// One damped step from `current` toward `target`.
///
/// Covers `fraction` of the remaining distance, but never less than
/// `min_step` (so the follow converges instead of creeping) and never more
/// than `max_step`. Never overshoots.
fn approach(
    current: f32,
    target: f32,
    fraction: f32,
    min_step: f32,
    max_step: f32,
    snap_threshold: f32,
) -> f32 {
    let remaining = target - current;
    let distance = remaining.abs();
    if distance < snap_threshold {
        return target;
    }
    let step = (distance * fraction.min(1.0))
        .max(min_step)
        .min(max_step)
        .min(distance);
    current + step * remaining.signum()
}
