//! Per-frame time source for the variable-step simulation loop.
//!
//! Each frame samples the elapsed wall-clock time exactly once and hands the
//! simulation a millisecond delta. The delta is capped at `max_frame_ms` so a
//! stall (debugger pause, window drag) can never push a single frame's motion
//! far enough to tunnel through tiles.

use std::time::{Duration, Instant};

const FPS_SAMPLE_COUNT: usize = 60;

pub const DEFAULT_MAX_FRAME_MS: f32 = 50.0;

pub struct FrameClock {
    pub max_frame_ms: f32,
    pub frame_count: u64,
    /// Clamped delta of the most recent frame, in milliseconds.
    pub dt_ms: f32,
    /// Sum of all clamped deltas. This is the game clock, not wall time.
    pub total_ms: f64,
    last_instant: Instant,

    fps_samples: [f32; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f32,
    pub smoothed_frame_time_ms: f32,
}

impl FrameClock {
    pub fn new(max_frame_ms: f32) -> Self {
        Self {
            max_frame_ms,
            frame_count: 0,
            dt_ms: 0.0,
            total_ms: 0.0,
            last_instant: Instant::now(),
            fps_samples: [1000.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    /// Measure the wall-clock time since the previous call and return the
    /// clamped delta in milliseconds.
    pub fn begin_frame(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_instant);
        self.last_instant = now;
        self.advance(elapsed)
    }

    /// Feed an externally measured frame duration. Replays use this to run
    /// with a fixed step independent of the host's speed.
    pub fn advance(&mut self, elapsed: Duration) -> f32 {
        let mut dt_ms = elapsed.as_secs_f32() * 1000.0;
        if dt_ms > self.max_frame_ms {
            log::warn!(
                "Frame took {:.1}ms, capping to {}ms",
                dt_ms,
                self.max_frame_ms
            );
            dt_ms = self.max_frame_ms;
        }

        self.dt_ms = dt_ms;
        self.total_ms += dt_ms as f64;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = dt_ms;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_ms: f32 = self.fps_samples.iter().sum::<f32>() / FPS_SAMPLE_COUNT as f32;
        self.smoothed_frame_time_ms = avg_ms;
        self.smoothed_fps = if avg_ms > 0.0 { 1000.0 / avg_ms } else { 0.0 };

        dt_ms
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_MS)
    }
}
