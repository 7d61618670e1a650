//! State-keyed sprite animation.
//!
//! An [`AnimationTable`] maps an entity's discrete state (for example facing
//! plus motion) to a frame sequence. An [`Animator`] walks that sequence on the
//! game clock: it advances when the current frame's duration has elapsed, and
//! immediately whenever the state changes so transitions never wait on a stale
//! timer. A state with no table entry leaves the last frame on screen.

use serde::Deserialize;
use std::collections::HashMap;
use std::hash::Hash;

/// The frame counter wraps here so it never overflows on long runs.
pub const FRAME_COUNTER_WRAP: u32 = 1000;

/// An ordered list of sprite-sheet frame indices sharing one per-frame duration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Animation {
    pub frames: Vec<usize>,
    pub duration_ms: u32,
}

impl Animation {
    pub fn new(frames: &[usize], duration_ms: u32) -> Self {
        Self {
            frames: frames.to_vec(),
            duration_ms,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct AnimationTable<S> {
    animations: HashMap<S, Animation>,
}

impl<S: Copy + Eq + Hash + std::fmt::Debug> AnimationTable<S> {
    pub fn new() -> Self {
        Self {
            animations: HashMap::new(),
        }
    }

    pub fn with(mut self, state: S, animation: Animation) -> Self {
        self.insert(state, animation);
        self
    }

    pub fn insert(&mut self, state: S, animation: Animation) {
        self.animations.insert(state, animation);
    }

    pub fn get(&self, state: S) -> Option<&Animation> {
        self.animations.get(&state)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn validate(&self) -> Result<(), String> {
        for (state, animation) in &self.animations {
            if animation.frames.is_empty() {
                return Err(format!(
                    "Animation validation failed: state {:?} has no frames",
                    state
                ));
            }
            if animation.duration_ms == 0 {
                return Err(format!(
                    "Animation validation failed: state {:?} has zero duration",
                    state
                ));
            }
        }
        Ok(())
    }
}

impl<S: Copy + Eq + Hash + std::fmt::Debug> Default for AnimationTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runtime playback state for one sprite.
#[derive(Debug, Clone)]
pub struct Animator<S> {
    last_state: Option<S>,
    next_frame_ms: f64,
    frame_counter: u32,
    frame: Option<usize>,
}

impl<S: Copy + Eq + Hash + std::fmt::Debug> Animator<S> {
    pub fn new() -> Self {
        Self {
            last_state: None,
            next_frame_ms: 0.0,
            frame_counter: 0,
            frame: None,
        }
    }

    /// The frame most recently selected, if any state has matched yet.
    pub fn frame(&self) -> Option<usize> {
        self.frame
    }

    pub fn frame_counter(&self) -> u32 {
        self.frame_counter
    }

    /// Advance playback at game time `now_ms`. Returns the newly selected
    /// frame when one was set this call.
    pub fn tick(&mut self, now_ms: f64, state: S, table: &AnimationTable<S>) -> Option<usize> {
        if now_ms <= self.next_frame_ms && self.last_state == Some(state) {
            return None;
        }

        let mut selected = None;
        if let Some(animation) = table.get(state) {
            if !animation.is_empty() {
                let index = self.frame_counter as usize % animation.len();
                let frame = animation.frames[index];
                self.frame = Some(frame);
                self.next_frame_ms = now_ms + animation.duration_ms as f64;
                selected = Some(frame);
            }
        }
        self.frame_counter = (self.frame_counter + 1) % FRAME_COUNTER_WRAP;
        self.last_state = Some(state);
        selected
    }
}

impl<S: Copy + Eq + Hash + std::fmt::Debug> Default for Animator<S> {
    fn default() -> Self {
        Self::new()
    }
}
