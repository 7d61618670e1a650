//! Keyboard state fed by the host engine and polled by the game each frame.
//!
//! - **Level-triggered (held):** `is_held(key)` is true every frame the key is
//!   down. Movement and jumping poll this, so holding Up keeps re-jumping as
//!   soon as the player lands.
//!
//! - **Edge-triggered (just_pressed):** true only during the frame the key
//!   went down, cleared by `end_frame()`. Escape uses this, so a quit fires
//!   once per press.

use std::collections::HashSet;

/// Logical keys the game reacts to. The host maps its device codes onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Escape,
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Press or release `key` so that it ends up in the requested state.
    pub fn set_key(&mut self, key: Key, down: bool) {
        if down {
            self.key_down(key);
        } else {
            self.key_up(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
