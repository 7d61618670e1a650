//! Scripted key sequences for headless runs and regression tests.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use tdos_core::input::{InputState, Key};

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_frame_ms")]
    pub frame_ms: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub jump: bool,
    #[serde(default)]
    pub quit: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

/// Keys held during one simulated frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub quit: bool,
}

impl FrameInput {
    pub fn apply(&self, input: &mut InputState) {
        input.set_key(Key::Left, self.left);
        input.set_key(Key::Right, self.right);
        input.set_key(Key::Up, self.jump);
        input.set_key(Key::Escape, self.quit);
    }
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<FrameInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(FrameInput {
                    left: frame.left,
                    right: frame.right,
                    jump: frame.jump,
                    quit: frame.quit,
                });
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.frame_ms <= 0.0 {
        return Err("Replay validation failed: frame_ms must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_frame_ms() -> f32 {
    1000.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}
