//! Contract with the host 2D engine.
//!
//! The simulation never draws, decodes images or polls devices. It asks the
//! host for textures and sprites through [`Engine`], reads keys through
//! [`KeySource`], and hands over the camera offset and HUD values once per
//! painted frame.

use std::collections::HashMap;

use glam::Vec2;
use serde::Deserialize;

use tdos_core::counter::CappedCounter;
use tdos_core::input::{InputState, Key};

use crate::collision::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId(pub u32);

/// A texture atlas the host should load, split into equal frames.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TextureSpec {
    pub name: String,
    pub path: String,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl TextureSpec {
    pub fn new(name: &str, path: &str, frame_width: u32, frame_height: u32) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            frame_width,
            frame_height,
        }
    }
}

/// What the host reports back about a loaded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub frame_width: u32,
    pub frame_height: u32,
}

impl TextureInfo {
    /// World size of one frame drawn at `scale`.
    pub fn sprite_size(&self, scale: f32) -> Vec2 {
        Vec2::new(self.frame_width as f32, self.frame_height as f32) * scale
    }
}

/// Values the host draws on top of the level.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Hud {
    pub score: u64,
    pub lives: CappedCounter,
    pub health: CappedCounter,
    pub fps: f32,
}

pub trait KeySource {
    fn is_key_down(&self, key: Key) -> bool;

    /// True only on the frame `key` went down. Sources without edge
    /// tracking report held keys.
    fn is_key_pressed(&self, key: Key) -> bool {
        self.is_key_down(key)
    }
}

impl KeySource for InputState {
    fn is_key_down(&self, key: Key) -> bool {
        self.is_held(key)
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.is_just_pressed(key)
    }
}

pub trait Engine {
    fn load_texture(&mut self, spec: &TextureSpec) -> Result<TextureInfo, String>;

    /// `rect` is in world coordinates; the host applies the camera offset.
    fn create_sprite(&mut self, texture: &str, rect: Rect, frame: usize) -> SpriteId;

    fn set_sprite_position(&mut self, sprite: SpriteId, position: Vec2);

    fn set_sprite_frame(&mut self, sprite: SpriteId, frame: usize);

    fn remove_sprite(&mut self, sprite: SpriteId);

    /// False once the host window has been closed.
    fn is_open(&self) -> bool {
        true
    }

    fn paint(&mut self, camera_offset: Vec2, hud: &Hud);
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteRecord {
    pub texture: String,
    pub rect: Rect,
    pub frame: usize,
}

/// An [`Engine`] that keeps everything in memory. Drives headless runs and tests.
#[derive(Debug)]
pub struct HeadlessEngine {
    textures: HashMap<String, TextureInfo>,
    sprites: HashMap<SpriteId, SpriteRecord>,
    next_sprite: u32,
    paint_count: u64,
    last_camera: Vec2,
    last_hud: Hud,
    open: bool,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            sprites: HashMap::new(),
            next_sprite: 0,
            paint_count: 0,
            last_camera: Vec2::ZERO,
            last_hud: Hud::default(),
            open: true,
        }
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&SpriteRecord> {
        self.sprites.get(&id)
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn has_texture(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }

    pub fn paint_count(&self) -> u64 {
        self.paint_count
    }

    pub fn last_camera(&self) -> Vec2 {
        self.last_camera
    }

    pub fn last_hud(&self) -> &Hud {
        &self.last_hud
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for HeadlessEngine {
    fn load_texture(&mut self, spec: &TextureSpec) -> Result<TextureInfo, String> {
        if spec.frame_width == 0 || spec.frame_height == 0 {
            return Err(format!(
                "Texture '{}' ({}) has a zero frame size",
                spec.name, spec.path
            ));
        }
        let info = TextureInfo {
            frame_width: spec.frame_width,
            frame_height: spec.frame_height,
        };
        self.textures.insert(spec.name.clone(), info);
        log::debug!("Registered texture '{}' from {}", spec.name, spec.path);
        Ok(info)
    }

    fn create_sprite(&mut self, texture: &str, rect: Rect, frame: usize) -> SpriteId {
        let id = SpriteId(self.next_sprite);
        self.next_sprite += 1;
        self.sprites.insert(
            id,
            SpriteRecord {
                texture: texture.to_string(),
                rect,
                frame,
            },
        );
        id
    }

    fn set_sprite_position(&mut self, sprite: SpriteId, position: Vec2) {
        if let Some(record) = self.sprites.get_mut(&sprite) {
            record.rect.x = position.x;
            record.rect.y = position.y;
        }
    }

    fn set_sprite_frame(&mut self, sprite: SpriteId, frame: usize) {
        if let Some(record) = self.sprites.get_mut(&sprite) {
            record.frame = frame;
        }
    }

    fn remove_sprite(&mut self, sprite: SpriteId) {
        self.sprites.remove(&sprite);
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn paint(&mut self, camera_offset: Vec2, hud: &Hud) {
        self.paint_count += 1;
        self.last_camera = camera_offset;
        self.last_hud = *hud;
    }
}
