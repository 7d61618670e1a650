//! Tuning and asset configuration.
//!
//! Every section deserializes with `#[serde(default)]`, so a config file only
//! needs to name the values it overrides. `GameConfig::default()` is the
//! shipped tuning. Units: milliseconds, pixels, px/ms and px/ms².

use serde::Deserialize;
use std::fs;
use std::path::Path;

use tdos_core::animation::{Animation, AnimationTable};

use crate::engine::TextureSpec;
use crate::pose::{Facing, Motion, PlayerState};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for creature spawning. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Sprites are drawn at this multiple of their texture frame size.
    pub sprite_scale: f32,
    pub textures: Vec<TextureSpec>,
    pub physics: PhysicsConfig,
    pub camera: CameraConfig,
    pub player: PlayerConfig,
    pub creatures: CreatureConfig,
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    /// Downward speed cap. Keeps a single clamped frame shorter than a tile.
    pub max_fall_speed: f32,
    pub max_frame_ms: f32,
    pub round_positions: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Positive values shift the framing so the body sits lower on screen.
    pub vertical_bias: f32,
    /// Fraction of the remaining distance covered per millisecond.
    pub horizontal_rate: f32,
    pub vertical_rate: f32,
    pub min_step: f32,
    pub horizontal_max_step: f32,
    pub vertical_max_step: f32,
    pub snap_threshold: f32,
    pub round_offset: bool,
    /// Creatures this far outside the viewport keep simulating.
    pub visibility_buffer: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub texture: String,
    pub jump_speed: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    pub invincible_ms: u32,
    /// Downward speed above which touching a creature kills it.
    pub kill_shot_speed: f32,
    pub bounce_clearance: f32,
    pub max_health: u32,
    pub starting_lives: u32,
    pub animations: PlayerAnimations,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerAnimations {
    pub stopped_left: Animation,
    pub stopped_right: Animation,
    pub walking_left: Animation,
    pub walking_right: Animation,
    pub jumping_left: Animation,
    pub jumping_right: Animation,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CreatureConfig {
    pub mushroom: CreatureKindConfig,
    pub small_mushroom: CreatureKindConfig,
    pub spawn_interval_ms: u32,
    /// Probability per check, once the interval has passed.
    pub spawn_chance: f32,
    pub damping_divisor: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatureKindConfig {
    pub texture: String,
    pub speed: f32,
    pub launch_speed: f32,
    pub points: u64,
    #[serde(default = "default_facing_animations")]
    pub animations: FacingAnimations,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FacingAnimations {
    pub left: Animation,
    pub right: Animation,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub first_extra_life_score: u64,
    pub victory_margin: f32,
    /// How far below the level's bottom edge the player may fall before a life is lost.
    pub fall_limit: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            sprite_scale: 2.0,
            textures: vec![
                TextureSpec::new("level-textures", "assets/level-textures.png", 16, 16),
                TextureSpec::new("enemy-sm-textures", "assets/enemy-sm-textures-fw.png", 8, 8),
                TextureSpec::new("enemy-textures", "assets/enemy-textures-fw.png", 16, 16),
                TextureSpec::new("darwin-textures", "assets/darwin-textures.png", 16, 32),
            ],
            physics: PhysicsConfig::default(),
            camera: CameraConfig::default(),
            player: PlayerConfig::default(),
            creatures: CreatureConfig::default(),
            rules: RulesConfig::default(),
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.005,
            max_fall_speed: 0.9,
            max_frame_ms: 50.0,
            round_positions: false,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            vertical_bias: 0.0,
            horizontal_rate: 0.04,
            vertical_rate: 0.002,
            min_step: 1.0,
            horizontal_max_step: 400.0,
            vertical_max_step: 24.0,
            snap_threshold: 1.0,
            round_offset: true,
            visibility_buffer: 256.0,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            texture: "darwin-textures".to_string(),
            jump_speed: 1.2,
            walk_speed: 0.03,
            run_speed: 0.6,
            acceleration: 0.001,
            deceleration: 0.001,
            invincible_ms: 200,
            kill_shot_speed: 0.1,
            bounce_clearance: 2.0,
            max_health: 3,
            starting_lives: 1,
            animations: PlayerAnimations::default(),
        }
    }
}

impl Default for PlayerAnimations {
    fn default() -> Self {
        Self {
            stopped_left: Animation::new(&[4, 5], 400),
            stopped_right: Animation::new(&[0, 1], 400),
            walking_left: Animation::new(&[3, 5], 80),
            walking_right: Animation::new(&[0, 2], 80),
            jumping_left: Animation::new(&[5], 80),
            jumping_right: Animation::new(&[0], 80),
        }
    }
}

impl PlayerAnimations {
    pub fn to_table(&self) -> AnimationTable<PlayerState> {
        use Facing::{Left, Right};
        use Motion::{Jumping, Stopped, Walking};
        AnimationTable::new()
            .with(PlayerState::new(Left, Stopped), self.stopped_left.clone())
            .with(PlayerState::new(Right, Stopped), self.stopped_right.clone())
            .with(PlayerState::new(Left, Walking), self.walking_left.clone())
            .with(PlayerState::new(Right, Walking), self.walking_right.clone())
            .with(PlayerState::new(Left, Jumping), self.jumping_left.clone())
            .with(PlayerState::new(Right, Jumping), self.jumping_right.clone())
    }
}

impl Default for CreatureConfig {
    fn default() -> Self {
        Self {
            mushroom: CreatureKindConfig {
                texture: "enemy-textures".to_string(),
                speed: 0.05,
                launch_speed: 0.1,
                points: 100,
                animations: default_facing_animations(),
            },
            small_mushroom: CreatureKindConfig {
                texture: "enemy-sm-textures".to_string(),
                speed: 0.08,
                launch_speed: 0.3,
                points: 250,
                animations: default_facing_animations(),
            },
            spawn_interval_ms: 5000,
            spawn_chance: 0.05,
            damping_divisor: 10.0,
        }
    }
}

impl FacingAnimations {
    pub fn to_table(&self) -> AnimationTable<Facing> {
        AnimationTable::new()
            .with(Facing::Left, self.left.clone())
            .with(Facing::Right, self.right.clone())
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            first_extra_life_score: 400,
            victory_margin: 100.0,
            fall_limit: 1000.0,
        }
    }
}

fn default_facing_animations() -> FacingAnimations {
    FacingAnimations {
        left: Animation::new(&[0, 1], 120),
        right: Animation::new(&[2, 3], 120),
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    config.validate()?;
    Ok(config)
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.sprite_scale <= 0.0 {
            return Err("Config validation failed: sprite_scale must be > 0".to_string());
        }
        if self.physics.max_frame_ms <= 0.0 {
            return Err("Config validation failed: physics.max_frame_ms must be > 0".to_string());
        }
        if self.physics.max_fall_speed <= 0.0 {
            return Err("Config validation failed: physics.max_fall_speed must be > 0".to_string());
        }
        if self.camera.viewport_width <= 0.0 || self.camera.viewport_height <= 0.0 {
            return Err("Config validation failed: viewport size must be > 0".to_string());
        }
        if self.camera.min_step > self.camera.horizontal_max_step
            || self.camera.min_step > self.camera.vertical_max_step
        {
            return Err(
                "Config validation failed: camera.min_step exceeds a max_step ceiling".to_string(),
            );
        }
        if self.player.walk_speed > self.player.run_speed {
            return Err(
                "Config validation failed: player.walk_speed exceeds player.run_speed".to_string(),
            );
        }
        if self.player.max_health == 0 {
            return Err("Config validation failed: player.max_health must be > 0".to_string());
        }
        if self.player.starting_lives == 0 {
            return Err("Config validation failed: player.starting_lives must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.creatures.spawn_chance) {
            return Err(
                "Config validation failed: creatures.spawn_chance must be within [0, 1]"
                    .to_string(),
            );
        }
        if self.creatures.damping_divisor < 1.0 {
            return Err(
                "Config validation failed: creatures.damping_divisor must be >= 1".to_string(),
            );
        }
        if self.rules.first_extra_life_score == 0 {
            return Err(
                "Config validation failed: rules.first_extra_life_score must be > 0".to_string(),
            );
        }

        self.player.animations.to_table().validate()?;
        self.creatures.mushroom.animations.to_table().validate()?;
        self.creatures.small_mushroom.animations.to_table().validate()?;

        for name in [
            &self.player.texture,
            &self.creatures.mushroom.texture,
            &self.creatures.small_mushroom.texture,
        ] {
            if !self.textures.iter().any(|t| &t.name == name) {
                return Err(format!(
                    "Config validation failed: texture '{}' is referenced but not declared",
                    name
                ));
            }
        }
        Ok(())
    }
}
