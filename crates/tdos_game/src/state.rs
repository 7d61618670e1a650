//! The whole simulation for one run, owned by the caller.
//!
//! A frame is `check_keys` → `update` → `update_viewport` → `paint`, all
//! with the same clamped delta. `running()` turns false on quit, on losing
//! the last life and on reaching the level's right edge; the frame that
//! caused it still completes.

use std::collections::HashMap;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use tdos_core::animation::AnimationTable;
use tdos_core::counter::CappedCounter;
use tdos_core::input::Key;

use crate::camera::Camera;
use crate::collision::{Rect, TileCollider};
use crate::config::GameConfig;
use crate::creature::{Archetype, Creature, CreatureKind};
use crate::engine::{Engine, Hud, KeySource, SpriteId, TextureInfo};
use crate::error::InitError;
use crate::level::{TileKind, TileMap, TileRecord};
use crate::player::Player;
use crate::pose::PlayerState;

pub struct GameState {
    config: GameConfig,
    collider: TileCollider,
    camera: Camera,
    player: Player,
    player_animations: AnimationTable<PlayerState>,
    creatures: Vec<Creature>,
    mushroom: Archetype,
    small_mushroom: Archetype,
    health: CappedCounter,
    lives: CappedCounter,
    score: u64,
    next_life: u64,
    running: bool,
    victory: bool,
    now_ms: f64,
    fps: f32,
    rng: StdRng,
    /// Sprites of removed creatures, released on the next paint.
    retired_sprites: Vec<SpriteId>,
}

impl GameState {
    pub fn init(
        engine: &mut impl Engine,
        config: GameConfig,
        map: TileMap,
    ) -> Result<Self, InitError> {
        let level_size = map.size();
        let level_texture = map.texture.clone();
        log::info!("Loading level '{}' ({} x {} px)", map.level_id, level_size.x, level_size.y);
        Self::from_tiles(engine, config, level_size, &level_texture, map.into_tiles())
    }

    /// Build a run from any tile source. Tiles are consumed once, in order;
    /// that order is the collider's tie-break order.
    pub fn from_tiles(
        engine: &mut impl Engine,
        config: GameConfig,
        level_size: Vec2,
        level_texture: &str,
        tiles: impl IntoIterator<Item = TileRecord>,
    ) -> Result<Self, InitError> {
        if level_size.x <= 0.0 || level_size.y <= 0.0 {
            return Err(InitError::TileMap(format!(
                "level size must be positive, got {} x {}",
                level_size.x, level_size.y
            )));
        }

        let mut textures: HashMap<String, TextureInfo> = HashMap::new();
        for spec in &config.textures {
            let info = engine.load_texture(spec).map_err(InitError::Asset)?;
            textures.insert(spec.name.clone(), info);
        }
        let texture = |name: &str| {
            textures
                .get(name)
                .copied()
                .ok_or_else(|| InitError::Asset(format!("texture '{name}' is not declared")))
        };
        let scale = config.sprite_scale;
        texture(level_texture)?;
        let player_size = texture(&config.player.texture)?.sprite_size(scale);
        let mushroom = Archetype::from_config(
            CreatureKind::Mushroom,
            &config.creatures.mushroom,
            texture(&config.creatures.mushroom.texture)?.sprite_size(scale),
        );
        let small_mushroom = Archetype::from_config(
            CreatureKind::SmallMushroom,
            &config.creatures.small_mushroom,
            texture(&config.creatures.small_mushroom.texture)?.sprite_size(scale),
        );

        let mut collider = TileCollider::new(level_size, config.physics.round_positions);
        let mut creatures = Vec::new();
        let mut spawn = None;
        for tile in tiles {
            match tile.kind {
                TileKind::Start => {
                    if spawn.is_some() {
                        return Err(InitError::TileMap(format!(
                            "second start tile at ({}, {})",
                            tile.rect.x, tile.rect.y
                        )));
                    }
                    spawn = Some(Vec2::new(tile.rect.x, tile.rect.y - player_size.y));
                }
                TileKind::Floor => {}
                TileKind::Enemy => {
                    creatures.push(Creature::spawn(
                        &mushroom,
                        Vec2::new(tile.rect.x, tile.rect.y),
                        0.0,
                    ));
                }
            }
            if tile.kind.is_solid() {
                collider.add_boundary(tile.rect);
            }
            if let Some(frame) = tile.frame {
                engine.create_sprite(level_texture, tile.rect, frame);
            }
        }
        let spawn =
            spawn.ok_or_else(|| InitError::TileMap("level has no start tile".to_string()))?;

        let mut player = Player::new(spawn, player_size, config.player.clone());
        player.sprite = Some(engine.create_sprite(&config.player.texture, player.body.rect(), 0));
        for creature in &mut creatures {
            creature.sprite = Some(engine.create_sprite(&mushroom.texture, creature.body.rect(), 0));
        }

        let mut camera = Camera::new(config.camera, level_size);
        camera.snap_to(&player.body.rect());

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        log::info!(
            "Level ready: {} boundaries, {} creatures, player at ({}, {})",
            collider.boundaries().len(),
            creatures.len(),
            spawn.x,
            spawn.y
        );

        let mut state = Self {
            player_animations: config.player.animations.to_table(),
            health: CappedCounter::new(0, config.player.max_health),
            lives: CappedCounter::new(config.player.starting_lives, config.player.starting_lives),
            next_life: config.rules.first_extra_life_score,
            config,
            collider,
            camera,
            player,
            creatures,
            mushroom,
            small_mushroom,
            score: 0,
            running: true,
            victory: false,
            now_ms: 0.0,
            fps: 0.0,
            rng,
            retired_sprites: Vec::new(),
        };
        state.change_health(i64::from(state.health.max()));
        Ok(state)
    }

    pub fn check_keys(&mut self, keys: &impl KeySource, dt_ms: f32) {
        let dt_ms = self.clamp_dt(dt_ms);
        if keys.is_key_pressed(Key::Escape) && self.running {
            log::info!("Quit requested");
            self.running = false;
        }
        if self.player.is_dying() {
            return;
        }

        if keys.is_key_down(Key::Up) && !keys.is_key_down(Key::Down) {
            self.player.jump();
        }
        match (keys.is_key_down(Key::Left), keys.is_key_down(Key::Right)) {
            (true, false) => self.player.left(dt_ms),
            (false, true) => self.player.right(dt_ms),
            _ => self.player.slow(dt_ms),
        }
    }

    pub fn update(&mut self, dt_ms: f32) {
        let dt_ms = self.clamp_dt(dt_ms);
        self.now_ms += f64::from(dt_ms);
        self.fps = if dt_ms > 0.0 { 1000.0 / dt_ms } else { 0.0 };
        let now = self.now_ms;

        let visible = self.camera.visible_rect(self.config.camera.visibility_buffer);
        let physics = self.config.physics;
        let level = self.collider.level_size();
        let mut spawned = Vec::new();
        let mut i = 0;
        while i < self.creatures.len() {
            // Nothing below the level can catch a falling creature.
            if self.creatures[i].body.position.y >= level.y {
                let lost = self.creatures.remove(i);
                log::debug!("{:?} fell out of the level", lost.kind);
                self.retired_sprites.extend(lost.sprite);
                continue;
            }
            if !self.player.is_dying() && self.player.body.overlaps(&self.creatures[i].body) {
                if self.player.is_kill_shot() {
                    let dead = self.creatures.remove(i);
                    log::debug!("Stomped {:?} for {} points", dead.kind, dead.points);
                    self.retired_sprites.extend(dead.sprite);
                    self.add_score(dead.points);
                    self.player.bounce(&dead.body);
                    continue;
                }
                let mut health = self.health.available();
                if !self.player.is_invincible(now) {
                    self.player.rebound(&self.creatures[i].body);
                    health = self.change_health(-1);
                    log::debug!("Player hit, health {health}");
                }
                if health == 0 {
                    log::info!("Player is out of health");
                    self.player.die();
                }
            }

            let creature = &mut self.creatures[i];
            if creature.body.rect().overlaps(&visible) {
                let hits = self.collider.step(&mut creature.body, &physics, dt_ms);
                let archetype = match creature.kind {
                    CreatureKind::Mushroom => &self.mushroom,
                    CreatureKind::SmallMushroom => &self.small_mushroom,
                };
                creature.update(
                    hits,
                    now,
                    &archetype.animations,
                    self.config.creatures.damping_divisor,
                );
                if let Some(child) = creature.try_spawn(
                    now,
                    &self.small_mushroom,
                    &self.config.creatures,
                    &mut self.rng,
                ) {
                    log::debug!(
                        "Mushroom at ({}, {}) launched a small mushroom",
                        creature.body.position.x,
                        creature.body.position.y
                    );
                    spawned.push(child);
                }
            }
            i += 1;
        }
        self.creatures.extend(spawned);

        let hits = self.collider.step(&mut self.player.body, &physics, dt_ms);
        self.player.update(hits, now, &self.player_animations);

        let bounds = self.player.body.rect();
        if bounds.bottom() > level.y + self.config.rules.fall_limit {
            let lives = self.change_lives(-1);
            log::info!("Player fell off the map, {lives} lives left");
            if lives > 0 {
                self.change_health(i64::from(self.health.max()));
                self.player.respawn();
                self.camera.snap_to(&self.player.body.rect());
            }
        }
        if bounds.right() >= level.x - self.config.rules.victory_margin {
            log::info!("Reached the end of the level with score {}", self.score);
            self.running = false;
            self.victory = true;
        }
    }

    /// Recentre the camera on the player. A dying player is followed without
    /// damping.
    pub fn update_viewport(&mut self, dt_ms: f32) {
        let rect = self.player.body.rect();
        if self.player.is_dying() {
            self.camera.snap_to(&rect);
            return;
        }
        let dt_ms = self.clamp_dt(dt_ms);
        self.camera.follow(&rect, dt_ms);
    }

    /// Push this frame's sprite changes and HUD to the engine.
    pub fn paint(&mut self, engine: &mut impl Engine) {
        for sprite in self.retired_sprites.drain(..) {
            engine.remove_sprite(sprite);
        }

        let player = &mut self.player;
        sync_sprite(
            engine,
            &mut player.sprite,
            &self.config.player.texture,
            player.body.rect(),
            player.animator.frame(),
        );
        for creature in &mut self.creatures {
            let texture = match creature.kind {
                CreatureKind::Mushroom => &self.mushroom.texture,
                CreatureKind::SmallMushroom => &self.small_mushroom.texture,
            };
            sync_sprite(
                engine,
                &mut creature.sprite,
                texture,
                creature.body.rect(),
                creature.animator.frame(),
            );
        }

        engine.paint(self.camera.offset(), &self.hud());
    }

    /// False once the run is over or the host window has closed.
    pub fn running_in(&self, engine: &impl Engine) -> bool {
        self.running && engine.is_open()
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn victory(&self) -> bool {
        self.victory
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            lives: self.lives,
            health: self.health,
            fps: self.fps,
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn collider(&self) -> &TileCollider {
        &self.collider
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn next_life(&self) -> u64 {
        self.next_life
    }

    pub fn health(&self) -> CappedCounter {
        self.health
    }

    pub fn lives(&self) -> CappedCounter {
        self.lives
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn clamp_dt(&self, dt_ms: f32) -> f32 {
        dt_ms.clamp(0.0, self.config.physics.max_frame_ms)
    }

    /// Damage is ignored while invincible; any applied change restarts the window.
    fn change_health(&mut self, delta: i64) -> u32 {
        if delta < 0 && self.player.is_invincible(self.now_ms) {
            return self.health.available();
        }
        self.player.start_invincibility(self.now_ms);
        self.health.change(delta)
    }

    fn change_lives(&mut self, delta: i64) -> u32 {
        let lives = self.lives.change(delta);
        if lives == 0 {
            log::info!("Out of lives, final score {}", self.score);
            self.running = false;
        }
        lives
    }

    fn add_score(&mut self, points: u64) {
        self.score += points;
        if self.score >= self.next_life {
            self.lives.change_max(1);
            self.change_lives(1);
            self.next_life *= 2;
            log::info!(
                "Extra life at {} points, next at {}",
                self.score,
                self.next_life
            );
        }
    }
}

fn sync_sprite(
    engine: &mut impl Engine,
    sprite: &mut Option<SpriteId>,
    texture: &str,
    rect: Rect,
    frame: Option<usize>,
) {
    match *sprite {
        Some(id) => {
            engine.set_sprite_position(id, Vec2::new(rect.x, rect.y));
            if let Some(frame) = frame {
                engine.set_sprite_frame(id, frame);
            }
        }
        None => *sprite = Some(engine.create_sprite(texture, rect, frame.unwrap_or(0))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{HeadlessEngine, TextureSpec};
    use crate::level::{LevelFile, TileBinding};
    use crate::pose::Motion;
    use tdos_core::input::InputState;

    fn map(rows: &[String], tile: u32) -> TileMap {
        TileMap::from_file(LevelFile {
            version: "0.1".to_string(),
            level_id: "test".to_string(),
            tile_width: tile,
            tile_height: tile,
            texture: "level-textures".to_string(),
            bindings: vec![
                TileBinding {
                    glyph: '#',
                    kind: TileKind::Floor,
                    frame: Some(0),
                },
                TileBinding {
                    glyph: 'S',
                    kind: TileKind::Start,
                    frame: Some(1),
                },
                TileBinding {
                    glyph: 'm',
                    kind: TileKind::Enemy,
                    frame: None,
                },
            ],
            rows: rows.to_vec(),
        })
        .expect("test level is valid")
    }

    /// `columns` wide, four rows of 32 px, start in the first column of the floor.
    fn flat_map(columns: usize) -> TileMap {
        let empty = ".".repeat(columns);
        let floor = "S".to_string() + &"#".repeat(columns - 1);
        map(&[empty.clone(), empty.clone(), empty, floor], 32)
    }

    fn seeded() -> GameConfig {
        GameConfig {
            seed: Some(1),
            ..GameConfig::default()
        }
    }

    fn state_for(map: TileMap) -> (GameState, HeadlessEngine) {
        let mut engine = HeadlessEngine::new();
        let state = GameState::init(&mut engine, seeded(), map).expect("init should succeed");
        (state, engine)
    }

    /// Replace the level's creatures with one mushroom standing on `foot`.
    fn place_mushroom(state: &mut GameState, foot: Vec2) {
        state.creatures.clear();
        let mushroom = Creature::spawn(&state.mushroom, foot, state.now_ms);
        state.creatures.push(mushroom);
    }

    struct Keys(Vec<Key>);

    impl KeySource for Keys {
        fn is_key_down(&self, key: Key) -> bool {
            self.0.contains(&key)
        }
    }

    #[test]
    fn init_stands_player_on_start_tile() {
        let (state, engine) = state_for(flat_map(40));
        assert_eq!(state.player().body.position, Vec2::new(0.0, 32.0));
        assert_eq!(state.player().body.size, Vec2::new(32.0, 64.0));
        assert_eq!(state.collider().boundaries().len(), 40);
        assert_eq!(state.health().available(), 3);
        assert_eq!(state.lives().available(), 1);
        assert_eq!(state.next_life(), 400);
        assert!(state.running() && !state.victory());
        // 40 tiles and the player.
        assert_eq!(engine.sprite_count(), 41);
    }

    #[test]
    fn enemy_markers_spawn_mushrooms_on_top() {
        let empty = ".".repeat(40);
        let marked = ".".repeat(5) + "m" + &".".repeat(34);
        let floor = "S".to_string() + &"#".repeat(39);
        let (state, _) = state_for(map(&[empty.clone(), empty, marked, floor], 32));
        assert_eq!(state.creatures().len(), 1);
        let mushroom = &state.creatures()[0];
        assert_eq!(mushroom.kind, CreatureKind::Mushroom);
        assert_eq!(mushroom.body.position, Vec2::new(160.0, 32.0));
        assert!(mushroom.sprite.is_some());
    }

    #[test]
    fn resting_player_stays_put() {
        let (mut state, _) = state_for(flat_map(40));
        state.update(16.0);
        assert_eq!(state.player().body.position, Vec2::new(0.0, 32.0));
        assert_eq!(state.player().body.velocity.y, 0.0);
    }

    #[test]
    fn kill_shot_removes_creature_and_bounces() {
        let (mut state, mut engine) = state_for(flat_map(40));
        state.paint(&mut engine);
        place_mushroom(&mut state, Vec2::new(10.0, 96.0));
        state.paint(&mut engine);
        let sprites_before = engine.sprite_count();

        state.player.body.velocity.y = 0.5;
        state.now_ms = 1000.0;
        state.update(16.0);

        assert!(state.creatures().is_empty());
        assert_eq!(state.score(), 100);
        assert_eq!(state.health().available(), 3, "a kill shot never hurts");
        assert!(state.player().body.velocity.y < 0.0);
        assert!(state.player().is_jumping());

        state.paint(&mut engine);
        assert_eq!(engine.sprite_count(), sprites_before - 1);
    }

    #[test]
    fn damage_applies_once_per_invincibility_window() {
        let (mut state, _) = state_for(flat_map(40));
        place_mushroom(&mut state, Vec2::new(10.0, 96.0));
        state.now_ms = 1000.0;

        state.update(16.0);
        assert_eq!(state.health().available(), 2);
        assert!(state.player().body.overlaps(&state.creatures()[0].body));

        state.update(16.0);
        assert_eq!(state.health().available(), 2);
    }

    #[test]
    fn spawn_heal_grants_a_short_invincibility() {
        let (mut state, _) = state_for(flat_map(40));
        place_mushroom(&mut state, Vec2::new(10.0, 96.0));
        state.update(16.0);
        assert_eq!(state.health().available(), 3);
    }

    #[test]
    fn losing_last_health_kills_the_player() {
        let (mut state, _) = state_for(flat_map(40));
        place_mushroom(&mut state, Vec2::new(10.0, 96.0));
        state.health = CappedCounter::new(1, 3);
        state.now_ms = 1000.0;

        state.update(16.0);
        assert_eq!(state.health().available(), 0);
        assert!(state.player().is_dying());

        // A dying player ignores input and passes through creatures.
        state.check_keys(&Keys(vec![Key::Right, Key::Up]), 16.0);
        assert_eq!(state.player().body.velocity.x, 0.0);
        state.update(16.0);
        assert_eq!(state.health().available(), 0);
    }

    #[test]
    fn reaching_score_threshold_grants_a_life() {
        let (mut state, _) = state_for(flat_map(40));
        state.add_score(400);
        assert_eq!(state.lives().max(), 2);
        assert_eq!(state.lives().available(), 2);
        assert_eq!(state.next_life(), 800);

        state.add_score(250);
        assert_eq!(state.lives().available(), 2);
        state.add_score(250);
        assert_eq!(state.lives().available(), 3);
        assert_eq!(state.next_life(), 1600);
    }

    #[test]
    fn falling_off_the_map_costs_a_life_and_respawns() {
        // 25 rows of 40 px: a 1000 px tall level.
        let mut rows = vec![".".repeat(30); 24];
        rows.push("S".to_string() + &"#".repeat(29));
        let (mut state, _) = state_for(map(&rows, 40));
        assert_eq!(state.collider().level_size().y, 1000.0);
        state.lives = CappedCounter::new(2, 2);
        state.health = CappedCounter::new(1, 3);
        state.creatures.clear();

        state.player.body.position = Vec2::new(400.0, 3000.0);
        state.player.body.velocity = Vec2::new(0.3, 0.9);
        state.now_ms = 1000.0;
        state.update(16.0);

        assert!(state.running());
        assert_eq!(state.lives().available(), 1);
        assert_eq!(state.health().available(), 3);
        let spawn = state.player().spawn_point();
        assert_eq!(spawn, Vec2::new(0.0, 960.0 - 64.0));
        assert_eq!(state.player().body.position, spawn);
        assert_eq!(state.player().body.velocity, Vec2::ZERO);
        assert_eq!(state.player().state.motion, Motion::Stopped);
        let rect = state.player().body.rect();
        assert_eq!(state.camera().offset(), state.camera().target_for(&rect));
    }

    #[test]
    fn falling_with_last_life_ends_the_run() {
        let (mut state, _) = state_for(flat_map(40));
        state.player.body.position.y = 5000.0;
        state.update(16.0);
        assert_eq!(state.lives().available(), 0);
        assert!(!state.running());
        assert!(!state.victory());
    }

    #[test]
    fn reaching_the_right_edge_is_victory() {
        let (mut state, _) = state_for(flat_map(20));
        state.player.body.position.x = 640.0 - 100.0 - 32.0;
        state.update(16.0);
        assert!(!state.running());
        assert!(state.victory());
    }

    #[test]
    fn camera_stays_within_level_while_running_right() {
        let (mut state, mut engine) = state_for(flat_map(120));
        let keys = Keys(vec![Key::Right]);
        let min_x = -(120.0 * 32.0 - 800.0);
        while state.running() {
            state.check_keys(&keys, 16.0);
            state.update(16.0);
            state.update_viewport(16.0);
            state.paint(&mut engine);
            let x = state.camera().offset().x;
            assert!((min_x..=0.0).contains(&x), "camera x {x}");
        }
        assert!(state.victory());
        assert!(engine.last_camera().x < 0.0);
    }

    #[test]
    fn escape_quits_without_victory() {
        let (mut state, _) = state_for(flat_map(40));
        state.check_keys(&Keys(vec![Key::Escape]), 16.0);
        assert!(!state.running());
        assert!(!state.victory());
    }

    #[test]
    fn escape_quits_on_the_press_not_while_held() {
        let (mut state, _) = state_for(flat_map(40));
        let mut input = InputState::new();
        input.key_down(Key::Escape);
        input.end_frame();
        state.check_keys(&input, 16.0);
        assert!(state.running(), "a key held from an earlier frame is not a press");

        input.key_up(Key::Escape);
        input.key_down(Key::Escape);
        state.check_keys(&input, 16.0);
        assert!(!state.running());
    }

    #[test]
    fn held_up_jumps_and_input_state_drives_keys() {
        let (mut state, _) = state_for(flat_map(40));
        let mut input = InputState::new();
        input.key_down(Key::Up);
        state.check_keys(&input, 16.0);
        assert!(state.player().is_jumping());
        assert_eq!(state.player().body.velocity.y, -1.2);

        let (mut state, _) = state_for(flat_map(40));
        state.check_keys(&Keys(vec![Key::Up, Key::Down]), 16.0);
        assert!(!state.player().is_jumping(), "up with down held does nothing");
    }

    #[test]
    fn creatures_outside_the_view_are_frozen() {
        let (mut state, _) = state_for(flat_map(120));
        place_mushroom(&mut state, Vec2::new(3000.0, 96.0));
        let before = state.creatures()[0].body;
        state.update(16.0);
        assert_eq!(state.creatures()[0].body.position, before.position);

        place_mushroom(&mut state, Vec2::new(300.0, 96.0));
        state.update(16.0);
        assert!(state.creatures()[0].body.position.x < 300.0);
    }

    #[test]
    fn mushroom_launches_a_child_that_moves_from_the_next_frame() {
        let mut config = seeded();
        config.creatures.spawn_chance = 1.0;
        let mut engine = HeadlessEngine::new();
        let mut state =
            GameState::init(&mut engine, config, flat_map(40)).expect("init should succeed");
        place_mushroom(&mut state, Vec2::new(300.0, 96.0));
        state.paint(&mut engine);
        let sprites_before = engine.sprite_count();

        state.now_ms = 5000.0;
        state.update(16.0);
        assert_eq!(state.creatures().len(), 2);
        let parent = state.creatures()[0].body;
        let child = state.creatures()[1].clone();
        assert_eq!(child.kind, CreatureKind::SmallMushroom);
        assert!(child.sprite.is_none());
        assert_eq!(child.body.position.x, parent.position.x);
        assert_eq!(child.body.rect().bottom(), parent.position.y);
        assert_eq!(child.body.velocity.y, -child.launch_speed, "no gravity on the spawn frame");

        state.paint(&mut engine);
        assert_eq!(engine.sprite_count(), sprites_before + 1);
        let id = state.creatures()[1].sprite.expect("child sprite created on paint");
        let record = engine.sprite(id).expect("child sprite registered");
        assert_eq!(record.texture, state.small_mushroom.texture);

        state.update(16.0);
        assert_eq!(state.creatures().len(), 2, "cooldown restarted at the launch");
        assert!(state.creatures()[1].body.position.y < child.body.position.y);
    }

    #[test]
    fn creatures_below_the_level_are_dropped() {
        let (mut state, mut engine) = state_for(flat_map(40));
        place_mushroom(&mut state, Vec2::new(300.0, 96.0));
        state.paint(&mut engine);
        let sprites_before = engine.sprite_count();

        state.creatures[0].body.position.y = state.collider().level_size().y + 50.0;
        state.update(16.0);
        assert!(state.creatures().is_empty());
        assert_eq!(state.score(), 0);

        state.paint(&mut engine);
        assert_eq!(engine.sprite_count(), sprites_before - 1);
    }

    #[test]
    fn camera_keeps_up_with_a_dying_player() {
        let (mut state, _) = state_for(flat_map(120));
        state.player.body.position = Vec2::new(2000.0, 32.0);
        state.player.die();
        state.update_viewport(16.0);
        let rect = state.player().body.rect();
        let target = state.camera().target_for(&rect);
        assert_eq!(state.camera().offset(), target);
        assert_eq!(target.x, -1616.0);
    }

    #[test]
    fn paint_reports_camera_and_hud() {
        let (mut state, mut engine) = state_for(flat_map(40));
        state.update(16.0);
        state.paint(&mut engine);
        assert_eq!(engine.paint_count(), 1);
        assert_eq!(engine.last_hud().health.available(), 3);
        assert_eq!(engine.last_hud().fps, 62.5);
        let player = state.player().sprite.expect("player sprite");
        let record = engine.sprite(player).expect("player sprite registered");
        assert_eq!(record.texture, "darwin-textures");
        assert_eq!(record.frame, 0);
    }

    #[test]
    fn running_follows_the_window() {
        let (state, mut engine) = state_for(flat_map(40));
        assert!(state.running_in(&engine));
        engine.close();
        assert!(!state.running_in(&engine));
    }

    #[test]
    fn bad_texture_is_an_asset_error() {
        let mut config = seeded();
        config.textures[3] = TextureSpec::new("darwin-textures", "assets/darwin.png", 0, 32);
        let mut engine = HeadlessEngine::new();
        let err = GameState::init(&mut engine, config, flat_map(10))
            .err()
            .expect("zero frame size should fail");
        assert!(matches!(err, InitError::Asset(_)));

        let mut config = seeded();
        config.textures.retain(|t| t.name != "enemy-textures");
        let err = GameState::init(&mut engine, config, flat_map(10))
            .err()
            .expect("missing texture should fail");
        assert_eq!(
            err,
            InitError::Asset("texture 'enemy-textures' is not declared".to_string())
        );
    }

    #[test]
    fn tile_source_without_start_is_a_tile_map_error() {
        let mut engine = HeadlessEngine::new();
        let floor = (0..10).map(|col| TileRecord {
            kind: TileKind::Floor,
            rect: Rect::new(col as f32 * 32.0, 96.0, 32.0, 32.0),
            frame: Some(0),
        });
        let err = GameState::from_tiles(
            &mut engine,
            seeded(),
            Vec2::new(320.0, 128.0),
            "level-textures",
            floor,
        )
        .err()
        .expect("no start tile");
        assert!(matches!(err, InitError::TileMap(_)));

        let err = GameState::from_tiles(
            &mut engine,
            seeded(),
            Vec2::ZERO,
            "level-textures",
            Vec::new(),
        )
        .err()
        .expect("empty level");
        assert!(matches!(err, InitError::TileMap(_)));
    }
}
