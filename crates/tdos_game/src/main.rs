//! Headless runner: loads a level, plays it with scripted or idle input and
//! reports how the run ended.
//!
//! Each frame follows the order the simulation expects:
//!
//!   1. sample the frame delta (fixed step from the replay, or wall clock
//!      with `--realtime`), clamped by `FrameClock`
//!   2. apply the replay's keys for this frame
//!   3. `check_keys` → `update` → `update_viewport` → `paint`
//!
//! The run stops when the game does (victory, defeat, Escape), when the
//! engine reports its window closed, or after `--max-frames`.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use tdos_core::input::InputState;
use tdos_core::time::FrameClock;
use tdos_game::config::{load_config_from_path, GameConfig};
use tdos_game::engine::HeadlessEngine;
use tdos_game::level::load_level_from_path;
use tdos_game::replay::load_replay_from_path;
use tdos_game::{GameState, InitError};

const DEFAULT_FRAME_MS: f32 = 1000.0 / 60.0;

#[derive(Parser)]
#[command(version, about = "Runs the platformer simulation without a window")]
struct Cli {
    /// Level JSON to play.
    #[arg(long, value_name = "PATH", default_value = "assets/levels/meadow.json")]
    level: PathBuf,

    /// Tuning overrides; anything not named keeps its default.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Scripted input. Without one the player stands still.
    #[arg(long, value_name = "PATH")]
    replay: Option<PathBuf>,

    /// Seed for creature spawning. Overrides the config file.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 600)]
    max_frames: u64,

    /// Sleep between frames and take deltas from the wall clock.
    #[arg(long)]
    realtime: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path)?,
        None => GameConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let map = load_level_from_path(&cli.level).map_err(|e| InitError::TileMap(e).to_string())?;

    let (frame_ms, inputs) = match &cli.replay {
        Some(path) => {
            let replay = load_replay_from_path(path)?;
            log::info!(
                "Replay {}: {} frames at {:.3}ms",
                path.display(),
                replay.expanded_inputs().len(),
                replay.frame_ms
            );
            (replay.frame_ms, replay.expanded_inputs())
        }
        None => (DEFAULT_FRAME_MS, Vec::new()),
    };
    let step = Duration::from_secs_f32(frame_ms / 1000.0);

    let mut clock = FrameClock::new(config.physics.max_frame_ms);
    let mut engine = HeadlessEngine::new();
    let mut state = GameState::init(&mut engine, config, map).map_err(|e| e.to_string())?;
    let mut keys = InputState::new();

    let mut frame: u64 = 0;
    while frame < cli.max_frames && state.running_in(&engine) {
        let dt_ms = if cli.realtime {
            std::thread::sleep(step);
            clock.begin_frame()
        } else {
            clock.advance(step)
        };

        let input = inputs.get(frame as usize).copied().unwrap_or_default();
        input.apply(&mut keys);

        state.check_keys(&keys, dt_ms);
        state.update(dt_ms);
        state.update_viewport(dt_ms);
        state.paint(&mut engine);
        keys.end_frame();
        frame += 1;

        if frame % 300 == 0 {
            log::debug!(
                "frame {frame}: player at {:?}, {} creatures, {:.1} fps",
                state.player().body.position,
                state.creatures().len(),
                clock.smoothed_fps
            );
        }
    }

    let outcome = if state.victory() {
        "victory"
    } else if state.lives().is_empty() {
        "defeat"
    } else if state.running() {
        "frame limit reached"
    } else {
        "quit"
    };
    log::info!(
        "Run ended ({outcome}) after {frame} frames / {:.0}ms: score {}, lives {}/{}, health {}/{}",
        clock.total_ms,
        state.score(),
        state.lives().available(),
        state.lives().max(),
        state.health().available(),
        state.health().max()
    );
    Ok(())
}
