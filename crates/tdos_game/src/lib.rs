//! Simulation core of a side-scrolling platformer: tile collision, camera
//! follow, and the player and creature state machines. Drawing, textures and
//! input devices stay with the host engine behind [`engine::Engine`].

pub mod body;
pub mod camera;
pub mod collision;
pub mod config;
pub mod creature;
pub mod engine;
pub mod error;
pub mod level;
pub mod player;
pub mod pose;
pub mod replay;
pub mod state;

pub use error::InitError;
pub use state::GameState;
