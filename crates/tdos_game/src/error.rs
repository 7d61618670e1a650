use std::fmt;

/// Fatal problems while building a `GameState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitError {
    /// A texture could not be loaded or is not declared.
    Asset(String),
    /// The tile map is unusable (missing start tile, bad dimensions).
    TileMap(String),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::Asset(msg) => write!(f, "asset error: {msg}"),
            InitError::TileMap(msg) => write!(f, "tile map error: {msg}"),
        }
    }
}

impl std::error::Error for InitError {}
