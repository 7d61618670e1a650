//! Level files: a glyph grid plus the bindings that give each glyph a meaning.
//!
//! ```json
//! {
//!   "version": "0.1",
//!   "level_id": "meadow",
//!   "tile_width": 32,
//!   "tile_height": 32,
//!   "bindings": [
//!     { "glyph": "#", "kind": "floor", "frame": 0 },
//!     { "glyph": "S", "kind": "start", "frame": 1 },
//!     { "glyph": "m", "kind": "enemy" }
//!   ],
//!   "rows": ["....m...", "S#######"]
//! }
//! ```
//!
//! `.` and space are always empty. The map is handed to the game as a
//! consuming iterator of [`TileRecord`]s in row-major order, which is also the
//! load order the collider uses to break ties.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use glam::Vec2;

use crate::collision::Rect;

const SUPPORTED_VERSION: &str = "0.1";
const EMPTY_GLYPHS: [char; 2] = ['.', ' '];

#[derive(Debug, Deserialize, Clone)]
pub struct LevelFile {
    pub version: String,
    pub level_id: String,
    pub tile_width: u32,
    pub tile_height: u32,
    #[serde(default = "default_texture")]
    pub texture: String,
    pub bindings: Vec<TileBinding>,
    pub rows: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct TileBinding {
    pub glyph: char,
    pub kind: TileKind,
    /// Frame of the level texture to draw. Markers without one are invisible.
    #[serde(default)]
    pub frame: Option<usize>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    /// Solid ground.
    Floor,
    /// Solid ground the player starts on.
    Start,
    /// Spawn marker for a mushroom. Not solid.
    Enemy,
}

impl TileKind {
    pub fn is_solid(self) -> bool {
        matches!(self, TileKind::Floor | TileKind::Start)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRecord {
    pub kind: TileKind,
    pub rect: Rect,
    pub frame: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct TileMap {
    pub level_id: String,
    pub texture: String,
    tile_size: Vec2,
    columns: usize,
    rows: Vec<Vec<char>>,
    bindings: HashMap<char, TileBinding>,
}

impl TileMap {
    pub fn from_file(file: LevelFile) -> Result<Self, String> {
        validate_level_file(&file)?;
        let bindings = file.bindings.iter().map(|b| (b.glyph, *b)).collect();
        let rows: Vec<Vec<char>> = file.rows.iter().map(|r| r.chars().collect()).collect();
        Ok(Self {
            level_id: file.level_id,
            texture: file.texture,
            tile_size: Vec2::new(file.tile_width as f32, file.tile_height as f32),
            columns: rows[0].len(),
            rows,
            bindings,
        })
    }

    pub fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    /// Level extent in pixels.
    pub fn size(&self) -> Vec2 {
        Vec2::new(
            self.columns as f32 * self.tile_size.x,
            self.rows.len() as f32 * self.tile_size.y,
        )
    }

    pub fn into_tiles(self) -> Tiles {
        Tiles {
            map: self,
            row: 0,
            col: 0,
        }
    }
}

/// Row-major walk over the occupied cells of a [`TileMap`].
#[derive(Debug)]
pub struct Tiles {
    map: TileMap,
    row: usize,
    col: usize,
}

impl Iterator for Tiles {
    type Item = TileRecord;

    fn next(&mut self) -> Option<TileRecord> {
        while self.row < self.map.rows.len() {
            let (row, col) = (self.row, self.col);
            self.col += 1;
            if self.col >= self.map.columns {
                self.col = 0;
                self.row += 1;
            }
            let glyph = self.map.rows[row][col];
            if let Some(binding) = self.map.bindings.get(&glyph) {
                let size = self.map.tile_size;
                return Some(TileRecord {
                    kind: binding.kind,
                    rect: Rect::new(col as f32 * size.x, row as f32 * size.y, size.x, size.y),
                    frame: binding.frame,
                });
            }
        }
        None
    }
}

pub fn load_level_from_path(path: &Path) -> Result<TileMap, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let file: LevelFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse level JSON {}: {e}", path.display()))?;
    TileMap::from_file(file)
}

fn validate_level_file(file: &LevelFile) -> Result<(), String> {
    if file.version != SUPPORTED_VERSION {
        return Err(format!(
            "Level validation failed: unsupported version '{}' (expected {SUPPORTED_VERSION})",
            file.version
        ));
    }
    if file.level_id.trim().is_empty() {
        return Err("Level validation failed: level_id is empty".to_string());
    }
    if file.tile_width == 0 || file.tile_height == 0 {
        return Err("Level validation failed: tile size must be > 0".to_string());
    }

    let mut bindings = HashMap::new();
    for binding in &file.bindings {
        if EMPTY_GLYPHS.contains(&binding.glyph) {
            return Err(format!(
                "Level validation failed: glyph '{}' is reserved for empty cells",
                binding.glyph
            ));
        }
        if bindings.insert(binding.glyph, binding.kind).is_some() {
            return Err(format!(
                "Level validation failed: glyph '{}' is bound twice",
                binding.glyph
            ));
        }
    }

    let width = match file.rows.first() {
        Some(row) if !row.is_empty() => row.chars().count(),
        _ => return Err("Level validation failed: rows are empty".to_string()),
    };
    let mut starts = 0;
    for (y, row) in file.rows.iter().enumerate() {
        if row.chars().count() != width {
            return Err(format!(
                "Level validation failed: row {y} has {} cells, expected {width}",
                row.chars().count()
            ));
        }
        for (x, glyph) in row.chars().enumerate() {
            if EMPTY_GLYPHS.contains(&glyph) {
                continue;
            }
            match bindings.get(&glyph) {
                Some(TileKind::Start) => starts += 1,
                Some(_) => {}
                None => {
                    return Err(format!(
                        "Level validation failed: unknown glyph '{glyph}' at ({x}, {y})"
                    ))
                }
            }
        }
    }
    if starts != 1 {
        return Err(format!(
            "Level validation failed: expected exactly one start tile, found {starts}"
        ));
    }
    Ok(())
}

fn default_texture() -> String {
    "level-textures".to_string()
}
