//! Maze Chase - simulation core of a Pac-Man style arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze, movement, ghost AI, round rules)
//! - `settings`: Data-driven game balance
//! - `highscores`: Best-effort score persistence

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::{FileScoreStore, HighScores, ScoreStore};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Edge length of one maze tile in pixels
    pub const TILE_SIZE: f32 = 26.0;
    /// Integer form of `TILE_SIZE` for tile indexing
    pub const TILE_SIZE_PX: i32 = 26;
    /// Nominal fixed simulation timestep (~60 Hz)
    pub const SIM_DT: f32 = 0.016;

    /// Inset applied to an entity's bounding box before wall tests
    pub const CORNER_PADDING: f32 = 2.0;

    /// Timer slack so accumulated float error never delays expiry by a tick
    pub const TIMER_EPSILON: f32 = 1e-3;
}

/// Top-left pixel of the tile at (row, col)
#[inline]
pub fn tile_origin(row: i32, col: i32) -> Vec2 {
    Vec2::new(col as f32 * consts::TILE_SIZE, row as f32 * consts::TILE_SIZE)
}

/// Pixel centre of the tile at (row, col)
#[inline]
pub fn tile_center(row: i32, col: i32) -> Vec2 {
    tile_origin(row, col) + Vec2::splat(consts::TILE_SIZE / 2.0)
}

/// Centre of an entity whose bounding box starts at `pos`
#[inline]
pub fn entity_center(pos: Vec2) -> Vec2 {
    pos + Vec2::splat(consts::TILE_SIZE / 2.0)
}
