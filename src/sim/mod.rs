//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, supplied by the caller
//! - Seeded RNG only
//! - Stable iteration order (ghosts by kind)
//! - No rendering, audio or platform dependencies

pub mod ghost;
pub mod grid;
pub mod maze;
pub mod modes;
pub mod motion;
pub mod player;
pub mod state;
pub mod tick;

pub use ghost::{Ghost, GhostKind, Pursuit, pick_direction};
pub use grid::{GridMap, MapError, Passage, TileKind};
pub use maze::{CLASSIC_BOARD, Layout, parse_board};
pub use modes::{Countdown, CyclePhase, ModeTimers, TimerEvents};
pub use motion::{Direction, is_centered, nearest_tile, snap_to_grid, wrap_tunnel};
pub use player::Player;
pub use state::{
    GameEvent, GamePhase, GameState, GhostLook, GhostView, Pickup, PickupKind, Pill, PillKind,
    PlayerView, RngState, Snapshot,
};
pub use tick::{TickInput, tick};
