//! Gameplay settings
//!
//! Every balance constant of a round. Stored as JSON; anything missing from
//! the file takes its default, and an unreadable file means defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::{GhostKind, PillKind};

/// Tunable gameplay values (speeds in px/tick, durations in seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Movement ===
    pub player_speed: f32,
    pub ghost_speed: f32,
    /// Speed of a ghost that is Frightened and not yet eaten
    pub frightened_speed: f32,

    // === Mode timers ===
    pub frightened_duration: f32,
    pub scatter_duration: f32,
    pub chase_duration: f32,
    /// Closing part of Frightened in which ghosts flash
    pub flash_window: f32,
    /// Death animation hold before the life is taken
    pub death_duration: f32,

    // === Ghost house ===
    /// Release delay per ghost (Blinky, Pinky, Inky, Clyde) after (re)spawn
    pub ghost_release_delays: [f32; 4],
    /// Time an eaten ghost spends benched in the house
    pub ghost_respawn_delay: f32,

    // === Pickups ===
    pub cherry_spawn_delay: f32,
    pub strawberry_spawn_delay: f32,
    pub pickup_lifetime: f32,

    // === Scoring ===
    pub pill_points: u32,
    pub power_pill_points: u32,
    pub ghost_points: u32,
    pub cherry_points: u32,
    /// Strawberry value when lives are already full
    pub strawberry_points: u32,
    /// Strawberry value alongside the extra life
    pub strawberry_life_points: u32,

    // === Lives ===
    pub starting_lives: u8,
    pub max_lives: u8,

    // === Contact ===
    /// Centre distance under which a ghost touches the player
    pub lethal_distance: f32,
    /// Half-extents of the box tests that collect each kind of item
    pub pill_capture_extent: f32,
    pub power_pill_capture_extent: f32,
    pub pickup_capture_extent: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_speed: 2.5,
            ghost_speed: 2.0,
            frightened_speed: 1.8,

            frightened_duration: 10.0,
            scatter_duration: 7.0,
            chase_duration: 20.0,
            flash_window: 2.0,
            death_duration: 1.6,

            ghost_release_delays: [0.0, 5.0, 10.0, 15.0],
            ghost_respawn_delay: 5.0,

            cherry_spawn_delay: 15.0,
            strawberry_spawn_delay: 30.0,
            pickup_lifetime: 12.0,

            pill_points: 10,
            power_pill_points: 50,
            ghost_points: 200,
            cherry_points: 1000,
            strawberry_points: 2500,
            strawberry_life_points: 1000,

            starting_lives: 3,
            max_lives: 3,

            lethal_distance: 20.0,
            pill_capture_extent: 15.0,
            power_pill_capture_extent: 15.0,
            pickup_capture_extent: 15.0,
        }
    }
}

impl Settings {
    /// Capture half-extent for a pill of the given kind
    pub fn capture_extent(&self, kind: PillKind) -> f32 {
        match kind {
            PillKind::Pill => self.pill_capture_extent,
            PillKind::PowerPill => self.power_pill_capture_extent,
        }
    }

    /// Release delay for a ghost after it (re)spawns
    pub fn release_delay(&self, kind: GhostKind) -> f32 {
        self.ghost_release_delays[kind.index()]
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("No settings at {} ({e}), using defaults", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Malformed settings in {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON. Failures are logged and dropped.
    pub fn save(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let result = serde_json::to_string_pretty(self)
            .map_err(std::io::Error::other)
            .and_then(|json| std::fs::write(path, json));
        match result {
            Ok(()) => log::info!("Settings saved to {}", path.display()),
            Err(e) => log::warn!("Could not save settings to {}: {e}", path.display()),
        }
    }
}
