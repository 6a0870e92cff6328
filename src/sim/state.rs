//! Round state and presentation snapshot
//!
//! Everything a round needs lives in [`GameState`], which is plain data and
//! serializes whole. The event list is transient and rebuilt every tick.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ghost::{Ghost, GhostKind};
use super::grid::TileKind;
use super::maze::Layout;
use super::modes::{Countdown, CyclePhase, ModeTimers};
use super::motion::Direction;
use super::player::Player;
use crate::highscores::ScoreStore;
use crate::settings::Settings;
use crate::{entity_center, tile_center, tile_origin};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Normal play
    Playing,
    /// Player caught; everything waits for the death countdown
    Dying,
    /// Out of lives
    GameOver,
}

/// Collectible kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PillKind {
    Pill,
    PowerPill,
}

/// A collectible, positioned at its tile centre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pill {
    pub pos: Vec2,
    pub kind: PillKind,
}

/// Bonus fruit kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// Flat points
    Cherry,
    /// Extra life below the cap, big points at it
    Strawberry,
}

/// The single transient bonus item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    /// Top-left of its tile
    pub pos: Vec2,
    pub lifetime: Countdown,
}

impl Pickup {
    pub fn center(&self) -> Vec2 {
        entity_center(self.pos)
    }
}

/// One-way cues for audio/visual subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PillEaten,
    PowerPillEaten,
    GhostEaten { kind: GhostKind },
    PlayerCaught,
    LifeLost,
    ExtraLife,
    PickupSpawned { kind: PickupKind },
    PickupEaten { kind: PickupKind },
    PickupExpired { kind: PickupKind },
    ModeChanged(CyclePhase),
    FrightenedEnded,
    LevelCleared,
    GameOver { score: u32 },
}

/// RNG state wrapper for serialization.
///
/// Each draw seeds a fresh PCG stream, so the state stays two integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }

    /// Uniform index in `0..len`; `len` must be non-zero
    pub fn next_index(&mut self, len: usize) -> usize {
        let mut rng = self.to_rng();
        self.stream = self.stream.wrapping_add(1);
        rng.random_range(0..len)
    }
}

/// How a ghost should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GhostLook {
    Normal,
    Frightened,
    /// Frightened and about to recover
    Flashing,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub direction: Direction,
    pub alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GhostView {
    pub kind: GhostKind,
    pub pos: Vec2,
    pub direction: Direction,
    pub active: bool,
    pub eaten: bool,
    pub look: GhostLook,
}

/// Read-only copy of everything a renderer needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub player: PlayerView,
    pub ghosts: Vec<GhostView>,
    pub pills: Vec<Pill>,
    pub pickup: Option<Pickup>,
    pub score: u32,
    pub high_score: u32,
    pub lives: u8,
    pub level: u32,
    pub game_over: bool,
}

/// Complete round state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub settings: Settings,
    pub layout: Layout,
    pub player: Player,
    /// Indexed by `GhostKind::index`
    pub ghosts: [Ghost; 4],
    /// Collectibles still on the board
    pub pills: Vec<Pill>,
    pub pickup: Option<Pickup>,
    pub timers: ModeTimers,
    pub score: u32,
    pub high_score: u32,
    pub lives: u8,
    /// 1-based, bumped on every clear
    pub level: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Cues raised during the last tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Classic board, default settings
    pub fn new(seed: u64) -> Self {
        Self::with_layout(seed, Settings::default(), Layout::classic())
    }

    pub fn with_layout(seed: u64, settings: Settings, layout: Layout) -> Self {
        let player = Player::new(layout.player_spawn, settings.player_speed);
        let ghosts = GhostKind::ALL.map(|kind| {
            Ghost::new(
                kind,
                layout.ghost_spawns[kind.index()],
                &layout.map,
                0.0,
                settings.release_delay(kind),
            )
        });

        let mut state = Self {
            seed,
            rng_state: RngState::new(seed),
            timers: ModeTimers::new(&settings),
            lives: settings.starting_lives,
            settings,
            layout,
            player,
            ghosts,
            pills: Vec::new(),
            pickup: None,
            score: 0,
            high_score: 0,
            level: 1,
            time_ticks: 0,
            phase: GamePhase::Playing,
            events: Vec::new(),
        };
        state.reset_pills();
        state
    }

    /// Input entry point: the direction the player wants next
    pub fn set_requested_direction(&mut self, dir: Direction) {
        self.player.request(dir);
    }

    pub fn is_frightened(&self) -> bool {
        self.timers.is_frightened()
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.high_score = self.high_score.max(self.score);
    }

    /// Seed the high score from the store's history
    pub fn load_high_score(&mut self, store: &impl ScoreStore) {
        if let Some(best) = store.best_score() {
            self.high_score = self.high_score.max(best);
        }
    }

    pub fn ghost(&self, kind: GhostKind) -> &Ghost {
        &self.ghosts[kind.index()]
    }

    /// Centre of the leader ghost (Blinky), which Inky flanks from
    pub fn leader_center(&self) -> Option<Vec2> {
        Some(self.ghost(GhostKind::Blinky).center())
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Cues raised by the last tick
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Player and ghosts back to spawn, modes back to a fresh Scatter
    pub fn reset_actors(&mut self) {
        let now = self.timers.elapsed;
        self.player.reset();
        for ghost in &mut self.ghosts {
            ghost.reset(&self.layout.map, now, self.settings.release_delay(ghost.kind));
        }
        self.timers.reset_modes(&self.settings);
    }

    /// Rebuild the full collectible set from the map
    pub fn reset_pills(&mut self) {
        self.pills = self
            .layout
            .map
            .tiles()
            .filter_map(|(row, col, tile)| {
                let kind = match tile {
                    TileKind::Floor => PillKind::Pill,
                    TileKind::PowerPill => PillKind::PowerPill,
                    _ => return None,
                };
                Some(Pill {
                    pos: tile_center(row, col),
                    kind,
                })
            })
            .collect();
    }

    /// Drop a pickup of `kind` on a random floor tile
    pub fn spawn_pickup(&mut self, kind: PickupKind) {
        let floor: Vec<(i32, i32)> = self
            .layout
            .map
            .tiles()
            .filter(|&(_, _, tile)| tile == TileKind::Floor)
            .map(|(row, col, _)| (row, col))
            .collect();
        let pos = if floor.is_empty() {
            self.layout.player_spawn
        } else {
            let (row, col) = floor[self.rng_state.next_index(floor.len())];
            tile_origin(row, col)
        };

        self.pickup = Some(Pickup {
            kind,
            pos,
            lifetime: Countdown::started(self.settings.pickup_lifetime),
        });
        log::debug!("{kind:?} spawned at {pos}");
        self.emit(GameEvent::PickupSpawned { kind });
    }

    /// Remove the pickup (if any) and restart its kind's spawn timer
    pub fn despawn_pickup(&mut self) {
        let Some(pickup) = self.pickup.take() else {
            return;
        };
        match pickup.kind {
            PickupKind::Cherry => self.timers.cherry_spawn.start(self.settings.cherry_spawn_delay),
            PickupKind::Strawberry => self
                .timers
                .strawberry_spawn
                .start(self.settings.strawberry_spawn_delay),
        }
    }

    /// Presentation view of the round
    pub fn snapshot(&self) -> Snapshot {
        let frightened = self.is_frightened();
        let flashing = self.timers.frightened_flashing(&self.settings);
        let ghosts = self
            .ghosts
            .iter()
            .map(|g| {
                let look = match (g.is_frightened(frightened), flashing) {
                    (false, _) => GhostLook::Normal,
                    (true, false) => GhostLook::Frightened,
                    (true, true) => GhostLook::Flashing,
                };
                GhostView {
                    kind: g.kind,
                    pos: g.pos,
                    direction: g.direction,
                    active: g.active,
                    eaten: g.eaten,
                    look,
                }
            })
            .collect();

        Snapshot {
            player: PlayerView {
                pos: self.player.pos,
                direction: self.player.direction,
                alive: self.phase == GamePhase::Playing,
            },
            ghosts,
            pills: self.pills.clone(),
            pickup: self.pickup,
            score: self.score,
            high_score: self.high_score,
            lives: self.lives,
            level: self.level,
            game_over: self.phase == GamePhase::GameOver,
        }
    }
}
