//! Mode and timer controller
//!
//! Owns every countdown in a round. Mode changes are reported as edge events
//! from [`ModeTimers::advance`]; the orchestrator applies their side effects
//! within the same tick.

use serde::{Deserialize, Serialize};

use crate::consts::TIMER_EPSILON;
use crate::settings::Settings;

/// One-shot countdown in seconds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Countdown {
    /// Not counting
    #[default]
    Idle,
    Running { remaining: f32 },
    /// Reached zero and stays there until restarted
    Elapsed,
}

impl Countdown {
    pub fn started(duration: f32) -> Self {
        Countdown::Running {
            remaining: duration.max(0.0),
        }
    }

    pub fn start(&mut self, duration: f32) {
        *self = Self::started(duration);
    }

    pub fn stop(&mut self) {
        *self = Countdown::Idle;
    }

    /// Decrement by `dt`. Returns true only on the tick the countdown
    /// reaches zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        let Countdown::Running { remaining } = self else {
            return false;
        };
        *remaining -= dt;
        if *remaining > TIMER_EPSILON {
            return false;
        }
        *self = Countdown::Elapsed;
        true
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Countdown::Running { .. })
    }

    pub fn is_elapsed(&self) -> bool {
        matches!(self, Countdown::Elapsed)
    }

    /// Seconds left (zero unless running)
    pub fn remaining(&self) -> f32 {
        match self {
            Countdown::Running { remaining } => remaining.max(0.0),
            _ => 0.0,
        }
    }
}

/// Position in the Scatter/Chase cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CyclePhase {
    #[default]
    Scatter,
    Chase,
}

impl CyclePhase {
    pub fn next(self) -> Self {
        match self {
            CyclePhase::Scatter => CyclePhase::Chase,
            CyclePhase::Chase => CyclePhase::Scatter,
        }
    }

    pub fn duration(self, settings: &Settings) -> f32 {
        match self {
            CyclePhase::Scatter => settings.scatter_duration,
            CyclePhase::Chase => settings.chase_duration,
        }
    }
}

/// Edges produced by one call to [`ModeTimers::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerEvents {
    /// Scatter/Chase flipped to this phase
    pub mode_changed: Option<CyclePhase>,
    /// Frightened just ran out
    pub frightened_ended: bool,
}

/// Every countdown the round depends on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeTimers {
    /// Seconds since the round started
    pub elapsed: f32,
    pub cycle_phase: CyclePhase,
    /// Time left in the current cycle phase
    pub cycle: Countdown,
    pub frightened: Countdown,
    pub death: Countdown,
    pub cherry_spawn: Countdown,
    pub strawberry_spawn: Countdown,
}

impl ModeTimers {
    pub fn new(settings: &Settings) -> Self {
        Self {
            elapsed: 0.0,
            cycle_phase: CyclePhase::Scatter,
            cycle: Countdown::started(settings.scatter_duration),
            frightened: Countdown::Idle,
            death: Countdown::Idle,
            cherry_spawn: Countdown::started(settings.cherry_spawn_delay),
            strawberry_spawn: Countdown::started(settings.strawberry_spawn_delay),
        }
    }

    /// Advance the clock, the Frightened countdown, the Scatter/Chase cycle
    /// and the pickup spawn timers. The cycle is frozen while Frightened.
    #[must_use]
    pub fn advance(&mut self, dt: f32, settings: &Settings) -> TimerEvents {
        let mut events = TimerEvents::default();
        self.elapsed += dt;

        if self.frightened.is_running() {
            if self.frightened.tick(dt) {
                self.frightened.stop();
                events.frightened_ended = true;
            }
        } else if self.cycle.tick(dt) {
            self.cycle_phase = self.cycle_phase.next();
            self.cycle.start(self.cycle_phase.duration(settings));
            events.mode_changed = Some(self.cycle_phase);
        }

        self.cherry_spawn.tick(dt);
        self.strawberry_spawn.tick(dt);

        events
    }

    /// Restart the Frightened countdown at full length. The cycle keeps its
    /// remaining time.
    pub fn activate_frightened(&mut self, settings: &Settings) {
        self.frightened.start(settings.frightened_duration);
    }

    /// Back to a fresh Scatter phase with Frightened cleared
    pub fn reset_modes(&mut self, settings: &Settings) {
        self.frightened.stop();
        self.cycle_phase = CyclePhase::Scatter;
        self.cycle.start(settings.scatter_duration);
    }

    pub fn is_frightened(&self) -> bool {
        self.frightened.is_running()
    }

    pub fn is_scatter(&self) -> bool {
        self.cycle_phase == CyclePhase::Scatter
    }

    /// Whether Frightened is in its closing window (render hint)
    pub fn frightened_flashing(&self, settings: &Settings) -> bool {
        self.is_frightened() && self.frightened.remaining() <= settings.flash_window
    }
}
