//! Maze Chase headless demo
//!
//! Plays one seeded round with a wandering autopilot and reports the result.
//!
//! Usage: `maze-chase [seed] [settings.json]`

use maze_chase::consts::SIM_DT;
use maze_chase::highscores::DEFAULT_SCORE_FILE;
use maze_chase::sim::{Direction, GameEvent, GamePhase, GameState, Layout, TickInput, tick};
use maze_chase::{FileScoreStore, Settings};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Stop a round that refuses to end (10 minutes of game time)
const MAX_TICKS: u64 = 37_500;

/// Autopilot turns at most this often
const TURN_EVERY_TICKS: u64 = 20;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::warn!("Bad seed argument ({e}), using 1");
            1
        }
        None => 1,
    };
    let settings = args.next().map(Settings::load).unwrap_or_default();

    let mut scores = FileScoreStore::open(DEFAULT_SCORE_FILE);
    let mut state = GameState::with_layout(seed, settings, Layout::classic());
    state.load_high_score(&scores);
    log::info!("Maze Chase starting with seed {seed}");

    let mut pilot = Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15);
    let mut ghosts_eaten = 0u32;
    let mut pickups = 0u32;

    while state.phase != GamePhase::GameOver && state.time_ticks < MAX_TICKS {
        let direction = (state.time_ticks % TURN_EVERY_TICKS == 0)
            .then(|| Direction::ALL[pilot.random_range(0..Direction::ALL.len())]);
        tick(&mut state, &TickInput { direction }, SIM_DT, &mut scores);

        for event in state.events() {
            match event {
                GameEvent::GhostEaten { .. } => ghosts_eaten += 1,
                GameEvent::PickupEaten { .. } => pickups += 1,
                GameEvent::LifeLost => log::info!("Life lost, {} left", state.lives),
                GameEvent::LevelCleared => log::info!("Reached level {}", state.level),
                _ => {}
            }
        }
    }

    let snapshot = state.snapshot();
    let seconds = state.time_ticks as f32 * SIM_DT;
    if snapshot.game_over {
        log::info!("Game over after {seconds:.1}s");
    } else {
        log::info!("Stopped after {seconds:.1}s with {} lives left", snapshot.lives);
    }

    println!("seed:         {seed}");
    println!("score:        {}", snapshot.score);
    println!("high score:   {}", snapshot.high_score);
    println!("level:        {}", snapshot.level);
    println!("pills left:   {}", snapshot.pills.len());
    println!("ghosts eaten: {ghosts_eaten}");
    println!("pickups:      {pickups}");
}
