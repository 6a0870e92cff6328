//! Fixed timestep simulation tick
//!
//! Round orchestration: timers, death hold, releases, movement, contacts,
//! pickups, collectibles, level clear and game over, in that order.

use super::ghost::Pursuit;
use super::motion::Direction;
use super::state::{GameEvent, GamePhase, GameState, PickupKind, PillKind};
use crate::consts::TIMER_EPSILON;
use crate::highscores::ScoreStore;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// New requested direction, if the player pressed something
    pub direction: Option<Direction>,
}

/// Advance the round by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, scores: &mut impl ScoreStore) {
    state.events.clear();
    if state.phase == GamePhase::GameOver {
        return;
    }
    state.time_ticks += 1;

    if let Some(dir) = input.direction {
        state.set_requested_direction(dir);
    }

    advance_timers(state, dt);

    if state.phase == GamePhase::Dying {
        if state.timers.death.tick(dt) {
            lose_life(state, scores);
        }
        return;
    }

    release_ghosts(state);
    state.player.update(&state.layout.map);
    update_ghosts(state);
    update_pickup(state, dt);

    if state.phase == GamePhase::Playing {
        eat_pills(state);
        eat_pickup(state);
        if state.pills.is_empty() {
            clear_level(state);
        }
    }
}

fn advance_timers(state: &mut GameState, dt: f32) {
    let edges = state.timers.advance(dt, &state.settings);

    if let Some(phase) = edges.mode_changed {
        for ghost in state.ghosts.iter_mut().filter(|g| g.active && !g.eaten) {
            ghost.reverse();
        }
        log::debug!("Mode changed to {phase:?} at {:.2}s", state.timers.elapsed);
        state.emit(GameEvent::ModeChanged(phase));
    }

    if edges.frightened_ended {
        for ghost in &mut state.ghosts {
            ghost.eaten = false;
        }
        log::debug!("Frightened ended");
        state.emit(GameEvent::FrightenedEnded);
    }
}

fn release_ghosts(state: &mut GameState) {
    let now = state.timers.elapsed;
    for ghost in state.ghosts.iter_mut().filter(|g| !g.active) {
        if now + TIMER_EPSILON >= ghost.release_at {
            ghost.active = true;
            log::debug!("{} released at {now:.2}s", ghost.kind.name());
        }
    }
}

fn update_ghosts(state: &mut GameState) {
    let frightened = state.is_frightened();
    let scatter = state.timers.is_scatter();

    for i in 0..state.ghosts.len() {
        if !state.ghosts[i].active {
            continue;
        }

        let leader_center = state.leader_center();
        let ctx = Pursuit {
            map: &state.layout.map,
            player_center: state.player.center(),
            player_facing: state.player.direction,
            leader_center,
            scatter,
            frightened,
            house_exit: state.layout.house_exit,
        };
        state.ghosts[i].update(&ctx, &state.settings);

        resolve_contact(state, i, frightened);
    }
}

/// Player/ghost contact for ghost `i`: eat it or get caught
fn resolve_contact(state: &mut GameState, i: usize, frightened: bool) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let ghost = &state.ghosts[i];
    let reach = state.settings.lethal_distance;
    if ghost.center().distance_squared(state.player.center()) >= reach * reach {
        return;
    }
    // Eaten ghosts are harmless until Frightened ends
    if ghost.eaten {
        return;
    }

    if ghost.is_frightened(frightened) {
        let kind = ghost.kind;
        let release_at = state.timers.elapsed + state.settings.ghost_respawn_delay;
        let ghost = &mut state.ghosts[i];
        ghost.eaten = true;
        ghost.send_home(state.layout.house_interior, &state.layout.map, release_at);
        state.add_score(state.settings.ghost_points);
        log::debug!("{} eaten, back at {release_at:.2}s", kind.name());
        state.emit(GameEvent::GhostEaten { kind });
    } else {
        state.phase = GamePhase::Dying;
        state.timers.death.start(state.settings.death_duration);
        log::debug!("Player caught by {}", ghost.kind.name());
        state.emit(GameEvent::PlayerCaught);
    }
}

/// Death hold is over: respawn or end the round
fn lose_life(state: &mut GameState, scores: &mut impl ScoreStore) {
    state.timers.death.stop();
    state.lives = state.lives.saturating_sub(1);
    state.emit(GameEvent::LifeLost);

    if state.lives > 0 {
        log::debug!("Life lost, {} left", state.lives);
        state.phase = GamePhase::Playing;
        state.reset_actors();
        return;
    }

    state.phase = GamePhase::GameOver;
    log::debug!("Game over with {} points", state.score);
    scores.record_score(state.score);
    state.emit(GameEvent::GameOver { score: state.score });
}

/// Pickup lifetime, or spawn one when a timer has come due
fn update_pickup(state: &mut GameState, dt: f32) {
    if let Some(pickup) = &mut state.pickup {
        if pickup.lifetime.tick(dt) {
            let kind = pickup.kind;
            state.despawn_pickup();
            state.emit(GameEvent::PickupExpired { kind });
        }
        return;
    }

    // Cherry first when both are due
    if state.timers.cherry_spawn.is_elapsed() {
        state.timers.cherry_spawn.stop();
        state.spawn_pickup(PickupKind::Cherry);
    } else if state.timers.strawberry_spawn.is_elapsed() {
        state.timers.strawberry_spawn.stop();
        state.spawn_pickup(PickupKind::Strawberry);
    }
}

/// Axis-aligned box test between two centres
fn within_extent(a: glam::Vec2, b: glam::Vec2, extent: f32) -> bool {
    let d = (a - b).abs();
    d.x < extent && d.y < extent
}

fn eat_pills(state: &mut GameState) {
    let center = state.player.center();
    let settings = &state.settings;
    let mut eaten = Vec::new();
    state.pills.retain(|pill| {
        let hit = within_extent(pill.pos, center, settings.capture_extent(pill.kind));
        if hit {
            eaten.push(pill.kind);
        }
        !hit
    });

    for kind in eaten {
        match kind {
            PillKind::Pill => {
                state.add_score(state.settings.pill_points);
                state.emit(GameEvent::PillEaten);
            }
            PillKind::PowerPill => {
                state.add_score(state.settings.power_pill_points);
                state.timers.activate_frightened(&state.settings);
                for ghost in &mut state.ghosts {
                    ghost.eaten = false;
                }
                log::debug!("Power pill, frightened for {}s", state.settings.frightened_duration);
                state.emit(GameEvent::PowerPillEaten);
            }
        }
    }
}

fn eat_pickup(state: &mut GameState) {
    let Some(pickup) = state.pickup else {
        return;
    };
    let extent = state.settings.pickup_capture_extent;
    if !within_extent(pickup.center(), state.player.center(), extent) {
        return;
    }

    match pickup.kind {
        PickupKind::Cherry => state.add_score(state.settings.cherry_points),
        PickupKind::Strawberry if state.lives < state.settings.max_lives => {
            state.lives += 1;
            state.add_score(state.settings.strawberry_life_points);
            state.emit(GameEvent::ExtraLife);
        }
        PickupKind::Strawberry => state.add_score(state.settings.strawberry_points),
    }
    log::debug!("{:?} eaten", pickup.kind);
    state.despawn_pickup();
    state.emit(GameEvent::PickupEaten { kind: pickup.kind });
}

/// Last collectible gone: restore the board in place
fn clear_level(state: &mut GameState) {
    state.level += 1;
    state.reset_pills();
    state.reset_actors();
    log::debug!("Level cleared, now on level {}", state.level);
    state.emit(GameEvent::LevelCleared);
}
