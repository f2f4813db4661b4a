//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session by one frame.

use super::collision;
use super::events::GameEvent;
use super::state::{Bullet, GamePhase, GameState, Particle};

/// Input for a single tick
///
/// `left`/`right`/`thrust`/`fire` mirror held keys. The rest are one-shot
/// requests the frontend clears after each processed tick.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub thrust: bool,
    pub fire: bool,
    /// Pause toggle (P)
    pub pause: bool,
    /// Help toggle (H)
    pub help: bool,
    /// Quit to game over (Q)
    pub quit: bool,
    /// Restart after game over (R)
    pub restart: bool,
}

/// Advance the game state by one tick
///
/// Phase requests are handled first, in priority order quit, restart, help,
/// pause. Quit ends the run from `Playing`, `Paused` or `Help`; in `GameOver`
/// it is ignored so a finished run is recorded only once. Only `Playing` runs
/// the simulation.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.quit {
        if state.phase != GamePhase::GameOver {
            collision::end_run(state);
        }
        return;
    }

    if input.restart && state.phase == GamePhase::GameOver {
        state.reset();
        return;
    }

    apply_toggles(state, input);

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;
    step_entities(state, input);
    collision::resolve(state);
}

/// Help wins over pause when both arrive in the same tick
fn apply_toggles(state: &mut GameState, input: &TickInput) {
    let before = state.phase;
    if input.help {
        match state.phase {
            GamePhase::Playing => state.phase = GamePhase::Help,
            GamePhase::Help => state.phase = GamePhase::Playing,
            _ => {}
        }
    }
    if input.pause && state.phase == before {
        match state.phase {
            GamePhase::Playing => state.phase = GamePhase::Paused,
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }
    if state.phase != before {
        log::debug!("Phase {:?} -> {:?}", before, state.phase);
    }
}

/// Move everything, then drop what expired
fn step_entities(state: &mut GameState, input: &TickInput) {
    let turn = f32::from(u8::from(input.right)) - f32::from(u8::from(input.left));
    if turn != 0.0 {
        state.ship.turn(turn);
    }

    if input.fire {
        if let Some(bullet) = state.ship.try_fire() {
            state.bullets.push(bullet);
            state.events.push(GameEvent::Fire);
        }
    }

    let arena = state.arena;
    let exhaust_cap = state.particle_cap;
    if state.ship.update(input.thrust, &arena, exhaust_cap, &mut state.rng) {
        state.events.push(GameEvent::Thrust);
    }

    for asteroid in &mut state.asteroids {
        asteroid.update(&state.arena);
    }
    collision::repel_asteroids(&mut state.asteroids);

    for bullet in &mut state.bullets {
        bullet.update(&state.arena);
    }
    for particle in &mut state.particles {
        particle.update();
    }

    state.bullets.retain(Bullet::is_alive);
    state.particles.retain(Particle::is_alive);
}
