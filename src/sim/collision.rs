//! Collision detection and response
//!
//! Everything is circle-approximate: bullets are points, asteroids and the ship
//! are circles of their nominal radius. The polygon outlines are cosmetic.
//!
//! Entities hit during a pass are only marked dead; they are pruned once the
//! pass is over so indices stay valid while iterating.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use super::events::GameEvent;
use super::state::{Asteroid, Bullet, GamePhase, GameState, Palette};
use crate::consts::*;
use crate::heading;

/// Strict point-in-circle test (a point on the rim does not count)
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance(center) < radius
}

/// Strict circle overlap test
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Push overlapping asteroids apart.
///
/// Every asteroid pushes on every other one it overlaps, so each pair receives
/// twice the overlap-proportional impulse, equal and opposite along the line
/// between centers. Nothing is conserved; this only softens pile-ups.
pub fn repel_asteroids(asteroids: &mut [Asteroid]) {
    for i in 0..asteroids.len() {
        let (head, tail) = asteroids.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            let delta = a.pos - b.pos;
            let distance = delta.length();
            let min_distance = a.radius + b.radius;
            if distance > 0.0 && distance < min_distance {
                let overlap = min_distance - distance;
                // Both asteroids of a pair push each other, so the impulse lands twice
                let push = delta / distance * overlap * ASTEROID_REPULSION * 2.0;
                a.vel += push;
                b.vel -= push;
            }
        }
    }
}

/// Run the whole resolver for one tick: bullets, then the ship, then wave clear.
pub fn resolve(state: &mut GameState) {
    resolve_bullet_hits(state);
    state.asteroids.retain(|a| a.alive);
    state.bullets.retain(Bullet::is_alive);

    resolve_ship_hit(state);
    if state.phase == GamePhase::GameOver {
        return;
    }

    resolve_wave_clear(state);
}

/// Bullet vs asteroid. Each bullet retires on its first hit.
///
/// Returns the number of asteroids destroyed. Split products are added after
/// the pass, so they cannot be hit in the tick that created them.
pub fn resolve_bullet_hits(state: &mut GameState) -> usize {
    let mut children: Vec<Asteroid> = Vec::new();
    let mut hits = 0;

    for bullet_idx in 0..state.bullets.len() {
        if !state.bullets[bullet_idx].is_alive() {
            continue;
        }
        let bullet_pos = state.bullets[bullet_idx].pos;

        // Insertion order decides ties
        let Some(asteroid_idx) = state
            .asteroids
            .iter()
            .position(|a| a.alive && point_in_circle(bullet_pos, a.pos, a.radius))
        else {
            continue;
        };

        state.bullets[bullet_idx].retire();
        let (pos, radius, generation, color, splits, base) = {
            let asteroid = &mut state.asteroids[asteroid_idx];
            asteroid.alive = false;
            (
                asteroid.pos,
                asteroid.radius,
                asteroid.generation,
                asteroid.color,
                asteroid.splits(),
                asteroid.base_score(),
            )
        };
        hits += 1;

        state.add_score(base * u64::from(state.wave));
        state.explode(pos, color, (radius / 2.0) as usize);
        log::debug!(
            "Asteroid gen {} destroyed at ({:.0}, {:.0}), score {}",
            generation,
            pos.x,
            pos.y,
            state.score
        );

        if splits {
            for _ in 0..SPLIT_CHILDREN {
                let mut child = Asteroid::spawn(
                    &mut state.rng,
                    pos,
                    generation + 1,
                    Some(radius * SPLIT_RADIUS_RATIO),
                );
                let angle = state.rng.random_range(0.0..TAU);
                let kick = state.rng.random_range(1.0..2.0);
                child.vel += heading(angle) * kick;
                // A parent straddling the seam may lie outside the child's band
                state.arena.wrap(&mut child.pos, child.radius);
                children.push(child);
            }
        }
    }

    state.asteroids.extend(children);
    hits
}

/// Ship vs asteroid. Returns true if the ship was destroyed this tick.
pub fn resolve_ship_hit(state: &mut GameState) -> bool {
    if !state.ship.is_vulnerable() {
        return false;
    }

    let ship_pos = state.ship.pos;
    let ship_radius = state.ship.radius;
    let hit = state
        .asteroids
        .iter()
        .any(|a| a.alive && circles_overlap(ship_pos, ship_radius, a.pos, a.radius));
    if !hit {
        return false;
    }

    state.explode(ship_pos, Palette::Magenta, SHIP_EXPLOSION_PARTICLES);
    state.lives = state.lives.saturating_sub(1);
    state.events.push(GameEvent::ShipDestroyed {
        lives_left: state.lives,
    });

    if state.lives == 0 {
        end_run(state);
        return true;
    }

    log::info!("Ship destroyed, {} lives left", state.lives);
    clear_spawn_zone(state);
    let arena = state.arena;
    state.ship.respawn(&arena);
    true
}

/// Shove asteroids out of the respawn area around the arena center.
///
/// Asteroids are moved, never deleted.
pub fn clear_spawn_zone(state: &mut GameState) {
    let center = state.arena.center();
    for asteroid in &mut state.asteroids {
        let offset = asteroid.pos - center;
        if offset.length() < RESPAWN_SAFE_RADIUS + asteroid.radius {
            let bearing = offset.y.atan2(offset.x);
            let distance = RESPAWN_SAFE_RADIUS + asteroid.radius + RESPAWN_CLEAR_MARGIN;
            asteroid.pos = center + heading(bearing) * distance;
            state.arena.wrap(&mut asteroid.pos, asteroid.radius);
        }
    }
}

/// Start the next wave once every asteroid is gone. Returns true if it did.
pub fn resolve_wave_clear(state: &mut GameState) -> bool {
    if state.asteroids.iter().any(|a| a.alive) {
        return false;
    }

    state.wave += 1;
    state.spawn_wave_asteroids();
    let bonus = u64::from(state.wave) * WAVE_BONUS;
    state.add_score(bonus);
    state.events.push(GameEvent::WaveCleared {
        wave: state.wave,
        bonus,
    });
    log::info!("Wave {} begins (+{} bonus)", state.wave, bonus);
    true
}

/// Finish the run and ask the frontend to record the score
pub fn end_run(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.events.push(GameEvent::GameOver {
        score: state.score,
        wave: state.wave,
    });
    log::info!("Game over: score {} on wave {}", state.score, state.wave);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A still asteroid with exact geometry
    fn rock(state: &mut GameState, pos: Vec2, generation: u8, radius: f32) -> Asteroid {
        let mut a = Asteroid::spawn(state.rng_mut(), pos, generation, Some(radius));
        a.vel = Vec2::ZERO;
        a
    }

    /// Session with only the given asteroids and a vulnerable ship at center
    fn field(asteroids: &[(Vec2, u8, f32)]) -> GameState {
        let mut state = GameState::new(77);
        state.asteroids.clear();
        for &(pos, generation, radius) in asteroids {
            let a = rock(&mut state, pos, generation, radius);
            state.asteroids.push(a);
        }
        state
    }

    fn bullet_at(pos: Vec2) -> Bullet {
        Bullet::new(pos, Vec2::X)
    }

    #[test]
    fn test_bullet_at_center_hits() {
        let mut state = field(&[(Vec2::new(100.0, 100.0), 2, 20.0)]);
        state.bullets.push(bullet_at(Vec2::new(100.0, 100.0)));
        assert_eq!(resolve_bullet_hits(&mut state), 1);
        assert!(!state.bullets[0].is_alive());
        assert!(!state.asteroids[0].alive);
    }

    #[test]
    fn test_bullet_on_rim_misses() {
        let mut state = field(&[(Vec2::new(100.0, 100.0), 2, 20.0)]);
        state.bullets.push(bullet_at(Vec2::new(120.0, 100.0)));
        assert_eq!(resolve_bullet_hits(&mut state), 0);
        assert!(state.bullets[0].is_alive());
        assert!(state.asteroids[0].alive);
    }

    #[test]
    fn test_large_and_medium_split_into_two() {
        for generation in [0u8, 1] {
            let mut state = field(&[(Vec2::new(300.0, 300.0), generation, 40.0)]);
            state.bullets.push(bullet_at(Vec2::new(305.0, 300.0)));
            resolve(&mut state);

            assert_eq!(state.asteroids.len(), 2);
            for child in &state.asteroids {
                assert_eq!(child.generation, generation + 1);
                assert!((child.radius - 24.0).abs() < 1e-4);
                assert_eq!(child.pos, Vec2::new(300.0, 300.0));
                assert!(child.vel.length() > 0.0);
            }
        }
    }

    #[test]
    fn test_children_of_seam_parent_stay_in_band() {
        let radius = 60.0;
        let parent = Vec2::new(-(radius - 1.0), 300.0);
        let mut state = field(&[
            (parent, 0, radius),
            (Vec2::new(600.0, 100.0), 0, 40.0),
        ]);
        state.bullets.push(bullet_at(parent));
        resolve_bullet_hits(&mut state);

        let children: Vec<_> = state.asteroids.iter().filter(|a| a.generation == 1).collect();
        assert_eq!(children.len(), 2);
        for child in children {
            assert!(
                state.arena.contains(child.pos, child.radius),
                "child escaped to {:?}",
                child.pos
            );
            assert_eq!(child.pos, Vec2::new(state.arena.width + child.radius, 300.0));
        }
    }

    #[test]
    fn test_small_does_not_split() {
        let mut state = field(&[
            (Vec2::new(300.0, 300.0), 2, 18.0),
            (Vec2::new(700.0, 100.0), 0, 50.0),
        ]);
        state.bullets.push(bullet_at(Vec2::new(300.0, 300.0)));
        resolve(&mut state);
        assert_eq!(state.asteroids.len(), 1);
        assert_eq!(state.asteroids[0].generation, 0);
    }

    #[test]
    fn test_score_uses_tier_and_wave() {
        let mut state = field(&[
            (Vec2::new(100.0, 100.0), 0, 50.0),
            (Vec2::new(400.0, 100.0), 1, 30.0),
            (Vec2::new(700.0, 100.0), 2, 15.0),
        ]);
        state.wave = 3;
        for x in [100.0, 400.0, 700.0] {
            state.bullets.push(bullet_at(Vec2::new(x, 100.0)));
        }
        assert_eq!(resolve_bullet_hits(&mut state), 3);
        assert_eq!(state.score, (100 + 50 + 25) * 3);
    }

    #[test]
    fn test_bullet_resolves_one_asteroid_first_inserted_wins() {
        let mut state = field(&[
            (Vec2::new(200.0, 200.0), 2, 30.0),
            (Vec2::new(210.0, 200.0), 2, 30.0),
        ]);
        state.bullets.push(bullet_at(Vec2::new(205.0, 200.0)));
        assert_eq!(resolve_bullet_hits(&mut state), 1);
        assert!(!state.asteroids[0].alive);
        assert!(state.asteroids[1].alive);
    }

    #[test]
    fn test_split_children_not_hit_same_tick() {
        let mut state = field(&[(Vec2::new(200.0, 200.0), 0, 50.0)]);
        state.bullets.push(bullet_at(Vec2::new(200.0, 200.0)));
        state.bullets.push(bullet_at(Vec2::new(200.0, 200.0)));
        assert_eq!(resolve_bullet_hits(&mut state), 1);
        assert!(state.bullets[1].is_alive());
    }

    #[test]
    fn test_ship_hit_costs_life_and_respawns() {
        let center = GameState::new(1).arena.center();
        let mut state = field(&[
            (center + Vec2::new(10.0, 0.0), 0, 40.0),
            (Vec2::new(40.0, 40.0), 0, 30.0),
        ]);
        state.ship.pos = center + Vec2::new(5.0, 0.0);
        state.ship.vel = Vec2::new(2.0, 0.0);

        assert!(resolve_ship_hit(&mut state));
        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.ship.pos, center);
        assert_eq!(state.ship.vel, Vec2::ZERO);
        assert!(!state.ship.is_vulnerable());

        // The encroaching asteroid was pushed out, not removed
        assert_eq!(state.asteroids.len(), 2);
        let pushed = &state.asteroids[0];
        let expected = RESPAWN_SAFE_RADIUS + 40.0 + RESPAWN_CLEAR_MARGIN;
        assert!((pushed.pos.distance(center) - expected).abs() < 1e-3);
        assert_eq!(state.asteroids[1].pos, Vec2::new(40.0, 40.0));

        assert!(state
            .events
            .contains(&GameEvent::ShipDestroyed { lives_left: 2 }));
    }

    #[test]
    fn test_invulnerable_ship_ignores_asteroids() {
        let center = GameState::new(1).arena.center();
        let mut state = field(&[(center, 0, 40.0)]);
        let arena = state.arena;
        state.ship.respawn(&arena);
        assert!(!resolve_ship_hit(&mut state));
        assert_eq!(state.lives, STARTING_LIVES);

        state.ship.invulnerable = 0;
        state.ship.respawn_cooldown = 1;
        assert!(!resolve_ship_hit(&mut state));

        state.ship.respawn_cooldown = 0;
        assert!(resolve_ship_hit(&mut state));
        assert_eq!(state.lives, STARTING_LIVES - 1);
    }

    #[test]
    fn test_last_life_ends_run() {
        let center = GameState::new(1).arena.center();
        let mut state = field(&[(center, 0, 40.0)]);
        state.lives = 1;
        state.score = 1234;
        resolve(&mut state);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver {
            score: 1234,
            wave: 1
        }));
    }

    #[test]
    fn test_wave_clear_bonus() {
        let mut state = field(&[(Vec2::new(100.0, 100.0), 2, 15.0)]);
        state.bullets.push(bullet_at(Vec2::new(100.0, 100.0)));
        resolve(&mut state);

        assert_eq!(state.wave, 2);
        assert_eq!(state.score, 25 + 2 * WAVE_BONUS);
        assert_eq!(
            state.asteroids.len() as u32,
            GameState::asteroid_count_for_wave(2)
        );
        for a in &state.asteroids {
            assert_eq!(a.generation, 0);
            assert!(a.pos.distance(state.ship.pos) >= WAVE_SPAWN_SAFE_DISTANCE);
        }
        assert!(state.events.contains(&GameEvent::WaveCleared {
            wave: 2,
            bonus: 2000
        }));
    }

    #[test]
    fn test_no_wave_clear_with_asteroids_left() {
        let mut state = field(&[(Vec2::new(100.0, 100.0), 0, 40.0)]);
        assert!(!resolve_wave_clear(&mut state));
        assert_eq!(state.wave, 1);
    }

    #[test]
    fn test_repulsion_is_symmetric() {
        let mut state = field(&[
            (Vec2::new(100.0, 100.0), 0, 30.0),
            (Vec2::new(140.0, 100.0), 0, 30.0),
            (Vec2::new(600.0, 500.0), 0, 30.0),
        ]);
        repel_asteroids(&mut state.asteroids);
        let a = state.asteroids[0].vel;
        let b = state.asteroids[1].vel;
        // overlap 20 * 0.01, applied from both sides
        assert!((a.x + 0.4).abs() < 1e-5 && a.y.abs() < 1e-6);
        assert!((b.x - 0.4).abs() < 1e-5 && b.y.abs() < 1e-6);
        assert_eq!(state.asteroids[2].vel, Vec2::ZERO);
    }

    #[test]
    fn test_repulsion_skips_coincident_centers() {
        let mut state = field(&[
            (Vec2::new(100.0, 100.0), 0, 30.0),
            (Vec2::new(100.0, 100.0), 0, 30.0),
        ]);
        repel_asteroids(&mut state.asteroids);
        assert_eq!(state.asteroids[0].vel, Vec2::ZERO);
        assert_eq!(state.asteroids[1].vel, Vec2::ZERO);
    }
}
