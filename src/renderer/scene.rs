//! Scene tessellation
//!
//! Turns a `GameState` into one triangle list in arena coordinates. Text (HUD
//! and overlays) lives in the DOM, not here.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, palette_color, with_alpha};
use crate::settings::Settings;
use crate::sim::{Asteroid, Bullet, GameState, Particle, Ship};

/// Stroke widths in arena pixels
const SHIP_STROKE: f32 = 2.0;
const FLAME_STROKE: f32 = 3.0;
const ASTEROID_STROKE: f32 = 2.0;
const ICON_STROKE: f32 = 2.0;
/// Alpha of the faint asteroid body fill
const ASTEROID_FILL_ALPHA: f32 = 0.06;
const BULLET_SIZE: f32 = 4.0;
const TRAIL_SIZE: f32 = 2.0;
const TRAIL_MAX_ALPHA: f32 = 0.5;
/// Ship blink half-period while invulnerable
const BLINK_TICKS: u32 = 3;

/// Ship outline in local space (nose along +x), in units of ship radius
const SHIP_HULL: [Vec2; 4] = [
    Vec2::new(1.0, 0.0),
    Vec2::new(-1.0, -0.8),
    Vec2::new(-0.5, 0.0),
    Vec2::new(-1.0, 0.8),
];

/// Spare-life icons along the top-right corner
const LIFE_ICON_SCALE: f32 = 6.0;
const LIFE_ICON_MARGIN: Vec2 = Vec2::new(40.0, 30.0);
const LIFE_ICON_SPACING: f32 = 25.0;

/// Build the full frame
pub fn build_scene(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let glow = settings.quality.glow_enabled();
    let mut out = Vec::with_capacity(4096);

    arena_frame(&mut out, state);

    ship(&mut out, &state.ship, state.time_ticks, glow);
    for asteroid in &state.asteroids {
        asteroid_shape(&mut out, asteroid, glow);
    }
    for bullet in &state.bullets {
        bullet_shape(&mut out, bullet, settings, glow);
    }
    for particle in &state.particles {
        particle_shape(&mut out, particle);
    }

    life_icons(&mut out, state);
    out
}

fn arena_frame(out: &mut Vec<Vertex>, state: &GameState) {
    let w = state.arena.width;
    let h = state.arena.height;
    let corners = [
        Vec2::ZERO,
        Vec2::new(w, 0.0),
        Vec2::new(w, h),
        Vec2::new(0.0, h),
    ];
    shapes::polyline(out, &corners, true, 1.0, colors::ARENA_EDGE);
}

/// White/magenta alternation while shielded, plain white otherwise
pub fn ship_color(ship: &Ship) -> [f32; 4] {
    if ship.invulnerable % (BLINK_TICKS * 2) < BLINK_TICKS {
        colors::WHITE
    } else {
        colors::MAGENTA
    }
}

fn ship(out: &mut Vec<Vertex>, ship: &Ship, time_ticks: u64, glow: bool) {
    for particle in &ship.thrust_particles {
        particle_shape(out, particle);
    }

    let hull = shapes::transform(&SHIP_HULL, ship.pos, ship.angle, ship.radius);
    shapes::neon_polyline(out, &hull, true, SHIP_STROKE, ship_color(ship), glow);

    if ship.thrusting {
        // Cheap flicker that stays deterministic for a given tick
        let flicker = ((time_ticks.wrapping_mul(7919) % 100) as f32) / 100.0;
        let flame_len = 1.2 + flicker * 0.5;
        let flame = [
            Vec2::new(-0.5, -3.0 / ship.radius),
            Vec2::new(-flame_len, 0.0),
            Vec2::new(-0.5, 3.0 / ship.radius),
        ];
        let flame = shapes::transform(&flame, ship.pos, ship.angle, ship.radius);
        shapes::neon_polyline(out, &flame, false, FLAME_STROKE, colors::CYAN, glow);
    }
}

fn asteroid_shape(out: &mut Vec<Vertex>, asteroid: &Asteroid, glow: bool) {
    let color = palette_color(asteroid.color);
    let outline = shapes::transform(&asteroid.vertices, asteroid.pos, asteroid.rotation, 1.0);
    shapes::fan(out, asteroid.pos, &outline, with_alpha(color, ASTEROID_FILL_ALPHA));
    shapes::neon_polyline(out, &outline, true, ASTEROID_STROKE, color, glow);
}

fn bullet_shape(out: &mut Vec<Vertex>, bullet: &Bullet, settings: &Settings, glow: bool) {
    let shown = settings.trail_segments(bullet.trail.len());
    let len = bullet.trail.len() as f32;
    for (i, &pos) in bullet.trail.iter().take(shown).enumerate() {
        let alpha = (len - i as f32) / len * TRAIL_MAX_ALPHA;
        shapes::square(out, pos, TRAIL_SIZE, with_alpha(colors::WHITE, alpha));
    }
    shapes::neon_square(out, bullet.pos, BULLET_SIZE, colors::WHITE, glow);
}

fn particle_shape(out: &mut Vec<Vertex>, particle: &Particle) {
    let color = with_alpha(palette_color(particle.color), particle.alpha());
    shapes::square(out, particle.pos, particle.size, color);
}

fn life_icons(out: &mut Vec<Vertex>, state: &GameState) {
    let spare = state.lives.saturating_sub(1);
    for i in 0..spare {
        let origin = Vec2::new(
            state.arena.width - LIFE_ICON_MARGIN.x - f32::from(i) * LIFE_ICON_SPACING,
            LIFE_ICON_MARGIN.y,
        );
        let icon = shapes::transform(&SHIP_HULL, origin, 0.0, LIFE_ICON_SCALE);
        shapes::polyline(out, &icon, true, ICON_STROKE, colors::CYAN);
    }
}
