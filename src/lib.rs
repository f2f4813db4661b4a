//! Neon Asteroids - A wrapped-arena Asteroids arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, wraparound, collisions, game state)
//! - `renderer`: WebGPU rendering pipeline
//! - `highscores`: Top-5 leaderboard persisted to LocalStorage
//! - `settings`: Player preferences
//! - `audio`: Procedural Web Audio tones (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
///
/// Distances are in arena pixels, speeds in pixels per tick, durations in ticks.
pub mod consts {
    /// Simulation rate (one tick per display frame at 60 Hz)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Ship
    pub const SHIP_RADIUS: f32 = 15.0;
    pub const SHIP_TURN_RATE: f32 = 0.1;
    pub const SHIP_THRUST: f32 = 0.25;
    pub const SHIP_MAX_SPEED: f32 = 8.0;
    /// Multiplicative drag applied every tick
    pub const SHIP_DRAG: f32 = 0.99;
    pub const SHIP_INVULNERABLE_TICKS: u32 = 120;
    /// Post-respawn window in which asteroids cannot hit the ship
    pub const SHIP_RESPAWN_COOLDOWN_TICKS: u32 = 30;
    /// Minimum ticks between shots (~120 ms)
    pub const FIRE_INTERVAL_TICKS: u32 = 7;
    pub const STARTING_LIVES: u8 = 3;

    /// Bullets
    pub const BULLET_SPEED: f32 = 10.0;
    pub const BULLET_LIFETIME_TICKS: u32 = 80;
    pub const BULLET_TRAIL_LENGTH: usize = 5;

    /// Asteroids, indexed by generation
    pub const ASTEROID_BASE_RADII: [f32; 3] = [60.0, 35.0, 18.0];
    pub const ASTEROID_RADIUS_JITTER: f32 = 5.0;
    /// Generation that no longer splits
    pub const TERMINAL_GENERATION: u8 = 2;
    pub const ASTEROID_SCORES: [u64; 3] = [100, 50, 25];
    pub const SPLIT_RADIUS_RATIO: f32 = 0.6;
    pub const SPLIT_CHILDREN: usize = 2;
    pub const ASTEROID_MIN_SPEED: f32 = 0.5;
    pub const ASTEROID_SPEED_RANGE: f32 = 1.5;
    /// Speed multiplier gained per generation (smaller = faster)
    pub const ASTEROID_SPEED_PER_GENERATION: f32 = 0.3;
    pub const ASTEROID_MAX_SPIN: f32 = 0.02;
    /// Overlap-proportional push between touching asteroids
    pub const ASTEROID_REPULSION: f32 = 0.01;

    /// Waves
    pub const FIRST_WAVE: u32 = 1;
    pub const WAVE_BASE_ASTEROIDS: u32 = 4;
    pub const WAVE_MAX_ASTEROIDS: u32 = 10;
    pub const WAVE_BONUS: u64 = 1000;
    /// Fresh asteroids never spawn closer than this to the ship
    pub const WAVE_SPAWN_SAFE_DISTANCE: f32 = 150.0;
    pub const WAVE_SPAWN_ATTEMPTS: u32 = 50;

    /// Respawn clearance around the arena center
    pub const RESPAWN_SAFE_RADIUS: f32 = 100.0;
    pub const RESPAWN_CLEAR_MARGIN: f32 = 20.0;

    /// Particles
    pub const MAX_PARTICLES: usize = 512;
    pub const PARTICLE_DRAG: f32 = 0.98;
    pub const SHIP_EXPLOSION_PARTICLES: usize = 50;
}

/// Unit vector pointing along `angle` (radians, 0 = +x, clockwise on screen)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::from_angle(angle)
}

/// Scale `v` down so its length does not exceed `max`
#[inline]
pub fn clamp_speed(v: Vec2, max: f32) -> Vec2 {
    if v.length() > max {
        v.normalize_or_zero() * max
    } else {
        v
    }
}
