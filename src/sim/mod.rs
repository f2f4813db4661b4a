//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies; side effects leave as `GameEvent`s

pub mod arena;
pub mod collision;
pub mod events;
pub mod state;
pub mod tick;

pub use arena::Arena;
pub use collision::{circles_overlap, point_in_circle};
pub use events::{GameEvent, Tone, Waveform};
pub use state::{Asteroid, Bullet, GamePhase, GameState, Palette, Particle, Ship};
pub use tick::{TickInput, tick};
