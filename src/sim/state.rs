//! Game state and core simulation types
//!
//! The whole session lives in one `GameState` owned by the frontend and handed
//! to `tick` every frame. No ambient globals.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use super::arena::Arena;
use super::events::GameEvent;
use crate::consts::*;
use crate::{clamp_speed, heading};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay, the only phase that runs the simulation
    Playing,
    /// Frozen, overlay shown
    Paused,
    /// Frozen, controls overlay shown
    Help,
    /// Run ended, waiting for restart
    GameOver,
}

/// Neon color tags shared by entities and the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Cyan,
    Magenta,
    Green,
    Yellow,
    White,
}

impl Palette {
    /// Colors an asteroid can be tinted with
    pub const ASTEROID: [Palette; 4] = [
        Palette::Cyan,
        Palette::Magenta,
        Palette::Green,
        Palette::Yellow,
    ];

    pub fn random_asteroid<R: Rng>(rng: &mut R) -> Self {
        Self::ASTEROID[rng.random_range(0..Self::ASTEROID.len())]
    }
}

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks remaining
    pub life: u32,
    pub max_life: u32,
    pub color: Palette,
    pub size: f32,
}

impl Particle {
    /// One spark flying off from `pos` in a random direction
    pub fn spark<R: Rng>(rng: &mut R, pos: Vec2, color: Palette) -> Self {
        let angle = rng.random_range(0.0..TAU);
        let speed = rng.random_range(2.0..6.0);
        let life = rng.random_range(30..50);
        Self {
            pos,
            vel: heading(angle) * speed,
            life,
            max_life: life,
            color,
            size: rng.random_range(1.0..3.0),
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel *= PARTICLE_DRAG;
        self.life = self.life.saturating_sub(1);
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Fade factor for rendering (1 = fresh, 0 = expired)
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

/// A bullet fired by the ship
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks remaining; zero means retired
    pub life: u32,
    /// Past positions for rendering (newest first)
    pub trail: Vec<Vec2>,
}

impl Bullet {
    pub fn new(pos: Vec2, direction: Vec2) -> Self {
        Self {
            pos,
            vel: direction.normalize_or_zero() * BULLET_SPEED,
            life: BULLET_LIFETIME_TICKS,
            trail: Vec::with_capacity(BULLET_TRAIL_LENGTH + 1),
        }
    }

    /// Record trail, move, age, wrap. Bullets are points (radius 0).
    pub fn update(&mut self, arena: &Arena) {
        self.trail.insert(0, self.pos);
        self.trail.truncate(BULLET_TRAIL_LENGTH);

        self.pos += self.vel;
        self.life = self.life.saturating_sub(1);
        arena.wrap(&mut self.pos, 0.0);
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Take the bullet out of play; it is pruned at the end of the tick
    pub fn retire(&mut self) {
        self.life = 0;
    }
}

/// A drifting rock
#[derive(Debug, Clone)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Nominal radius, used for collisions
    pub radius: f32,
    /// 0 = large, 1 = medium, 2 = small
    pub generation: u8,
    /// Outline offsets from `pos` before rotation (render only)
    pub vertices: Vec<Vec2>,
    pub rotation: f32,
    pub spin: f32,
    pub color: Palette,
    pub alive: bool,
}

impl Asteroid {
    /// Create an asteroid of `generation` at `pos`.
    ///
    /// Without an explicit `radius` the size comes from the generation's tier
    /// with a little jitter. Smaller generations move faster.
    pub fn spawn<R: Rng>(rng: &mut R, pos: Vec2, generation: u8, radius: Option<f32>) -> Self {
        let tier = usize::from(generation.min(TERMINAL_GENERATION));
        let radius = radius.unwrap_or_else(|| {
            ASTEROID_BASE_RADII[tier]
                + rng.random_range(-ASTEROID_RADIUS_JITTER..ASTEROID_RADIUS_JITTER)
        });

        let speed_multiplier = 1.0 + f32::from(generation) * ASTEROID_SPEED_PER_GENERATION;
        let dir = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5);
        let speed = ASTEROID_MIN_SPEED + rng.random::<f32>() * ASTEROID_SPEED_RANGE;
        let vel = dir.normalize_or_zero() * speed * speed_multiplier;

        let spin = (rng.random::<f32>() - 0.5) * ASTEROID_MAX_SPIN;
        let color = Palette::random_asteroid(rng);
        let vertices = asteroid_outline(rng, radius);

        Self {
            pos,
            vel,
            radius,
            generation,
            vertices,
            rotation: 0.0,
            spin,
            color,
            alive: true,
        }
    }

    pub fn update(&mut self, arena: &Arena) {
        self.pos += self.vel;
        self.rotation += self.spin;
        arena.wrap(&mut self.pos, self.radius);
    }

    /// Whether a hit breaks this asteroid into children
    #[inline]
    pub fn splits(&self) -> bool {
        self.generation < TERMINAL_GENERATION
    }

    /// Points for destroying this asteroid before the wave multiplier
    pub fn base_score(&self) -> u64 {
        ASTEROID_SCORES[usize::from(self.generation.min(TERMINAL_GENERATION))]
    }
}

/// Random lumpy polygon: 6-11 evenly spaced vertices with angle and radius jitter
pub fn asteroid_outline<R: Rng>(rng: &mut R, radius: f32) -> Vec<Vec2> {
    let edge_count = rng.random_range(6..12);
    let step = TAU / edge_count as f32;
    (0..edge_count)
        .map(|i| {
            let r = radius * (0.9 + rng.random::<f32>() * 0.4);
            let angle = i as f32 * step + (rng.random::<f32>() - 0.5) * 0.3;
            heading(angle) * r
        })
        .collect()
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in radians
    pub angle: f32,
    pub radius: f32,
    /// Ticks of blinking invulnerability left
    pub invulnerable: u32,
    /// Ticks left in the post-respawn no-collision window
    pub respawn_cooldown: u32,
    /// Ticks until the gun may fire again
    pub fire_cooldown: u32,
    /// Engine burning this tick (drives the flame)
    pub thrusting: bool,
    /// Exhaust particles, owned by the ship and cleared on respawn
    pub thrust_particles: Vec<Particle>,
}

impl Ship {
    pub fn new(arena: &Arena) -> Self {
        Self {
            pos: arena.center(),
            vel: Vec2::ZERO,
            angle: 0.0,
            radius: SHIP_RADIUS,
            invulnerable: 0,
            respawn_cooldown: 0,
            fire_cooldown: 0,
            thrusting: false,
            thrust_particles: Vec::new(),
        }
    }

    /// Back to center, stationary, shielded
    pub fn respawn(&mut self, arena: &Arena) {
        self.pos = arena.center();
        self.vel = Vec2::ZERO;
        self.angle = 0.0;
        self.invulnerable = SHIP_INVULNERABLE_TICKS;
        self.respawn_cooldown = SHIP_RESPAWN_COOLDOWN_TICKS;
        self.thrusting = false;
        self.thrust_particles.clear();
    }

    /// Asteroids can only hurt the ship outside both protection windows
    #[inline]
    pub fn is_vulnerable(&self) -> bool {
        self.invulnerable == 0 && self.respawn_cooldown == 0
    }

    pub fn direction(&self) -> Vec2 {
        heading(self.angle)
    }

    /// Rotate by `turn` steps (-1 left, +1 right)
    pub fn turn(&mut self, turn: f32) {
        self.angle += turn * SHIP_TURN_RATE;
    }

    /// Spawn a bullet if the gun has cooled down
    pub fn try_fire(&mut self) -> Option<Bullet> {
        if self.fire_cooldown > 0 {
            return None;
        }
        self.fire_cooldown = FIRE_INTERVAL_TICKS;
        Some(Bullet::new(self.pos, self.direction()))
    }

    /// Thrust, drag, integrate, wrap and tick timers down.
    ///
    /// At most `exhaust_cap` exhaust sparks are kept; zero disables them.
    /// Returns true if the engine fired this tick.
    pub fn update<R: Rng>(
        &mut self,
        thrust: bool,
        arena: &Arena,
        exhaust_cap: usize,
        rng: &mut R,
    ) -> bool {
        self.thrusting = thrust;
        if thrust {
            self.vel += self.direction() * SHIP_THRUST;
            if exhaust_cap > 0 {
                let exhaust = self.pos - self.direction() * self.radius * 0.8;
                self.thrust_particles
                    .push(Particle::spark(rng, exhaust, Palette::Cyan));
            }
        }

        self.vel = clamp_speed(self.vel, SHIP_MAX_SPEED);
        self.vel *= SHIP_DRAG;
        self.pos += self.vel;
        arena.wrap(&mut self.pos, self.radius);

        self.invulnerable = self.invulnerable.saturating_sub(1);
        self.respawn_cooldown = self.respawn_cooldown.saturating_sub(1);
        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);

        for particle in &mut self.thrust_particles {
            particle.update();
        }
        self.thrust_particles.retain(Particle::is_alive);
        let excess = self.thrust_particles.len().saturating_sub(exhaust_cap);
        self.thrust_particles.drain(..excess);

        thrust
    }
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub arena: Arena,
    pub phase: GamePhase,
    /// Score (never decreases within a run)
    pub score: u64,
    pub lives: u8,
    /// Current wave, starting at 1
    pub wave: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub ship: Ship,
    /// Live asteroids in insertion order
    pub asteroids: Vec<Asteroid>,
    pub bullets: Vec<Bullet>,
    /// Explosion particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Oldest sparks are dropped beyond this many
    pub particle_cap: usize,
    /// Events raised since the frontend last drained them
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a new session with the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_rng(seed, Pcg32::seed_from_u64(seed))
    }

    /// Create a session drawing from an explicit random source
    pub fn with_rng(seed: u64, rng: Pcg32) -> Self {
        let arena = Arena::default();
        let mut state = Self {
            seed,
            arena,
            phase: GamePhase::Playing,
            score: 0,
            lives: STARTING_LIVES,
            wave: FIRST_WAVE,
            time_ticks: 0,
            ship: Ship::new(&arena),
            asteroids: Vec::new(),
            bullets: Vec::new(),
            particles: Vec::new(),
            particle_cap: MAX_PARTICLES,
            events: Vec::new(),
            rng,
        };
        state.spawn_wave_asteroids();
        state
    }

    /// Start a fresh run. The random stream carries on so runs differ.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.wave = FIRST_WAVE;
        self.time_ticks = 0;
        self.ship = Ship::new(&self.arena);
        self.bullets.clear();
        self.particles.clear();
        self.events.clear();
        self.spawn_wave_asteroids();
        log::info!("New run started (seed {})", self.seed);
    }

    /// Number of large asteroids in a wave
    pub fn asteroid_count_for_wave(wave: u32) -> u32 {
        (WAVE_BASE_ASTEROIDS + wave).min(WAVE_MAX_ASTEROIDS)
    }

    /// Replace the asteroid field with a fresh set for the current wave,
    /// keeping clear of the ship.
    pub fn spawn_wave_asteroids(&mut self) {
        let count = Self::asteroid_count_for_wave(self.wave);
        self.asteroids.clear();
        for _ in 0..count {
            let mut pos = self.random_point();
            let mut attempts = 1;
            while attempts < WAVE_SPAWN_ATTEMPTS
                && pos.distance(self.ship.pos) < WAVE_SPAWN_SAFE_DISTANCE
            {
                pos = self.random_point();
                attempts += 1;
            }
            let asteroid = Asteroid::spawn(&mut self.rng, pos, 0, None);
            self.asteroids.push(asteroid);
        }
        log::debug!("Wave {}: spawned {} asteroids", self.wave, count);
    }

    fn random_point(&mut self) -> Vec2 {
        Vec2::new(
            self.rng.random::<f32>() * self.arena.width,
            self.rng.random::<f32>() * self.arena.height,
        )
    }

    /// Burst of `count` sparks at `pos`
    pub fn explode(&mut self, pos: Vec2, color: Palette, count: usize) {
        self.events.push(GameEvent::Explosion { pos });
        if self.particle_cap == 0 {
            return;
        }
        for _ in 0..count {
            let spark = Particle::spark(&mut self.rng, pos, color);
            self.particles.push(spark);
        }
        // Oldest sparks go first
        let excess = self.particles.len().saturating_sub(self.particle_cap);
        self.particles.drain(..excess);
    }

    /// Award points. Scores only ever go up.
    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Random source for tests and tools that need to stay in step
    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_new_session() {
        let state = GameState::new(42);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.wave, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.asteroids.len(), 5);
        assert!(state.asteroids.iter().all(|a| a.generation == 0 && a.alive));
        assert_eq!(state.ship.pos, state.arena.center());
    }

    #[test]
    fn test_wave_count_caps() {
        assert_eq!(GameState::asteroid_count_for_wave(1), 5);
        assert_eq!(GameState::asteroid_count_for_wave(6), 10);
        assert_eq!(GameState::asteroid_count_for_wave(40), 10);
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = GameState::new(1234);
        let b = GameState::new(1234);
        assert_eq!(a.asteroids.len(), b.asteroids.len());
        for (x, y) in a.asteroids.iter().zip(&b.asteroids) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.radius, y.radius);
            assert_eq!(x.vertices, y.vertices);
        }
    }

    #[test]
    fn test_asteroid_tiers() {
        let mut rng = rng();
        for generation in 0..=2u8 {
            for _ in 0..50 {
                let a = Asteroid::spawn(&mut rng, Vec2::ZERO, generation, None);
                let base = ASTEROID_BASE_RADII[usize::from(generation)];
                assert!((a.radius - base).abs() <= ASTEROID_RADIUS_JITTER);
                let max_speed = (ASTEROID_MIN_SPEED + ASTEROID_SPEED_RANGE)
                    * (1.0 + f32::from(generation) * ASTEROID_SPEED_PER_GENERATION);
                assert!(a.vel.length() <= max_speed + 1e-4);
                assert!(a.spin.abs() <= ASTEROID_MAX_SPIN / 2.0);
                assert!(Palette::ASTEROID.contains(&a.color));
            }
        }
    }

    #[test]
    fn test_asteroid_explicit_radius() {
        let a = Asteroid::spawn(&mut rng(), Vec2::new(5.0, 5.0), 1, Some(21.0));
        assert_eq!(a.radius, 21.0);
        assert_eq!(a.generation, 1);
        assert!(a.splits());
        assert_eq!(a.base_score(), 50);
    }

    #[test]
    fn test_asteroid_outline() {
        let mut rng = rng();
        for _ in 0..100 {
            let verts = asteroid_outline(&mut rng, 40.0);
            assert!((6..=11).contains(&verts.len()));
            for v in &verts {
                let r = v.length();
                assert!((36.0 - 1e-3..=52.0 + 1e-3).contains(&r), "vertex radius {r}");
            }
        }
    }

    #[test]
    fn test_ship_drag_and_speed_cap() {
        let arena = Arena::default();
        let mut ship = Ship::new(&arena);
        let mut rng = rng();
        for _ in 0..200 {
            ship.update(true, &arena, MAX_PARTICLES, &mut rng);
            assert!(ship.vel.length() <= SHIP_MAX_SPEED);
        }
        assert!(!ship.thrust_particles.is_empty());

        let before = ship.vel.length();
        ship.update(false, &arena, MAX_PARTICLES, &mut rng);
        assert!((ship.vel.length() - before * SHIP_DRAG).abs() < 1e-3);
        assert!(!ship.thrusting);
    }

    #[test]
    fn test_ship_timers_floor_at_zero() {
        let arena = Arena::default();
        let mut ship = Ship::new(&arena);
        ship.respawn(&arena);
        assert!(!ship.is_vulnerable());
        for _ in 0..SHIP_INVULNERABLE_TICKS + 10 {
            ship.update(false, &arena, MAX_PARTICLES, &mut rng());
        }
        assert_eq!(ship.invulnerable, 0);
        assert_eq!(ship.respawn_cooldown, 0);
        assert_eq!(ship.fire_cooldown, 0);
        assert!(ship.is_vulnerable());
    }

    #[test]
    fn test_ship_respawn_resets() {
        let arena = Arena::default();
        let mut ship = Ship::new(&arena);
        ship.pos = Vec2::new(10.0, 10.0);
        ship.vel = Vec2::new(3.0, 1.0);
        ship.angle = 2.0;
        ship.update(true, &arena, MAX_PARTICLES, &mut rng());
        ship.respawn(&arena);
        assert_eq!(ship.pos, arena.center());
        assert_eq!(ship.vel, Vec2::ZERO);
        assert_eq!(ship.angle, 0.0);
        assert_eq!(ship.invulnerable, SHIP_INVULNERABLE_TICKS);
        assert_eq!(ship.respawn_cooldown, SHIP_RESPAWN_COOLDOWN_TICKS);
        assert!(ship.thrust_particles.is_empty());
    }

    #[test]
    fn test_fire_rate_limit() {
        let arena = Arena::default();
        let mut ship = Ship::new(&arena);
        let mut rng = rng();
        assert!(ship.try_fire().is_some());
        assert!(ship.try_fire().is_none());
        for _ in 0..FIRE_INTERVAL_TICKS {
            ship.update(false, &arena, MAX_PARTICLES, &mut rng);
        }
        assert!(ship.try_fire().is_some());
    }

    #[test]
    fn test_bullet_lifetime_and_trail() {
        let arena = Arena::default();
        let mut bullet = Bullet::new(Vec2::new(100.0, 100.0), Vec2::X);
        assert_eq!(bullet.vel, Vec2::new(BULLET_SPEED, 0.0));
        for _ in 0..BULLET_LIFETIME_TICKS - 1 {
            bullet.update(&arena);
            assert!(bullet.is_alive());
            assert!(bullet.trail.len() <= BULLET_TRAIL_LENGTH);
        }
        assert_eq!(bullet.trail.len(), BULLET_TRAIL_LENGTH);
        // Newest trail point is where the bullet was one tick ago
        let last = bullet.pos;
        bullet.update(&arena);
        assert_eq!(bullet.trail[0], last);
        assert!(!bullet.is_alive());
    }

    #[test]
    fn test_bullet_wraps() {
        let arena = Arena::default();
        let mut bullet = Bullet::new(Vec2::new(ARENA_WIDTH - 5.0, 50.0), Vec2::X);
        bullet.update(&arena);
        assert_eq!(bullet.pos.x, 0.0);
    }

    #[test]
    fn test_particle_decay() {
        let mut p = Particle::spark(&mut rng(), Vec2::ZERO, Palette::White);
        assert!((30..50).contains(&p.life));
        assert_eq!(p.alpha(), 1.0);
        let speed = p.vel.length();
        p.update();
        assert!((p.vel.length() - speed * PARTICLE_DRAG).abs() < 1e-4);
        while p.is_alive() {
            p.update();
        }
        assert_eq!(p.alpha(), 0.0);
    }

    #[test]
    fn test_exhaust_respects_cap() {
        let arena = Arena::default();
        let mut rng = rng();
        let mut ship = Ship::new(&arena);
        for _ in 0..20 {
            ship.update(true, &arena, 4, &mut rng);
            assert!(ship.thrust_particles.len() <= 4);
        }
        assert_eq!(ship.thrust_particles.len(), 4);

        let mut quiet = Ship::new(&arena);
        for _ in 0..20 {
            assert!(quiet.update(true, &arena, 0, &mut rng));
        }
        assert!(quiet.thrust_particles.is_empty());
        assert!(quiet.vel.length() > 0.0);
    }

    #[test]
    fn test_particle_cap_keeps_newest() {
        let mut state = GameState::new(4);
        state.particle_cap = 10;
        state.explode(Vec2::new(100.0, 100.0), Palette::Green, 8);
        state.explode(Vec2::new(500.0, 300.0), Palette::Yellow, 8);
        assert_eq!(state.particles.len(), 10);
        assert_eq!(state.particles[0].color, Palette::Green);
        assert!(state.particles[2..].iter().all(|p| p.color == Palette::Yellow));

        state.particle_cap = 0;
        state.particles.clear();
        state.explode(Vec2::new(100.0, 100.0), Palette::Green, 8);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_particle_cap() {
        let mut state = GameState::new(3);
        for _ in 0..20 {
            state.explode(Vec2::new(100.0, 100.0), Palette::Green, 50);
        }
        assert_eq!(state.particles.len(), MAX_PARTICLES);
        assert_eq!(state.drain_events().len(), 20);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_reset() {
        let mut state = GameState::new(9);
        state.score = 5000;
        state.lives = 0;
        state.wave = 7;
        state.phase = GamePhase::GameOver;
        state.bullets.push(Bullet::new(Vec2::ZERO, Vec2::X));
        state.reset();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.wave, 1);
        assert!(state.bullets.is_empty());
        assert_eq!(state.asteroids.len(), 5);
    }
}
