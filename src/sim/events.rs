//! Events raised by the simulation for the presentation layer
//!
//! The simulation never touches audio or storage directly. It queues events on
//! the game state; the frontend drains them once per frame and turns them into
//! tones and high-score writes.

use glam::Vec2;

/// Oscillator shape for a tone cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Square,
    Sawtooth,
}

/// A fire-and-forget tone: `play(frequency, duration, waveform)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Hz
    pub frequency: f32,
    /// Seconds
    pub duration: f32,
    pub waveform: Waveform,
}

impl Tone {
    pub const THRUST: Tone = Tone::new(220.0, 0.1, Waveform::Sawtooth);
    pub const FIRE: Tone = Tone::new(800.0, 0.05, Waveform::Square);
    pub const BANG_LARGE: Tone = Tone::new(150.0, 0.2, Waveform::Sawtooth);
    pub const BANG_SMALL: Tone = Tone::new(400.0, 0.2, Waveform::Sawtooth);

    pub const fn new(frequency: f32, duration: f32, waveform: Waveform) -> Self {
        Self {
            frequency,
            duration,
            waveform,
        }
    }
}

/// Explosions further than this from the arena origin use the deep bang
pub const LARGE_BANG_DISTANCE: f32 = 60.0;

/// Something the frontend should react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Engine burning this tick
    Thrust,
    /// A bullet left the ship
    Fire,
    /// Particle burst at `pos`
    Explosion { pos: Vec2 },
    /// Ship hit an asteroid and lost a life
    ShipDestroyed { lives_left: u8 },
    /// Asteroid field cleared, `wave` is the new wave number
    WaveCleared { wave: u32, bonus: u64 },
    /// Run ended (lives exhausted or quit); the score should be recorded
    GameOver { score: u64, wave: u32 },
}

impl GameEvent {
    /// Tone cue for this event, if it makes a sound
    pub fn tone(&self) -> Option<Tone> {
        match self {
            GameEvent::Thrust => Some(Tone::THRUST),
            GameEvent::Fire => Some(Tone::FIRE),
            GameEvent::Explosion { pos } => {
                if pos.length() > LARGE_BANG_DISTANCE {
                    Some(Tone::BANG_LARGE)
                } else {
                    Some(Tone::BANG_SMALL)
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explosion_tone_by_distance() {
        let near = GameEvent::Explosion {
            pos: Vec2::new(30.0, 40.0),
        };
        let far = GameEvent::Explosion {
            pos: Vec2::new(400.0, 300.0),
        };
        assert_eq!(near.tone(), Some(Tone::BANG_SMALL));
        assert_eq!(far.tone(), Some(Tone::BANG_LARGE));
    }

    #[test]
    fn test_silent_events() {
        assert_eq!(GameEvent::ShipDestroyed { lives_left: 2 }.tone(), None);
        assert_eq!(
            GameEvent::GameOver {
                score: 10,
                wave: 1
            }
            .tone(),
            None
        );
        assert_eq!(GameEvent::Fire.tone().map(|t| t.waveform), Some(Waveform::Square));
    }
}
