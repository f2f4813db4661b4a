//! Audio system using Web Audio API
//!
//! Every cue is a single oscillator with a short exponential decay.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::{GameEvent, Tone, Waveform};

/// Peak gain of a tone at full volume
const TONE_PEAK_GAIN: f32 = 0.25;
/// Gain the envelope decays to (exponential ramps cannot reach zero)
const TONE_FLOOR_GAIN: f32 = 0.001;

impl From<Waveform> for OscillatorType {
    fn from(waveform: Waveform) -> Self {
        match waveform {
            Waveform::Square => OscillatorType::Square,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play the cue for a simulation event, if it has one
    pub fn play_event(&self, event: &GameEvent) {
        if let Some(tone) = event.tone() {
            self.play(tone);
        }
    }

    /// Fire-and-forget tone
    pub fn play(&self, tone: Tone) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let Some((osc, gain)) = self.create_osc(ctx, tone.frequency, tone.waveform.into()) else {
            return;
        };
        let t = ctx.current_time();
        let end = t + f64::from(tone.duration);

        gain.gain()
            .set_value_at_time(TONE_PEAK_GAIN * vol, t)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(TONE_FLOOR_GAIN, end)
            .ok();

        osc.start().ok();
        osc.stop_with_when(end).ok();
    }

    /// Create an oscillator routed through a gain node to the speakers
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }
}
