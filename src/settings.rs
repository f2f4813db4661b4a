//! Game settings and preferences
//!
//! Persisted separately from high scores in LocalStorage.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Next preset in the Low, Medium, High cycle
    pub fn next(&self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Maximum explosion particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 128,
            QualityPreset::Medium => 512,
            QualityPreset::High => 1024,
        }
    }

    /// Bullet trail length multiplier (1.0 = full)
    pub fn trail_quality(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.4,
            QualityPreset::Medium => 0.8,
            QualityPreset::High => 1.0,
        }
    }

    /// Whether neon strokes get the wide glow underlay
    pub fn glow_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Bullet trails
    pub trails: bool,
    /// Explosion and exhaust particles
    pub particles: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            trails: true,
            particles: true,
            show_fps: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            mute_on_blur: true,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Step to the next quality preset and return it
    pub fn cycle_quality(&mut self) -> QualityPreset {
        self.quality = self.quality.next();
        self.quality
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Number of trail segments to draw for a trail of `len` points
    pub fn trail_segments(&self, len: usize) -> usize {
        if !self.trails {
            return 0;
        }
        (len as f32 * self.quality.trail_quality()).round() as usize
    }

    /// Parse stored settings, falling back to defaults when unreadable
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("Discarding unreadable settings: {}", e);
            Self::default()
        })
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neon_asteroids_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_cap_follows_toggle() {
        let mut settings = Settings::from_preset(QualityPreset::High);
        assert_eq!(settings.max_particles(), 1024);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_trail_segments() {
        let mut settings = Settings::default();
        assert_eq!(settings.trail_segments(5), 4);
        settings.quality = QualityPreset::High;
        assert_eq!(settings.trail_segments(5), 5);
        settings.trails = false;
        assert_eq!(settings.trail_segments(5), 0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"quality":"Low","trails":false}"#);
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(!settings.trails);
        assert!(settings.particles);
        assert!(settings.mute_on_blur);
    }

    #[test]
    fn test_corrupt_json_defaults() {
        assert_eq!(Settings::from_json("{{"), Settings::default());
    }

    #[test]
    fn test_json_roundtrip_preserves_preset() {
        let settings = Settings::from_preset(QualityPreset::High);
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json), settings);
    }

    #[test]
    fn test_cycle_quality() {
        let mut settings = Settings::default();
        let start = settings.quality;
        let caps: Vec<usize> = (0..3)
            .map(|_| {
                settings.cycle_quality();
                settings.max_particles()
            })
            .collect();
        assert_eq!(settings.quality, start);
        assert_eq!(caps, vec![1024, 128, 512]);

        let stored = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&stored), settings);
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(QualityPreset::High.as_str(), "High");
        assert_eq!(QualityPreset::Low.as_str(), "Low");
        assert!(!QualityPreset::Low.glow_enabled());
    }
}
