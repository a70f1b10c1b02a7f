//! Player preferences
//!
//! Stored apart from the score record under their own key. Unknown or missing
//! fields fall back to defaults, so older saves keep loading.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How much visual debris the game keeps alive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    /// Live particle cap
    pub fn max_particles(self) -> usize {
        match self {
            Self::Low => 200,
            Self::Medium => 1000,
            Self::High => crate::sim::MAX_PARTICLES,
        }
    }
}

impl FromStr for QualityPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "med" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown quality preset '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quality: QualityPreset,
    /// Particle bursts on hits and pops
    pub particles: bool,
    /// 0..=1
    pub master_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::High,
            particles: true,
            master_volume: 0.2,
            muted: false,
        }
    }
}

impl Settings {
    pub const STORAGE_KEY: &'static str = "bubble-popping-settings";

    pub fn with_quality(quality: QualityPreset) -> Self {
        Self {
            quality,
            ..Self::default()
        }
    }

    pub fn max_particles(&self) -> usize {
        if self.particles { self.quality.max_particles() } else { 0 }
    }

    /// Gain handed to the audio sink, 0 when muted
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume.clamp(0.0, 1.0) }
    }

    /// Parse stored preferences; anything unreadable yields defaults
    pub fn decode(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        serde_json::from_str(raw).unwrap_or_else(|err| {
            log::warn!("Discarding stored settings: {}", err);
            Self::default()
        })
    }

    pub fn toggle_mute(&self) -> Self {
        Self {
            muted: !self.muted,
            ..self.clone()
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        match crate::persistence::read_item(Self::STORAGE_KEY) {
            Ok(raw) => Self::decode(raw.as_deref()),
            Err(err) => {
                log::warn!("Settings unavailable: {}", err);
                Self::default()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let result = serde_json::to_string(self)
            .map_err(crate::persistence::PersistError::from)
            .and_then(|json| crate::persistence::write_item(Self::STORAGE_KEY, &json));
        match result {
            Ok(()) => log::debug!("Settings saved"),
            Err(err) => log::warn!("Settings not saved: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_cap() {
        assert_eq!(Settings::with_quality(QualityPreset::Low).max_particles(), 200);
        assert_eq!(Settings::default().max_particles(), crate::sim::MAX_PARTICLES);

        let off = Settings {
            particles: false,
            ..Settings::default()
        };
        assert_eq!(off.max_particles(), 0);
    }

    #[test]
    fn test_toggle_mute() {
        let settings = Settings::default();
        assert_eq!(settings.effective_volume(), 0.2);
        let muted = settings.toggle_mute();
        assert_eq!(muted.effective_volume(), 0.0);
        assert_eq!(muted.toggle_mute(), settings);
    }

    #[test]
    fn test_decode() {
        let partial = Settings::decode(Some(r#"{"muted":true,"quality":"low"}"#));
        assert!(partial.muted);
        assert_eq!(partial.quality, QualityPreset::Low);
        assert!(partial.particles);

        assert_eq!(Settings::decode(Some("{oops")), Settings::default());
        assert_eq!(Settings::decode(None), Settings::default());
    }

    #[test]
    fn test_parse_preset() {
        assert_eq!(" MED ".parse::<QualityPreset>(), Ok(QualityPreset::Medium));
        assert!("ultra".parse::<QualityPreset>().is_err());
    }
}
