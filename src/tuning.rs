//! Data-driven game balance
//!
//! Defaults reproduce the bubble-popping ruleset. A JSON document with the
//! same shape can override any of it; missing fields fall back to defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::entity::Color;
use crate::sim::events::SoundKind;
use crate::sim::progression::LevelTier;

/// Which collision/damage ruleset is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RulesVariant {
    /// Armor-reduced shrinking, health/rocket/grenade charges
    #[default]
    Bubble,
    /// Strength-gated shrinking, a life pool and an ammo-driven weapon tier
    Life,
}

/// Spawner settings for one level tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelParams {
    pub spawn_interval_ms: f32,
    pub enemy_speed: f32,
}

/// Loadout for one weapon tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponParams {
    pub player_radius: f32,
    pub bullet_power: f32,
    pub bullet_radius: f32,
    pub fire_sound: SoundKind,
}

/// A (radius, color) pair enemies are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyKind {
    pub radius: f32,
    pub color: Color,
}

/// Rare armored enemy that replaces a regular spawn at a given tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmoredReroll {
    pub tier: LevelTier,
    /// Probability is 1 / one_in
    pub one_in: u32,
    pub radius: f32,
    pub color: Color,
    pub armor: f32,
}

/// Multipliers applied to the current weapon for a special shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecialParams {
    pub radius_mult: f32,
    pub power_mult: f32,
    pub color: Color,
}

/// Threshold and cap of a resource counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterParams {
    pub threshold: u64,
    pub cap: u32,
}

/// Particle burst look
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleParams {
    pub friction: f32,
    pub fade: f32,
    pub max_radius: f32,
    pub max_speed: f32,
}

/// Sound table entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundSpec {
    pub kind: SoundKind,
    pub file: String,
    pub duration_ms: u32,
}

/// Invalid tuning document
#[derive(Debug)]
pub enum TuningError {
    Json(serde_json::Error),
    EmptyPalette,
    BadBreakpoints(&'static str),
    BadInterval { tier: usize },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "tuning is not valid JSON: {err}"),
            Self::EmptyPalette => write!(f, "enemy palette is empty"),
            Self::BadBreakpoints(which) => write!(f, "{which} breakpoints must be strictly increasing"),
            Self::BadInterval { tier } => write!(f, "spawn interval of tier {} must be positive", tier + 1),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub variant: RulesVariant,

    // === Spawning ===
    pub levels: [LevelParams; 5],
    /// Score must exceed these to reach tiers 2..=5
    pub level_breakpoints: [u64; 4],
    pub palette: Vec<EnemyKind>,
    pub armored: Vec<ArmoredReroll>,

    // === Weapons ===
    pub weapons: [WeaponParams; 5],
    /// Ammo needed for weapon tiers 2..=5 (life rules only)
    pub ammo_breakpoints: [u64; 4],
    pub player_speed: f32,
    pub bullet_speed: f32,
    /// Max random deviation (radians) added to each primary shot
    pub bullet_spread: f32,
    pub rocket: SpecialParams,
    pub grenade: SpecialParams,
    pub grenade_fragments: u32,
    pub grenade_step_degrees: f32,

    // === Collisions ===
    /// Enemies larger than this shrink instead of popping
    pub shrink_threshold: f32,
    /// Score for a shrinking hit (life rules only)
    pub hit_score: u64,

    // === Resources ===
    pub health: CounterParams,
    pub rockets: CounterParams,
    pub grenades: CounterParams,
    pub starting_health: u32,
    pub starting_life: i64,

    // === Effects ===
    pub particles: ParticleParams,
    pub sounds: Vec<SoundSpec>,
}

impl Default for Tuning {
    fn default() -> Self {
        let weapon = |player_radius, bullet_power, bullet_radius, fire_sound| WeaponParams {
            player_radius,
            bullet_power,
            bullet_radius,
            fire_sound,
        };
        let enemy = |radius, color| EnemyKind {
            radius,
            color: Color(color),
        };
        let sound = |kind, file: &str, duration_ms| SoundSpec {
            kind,
            file: file.to_string(),
            duration_ms,
        };

        Self {
            variant: RulesVariant::Bubble,

            levels: [
                LevelParams { spawn_interval_ms: 2000.0, enemy_speed: 1.0 },
                LevelParams { spawn_interval_ms: 1500.0, enemy_speed: 1.5 },
                LevelParams { spawn_interval_ms: 1250.0, enemy_speed: 2.0 },
                LevelParams { spawn_interval_ms: 1000.0, enemy_speed: 2.25 },
                LevelParams { spawn_interval_ms: 750.0, enemy_speed: 2.5 },
            ],
            level_breakpoints: [10_000, 100_000, 1_000_000, 10_000_000],
            palette: vec![
                enemy(16.0, 0xFFCC44),
                enemy(32.0, 0xFF8844),
                enemy(48.0, 0xFF5544),
                enemy(64.0, 0xCC3399),
                enemy(80.0, 0x9933FF),
                enemy(96.0, 0x6666FF),
            ],
            armored: vec![
                ArmoredReroll {
                    tier: LevelTier::Four,
                    one_in: 16,
                    radius: 64.0,
                    color: Color(0x666666),
                    armor: 4.0,
                },
                ArmoredReroll {
                    tier: LevelTier::Five,
                    one_in: 32,
                    radius: 96.0,
                    color: Color(0x999999),
                    armor: 5.0,
                },
            ],

            weapons: [
                weapon(24.0, 1.0, 2.0, SoundKind::Fire1),
                weapon(32.0, 2.0, 4.0, SoundKind::Fire2),
                weapon(40.0, 3.0, 6.0, SoundKind::Fire3),
                weapon(48.0, 4.0, 8.0, SoundKind::Fire4),
                weapon(56.0, 5.0, 10.0, SoundKind::Fire5),
            ],
            ammo_breakpoints: [100, 500, 2_000, 10_000],
            player_speed: 4.0,
            bullet_speed: 12.0,
            bullet_spread: 0.0,
            rocket: SpecialParams {
                radius_mult: 3.0,
                power_mult: 24.0,
                color: Color(0x88CC44),
            },
            grenade: SpecialParams {
                radius_mult: 2.0,
                power_mult: 12.0,
                color: Color(0x00BBCC),
            },
            grenade_fragments: 9,
            grenade_step_degrees: 30.0,

            shrink_threshold: 24.0,
            hit_score: 1,

            health: CounterParams { threshold: 16, cap: 10 },
            rockets: CounterParams { threshold: 512, cap: 10 },
            grenades: CounterParams { threshold: 1024, cap: 10 },
            starting_health: 0,
            starting_life: 100,

            particles: ParticleParams {
                friction: 0.99,
                fade: 0.01,
                max_radius: 4.0,
                max_speed: 8.0,
            },
            sounds: vec![
                sound(SoundKind::Fire1, "weapon1.wav", 300),
                sound(SoundKind::Fire2, "weapon2.wav", 300),
                sound(SoundKind::Fire3, "weapon3.wav", 300),
                sound(SoundKind::Fire4, "weapon3.wav", 300),
                sound(SoundKind::Fire5, "weapon3.wav", 300),
                sound(SoundKind::Health, "health.wav", 500),
                sound(SoundKind::WeaponChange, "weapon_change.wav", 2000),
                sound(SoundKind::Shrink, "shrink.wav", 300),
                sound(SoundKind::Destroy, "destroy.wav", 500),
                sound(SoundKind::AccessDenied, "access_denied.wav", 300),
                sound(SoundKind::GameOver, "game_over.wav", 2000),
            ],
        }
    }
}

impl Tuning {
    /// Life/ammo ruleset with otherwise default numbers
    pub fn life_rules() -> Self {
        Self {
            variant: RulesVariant::Life,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.palette.is_empty() {
            return Err(TuningError::EmptyPalette);
        }
        if !self.level_breakpoints.windows(2).all(|w| w[0] < w[1]) {
            return Err(TuningError::BadBreakpoints("level"));
        }
        if !self.ammo_breakpoints.windows(2).all(|w| w[0] < w[1]) {
            return Err(TuningError::BadBreakpoints("ammo"));
        }
        if let Some(tier) = self.levels.iter().position(|l| !(l.spawn_interval_ms > 0.0)) {
            return Err(TuningError::BadInterval { tier });
        }
        Ok(())
    }

    pub fn level(&self, tier: LevelTier) -> LevelParams {
        self.levels[tier.index()]
    }

    pub fn weapon(&self, tier: crate::sim::progression::WeaponTier) -> WeaponParams {
        self.weapons[tier.index()]
    }

    /// Playback duration for a sound kind (0 when missing from the table)
    pub fn sound_duration_ms(&self, kind: SoundKind) -> u32 {
        self.sound(kind).map(|s| s.duration_ms).unwrap_or(0)
    }

    pub fn sound(&self, kind: SoundKind) -> Option<&SoundSpec> {
        self.sounds.iter().find(|s| s.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.variant, RulesVariant::Bubble);
        assert_eq!(tuning.level(LevelTier::One).spawn_interval_ms, 2000.0);
        assert_eq!(tuning.level(LevelTier::Five).enemy_speed, 2.5);
        for kind in SoundKind::ALL {
            assert!(tuning.sound(kind).is_some(), "missing sound for {kind:?}");
        }
    }

    #[test]
    fn test_partial_json_overrides() {
        let tuning = Tuning::from_json(r#"{ "variant": "Life", "starting_life": 10 }"#).unwrap();
        assert_eq!(tuning.variant, RulesVariant::Life);
        assert_eq!(tuning.starting_life, 10);
        assert_eq!(tuning.palette.len(), 6);
    }

    #[test]
    fn test_rejects_bad_documents() {
        assert!(matches!(Tuning::from_json("{"), Err(TuningError::Json(_))));
        assert!(matches!(
            Tuning::from_json(r#"{ "palette": [] }"#),
            Err(TuningError::EmptyPalette)
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "level_breakpoints": [5, 5, 6, 7] }"#),
            Err(TuningError::BadBreakpoints("level"))
        ));
    }

    #[test]
    fn test_json_roundtrip_keeps_tables() {
        let json = serde_json::to_string(&Tuning::life_rules()).unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.variant, RulesVariant::Life);
        assert_eq!(back.weapons, Tuning::default().weapons);
    }
}
