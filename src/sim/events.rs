//! Side effects produced by the simulation
//!
//! The simulation never talks to audio, HUD or storage directly. It queues
//! `GameEvent`s on the session and the host drains them after each tick.

use serde::{Deserialize, Serialize};

use super::progression::{LevelTier, WeaponTier};

/// Sound effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundKind {
    /// Primary fire, one per weapon tier
    Fire1,
    Fire2,
    Fire3,
    Fire4,
    Fire5,
    /// Health charge granted / badge earned
    Health,
    /// Weapon tier changed or special charge granted/used
    WeaponChange,
    /// Enemy shrunk by a hit
    Shrink,
    /// Enemy destroyed
    Destroy,
    /// Special weapon requested with no charges left
    AccessDenied,
    /// Session ended
    GameOver,
}

impl SoundKind {
    pub const ALL: [SoundKind; 11] = [
        SoundKind::Fire1,
        SoundKind::Fire2,
        SoundKind::Fire3,
        SoundKind::Fire4,
        SoundKind::Fire5,
        SoundKind::Health,
        SoundKind::WeaponChange,
        SoundKind::Shrink,
        SoundKind::Destroy,
        SoundKind::AccessDenied,
        SoundKind::GameOver,
    ];
}

/// Capped resource counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    Health,
    Rocket,
    Grenade,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Health => "health",
            ResourceKind::Rocket => "rocket",
            ResourceKind::Grenade => "grenade",
        }
    }
}

/// Something the host has to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundKind),
    ScoreChanged(u64),
    LevelChanged { from: LevelTier, to: LevelTier },
    BadgeAdded { badges: u32 },
    WeaponChanged { from: WeaponTier, to: WeaponTier },
    /// A counter changed for any reason (grant, spend, damage)
    ResourceChanged { kind: ResourceKind, count: u32 },
    /// A charge was earned by crossing the sub-score threshold
    ResourceGranted { kind: ResourceKind, count: u32 },
    /// A special weapon was requested with zero charges
    Denied { kind: ResourceKind },
    LifeChanged(i64),
    AmmoChanged(u64),
    Started,
    Paused,
    GameOver { score: u64 },
}
