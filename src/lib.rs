//! Bubble Popping - a 2D arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, progression)
//! - `game`: Session driver that routes simulation events to the collaborators
//! - `platform`: Collaborator interfaces (draw surface, audio, HUD)
//! - `persistence`: High-score record storage
//! - `tuning`: Data-driven game balance
//! - `autopilot`: Demo-mode player for headless runs

pub mod autopilot;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod renderer;

pub use game::{Collaborators, Game};
pub use highscores::PersistedRecord;
pub use settings::{QualityPreset, Settings};
pub use tuning::{RulesVariant, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one display frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Milliseconds of game time covered by one tick
    pub const TICK_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Arena used when the host does not report its own size
    pub const DEFAULT_ARENA_WIDTH: f32 = 1280.0;
    pub const DEFAULT_ARENA_HEIGHT: f32 = 720.0;

    /// Storage key of the persisted score record
    pub const RECORD_KEY: &str = "bubble-popping";
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Angle of the ray from `from` towards `to`
#[inline]
pub fn heading(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Velocity of magnitude `speed` pointing from `from` towards `to`
#[inline]
pub fn aim(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    polar_to_cartesian(speed, heading(from, to))
}
