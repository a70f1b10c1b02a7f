//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Tick driven, never wall-clock driven
//! - Seeded RNG only
//! - Stable iteration order (insertion order of the entity lists)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod entity;
pub mod events;
pub mod input;
pub mod progression;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod weapons;

pub use collision::{HitOutcome, circles_overlap, classify_hit, out_of_bounds};
pub use entity::{Bullet, Color, Enemy, EntityFault, FireType, Kinematic, Particle, Player};
pub use events::{GameEvent, ResourceKind, SoundKind};
pub use input::{Axis, Command, Direction};
pub use progression::{LevelTier, Progression, ResourceCounter, WeaponTier};
pub use spawner::{SpawnTimer, Spawner};
pub use state::{Arena, GamePhase, GameSession, MAX_PARTICLES};
pub use tick::tick;
pub use weapons::Special;
