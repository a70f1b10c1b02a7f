//! Timer-driven enemy generation
//!
//! The spawn timer is a countdown advanced by simulation time. It is owned by
//! the session, so there is never more than one armed timer and no locking.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::Enemy;
use super::progression::LevelTier;
use super::state::Arena;
use crate::aim;
use crate::tuning::{LevelParams, Tuning};

/// Cancellable repeating countdown
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnTimer {
    interval_ms: f32,
    /// Time until the next fire; `None` while cancelled
    remaining_ms: Option<f32>,
}

impl SpawnTimer {
    pub fn new(interval_ms: f32) -> Self {
        Self {
            interval_ms,
            remaining_ms: None,
        }
    }

    /// Start counting a full interval from now
    pub fn arm(&mut self, interval_ms: f32) {
        self.interval_ms = interval_ms;
        self.remaining_ms = Some(interval_ms);
    }

    pub fn cancel(&mut self) {
        self.remaining_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining_ms.is_some()
    }

    pub fn interval_ms(&self) -> f32 {
        self.interval_ms
    }

    /// Advance by `elapsed_ms`; returns how many times the timer fired
    pub fn advance(&mut self, elapsed_ms: f32) -> u32 {
        let interval = self.interval_ms;
        let Some(remaining) = self.remaining_ms.as_mut() else {
            return 0;
        };
        if interval <= 0.0 {
            return 0;
        }
        *remaining -= elapsed_ms;
        let mut fired = 0;
        while *remaining <= 0.0 {
            *remaining += interval;
            fired += 1;
        }
        fired
    }
}

/// Enemy factory plus its timer
#[derive(Debug, Clone)]
pub struct Spawner {
    pub timer: SpawnTimer,
    pub enemy_speed: f32,
}

impl Spawner {
    /// Disarmed spawner configured for `params`
    pub fn new(params: LevelParams) -> Self {
        Self {
            timer: SpawnTimer::new(params.spawn_interval_ms),
            enemy_speed: params.enemy_speed,
        }
    }

    /// Cancel the running timer and re-arm it with new level settings
    pub fn reconfigure(&mut self, params: LevelParams) {
        self.timer.cancel();
        self.enemy_speed = params.enemy_speed;
        self.timer.arm(params.spawn_interval_ms);
        log::debug!(
            "Spawner armed: every {}ms at speed {}",
            params.spawn_interval_ms,
            params.enemy_speed
        );
    }

    pub fn cancel(&mut self) {
        self.timer.cancel();
    }
}

/// Roll a new enemy just outside a random edge, heading for the player
pub fn spawn_enemy(
    rng: &mut Pcg32,
    tuning: &Tuning,
    level: LevelTier,
    arena: Arena,
    player_pos: Vec2,
    speed: f32,
) -> Enemy {
    let kind = tuning.palette[rng.random_range(0..tuning.palette.len())];
    let mut radius = kind.radius;
    let mut color = kind.color;
    let mut armor = 0.0;

    if let Some(reroll) = tuning.armored.iter().find(|r| r.tier == level) {
        if reroll.one_in > 0 && rng.random_range(0..reroll.one_in) == 0 {
            radius = reroll.radius;
            color = reroll.color;
            armor = reroll.armor;
        }
    }

    let pos = if rng.random_bool(0.5) {
        let x = if rng.random_bool(0.5) {
            -radius
        } else {
            arena.width + radius
        };
        Vec2::new(x, rng.random::<f32>() * arena.height)
    } else {
        let y = if rng.random_bool(0.5) {
            -radius
        } else {
            arena.height + radius
        };
        Vec2::new(rng.random::<f32>() * arena.width, y)
    };

    let vel = aim(pos, player_pos, speed);
    Enemy::new(pos, vel, radius, color, armor)
}
