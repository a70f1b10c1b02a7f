//! Session state and lifecycle
//!
//! One `GameSession` holds everything that changes while a game runs. The host
//! owns it and drives it through `tick` and the input commands.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Bullet, Enemy, Particle, Player};
use super::events::{GameEvent, SoundKind};
use super::progression::Progression;
use super::spawner::Spawner;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting in the menu (initial phase)
    Paused,
    /// Active gameplay
    Playing,
    /// Run ended
    GameOver,
}

/// Visible play field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Default particle cap when no settings are applied
pub const MAX_PARTICLES: usize = 4000;

/// Complete state of one game
#[derive(Debug, Clone)]
pub struct GameSession {
    pub seed: u64,
    pub tuning: Tuning,
    pub arena: Arena,
    pub phase: GamePhase,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub particles: Vec<Particle>,
    pub progression: Progression,
    pub spawner: Spawner,
    pub rng: Pcg32,
    pub max_particles: usize,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Side effects waiting for the host
    pub events: Vec<GameEvent>,
}

impl GameSession {
    /// Create a paused session with the player in the middle of the arena
    pub fn new(seed: u64, tuning: Tuning, arena: Arena) -> Self {
        let progression = Progression::new(&tuning);
        let player_radius = tuning.weapon(progression.weapon).player_radius;
        let spawner = Spawner::new(tuning.level(progression.level));

        Self {
            seed,
            arena,
            phase: GamePhase::Paused,
            player: Player::new(arena.center(), player_radius),
            enemies: Vec::new(),
            bullets: Vec::new(),
            particles: Vec::new(),
            progression,
            spawner,
            rng: Pcg32::seed_from_u64(seed),
            max_particles: MAX_PARTICLES,
            time_ticks: 0,
            events: Vec::new(),
            tuning,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Enter `Playing`. No-op while already playing or after game over.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.phase = GamePhase::Playing;
        self.spawner.reconfigure(self.tuning.level(self.progression.level));
        log::info!("Session started (score {})", self.progression.score);
        self.events.push(GameEvent::Started);
        true
    }

    /// Stop ticking and spawning. No-op unless playing.
    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Paused;
        self.spawner.cancel();
        log::info!("Session paused (score {})", self.progression.score);
        self.events.push(GameEvent::Paused);
        true
    }

    /// Terminal transition; fires at most once per session
    pub fn game_over(&mut self) -> bool {
        if self.phase == GamePhase::GameOver {
            return false;
        }
        self.phase = GamePhase::GameOver;
        self.spawner.cancel();
        self.player.vel = Vec2::ZERO;
        log::info!("Game over (score {})", self.progression.score);
        self.events.push(GameEvent::Sound(SoundKind::GameOver));
        self.events.push(GameEvent::GameOver {
            score: self.progression.score,
        });
        true
    }

    /// Re-evaluate level and weapon tiers after the score or ammo moved
    pub fn sync_tiers(&mut self) {
        if let Some(level) = self.progression.refresh_level(&mut self.events) {
            if self.is_playing() {
                self.spawner.reconfigure(self.tuning.level(level));
            } else {
                self.spawner = Spawner::new(self.tuning.level(level));
            }
        }
        self.sync_weapon();
    }

    /// Re-evaluate the weapon tier and resize the player on a change
    pub fn sync_weapon(&mut self) {
        if let Some(weapon) = self.progression.refresh_weapon(&mut self.events) {
            self.player.radius = self.tuning.weapon(weapon).player_radius;
        }
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::progression::{LevelTier, WeaponTier};

    fn session() -> GameSession {
        GameSession::new(42, Tuning::default(), Arena::new(800.0, 600.0))
    }

    #[test]
    fn test_new_session_is_paused() {
        let s = session();
        assert_eq!(s.phase, GamePhase::Paused);
        assert_eq!(s.player.pos, Vec2::new(400.0, 300.0));
        assert_eq!(s.player.radius, 24.0);
        assert!(!s.spawner.timer.is_armed());
    }

    #[test]
    fn test_start_and_pause_are_idempotent() {
        let mut s = session();
        assert!(s.start());
        assert!(!s.start());
        assert!(s.spawner.timer.is_armed());

        assert!(s.pause());
        assert!(!s.pause());
        assert!(!s.spawner.timer.is_armed());
        let pauses = s.events.iter().filter(|e| **e == GameEvent::Paused).count();
        assert_eq!(pauses, 1);
    }

    #[test]
    fn test_game_over_once() {
        let mut s = session();
        s.start();
        assert!(s.game_over());
        assert!(!s.game_over());
        assert!(!s.start());
        assert!(!s.spawner.timer.is_armed());
        let overs = s
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_sync_tiers_rearms_spawner_and_grows_player() {
        let mut s = session();
        s.start();
        s.progression.score = 200_000;
        s.sync_tiers();
        assert_eq!(s.progression.level, LevelTier::Three);
        assert_eq!(s.progression.weapon, WeaponTier::Three);
        assert_eq!(s.player.radius, 40.0);
        assert_eq!(s.spawner.timer.interval_ms(), 1250.0);
        assert_eq!(s.spawner.enemy_speed, 2.0);
    }
}
