//! Demo-mode player
//!
//! Plays the game through the same `Command`s a human would issue: keeps its
//! distance from the closest enemy, shoots at it on a fixed cadence and spends
//! special charges when they pay off. Used by the headless runner.

use glam::Vec2;

use crate::sim::{Axis, Command, Direction, Enemy, GameSession, Special};

/// Gap (edge to edge) below which the pilot backs away
const EVADE_GAP: f32 = 120.0;
/// Radius around the player counted for a grenade decision
const GRENADE_RANGE: f32 = 200.0;
const GRENADE_CROWD: usize = 3;
/// Enemies at least this large are worth a rocket
const ROCKET_RADIUS: f32 = 64.0;

#[derive(Debug, Clone)]
pub struct Autopilot {
    fire_every_ticks: u64,
    last_fire_tick: Option<u64>,
}

impl Autopilot {
    pub fn new(fire_every_ticks: u64) -> Self {
        Self {
            fire_every_ticks: fire_every_ticks.max(1),
            last_fire_tick: None,
        }
    }

    /// Commands to issue before the next tick
    pub fn decide(&mut self, state: &GameSession) -> Vec<Command> {
        let mut commands = Vec::new();
        if !state.is_playing() {
            return commands;
        }

        let player = state.player.pos;
        let Some(target) = nearest(state, player) else {
            commands.push(Command::MoveStop(Axis::Horizontal));
            commands.push(Command::MoveStop(Axis::Vertical));
            return commands;
        };

        let gap = player.distance(target.pos) - target.radius - state.player.radius;
        if gap < EVADE_GAP {
            let away = player - target.pos;
            commands.push(Command::MoveStart(if away.x < 0.0 {
                Direction::Left
            } else {
                Direction::Right
            }));
            commands.push(Command::MoveStart(if away.y < 0.0 {
                Direction::Up
            } else {
                Direction::Down
            }));
        } else {
            commands.push(Command::MoveStop(Axis::Horizontal));
            commands.push(Command::MoveStop(Axis::Vertical));
        }

        let crowd = state
            .enemies
            .iter()
            .filter(|e| e.pos.distance(player) - e.radius < GRENADE_RANGE)
            .count();
        if crowd >= GRENADE_CROWD && state.progression.grenades.count > 0 {
            commands.push(Command::FireSpecial(Special::Grenade, player));
        } else if target.radius >= ROCKET_RADIUS && state.progression.rockets.count > 0 {
            commands.push(Command::FireSpecial(Special::Rocket, target.pos));
        }

        let due = self
            .last_fire_tick
            .is_none_or(|last| state.time_ticks >= last + self.fire_every_ticks);
        if due {
            self.last_fire_tick = Some(state.time_ticks);
            commands.push(Command::FirePrimary(target.pos));
        }

        commands
    }
}

fn nearest(state: &GameSession, from: Vec2) -> Option<&Enemy> {
    state.enemies.iter().min_by(|a, b| {
        let da = a.pos.distance(from) - a.radius;
        let db = b.pos.distance(from) - b.radius;
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    })
}
