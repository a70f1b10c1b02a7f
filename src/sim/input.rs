//! Input commands
//!
//! Device events are mapped to `Command`s by the host; everything below is
//! device independent.

use glam::Vec2;

use super::state::GameSession;
use super::weapons::{Special, fire_primary, fire_special};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// One player intent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    MoveStart(Direction),
    MoveStop(Axis),
    FirePrimary(Vec2),
    FireSpecial(Special, Vec2),
    Start,
    Pause,
}

/// Apply a command to the session
pub fn apply(state: &mut GameSession, command: Command) {
    match command {
        Command::MoveStart(dir) => move_start(state, dir),
        Command::MoveStop(axis) => move_stop(state, axis),
        Command::FirePrimary(target) => {
            fire_primary(state, target);
        }
        Command::FireSpecial(special, target) => {
            fire_special(state, special, target);
        }
        Command::Start => {
            state.start();
        }
        Command::Pause => {
            state.pause();
        }
    }
}

/// Start moving; a player fully past an edge re-enters from the opposite one
pub fn move_start(state: &mut GameSession, dir: Direction) {
    let speed = state.tuning.player_speed;
    let arena = state.arena;
    let player = &mut state.player;
    let r = player.radius;

    match dir {
        Direction::Left => {
            if player.pos.x + r < 0.0 {
                player.pos.x = arena.width + r;
            } else {
                player.vel.x = -speed;
            }
        }
        Direction::Right => {
            if player.pos.x - r > arena.width {
                player.pos.x = -r;
            } else {
                player.vel.x = speed;
            }
        }
        Direction::Up => {
            if player.pos.y + r < 0.0 {
                player.pos.y = arena.height + r;
            } else {
                player.vel.y = -speed;
            }
        }
        Direction::Down => {
            if player.pos.y - r > arena.height {
                player.pos.y = -r;
            } else {
                player.vel.y = speed;
            }
        }
    }
}

pub fn move_stop(state: &mut GameSession, axis: Axis) {
    match axis {
        Axis::Horizontal => state.player.vel.x = 0.0,
        Axis::Vertical => state.player.vel.y = 0.0,
    }
}
