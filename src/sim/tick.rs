//! Fixed timestep simulation tick
//!
//! Advances the session deterministically. Order within a tick:
//! player, bullets, enemies (with bullet hits then player contact),
//! particles, then the spawn timer.

use super::collision::{out_of_bounds, resolve_bullet_hits, resolve_player_collisions};
use super::effects::update_particles;
use super::entity::Kinematic;
use super::spawner::spawn_enemy;
use super::state::GameSession;

/// Advance the session by one tick that covers `elapsed_ms` of game time
pub fn tick(state: &mut GameSession, elapsed_ms: f32) {
    if !state.is_playing() {
        return;
    }
    state.time_ticks += 1;

    state.player.advance();

    let arena = state.arena;
    for bullet in state.bullets.iter_mut() {
        bullet.advance();
    }
    state.bullets.retain(|b| !out_of_bounds(b.pos, b.radius, arena));

    for enemy in state.enemies.iter_mut() {
        enemy.advance();
        if let Err(fault) = enemy.validate() {
            log::warn!("Dropping enemy: {}", fault);
            enemy.destroyed = true;
        }
    }

    resolve_bullet_hits(state);
    resolve_player_collisions(state);

    state
        .enemies
        .retain(|e| !e.destroyed && !out_of_bounds(e.pos, e.radius, arena));
    state.bullets.retain(|b| !b.spent);

    update_particles(&mut state.particles);

    if state.is_playing() {
        let due = state.spawner.timer.advance(elapsed_ms);
        for _ in 0..due {
            let enemy = spawn_enemy(
                &mut state.rng,
                &state.tuning,
                state.progression.level,
                arena,
                state.player.pos,
                state.spawner.enemy_speed,
            );
            log::trace!("Spawned r={} at {:?}", enemy.radius, enemy.pos);
            state.enemies.push(enemy);
        }
    }

    state.progression.settle();
}
