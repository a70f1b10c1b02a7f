//! Collision detection and response
//!
//! Circle/circle tests between bullets and enemies and between the player and
//! enemies. Removals are only flagged here (`Enemy::destroyed`,
//! `Bullet::spent`); the tick compacts the collections afterwards.

use glam::Vec2;

use super::effects::emit_burst;
use super::entity::{Bullet, Enemy};
use super::events::{GameEvent, SoundKind};
use super::state::{Arena, GameSession};
use crate::tuning::RulesVariant;

/// True when two circles overlap. Exactly touching is not a hit.
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    a_pos.distance(b_pos) - (a_radius + b_radius) < 0.0
}

/// True when the bounding circle lies completely outside the arena
#[inline]
pub fn out_of_bounds(pos: Vec2, radius: f32, arena: Arena) -> bool {
    pos.x + radius < 0.0
        || pos.x - radius > arena.width
        || pos.y + radius < 0.0
        || pos.y - radius > arena.height
}

/// What a bullet hit does to an enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitOutcome {
    /// Radius reduced by `amount`
    Shrink { amount: f32 },
    /// Large enemy, but the hit was too weak to shrink it
    Deflected,
    /// Small enemy popped
    Destroy,
}

/// Decide the outcome of `bullet` hitting `enemy`
pub fn classify_hit(
    variant: RulesVariant,
    shrink_threshold: f32,
    enemy: &Enemy,
    bullet: &Bullet,
) -> HitOutcome {
    if enemy.radius <= shrink_threshold {
        return HitOutcome::Destroy;
    }
    match variant {
        RulesVariant::Bubble => HitOutcome::Shrink {
            amount: (bullet.power - enemy.armor).max(0.0),
        },
        RulesVariant::Life => {
            if bullet.power > enemy.strength {
                HitOutcome::Shrink {
                    amount: bullet.power - enemy.strength,
                }
            } else {
                HitOutcome::Deflected
            }
        }
    }
}

/// Resolve every live bullet against every live enemy
pub fn resolve_bullet_hits(state: &mut GameSession) {
    let score_before = state.progression.score;
    let GameSession {
        enemies,
        bullets,
        particles,
        rng,
        progression,
        events,
        tuning,
        max_particles,
        ..
    } = state;

    for enemy in enemies.iter_mut() {
        for bullet in bullets.iter_mut() {
            if enemy.destroyed {
                break;
            }
            if bullet.spent {
                continue;
            }
            if !circles_overlap(bullet.pos, bullet.radius, enemy.pos, enemy.radius) {
                continue;
            }

            emit_burst(
                particles,
                rng,
                bullet.pos,
                enemy.radius.max(0.0) as usize,
                enemy.color,
                &tuning.particles,
                *max_particles,
            );

            match classify_hit(tuning.variant, tuning.shrink_threshold, enemy, bullet) {
                HitOutcome::Shrink { amount } => {
                    enemy.radius -= amount;
                    events.push(GameEvent::Sound(SoundKind::Shrink));
                    if tuning.variant == RulesVariant::Life {
                        progression.award_hit(tuning.hit_score, events);
                    }
                }
                HitOutcome::Deflected => {}
                HitOutcome::Destroy => {
                    enemy.destroyed = true;
                    let points = progression.award_destroy(enemy.default_radius, events);
                    log::debug!("Enemy r={} destroyed for {}", enemy.default_radius, points);
                    events.push(GameEvent::Sound(SoundKind::Destroy));
                }
            }

            if !bullet.fire_type.is_piercing() {
                bullet.spent = true;
            }
        }
    }

    // Shrink hits score too under life rules
    if state.progression.score != score_before {
        state.sync_tiers();
    }
}

/// Resolve the player against every enemy still alive this tick
pub fn resolve_player_collisions(state: &mut GameSession) {
    for i in 0..state.enemies.len() {
        if !state.is_playing() {
            return;
        }
        let enemy = &state.enemies[i];
        if enemy.destroyed {
            continue;
        }
        if !circles_overlap(state.player.pos, state.player.radius, enemy.pos, enemy.radius) {
            continue;
        }

        let (radius, pos, color) = (enemy.radius, enemy.pos, enemy.color);
        let out = state.progression.take_hit(radius, &mut state.events);
        log::debug!("Player hit by r={} enemy", radius);

        if out {
            state.game_over();
            return;
        }

        state.enemies[i].destroyed = true;
        emit_burst(
            &mut state.particles,
            &mut state.rng,
            pos,
            radius.max(0.0) as usize,
            color,
            &state.tuning.particles,
            state.max_particles,
        );
        state.events.push(GameEvent::Sound(SoundKind::Destroy));
    }
}
