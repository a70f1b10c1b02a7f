//! Player weapons: primary fire, rockets and grenades

use glam::Vec2;
use rand::Rng;

use super::entity::{Bullet, Color, FireType};
use super::events::{GameEvent, ResourceKind, SoundKind};
use super::state::GameSession;
use crate::{heading, polar_to_cartesian};

/// Special weapons backed by charges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Special {
    Rocket,
    Grenade,
}

impl Special {
    pub fn resource(&self) -> ResourceKind {
        match self {
            Special::Rocket => ResourceKind::Rocket,
            Special::Grenade => ResourceKind::Grenade,
        }
    }
}

/// Fire one bullet from the player towards `target`.
/// Returns false when the session is not playing.
pub fn fire_primary(state: &mut GameSession, target: Vec2) -> bool {
    if !state.is_playing() {
        return false;
    }
    state.sync_weapon();

    let weapon = state.tuning.weapon(state.progression.weapon);
    let spread = state.tuning.bullet_spread;
    let deviation = if spread > 0.0 {
        state.rng.random_range(-spread..=spread)
    } else {
        0.0
    };
    let origin = state.player.pos;
    let vel = polar_to_cartesian(state.tuning.bullet_speed, heading(origin, target) + deviation);

    state.bullets.push(Bullet::new(
        origin,
        vel,
        weapon.bullet_radius,
        weapon.bullet_power,
        Color::WHITE,
        FireType::Standard,
    ));
    state.events.push(GameEvent::Sound(weapon.fire_sound));
    state.progression.spend_shot(&mut state.events);
    true
}

/// Fire a special weapon if a charge is available.
/// Returns true when bullets were created.
pub fn fire_special(state: &mut GameSession, special: Special, target: Vec2) -> bool {
    if !state.is_playing() {
        return false;
    }
    if !state.progression.spend_special(special.resource(), &mut state.events) {
        log::debug!("{:?} denied: no charges", special);
        return false;
    }
    state.sync_weapon();

    let weapon = state.tuning.weapon(state.progression.weapon);
    let origin = state.player.pos;
    let speed = state.tuning.bullet_speed;

    match special {
        Special::Rocket => {
            let params = state.tuning.rocket;
            state.bullets.push(Bullet::new(
                origin,
                polar_to_cartesian(speed, heading(origin, target)),
                weapon.bullet_radius * params.radius_mult,
                weapon.bullet_power * params.power_mult,
                params.color,
                FireType::Heavy,
            ));
        }
        Special::Grenade => {
            let params = state.tuning.grenade;
            let step = state.tuning.grenade_step_degrees.to_radians();
            for i in 0..state.tuning.grenade_fragments {
                state.bullets.push(Bullet::new(
                    origin,
                    polar_to_cartesian(speed, step * i as f32),
                    weapon.bullet_radius * params.radius_mult,
                    weapon.bullet_power * params.power_mult,
                    params.color,
                    FireType::Area,
                ));
            }
        }
    }

    state.events.push(GameEvent::Sound(weapon.fire_sound));
    state.events.push(GameEvent::Sound(SoundKind::WeaponChange));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Arena;
    use crate::tuning::Tuning;

    fn playing() -> GameSession {
        let mut state = GameSession::new(9, Tuning::default(), Arena::new(800.0, 600.0));
        state.start();
        state.drain_events();
        state
    }

    #[test]
    fn test_primary_needs_playing() {
        let mut state = GameSession::new(9, Tuning::default(), Arena::new(800.0, 600.0));
        assert!(!fire_primary(&mut state, Vec2::ZERO));
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_primary_uses_weapon_tier() {
        let mut state = playing();
        let target = state.player.pos + Vec2::new(100.0, 0.0);
        assert!(fire_primary(&mut state, target));

        let bullet = &state.bullets[0];
        assert_eq!(bullet.radius, 2.0);
        assert_eq!(bullet.power, 1.0);
        assert_eq!(bullet.fire_type, FireType::Standard);
        assert!((bullet.vel - Vec2::new(12.0, 0.0)).length() < 1e-4);
        assert_eq!(state.events, vec![GameEvent::Sound(SoundKind::Fire1)]);
    }

    #[test]
    fn test_depleted_special_is_denied() {
        let mut state = playing();
        assert!(!fire_special(&mut state, Special::Rocket, Vec2::ZERO));
        assert!(!fire_special(&mut state, Special::Grenade, Vec2::ZERO));
        assert!(state.bullets.is_empty());
        assert_eq!(state.progression.rockets.count, 0);
        assert_eq!(state.progression.grenades.count, 0);
        assert!(state.events.contains(&GameEvent::Denied { kind: ResourceKind::Rocket }));
        assert!(state.events.contains(&GameEvent::Sound(SoundKind::AccessDenied)));
    }

    #[test]
    fn test_rocket_consumes_charge() {
        let mut state = playing();
        state.progression.rockets.count = 2;
        state.progression.rockets.sub_score = 100;
        let target = state.player.pos + Vec2::new(0.0, -50.0);

        assert!(fire_special(&mut state, Special::Rocket, target));

        assert_eq!(state.progression.rockets.count, 1);
        assert_eq!(state.progression.rockets.sub_score, 0);
        let rocket = &state.bullets[0];
        assert_eq!(rocket.fire_type, FireType::Heavy);
        assert_eq!(rocket.radius, 6.0);
        assert_eq!(rocket.power, 24.0);
        assert!(rocket.vel.y < 0.0);
    }

    #[test]
    fn test_grenade_fans_out() {
        let mut state = playing();
        state.progression.grenades.count = 1;

        assert!(fire_special(&mut state, Special::Grenade, Vec2::ZERO));

        assert_eq!(state.bullets.len(), 9);
        assert!(state.bullets.iter().all(|b| b.fire_type == FireType::Area));
        assert!(state.bullets.iter().all(|b| b.power == 12.0 && b.radius == 4.0));
        assert!((state.bullets[0].vel - Vec2::new(12.0, 0.0)).length() < 1e-4);
        assert!((state.bullets[3].vel - Vec2::new(0.0, 12.0)).length() < 1e-3);
        assert_eq!(state.progression.grenades.count, 0);
    }
}
