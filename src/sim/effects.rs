//! Particle bursts
//!
//! Purely visual. Particles never take part in collisions.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{Color, Particle};
use crate::tuning::ParticleParams;

/// Spawn `count` particles at `at`, dropping the oldest ones past `cap`
pub fn emit_burst(
    particles: &mut Vec<Particle>,
    rng: &mut Pcg32,
    at: Vec2,
    count: usize,
    color: Color,
    params: &ParticleParams,
    cap: usize,
) {
    let count = count.min(cap);
    if count == 0 {
        return;
    }

    particles.reserve(count);
    for _ in 0..count {
        let radius = rng.random::<f32>() * params.max_radius;
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * (rng.random::<f32>() * params.max_speed),
            (rng.random::<f32>() - 0.5) * (rng.random::<f32>() * params.max_speed),
        );
        particles.push(Particle {
            pos: at,
            vel,
            radius,
            color,
            alpha: 1.0,
            friction: params.friction,
            fade: params.fade,
        });
    }

    if particles.len() > cap {
        let excess = particles.len() - cap;
        particles.drain(..excess);
    }
}

/// Advance all particles and drop the faded ones
pub fn update_particles(particles: &mut Vec<Particle>) {
    use super::entity::Kinematic;

    for particle in particles.iter_mut() {
        particle.advance();
    }
    particles.retain(|p| !p.is_dead());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use rand::SeedableRng;

    #[test]
    fn test_burst_shape() {
        let params = Tuning::default().particles;
        let mut rng = Pcg32::seed_from_u64(1);
        let mut particles = Vec::new();
        let at = Vec2::new(50.0, 60.0);

        emit_burst(&mut particles, &mut rng, at, 32, Color(0xFF8844), &params, 1000);

        assert_eq!(particles.len(), 32);
        for p in &particles {
            assert_eq!(p.pos, at);
            assert_eq!(p.color, Color(0xFF8844));
            assert!(p.radius >= 0.0 && p.radius < params.max_radius);
            assert!(p.vel.x.abs() <= params.max_speed / 2.0);
            assert!(p.vel.y.abs() <= params.max_speed / 2.0);
            assert_eq!(p.alpha, 1.0);
        }
    }

    #[test]
    fn test_burst_respects_cap() {
        let params = Tuning::default().particles;
        let mut rng = Pcg32::seed_from_u64(2);
        let mut particles = Vec::new();

        emit_burst(&mut particles, &mut rng, Vec2::ZERO, 8, Color(1), &params, 10);
        emit_burst(&mut particles, &mut rng, Vec2::ONE, 8, Color(2), &params, 10);

        assert_eq!(particles.len(), 10);
        // Oldest go first
        assert_eq!(particles.iter().filter(|p| p.color == Color(2)).count(), 8);
    }

    #[test]
    fn test_particles_fade_out() {
        let params = Tuning::default().particles;
        let mut rng = Pcg32::seed_from_u64(3);
        let mut particles = Vec::new();
        emit_burst(&mut particles, &mut rng, Vec2::ZERO, 5, Color(1), &params, 100);

        for _ in 0..99 {
            update_particles(&mut particles);
        }
        assert_eq!(particles.len(), 5);
        // Alpha hits ~0 after 100 steps of 0.01 (float drift may need one more)
        for _ in 0..2 {
            update_particles(&mut particles);
        }
        assert!(particles.is_empty());
    }
}
