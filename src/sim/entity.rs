//! Kinematic entities: player, enemies, bullets and particles
//!
//! Every entity integrates `pos += vel` once per tick. Particles additionally
//! apply friction before integrating and fade out.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Packed 0xRRGGBB color (cosmetic only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xFFFFFF);

    /// CSS hex form, e.g. `#FF8844`
    pub fn css(&self) -> String {
        format!("#{:06X}", self.0 & 0xFF_FFFF)
    }
}

/// Shared movement contract
pub trait Kinematic {
    fn pos(&self) -> Vec2;
    fn vel(&self) -> Vec2;
    fn radius(&self) -> f32;
    fn color(&self) -> Color;
    /// Integrate one tick of movement
    fn advance(&mut self);
}

/// Why an entity had to be dropped mid-tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityFault {
    NonFinitePosition,
    NonPositiveRadius(f32),
}

impl fmt::Display for EntityFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinitePosition => write!(f, "position is not finite"),
            Self::NonPositiveRadius(r) => write!(f, "radius {r} is not positive"),
        }
    }
}

impl std::error::Error for EntityFault {}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
}

impl Player {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            color: Color::WHITE,
        }
    }
}

impl Kinematic for Player {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn vel(&self) -> Vec2 {
        self.vel
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn color(&self) -> Color {
        self.color
    }
    fn advance(&mut self) {
        self.pos += self.vel;
    }
}

/// A bubble drifting towards the player
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Radius at spawn; the destroy score derives from it
    pub default_radius: f32,
    pub color: Color,
    pub armor: f32,
    /// radius / 8, refreshed every tick
    pub strength: f32,
    /// Marked for removal at the end of the tick
    pub destroyed: bool,
}

impl Enemy {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, color: Color, armor: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            default_radius: radius,
            color,
            armor,
            strength: radius / 8.0,
            destroyed: false,
        }
    }

    /// Check the derived state is still usable
    pub fn validate(&self) -> Result<(), EntityFault> {
        if !self.pos.is_finite() {
            return Err(EntityFault::NonFinitePosition);
        }
        if !(self.radius > 0.0) {
            return Err(EntityFault::NonPositiveRadius(self.radius));
        }
        Ok(())
    }

    /// Score awarded when this enemy is destroyed
    pub fn destroy_score(&self) -> u64 {
        destroy_score(self.default_radius)
    }
}

/// floor((default_radius / 8)^3)
pub fn destroy_score(default_radius: f32) -> u64 {
    (default_radius / 8.0).powi(3).floor().max(0.0) as u64
}

impl Kinematic for Enemy {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn vel(&self) -> Vec2 {
        self.vel
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn color(&self) -> Color {
        self.color
    }
    fn advance(&mut self) {
        self.strength = self.radius / 8.0;
        self.pos += self.vel;
    }
}

/// How a bullet behaves on impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireType {
    /// Primary fire, consumed on first hit
    Standard,
    /// Rocket, keeps flying through enemies
    Heavy,
    /// Grenade fragment, keeps flying through enemies
    Area,
}

impl FireType {
    pub fn is_piercing(&self) -> bool {
        match self {
            FireType::Standard => false,
            FireType::Heavy | FireType::Area => true,
        }
    }
}

/// A projectile fired by the player
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub power: f32,
    pub color: Color,
    pub fire_type: FireType,
    /// Consumed by a hit this tick
    pub spent: bool,
}

impl Bullet {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, power: f32, color: Color, fire_type: FireType) -> Self {
        Self {
            pos,
            vel,
            radius,
            power,
            color,
            fire_type,
            spent: false,
        }
    }
}

impl Kinematic for Bullet {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn vel(&self) -> Vec2 {
        self.vel
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn color(&self) -> Color {
        self.color
    }
    fn advance(&mut self) {
        self.pos += self.vel;
    }
}

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    /// 1.0 at spawn, removed once <= 0
    pub alpha: f32,
    pub friction: f32,
    pub fade: f32,
}

impl Particle {
    pub fn is_dead(&self) -> bool {
        self.alpha <= 0.0
    }
}

impl Kinematic for Particle {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn vel(&self) -> Vec2 {
        self.vel
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn color(&self) -> Color {
        self.color
    }
    fn advance(&mut self) {
        self.vel *= self.friction;
        self.pos += self.vel;
        self.alpha -= self.fade;
    }
}
