//! Score, tiers and resource counters
//!
//! Level tier follows the score and never regresses. Weapon tier follows the
//! level tier (bubble rules) or the ammo total (life rules). Every transition
//! is reported once through `GameEvent`s.

use serde::{Deserialize, Serialize};

use super::entity::destroy_score;
use super::events::{GameEvent, ResourceKind, SoundKind};
use crate::tuning::{CounterParams, RulesVariant, Tuning};

/// Difficulty tier, selected by score breakpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LevelTier {
    One,
    Two,
    Three,
    Four,
    Five,
}

/// Weapon loadout tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeaponTier {
    One,
    Two,
    Three,
    Four,
    Five,
}

impl LevelTier {
    pub const ALL: [LevelTier; 5] = [
        LevelTier::One,
        LevelTier::Two,
        LevelTier::Three,
        LevelTier::Four,
        LevelTier::Five,
    ];

    pub fn index(&self) -> usize {
        match self {
            LevelTier::One => 0,
            LevelTier::Two => 1,
            LevelTier::Three => 2,
            LevelTier::Four => 3,
            LevelTier::Five => 4,
        }
    }

    /// Tier for a score; the score has to strictly exceed a breakpoint
    pub fn from_score(score: u64, breakpoints: &[u64; 4]) -> Self {
        let crossed = breakpoints.iter().filter(|&&b| score > b).count();
        Self::ALL[crossed]
    }
}

impl WeaponTier {
    pub const ALL: [WeaponTier; 5] = [
        WeaponTier::One,
        WeaponTier::Two,
        WeaponTier::Three,
        WeaponTier::Four,
        WeaponTier::Five,
    ];

    pub fn index(&self) -> usize {
        match self {
            WeaponTier::One => 0,
            WeaponTier::Two => 1,
            WeaponTier::Three => 2,
            WeaponTier::Four => 3,
            WeaponTier::Five => 4,
        }
    }

    pub fn from_level(level: LevelTier) -> Self {
        match level {
            LevelTier::One => WeaponTier::One,
            LevelTier::Two => WeaponTier::Two,
            LevelTier::Three => WeaponTier::Three,
            LevelTier::Four => WeaponTier::Four,
            LevelTier::Five => WeaponTier::Five,
        }
    }

    /// Tier for an ammo total; reaching a breakpoint is enough
    pub fn from_ammo(ammo: u64, breakpoints: &[u64; 4]) -> Self {
        let reached = breakpoints.iter().filter(|&&b| ammo >= b).count();
        Self::ALL[reached]
    }

    /// Ammo spent by one primary shot under life rules
    pub fn shot_cost(&self) -> u64 {
        self.index() as u64
    }
}

/// A capped charge counter fed by a sub-score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceCounter {
    pub count: u32,
    pub sub_score: u64,
    pub threshold: u64,
    pub cap: u32,
}

impl ResourceCounter {
    pub fn new(params: CounterParams, count: u32) -> Self {
        Self {
            count: count.min(params.cap),
            sub_score: 0,
            threshold: params.threshold,
            cap: params.cap,
        }
    }

    pub fn is_full(&self) -> bool {
        self.count >= self.cap
    }

    /// Add to the sub-score. Returns true when a charge was granted.
    pub fn feed(&mut self, amount: u64) -> bool {
        self.sub_score = self.sub_score.saturating_add(amount);
        if self.is_full() {
            self.sub_score = 0;
            false
        } else if self.sub_score > self.threshold {
            self.sub_score = 0;
            self.count += 1;
            true
        } else {
            false
        }
    }

    /// No accumulation while full
    pub fn settle(&mut self) {
        if self.is_full() {
            self.sub_score = 0;
        }
    }

    /// Spend one charge. Refused when empty.
    pub fn consume(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        self.sub_score = 0;
        true
    }
}

/// All progression state of one session
#[derive(Debug, Clone)]
pub struct Progression {
    pub variant: RulesVariant,
    pub score: u64,
    pub level: LevelTier,
    pub weapon: WeaponTier,
    /// One badge per level tier reached
    pub badges: u32,
    pub health: ResourceCounter,
    pub rockets: ResourceCounter,
    pub grenades: ResourceCounter,
    /// Life pool (life rules)
    pub life: i64,
    /// Bonus ammo total driving the weapon tier (life rules)
    pub ammo: u64,
    level_breakpoints: [u64; 4],
    ammo_breakpoints: [u64; 4],
}

impl Progression {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            variant: tuning.variant,
            score: 0,
            level: LevelTier::One,
            weapon: WeaponTier::One,
            badges: 1,
            health: ResourceCounter::new(tuning.health, tuning.starting_health),
            rockets: ResourceCounter::new(tuning.rockets, 0),
            grenades: ResourceCounter::new(tuning.grenades, 0),
            life: tuning.starting_life,
            ammo: 0,
            level_breakpoints: tuning.level_breakpoints,
            ammo_breakpoints: tuning.ammo_breakpoints,
        }
    }

    pub fn counter(&self, kind: ResourceKind) -> &ResourceCounter {
        match kind {
            ResourceKind::Health => &self.health,
            ResourceKind::Rocket => &self.rockets,
            ResourceKind::Grenade => &self.grenades,
        }
    }

    fn counter_mut(&mut self, kind: ResourceKind) -> &mut ResourceCounter {
        match kind {
            ResourceKind::Health => &mut self.health,
            ResourceKind::Rocket => &mut self.rockets,
            ResourceKind::Grenade => &mut self.grenades,
        }
    }

    /// Credit a destroyed enemy. Returns the points awarded.
    pub fn award_destroy(&mut self, default_radius: f32, events: &mut Vec<GameEvent>) -> u64 {
        let points = destroy_score(default_radius);
        self.add_score(points, events);

        match self.variant {
            RulesVariant::Bubble => {
                let health_points = (default_radius / 8.0).floor().max(0.0) as u64;
                self.feed(ResourceKind::Health, health_points, events);
            }
            RulesVariant::Life => {
                self.ammo = self.ammo.saturating_add(points);
                events.push(GameEvent::AmmoChanged(self.ammo));
            }
        }
        self.feed(ResourceKind::Rocket, points, events);
        self.feed(ResourceKind::Grenade, points, events);
        points
    }

    /// Credit a shrinking hit (life rules only)
    pub fn award_hit(&mut self, points: u64, events: &mut Vec<GameEvent>) {
        if points > 0 {
            self.add_score(points, events);
        }
    }

    fn add_score(&mut self, points: u64, events: &mut Vec<GameEvent>) {
        self.score = self.score.saturating_add(points);
        events.push(GameEvent::ScoreChanged(self.score));
    }

    fn feed(&mut self, kind: ResourceKind, amount: u64, events: &mut Vec<GameEvent>) {
        let counter = self.counter_mut(kind);
        if counter.feed(amount) {
            let count = counter.count;
            log::debug!("{} charge granted ({})", kind.as_str(), count);
            events.push(GameEvent::ResourceGranted { kind, count });
            events.push(GameEvent::ResourceChanged { kind, count });
            events.push(GameEvent::Sound(match kind {
                ResourceKind::Health => SoundKind::Health,
                ResourceKind::Rocket | ResourceKind::Grenade => SoundKind::WeaponChange,
            }));
        }
    }

    /// Force sub-scores of full counters back to zero
    pub fn settle(&mut self) {
        self.health.settle();
        self.rockets.settle();
        self.grenades.settle();
    }

    /// Move the level tier up if the score crossed a breakpoint.
    /// Returns the new tier on a transition.
    pub fn refresh_level(&mut self, events: &mut Vec<GameEvent>) -> Option<LevelTier> {
        let target = LevelTier::from_score(self.score, &self.level_breakpoints);
        if target <= self.level {
            return None;
        }
        let from = self.level;
        self.level = target;
        self.badges += 1;
        log::info!("Level {:?} -> {:?} (score {})", from, target, self.score);
        events.push(GameEvent::LevelChanged { from, to: target });
        events.push(GameEvent::BadgeAdded { badges: self.badges });
        events.push(GameEvent::Sound(SoundKind::Health));
        Some(target)
    }

    /// Recompute the weapon tier. Returns the new tier on a transition.
    pub fn refresh_weapon(&mut self, events: &mut Vec<GameEvent>) -> Option<WeaponTier> {
        let target = match self.variant {
            RulesVariant::Bubble => WeaponTier::from_level(self.level),
            RulesVariant::Life => WeaponTier::from_ammo(self.ammo, &self.ammo_breakpoints),
        };
        if target == self.weapon {
            return None;
        }
        let from = self.weapon;
        self.weapon = target;
        log::info!("Weapon {:?} -> {:?}", from, target);
        events.push(GameEvent::WeaponChanged { from, to: target });
        events.push(GameEvent::Sound(SoundKind::WeaponChange));
        Some(target)
    }

    /// Pay for a primary shot (life rules only)
    pub fn spend_shot(&mut self, events: &mut Vec<GameEvent>) {
        if self.variant != RulesVariant::Life {
            return;
        }
        let cost = self.weapon.shot_cost();
        if cost > 0 {
            self.ammo = self.ammo.saturating_sub(cost);
            events.push(GameEvent::AmmoChanged(self.ammo));
        }
    }

    /// Spend one special charge, or report a denial
    pub fn spend_special(&mut self, kind: ResourceKind, events: &mut Vec<GameEvent>) -> bool {
        let counter = self.counter_mut(kind);
        if !counter.consume() {
            events.push(GameEvent::Denied { kind });
            events.push(GameEvent::Sound(SoundKind::AccessDenied));
            return false;
        }
        let count = counter.count;
        events.push(GameEvent::ResourceChanged { kind, count });
        true
    }

    /// Apply a player/enemy collision. Returns true when the player is out.
    pub fn take_hit(&mut self, enemy_radius: f32, events: &mut Vec<GameEvent>) -> bool {
        match self.variant {
            RulesVariant::Bubble => {
                let cost = (enemy_radius / 16.0).floor().max(0.0) as u32;
                if self.health.count < cost {
                    self.health.count = 0;
                } else {
                    self.health.count -= cost;
                    self.health.sub_score = 0;
                }
                events.push(GameEvent::ResourceChanged {
                    kind: ResourceKind::Health,
                    count: self.health.count,
                });
                self.health.count == 0
            }
            RulesVariant::Life => {
                let cost = enemy_radius.floor().max(0.0) as i64;
                self.life = (self.life - cost).max(0);
                events.push(GameEvent::LifeChanged(self.life));
                self.life <= 0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn breakpoints() -> [u64; 4] {
        Tuning::default().level_breakpoints
    }

    #[test]
    fn test_level_from_score_is_strict() {
        let bp = breakpoints();
        assert_eq!(LevelTier::from_score(0, &bp), LevelTier::One);
        assert_eq!(LevelTier::from_score(10_000, &bp), LevelTier::One);
        assert_eq!(LevelTier::from_score(10_001, &bp), LevelTier::Two);
        assert_eq!(LevelTier::from_score(100_001, &bp), LevelTier::Three);
        assert_eq!(LevelTier::from_score(1_000_001, &bp), LevelTier::Four);
        assert_eq!(LevelTier::from_score(10_000_001, &bp), LevelTier::Five);
        assert_eq!(LevelTier::from_score(u64::MAX, &bp), LevelTier::Five);
    }

    #[test]
    fn test_weapon_from_ammo() {
        let bp = Tuning::default().ammo_breakpoints;
        assert_eq!(WeaponTier::from_ammo(0, &bp), WeaponTier::One);
        assert_eq!(WeaponTier::from_ammo(100, &bp), WeaponTier::Two);
        assert_eq!(WeaponTier::from_ammo(499, &bp), WeaponTier::Two);
        assert_eq!(WeaponTier::from_ammo(10_000, &bp), WeaponTier::Five);
    }

    #[test]
    fn test_counter_grants_after_threshold() {
        let mut counter = ResourceCounter::new(CounterParams { threshold: 16, cap: 10 }, 0);
        assert!(!counter.feed(16));
        assert_eq!(counter.sub_score, 16);
        assert!(counter.feed(1));
        assert_eq!(counter.count, 1);
        assert_eq!(counter.sub_score, 0);
    }

    #[test]
    fn test_counter_full_drops_sub_score() {
        let mut counter = ResourceCounter::new(CounterParams { threshold: 16, cap: 2 }, 2);
        assert!(!counter.feed(1000));
        assert_eq!(counter.count, 2);
        assert_eq!(counter.sub_score, 0);
        counter.sub_score = 5;
        counter.settle();
        assert_eq!(counter.sub_score, 0);
    }

    #[test]
    fn test_consume_refuses_when_empty() {
        let mut counter = ResourceCounter::new(CounterParams { threshold: 512, cap: 10 }, 0);
        assert!(!counter.consume());
        assert_eq!(counter.count, 0);
        counter.count = 1;
        counter.sub_score = 300;
        assert!(counter.consume());
        assert_eq!(counter.count, 0);
        assert_eq!(counter.sub_score, 0);
    }

    #[test]
    fn test_award_destroy_feeds_counters() {
        let mut progression = Progression::new(&Tuning::default());
        let mut events = Vec::new();
        let points = progression.award_destroy(64.0, &mut events);
        assert_eq!(points, 512);
        assert_eq!(progression.score, 512);
        assert_eq!(progression.health.sub_score, 8);
        // 512 is not > 512, so no rocket yet
        assert_eq!(progression.rockets.count, 0);
        assert_eq!(progression.rockets.sub_score, 512);

        progression.award_destroy(16.0, &mut events);
        assert_eq!(progression.rockets.count, 1);
        assert!(events.contains(&GameEvent::ResourceGranted {
            kind: ResourceKind::Rocket,
            count: 1
        }));
        assert!(events.contains(&GameEvent::ScoreChanged(520)));
    }

    #[test]
    fn test_level_transition_fires_once() {
        let mut progression = Progression::new(&Tuning::default());
        let mut events = Vec::new();
        progression.score = 20_000;
        assert_eq!(progression.refresh_level(&mut events), Some(LevelTier::Two));
        assert_eq!(progression.badges, 2);
        assert_eq!(progression.refresh_level(&mut events), None);
        let changes = events
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelChanged { .. }))
            .count();
        assert_eq!(changes, 1);

        assert_eq!(progression.refresh_weapon(&mut events), Some(WeaponTier::Two));
        assert_eq!(progression.refresh_weapon(&mut events), None);
    }

    #[test]
    fn test_life_weapon_moves_both_ways() {
        let mut progression = Progression::new(&Tuning::life_rules());
        let mut events = Vec::new();
        progression.ammo = 101;
        assert_eq!(progression.refresh_weapon(&mut events), Some(WeaponTier::Two));
        progression.spend_shot(&mut events);
        progression.spend_shot(&mut events);
        assert_eq!(progression.ammo, 99);
        assert_eq!(progression.refresh_weapon(&mut events), Some(WeaponTier::One));
        assert_eq!(progression.refresh_weapon(&mut events), None);
        let changes = events
            .iter()
            .filter(|e| matches!(e, GameEvent::WeaponChanged { .. }))
            .count();
        assert_eq!(changes, 2);
    }

    #[test]
    fn test_bubble_hit_costs_health_units() {
        let mut progression = Progression::new(&Tuning::default());
        let mut events = Vec::new();
        progression.health.count = 3;
        progression.health.sub_score = 7;
        assert!(!progression.take_hit(32.0, &mut events));
        assert_eq!(progression.health.count, 1);
        assert_eq!(progression.health.sub_score, 0);
        assert!(progression.take_hit(48.0, &mut events));
        assert_eq!(progression.health.count, 0);
    }

    #[test]
    fn test_life_hit_clamps_at_zero() {
        let mut tuning = Tuning::life_rules();
        tuning.starting_life = 10;
        let mut progression = Progression::new(&tuning);
        let mut events = Vec::new();
        assert!(progression.take_hit(16.0, &mut events));
        assert_eq!(progression.life, 0);
        assert_eq!(events, vec![GameEvent::LifeChanged(0)]);
    }

    #[test]
    fn test_spend_special_denied() {
        let mut progression = Progression::new(&Tuning::default());
        let mut events = Vec::new();
        assert!(!progression.spend_special(ResourceKind::Grenade, &mut events));
        assert_eq!(progression.grenades.count, 0);
        assert!(events.contains(&GameEvent::Sound(SoundKind::AccessDenied)));
    }

    proptest! {
        #[test]
        fn counter_never_exceeds_cap(feeds in proptest::collection::vec(0u64..5_000, 0..200)) {
            let mut counter = ResourceCounter::new(CounterParams { threshold: 16, cap: 10 }, 0);
            for amount in feeds {
                counter.feed(amount);
                counter.settle();
                prop_assert!(counter.count <= counter.cap);
            }
        }

        #[test]
        fn level_never_regresses(mut gains in proptest::collection::vec(0u64..3_000_000, 1..50)) {
            let mut progression = Progression::new(&Tuning::default());
            let mut events = Vec::new();
            let mut last = progression.level;
            for gain in gains.drain(..) {
                progression.score += gain;
                progression.refresh_level(&mut events);
                prop_assert!(progression.level >= last);
                last = progression.level;
            }
        }
    }
}
