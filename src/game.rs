//! Session driver
//!
//! Owns the `GameSession` plus the collaborators and turns frame time into
//! fixed ticks. After every frame or command the queued `GameEvent`s are
//! routed to audio, HUD and storage.

use crate::consts::{MAX_SUBSTEPS, SIM_DT, TICK_MS};
use crate::highscores::PersistedRecord;
use crate::persistence::{RecordStore, load_or_default, save_score};
use crate::platform::{AudioSink, DisplayField, Hud, Surface};
use crate::settings::Settings;
use crate::sim::{
    Arena, Command, GameEvent, GamePhase, GameSession, Kinematic, ResourceKind, input, tick,
};
use crate::tuning::{RulesVariant, Tuning};

/// Everything outside the simulation the game talks to
pub struct Collaborators {
    pub surface: Box<dyn Surface>,
    pub audio: Box<dyn AudioSink>,
    pub hud: Box<dyn Hud>,
    pub store: Box<dyn RecordStore>,
}

pub struct Game {
    pub session: GameSession,
    collab: Collaborators,
    settings: Settings,
    record: Option<PersistedRecord>,
    accumulator: f32,
}

impl Game {
    /// Build a paused game and show the stored record
    pub fn new(seed: u64, tuning: Tuning, arena: Arena, settings: Settings, collab: Collaborators) -> Self {
        let record = load_or_default(collab.store.as_ref());
        let mut session = GameSession::new(seed, tuning, arena);
        session.max_particles = settings.max_particles();

        let mut game = Self {
            session,
            collab,
            settings,
            record,
            accumulator: 0.0,
        };
        game.collab.audio.set_volume(game.settings.effective_volume());
        game.sync_hud();
        log::info!("Game ready (seed {}, {:?} rules)", seed, game.session.tuning.variant);
        game
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn record(&self) -> Option<PersistedRecord> {
        self.record
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.collab.store.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply one input command and route its effects
    pub fn command(&mut self, command: Command) {
        input::apply(&mut self.session, command);
        self.dispatch_events();
    }

    /// Advance by `dt` seconds of wall time.
    /// Returns whether the host should keep scheduling frames.
    pub fn frame(&mut self, dt: f32) -> bool {
        if self.session.is_playing() {
            let dt = dt.clamp(0.0, 0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.session, TICK_MS);
                self.accumulator -= SIM_DT;
                substeps += 1;
                if !self.session.is_playing() {
                    self.accumulator = 0.0;
                    break;
                }
            }
        } else {
            self.accumulator = 0.0;
        }

        self.dispatch_events();
        self.render();
        self.session.is_playing()
    }

    /// Draw the current state. A failed draw skips that shape only.
    pub fn render(&mut self) {
        let arena = self.session.arena;
        let surface = self.collab.surface.as_mut();
        if let Err(err) = surface.begin_frame(arena.width, arena.height) {
            log::warn!("Skipping frame: {}", err);
            return;
        }

        let session = &self.session;
        let mut failed = 0usize;
        let mut draw = |pos, radius, color, alpha| {
            if surface.draw_circle(pos, radius, color, alpha).is_err() {
                failed += 1;
            }
        };

        for particle in &session.particles {
            draw(particle.pos, particle.radius, particle.color, particle.alpha.max(0.0));
        }
        for bullet in &session.bullets {
            draw(bullet.pos(), bullet.radius(), bullet.color(), 1.0);
        }
        for enemy in &session.enemies {
            draw(enemy.pos(), enemy.radius(), enemy.color(), 1.0);
        }
        draw(session.player.pos(), session.player.radius(), session.player.color(), 1.0);

        if failed > 0 {
            log::warn!("{} draw calls failed this frame", failed);
        }
    }

    /// Fresh session after game over, keeping the stored record
    pub fn restart(&mut self, seed: u64) {
        let tuning = self.session.tuning.clone();
        let arena = self.session.arena;
        self.session = GameSession::new(seed, tuning, arena);
        self.session.max_particles = self.settings.max_particles();
        self.accumulator = 0.0;
        self.sync_hud();
        log::info!("Game restarted (seed {})", seed);
    }

    /// Follow the host's viewport size
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.session.arena = Arena::new(width, height);
        }
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.session.max_particles = settings.max_particles();
        self.collab.audio.set_volume(settings.effective_volume());
        self.settings = settings;
    }

    fn dispatch_events(&mut self) {
        for event in self.session.drain_events() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::Sound(kind) => {
                if !self.settings.muted {
                    let duration = self.session.tuning.sound_duration_ms(kind);
                    self.collab.audio.play(kind, duration);
                }
            }
            GameEvent::ScoreChanged(score) => self.set(DisplayField::Score, score),
            // Already logged by the progression engine
            GameEvent::LevelChanged { .. } | GameEvent::WeaponChanged { .. } => {}
            GameEvent::BadgeAdded { badges } => self.set(DisplayField::Badges, badges),
            GameEvent::ResourceChanged { kind, count } => self.set(resource_field(kind), count),
            GameEvent::ResourceGranted { kind, count } => {
                log::debug!("Granted {} ({} now)", kind.as_str(), count);
                self.set(resource_field(kind), count);
            }
            GameEvent::Denied { kind } => log::debug!("No {} charges", kind.as_str()),
            GameEvent::LifeChanged(life) => self.set(DisplayField::Life, life),
            GameEvent::AmmoChanged(ammo) => self.set(DisplayField::AmmoCount, ammo),
            GameEvent::Started => {
                self.set(DisplayField::Score, self.session.progression.score);
                self.collab.hud.set_text(DisplayField::Status, "New Game");
                self.collab.hud.set_menu_visible(false);
            }
            GameEvent::Paused => {
                self.collab.hud.set_text(DisplayField::Status, "Paused");
                self.collab.hud.set_menu_visible(true);
                self.persist(self.session.progression.score);
            }
            GameEvent::GameOver { score } => {
                self.collab.hud.set_text(DisplayField::Status, "Game Over");
                self.collab.hud.set_menu_visible(true);
                self.persist(score);
            }
        }
    }

    fn persist(&mut self, score: u64) {
        if score > 0 && self.record.is_none_or(|r| r.is_new_best(score)) {
            log::info!("New high score: {}", score);
        }
        match save_score(self.collab.store.as_mut(), score) {
            Ok(record) => {
                self.record = Some(record);
                self.set(DisplayField::HighScore, record.highest_score);
            }
            Err(err) => log::warn!("Could not save record: {}", err),
        }
    }

    fn set(&mut self, field: DisplayField, value: impl ToString) {
        self.collab.hud.set_text(field, &value.to_string());
    }

    /// Push every counter to the HUD. Before the first start the score field
    /// shows the last run's score from the record.
    fn sync_hud(&mut self) {
        let p = &self.session.progression;
        let shown_score = self.record.map(|r| r.last_score).unwrap_or(p.score);
        let values = [
            (DisplayField::Score, shown_score.to_string()),
            (DisplayField::Badges, p.badges.to_string()),
            (DisplayField::Rockets, p.rockets.count.to_string()),
            (DisplayField::Grenades, p.grenades.count.to_string()),
        ];
        let variant_values = match p.variant {
            RulesVariant::Bubble => [(DisplayField::Health, p.health.count.to_string())],
            RulesVariant::Life => [(DisplayField::Life, p.life.to_string())],
        };
        let ammo = (p.variant == RulesVariant::Life).then(|| p.ammo.to_string());
        let high = self.record.map(|r| r.highest_score).unwrap_or(0);

        for (field, value) in values.iter().chain(variant_values.iter()) {
            self.collab.hud.set_text(*field, value);
        }
        if let Some(ammo) = ammo {
            self.collab.hud.set_text(DisplayField::AmmoCount, &ammo);
        }
        self.set(DisplayField::HighScore, high);
    }
}

fn resource_field(kind: ResourceKind) -> DisplayField {
    match kind {
        ResourceKind::Health => DisplayField::Health,
        ResourceKind::Rocket => DisplayField::Rockets,
        ResourceKind::Grenade => DisplayField::Grenades,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::platform::SurfaceError;
    use crate::sim::{Color, Enemy, SoundKind};
    use glam::Vec2;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        sounds: Vec<(SoundKind, u32)>,
        hud: HashMap<DisplayField, String>,
        menu_visible: Option<bool>,
        volume: Option<f32>,
        circles: usize,
    }

    #[derive(Clone, Default)]
    struct Recorder {
        log: Rc<RefCell<Log>>,
        broken: bool,
    }

    impl Surface for Recorder {
        fn begin_frame(&mut self, _width: f32, _height: f32) -> Result<(), SurfaceError> {
            Ok(())
        }

        fn draw_circle(&mut self, _pos: Vec2, _radius: f32, _color: Color, _alpha: f32) -> Result<(), SurfaceError> {
            if self.broken {
                return Err(SurfaceError::Unavailable);
            }
            self.log.borrow_mut().circles += 1;
            Ok(())
        }
    }

    impl AudioSink for Recorder {
        fn play(&mut self, kind: SoundKind, duration_ms: u32) {
            self.log.borrow_mut().sounds.push((kind, duration_ms));
        }

        fn set_volume(&mut self, volume: f32) {
            self.log.borrow_mut().volume = Some(volume);
        }
    }

    impl Hud for Recorder {
        fn set_text(&mut self, field: DisplayField, value: &str) {
            self.log.borrow_mut().hud.insert(field, value.to_string());
        }

        fn set_menu_visible(&mut self, visible: bool) {
            self.log.borrow_mut().menu_visible = Some(visible);
        }
    }

    fn game_with(tuning: Tuning, store: MemoryStore, broken_surface: bool) -> (Game, Rc<RefCell<Log>>) {
        let recorder = Recorder::default();
        let log = recorder.log.clone();
        let surface = Recorder {
            broken: broken_surface,
            ..recorder.clone()
        };
        let collab = Collaborators {
            surface: Box::new(surface),
            audio: Box::new(recorder.clone()),
            hud: Box::new(recorder),
            store: Box::new(store),
        };
        let game = Game::new(3, tuning, Arena::new(800.0, 600.0), Settings::default(), collab);
        (game, log)
    }

    fn hud(log: &Rc<RefCell<Log>>, field: DisplayField) -> Option<String> {
        log.borrow().hud.get(&field).cloned()
    }

    #[test]
    fn test_startup_shows_stored_scores() {
        let store = MemoryStore::with_raw(r#"{"highestScore":900,"score":12}"#);
        let (mut game, log) = game_with(Tuning::default(), store, false);
        assert_eq!(hud(&log, DisplayField::HighScore).as_deref(), Some("900"));
        assert_eq!(hud(&log, DisplayField::Score).as_deref(), Some("12"));
        assert_eq!(game.record().map(|r| r.last_score), Some(12));

        game.command(Command::Start);
        assert_eq!(hud(&log, DisplayField::Score).as_deref(), Some("0"));
    }

    #[test]
    fn test_pause_persists_record() {
        let (mut game, log) = game_with(Tuning::default(), MemoryStore::new(), false);
        game.command(Command::Start);
        assert_eq!(log.borrow().menu_visible, Some(false));

        game.session.progression.score = 250;
        game.command(Command::Pause);

        assert_eq!(
            game.store().load().unwrap(),
            Some(PersistedRecord { highest_score: 250, last_score: 250 })
        );
        assert_eq!(hud(&log, DisplayField::Status).as_deref(), Some("Paused"));
        assert_eq!(hud(&log, DisplayField::HighScore).as_deref(), Some("250"));

        // Pausing again is a no-op
        game.command(Command::Pause);
        assert_eq!(game.phase(), GamePhase::Paused);
    }

    #[test]
    fn test_game_over_scenario() {
        let mut tuning = Tuning::life_rules();
        tuning.starting_life = 10;
        let store = MemoryStore::with_raw(r#"{"highestScore":500,"score":500}"#);
        let (mut game, log) = game_with(tuning, store, false);

        game.command(Command::Start);
        let pos = game.session.player.pos;
        game.session
            .enemies
            .push(Enemy::new(pos, Vec2::ZERO, 16.0, Color(0xFF8844), 0.0));

        let keep_going = game.frame(SIM_DT);

        assert!(!keep_going);
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.session.progression.life, 0);
        assert!(!game.session.spawner.timer.is_armed());
        assert_eq!(hud(&log, DisplayField::Life).as_deref(), Some("0"));
        assert_eq!(hud(&log, DisplayField::Status).as_deref(), Some("Game Over"));
        assert_eq!(
            game.store().load().unwrap(),
            Some(PersistedRecord { highest_score: 500, last_score: 0 })
        );
        let over_sounds = log
            .borrow()
            .sounds
            .iter()
            .filter(|(k, _)| *k == SoundKind::GameOver)
            .count();
        assert_eq!(over_sounds, 1);

        // Nothing happens after the end
        assert!(!game.frame(1.0));
        let over_sounds = log
            .borrow()
            .sounds
            .iter()
            .filter(|(k, _)| *k == SoundKind::GameOver)
            .count();
        assert_eq!(over_sounds, 1);
    }

    #[test]
    fn test_fire_plays_sound_with_duration() {
        let (mut game, log) = game_with(Tuning::default(), MemoryStore::new(), false);
        game.command(Command::Start);
        game.command(Command::FirePrimary(Vec2::new(0.0, 0.0)));

        let expected = game.session.tuning.sound_duration_ms(SoundKind::Fire1);
        assert!(log.borrow().sounds.contains(&(SoundKind::Fire1, expected)));
    }

    #[test]
    fn test_muting_silences_effects() {
        let (mut game, log) = game_with(Tuning::default(), MemoryStore::new(), false);
        assert_eq!(log.borrow().volume, Some(0.2));

        game.apply_settings(Settings {
            muted: true,
            ..Settings::default()
        });
        assert_eq!(log.borrow().volume, Some(0.0));

        game.command(Command::Start);
        game.command(Command::FirePrimary(Vec2::new(0.0, 0.0)));
        assert!(log.borrow().sounds.is_empty());
    }

    #[test]
    fn test_frame_runs_bounded_substeps() {
        let (mut game, _log) = game_with(Tuning::default(), MemoryStore::new(), false);
        game.command(Command::Start);
        assert!(game.frame(1.0));
        assert_eq!(game.session.time_ticks, MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_broken_surface_does_not_stop_the_game() {
        let (mut game, log) = game_with(Tuning::default(), MemoryStore::new(), true);
        game.command(Command::Start);
        assert!(game.frame(SIM_DT));
        assert_eq!(game.session.time_ticks, 1);
        assert_eq!(log.borrow().circles, 0);
    }

    #[test]
    fn test_render_draws_every_entity() {
        let (mut game, log) = game_with(Tuning::default(), MemoryStore::new(), false);
        game.session
            .enemies
            .push(Enemy::new(Vec2::new(10.0, 10.0), Vec2::ZERO, 32.0, Color(0x6666FF), 0.0));
        game.render();
        assert_eq!(log.borrow().circles, 2);
    }

    #[test]
    fn test_restart_keeps_record() {
        let (mut game, log) = game_with(Tuning::default(), MemoryStore::new(), false);
        game.command(Command::Start);
        game.session.progression.score = 77;
        game.session.game_over();
        game.frame(SIM_DT);
        assert_eq!(game.phase(), GamePhase::GameOver);

        game.restart(4);
        assert_eq!(game.phase(), GamePhase::Paused);
        assert_eq!(game.session.progression.score, 0);
        assert_eq!(game.record().map(|r| r.highest_score), Some(77));
        assert_eq!(hud(&log, DisplayField::HighScore).as_deref(), Some("77"));
        assert_eq!(hud(&log, DisplayField::Score).as_deref(), Some("77"));

        game.command(Command::Start);
        assert_eq!(hud(&log, DisplayField::Score).as_deref(), Some("0"));
    }
}
