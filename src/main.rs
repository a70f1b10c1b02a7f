//! Bubble Popping entry point
//!
//! Browser: canvas game loop driven by `requestAnimationFrame`.
//! Native: headless autopilot run that saves the score record to a JSON file.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use bubble_popping::audio::AudioManager;
    use bubble_popping::consts::*;
    use bubble_popping::persistence::LocalStorageStore;
    use bubble_popping::platform::web::DomHud;
    use bubble_popping::renderer::{CanvasSurface, fit_canvas};
    use bubble_popping::sim::{Arena, Axis, Command, Direction, GamePhase, Special};
    use bubble_popping::{Collaborators, Game, Settings, Tuning};

    /// Delay before a finished game is replaced by a fresh one
    const RESTART_DELAY_MS: i32 = 2000;

    struct App {
        game: Game,
        canvas: HtmlCanvasElement,
        last_time: f64,
        /// A frame callback is pending
        running: bool,
        restart_pending: bool,
    }

    type Shared = Rc<RefCell<App>>;

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(err) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger init failed: {err}").into());
        }

        log::info!("Bubble Popping starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .query_selector("canvas")?
            .ok_or("no canvas")?
            .dyn_into()?;

        let (width, height) = fit_canvas(&canvas);
        let settings = Settings::load();

        let audio = AudioManager::new(settings.effective_volume());

        let collab = Collaborators {
            surface: Box::new(CanvasSurface::new(&canvas)),
            audio: Box::new(audio),
            hud: Box::new(DomHud::new()),
            store: Box::new(LocalStorageStore::new(RECORD_KEY)),
        };

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(seed, Tuning::default(), Arena::new(width, height), settings, collab);
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            game,
            canvas,
            last_time: 0.0,
            running: false,
            restart_pending: false,
        }));

        setup_input_handlers(app.clone())?;
        setup_resize(app.clone())?;

        // Draw the idle arena once so the player is visible behind the menu
        app.borrow_mut().game.render();

        log::info!("Bubble Popping ready - press Enter");
        Ok(())
    }

    fn send(app: &Shared, command: Command) {
        app.borrow_mut().game.command(command);
        let playing = app.borrow().game.phase() == GamePhase::Playing;
        if playing {
            start_loop(app.clone());
        }
    }

    fn setup_input_handlers(app: Shared) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Keyboard down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let player = app.borrow().game.session.player.pos;
                let command = match event.key().as_str() {
                    "Enter" => Command::Start,
                    "Escape" => Command::Pause,
                    "a" | "ArrowLeft" => Command::MoveStart(Direction::Left),
                    "d" | "ArrowRight" => Command::MoveStart(Direction::Right),
                    "w" | "ArrowUp" => Command::MoveStart(Direction::Up),
                    "s" | "ArrowDown" => Command::MoveStart(Direction::Down),
                    " " => {
                        event.prevent_default();
                        Command::FireSpecial(Special::Grenade, player)
                    }
                    "m" => {
                        toggle_mute(&app);
                        return;
                    }
                    _ => return,
                };
                send(&app, command);
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard up
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let command = match event.key().as_str() {
                    "a" | "d" | "ArrowLeft" | "ArrowRight" => Command::MoveStop(Axis::Horizontal),
                    "w" | "s" | "ArrowUp" | "ArrowDown" => Command::MoveStop(Axis::Vertical),
                    _ => return,
                };
                send(&app, command);
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Left click - primary fire
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let target = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                send(&app, Command::FirePrimary(target));
            });
            window.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Right click - rocket
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                let target = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                send(&app, Command::FireSpecial(Special::Rocket, target));
            });
            window.add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn toggle_mute(app: &Shared) {
        let mut a = app.borrow_mut();
        let settings = a.game.settings().toggle_mute();
        settings.save();
        log::info!("Sound {}", if settings.muted { "off" } else { "on" });
        a.game.apply_settings(settings);
    }

    fn setup_resize(app: Shared) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut a = app.borrow_mut();
            let (w, h) = fit_canvas(&a.canvas);
            a.game.resize(w, h);
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn start_loop(app: Shared) {
        {
            let mut a = app.borrow_mut();
            if a.running {
                return;
            }
            a.running = true;
            a.last_time = 0.0;
        }
        request_animation_frame(app);
    }

    fn request_animation_frame(app: Shared) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Shared, time: f64) {
        let keep_going = {
            let mut a = app.borrow_mut();

            // Calculate delta time
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            let keep_going = a.game.frame(dt);
            a.running = keep_going;
            keep_going
        };

        if keep_going {
            request_animation_frame(app);
        } else if app.borrow().game.phase() == GamePhase::GameOver {
            schedule_restart(app);
        }
    }

    fn schedule_restart(app: Shared) {
        {
            let mut a = app.borrow_mut();
            if a.restart_pending {
                return;
            }
            a.restart_pending = true;
        }
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move || {
            let mut a = app.borrow_mut();
            a.restart_pending = false;
            a.game.restart(js_sys::Date::now() as u64);
            a.game.render();
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            RESTART_DELAY_MS,
        );
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    use bubble_popping::autopilot::Autopilot;
    use bubble_popping::consts::*;
    use bubble_popping::persistence::JsonFileStore;
    use bubble_popping::platform::Headless;
    use bubble_popping::sim::{Arena, Command, GamePhase};
    use bubble_popping::{Collaborators, Game, QualityPreset, Settings, Tuning};

    /// Primary fire cadence of the autopilot (ticks between shots)
    const AUTOPILOT_FIRE_EVERY: u64 = 12;

    pub fn seed() -> u64 {
        env::var("BUBBLE_SEED")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(42)
    }

    /// Tick budget of one run (default three minutes of game time)
    pub fn ticks() -> u64 {
        env::var("BUBBLE_TICKS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60 * 180)
    }

    pub fn record_path() -> PathBuf {
        env::var("BUBBLE_RECORD_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("bubble-popping.json"))
    }

    pub fn settings() -> Settings {
        let Ok(value) = env::var("BUBBLE_QUALITY") else {
            return Settings::default();
        };
        match value.parse::<QualityPreset>() {
            Ok(quality) => Settings::with_quality(quality),
            Err(err) => {
                log::warn!("{}, using defaults", err);
                Settings::default()
            }
        }
    }

    /// Tuning from `BUBBLE_TUNING`, falling back to the built-in table
    pub fn tuning() -> Tuning {
        let Ok(path) = env::var("BUBBLE_TUNING") else {
            return Tuning::default();
        };
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("Cannot read tuning {}: {}", path, err);
                return Tuning::default();
            }
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(err) => {
                log::warn!("Rejected tuning {}: {}", path, err);
                Tuning::default()
            }
        }
    }

    pub fn run() {
        let seed = seed();
        let limit = ticks();
        let store = JsonFileStore::new(record_path());
        log::info!("Record file: {}", store.path().display());

        let collab = Collaborators {
            surface: Box::new(Headless),
            audio: Box::new(Headless),
            hud: Box::new(Headless),
            store: Box::new(store),
        };
        let arena = Arena::new(DEFAULT_ARENA_WIDTH, DEFAULT_ARENA_HEIGHT);
        let mut game = Game::new(seed, tuning(), arena, settings(), collab);
        let mut pilot = Autopilot::new(AUTOPILOT_FIRE_EVERY);

        game.command(Command::Start);
        let mut ticks_run = 0;
        while ticks_run < limit {
            for command in pilot.decide(&game.session) {
                game.command(command);
            }
            let keep_going = game.frame(SIM_DT);
            ticks_run += 1;
            if !keep_going {
                break;
            }
        }

        // Out of budget while still alive: pausing saves the record
        if game.phase() == GamePhase::Playing {
            game.command(Command::Pause);
        }

        let p = &game.session.progression;
        println!("seed         {}", seed);
        println!("ticks        {}", ticks_run);
        println!("outcome      {:?}", game.phase());
        println!("score        {}", p.score);
        println!("level        {:?}", p.level);
        println!("weapon       {:?}", p.weapon);
        println!("badges       {}", p.badges);
        if let Some(record) = game.record() {
            println!("best         {}", record.highest_score);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Bubble Popping (native, headless) starting...");
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
