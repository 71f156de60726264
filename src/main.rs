//! Rabbit Chase entry point
//!
//! In the browser: wires DOM input, runs the frame loop and hands each
//! frame's snapshot to the page's renderer. Natively: plays a headless
//! demo round with an autopilot player.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CustomEvent, Document, HtmlInputElement, KeyboardEvent, Window};

    use glam::Vec2;
    use rabbit_chase::audio::{AudioManager, SoundEffect};
    use rabbit_chase::events::{EventBus, EventLog};
    use rabbit_chase::platform::{InputState, LocalStorage, now_ms};
    use rabbit_chase::ranking::{RecordedRanks, format_time};
    use rabbit_chase::sim::{FrameSnapshot, GameEvent, GamePhase, GameState, tick};
    use rabbit_chase::{Rankings, Settings};

    // The page owns the 3D scene; we hand it one snapshot per frame
    #[wasm_bindgen(inline_js = "
        export function render_frame(json) {
            const render = window.rabbitChaseRender;
            if (typeof render !== 'function') {
                return;
            }
            try {
                render(JSON.parse(json));
            } catch (e) {
                console.error('rabbitChaseRender failed:', e);
            }
        }
    ")]
    extern "C" {
        fn render_frame(json: &str);
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: InputState,
        bus: EventBus,
        audio: Rc<RefCell<AudioManager>>,
        rankings: Rankings,
        settings: Settings,
        storage: Option<LocalStorage>,
        last_time: f64,
        /// Ranks from the last victory, for the game-over panel
        last_ranks: Option<RecordedRanks>,
        /// Victory time frozen at the catch
        victory_secs: u64,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let storage = LocalStorage::open();
            if storage.is_none() {
                log::warn!("LocalStorage unavailable - rankings won't persist");
            }
            let (settings, rankings) = match &storage {
                Some(s) => (Settings::load(s), Rankings::load(s)),
                None => (Settings::default(), Rankings::new()),
            };

            let audio = Rc::new(RefCell::new(AudioManager::new(&settings)));
            let mut bus = EventBus::new();
            bus.subscribe(Box::new(audio.clone()));
            bus.subscribe(Box::new(EventLog));

            let mut state = GameState::new(seed);
            state.session.set_player_name(&settings.player_name);

            Self {
                state,
                input: InputState::new(),
                bus,
                audio,
                rankings,
                settings,
                storage,
                last_time: 0.0,
                last_ranks: None,
                victory_secs: 0,
            }
        }

        fn start(&mut self) {
            self.audio.borrow().resume();
            if self.state.phase() != GamePhase::Idle {
                self.state.reset_game();
            }
            self.state.start_game(now_ms());
            self.last_ranks = None;
            self.victory_secs = 0;
        }

        /// Run one frame
        fn update(&mut self, dt: f32) {
            // Long gaps (tab hidden) shouldn't teleport anyone
            let dt = dt.min(0.1);
            let input = self.input.tick_input();
            tick(&mut self.state, &input, dt);

            let events = self.state.drain_events();
            if events.contains(&GameEvent::Victory) {
                self.record_victory();
            }
            self.bus.dispatch(&events);
            self.audio.borrow_mut().pump_bgm();
        }

        fn record_victory(&mut self) {
            let now = now_ms();
            self.victory_secs = self.state.elapsed_secs(now);
            let ranks = self.rankings.record_result(
                self.state.session.player_name(),
                self.victory_secs,
                self.state.session.droppings_collected,
                now,
            );
            if let Some(storage) = self.storage.as_mut() {
                if let Err(e) = self.rankings.save(storage) {
                    log::warn!("Failed to save rankings: {}", e);
                }
            }
            if ranks.time.is_some() || ranks.droppings.is_some() {
                self.audio.borrow().play(SoundEffect::NewRecord);
            }
            self.last_ranks = Some(ranks);
        }

        fn set_player_name(&mut self, name: &str) {
            let name = self.settings.set_player_name(name).to_string();
            self.state.session.set_player_name(&name);
            self.save_settings();
        }

        fn toggle_sound(&mut self) -> bool {
            let enabled = self.settings.toggle_sound();
            self.audio.borrow_mut().apply_settings(&self.settings);
            self.save_settings();
            enabled
        }

        fn save_settings(&mut self) {
            if let Some(storage) = self.storage.as_mut() {
                if let Err(e) = self.settings.save(storage) {
                    log::warn!("Failed to save settings: {}", e);
                }
            }
        }

        /// Hand the frame to the page renderer
        fn render(&self) {
            match FrameSnapshot::capture(&self.state).to_json() {
                Ok(json) => render_frame(&json),
                Err(e) => log::warn!("Snapshot failed: {}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let session = &self.state.session;

            set_text(document, "hud-time", &format_time(session.time_remaining as u64));
            set_text(document, "hud-droppings", &session.droppings_collected.to_string());

            set_hidden(document, "start-screen", session.phase != GamePhase::Idle);
            set_hidden(document, "hud", session.phase != GamePhase::Active);
            set_hidden(document, "game-over", session.phase != GamePhase::Ended);

            if session.phase == GamePhase::Ended {
                let title = if session.is_victory {
                    "You caught the rabbit!"
                } else {
                    "Time's up!"
                };
                set_text(document, "result-title", title);
                set_text(document, "result-droppings", &session.droppings_collected.to_string());
                set_text(document, "result-time", &format_time(self.victory_secs));

                let ranks = self.last_ranks.unwrap_or_default();
                set_text(document, "rank-time", &rank_label(ranks.time));
                set_text(document, "rank-droppings", &rank_label(ranks.droppings));
            }
        }
    }

    fn rank_label(rank: Option<usize>) -> String {
        match rank {
            Some(r) => format!("#{}", r + 1),
            None => "-".to_string(),
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
        log::info!("Rabbit Chase starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        // Pre-fill the name box
        if let Some(input) = document
            .get_element_by_id("player-name")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(&game.borrow().settings.player_name);
        }

        setup_input_handlers(game.clone(), &window);
        setup_buttons(game.clone(), &document);

        request_animation_frame(game, window);
        log::info!("Rabbit Chase running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>, window: &Window) {

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().input.key_down(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Virtual joystick publishes `joystick-move` with detail {x, y}
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: CustomEvent| {
                let detail = event.detail();
                let axis = |name: &str| {
                    js_sys::Reflect::get(&detail, &JsValue::from_str(name))
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(0.0) as f32
                };
                let dir = Vec2::new(axis("x"), axis("y"));
                game.borrow_mut().input.set_joystick(Some(dir));
            });
            let _ = window.add_event_listener_with_callback(
                "joystick-move",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur: key-ups will be lost, release everything
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.input.blur();
                g.audio.borrow_mut().set_focused(false);
                log::info!("Input released (window blur)");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window focus: music back up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow().audio.borrow_mut().set_focused(true);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>, document: &Document) {
        let name_input = document
            .get_element_by_id("player-name")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());

        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let name_input = name_input.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    let mut g = game.borrow_mut();
                    // Pick up whatever is in the name box before starting
                    if let Some(input) = &name_input {
                        g.set_player_name(&input.value());
                    }
                    g.start();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("sound-toggle") {
            let btn_clone = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let enabled = game.borrow_mut().toggle_sound();
                btn_clone.set_text_content(Some(if enabled { "Sound: On" } else { "Sound: Off" }));
                log::info!("Sound {}", if enabled { "on" } else { "off" });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, window: Window) {
        let handle = window.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, window, time);
        });
        let _ = handle.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, window: Window, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            if let Some(document) = window.document() {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game, window);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Rabbit Chase (native) starting...");
    log::info!("Native mode plays a headless demo round - run with `trunk serve` for the web version");

    let tuning = match std::env::args().nth(1) {
        Some(path) => demo::load_tuning(&path),
        None => rabbit_chase::Tuning::default(),
    };
    demo::run(tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use rabbit_chase::events::{EventBus, EventLog};
    use rabbit_chase::platform::{MemoryStorage, now_ms};
    use rabbit_chase::ranking::format_time;
    use rabbit_chase::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use rabbit_chase::{Rankings, Tuning};

    const DT: f32 = 1.0 / 60.0;
    /// Detour for a dropping when it's this much closer than the rabbit
    const DETOUR_RADIUS: f32 = 3.0;

    pub fn load_tuning(path: &str) -> Tuning {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Can't read tuning {}: {} - using defaults", path, e);
                return Tuning::default();
            }
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::error!("Bad tuning {}: {} - using defaults", path, e);
                Tuning::default()
            }
        }
    }

    /// Head for a nearby dropping, otherwise straight at the rabbit
    fn autopilot(state: &GameState) -> TickInput {
        let player = state.player.pos;
        let target = state
            .droppings
            .list_active()
            .iter()
            .map(|c| c.pos)
            .filter(|p| p.distance(player) < DETOUR_RADIUS)
            .min_by(|a, b| a.distance(player).total_cmp(&b.distance(player)))
            .unwrap_or(state.rabbit.pos);
        TickInput {
            move_dir: (target - player).normalize_or_zero(),
        }
    }

    pub fn run(tuning: Tuning) {
        let seed = now_ms() as u64;
        let mut state = GameState::with_tuning(seed, tuning);
        state.session.set_player_name("autopilot");
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(EventLog));

        let started_at = now_ms();
        state.start_game(started_at);

        // Simulated clock, so the demo doesn't have to run in real time
        let mut frames: u64 = 0;
        let mut collected = 0;
        while state.phase() == GamePhase::Active {
            let input = autopilot(&state);
            tick(&mut state, &input, DT);
            frames += 1;

            let events = state.drain_events();
            collected += events
                .iter()
                .filter(|e| matches!(e, GameEvent::Collected { .. }))
                .count();
            bus.dispatch(&events);
        }

        let sim_secs = (frames as f32 * DT) as u64;
        let session = &state.session;
        println!("\nSeed {}: {} frames ({})", seed, frames, format_time(sim_secs));
        println!("Droppings collected: {}", collected);
        println!("Player ended at {:?}", state.player.pos);
        println!("Rabbit ended at {:?}", state.rabbit.pos);

        if !session.is_victory {
            println!("Time's up - the rabbit got away.");
            return;
        }
        println!("Caught the rabbit in {}!", format_time(sim_secs));

        let mut storage = MemoryStorage::new();
        let mut rankings = Rankings::load(&storage);
        let ranks = rankings.record_result(
            session.player_name(),
            sim_secs.max(1),
            session.droppings_collected,
            started_at + sim_secs as f64 * 1000.0,
        );
        if let Err(e) = rankings.save(&mut storage) {
            log::warn!("Failed to save rankings: {}", e);
        }
        println!("Time rank: {:?}, droppings rank: {:?}", ranks.time, ranks.droppings);
    }
}
