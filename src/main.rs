//! Neon Asteroids entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use neon_asteroids::audio::AudioManager;
    use neon_asteroids::consts::*;
    use neon_asteroids::renderer::{RenderState, build_scene};
    use neon_asteroids::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use neon_asteroids::{HighScores, Settings};

    /// Keys currently held down
    #[derive(Debug, Default)]
    struct HeldKeys {
        left: bool,
        right: bool,
        thrust: bool,
        fire: bool,
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        settings: Settings,
        high_scores: HighScores,
        audio: AudioManager,
        accumulator: f32,
        last_time: f64,
        held: HeldKeys,
        /// One-shot requests waiting for the next tick
        pending: TickInput,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);

            let mut state = GameState::new(seed);
            state.particle_cap = settings.max_particles();

            Self {
                state,
                render_state: None,
                settings,
                high_scores: HighScores::load(),
                audio,
                accumulator: 0.0,
                last_time: 0.0,
                held: HeldKeys::default(),
                pending: TickInput::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Held keys plus any pending one-shot requests
        fn current_input(&self) -> TickInput {
            TickInput {
                left: self.held.left,
                right: self.held.right,
                thrust: self.held.thrust,
                fire: self.held.fire,
                ..self.pending.clone()
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.current_input();
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.pending = TickInput::default();
            }

            self.handle_events();

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Turn simulation events into sound and storage writes
        fn handle_events(&mut self) {
            for event in self.state.drain_events() {
                self.audio.play_event(&event);
                match event {
                    GameEvent::GameOver { score, wave } => {
                        if let Some(rank) = self.high_scores.add_score(score) {
                            log::info!("New high score #{}: {} (wave {})", rank, score, wave);
                            self.high_scores.save();
                        }
                    }
                    GameEvent::WaveCleared { wave, bonus } => {
                        log::debug!("Wave {} bonus {}", wave, bonus);
                    }
                    _ => {}
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = build_scene(&self.state, &self.settings);
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            set_text(document, "#hud-score .hud-value", &self.state.score.to_string());
            let best = self
                .high_scores
                .top_score()
                .unwrap_or(0)
                .max(self.state.score);
            set_text(document, "#hud-best .hud-value", &best.to_string());
            set_text(document, "#hud-lives .hud-value", &self.state.lives.to_string());
            set_text(document, "#hud-wave .hud-value", &self.state.wave.to_string());

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    set_text(document, "#hud-fps .hud-value", &self.fps.to_string());
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            let phase = self.state.phase;
            show(document, "pause-overlay", phase == GamePhase::Paused);
            show(document, "help-overlay", phase == GamePhase::Help);
            show(document, "game-over", phase == GamePhase::GameOver);

            if phase == GamePhase::GameOver {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&self.state.score.to_string()));
                }
                if let Some(el) = document.get_element_by_id("final-wave") {
                    el.set_text_content(Some(&self.state.wave.to_string()));
                }
            }
        }

        /// Step the graphics preset and remember it for the next visit
        fn cycle_quality(&mut self) {
            let quality = self.settings.cycle_quality();
            self.state.particle_cap = self.settings.max_particles();
            self.settings.save();
            log::info!("Graphics quality: {}", quality.as_str());
        }

        /// Record a key transition. Returns true if the key is a game control.
        fn on_key(&mut self, code: &str, down: bool) -> bool {
            match code {
                "ArrowLeft" => self.held.left = down,
                "ArrowRight" => self.held.right = down,
                "ArrowUp" => self.held.thrust = down,
                "Space" => self.held.fire = down,
                // One-shots fire on press only
                "KeyP" => self.pending.pause |= down,
                "KeyH" => self.pending.help |= down,
                "KeyQ" => self.pending.quit |= down,
                "KeyR" => self.pending.restart |= down,
                _ => return false,
            }
            true
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn show(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "overlay" } else { "overlay hidden" });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Neon Asteroids starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        let arena = game.borrow().state.arena;
                        let render_state =
                            RenderState::new(surface, &adapter, width, height, arena).await;
                        game.borrow_mut().render_state = render_state;
                    }
                    Err(e) => log::error!("Failed to get adapter: {:?}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {:?}", e),
        }

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Neon Asteroids running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                // Browsers only allow audio after a user gesture
                g.audio.resume();
                if event.code() == "KeyG" {
                    if !event.repeat() {
                        g.cycle_quality();
                    }
                    event.prevent_default();
                    return;
                }
                if g.on_key(&event.code(), true) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().on_key(&event.code(), false) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing {
                        g.pending.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur mutes, focus restores
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                // Keys released while unfocused never send keyup
                g.held = HeldKeys::default();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Asteroids (native) starting...");
    log::info!("Native mode runs a headless autopilot - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5eed);
    autopilot::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run driven by a simple aim-and-shoot bot
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use std::f32::consts::{PI, TAU};

    use neon_asteroids::HighScores;
    use neon_asteroids::consts::TICK_RATE;
    use neon_asteroids::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

    /// Give up after five minutes of game time
    const MAX_TICKS: u64 = 5 * 60 * TICK_RATE as u64;
    /// Fire when the nose is within this many radians of the target
    const AIM_TOLERANCE: f32 = 0.15;

    /// Steer toward the closest asteroid and fire once lined up
    fn decide(state: &GameState) -> TickInput {
        let ship = &state.ship;
        let Some(target) = state
            .asteroids
            .iter()
            .min_by(|a, b| {
                a.pos
                    .distance_squared(ship.pos)
                    .total_cmp(&b.pos.distance_squared(ship.pos))
            })
        else {
            return TickInput::default();
        };

        let to_target = target.pos - ship.pos;
        let wanted = to_target.y.atan2(to_target.x);
        let error = (wanted - ship.angle + PI).rem_euclid(TAU) - PI;

        TickInput {
            left: error < -AIM_TOLERANCE,
            right: error > AIM_TOLERANCE,
            // Back off when something is close
            thrust: to_target.length() > target.radius + 220.0 && ship.vel.length() < 2.0,
            fire: error.abs() <= AIM_TOLERANCE,
            ..Default::default()
        }
    }

    pub fn run(seed: u64) {
        let mut state = GameState::new(seed);
        let mut high_scores = HighScores::load();
        log::info!("Autopilot run with seed {}", seed);

        while state.time_ticks < MAX_TICKS && state.phase == GamePhase::Playing {
            let input = decide(&state);
            tick(&mut state, &input);

            for event in state.drain_events() {
                match event {
                    GameEvent::ShipDestroyed { lives_left } => {
                        log::info!("t={} ship lost, {} lives left", state.time_ticks, lives_left);
                    }
                    GameEvent::WaveCleared { wave, bonus } => {
                        log::info!("t={} wave {} reached (+{})", state.time_ticks, wave, bonus);
                    }
                    GameEvent::GameOver { score, .. } => {
                        high_scores.add_score(score);
                    }
                    _ => {}
                }
            }
        }

        if state.phase == GamePhase::Playing {
            log::info!("Time limit reached");
            high_scores.add_score(state.score);
        }
        high_scores.save();

        log::info!(
            "Final score {} on wave {} after {} ticks ({} lives left)",
            state.score,
            state.wave,
            state.time_ticks,
            state.lives
        );
    }
}
