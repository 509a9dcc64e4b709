//! Neon Horizon entry point
//!
//! The wasm build owns the canvas, DOM HUD, and requestAnimationFrame loop;
//! the native build is a headless smoke run of the simulation.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use neon_horizon::consts::*;
    use neon_horizon::render::SceneRenderState;
    use neon_horizon::sim::{GamePhase, GameState, TickInput, tick};
    use neon_horizon::vibe::{self, AiVibe, QuoteContext, QuotePanel};

    /// Minimum horizontal travel for a swipe to count as a steer (CSS pixels)
    const SWIPE_THRESHOLD: f32 = 50.0;
    /// How often the DJ considers piping up mid-run (seconds)
    const DRIVE_QUOTE_PERIOD: f32 = 10.0;
    /// Chance the DJ actually says something when the period elapses
    const DRIVE_QUOTE_CHANCE: f64 = 0.2;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<SceneRenderState>,
        vibes: QuotePanel,
        high_score: u32,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        // Track phase for quote cues and the high score
        last_phase: GamePhase,
        drive_quote_timer: f32,
        // Where the current touch began, for swipe detection
        touch_start: Option<(f32, f32)>,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::new(seed),
                render_state: None,
                vibes: QuotePanel::new(),
                high_score: 0,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                last_phase: GamePhase::Menu,
                drive_quote_timer: 0.0,
                touch_start: None,
            }
        }

        /// Run simulation ticks, then report whether the DJ owes us a line
        fn update(&mut self, dt: f32) -> Option<QuoteContext> {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input;
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // One-shot inputs only count for the first substep
                self.input.steer_left = false;
                self.input.steer_right = false;
                self.input.start = false;
            }

            self.quote_cue(dt)
        }

        /// Decide whether this frame earned a DJ line
        fn quote_cue(&mut self, dt: f32) -> Option<QuoteContext> {
            let current_phase = self.state.phase;
            if current_phase != self.last_phase {
                self.last_phase = current_phase;
                match current_phase {
                    GamePhase::Playing => {
                        self.drive_quote_timer = 0.0;
                        return Some(QuoteContext::Start);
                    }
                    GamePhase::GameOver => {
                        self.high_score = self.high_score.max(self.state.score_points());
                        return Some(QuoteContext::Crash);
                    }
                    GamePhase::Menu => {}
                }
            }

            if current_phase == GamePhase::Playing {
                self.drive_quote_timer += dt;
                if self.drive_quote_timer >= DRIVE_QUOTE_PERIOD {
                    self.drive_quote_timer = 0.0;
                    if js_sys::Math::random() < DRIVE_QUOTE_CHANCE {
                        return Some(QuoteContext::Driving);
                    }
                }
            }

            None
        }

        /// Draw the frame; a lost surface is reconfigured in place
        fn render(&mut self, time: f64) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state, time) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("surface out of memory");
                    }
                    Err(e) => log::warn!("render: {e:?}"),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            // Score readouts
            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&format!("SCORE: {:06}", self.state.score_points())));
            }
            if let Some(el) = document.get_element_by_id("hi-score") {
                el.set_text_content(Some(&format!("HI-SCORE: {:06}", self.high_score)));
            }

            // Title card only while on the menu
            if let Some(el) = document.get_element_by_id("menu-panel") {
                if self.state.phase == GamePhase::Menu {
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            // Crash panel, with the final score filled in
            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.phase == GamePhase::GameOver {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&self.state.score_points().to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            // DJ feed
            let vibe = self.vibes.current();
            if let Some(el) = document.get_element_by_id("dj-quote") {
                el.set_text_content(Some(&format!("\"{}\"", vibe.quote)));
                let _ = el.set_attribute("class", vibe.mood.css_class());
            }
            if let Some(el) = document.get_element_by_id("dj-panel") {
                if self.vibes.is_loading() {
                    let _ = el.set_attribute("class", "loading");
                } else {
                    let _ = el.set_attribute("class", "");
                }
            }
        }
    }

    /// Kick off a DJ line for the given moment. Errors resolve to a canned
    /// fallback so the panel never goes blank.
    fn request_quote(game: Rc<RefCell<Game>>, context: QuoteContext) {
        if vibe::api_key().is_none() {
            game.borrow_mut().vibes.show(AiVibe::offline());
            return;
        }

        let generation = game.borrow_mut().vibes.begin_request();
        wasm_bindgen_futures::spawn_local(async move {
            let vibe = match vibe::fetch::fetch_vibe(context).await {
                Ok(vibe) => vibe,
                Err(err) => {
                    log::warn!("DJ feed request failed: {err}");
                    vibe::fallback_for(&err)
                }
            };
            game.borrow_mut().vibes.apply(generation, vibe);
        });
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("logger init failed");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Size the drawing buffer to physical pixels
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("road seed {seed}");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("surface creation failed");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("no suitable adapter");

        log::info!("adapter: {:?}", adapter.get_info().name);

        let render_state = SceneRenderState::new(surface, &adapter, width, height).await;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_menu_buttons(game.clone());

        // Greet the driver while the menu is up
        request_quote(game.clone(), QuoteContext::Start);

        request_animation_frame(game);
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.steer_left = true,
                    "ArrowRight" | "d" | "D" => g.input.steer_right = true,
                    " " | "Enter" => g.input.start = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start (remember where the finger landed)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    game.borrow_mut().touch_start =
                        Some((touch.client_x() as f32, touch.client_y() as f32));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end (a horizontal swipe steers one lane)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if let Some((start_x, start_y)) = g.touch_start.take() {
                    if let Some(touch) = event.changed_touches().get(0) {
                        let dx = touch.client_x() as f32 - start_x;
                        let dy = touch.client_y() as f32 - start_y;
                        if dx.abs() > SWIPE_THRESHOLD && dx.abs() > dy.abs() {
                            if dx < 0.0 {
                                g.input.steer_left = true;
                            } else {
                                g.input.steer_right = true;
                            }
                        }
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_menu_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // DRIVE and REBOOT both start a run; the sim rejects the press
        // when it arrives in the wrong phase
        for id in ["drive-btn", "reboot-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().input.start = true;
                });
                let _ = btn
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let cue = {
            let mut g = game.borrow_mut();

            // rAF hands us ms since page load; the first frame has no delta
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            let cue = g.update(dt);
            g.render(time);
            g.update_hud();
            cue
        };

        // Spawning the fetch re-borrows the game, so do it outside the block
        if let Some(context) = cue {
            request_quote(game.clone(), context);
        }

        request_animation_frame(game);
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
    log::info!("headless mode; use `trunk serve` for the playable build");
    headless_drive();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Real entry is wasm_main via #[wasm_bindgen(start)]
}

#[cfg(not(target_arch = "wasm32"))]
fn headless_drive() {
    use neon_horizon::consts::SIM_DT;
    use neon_horizon::sim::{GamePhase, GameState, TickInput, tick};

    let mut state = GameState::new(0xD1CE);
    let start = TickInput {
        start: true,
        ..TickInput::default()
    };
    tick(&mut state, &start, SIM_DT);
    assert_eq!(
        state.phase,
        GamePhase::Playing,
        "start press should begin a run"
    );

    let cruise = TickInput::default();
    for _ in 0..1200 {
        if state.phase != GamePhase::Playing {
            break;
        }
        tick(&mut state, &cruise, SIM_DT);
    }

    println!(
        "✓ {} points after {:.1}s at {:.1} u/s with {} obstacles on the road",
        state.score_points(),
        state.time_secs(),
        state.speed,
        state.obstacles.len()
    );
}
