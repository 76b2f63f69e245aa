//! Road Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::HtmlCanvasElement;

    use road_dodge::consts::*;
    use road_dodge::net;
    use road_dodge::renderer::CanvasRenderer;
    use road_dodge::sim::{GameEvent, GamePhase, GameState, SimConfig, TickInput, tick};
    use road_dodge::{HighScores, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Option<CanvasRenderer>,
        settings: Settings,
        input: TickInput,
        accumulator: f32,
        last_time: f64,
        /// Highscore as last reported by the server (or beaten locally)
        highscore: u32,
        leaderboard: HighScores,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, config: SimConfig, settings: Settings) -> Self {
            Self {
                state: GameState::new(seed, config),
                renderer: None,
                settings,
                input: TickInput::default(),
                accumulator: 0.0,
                last_time: 0.0,
                highscore: 0,
                leaderboard: HighScores::new(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input;
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.restart = false;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&self) {
            if let Some(ref renderer) = self.renderer {
                renderer.render(&self.state, self.settings.scroll_enabled());
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&format!("Score: {}", self.state.score)));
            }

            if let Some(el) = document.get_element_by_id("hud-highscore") {
                el.set_text_content(Some(&format!("Highscore: {}", self.highscore)));
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    el.set_text_content(Some(&format!("{} fps", self.fps)));
                } else {
                    el.set_text_content(None);
                }
            }

            // Show/hide game over overlay
            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.phase == GamePhase::GameOver {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&self.state.score.to_string()));
                    }
                    if let Some(board_el) = document.get_element_by_id("leaderboard") {
                        board_el.set_text_content(Some(&self.leaderboard_text()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        fn leaderboard_text(&self) -> String {
            if self.leaderboard.is_empty() {
                return "No leaderboard data available.".to_string();
            }
            self.leaderboard
                .entries
                .iter()
                .enumerate()
                .map(|(i, score)| format!("{}. {}", i + 1, score))
                .collect::<Vec<_>>()
                .join("\n")
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Road Dodge starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size (backing store in device pixels, sim in CSS pixels)
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        canvas.set_width((client_w as f64 * dpr) as u32);
        canvas.set_height((client_h as f64 * dpr) as u32);

        let settings = Settings::load();
        let config = SimConfig {
            playfield: glam::Vec2::new(client_w as f32, client_h as f32),
            reset_difficulty_on_restart: settings.reset_difficulty_on_restart,
        };

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, config, settings)));
        log::info!("Game initialized with seed: {}", seed);

        let renderer = CanvasRenderer::new(&canvas, dpr).expect("Failed to create renderer");
        game.borrow_mut().renderer = Some(renderer);

        // Pull the shared highscore; applied whenever the response lands
        {
            let game = game.clone();
            spawn_local(async move {
                match net::fetch_highscore().await {
                    Ok(highscore) => {
                        game.borrow_mut().highscore = highscore;
                        log::info!("Loaded highscore: {}", highscore);
                    }
                    Err(err) => log::warn!("Highscore fetch failed: {:?}", err),
                }
            });
        }

        setup_input_handlers(game.clone());
        setup_restart_button(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Road Dodge running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Key down - set direction flags, request restart
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => {
                        g.input.left = true;
                        event.prevent_default();
                    }
                    "ArrowRight" => {
                        g.input.right = true;
                        event.prevent_default();
                    }
                    "ArrowUp" => {
                        g.input.up = true;
                        event.prevent_default();
                    }
                    "ArrowDown" => {
                        g.input.down = true;
                        event.prevent_default();
                    }
                    "Enter" | "r" | "R" => g.input.restart = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up - clear direction flags
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = false,
                    "ArrowRight" => g.input.right = false,
                    "ArrowUp" => g.input.up = false,
                    "ArrowDown" => g.input.down = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.restart = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
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
        let events = {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
            g.state.drain_events()
        };

        for event in events {
            match event {
                GameEvent::GameOver { score } => on_game_over(game.clone(), score),
            }
        }

        request_animation_frame(game);
    }

    /// React to a finished run: refresh the leaderboard for the overlay
    /// and submit the score iff it beats the known highscore. At most one
    /// submission is started per game-over; nothing is ever cancelled.
    fn on_game_over(game: Rc<RefCell<Game>>, score: u32) {
        log::info!("Game over with score {}", score);

        {
            let game = game.clone();
            spawn_local(async move {
                match net::fetch_leaderboard().await {
                    Ok(scores) => game.borrow_mut().leaderboard.replace(scores),
                    Err(err) => log::warn!("Leaderboard fetch failed: {:?}", err),
                }
            });
        }

        let beats_highscore = {
            let mut g = game.borrow_mut();
            if score > g.highscore {
                g.highscore = score;
                true
            } else {
                false
            }
        };

        if beats_highscore {
            spawn_local(async move {
                match net::submit_score(score).await {
                    Ok(()) => log::info!("Submitted new highscore: {}", score),
                    Err(err) => log::warn!("Score submission failed: {:?}", err),
                }
            });
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
    log::info!("Road Dodge (native) starting...");
    log::info!("Native mode is headless - build for wasm32-unknown-unknown to play in a browser");

    headless_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive the sim with no input until the car gets hit (or two minutes pass)
#[cfg(not(target_arch = "wasm32"))]
fn headless_run() {
    use road_dodge::consts::SIM_DT;
    use road_dodge::sim::{GamePhase, GameState, SimConfig, TickInput, tick};

    let mut state = GameState::new(0xD0D6E, SimConfig::default());
    let input = TickInput::default();
    let mut ticks = 0u32;
    while state.phase == GamePhase::Playing && ticks < 120 * 120 {
        tick(&mut state, &input, SIM_DT);
        ticks += 1;
    }

    println!(
        "Simulated {:.1}s: score {}, obstacle speed {}, phase {:?}",
        ticks as f32 * SIM_DT,
        state.score,
        state.difficulty.obstacle_speed,
        state.phase
    );
}
