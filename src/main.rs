//! Asteroid Drift entry point
//!
//! Web: WebGPU canvas, keyboard, DOM HUD and Web Audio, driven by
//! `requestAnimationFrame`. Native: a headless attract-mode session that
//! plays itself and logs a summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use asteroid_drift::GameLoop;
    use asteroid_drift::audio::AudioManager;
    use asteroid_drift::consts::MAX_FRAME_DT;
    use asteroid_drift::platform::{InputEvent, InputSource, Key};
    use asteroid_drift::renderer::{GpuRenderer, RenderError, RenderState};
    use asteroid_drift::sim::GamePhase;
    use asteroid_drift::tuning::Tuning;

    /// Keyboard state written by DOM listeners, read by the game loop
    #[derive(Default)]
    struct KeyboardState {
        held: HashSet<Key>,
        events: Vec<InputEvent>,
    }

    #[derive(Clone, Default)]
    struct Keyboard(Rc<RefCell<KeyboardState>>);

    impl InputSource for Keyboard {
        fn is_held(&self, key: Key) -> bool {
            self.0.borrow().held.contains(&key)
        }

        fn poll_events(&mut self) -> Vec<InputEvent> {
            std::mem::take(&mut self.0.borrow_mut().events)
        }
    }

    type WebLoop = GameLoop<GpuRenderer, Keyboard, Option<AudioManager>>;

    /// Game instance plus frame timing
    struct Game {
        game_loop: WebLoop,
        last_time: f64,
    }

    fn key_for(name: &str) -> Option<Key> {
        match name {
            "a" | "A" => Some(Key::RotateLeft),
            "d" | "D" => Some(Key::RotateRight),
            "w" | "W" => Some(Key::Thrust),
            "s" | "S" => Some(Key::Reverse),
            " " => Some(Key::Fire),
            "r" | "R" => Some(Key::Restart),
            "q" | "Q" => Some(Key::Quit),
            _ => None,
        }
    }

    pub async fn run() -> Result<(), RenderError> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }
        log::info!("Asteroid Drift starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return Ok(());
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return Ok(());
        };
        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return Ok(());
        };

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let tuning = Tuning::default();
        let screen = glam::Vec2::new(tuning.screen_width, tuning.screen_height);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);
        let render_state = RenderState::new(surface, &adapter, width, height, screen).await?;

        let audio = Some(AudioManager::new(&tuning.audio));
        let keyboard = Keyboard::default();
        let seed = js_sys::Date::now() as u64;
        let game_loop = GameLoop::new(
            seed,
            tuning,
            GpuRenderer::new(render_state),
            keyboard.clone(),
            audio,
        );
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            game_loop,
            last_time: 0.0,
        }));

        setup_input_handlers(&window, keyboard, game.clone());
        setup_resize_handler(&window, canvas, game.clone());
        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);
        log::info!("Asteroid Drift running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, keyboard: Keyboard, game: Rc<RefCell<Game>>) {
        // Key down: held set + one press event per physical press
        {
            let keyboard = keyboard.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = key_for(&event.key()) else {
                    return;
                };
                if key == Key::Fire {
                    // Keep space from scrolling the page
                    event.prevent_default();
                }
                let mut state = keyboard.0.borrow_mut();
                state.held.insert(key);
                if !event.repeat() {
                    state.events.push(InputEvent::KeyPressed(key));
                }
                drop(state);

                // Browsers only start audio after a user gesture
                if let Ok(mut g) = game.try_borrow_mut() {
                    if let Some(audio) = g.game_loop.audio_mut() {
                        audio.resume();
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let keyboard = keyboard.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = key_for(&event.key()) {
                    keyboard.0.borrow_mut().held.remove(&key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: key-ups are lost, release everything
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                keyboard.0.borrow_mut().held.clear();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Keep the backing buffer at the canvas' device-pixel size
    fn setup_resize_handler(
        window: &web_sys::Window,
        canvas: HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) {
        let closure = Closure::<dyn FnMut()>::new(move || {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let width = (canvas.client_width() as f64 * dpr) as u32;
            let height = (canvas.client_height() as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);
            if let Ok(mut g) = game.try_borrow_mut() {
                g.game_loop.renderer_mut().resize(width, height);
                log::debug!("Resized to {width}x{height}");
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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
        let phase = {
            let mut g = game.borrow_mut();
            let dt = if g.last_time > 0.0 {
                (((time - g.last_time) / 1000.0) as f32).min(MAX_FRAME_DT)
            } else {
                g.game_loop.state.tuning.frame_dt()
            };
            g.last_time = time;
            let phase = g.game_loop.frame(dt);
            update_hud(&g.game_loop, phase);
            phase
        };

        if phase == GamePhase::Exiting {
            let stats = *game.borrow().game_loop.stats();
            log::info!("Exited: {:?}", stats);
            return;
        }
        request_animation_frame(game);
    }

    /// Update HUD elements in DOM
    fn update_hud(game_loop: &WebLoop, phase: GamePhase) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(hud) = game_loop.renderer().hud() else {
            return;
        };

        if let Some(el) = document.query_selector("#hud-lives .hud-value").ok().flatten() {
            el.set_text_content(Some(&hud.lives.to_string()));
        }
        set_visible(&document, "game-over", hud.game_over);
        set_visible(&document, "exited", phase == GamePhase::Exiting);
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Failed to start renderer: {e}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use std::process::ExitCode;

    use asteroid_drift::platform::Key;
    use asteroid_drift::platform::Silent;
    use asteroid_drift::platform::headless::{FixedStepClock, HeadlessRenderer, ScriptedInput};
    use asteroid_drift::{GameLoop, Tuning};

    env_logger::init();
    log::info!("Asteroid Drift (native) starting...");
    log::info!("Native mode runs a headless attract session - run with `trunk serve` to play");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });

    // Two minutes of game time, restarting a few seconds after each game over
    let fps = u64::from(tuning.target_fps);
    let input = ScriptedInput::with_script(vec![
        (30, vec![Key::RotateLeft, Key::Fire]),
        (20, vec![Key::Thrust, Key::Fire]),
        (25, vec![Key::RotateRight, Key::Fire]),
        (15, vec![Key::Reverse]),
    ])
    .with_restart_every(3 * fps)
    .with_frame_budget(120 * fps);

    let mut game = GameLoop::new(seed, tuning, HeadlessRenderer::default(), input, Silent);
    let mut clock = FixedStepClock::default();
    let stats = game.run(&mut clock);

    let drawn = game.renderer();
    log::info!(
        "Seed {seed}: {} frames ({} ms simulated), {} shots, {} asteroids destroyed, \
         {} lives lost, {} game overs, {} restarts",
        stats.frames,
        clock.elapsed_ms,
        stats.shots_fired,
        stats.asteroids_destroyed,
        stats.lives_lost,
        stats.games_over,
        stats.restarts
    );
    log::debug!(
        "Draw calls: {} circles, {} polygons over {} presents",
        drawn.circles,
        drawn.polygons,
        drawn.presents
    );
    ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
