//! Flappy Chicken entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use flappy_chicken::Session;
    use flappy_chicken::audio::WebAudio;
    use flappy_chicken::driver::GameLoop;
    use flappy_chicken::input::InputEvent;
    use flappy_chicken::persistence::LocalStorageStore;
    use flappy_chicken::renderer::{CanvasSurface, SpriteSheet};

    type Game = GameLoop<LocalStorageStore, CanvasSurface, WebAudio>;

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Flappy Chicken starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let sheet = SpriteSheet::chickens();
        let surface = CanvasSurface::new(&canvas, &sheet)?;

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(LocalStorageStore, seed);
        let game = Rc::new(RefCell::new(GameLoop::new(session, surface, WebAudio::new())));

        setup_input_handlers(&canvas, game.clone())?;
        request_animation_frame(game);

        log::info!("Flappy Chicken running!");
        Ok(())
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().push_input(InputEvent::Jump);
            });
            canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // No context menu on long press / right click
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
            });
            canvas.add_event_listener_with_callback(
                "contextmenu",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().push_input(InputEvent::Jump);
            });
            canvas.add_event_listener_with_callback(
                "touchstart",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
            });
            canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().ok_or("no window")?;
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if InputEvent::captures_key(&key) {
                    event.prevent_default();
                }
                game.borrow_mut().push_key(&key);
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        game.borrow_mut().frame();
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

/// Headless run: the autopilot plays one game and the result is logged
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use flappy_chicken::Session;
    use flappy_chicken::audio::NullSound;
    use flappy_chicken::driver::{GameLoop, autopilot};
    use flappy_chicken::persistence::MemoryStore;
    use flappy_chicken::renderer::RecordingSurface;
    use flappy_chicken::sim::GamePhase;

    /// Give up after ten minutes of game time
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    env_logger::init();
    log::info!("Flappy Chicken (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        });

    let session = Session::new(MemoryStore::new(), seed);
    let mut game = GameLoop::new(session, RecordingSurface::default(), NullSound);

    while game.frames() < MAX_FRAMES {
        if let Some(event) = autopilot(game.session().state()) {
            game.push_input(event);
        }
        game.frame();
        if game.session().phase() == GamePhase::GameOver {
            break;
        }
    }

    let state = game.session().state();
    log::info!(
        "Autopilot finished: seed {} score {} level {} after {} frames ({:?})",
        seed,
        state.score,
        state.level,
        game.frames(),
        state.phase
    );
    println!(
        "seed={} score={} level={} frames={}",
        seed,
        state.score,
        state.level,
        game.frames()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
