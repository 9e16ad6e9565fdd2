//! Catfish in Space entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use catfish_in_space::audio::WebAudio;
    use catfish_in_space::input::KeyCode;
    use catfish_in_space::renderer::canvas::CanvasRenderer;
    use catfish_in_space::sim::Dimension;
    use catfish_in_space::{Game, Settings};

    type WebGame = Game<CanvasRenderer, WebAudio>;

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Catfish in Space starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("context query failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        // Canvas pixels match CSS pixels so pointer offsets are viewport-local
        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        let mut renderer = CanvasRenderer::new(canvas.clone(), ctx);
        renderer.resize(width, height);

        let settings = Settings::load();
        let mut audio = WebAudio::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(
            settings,
            renderer,
            audio,
            Dimension::new(width as f32, height as f32),
            seed,
        )));

        setup_input_handlers(&canvas, game.clone());
        setup_focus_handlers(game.clone());
        setup_resize_handler(canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Catfish in Space running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<WebGame>>) {
        let window = web_sys::window().unwrap();

        // Keyboard state table
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = KeyCode::from_code(&event.code()) {
                    game.borrow_mut().key_down(key);
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = KeyCode::from_code(&event.code()) {
                    game.borrow_mut().key_up(key);
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer position, viewport-local
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .pointer_move(Vec2::new(event.offset_x() as f32, event.offset_y() as f32));
            });
            let _ = canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Primary button
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() == 0 {
                    let mut g = game.borrow_mut();
                    // Browsers only start audio after a user gesture
                    g.audio_mut().resume();
                    g.pointer_button(true);
                }
            });
            let _ = canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() == 0 {
                    game.borrow_mut().pointer_button(false);
                }
            });
            let _ = window.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_focus_handlers(game: Rc<RefCell<WebGame>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
                let mut g = game.borrow_mut();
                if hidden {
                    g.release_all();
                }
                if g.settings().mute_on_blur {
                    g.audio_mut().set_muted(hidden);
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside): keys released while unfocused never arrive
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.release_all();
                if g.settings().mute_on_blur {
                    g.audio_mut().set_muted(true);
                }
                log::info!("Input released (window blur)");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio_mut().set_muted(false);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(canvas: HtmlCanvasElement, game: Rc<RefCell<WebGame>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let width = canvas.client_width().max(1) as u32;
            let height = canvas.client_height().max(1) as u32;
            let mut g = game.borrow_mut();
            g.renderer_mut().resize(width, height);
            g.resize(Dimension::new(width as f32, height as f32));
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<WebGame>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<WebGame>>, time: f64) {
        game.borrow_mut().frame(time);
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
    log::info!("Catfish in Space (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    let settings = load_native_settings();
    headless_demo(settings);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Settings from the file named by `CATFISH_SETTINGS`, else defaults
#[cfg(not(target_arch = "wasm32"))]
fn load_native_settings() -> catfish_in_space::Settings {
    use catfish_in_space::Settings;

    let Ok(path) = std::env::var("CATFISH_SETTINGS") else {
        return Settings::load();
    };
    match std::fs::read_to_string(&path) {
        Ok(json) => match Settings::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("Ignoring {}: {}", path, e);
                Settings::default()
            }
        },
        Err(e) => {
            log::warn!("Cannot read {}: {}", path, e);
            Settings::default()
        }
    }
}

/// Fly forward with the trigger held for ten simulated seconds
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo(settings: catfish_in_space::Settings) {
    use catfish_in_space::audio::NullAudio;
    use catfish_in_space::input::KeyCode;
    use catfish_in_space::renderer::DisplayList;
    use catfish_in_space::sim::Dimension;
    use catfish_in_space::Game;
    use glam::Vec2;

    let dimension = Dimension::new(1280.0, 720.0);
    let mut game = Game::new(settings, DisplayList::new(), NullAudio, dimension, 0x5eed);
    game.key_down(KeyCode::W);
    game.pointer_move(dimension.half() + Vec2::new(300.0, 0.0));
    game.pointer_button(true);

    for frame in 0..600 {
        game.frame(frame as f64 * 1000.0 / 60.0);
    }

    let state = game.state();
    log::info!(
        "after 10s: {} entities, {} + {} stars, game over: {}, frame errors: {}",
        state.entities.len(),
        state.near_stars.len(),
        state.far_stars.len(),
        state.match_state.game_over,
        game.frame_errors()
    );
}
