//! Bubble Arcade entry point
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
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent, MouseEvent,
        TouchEvent,
    };

    use bubble_arcade::Settings;
    use bubble_arcade::app::{App, Variant};
    use bubble_arcade::persistence::LocalStorageStore;
    use bubble_arcade::platform::{Key, Viewport};
    use bubble_arcade::renderer::canvas;

    /// Browser-side wrapper around the driver
    struct Game {
        app: App<LocalStorageStore>,
        document: Document,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        last_time: f64,
        /// An animation frame is scheduled
        running: bool,
    }

    impl Game {
        /// Convert client coordinates to canvas coordinates
        fn canvas_point(&self, client_x: i32, client_y: i32) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            Viewport::client_to_canvas(
                Vec2::new(client_x as f32, client_y as f32),
                Vec2::new(rect.left() as f32, rect.top() as f32),
            )
        }

        /// Match the canvas to the window size
        fn resize(&mut self) {
            let (width, height) = window_size();
            self.canvas.set_width(width as u32);
            self.canvas.set_height(height as u32);
            self.app.resize(Viewport::new(width, height));
        }

        fn render(&self) {
            canvas::draw(&self.ctx, &self.app.scene());
        }

        /// Update score readouts and the start control in the DOM
        fn update_hud(&self) {
            let hud = self.app.hud();

            if let Some(el) = self.document.get_element_by_id("current-score") {
                el.set_text_content(Some(&hud.score_text()));
            }
            if let Some(el) = self.document.get_element_by_id("high-score") {
                el.set_text_content(Some(&hud.high_score_text()));
            }

            for id in ["start-button", "controls-hint"] {
                if let Some(el) = self.document.get_element_by_id(id) {
                    let classes = el.class_list();
                    let result = if hud.show_start {
                        classes.remove_1("hidden")
                    } else {
                        classes.add_1("hidden")
                    };
                    if result.is_err() {
                        log::warn!("Could not toggle #{}", id);
                    }
                }
            }
        }
    }

    fn window_size() -> (f32, f32) {
        let Some(window) = web_sys::window() else {
            return (1.0, 1.0);
        };
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
        (w as f32, h as f32)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Bubble Arcade starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| JsValue::from_str("#gameCanvas is not a canvas"))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()
            .map_err(|_| JsValue::from_str("not a 2d context"))?;

        let variant = canvas
            .get_attribute("data-game")
            .and_then(|name| Variant::from_name(&name))
            .unwrap_or(Variant::Sequence);

        let (width, height) = window_size();
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let seed = js_sys::Date::now() as u64;
        let mut app = App::new(variant, Viewport::new(width, height), LocalStorageStore, seed)
            .with_settings(Settings::load());
        if let Some(json) = canvas.get_attribute("data-tuning") {
            app = app.with_tuning(&json);
        }
        log::info!("{:?} initialized with seed: {}", variant, seed);

        if let Some(hint) = document.get_element_by_id("controls-hint") {
            hint.set_inner_html(variant.controls_hint());
        }

        let game = Rc::new(RefCell::new(Game {
            app,
            document,
            canvas: canvas.clone(),
            ctx,
            last_time: 0.0,
            running: false,
        }));

        setup_resize(game.clone())?;
        setup_keyboard(game.clone())?;
        setup_pointer(&canvas, game.clone())?;
        setup_start_button(game.clone())?;

        // Title screen
        {
            let g = game.borrow();
            g.render();
            g.update_hud();
        }

        log::info!("Bubble Arcade ready");
        Ok(())
    }

    fn setup_resize(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            g.resize();
            if !g.running {
                g.render();
            }
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document")?;

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if let Some(key) = Key::from_dom(&event.key()) {
                    g.app.key_down(key);
                } else if event.key() == "f" {
                    // FPS counter toggle
                    let mut settings = g.app.settings().clone();
                    settings.show_fps = !settings.show_fps;
                    settings.save();
                    g.app.set_settings(settings);
                }
            });
            document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_dom(&event.key()) {
                    game.borrow_mut().app.key_up(key);
                }
            });
            document.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_pointer(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        // Touch start (tap in Sequence, gesture start in Jump)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let point = g.canvas_point(touch.client_x(), touch.client_y());
                    g.app.touch_start(point);
                }
            });
            canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch move (drag and swipe)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let point = g.canvas_point(touch.client_x(), touch.client_y());
                    g.app.touch_move(point);
                }
            });
            canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch end
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().app.touch_end();
            });
            canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse click
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let point = g.canvas_point(event.client_x(), event.client_y());
                g.app.click(point);
            });
            canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_start_button(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document")?;
        let Some(btn) = document.get_element_by_id("start-button") else {
            log::warn!("No #start-button, game cannot be started");
            return Ok(());
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let schedule = {
                let mut g = game.borrow_mut();
                g.app.start();
                g.last_time = 0.0;
                g.update_hud();
                let idle = !g.running;
                g.running = true;
                idle
            };
            if schedule {
                request_animation_frame(game.clone());
            }
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        if window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::error!("requestAnimationFrame failed");
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_going = {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                bubble_arcade::consts::SIM_DT
            };
            g.last_time = time;

            let keep_going = g.app.frame(dt, time);
            g.render();
            g.update_hud();
            g.running = keep_going;
            keep_going
        };

        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bubble Arcade (native) starting...");
    log::info!("Native mode runs a headless autopilot - use `trunk serve` for the web version");

    autopilot::run_jump();
    autopilot::run_sequence(bubble_arcade::Variant::Sequence);
    autopilot::run_sequence(bubble_arcade::Variant::SequenceClassic);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted players that exercise both games without a browser
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use bubble_arcade::app::{App, Session};
    use bubble_arcade::consts::SIM_DT;
    use bubble_arcade::persistence::MemoryStore;
    use bubble_arcade::platform::{Key, Viewport};
    use bubble_arcade::Variant;

    /// Five simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 5;

    pub fn run_jump() {
        let mut app = App::new(Variant::Jump, Viewport::new(800.0, 600.0), MemoryStore::new(), 7);
        app.start();

        let mut frames = 0;
        while frames < MAX_FRAMES {
            let Session::Jump(state) = app.session() else {
                return;
            };
            let player = &state.player;
            let target = state
                .stars
                .iter()
                .filter(|s| s.pos.y > 0.0 && s.pos.y < state.viewport.height)
                .min_by(|a, b| {
                    a.pos
                        .distance(player.pos)
                        .partial_cmp(&b.pos.distance(player.pos))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|s| s.pos.x)
                .unwrap_or(state.viewport.width / 2.0);
            let falling_low = player.vel.y > 0.0 && player.pos.y > state.viewport.height * 0.6;
            let steer_left = target < player.pos.x - player.radius;
            let steer_right = target > player.pos.x + player.radius;

            for (key, held) in [(Key::Left, steer_left), (Key::Right, steer_right)] {
                if held {
                    app.key_down(key);
                } else {
                    app.key_up(key);
                }
            }
            if falling_low {
                app.key_up(Key::Jump);
                app.key_down(Key::Jump);
            }

            frames += 1;
            if !app.frame(SIM_DT, frames as f64 * 1000.0 / 60.0) {
                break;
            }
        }

        let hud = app.hud();
        log::info!(
            "Jump autopilot: {} frames, score {}, best {}",
            frames,
            hud.score,
            hud.high_score
        );
    }

    pub fn run_sequence(variant: Variant) {
        let mut app = App::new(variant, Viewport::new(800.0, 600.0), MemoryStore::new(), 11);
        app.start();

        let mut frames = 0;
        while frames < MAX_FRAMES {
            // One tap every third of a second, with a slip every 25th tap
            if frames % 20 == 0 {
                let target = match app.session() {
                    Session::Sequence(state) => {
                        let slip = (frames / 20) % 25 == 24;
                        let wanted = if slip {
                            state.progress.len() + 1
                        } else {
                            state.progress.len()
                        };
                        state
                            .bubbles
                            .iter()
                            .find(|b| b.index == wanted)
                            .map(|b| b.pos)
                    }
                    Session::Jump(_) => None,
                };
                if let Some(pos) = target {
                    app.click(pos);
                }
            }

            frames += 1;
            if !app.frame(SIM_DT, frames as f64 * 1000.0 / 60.0) {
                break;
            }
        }

        let level = match app.session() {
            Session::Sequence(state) => state.level,
            Session::Jump(_) => 0,
        };
        let hud = app.hud();
        log::info!(
            "{:?} autopilot: {} frames, level {}, score {}",
            variant,
            frames,
            level,
            hud.score
        );
    }
}
