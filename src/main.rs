//! Boba Drop entry point
//!
//! On the web this owns the frame loop, input capture and HUD text; drawing
//! is delegated to an optional `window.renderBobaFrame(json)` hook. Natively
//! it plays a headless session with a simple autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde::Serialize;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use boba_drop::Tuning;
    use boba_drop::persistence::{LocalStorageBackend, LocalStore};
    use boba_drop::platform::{CanvasPlayField, PerformanceClock};
    use boba_drop::sim::{Cup, CupInput, DrinkKind, FallingObject, GameEvent, GameLogic, GamePhase};

    /// Longest frame fed to the simulation (tab switches, breakpoints)
    const MAX_FRAME_MS: f32 = 100.0;

    /// What the JS renderer receives each frame
    #[derive(Serialize)]
    struct FrameSnapshot<'a> {
        cup: &'a Cup,
        objects: Vec<&'a FallingObject>,
        boba_count: u32,
        lives: u32,
        target_boba_count: u32,
        game_time_ms: f64,
    }

    /// Game instance holding all state
    struct Game {
        logic: GameLogic,
        cup: Cup,
        input: CupInput,
        dragging: bool,
        last_time: Option<f64>,
        running: bool,
    }

    impl Game {
        fn new(canvas: &HtmlCanvasElement, seed: u64) -> Self {
            let tuning = Tuning::default();
            let logic = GameLogic::new(tuning, seed)
                .with_play_field(CanvasPlayField::new(Some(canvas.clone())))
                .with_clock(PerformanceClock)
                .with_store(LocalStore::new(LocalStorageBackend));
            let cup = logic.spawn_cup();
            Self {
                logic,
                cup,
                input: CupInput::default(),
                dragging: false,
                last_time: None,
                running: false,
            }
        }

        fn start(&mut self) {
            self.cup = self.logic.spawn_cup();
            self.logic.start();
            self.last_time = None;
            self.running = true;
        }

        fn restart(&mut self) {
            self.cup = self.logic.spawn_cup();
            self.logic.restart();
            self.last_time = None;
            self.running = true;
        }

        /// Halt the loop; the next animation frame will not be requested
        fn stop(&mut self) {
            self.running = false;
        }

        fn frame(&mut self, time: f64) {
            let dt = match self.last_time {
                Some(last) => ((time - last) as f32).clamp(0.0, MAX_FRAME_MS),
                None => 0.0,
            };
            self.last_time = Some(time);

            self.input.frame_ms = Some(dt);
            self.logic.update_cup_position(&mut self.cup, &self.input);
            if self.logic.update(dt, &self.cup).is_some() {
                self.stop();
            }
            self.publish_frame();
        }

        fn publish_frame(&self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let Ok(hook) = js_sys::Reflect::get(&window, &JsValue::from_str("renderBobaFrame")) else {
                return;
            };
            let Some(hook) = hook.dyn_ref::<js_sys::Function>() else {
                return;
            };

            let snapshot = FrameSnapshot {
                cup: &self.cup,
                objects: self.logic.falling_objects().collect(),
                boba_count: self.logic.boba_count(),
                lives: self.logic.lives(),
                target_boba_count: self.logic.target_boba_count(),
                game_time_ms: self.logic.game_time(),
            };
            match serde_json::to_string(&snapshot) {
                Ok(json) => {
                    if let Err(e) = hook.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                        log::warn!("renderBobaFrame failed: {:?}", e);
                    }
                }
                Err(e) => log::warn!("Failed to serialize frame: {}", e),
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Mirror game events into HUD elements
    fn setup_hud(document: Document, game: &Rc<RefCell<Game>>) {
        game.borrow_mut().logic.subscribe(move |event| match event {
            GameEvent::BobaCountChanged { count } => set_text(&document, "boba-count", &count.to_string()),
            GameEvent::LivesChanged { lives } => set_text(&document, "lives", &lives.to_string()),
            GameEvent::TargetBobaCountChanged { count } => set_text(&document, "target", &count.to_string()),
            GameEvent::MaxLivesReached => set_text(&document, "toast", "Max lives!"),
            GameEvent::GameEnded { outcome } => set_text(&document, "result", outcome.as_str()),
        });
    }

    fn canvas_x(canvas: &HtmlCanvasElement, client_x: i32) -> f32 {
        let rect = canvas.get_bounding_client_rect();
        (client_x as f64 - rect.left()) as f32
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keyboard: arrows or A/D
        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" | "KeyA" => g.input.left = pressed,
                    "ArrowRight" | "KeyD" => g.input.right = pressed,
                    _ => return,
                }
                event.prevent_default();
                if pressed {
                    g.input.pointer_x = None;
                }
            });
            let _ = window.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse: click to jump, drag to follow
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.dragging = true;
                g.input.pointer_x = Some(canvas_x(&canvas_clone, event.client_x()));
            });
            let _ = canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.dragging {
                    g.input.pointer_x = Some(canvas_x(&canvas_clone, event.client_x()));
                }
            });
            let _ = canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        for event_name in ["mouseup", "mouseleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.dragging = false;
                g.input.pointer_x = None;
            });
            let _ = canvas.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: follow the first finger
        for event_name in ["touchstart", "touchmove"] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    game.borrow_mut().input.pointer_x = Some(canvas_x(&canvas_clone, touch.client_x()));
                }
            });
            let _ = canvas.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
        for event_name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().input.pointer_x = None;
            });
            let _ = canvas.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let was_running = game.borrow().running;
                game.borrow_mut().restart();
                if !was_running {
                    request_animation_frame(game.clone());
                }
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
        let keep_running = {
            let mut g = game.borrow_mut();
            g.frame(time);
            g.running && g.logic.phase() == GamePhase::Running
        };

        if keep_running {
            request_animation_frame(game);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Boba Drop starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let drink = canvas
            .get_attribute("data-drink")
            .map(|name| {
                DrinkKind::from_str(&name).unwrap_or_else(|| {
                    log::warn!("Unknown drink `{}`, using taro", name);
                    DrinkKind::Taro
                })
            })
            .unwrap_or_default();

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(&canvas, seed)));
        log::info!("Game initialized with seed: {}", seed);

        setup_hud(document.clone(), &game);
        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(&document, game.clone());

        {
            let mut g = game.borrow_mut();
            g.logic.set_target_boba_count(drink);
            g.start();
        }
        request_animation_frame(game);

        log::info!("Boba Drop running!");
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
    log::info!("Boba Drop (native) starting...");
    log::info!("Native mode runs a headless autopilot session - build for wasm32 to play");

    let drink = std::env::args()
        .nth(1)
        .and_then(|name| boba_drop::sim::DrinkKind::from_str(&name))
        .unwrap_or_default();
    let seed = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xB0BA);

    headless::run(drink, seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Started through wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use boba_drop::Tuning;
    use boba_drop::persistence::MemoryStore;
    use boba_drop::platform::ManualClock;
    use boba_drop::sim::{Cup, CupInput, DrinkKind, GameLogic, ObjectKind};

    const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Ten minutes of frames
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    /// Steer toward the lowest boba, ignoring everything else
    fn autopilot(logic: &GameLogic, cup: &Cup) -> CupInput {
        let target = logic
            .falling_objects()
            .filter(|obj| obj.kind == ObjectKind::Boba && obj.pos.y < cup.pos.y)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        let mut input = CupInput {
            frame_ms: Some(FRAME_MS),
            ..Default::default()
        };
        if let Some(obj) = target {
            let obj_center = obj.pos.x + obj.size.x / 2.0;
            let cup_center = cup.pos.x + cup.size.x / 2.0;
            let dead_zone = 8.0;
            input.left = obj_center < cup_center - dead_zone;
            input.right = obj_center > cup_center + dead_zone;
        }
        input
    }

    pub fn run(drink: DrinkKind, seed: u64) {
        let clock = ManualClock::new();
        let mut logic = GameLogic::new(Tuning::default(), seed)
            .with_clock(clock.clone())
            .with_store(MemoryStore::default());
        logic.subscribe(|event| log::debug!("{:?}", event));
        logic.set_target_boba_count(drink);
        logic.start();

        let mut cup = logic.spawn_cup();
        let mut outcome = None;
        for _ in 0..MAX_FRAMES {
            clock.advance(f64::from(FRAME_MS));
            let input = autopilot(&logic, &cup);
            logic.update_cup_position(&mut cup, &input);
            if let Some(result) = logic.update(FRAME_MS, &cup) {
                outcome = Some(result);
                break;
            }
        }

        match outcome {
            Some(result) => println!(
                "{}: {} after {}/{} boba in {:.1}s ({} lives left)",
                drink.as_str(),
                result.as_str(),
                logic.boba_count(),
                logic.target_boba_count(),
                logic.game_time() / 1000.0,
                logic.lives()
            ),
            None => println!(
                "{}: no outcome after {:.0}s ({} boba)",
                drink.as_str(),
                logic.game_time() / 1000.0,
                logic.boba_count()
            ),
        }
        logic.shutdown();
    }
}
