//! Arcade Eggs entry point
//!
//! On wasm32 this mounts whichever game the page's `canvas[data-game]`
//! names and drives it from `requestAnimationFrame`. Natively it runs both
//! engines headless with a simple autopilot and logs the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_host {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use arcade_eggs::config::{BreakoutOverrides, SnakeOverrides};
    use arcade_eggs::input::breakout::{self as breakout_input, PaddleArbiter};
    use arcade_eggs::input::snake::{self as snake_input, SnakeControls};
    use arcade_eggs::input::Key;
    use arcade_eggs::levels::levels_or_builtin;
    use arcade_eggs::renderer::canvas::CanvasPainter;
    use arcade_eggs::renderer::{Theme, render_breakout, render_snake};
    use arcade_eggs::sim::{ArcadeEngine, GameSummary, Hooks};
    use arcade_eggs::{
        BreakoutConfig, BreakoutEngine, ConfigError, GamePhase, Persistence, SnakeConfig,
        SnakeEngine,
    };

    enum Game {
        Snake {
            engine: SnakeEngine,
            controls: SnakeControls,
        },
        Breakout {
            engine: BreakoutEngine,
            arbiter: PaddleArbiter,
        },
    }

    impl Game {
        fn phase(&self) -> GamePhase {
            match self {
                Game::Snake { engine, .. } => engine.phase(),
                Game::Breakout { engine, .. } => engine.phase(),
            }
        }

        fn clock_armed(&self) -> bool {
            match self {
                Game::Snake { engine, .. } => engine.clock_armed(),
                Game::Breakout { engine, .. } => engine.clock_armed(),
            }
        }

        fn advance(&mut self, elapsed_ms: f64) {
            match self {
                Game::Snake { engine, .. } => engine.advance(elapsed_ms),
                Game::Breakout { engine, .. } => engine.advance(elapsed_ms),
            }
        }

        fn pause(&mut self) -> bool {
            match self {
                Game::Snake { engine, .. } => engine.pause(),
                Game::Breakout { engine, .. } => engine.pause(),
            }
        }
    }

    /// Game instance plus everything the page loop needs
    struct Host {
        game: Game,
        painter: CanvasPainter,
        theme: Theme,
        last_time: Option<f64>,
        raf_id: Option<i32>,
        last_phase: GamePhase,
    }

    impl Host {
        fn render(&self) {
            let surface = self.painter.surface();
            let frame = match &self.game {
                Game::Snake { engine, .. } => {
                    render_snake(&engine.snapshot(), engine.config(), &surface, self.theme)
                }
                Game::Breakout { engine, .. } => {
                    render_breakout(&engine.snapshot(), engine.config(), &surface, self.theme)
                }
            };
            self.painter.paint(&frame);
        }

        /// Drop paddle control whenever the engine stops playing
        fn sync_phase(&mut self) {
            let phase = self.game.phase();
            if self.last_phase == GamePhase::Playing && phase != GamePhase::Playing {
                if let Game::Breakout { engine, arbiter } = &mut self.game {
                    let release = arbiter.on_state_exit();
                    breakout_input::apply(engine, release);
                }
            }
            self.last_phase = phase;
        }

        /// Canvas-relative CSS coordinates of a client point
        fn canvas_point(&self, client_x: i32, client_y: i32) -> (f32, f32) {
            let rect = self.painter.canvas().get_bounding_client_rect();
            (
                (client_x as f64 - rect.left()) as f32,
                (client_y as f64 - rect.top()) as f32,
            )
        }

        /// Client point mapped onto the Brick Breaker field's x axis
        fn field_x(&self, client_x: i32, client_y: i32) -> Option<f32> {
            let Game::Breakout { engine, .. } = &self.game else {
                return None;
            };
            let (x, y) = self.canvas_point(client_x, client_y);
            let field = &engine.config().field;
            Some(
                self.painter
                    .surface()
                    .to_field(x, y, field.width, field.height)
                    .x,
            )
        }
    }

    fn page_theme() -> Theme {
        let Some(root) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        else {
            return Theme::Light;
        };
        let class = root.get_attribute("class").unwrap_or_default();
        let data = root.get_attribute("data-theme").unwrap_or_default();
        Theme::from_attribute(&format!("{} {}", class, data))
    }

    fn game_hooks(name: &'static str) -> Hooks {
        Hooks::new()
            .on_score_change(move |score| log::debug!("{}: score {}", name, score))
            .on_level_change(move |level| log::info!("{}: level {}", name, level))
            .on_game_end(move |summary: &GameSummary| {
                log::info!(
                    "{}: run over with {} (best {})",
                    name,
                    summary.score,
                    summary.highscore
                )
            })
    }

    fn build_game(canvas: &Element) -> Result<Game, ConfigError> {
        let kind = canvas.get_attribute("data-game").unwrap_or_default();
        let overrides = canvas.get_attribute("data-config");
        let persistence = Persistence::browser();
        let seed = js_sys::Date::now() as u64;

        if kind.eq_ignore_ascii_case("breakout") || kind.eq_ignore_ascii_case("brick-breaker") {
            let overrides = overrides
                .and_then(|json| match BreakoutOverrides::from_json(&json) {
                    Ok(o) => Some(o),
                    Err(e) => {
                        log::warn!("ignoring malformed breakout config: {}", e);
                        None
                    }
                })
                .unwrap_or_default();
            let config = BreakoutConfig::default().merged(overrides)?;
            let levels = levels_or_builtin(canvas.get_attribute("data-levels").as_deref());
            let mut engine = BreakoutEngine::with_levels(config, levels, persistence)?.with_seed(seed);
            engine.set_hooks(game_hooks("breakout"));
            Ok(Game::Breakout {
                engine,
                arbiter: PaddleArbiter::new(),
            })
        } else {
            let overrides = overrides
                .and_then(|json| match SnakeOverrides::from_json(&json) {
                    Ok(o) => Some(o),
                    Err(e) => {
                        log::warn!("ignoring malformed snake config: {}", e);
                        None
                    }
                })
                .unwrap_or_default();
            let config = SnakeConfig::default().merged(overrides)?;
            let controls = SnakeControls::new(config.input.swipe_threshold);
            let mut engine = SnakeEngine::new(config, persistence)?.with_seed(seed);
            engine.set_hooks(game_hooks("snake"));
            Ok(Game::Snake { engine, controls })
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialised".into());
        }

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Ok(Some(element)) = document.query_selector("canvas[data-game]") else {
            log::info!("no canvas[data-game] on this page");
            return;
        };
        let game = match build_game(&element) {
            Ok(game) => game,
            Err(e) => {
                log::error!("cannot start game: {}", e);
                return;
            }
        };
        let Some(painter) = element
            .dyn_into::<HtmlCanvasElement>()
            .ok()
            .and_then(CanvasPainter::new)
        else {
            log::error!("canvas has no 2d context");
            return;
        };

        let host = Rc::new(RefCell::new(Host {
            last_phase: game.phase(),
            game,
            painter,
            theme: page_theme(),
            last_time: None,
            raf_id: None,
        }));

        setup_keyboard(&host);
        setup_pointer(&host);
        setup_touch(&host);
        setup_theme_observer(&host);
        setup_auto_pause(&host);
        setup_resize(&host);

        host.borrow().render();
        log::info!("arcade egg mounted");
    }

    /// Queue the next frame if the engine's clock is running and none is pending
    fn schedule(host: &Rc<RefCell<Host>>) {
        let mut h = host.borrow_mut();
        if h.raf_id.is_some() || !h.game.clock_armed() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let next = host.clone();
        let closure = Closure::once(move |time: f64| frame(next, time));
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => h.raf_id = Some(id),
            Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn frame(host: Rc<RefCell<Host>>, time: f64) {
        {
            let mut h = host.borrow_mut();
            h.raf_id = None;
            let elapsed = h.last_time.map_or(0.0, |last| time - last);
            h.last_time = Some(time);
            h.game.advance(elapsed);
            h.sync_phase();
            h.render();
            if !h.game.clock_armed() {
                h.last_time = None;
            }
        }
        schedule(&host);
    }

    /// Run an input handler, then repaint and (re)start the loop as needed
    fn after_input(host: &Rc<RefCell<Host>>, changed: bool) {
        if changed {
            let mut h = host.borrow_mut();
            h.sync_phase();
            h.render();
        }
        schedule(host);
    }

    fn setup_keyboard(host: &Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = Key::parse(&event.key());
                let changed = {
                    let mut h = host.borrow_mut();
                    let phase = h.game.phase();
                    if key.is_game_key() && phase == GamePhase::Playing {
                        event.prevent_default();
                    }
                    match &mut h.game {
                        Game::Snake { engine, controls } => controls
                            .on_key_down(key, phase)
                            .is_some_and(|cmd| snake_input::apply(engine, cmd)),
                        Game::Breakout { engine, arbiter } => arbiter
                            .on_key_down(key, phase)
                            .is_some_and(|cmd| breakout_input::apply(engine, cmd)),
                    }
                };
                after_input(&host, changed);
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = Key::parse(&event.key());
                let mut h = host.borrow_mut();
                if let Game::Breakout { engine, arbiter } = &mut h.game {
                    if let Some(cmd) = arbiter.on_key_up(key) {
                        breakout_input::apply(engine, cmd);
                    }
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_pointer(host: &Rc<RefCell<Host>>) {
        let canvas = host.borrow().painter.canvas().clone();

        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut h = host.borrow_mut();
                let Some(x) = h.field_x(event.client_x(), event.client_y()) else {
                    return;
                };
                if let Game::Breakout { engine, arbiter } = &mut h.game {
                    if let Some(cmd) = arbiter.on_pointer_move(x) {
                        breakout_input::apply(engine, cmd);
                    }
                }
            });
            let _ = canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let changed = {
                    let mut h = host.borrow_mut();
                    let phase = h.game.phase();
                    match &mut h.game {
                        Game::Snake { engine, .. } => SnakeControls::action(phase)
                            .is_some_and(|cmd| snake_input::apply(engine, cmd)),
                        Game::Breakout { engine, .. } => PaddleArbiter::action(phase)
                            .is_some_and(|cmd| breakout_input::apply(engine, cmd)),
                    }
                };
                after_input(&host, changed);
            });
            let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_touch(host: &Rc<RefCell<Host>>) {
        let canvas = host.borrow().painter.canvas().clone();

        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let Some(touch) = event.touches().get(0) else {
                    return;
                };
                event.prevent_default();
                let changed = {
                    let mut h = host.borrow_mut();
                    let (cx, cy) = (touch.client_x(), touch.client_y());
                    let phase = h.game.phase();
                    let point = h.canvas_point(cx, cy);
                    let field_x = h.field_x(cx, cy);
                    match &mut h.game {
                        Game::Snake { controls, .. } => {
                            controls.on_touch_start(point.0, point.1);
                            false
                        }
                        Game::Breakout { engine, arbiter } => {
                            if let Some(cmd) = field_x.and_then(|x| arbiter.on_touch_start(x)) {
                                breakout_input::apply(engine, cmd);
                            }
                            // A tap acts like a click
                            PaddleArbiter::action(phase)
                                .is_some_and(|cmd| breakout_input::apply(engine, cmd))
                        }
                    }
                };
                after_input(&host, changed);
            });
            let _ = canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let Some(touch) = event.touches().get(0) else {
                    return;
                };
                event.prevent_default();
                let mut h = host.borrow_mut();
                let Some(x) = h.field_x(touch.client_x(), touch.client_y()) else {
                    return;
                };
                if let Game::Breakout { engine, arbiter } = &mut h.game {
                    if let Some(cmd) = arbiter.on_touch_move(x) {
                        breakout_input::apply(engine, cmd);
                    }
                }
            });
            let _ = canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let end = event.changed_touches().get(0);
                let changed = {
                    let mut h = host.borrow_mut();
                    let phase = h.game.phase();
                    let point = end.map(|t| h.canvas_point(t.client_x(), t.client_y()));
                    match &mut h.game {
                        Game::Snake { engine, controls } => match point {
                            Some((x, y)) => controls
                                .on_touch_end(x, y, phase)
                                .is_some_and(|cmd| snake_input::apply(engine, cmd)),
                            None => {
                                controls.on_touch_cancel();
                                false
                            }
                        },
                        Game::Breakout { arbiter, .. } => {
                            arbiter.on_touch_end();
                            false
                        }
                    }
                };
                after_input(&host, changed);
            });
            let _ = canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            let _ = canvas.add_event_listener_with_callback("touchcancel", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Repaint when the page flips between light and dark
    fn setup_theme_observer(host: &Rc<RefCell<Host>>) {
        let Some(root) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        else {
            return;
        };
        let host = host.clone();
        let closure = Closure::<dyn FnMut(js_sys::Array, web_sys::MutationObserver)>::new(
            move |_records: js_sys::Array, _observer: web_sys::MutationObserver| {
                let Ok(mut h) = host.try_borrow_mut() else {
                    return;
                };
                let theme = page_theme();
                if theme != h.theme {
                    h.theme = theme;
                    h.render();
                }
            },
        );
        let Ok(observer) = web_sys::MutationObserver::new(closure.as_ref().unchecked_ref()) else {
            return;
        };
        let init = web_sys::MutationObserverInit::new();
        init.set_attributes(true);
        let filter = js_sys::Array::of2(&"class".into(), &"data-theme".into());
        init.set_attribute_filter(&filter);
        if let Err(e) = observer.observe_with_options(&root, &init) {
            log::warn!("theme observer unavailable: {:?}", e);
        }
        closure.forget();
    }

    /// Pause when the tab is hidden
    fn setup_auto_pause(host: &Rc<RefCell<Host>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let host = host.clone();
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if doc.visibility_state() != web_sys::VisibilityState::Hidden {
                return;
            }
            let changed = {
                let mut h = host.borrow_mut();
                let paused = h.game.pause();
                if paused {
                    log::info!("auto-paused (tab hidden)");
                }
                paused
            };
            after_input(&host, changed);
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(host: &Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let host = host.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Ok(h) = host.try_borrow() {
                h.render();
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    web_host::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Arcade Eggs (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 to play in a browser");

    let started = arcade_eggs::platform::now_ms();
    if let Err(e) = headless::snake_demo() {
        log::error!("snake demo failed: {}", e);
    }
    if let Err(e) = headless::breakout_demo() {
        log::error!("breakout demo failed: {}", e);
    }
    log::info!("Demo finished in {:.1}ms", arcade_eggs::platform::now_ms() - started);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use arcade_eggs::sim::{ArcadeEngine, Direction, GameSummary, Hooks};
    use arcade_eggs::{
        BreakoutConfig, BreakoutEngine, ConfigError, GamePhase, Persistence, SnakeConfig,
        SnakeEngine,
    };

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Ten simulated minutes at 60 fps
    const MAX_FRAMES: u32 = 36_000;

    fn report(name: &'static str) -> Hooks {
        Hooks::new().on_game_end(move |summary: &GameSummary| {
            println!("{}: {:?}", name, summary);
        })
    }

    /// Greedy snake: head for the food, avoid reversing
    pub fn snake_demo() -> Result<(), ConfigError> {
        let mut engine = SnakeEngine::new(SnakeConfig::default(), Persistence::in_memory())?.with_seed(7);
        engine.set_hooks(report("snake"));
        engine.start();

        for _ in 0..MAX_FRAMES {
            let snap = engine.snapshot();
            if snap.phase != GamePhase::Playing {
                break;
            }
            if let (Some(head), Some(food)) = (snap.snake.first(), snap.food) {
                let wanted = if food.x > head.x {
                    Direction::Right
                } else if food.x < head.x {
                    Direction::Left
                } else if food.y > head.y {
                    Direction::Down
                } else {
                    Direction::Up
                };
                if !engine.set_direction(wanted) {
                    // Reversal refused: sidestep instead
                    let side = match wanted {
                        Direction::Left | Direction::Right => Direction::Down,
                        Direction::Up | Direction::Down => Direction::Right,
                    };
                    engine.set_direction(side);
                }
            }
            engine.advance(FRAME_MS);
        }
        println!("snake: final score {} (best {})", engine.score(), engine.highscore());
        Ok(())
    }

    /// Paddle tracks the ball; levels advance automatically
    pub fn breakout_demo() -> Result<(), ConfigError> {
        let mut engine =
            BreakoutEngine::new(BreakoutConfig::default(), Persistence::in_memory())?.with_seed(7);
        engine.set_hooks(report("breakout"));
        engine.start();

        for _ in 0..MAX_FRAMES {
            match engine.phase() {
                GamePhase::Playing => {}
                GamePhase::LevelComplete => {
                    engine.next_level();
                    engine.launch_ball();
                    continue;
                }
                _ => break,
            }
            let ball_x = engine.snapshot().ball.pos.x;
            engine.set_paddle_position(ball_x);
            engine.launch_ball();
            engine.advance(FRAME_MS);
        }
        println!("breakout: final score {} (lives {})", engine.score(), engine.lives());
        Ok(())
    }
}
