//! Number Invaders entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, KeyboardEvent, MouseEvent};

    use number_invaders::celebration::Celebration;
    use number_invaders::consts::*;
    use number_invaders::platform::timer::{AnimationFrame, Interval, Timeout};
    use number_invaders::platform::{KeyAction, key_action, keypad_action, query_has_flag};
    use number_invaders::sim::{self, Feedback, GameEvent, GamePhase, GameState, Outcome};
    use number_invaders::ui::{Dom, InvaderNodes, read_settings};

    type SharedGame = Rc<RefCell<Game>>;

    /// Game instance holding all state plus every live browser resource
    struct Game {
        state: GameState,
        dom: Dom,
        nodes: InvaderNodes,
        frame: Option<AnimationFrame>,
        countdown: Option<Interval>,
        feedback: Option<Timeout>,
        celebration: Option<Celebration>,
        celebration_frame: Option<AnimationFrame>,
    }

    /// What the browser must do after draining a batch of events
    #[derive(Default)]
    struct Applied {
        feedback: Option<Feedback>,
        ended: Option<Outcome>,
    }

    impl Game {
        fn new(seed: u64, dom: Dom) -> Self {
            let container = dom.element("play-area");
            Self {
                state: GameState::new(seed),
                nodes: InvaderNodes::new(container),
                dom,
                frame: None,
                countdown: None,
                feedback: None,
                celebration: None,
                celebration_frame: None,
            }
        }

        fn measure_play_area(&mut self) {
            if let Some((width, height)) = self.dom.play_area_size() {
                self.state.set_play_area(width, height);
            }
        }

        /// Mirror simulation events onto the page
        fn apply_events(&mut self) -> Applied {
            let mut applied = Applied::default();
            for event in self.state.drain_events() {
                match event {
                    GameEvent::InvaderSpawned { id } => {
                        if let Some(invader) = self.state.invader(id) {
                            self.nodes.attach(&self.dom.document, invader);
                        }
                    }
                    GameEvent::InvaderRemoved { id, .. } => self.nodes.detach(id),
                    GameEvent::Feedback(feedback) => applied.feedback = Some(feedback),
                    GameEvent::SessionEnded { outcome, .. } => applied.ended = Some(outcome),
                    // HUD redraw below picks it up
                    GameEvent::MultiplierChanged(_) => {}
                }
            }
            self.nodes.sync(&self.state.invaders);
            self.dom.render_hud(&self.state);
            applied
        }

        /// Stop the frame loop and countdown of the running session
        fn stop_session_timers(&mut self) {
            self.frame = None;
            self.countdown = None;
        }

        /// Cancel everything scheduled, including cosmetic timers
        fn cancel_all(&mut self) {
            self.stop_session_timers();
            self.feedback = None;
            self.celebration_frame = None;
            self.celebration = None;
            if let Some((canvas, ctx)) = self.dom.celebration_canvas() {
                ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Number Invaders starting...");

        let Some(dom) = Dom::new() else {
            log::error!("No document - nothing to run");
            return Ok(());
        };

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, dom)));
        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(game.clone())?;
        setup_keypad(game.clone())?;
        setup_buttons(game.clone());
        setup_resize(game.clone())?;

        game.borrow().dom.show_phase(GamePhase::Settings);

        // ?autostart skips the settings screen with whatever the form holds
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        if query_has_flag(&search, "autostart") {
            log::info!("Autostart requested");
            start_session(&game);
        }

        Ok(())
    }

    fn start_session(game: &SharedGame) {
        let timed = {
            let mut g = game.borrow_mut();
            if g.state.is_running() {
                return;
            }
            g.cancel_all();

            let settings = read_settings(&g.dom).resolve();
            // Show the screen first so the play area has a layout to measure
            g.dom.show_phase(GamePhase::Running);
            g.dom.clear_feedback();
            g.measure_play_area();
            g.state.start(settings);
            let _ = g.apply_events();
            settings.mode.is_timed()
        };

        request_frame(game);

        if timed {
            let countdown_game = game.clone();
            let interval = Interval::start(COUNTDOWN_INTERVAL_MS, move || {
                on_countdown(&countdown_game)
            });
            game.borrow_mut().countdown = interval;
        }
    }

    fn request_frame(game: &SharedGame) {
        let frame_game = game.clone();
        let frame = AnimationFrame::request(move |time: f64| game_loop(&frame_game, time));
        game.borrow_mut().frame = frame;
    }

    fn game_loop(game: &SharedGame, time: f64) {
        {
            let mut g = game.borrow_mut();
            // Frame may have been queued before the session stopped
            if !g.state.is_running() {
                return;
            }
            sim::tick(&mut g.state, time);
        }

        after_update(game);

        if game.borrow().state.is_running() {
            request_frame(game);
        }
    }

    fn on_countdown(game: &SharedGame) {
        {
            let mut g = game.borrow_mut();
            if !g.state.is_running() {
                return;
            }
            sim::countdown(&mut g.state);
        }
        after_update(game);
    }

    fn on_action(game: &SharedGame, action: KeyAction) {
        if action == KeyAction::Abort {
            if game.borrow().state.is_running() {
                restart(game);
            }
            return;
        }

        {
            let mut g = game.borrow_mut();
            if !g.state.is_running() {
                return;
            }
            match action {
                KeyAction::Digit(d) => {
                    sim::press_digit(&mut g.state, d);
                }
                KeyAction::Delete => sim::press_delete(&mut g.state),
                KeyAction::Submit => {
                    sim::submit(&mut g.state);
                }
                KeyAction::Abort => {}
            }
        }
        after_update(game);
    }

    /// Sync the page after the simulation changed, then react to results
    fn after_update(game: &SharedGame) {
        let applied = game.borrow_mut().apply_events();
        if let Some(feedback) = applied.feedback {
            show_feedback(game, feedback);
        }
        if let Some(outcome) = applied.ended {
            finish_session(game, outcome);
        }
    }

    fn show_feedback(game: &SharedGame, feedback: Feedback) {
        let dismiss_game = game.clone();
        let mut g = game.borrow_mut();
        g.dom.show_feedback(feedback);
        // Replacing the handle cancels the previous dismissal
        g.feedback = Timeout::start(FEEDBACK_MS, move || {
            dismiss_game.borrow().dom.clear_feedback();
        });
    }

    fn finish_session(game: &SharedGame, outcome: Outcome) {
        {
            let mut g = game.borrow_mut();
            g.stop_session_timers();
            let summary = g.state.summary();
            g.dom.render_game_over(&summary);
            g.dom.show_phase(GamePhase::GameOver);
        }

        if outcome == Outcome::Win {
            start_celebration(game);
        }
    }

    fn start_celebration(game: &SharedGame) {
        {
            let mut g = game.borrow_mut();
            let Some((canvas, _)) = g.dom.celebration_canvas() else {
                return;
            };
            let seed = g.state.seed ^ js_sys::Date::now() as u64;
            g.celebration = Some(Celebration::new(
                seed,
                canvas.width() as f32,
                canvas.height() as f32,
            ));
        }
        request_celebration_frame(game);
    }

    fn request_celebration_frame(game: &SharedGame) {
        let frame_game = game.clone();
        let frame =
            AnimationFrame::request(move |time: f64| celebration_loop(&frame_game, time));
        game.borrow_mut().celebration_frame = frame;
    }

    fn celebration_loop(game: &SharedGame, time: f64) {
        let keep_going = {
            let mut guard = game.borrow_mut();
            let g = &mut *guard;
            let Some(celebration) = g.celebration.as_mut() else {
                return;
            };
            let Some((canvas, ctx)) = g.dom.celebration_canvas() else {
                g.celebration = None;
                return;
            };
            let width = canvas.width() as f64;
            let height = canvas.height() as f64;

            let alive = celebration.frame(time);
            if alive {
                celebration.draw(&ctx, width, height);
            } else {
                ctx.clear_rect(0.0, 0.0, width, height);
                g.celebration = None;
            }
            alive
        };

        if keep_going {
            request_celebration_frame(game);
        }
    }

    /// Tear the session down and return to the settings form
    fn restart(game: &SharedGame) {
        let mut g = game.borrow_mut();
        g.cancel_all();
        g.state.restart();
        let _ = g.apply_events();
        if !g.nodes.is_empty() {
            log::warn!("{} invader nodes outlived teardown", g.nodes.len());
            g.nodes.detach_all();
        }
        g.dom.clear_feedback();
        g.dom.show_phase(GamePhase::Settings);
    }

    fn setup_keyboard(game: SharedGame) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            // Keys only drive the running screen
            if !game.borrow().state.is_running() {
                return;
            }
            if let Some(action) = key_action(&event.key()) {
                event.prevent_default();
                on_action(&game, action);
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_keypad(game: SharedGame) -> Result<(), JsValue> {
        let buttons = game.borrow().dom.document.query_selector_all("[data-key]")?;
        if buttons.length() == 0 {
            log::warn!("No keypad buttons found");
        }

        for i in 0..buttons.length() {
            let Some(button) = buttons.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(action) = button.get_attribute("data-key").as_deref().and_then(keypad_action)
            else {
                log::warn!("Keypad button with unknown data-key");
                continue;
            };

            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                on_action(&game, action);
            });
            button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_buttons(game: SharedGame) {
        let g = game.borrow();
        let dom = &g.dom;

        if let Some(btn) = dom.element("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                start_session(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = dom.element("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                restart(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: SharedGame) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            if g.state.is_running() {
                g.measure_play_area();
            }
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
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
    log::info!("Number Invaders (native) starting...");
    log::info!("The game itself runs in the browser - use `trunk serve` for the web version");

    let summary = headless::run_demo(2024);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not serialize summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted session for running the simulation without a browser
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use number_invaders::settings::{GameMode, Settings};
    use number_invaders::sim::{self, GameState, SessionSummary};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// How often the scripted player answers
    const ANSWER_EVERY_MS: f64 = 1200.0;
    /// Every n-th answer is deliberately off by one
    const SLIP_EVERY: u32 = 5;

    pub fn run_demo(seed: u64) -> SessionSummary {
        let mut state = GameState::new(seed);
        state.start(Settings {
            mode: GameMode::Timed { seconds: 30 },
            ..Default::default()
        });

        let mut frame: u64 = 0;
        let mut next_second = 1000.0;
        let mut next_answer = ANSWER_EVERY_MS;
        let mut attempts: u32 = 0;

        while state.is_running() {
            let now = frame as f64 * FRAME_MS;
            sim::tick(&mut state, now);

            if now >= next_second {
                sim::countdown(&mut state);
                next_second += 1000.0;
            }

            if now >= next_answer {
                next_answer += ANSWER_EVERY_MS;
                // Go for whatever is closest to the bottom
                let lowest = state
                    .invaders
                    .iter()
                    .max_by(|a, b| a.pos().y.total_cmp(&b.pos().y))
                    .map(|invader| invader.answer(state.multiplier));

                if let Some(mut answer) = lowest {
                    attempts += 1;
                    if attempts % SLIP_EVERY == 0 {
                        answer += 1;
                    }
                    for digit in answer.to_string().bytes() {
                        sim::press_digit(&mut state, digit - b'0');
                    }
                    sim::submit(&mut state);
                }
            }

            for event in state.drain_events() {
                log::debug!("{:?}", event);
            }
            frame += 1;
        }

        state.summary()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use number_invaders::sim::{EndTrigger, Outcome};

        #[test]
        fn test_demo_session_completes() {
            let summary = run_demo(7);
            assert_eq!(summary.trigger, Some(EndTrigger::TimeExpired));
            assert!(summary.correct > 0);
            assert_eq!(summary.outcome, Some(Outcome::Win));
        }
    }
}
