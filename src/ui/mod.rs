//! DOM bindings (wasm only)
//!
//! Every lookup is defensive: a missing element is logged and the feature it
//! backs is skipped, never treated as fatal.

pub mod form;
pub mod nodes;

pub use form::read_settings;
pub use nodes::InvaderNodes;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement};

use crate::settings::GameMode;
use crate::sim::{Feedback, GamePhase, GameState, Outcome, SessionSummary};

/// Screen container for each phase
fn screen_id(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::Settings => "settings-screen",
        GamePhase::Running => "game-screen",
        GamePhase::GameOver => "game-over-screen",
    }
}

/// Handle to the page document with logging lookups
pub struct Dom {
    pub document: Document,
}

impl Dom {
    pub fn new() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }

    /// Look up `#id`, logging when it is absent
    pub fn element(&self, id: &str) -> Option<Element> {
        let element = self.document.get_element_by_id(id);
        if element.is_none() {
            log::warn!("Missing element #{}", id);
        }
        element
    }

    pub fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.element(id) {
            el.set_text_content(Some(text));
        }
    }

    pub fn set_hidden(&self, id: &str, hidden: bool) {
        if let Some(el) = self.element(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    /// Show the screen for `phase`, hide the others
    pub fn show_phase(&self, phase: GamePhase) {
        for other in [GamePhase::Settings, GamePhase::Running, GamePhase::GameOver] {
            self.set_hidden(screen_id(other), other != phase);
        }
    }

    /// Refresh counters, multiplier, remaining time/target and the answer box
    pub fn render_hud(&self, state: &GameState) {
        self.set_text("hud-correct", &state.score.correct.to_string());
        self.set_text("hud-wrong", &state.score.wrong.to_string());
        self.set_text("hud-multiplier", &format!("x{}", state.multiplier));

        match state.settings.mode {
            GameMode::Timed { .. } => {
                self.set_text("hud-remaining-label", "Time");
                self.set_text("hud-remaining", &format!("{}s", state.remaining_secs));
            }
            GameMode::TargetScore { .. } => {
                self.set_text("hud-remaining-label", "To go");
                let left = state.remaining_to_target().unwrap_or(0);
                self.set_text("hud-remaining", &left.to_string());
            }
        }

        let typed = state.input.as_str();
        self.set_text("answer-display", if typed.is_empty() { "_" } else { typed });
    }

    pub fn show_feedback(&self, feedback: Feedback) {
        let Some(el) = self.element("feedback") else {
            return;
        };
        let (text, class) = match feedback {
            Feedback::Correct => ("Correct!", "feedback correct"),
            Feedback::Wrong => ("Wrong!", "feedback wrong"),
        };
        el.set_text_content(Some(text));
        el.set_class_name(class);
    }

    pub fn clear_feedback(&self) {
        if let Some(el) = self.element("feedback") {
            el.set_text_content(None);
            el.set_class_name("feedback hidden");
        }
    }

    /// Fill in the game-over screen and expose the summary for automation
    pub fn render_game_over(&self, summary: &SessionSummary) {
        let title = match summary.outcome {
            Some(Outcome::Win) => "You win!",
            _ => "Game over",
        };
        self.set_text("result-title", title);
        self.set_text("final-correct", &summary.correct.to_string());
        self.set_text("final-wrong", &summary.wrong.to_string());

        if let Some(el) = self.element("game-over-screen") {
            match serde_json::to_string(summary) {
                Ok(json) => {
                    let _ = el.set_attribute("data-summary", &json);
                }
                Err(e) => log::warn!("Could not serialize summary: {}", e),
            }
        }
    }

    /// Play-area size in CSS pixels, if it is laid out
    pub fn play_area_size(&self) -> Option<(f32, f32)> {
        let rect = self.element("play-area")?.get_bounding_client_rect();
        Some((rect.width() as f32, rect.height() as f32))
    }

    /// The celebration canvas sized to its layout box, with its 2D context
    pub fn celebration_canvas(&self) -> Option<(HtmlCanvasElement, CanvasRenderingContext2d)> {
        let canvas: HtmlCanvasElement = self.element("celebration")?.dyn_into().ok()?;
        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        if canvas.width() != width || canvas.height() != height {
            canvas.set_width(width);
            canvas.set_height(height);
        }
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some((canvas, ctx))
    }
}
