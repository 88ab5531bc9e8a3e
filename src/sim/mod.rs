//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame timestamps are passed in, never read from a clock
//! - Seeded RNG only
//! - Stable iteration order (invaders stay in spawn order)
//! - No DOM or platform dependencies

pub mod answer;
pub mod input;
pub mod invader;
pub mod state;
pub mod tick;

pub use answer::{AnswerResult, press_delete, press_digit, submit};
pub use input::PendingInput;
pub use invader::Invader;
pub use state::{
    EndTrigger, Feedback, GameEvent, GamePhase, GameState, Outcome, PlayArea, RemovalCause,
    Score, SessionSummary,
};
pub use tick::{countdown, spawn_invader, tick};
