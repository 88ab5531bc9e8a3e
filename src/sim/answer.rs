//! Keypad actions and answer checking

use serde::{Deserialize, Serialize};

use super::state::{EndTrigger, Feedback, GameEvent, GameState, RemovalCause};
use crate::settings::{GameMode, MultiplierMode};

/// Result of a non-empty submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerResult {
    /// Cleared the invader with this id
    Correct { id: u32 },
    Wrong,
}

/// Append a digit to the pending answer. Returns false if it was dropped.
pub fn press_digit(state: &mut GameState, digit: u8) -> bool {
    if !state.is_running() {
        return false;
    }
    state.input.push_digit(digit)
}

/// Remove the last typed digit
pub fn press_delete(state: &mut GameState) {
    if state.is_running() {
        state.input.backspace();
    }
}

/// Check the pending answer against the active invaders.
///
/// The first invader in list order (oldest spawn) whose value times the
/// multiplier equals the answer is cleared. Returns `None` when there was
/// nothing to submit; the pending input is cleared either way.
pub fn submit(state: &mut GameState) -> Option<AnswerResult> {
    if !state.is_running() {
        return None;
    }
    let answer = state.input.take_value()?;

    let multiplier = state.multiplier;
    let hit = state
        .invaders
        .iter()
        .position(|invader| invader.answer(multiplier) == answer);

    let Some(index) = hit else {
        state.score.wrong += 1;
        state.push_event(GameEvent::Feedback(Feedback::Wrong));
        log::debug!("Wrong answer {} (x{})", answer, multiplier);
        return Some(AnswerResult::Wrong);
    };

    let invader = state.invaders.remove(index);
    state.score.correct += 1;
    state.push_event(GameEvent::InvaderRemoved {
        id: invader.id,
        cause: RemovalCause::Answered,
    });
    state.push_event(GameEvent::Feedback(Feedback::Correct));
    log::debug!(
        "Correct: {} x {} = {}",
        invader.value,
        multiplier,
        answer
    );

    if state.settings.multiplier == MultiplierMode::Random {
        state.roll_multiplier();
    }

    if let GameMode::TargetScore { target } = state.settings.mode {
        if state.score.correct >= target {
            state.end(EndTrigger::TargetReached);
        }
    }

    Some(AnswerResult::Correct { id: invader.id })
}
