//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keyboard keys and keypad buttons)
//! - Timers and frame callbacks (wasm only)
//! - Page query flags

pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod timer;

pub use input::{KeyAction, key_action, keypad_action, query_has_flag};
