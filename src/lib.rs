//! Number Invaders - A falling-numbers multiplication arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, answers, game state)
//! - `settings`: Per-session settings and form parsing
//! - `celebration`: Cosmetic confetti burst shown on a win
//! - `platform`: Browser/native platform abstraction
//! - `ui`: DOM bindings (wasm only)

pub mod celebration;
pub mod platform;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod ui;

pub use settings::{Difficulty, GameMode, MultiplierMode, RawSettings, Settings, SpeedTier};

/// Game configuration constants
pub mod consts {
    /// Largest frame delta fed to the simulation (seconds), so a stalled or
    /// backgrounded tab does not teleport invaders
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Spawn curve: interval starts here and shrinks by a step per spawn
    pub const SPAWN_INTERVAL_START_MS: f64 = 2000.0;
    pub const SPAWN_INTERVAL_STEP_MS: f64 = 25.0;
    pub const SPAWN_INTERVAL_MIN_MS: f64 = 700.0;

    /// Invaders start just above the visible play area
    pub const INVADER_START_Y: f32 = -40.0;
    /// Horizontal footprint of an invader node (CSS pixels)
    pub const INVADER_WIDTH: f32 = 64.0;

    /// Play area used until the DOM has been measured
    pub const DEFAULT_PLAY_WIDTH: f32 = 480.0;
    pub const DEFAULT_PLAY_HEIGHT: f32 = 600.0;

    /// Longest answer the keypad accepts (99 x 12 = 1188)
    pub const MAX_INPUT_DIGITS: usize = 4;

    /// Settings defaults and bounds
    pub const DEFAULT_DURATION_SECS: u32 = 60;
    pub const DEFAULT_TARGET_SCORE: u32 = 20;
    pub const DEFAULT_FIXED_MULTIPLIER: u32 = 2;
    pub const MULTIPLIER_MIN: u32 = 1;
    pub const MULTIPLIER_MAX: u32 = 12;
    /// Upper bound for the duration/target field so a typo can't lock a session
    pub const MAX_LIMIT: u32 = 3600;

    /// Countdown period in timed mode
    pub const COUNTDOWN_INTERVAL_MS: i32 = 1000;
    /// How long the correct/wrong acknowledgment stays visible
    pub const FEEDBACK_MS: i32 = 600;

    /// Win celebration
    pub const CELEBRATION_SECS: f32 = 3.0;
    pub const CELEBRATION_PARTICLES: usize = 160;
}
