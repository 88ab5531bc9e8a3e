//! Session settings
//!
//! Read once from the settings form when a session starts and immutable for
//! the rest of it. Out-of-range or malformed form values are clamped to sane
//! defaults rather than rejected.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Operand size of the falling numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    /// Values 1-9
    #[default]
    Single,
    /// Values 10-99
    Double,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Single => "single",
            Difficulty::Double => "double",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "single" | "1" => Some(Difficulty::Single),
            "double" | "2" => Some(Difficulty::Double),
            _ => None,
        }
    }

    /// Inclusive range invader values are drawn from
    pub fn value_range(&self) -> RangeInclusive<u32> {
        match self {
            Difficulty::Single => 1..=9,
            Difficulty::Double => 10..=99,
        }
    }
}

/// Fall speed preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpeedTier {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl SpeedTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedTier::Slow => "slow",
            SpeedTier::Normal => "normal",
            SpeedTier::Fast => "fast",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "slow" => Some(SpeedTier::Slow),
            "normal" | "medium" | "med" => Some(SpeedTier::Normal),
            "fast" => Some(SpeedTier::Fast),
            _ => None,
        }
    }

    /// Half-open range of invader speeds in pixels/second
    pub fn speed_range(&self) -> (f32, f32) {
        match self {
            SpeedTier::Slow => (30.0, 55.0),
            SpeedTier::Normal => (50.0, 85.0),
            SpeedTier::Fast => (80.0, 130.0),
        }
    }
}

/// How a session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Ends when the countdown reaches zero
    Timed { seconds: u32 },
    /// Ends when the correct count reaches the target
    TargetScore { target: u32 },
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::Timed {
            seconds: DEFAULT_DURATION_SECS,
        }
    }
}

impl GameMode {
    pub fn is_timed(&self) -> bool {
        matches!(self, GameMode::Timed { .. })
    }
}

/// Where the multiplier comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MultiplierMode {
    /// Re-rolled at session start and after every correct answer
    #[default]
    Random,
    /// Chosen by the player, 1-12
    Fixed(u32),
}

/// Resolved, validated session settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub mode: GameMode,
    pub speed: SpeedTier,
    pub multiplier: MultiplierMode,
}

/// Settings exactly as they come off the form, before validation
#[derive(Debug, Clone, Default)]
pub struct RawSettings {
    pub difficulty: String,
    pub mode: String,
    pub limit: String,
    pub speed: String,
    pub multiplier_mode: String,
    pub fixed_multiplier: String,
}

impl RawSettings {
    /// Validate form input, falling back to defaults for anything unusable
    pub fn resolve(&self) -> Settings {
        let difficulty = Difficulty::from_str(&self.difficulty).unwrap_or_default();
        let speed = SpeedTier::from_str(&self.speed).unwrap_or_default();

        let mode = match self.mode.trim().to_lowercase().as_str() {
            "score" | "target" => GameMode::TargetScore {
                target: parse_limit(&self.limit, DEFAULT_TARGET_SCORE),
            },
            _ => GameMode::Timed {
                seconds: parse_limit(&self.limit, DEFAULT_DURATION_SECS),
            },
        };

        let multiplier = match self.multiplier_mode.trim().to_lowercase().as_str() {
            "fixed" => MultiplierMode::Fixed(clamp_multiplier(&self.fixed_multiplier)),
            _ => MultiplierMode::Random,
        };

        Settings {
            difficulty,
            mode,
            speed,
            multiplier,
        }
    }
}

/// Parse a number field the way an `<input type=number>` reports it
fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(f64::trunc)
}

/// Duration or target score: positive, capped at `MAX_LIMIT`, else `default`
pub fn parse_limit(raw: &str, default: u32) -> u32 {
    match parse_number(raw) {
        Some(n) if n >= 1.0 => n.min(MAX_LIMIT as f64) as u32,
        _ => {
            log::debug!("Limit {:?} unusable, using {}", raw, default);
            default
        }
    }
}

/// Fixed multiplier clamped to 1-12; garbage falls back to the default
pub fn clamp_multiplier(raw: &str) -> u32 {
    match parse_number(raw) {
        Some(n) => n.clamp(MULTIPLIER_MIN as f64, MULTIPLIER_MAX as f64) as u32,
        None => {
            log::debug!(
                "Multiplier {:?} unusable, using {}",
                raw,
                DEFAULT_FIXED_MULTIPLIER
            );
            DEFAULT_FIXED_MULTIPLIER
        }
    }
}
