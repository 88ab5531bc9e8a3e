//! Game state and core simulation types
//!
//! Everything a session mutates lives in `GameState`. The browser layer owns
//! one instance and only ever reads it or calls into `sim`; visual side
//! effects are driven by the `GameEvent`s it drains after each call.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::input::PendingInput;
use super::invader::Invader;
use crate::consts::*;
use crate::settings::{GameMode, MultiplierMode, Settings};

/// Current phase of the session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Settings form is showing
    Settings,
    /// Active gameplay
    Running,
    /// Run ended, result on screen
    GameOver,
}

/// What ended the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndTrigger {
    /// Timed mode countdown reached zero
    TimeExpired,
    /// Correct count reached the target score
    TargetReached,
}

/// Final verdict of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    /// Every end trigger is nominally a win; more wrong than right overrides it.
    pub fn resolve(score: &Score) -> Self {
        if score.wrong > score.correct {
            Outcome::Loss
        } else {
            Outcome::Win
        }
    }
}

/// Why an invader left the active list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalCause {
    /// Player typed its answer
    Answered,
    /// Fell past the bottom unanswered
    Missed,
    /// Session torn down
    Teardown,
}

/// Transient acknowledgment shown after a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    Correct,
    Wrong,
}

/// Side effects for the presentation layer, in the order they happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    InvaderSpawned { id: u32 },
    InvaderRemoved { id: u32, cause: RemovalCause },
    Feedback(Feedback),
    MultiplierChanged(u32),
    SessionEnded { trigger: EndTrigger, outcome: Outcome },
}

/// Answer counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub correct: u32,
    /// Wrong submissions plus misses
    pub wrong: u32,
}

impl Score {
    pub fn total(&self) -> u32 {
        self.correct + self.wrong
    }
}

/// Size of the play area in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayArea {
    fn default() -> Self {
        Self {
            width: DEFAULT_PLAY_WIDTH,
            height: DEFAULT_PLAY_HEIGHT,
        }
    }
}

/// End-of-session report (game-over screen, logs, automation hook)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub settings: Settings,
    pub correct: u32,
    pub wrong: u32,
    pub trigger: Option<EndTrigger>,
    pub outcome: Option<Outcome>,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for the current session's RNG
    pub seed: u64,
    pub phase: GamePhase,
    pub settings: Settings,
    pub score: Score,
    /// Current multiplier (rolled or fixed)
    pub multiplier: u32,
    /// Seconds left in timed mode
    pub remaining_secs: u32,
    /// Active invaders in spawn order
    pub invaders: Vec<Invader>,
    pub input: PendingInput,
    pub play_area: PlayArea,
    /// Current gap between spawns
    pub spawn_interval_ms: f64,
    /// Set once when the session ends
    pub ended: Option<(EndTrigger, Outcome)>,
    pub(crate) last_frame_ms: Option<f64>,
    pub(crate) last_spawn_ms: Option<f64>,
    rng: Pcg32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create an idle controller sitting on the settings screen
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            phase: GamePhase::Settings,
            settings: Settings::default(),
            score: Score::default(),
            multiplier: MULTIPLIER_MIN,
            remaining_secs: 0,
            invaders: Vec::new(),
            input: PendingInput::new(),
            play_area: PlayArea::default(),
            spawn_interval_ms: SPAWN_INTERVAL_START_MS,
            ended: None,
            last_frame_ms: None,
            last_spawn_ms: None,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Settings -> Running. Resets every per-session counter.
    pub fn start(&mut self, settings: Settings) {
        self.clear_invaders(RemovalCause::Teardown);

        self.settings = settings;
        self.phase = GamePhase::Running;
        self.score = Score::default();
        self.input.clear();
        self.spawn_interval_ms = SPAWN_INTERVAL_START_MS;
        self.last_frame_ms = None;
        self.last_spawn_ms = None;
        self.ended = None;
        self.remaining_secs = match settings.mode {
            GameMode::Timed { seconds } => seconds,
            GameMode::TargetScore { .. } => 0,
        };
        self.roll_multiplier();

        log::info!(
            "Session started: {:?}, multiplier {}",
            self.settings,
            self.multiplier
        );
    }

    /// Back to the settings screen, releasing every active invader
    pub fn restart(&mut self) {
        self.clear_invaders(RemovalCause::Teardown);
        self.input.clear();
        self.phase = GamePhase::Settings;
        self.ended = None;
        self.last_frame_ms = None;
        self.last_spawn_ms = None;
        log::info!("Session reset to settings");
    }

    /// Running -> GameOver. Ignored if the session is not running.
    pub(crate) fn end(&mut self, trigger: EndTrigger) {
        if self.phase != GamePhase::Running {
            return;
        }
        let outcome = Outcome::resolve(&self.score);
        self.phase = GamePhase::GameOver;
        self.ended = Some((trigger, outcome));
        self.input.clear();
        self.push_event(GameEvent::SessionEnded { trigger, outcome });
        log::info!(
            "Session ended by {:?}: {:?} (correct {}, wrong {})",
            trigger,
            outcome,
            self.score.correct,
            self.score.wrong
        );
    }

    /// Pick the multiplier for the next round
    pub(crate) fn roll_multiplier(&mut self) {
        let next = match self.settings.multiplier {
            MultiplierMode::Fixed(m) => m.clamp(MULTIPLIER_MIN, MULTIPLIER_MAX),
            MultiplierMode::Random => self.rng.random_range(MULTIPLIER_MIN..=MULTIPLIER_MAX),
        };
        self.multiplier = next;
        self.push_event(GameEvent::MultiplierChanged(next));
    }

    fn clear_invaders(&mut self, cause: RemovalCause) {
        for invader in std::mem::take(&mut self.invaders) {
            self.events
                .push(GameEvent::InvaderRemoved { id: invader.id, cause });
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.ended.map(|(_, outcome)| outcome)
    }

    /// Correct answers still needed in target-score mode
    pub fn remaining_to_target(&self) -> Option<u32> {
        match self.settings.mode {
            GameMode::TargetScore { target } => Some(target.saturating_sub(self.score.correct)),
            GameMode::Timed { .. } => None,
        }
    }

    /// Update play area after a layout change; nonsense sizes are ignored
    pub fn set_play_area(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
            self.play_area = PlayArea { width, height };
        } else {
            log::warn!("Ignoring play area size {}x{}", width, height);
        }
    }

    pub fn invader(&self, id: u32) -> Option<&Invader> {
        self.invaders.iter().find(|i| i.id == id)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand pending events to the presentation layer
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            settings: self.settings,
            correct: self.score.correct,
            wrong: self.score.wrong,
            trigger: self.ended.map(|(trigger, _)| trigger),
            outcome: self.outcome(),
        }
    }
}
