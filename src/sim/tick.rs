//! Per-frame simulation tick
//!
//! Advances the session by one display frame: spawns on the decaying
//! interval, moves every invader down, and counts the ones that escape.

use rand::Rng;

use super::invader::Invader;
use super::state::{EndTrigger, GameEvent, GameState, RemovalCause};
use crate::consts::*;

/// Advance the game by one frame. `now_ms` is the frame timestamp.
///
/// No-op unless the session is running, so a frame callback that was queued
/// before cancellation is harmless.
pub fn tick(state: &mut GameState, now_ms: f64) {
    if !state.is_running() {
        return;
    }

    let dt = match state.last_frame_ms {
        Some(last) => (((now_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
        None => 0.0,
    };
    state.last_frame_ms = Some(now_ms);

    // Spawn on the decaying interval (first frame spawns immediately)
    let spawn_due = match state.last_spawn_ms {
        Some(last) => now_ms - last >= state.spawn_interval_ms,
        None => true,
    };
    if spawn_due {
        spawn_invader(state);
        state.last_spawn_ms = Some(now_ms);
        state.spawn_interval_ms =
            (state.spawn_interval_ms - SPAWN_INTERVAL_STEP_MS).max(SPAWN_INTERVAL_MIN_MS);
    }

    for invader in &mut state.invaders {
        invader.advance(dt);
    }

    // Misses: anything past the bottom is gone and counts as wrong
    let height = state.play_area.height;
    let (escaped, active): (Vec<Invader>, Vec<Invader>) = std::mem::take(&mut state.invaders)
        .into_iter()
        .partition(|invader| invader.has_escaped(height));
    state.invaders = active;

    for invader in escaped {
        state.score.wrong += 1;
        log::debug!("Missed invader {} ({})", invader.id, invader.value);
        state.push_event(GameEvent::InvaderRemoved {
            id: invader.id,
            cause: RemovalCause::Missed,
        });
    }
}

/// Once-per-second countdown in timed mode
pub fn countdown(state: &mut GameState) {
    if !state.is_running() || !state.settings.mode.is_timed() {
        return;
    }
    state.remaining_secs = state.remaining_secs.saturating_sub(1);
    if state.remaining_secs == 0 {
        state.end(EndTrigger::TimeExpired);
    }
}

/// Put a new invader above the play area. Returns its id.
pub fn spawn_invader(state: &mut GameState) -> u32 {
    let value = pick_value(state);
    let (min_speed, max_speed) = state.settings.speed.speed_range();
    let max_x = (state.play_area.width - INVADER_WIDTH).max(0.0);

    let rng = state.rng();
    let x = if max_x > 0.0 {
        rng.random_range(0.0..max_x)
    } else {
        0.0
    };
    let speed = rng.random_range(min_speed..max_speed);

    let id = state.next_entity_id();
    state.invaders.push(Invader::new(id, value, x, speed));
    state.push_event(GameEvent::InvaderSpawned { id });
    log::debug!("Spawned invader {} ({}) at x={:.0}", id, value, x);
    id
}

/// Draw a value no active invader already has, unless the range is exhausted
fn pick_value(state: &mut GameState) -> u32 {
    let range = state.settings.difficulty.value_range();
    let unused: Vec<u32> = range
        .clone()
        .filter(|v| !state.invaders.iter().any(|i| i.value == *v))
        .collect();

    let rng = state.rng();
    if unused.is_empty() {
        rng.random_range(range)
    } else {
        unused[rng.random_range(0..unused.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Difficulty, GameMode, MultiplierMode, Settings, SpeedTier};
    use crate::sim::answer::{press_delete, press_digit, submit};
    use crate::sim::state::{GamePhase, Outcome};
    use proptest::prelude::*;

    fn running(settings: Settings) -> GameState {
        let mut state = GameState::new(12345);
        state.start(settings);
        state.drain_events();
        state
    }

    /// Keep the spawner quiet so tests control the invader list
    fn suppress_spawns(state: &mut GameState) {
        state.last_spawn_ms = Some(0.0);
        state.spawn_interval_ms = f64::MAX;
    }

    #[test]
    fn test_first_frame_spawns_immediately() {
        let mut state = running(Settings::default());
        tick(&mut state, 5000.0);
        assert_eq!(state.invaders.len(), 1);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::InvaderSpawned {
                id: state.invaders[0].id
            }]
        );
        assert!((1..=9).contains(&state.invaders[0].value));
    }

    #[test]
    fn test_spawn_interval_decays() {
        let mut state = running(Settings::default());
        tick(&mut state, 0.0);
        assert_eq!(state.spawn_interval_ms, SPAWN_INTERVAL_START_MS - SPAWN_INTERVAL_STEP_MS);

        // Not yet due
        tick(&mut state, 1000.0);
        assert_eq!(state.invaders.len(), 1);

        // Exactly due
        tick(&mut state, 1975.0);
        assert_eq!(state.invaders.len(), 2);
        assert_eq!(
            state.spawn_interval_ms,
            SPAWN_INTERVAL_START_MS - 2.0 * SPAWN_INTERVAL_STEP_MS
        );
    }

    #[test]
    fn test_spawn_interval_floor() {
        let mut state = running(Settings::default());
        state.spawn_interval_ms = SPAWN_INTERVAL_MIN_MS + 10.0;
        tick(&mut state, 0.0);
        assert_eq!(state.spawn_interval_ms, SPAWN_INTERVAL_MIN_MS);
        tick(&mut state, SPAWN_INTERVAL_MIN_MS);
        assert_eq!(state.spawn_interval_ms, SPAWN_INTERVAL_MIN_MS);
        assert_eq!(state.invaders.len(), 2);
    }

    #[test]
    fn test_frame_delta_is_clamped() {
        let mut state = running(Settings::default());
        suppress_spawns(&mut state);
        state.invaders.push(Invader::new(99, 4, 10.0, 100.0));

        tick(&mut state, 0.0);
        // A ten second stall only moves one clamped frame's worth
        tick(&mut state, 10_000.0);
        let y = state.invaders[0].pos().y;
        assert!((y - (INVADER_START_Y + 100.0 * MAX_FRAME_DT)).abs() < 1e-3);
    }

    #[test]
    fn test_miss_counts_once() {
        let mut state = running(Settings::default());
        suppress_spawns(&mut state);
        state.set_play_area(300.0, 100.0);
        state.invaders.push(Invader::new(50, 6, 10.0, 1000.0));
        state.invaders.push(Invader::new(51, 7, 10.0, 1.0));

        for frame in 0..5 {
            tick(&mut state, frame as f64 * 100.0);
        }

        assert_eq!(state.score.wrong, 1);
        assert_eq!(state.invaders.len(), 1);
        assert_eq!(state.invaders[0].id, 51);
        let misses: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| {
                matches!(
                    e,
                    GameEvent::InvaderRemoved {
                        cause: RemovalCause::Missed,
                        ..
                    }
                )
            })
            .collect();
        assert_eq!(
            misses,
            vec![GameEvent::InvaderRemoved {
                id: 50,
                cause: RemovalCause::Missed
            }]
        );
        // Missing never ends the session by itself
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_tick_ignored_when_not_running() {
        let mut state = GameState::new(1);
        tick(&mut state, 0.0);
        assert!(state.invaders.is_empty());

        let mut state = running(Settings::default());
        state.end(EndTrigger::TimeExpired);
        tick(&mut state, 0.0);
        assert!(state.invaders.is_empty());
    }

    #[test]
    fn test_values_avoid_duplicates() {
        let mut state = running(Settings::default());
        for _ in 0..9 {
            spawn_invader(&mut state);
        }
        let mut values: Vec<u32> = state.invaders.iter().map(|i| i.value).collect();
        values.sort_unstable();
        assert_eq!(values, (1..=9).collect::<Vec<_>>());

        // Range exhausted: a duplicate is unavoidable but still in range
        spawn_invader(&mut state);
        assert!((1..=9).contains(&state.invaders[9].value));
    }

    #[test]
    fn test_spawn_respects_settings() {
        let mut state = running(Settings {
            difficulty: Difficulty::Double,
            speed: SpeedTier::Fast,
            ..Default::default()
        });
        for _ in 0..30 {
            spawn_invader(&mut state);
        }
        let (min_speed, max_speed) = SpeedTier::Fast.speed_range();
        for invader in &state.invaders {
            assert!((10..=99).contains(&invader.value));
            assert!(invader.speed >= min_speed && invader.speed < max_speed);
            assert!(invader.pos().x >= 0.0);
            assert!(invader.pos().x <= DEFAULT_PLAY_WIDTH - INVADER_WIDTH);
            assert_eq!(invader.pos().y, INVADER_START_Y);
        }
    }

    #[test]
    fn test_countdown_ends_session() {
        let mut state = running(Settings {
            mode: GameMode::Timed { seconds: 2 },
            ..Default::default()
        });
        countdown(&mut state);
        assert_eq!(state.remaining_secs, 1);
        assert!(state.is_running());

        countdown(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.ended, Some((EndTrigger::TimeExpired, Outcome::Win)));

        // Late callback after the end changes nothing
        countdown(&mut state);
        assert_eq!(state.remaining_secs, 0);
    }

    #[test]
    fn test_countdown_ignored_in_score_mode() {
        let mut state = running(Settings {
            mode: GameMode::TargetScore { target: 3 },
            ..Default::default()
        });
        countdown(&mut state);
        assert!(state.is_running());
    }

    #[test]
    fn test_timeout_with_poor_accuracy_is_loss() {
        let mut state = running(Settings {
            mode: GameMode::Timed { seconds: 1 },
            multiplier: MultiplierMode::Fixed(3),
            ..Default::default()
        });
        press_digit(&mut state, 1);
        submit(&mut state);
        countdown(&mut state);
        assert_eq!(state.outcome(), Some(Outcome::Loss));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical sessions
        let mut state1 = running(Settings::default());
        let mut state2 = running(Settings::default());

        for frame in 0..600 {
            let now = frame as f64 * 16.0;
            tick(&mut state1, now);
            tick(&mut state2, now);
        }

        assert_eq!(state1.invaders.len(), state2.invaders.len());
        for (a, b) in state1.invaders.iter().zip(&state2.invaders) {
            assert_eq!(a.value, b.value);
            assert_eq!(a.pos(), b.pos());
        }
        assert_eq!(state1.score, state2.score);
    }

    #[derive(Debug, Clone)]
    enum Action {
        Frame(u16),
        Digit(u8),
        Delete,
        Submit,
        Countdown,
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            4 => (0u16..250).prop_map(Action::Frame),
            3 => (0u8..10).prop_map(Action::Digit),
            1 => Just(Action::Delete),
            2 => Just(Action::Submit),
            1 => Just(Action::Countdown),
        ]
    }

    proptest! {
        #[test]
        fn prop_counters_never_decrease_and_x_is_fixed(
            seed in any::<u64>(),
            actions in prop::collection::vec(action(), 1..300),
        ) {
            let mut state = GameState::new(seed);
            state.set_play_area(320.0, 240.0);
            state.start(Settings {
                mode: GameMode::Timed { seconds: 30 },
                speed: SpeedTier::Fast,
                ..Default::default()
            });

            let mut now = 0.0;
            let mut last_total = 0;
            let mut seen: Vec<(u32, f32, f32)> = Vec::new();

            for action in actions {
                match action {
                    Action::Frame(ms) => {
                        now += ms as f64;
                        tick(&mut state, now);
                    }
                    Action::Digit(d) => { press_digit(&mut state, d); }
                    Action::Delete => press_delete(&mut state),
                    Action::Submit => { submit(&mut state); }
                    Action::Countdown => countdown(&mut state),
                }

                prop_assert!(state.score.total() >= last_total);
                last_total = state.score.total();

                for invader in &state.invaders {
                    if let Some(&(_, x, y)) = seen.iter().find(|(id, _, _)| *id == invader.id) {
                        prop_assert_eq!(x, invader.pos().x);
                        prop_assert!(invader.pos().y >= y);
                    }
                }
                seen = state
                    .invaders
                    .iter()
                    .map(|i| (i.id, i.pos().x, i.pos().y))
                    .collect();
            }
        }

        #[test]
        fn prop_each_miss_counted_exactly_once(
            speeds in prop::collection::vec(200.0f32..2000.0, 1..20),
        ) {
            let mut state = running(Settings::default());
            suppress_spawns(&mut state);
            state.set_play_area(300.0, 50.0);
            for (i, speed) in speeds.iter().enumerate() {
                state.invaders.push(Invader::new(1000 + i as u32, 1, 0.0, *speed));
            }

            // Enough clamped frames for the slowest to fall 90px
            for frame in 0..10 {
                tick(&mut state, frame as f64 * 100.0);
            }

            prop_assert!(state.invaders.is_empty());
            prop_assert_eq!(state.score.wrong as usize, speeds.len());
        }
    }
}
