//! Countdown-and-capture state machine.
//!
//! One booth attempt counts down from N and fires the camera exactly once
//! when the count runs out. The transition rule itself is a pure function
//! ([`after_tick`]); [`Countdown::run_attempt`] drives it on a tokio
//! interval. Late ticks delay the rest of the schedule instead of
//! bursting, so every displayed number holds for at least one interval
//! and none are skipped.

use std::time::Duration;

use snapbooth_common::error::{BoothError, BoothResult};
use snapbooth_session_model::CapturedFrame;
use tokio::time::MissedTickBehavior;

/// Produces one still frame at the moment the countdown reaches zero.
///
/// Implemented by the capture engine against a live camera; tests use
/// scripted producers.
pub trait FrameProducer: Send {
    fn produce(&mut self) -> BoothResult<CapturedFrame>;
}

/// Observable state of one countdown attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountdownState {
    /// No attempt running.
    #[default]
    Idle,
    /// Counting down; `seconds_remaining` is the number on display.
    CountingDown { seconds_remaining: u32 },
    /// Countdown elapsed, capturing a frame.
    Capturing,
    /// Attempt finished with a frame.
    Done,
    /// Attempt finished without a frame.
    Failed,
}

/// Timing for one countdown attempt.
#[derive(Debug, Clone, Copy)]
pub struct AttemptConfig {
    /// Starting count. Zero captures immediately.
    pub countdown_secs: u32,

    /// Real time each displayed count lasts.
    pub tick_interval: Duration,
}

impl Default for AttemptConfig {
    fn default() -> Self {
        Self {
            countdown_secs: 3,
            tick_interval: Duration::from_millis(1_000),
        }
    }
}

/// Terminal result of one attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// The camera produced a frame.
    Done(CapturedFrame),
    /// The capture failed; the countdown itself cannot fail.
    Failed(BoothError),
}

/// State after a tick fires while `seconds_remaining` is on display.
///
/// This is the whole transition rule: the count decrements until the tick
/// that fires on 1, which moves to `Capturing`.
pub fn after_tick(seconds_remaining: u32) -> CountdownState {
    if seconds_remaining > 1 {
        CountdownState::CountingDown {
            seconds_remaining: seconds_remaining - 1,
        }
    } else {
        CountdownState::Capturing
    }
}

/// One countdown attempt, re-armed explicitly per shot.
///
/// A terminal state (`Done` or `Failed`) is stable: the machine only
/// counts again when [`Countdown::run_attempt`] is called for the next
/// shot.
#[derive(Debug, Default)]
pub struct Countdown {
    state: CountdownState,
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            state: CountdownState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> CountdownState {
        self.state
    }

    /// Run one attempt to its terminal state.
    ///
    /// `notify` observes every state the attempt enters, in order,
    /// starting with the initial `CountingDown`.
    pub async fn run_attempt(
        &mut self,
        config: AttemptConfig,
        producer: &mut dyn FrameProducer,
        mut notify: impl FnMut(CountdownState),
    ) -> AttemptOutcome {
        let started = tokio::time::Instant::now();

        if config.countdown_secs == 0 {
            self.set_state(CountdownState::Capturing, &mut notify);
            return self.finish(producer, &mut notify);
        }

        let mut remaining = config.countdown_secs;
        self.set_state(
            CountdownState::CountingDown {
                seconds_remaining: remaining,
            },
            &mut notify,
        );

        let mut ticks = tokio::time::interval(config.tick_interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first interval tick completes immediately; consume it so the
        // starting count holds for a full interval like every other one.
        ticks.tick().await;

        loop {
            ticks.tick().await;
            match after_tick(remaining) {
                CountdownState::CountingDown { seconds_remaining } => {
                    remaining = seconds_remaining;
                    self.set_state(
                        CountdownState::CountingDown { seconds_remaining },
                        &mut notify,
                    );
                }
                _ => {
                    self.set_state(CountdownState::Capturing, &mut notify);
                    break;
                }
            }
        }

        let nominal = config.tick_interval * config.countdown_secs;
        let elapsed = started.elapsed();
        if elapsed > nominal + config.tick_interval / 2 {
            tracing::debug!(
                elapsed_ms = elapsed.as_millis() as u64,
                nominal_ms = nominal.as_millis() as u64,
                "Countdown ran late"
            );
        }

        self.finish(producer, &mut notify)
    }

    fn set_state(&mut self, state: CountdownState, notify: &mut impl FnMut(CountdownState)) {
        self.state = state;
        notify(state);
    }

    fn finish(
        &mut self,
        producer: &mut dyn FrameProducer,
        notify: &mut impl FnMut(CountdownState),
    ) -> AttemptOutcome {
        match producer.produce() {
            Ok(frame) => {
                self.set_state(CountdownState::Done, notify);
                AttemptOutcome::Done(frame)
            }
            Err(error) => {
                tracing::warn!(%error, "Frame capture failed");
                self.set_state(CountdownState::Failed, notify);
                AttemptOutcome::Failed(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct ScriptedProducer {
        results: VecDeque<BoothResult<CapturedFrame>>,
        calls: u32,
    }

    impl ScriptedProducer {
        fn new(results: Vec<BoothResult<CapturedFrame>>) -> Self {
            Self {
                results: results.into(),
                calls: 0,
            }
        }
    }

    impl FrameProducer for ScriptedProducer {
        fn produce(&mut self) -> BoothResult<CapturedFrame> {
            self.calls += 1;
            self.results
                .pop_front()
                .unwrap_or_else(|| Err(BoothError::capture("script exhausted")))
        }
    }

    fn frame(marker: u8) -> CapturedFrame {
        CapturedFrame::new(4, 4, vec![marker])
    }

    #[test]
    fn test_after_tick_decrements_until_capture() {
        assert_eq!(
            after_tick(3),
            CountdownState::CountingDown {
                seconds_remaining: 2
            }
        );
        assert_eq!(
            after_tick(2),
            CountdownState::CountingDown {
                seconds_remaining: 1
            }
        );
        assert_eq!(after_tick(1), CountdownState::Capturing);
        assert_eq!(after_tick(0), CountdownState::Capturing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_holds_each_value_one_interval() {
        let mut countdown = Countdown::new();
        let mut producer = ScriptedProducer::new(vec![Ok(frame(1))]);
        let start = tokio::time::Instant::now();
        let mut observed: Vec<(CountdownState, u64)> = vec![];

        let outcome = countdown
            .run_attempt(AttemptConfig::default(), &mut producer, |state| {
                observed.push((state, start.elapsed().as_millis() as u64));
            })
            .await;

        assert!(matches!(outcome, AttemptOutcome::Done(_)));
        assert_eq!(
            observed,
            vec![
                (
                    CountdownState::CountingDown {
                        seconds_remaining: 3
                    },
                    0
                ),
                (
                    CountdownState::CountingDown {
                        seconds_remaining: 2
                    },
                    1_000
                ),
                (
                    CountdownState::CountingDown {
                        seconds_remaining: 1
                    },
                    2_000
                ),
                (CountdownState::Capturing, 3_000),
                (CountdownState::Done, 3_000),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_countdown_captures_immediately() {
        let mut countdown = Countdown::new();
        let mut producer = ScriptedProducer::new(vec![Ok(frame(7))]);
        let config = AttemptConfig {
            countdown_secs: 0,
            ..Default::default()
        };
        let start = tokio::time::Instant::now();

        let outcome = countdown.run_attempt(config, &mut producer, |_| {}).await;

        assert!(matches!(outcome, AttemptOutcome::Done(_)));
        assert_eq!(start.elapsed().as_millis(), 0);
        assert_eq!(countdown.state(), CountdownState::Done);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_capture_reaches_failed_state() {
        let mut countdown = Countdown::new();
        let mut producer =
            ScriptedProducer::new(vec![Err(BoothError::capture("sensor timeout"))]);
        let config = AttemptConfig {
            countdown_secs: 1,
            tick_interval: Duration::from_millis(10),
        };

        let outcome = countdown.run_attempt(config, &mut producer, |_| {}).await;

        match outcome {
            AttemptOutcome::Failed(BoothError::Capture { message }) => {
                assert!(message.contains("sensor timeout"));
            }
            other => panic!("expected capture failure, got {other:?}"),
        }
        assert_eq!(countdown.state(), CountdownState::Failed);
        assert_eq!(producer.calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_state_holds_until_next_attempt() {
        let mut countdown = Countdown::new();
        let mut producer = ScriptedProducer::new(vec![Ok(frame(1)), Ok(frame(2))]);
        let config = AttemptConfig {
            countdown_secs: 2,
            tick_interval: Duration::from_millis(100),
        };

        countdown.run_attempt(config, &mut producer, |_| {}).await;
        assert_eq!(countdown.state(), CountdownState::Done);

        // Nothing counts again until the next attempt is started.
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(countdown.state(), CountdownState::Done);

        let mut observed = vec![];
        countdown
            .run_attempt(config, &mut producer, |state| observed.push(state))
            .await;
        assert_eq!(
            observed.first(),
            Some(&CountdownState::CountingDown {
                seconds_remaining: 2
            })
        );
        assert_eq!(producer.calls, 2);
    }
}
