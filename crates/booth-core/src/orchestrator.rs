//! Sequential capture orchestration.
//!
//! A booth sequence is N countdown attempts run strictly one after the
//! other. A failed attempt is recorded and skipped; the next countdown
//! starts regardless. Only when not a single attempt produced a frame
//! does the sequence as a whole fail.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use snapbooth_common::error::{BoothError, BoothResult};
use snapbooth_session_model::CapturedFrame;

use crate::countdown::{AttemptConfig, AttemptOutcome, Countdown, CountdownState, FrameProducer};

/// Progress callback for booth sequences.
pub type ProgressCallback = Box<dyn Fn(BoothProgress) + Send>;

/// One progress report: the state a given attempt just entered.
#[derive(Debug, Clone, Copy)]
pub struct BoothProgress {
    /// Zero-based attempt index.
    pub attempt: u32,

    /// Total attempts planned.
    pub total: u32,

    /// Countdown state just entered.
    pub state: CountdownState,
}

/// Plan for one booth sequence.
#[derive(Debug, Clone, Copy)]
pub struct SequencePlan {
    /// Photos to capture.
    pub photo_count: u32,

    /// Countdown settings applied to every attempt.
    pub attempt: AttemptConfig,
}

impl Default for SequencePlan {
    fn default() -> Self {
        Self {
            photo_count: 4,
            attempt: AttemptConfig::default(),
        }
    }
}

/// One failed attempt inside a sequence.
#[derive(Debug, Clone)]
pub struct AttemptFailure {
    /// Zero-based attempt index.
    pub attempt: u32,

    /// Rendered error text.
    pub error: String,
}

/// Outcome of a full capture sequence.
#[derive(Debug, Default)]
pub struct SequenceReport {
    /// Frames in capture order. Failed attempts leave no hole here.
    pub frames: Vec<CapturedFrame>,

    /// Failures in attempt order.
    pub failures: Vec<AttemptFailure>,

    /// Whether the sequence stopped early on request.
    pub cancelled: bool,
}

impl SequenceReport {
    /// Attempts that actually ran, captured or failed.
    pub fn attempts_run(&self) -> u32 {
        (self.frames.len() + self.failures.len()) as u32
    }

    /// Attempt indexes that produced the frames, in capture order.
    pub fn captured_attempts(&self) -> Vec<u32> {
        let failed: std::collections::HashSet<u32> =
            self.failures.iter().map(|f| f.attempt).collect();
        (0..self.attempts_run())
            .filter(|i| !failed.contains(i))
            .collect()
    }
}

/// Renders an ordered set of captured frames into a final collage.
///
/// Implemented by `snapbooth-render-engine`; tests substitute counting
/// fakes to observe whether rendering was reached at all.
pub trait CollageRenderer: Send {
    type Output;

    fn render(&mut self, frames: &[CapturedFrame]) -> BoothResult<Self::Output>;
}

/// A completed booth run: the collage plus how it was captured.
#[derive(Debug)]
pub struct BoothRun<T> {
    pub collage: T,
    pub report: SequenceReport,
}

/// Drives countdown attempts strictly in sequence.
pub struct CaptureOrchestrator {
    plan: SequencePlan,
    stop_flag: Arc<AtomicBool>,
}

impl CaptureOrchestrator {
    pub fn new(plan: SequencePlan) -> Self {
        Self {
            plan,
            stop_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that cancels the sequence between attempts when set.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop_flag)
    }

    pub fn plan(&self) -> &SequencePlan {
        &self.plan
    }

    /// Run every planned attempt in order.
    ///
    /// Attempt `k + 1` never starts before attempt `k` reached a terminal
    /// state. The producer is invoked at most once per attempt.
    pub async fn run_sequence(
        &self,
        producer: &mut dyn FrameProducer,
        progress: Option<ProgressCallback>,
    ) -> SequenceReport {
        let total = self.plan.photo_count;
        let mut report = SequenceReport {
            frames: Vec::with_capacity(total as usize),
            ..Default::default()
        };
        let mut countdown = Countdown::new();

        tracing::info!(
            photos = total,
            countdown_secs = self.plan.attempt.countdown_secs,
            tick_ms = self.plan.attempt.tick_interval.as_millis() as u64,
            "Starting capture sequence"
        );

        for attempt in 0..total {
            if self.stop_flag.load(Ordering::SeqCst) {
                tracing::info!(attempt, "Sequence cancelled");
                report.cancelled = true;
                break;
            }

            let notify = |state: CountdownState| {
                if let Some(cb) = &progress {
                    cb(BoothProgress {
                        attempt,
                        total,
                        state,
                    });
                }
            };

            match countdown
                .run_attempt(self.plan.attempt, producer, notify)
                .await
            {
                AttemptOutcome::Done(frame) => {
                    tracing::info!(
                        attempt,
                        width = frame.width,
                        height = frame.height,
                        "Captured frame"
                    );
                    report.frames.push(frame);
                }
                AttemptOutcome::Failed(error) => {
                    tracing::warn!(attempt, %error, "Attempt failed, continuing sequence");
                    report.failures.push(AttemptFailure {
                        attempt,
                        error: error.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            captured = report.frames.len(),
            failed = report.failures.len(),
            cancelled = report.cancelled,
            "Capture sequence finished"
        );
        report
    }

    /// Run the sequence and render a collage from whatever was captured.
    ///
    /// When no attempt produced a frame the renderer is never invoked and
    /// a composition error is returned instead.
    pub async fn run_booth<R: CollageRenderer>(
        &self,
        producer: &mut dyn FrameProducer,
        renderer: &mut R,
        progress: Option<ProgressCallback>,
    ) -> BoothResult<BoothRun<R::Output>> {
        let report = self.run_sequence(producer, progress).await;

        if report.frames.is_empty() {
            return Err(BoothError::composition(format!(
                "no frames captured in {} attempts",
                report.attempts_run()
            )));
        }

        let collage = renderer.render(&report.frames)?;
        Ok(BoothRun { collage, report })
    }
}
