//! Snapbooth Booth Core
//!
//! Drives the heart of a booth session:
//! - **Countdown:** Per-shot state machine (count down, capture, settle)
//! - **Orchestrator:** Strictly sequential attempts where a failed shot
//!   is skipped, never fatal
//!
//! This crate is pure control flow and touches no camera and no files.
//! Frame producers and collage renderers are injected through traits.

pub mod countdown;
pub mod orchestrator;

pub use countdown::{
    after_tick, AttemptConfig, AttemptOutcome, Countdown, CountdownState, FrameProducer,
};
pub use orchestrator::{
    AttemptFailure, BoothProgress, BoothRun, CaptureOrchestrator, CollageRenderer,
    ProgressCallback, SequencePlan, SequenceReport,
};
