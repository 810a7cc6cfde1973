//! Clock and pacing utilities for booth sessions.
//!
//! A booth session is anchored to a monotonic clock epoch recorded the
//! moment the camera opens. This module provides utilities for:
//! - Capturing the epoch
//! - Converting between monotonic and wall-clock time
//! - Pacing periodic work (frame animation, preview refresh)
//!
//! The countdown cadence itself is driven by async timers in
//! `snapbooth-booth-core`; the gate here is for synchronous producers.

use std::time::Instant;

/// A session clock that provides monotonic timestamps relative to
/// a fixed epoch (the moment the camera opened).
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant the session started.
    epoch: Instant,

    /// Wall-clock time at epoch (ISO 8601 string).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new session clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Get milliseconds elapsed since session start.
    pub fn elapsed_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// Get seconds elapsed since session start.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// The underlying epoch instant.
    pub fn epoch(&self) -> Instant {
        self.epoch
    }
}

/// Tick gate for pacing periodic work against a millisecond clock.
#[derive(Debug)]
pub struct TickGate {
    target_interval_ms: u64,
    last_tick_ms: Option<u64>,
}

impl TickGate {
    /// Create a gate that opens every `interval_ms` milliseconds.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            target_interval_ms: interval_ms.max(1),
            last_tick_ms: None,
        }
    }

    /// Create a gate targeting the given Hz rate.
    pub fn from_hz(target_hz: u32) -> Self {
        Self::new(1_000 / u64::from(target_hz.max(1)))
    }

    /// Check if enough time has passed for the next tick.
    /// Returns true and updates internal state if ready.
    /// The first call always returns true.
    pub fn should_tick(&mut self, current_ms: u64) -> bool {
        match self.last_tick_ms {
            None => {
                self.last_tick_ms = Some(current_ms);
                true
            }
            Some(last) if current_ms >= last + self.target_interval_ms => {
                self.last_tick_ms = Some(current_ms);
                true
            }
            _ => false,
        }
    }

    /// Target interval in milliseconds.
    pub fn interval_ms(&self) -> u64 {
        self.target_interval_ms
    }
}
