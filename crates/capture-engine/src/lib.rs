//! Snapbooth Capture Engine
//!
//! Owns the camera for a booth session and turns live video into still
//! photos.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               CameraSession                  │
//! │  ┌────────────────┐    ┌─────────────────┐  │
//! │  │  CameraStream  │───▶│  capture_still  │  │
//! │  │ (gst | synth)  │    │ mirror + encode │  │
//! │  └────────────────┘    └────────┬────────┘  │
//! │                                 ▼            │
//! │                          CapturedFrame       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The synthetic backend is always available; physical devices come in
//! through the optional `gstreamer` feature.

pub mod capturer;
#[cfg(feature = "gstreamer")]
pub mod gst;
pub mod session;
pub mod stream;
pub mod synthetic;

pub use capturer::{capture_still, BoothCapturer};
pub use session::*;
pub use stream::{CameraStream, VideoFrame};
pub use synthetic::SyntheticCamera;
