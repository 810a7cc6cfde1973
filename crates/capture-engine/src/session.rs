//! Camera session lifecycle.
//!
//! One camera stream per booth session: acquired when the session opens,
//! released exactly once when it closes. Dropping an open session
//! releases the stream as a backstop, so no exit path leaves the device
//! claimed.

use snapbooth_common::clock::SessionClock;
use snapbooth_common::error::{BoothError, BoothResult};

use crate::stream::CameraStream;
use crate::synthetic::SyntheticCamera;

/// Which camera backend to open.
#[derive(Debug, Clone)]
pub enum CameraSelection {
    /// Deterministic test-pattern camera.
    Synthetic { width: u32, height: u32 },

    /// A physical device via GStreamer. `device` is a platform hint such
    /// as `/dev/video0`; `None` picks the system default.
    Device { device: Option<String> },
}

/// Lifecycle state of the camera session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraSessionState {
    /// Stream acquired and producing.
    Live,
    /// Stream stopped and released.
    Released,
}

/// Owns the camera stream for the duration of one booth session.
pub struct CameraSession {
    stream: Box<dyn CameraStream>,
    state: CameraSessionState,
    clock: SessionClock,
}

impl CameraSession {
    /// Acquire the selected camera.
    ///
    /// Failure to open a physical device is fatal for the whole session
    /// and reported as `DeviceUnavailable`.
    pub fn open(selection: &CameraSelection) -> BoothResult<Self> {
        let stream: Box<dyn CameraStream> = match selection {
            CameraSelection::Synthetic { width, height } => {
                Box::new(SyntheticCamera::new(*width, *height))
            }
            #[cfg(feature = "gstreamer")]
            CameraSelection::Device { device } => {
                Box::new(crate::gst::GstCamera::open(device.as_deref())?)
            }
            #[cfg(not(feature = "gstreamer"))]
            CameraSelection::Device { .. } => {
                return Err(BoothError::unsupported(
                    "device capture requires the `gstreamer` cargo feature",
                ));
            }
        };

        let (width, height) = stream.resolution();
        tracing::info!(
            backend = stream.name(),
            width,
            height,
            "Camera session opened"
        );

        Ok(Self {
            stream,
            state: CameraSessionState::Live,
            clock: SessionClock::start(),
        })
    }

    /// Wrap an already-open stream. Used by tests and embedders.
    pub fn from_stream(stream: Box<dyn CameraStream>) -> Self {
        Self {
            stream,
            state: CameraSessionState::Live,
            clock: SessionClock::start(),
        }
    }

    pub fn state(&self) -> CameraSessionState {
        self.state
    }

    /// Backend label, e.g. `synthetic` or `gstreamer`.
    pub fn backend_name(&self) -> &str {
        self.stream.name()
    }

    /// Wall-clock time the session opened (ISO 8601).
    pub fn opened_at(&self) -> &str {
        self.clock.epoch_wall()
    }

    /// Seconds since the session opened.
    pub fn elapsed_secs(&self) -> f64 {
        self.clock.elapsed_secs()
    }

    /// Mutable access to the live stream.
    pub fn stream_mut(&mut self) -> BoothResult<&mut dyn CameraStream> {
        match self.state {
            CameraSessionState::Live => Ok(self.stream.as_mut()),
            CameraSessionState::Released => Err(BoothError::session(
                "camera session already released",
            )),
        }
    }

    /// Stop the stream and release the device.
    ///
    /// Closing an already-released session is a no-op, so every exit
    /// path can call this without double-stopping the device.
    pub fn close(&mut self) -> BoothResult<()> {
        if self.state == CameraSessionState::Released {
            tracing::debug!("Camera session already released");
            return Ok(());
        }
        self.stream.stop()?;
        self.state = CameraSessionState::Released;
        tracing::info!(
            elapsed_secs = self.elapsed_secs(),
            "Camera session released"
        );
        Ok(())
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        if self.state == CameraSessionState::Live {
            if let Err(e) = self.stream.stop() {
                tracing::warn!(error = %e, "Failed to release camera on drop");
            } else {
                tracing::debug!("Camera session released on drop");
            }
        }
    }
}

/// Availability of a camera backend in this build, on this host.
#[derive(Debug, Clone)]
pub struct BackendStatus {
    pub name: &'static str,
    pub available: bool,
    pub detail: String,
}

/// Report which camera backends this build can use.
pub fn backend_report() -> Vec<BackendStatus> {
    let mut report = vec![BackendStatus {
        name: "synthetic",
        available: true,
        detail: "deterministic test pattern".to_string(),
    }];

    #[cfg(feature = "gstreamer")]
    report.push(crate::gst::gstreamer_status());

    #[cfg(not(feature = "gstreamer"))]
    report.push(BackendStatus {
        name: "gstreamer",
        available: false,
        detail: "built without the `gstreamer` cargo feature".to_string(),
    });

    report
}
