//! GStreamer camera backend.
//!
//! Opens the default video device (or an explicit one) and converts its
//! output to RGB at an appsink, one pulled sample per still.

use std::sync::OnceLock;

use gst::prelude::*;
use gstreamer as gst;
use gstreamer_app as gst_app;
use image::RgbImage;

use snapbooth_common::error::{BoothError, BoothResult};

use crate::session::BackendStatus;
use crate::stream::{CameraStream, VideoFrame};

/// A physical camera behind a GStreamer pipeline.
pub struct GstCamera {
    pipeline: gst::Pipeline,
    appsink: gst_app::AppSink,
    width: u32,
    height: u32,
    sequence: u64,
    live: bool,
}

impl GstCamera {
    /// Open the device and wait for it to start producing.
    pub fn open(device: Option<&str>) -> BoothResult<Self> {
        init_gstreamer()?;

        let source = match device {
            Some(path) => format!("v4l2src device={path}"),
            None => "autovideosrc".to_string(),
        };
        // drop=true max-buffers=1: the sink only ever holds the most
        // recent frame, which is all a still capture needs.
        let launch = format!(
            "{source} ! videoconvert ! video/x-raw,format=RGB ! appsink name=sink drop=true max-buffers=1 sync=false"
        );

        let element = gst::parse::launch(&launch).map_err(|e| {
            BoothError::device_unavailable(format!("Failed to build camera pipeline: {e}"))
        })?;

        let pipeline = element.dynamic_cast::<gst::Pipeline>().map_err(|_| {
            BoothError::device_unavailable("Launch string did not produce a pipeline")
        })?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| BoothError::device_unavailable("Camera pipeline has no appsink"))?
            .dynamic_cast::<gst_app::AppSink>()
            .map_err(|_| BoothError::device_unavailable("sink element is not an appsink"))?;

        pipeline.set_state(gst::State::Playing).map_err(|e| {
            BoothError::device_unavailable(format!("Failed to start camera: {e:?}"))
        })?;

        // Wait for the pipeline to actually reach Playing state.
        // GStreamer state changes are async; without this wait the device
        // may not be open yet when the first countdown starts.
        match pipeline.state(gst::ClockTime::from_seconds(10)) {
            (Ok(_), gst::State::Playing, _) => {}
            (Ok(_), state, _) => {
                tracing::warn!(?state, "Camera did not reach Playing state within timeout");
            }
            (Err(e), _, _) => {
                let _ = pipeline.set_state(gst::State::Null);
                return Err(BoothError::device_unavailable(format!(
                    "Camera failed to reach Playing state: {e:?}"
                )));
            }
        }

        let mut camera = Self {
            pipeline,
            appsink,
            width: 0,
            height: 0,
            sequence: 0,
            live: true,
        };

        // Pull one sample up front so the resolution is known and a broken
        // device fails the session open instead of the first shot.
        match camera.pull_frame() {
            Ok(probe) => {
                camera.width = probe.image.width();
                camera.height = probe.image.height();
            }
            Err(e) => {
                let _ = camera.pipeline.set_state(gst::State::Null);
                camera.live = false;
                return Err(BoothError::device_unavailable(format!(
                    "Camera opened but produced no frames: {e}"
                )));
            }
        }
        tracing::info!(
            width = camera.width,
            height = camera.height,
            "Camera producing frames"
        );

        Ok(camera)
    }

    fn pull_frame(&mut self) -> BoothResult<VideoFrame> {
        let sample = self
            .appsink
            .try_pull_sample(gst::ClockTime::from_seconds(5))
            .ok_or_else(|| BoothError::capture("camera produced no frame within 5s"))?;

        let caps = sample
            .caps()
            .ok_or_else(|| BoothError::capture("camera sample has no caps"))?;
        let structure = caps
            .structure(0)
            .ok_or_else(|| BoothError::capture("camera caps have no structure"))?;
        let width = structure
            .get::<i32>("width")
            .map_err(|e| BoothError::capture(format!("camera caps missing width: {e}")))?
            as u32;
        let height = structure
            .get::<i32>("height")
            .map_err(|e| BoothError::capture(format!("camera caps missing height: {e}")))?
            as u32;

        let buffer = sample
            .buffer()
            .ok_or_else(|| BoothError::capture("camera sample has no buffer"))?;
        let map = buffer
            .map_readable()
            .map_err(|e| BoothError::capture(format!("camera buffer not readable: {e}")))?;

        self.sequence += 1;
        let image = rgb_image_from_raw(width, height, map.as_slice())?;
        Ok(VideoFrame {
            sequence: self.sequence,
            image,
        })
    }
}

/// Build an `RgbImage` from raw sink bytes, compensating for row stride
/// padding.
fn rgb_image_from_raw(width: u32, height: u32, data: &[u8]) -> BoothResult<RgbImage> {
    let tight = (width as usize) * (height as usize) * 3;
    if data.len() == tight {
        return RgbImage::from_raw(width, height, data.to_vec())
            .ok_or_else(|| BoothError::capture("camera buffer shorter than caps dimensions"));
    }

    // Rows are padded: copy row by row using the actual stride.
    let stride = data.len() / height.max(1) as usize;
    let row_bytes = (width as usize) * 3;
    if stride < row_bytes {
        return Err(BoothError::capture(format!(
            "camera buffer too small: stride {stride} < row {row_bytes}"
        )));
    }
    let mut pixels = Vec::with_capacity(tight);
    for row in 0..height as usize {
        let start = row * stride;
        pixels.extend_from_slice(&data[start..start + row_bytes]);
    }
    RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| BoothError::capture("camera buffer did not fill the image"))
}

impl CameraStream for GstCamera {
    fn current_frame(&mut self) -> BoothResult<VideoFrame> {
        if !self.live {
            return Err(BoothError::capture("camera stream is stopped"));
        }
        self.pull_frame()
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn is_live(&self) -> bool {
        self.live && !self.appsink.is_eos()
    }

    fn stop(&mut self) -> BoothResult<()> {
        if !self.live {
            return Ok(());
        }
        self.live = false;
        self.pipeline.set_state(gst::State::Null).map_err(|e| {
            BoothError::capture(format!("Failed to stop camera pipeline: {e:?}"))
        })?;
        Ok(())
    }

    fn name(&self) -> &str {
        "gstreamer"
    }
}

impl Drop for GstCamera {
    fn drop(&mut self) {
        if self.live {
            let _ = self.pipeline.set_state(gst::State::Null);
        }
    }
}

fn init_gstreamer() -> BoothResult<()> {
    static GST_INIT: OnceLock<Result<(), String>> = OnceLock::new();
    let init_res = GST_INIT.get_or_init(|| gst::init().map_err(|e| e.to_string()));
    match init_res {
        Ok(()) => Ok(()),
        Err(e) => Err(BoothError::device_unavailable(format!(
            "Failed to initialize GStreamer: {e}"
        ))),
    }
}

/// Availability probe for the check command.
pub fn gstreamer_status() -> BackendStatus {
    match init_gstreamer() {
        Ok(()) => BackendStatus {
            name: "gstreamer",
            available: true,
            detail: gst::version_string().to_string(),
        },
        Err(e) => BackendStatus {
            name: "gstreamer",
            available: false,
            detail: e.to_string(),
        },
    }
}
