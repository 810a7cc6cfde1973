//! Still-frame capture: sample, mirror, encode.

use image::codecs::jpeg::JpegEncoder;
use image::imageops;

use snapbooth_booth_core::FrameProducer;
use snapbooth_common::error::{BoothError, BoothResult};
use snapbooth_session_model::CapturedFrame;

use crate::session::CameraSession;
use crate::stream::CameraStream;

/// Capture one still photo from the stream's current frame.
///
/// The frame is mirrored horizontally before encoding so the photo
/// matches what the subject saw in the preview.
pub fn capture_still(
    stream: &mut dyn CameraStream,
    jpeg_quality: u8,
) -> BoothResult<CapturedFrame> {
    if !stream.is_live() {
        return Err(BoothError::capture(format!(
            "{} stream is no longer live",
            stream.name()
        )));
    }

    let frame = stream.current_frame()?;
    let mirrored = imageops::flip_horizontal(&frame.image);
    let (width, height) = mirrored.dimensions();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, jpeg_quality.clamp(1, 100))
        .encode_image(&mirrored)
        .map_err(|e| BoothError::capture(format!("JPEG encoding failed: {e}")))?;

    tracing::debug!(
        sequence = frame.sequence,
        width,
        height,
        bytes = jpeg.len(),
        "Captured still"
    );

    Ok(CapturedFrame::new(width, height, jpeg))
}

/// Frame producer backed by a live camera session.
///
/// This is the piece the sequence orchestrator drives: each countdown
/// that reaches zero calls [`FrameProducer::produce`] exactly once.
pub struct BoothCapturer<'a> {
    session: &'a mut CameraSession,
    jpeg_quality: u8,
}

impl<'a> BoothCapturer<'a> {
    pub fn new(session: &'a mut CameraSession, jpeg_quality: u8) -> Self {
        Self {
            session,
            jpeg_quality,
        }
    }
}

impl FrameProducer for BoothCapturer<'_> {
    fn produce(&mut self) -> BoothResult<CapturedFrame> {
        let stream = self.session.stream_mut()?;
        capture_still(stream, self.jpeg_quality)
    }
}
