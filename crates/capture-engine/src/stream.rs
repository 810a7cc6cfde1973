//! Camera stream abstraction.

use image::RgbImage;
use snapbooth_common::error::BoothResult;

/// One decoded video frame as delivered by a camera backend.
///
/// Frames arrive un-mirrored, exactly as the sensor sees the scene;
/// mirroring happens at capture time.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Monotonic frame counter, starting at 1.
    pub sequence: u64,

    /// Decoded RGB pixels.
    pub image: RgbImage,
}

/// A live video source.
///
/// Backends wrap physical devices (GStreamer) or synthesize frames
/// (test pattern). A booth session holds exactly one stream and releases
/// it exactly once.
pub trait CameraStream: Send {
    /// The most recent frame. Errors when the stream stopped producing.
    fn current_frame(&mut self) -> BoothResult<VideoFrame>;

    /// Native capture resolution.
    fn resolution(&self) -> (u32, u32);

    /// Whether the source is still delivering frames.
    fn is_live(&self) -> bool;

    /// Stop the stream and release the device.
    fn stop(&mut self) -> BoothResult<()>;

    /// Backend label for logs and session records.
    fn name(&self) -> &str;
}
