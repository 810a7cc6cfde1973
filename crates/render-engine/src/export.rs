//! Collage encoding and session output files.
//!
//! A finished booth run becomes a directory: one JPEG per shot, the
//! composed collage, and a `session.json` record. [`SessionBundle`]
//! owns that directory layout; nothing else writes into it.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::RgbaImage;

use snapbooth_booth_core::CollageRenderer;
use snapbooth_common::error::{BoothError, BoothResult};
use snapbooth_session_model::{CapturedFrame, SessionRecord};

use crate::compositor::{self, ResolvedLayout};
use crate::loader;

/// File name of the rendered collage inside a session directory.
pub const COLLAGE_FILE: &str = "photobooth.jpg";

/// File name of the session record inside a session directory.
pub const SESSION_FILE: &str = "session.json";

/// A rendered, encoded collage.
#[derive(Debug, Clone)]
pub struct CompositeResult {
    /// Canvas width in pixels.
    pub width: u32,

    /// Canvas height in pixels.
    pub height: u32,

    /// JPEG-encoded canvas.
    pub jpeg: Vec<u8>,
}

impl CompositeResult {
    /// The collage as an inline `data:` URI.
    pub fn data_uri(&self) -> String {
        format!("data:image/jpeg;base64,{}", BASE64.encode(&self.jpeg))
    }

    /// Write the JPEG bytes to `path`.
    pub async fn save(&self, path: &Path) -> BoothResult<()> {
        tokio::fs::write(path, &self.jpeg).await?;
        tracing::info!(path = %path.display(), bytes = self.jpeg.len(), "Saved collage");
        Ok(())
    }
}

/// JPEG-encode a composed canvas.
pub fn encode_collage(canvas: RgbaImage, jpeg_quality: u8) -> BoothResult<CompositeResult> {
    let (width, height) = canvas.dimensions();
    // JPEG has no alpha channel; the canvas is fully opaque anyway.
    let rgb = image::DynamicImage::ImageRgba8(canvas).into_rgb8();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, jpeg_quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| BoothError::composition(format!("collage JPEG encode failed: {e}")))?;
    Ok(CompositeResult {
        width,
        height,
        jpeg,
    })
}

/// Renders captured frames into a finished collage.
///
/// This is the rendering half the capture orchestrator hands its frames
/// to once the photo sequence is over.
pub struct CollageComposer {
    layout: ResolvedLayout,
    jpeg_quality: u8,
}

impl CollageComposer {
    pub fn new(layout: ResolvedLayout, jpeg_quality: u8) -> Self {
        Self {
            layout,
            jpeg_quality,
        }
    }
}

impl CollageRenderer for CollageComposer {
    type Output = CompositeResult;

    fn render(&mut self, frames: &[CapturedFrame]) -> BoothResult<CompositeResult> {
        let bitmaps = frames
            .iter()
            .map(loader::decode_frame)
            .collect::<BoothResult<Vec<_>>>()?;
        let canvas = compositor::render(&bitmaps, &self.layout)?;
        encode_collage(canvas, self.jpeg_quality)
    }
}

/// On-disk layout of one session's outputs.
#[derive(Debug, Clone)]
pub struct SessionBundle {
    root: PathBuf,
}

impl SessionBundle {
    /// Create `parent/name/` and return a bundle rooted there.
    pub fn create(parent: &Path, name: &str) -> BoothResult<Self> {
        let root = parent.join(name);
        std::fs::create_dir_all(&root)?;
        tracing::info!(path = %root.display(), "Created session directory");
        Ok(Self { root })
    }

    /// Session directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Shot file name for a zero-based attempt index (`shot-01.jpg`, ...).
    pub fn shot_file_name(index: u32) -> String {
        format!("shot-{:02}.jpg", index + 1)
    }

    /// Absolute path of the shot file for an attempt.
    pub fn shot_path(&self, index: u32) -> PathBuf {
        self.root.join(Self::shot_file_name(index))
    }

    /// Absolute path of the collage file.
    pub fn collage_path(&self) -> PathBuf {
        self.root.join(COLLAGE_FILE)
    }

    /// Absolute path of the session record.
    pub fn record_path(&self) -> PathBuf {
        self.root.join(SESSION_FILE)
    }

    /// Write one shot; returns the file name for the session record.
    pub async fn write_shot(&self, index: u32, frame: &CapturedFrame) -> BoothResult<String> {
        let name = Self::shot_file_name(index);
        tokio::fs::write(self.root.join(&name), &frame.jpeg).await?;
        tracing::debug!(
            shot = %name,
            width = frame.width,
            height = frame.height,
            "Saved shot"
        );
        Ok(name)
    }

    /// Write the collage JPEG into the bundle.
    pub async fn write_collage(&self, collage: &CompositeResult) -> BoothResult<PathBuf> {
        let path = self.collage_path();
        collage.save(&path).await?;
        Ok(path)
    }

    /// Write the session record into the bundle.
    pub fn write_record(&self, record: &SessionRecord) -> BoothResult<PathBuf> {
        let path = self.record_path();
        record
            .save(&path)
            .map_err(|e| BoothError::session(format!("failed to write session record: {e}")))?;
        Ok(path)
    }
}
