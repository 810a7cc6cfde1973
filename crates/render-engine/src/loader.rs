//! Asset and frame decoding.
//!
//! Images reach the renderer from two kinds of sources: files on disk
//! (decorative assets, compose inputs) and inline `data:` URIs. Both
//! decode to RGBA; the compositor never sees encoded bytes.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use snapbooth_common::error::{BoothError, BoothResult};
use snapbooth_session_model::{decode_data_uri, is_data_uri, CapturedFrame, CollageLayout};

/// Where an image comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// A file on disk.
    Path(PathBuf),

    /// An inline `data:<mime>;base64,...` URI.
    DataUri(String),
}

impl ImageSource {
    /// Interpret a CLI-style string: `data:` URIs stay inline, everything
    /// else is a path.
    pub fn infer(s: &str) -> Self {
        if is_data_uri(s) {
            Self::DataUri(s.to_string())
        } else {
            Self::Path(PathBuf::from(s))
        }
    }

    /// Short label for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Path(p) => p.display().to_string(),
            Self::DataUri(u) => format!("data URI ({} bytes)", u.len()),
        }
    }
}

/// Decode encoded image bytes (PNG, JPEG, ...) into RGBA.
pub fn decode_bytes(bytes: &[u8]) -> BoothResult<RgbaImage> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| BoothError::load(format!("image decode failed: {e}")))?;
    Ok(img.to_rgba8())
}

/// Decode one captured frame.
pub fn decode_frame(frame: &CapturedFrame) -> BoothResult<RgbaImage> {
    decode_bytes(&frame.jpeg)
}

/// Load and decode an image from any source.
pub async fn load(source: &ImageSource) -> BoothResult<RgbaImage> {
    match source {
        ImageSource::Path(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| BoothError::load(format!("failed to read {}: {e}", path.display())))?;
            decode_bytes(&bytes)
        }
        ImageSource::DataUri(uri) => {
            let payload = decode_data_uri(uri)
                .map_err(|e| BoothError::load(format!("bad data URI: {e}")))?;
            decode_bytes(&payload.bytes)
        }
    }
}

/// Decorative assets resolved for one render.
#[derive(Debug, Default)]
pub struct LayoutAssets {
    /// Background image stretched behind the grid.
    pub background: Option<RgbaImage>,

    /// Frame drawn over each photo cell.
    pub frame_overlay: Option<RgbaImage>,
}

/// Load the optional decorative assets named by a layout.
///
/// A missing or undecodable asset is not fatal: the collage renders
/// without it and the degradation is logged.
pub async fn load_layout_assets(layout: &CollageLayout) -> LayoutAssets {
    LayoutAssets {
        background: load_optional(layout.background_image.as_deref(), "background").await,
        frame_overlay: load_optional(layout.frame_overlay.as_deref(), "frame overlay").await,
    }
}

async fn load_optional(path: Option<&Path>, label: &str) -> Option<RgbaImage> {
    let path = path?;
    match load(&ImageSource::Path(path.to_path_buf())).await {
        Ok(img) => {
            tracing::debug!(
                asset = label,
                path = %path.display(),
                width = img.width(),
                height = img.height(),
                "Loaded asset"
            );
            Some(img)
        }
        Err(e) => {
            tracing::warn!(
                asset = label,
                path = %path.display(),
                error = %e,
                "Asset unavailable, rendering without it"
            );
            None
        }
    }
}
