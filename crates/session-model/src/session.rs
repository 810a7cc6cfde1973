//! Session summary records.
//!
//! Each booth run writes a `session.json` next to the shots and the
//! finished collage, describing what was requested, what was actually
//! captured, and where the outputs landed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::layout::CollageLayout;

/// Top-level session record (`session.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Schema version.
    pub version: String,

    /// Unique session identifier (UUID).
    pub id: String,

    /// Camera backend that produced the shots.
    pub camera: String,

    /// Session start timestamp (ISO 8601).
    pub started_at: String,

    /// Session finish timestamp (ISO 8601).
    pub finished_at: String,

    /// Countdown length per shot (seconds).
    pub countdown_secs: u32,

    /// Countdown tick interval (milliseconds).
    pub tick_interval_ms: u64,

    /// Photos the user asked for.
    pub requested_photos: u32,

    /// Photos actually captured.
    pub captured_photos: u32,

    /// One entry per attempt, in order.
    pub attempts: Vec<AttemptRecord>,

    /// Collage configuration used for rendering.
    pub layout: CollageLayout,

    /// The rendered collage, when at least one shot succeeded.
    pub collage: Option<CollageRef>,
}

/// Outcome of one capture attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Zero-based attempt index.
    pub index: u32,

    /// Whether the attempt produced a photo.
    pub status: AttemptStatus,

    /// Error text for failed attempts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Relative path to the shot file for captured attempts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shot: Option<String>,
}

/// Attempt status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptStatus {
    Captured,
    Failed,
}

/// Reference to the rendered collage file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollageRef {
    /// Relative path from the session root.
    pub path: String,

    /// Collage width in pixels.
    pub width: u32,

    /// Collage height in pixels.
    pub height: u32,
}

impl SessionRecord {
    /// Create a record for a session that just started.
    pub fn new(
        camera: impl Into<String>,
        started_at: impl Into<String>,
        requested_photos: u32,
        countdown_secs: u32,
        tick_interval_ms: u64,
        layout: CollageLayout,
    ) -> Self {
        Self {
            version: "1.0".to_string(),
            id: uuid_v4(),
            camera: camera.into(),
            started_at: started_at.into(),
            finished_at: String::new(),
            countdown_secs,
            tick_interval_ms,
            requested_photos,
            captured_photos: 0,
            attempts: vec![],
            layout,
            collage: None,
        }
    }

    /// Stamp the finish time with the current wall clock.
    pub fn finish(&mut self) {
        self.finished_at = chrono::Utc::now().to_rfc3339();
    }

    /// Load a record from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let path = path.as_ref().to_path_buf();
        let json = std::fs::read_to_string(&path).map_err(|e| RecordError::IoError {
            path: path.clone(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| RecordError::ParseError { path, source: e })
    }

    /// Save the record as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RecordError> {
        let path = path.as_ref().to_path_buf();
        let json = serde_json::to_string_pretty(self).map_err(|e| RecordError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        std::fs::write(&path, json).map_err(|e| RecordError::IoError { path, source: e })
    }
}

/// Errors that can occur when working with session records.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Generate a simple UUID v4 without external dependency.
fn uuid_v4() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!(
        "{:08x}-{:04x}-4{:03x}-{:04x}-{:012x}",
        (seed & 0xFFFFFFFF) as u32,
        ((seed >> 32) & 0xFFFF) as u16,
        ((seed >> 48) & 0x0FFF) as u16,
        (((seed >> 60) & 0x3F) | 0x80) as u16 | (((seed >> 66) & 0x3FF) as u16) << 6,
        (seed >> 76) & 0xFFFFFFFFFFFF,
    )
}
