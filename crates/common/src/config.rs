//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where session bundles are stored.
    pub sessions_dir: PathBuf,

    /// Default booth settings.
    pub booth: BoothDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default booth parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoothDefaults {
    /// Photos captured per session.
    pub photo_count: u32,

    /// Collage grid columns.
    pub grid_columns: u32,

    /// Countdown length before each shot (seconds).
    pub countdown_secs: u32,

    /// Countdown tick interval (milliseconds).
    pub tick_interval_ms: u64,

    /// Pixel gap between collage cells.
    pub gap_px: u32,

    /// Pixel padding around the collage grid.
    pub padding_px: u32,

    /// Collage background color (CSS-style hex, e.g. "#111").
    pub background_color: String,

    /// Optional background image stretched behind the grid.
    pub background_image: Option<PathBuf>,

    /// Optional decorative frame drawn over each photo.
    pub frame_overlay: Option<PathBuf>,

    /// JPEG quality for shots and the collage (1-100).
    pub jpeg_quality: u8,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "snapbooth=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sessions_dir: dirs_default_sessions(),
            booth: BoothDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for BoothDefaults {
    fn default() -> Self {
        Self {
            photo_count: 4,
            grid_columns: 2,
            countdown_secs: 3,
            tick_interval_ms: 1_000,
            gap_px: 20,
            padding_px: 40,
            background_color: "#111".to_string(),
            background_image: None,
            frame_overlay: None,
            jpeg_quality: 92,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("snapbooth").join("config.json")
}

/// Default sessions directory.
fn dirs_default_sessions() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("snapbooth").join("sessions")
}
