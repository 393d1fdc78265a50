//! Recorder configuration
//!
//! Configuration is a plain record passed at construction; nothing here
//! alters the state-machine topology. It can also be stored as YAML in
//! the user's config directory (default: ~/.config/ripple/config.yaml).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::timeline::TimelineScale;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Capture and playback settings
    pub recording: RecordingConfig,
    /// Timeline layout settings
    pub timeline: TimelineConfig,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            recording: RecordingConfig::default(),
            timeline: TimelineConfig::default(),
        }
    }
}

impl RecorderConfig {
    /// Timeline pitch derived from the layout settings
    pub fn scale(&self) -> TimelineScale {
        TimelineScale::new(
            self.timeline.ms_per_line,
            self.timeline.gap_px,
            self.timeline.line_width_px,
        )
    }
}

/// Capture and playback configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Interval between engine status ticks in milliseconds
    pub progress_interval_ms: u64,
    /// Recording is force-stopped once the take reaches this duration
    pub max_duration_ms: u64,
    /// Amplitude floor in dB; metering samples are clamped to [floor, 0]
    pub min_power_db: f32,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            progress_interval_ms: 50,
            max_duration_ms: 120_000, // 2 minutes
            min_power_db: -50.0,
        }
    }
}

/// Timeline layout configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Time quantum represented by one amplitude line
    pub ms_per_line: u64,
    /// Gap between amplitude lines in pixels
    pub gap_px: f32,
    /// Width of one amplitude line in pixels
    pub line_width_px: f32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            ms_per_line: 250,
            gap_px: 16.0,
            line_width_px: 1.0,
        }
    }
}

/// Get the default config file path
///
/// Returns: ~/.config/ripple/config.yaml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join("ripple")
        .join("config.yaml")
}

/// Load configuration from a YAML file
///
/// If the file doesn't exist, returns default config.
/// If the file exists but is invalid, logs a warning and returns default config.
pub fn load_config(path: &Path) -> RecorderConfig {
    if !path.exists() {
        log::info!("load_config: {:?} doesn't exist, using defaults", path);
        return RecorderConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<RecorderConfig>(&contents) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("load_config: Failed to parse config: {}, using defaults", e);
                RecorderConfig::default()
            }
        },
        Err(e) => {
            log::warn!("load_config: Failed to read config file: {}, using defaults", e);
            RecorderConfig::default()
        }
    }
}

/// Save configuration to a YAML file
///
/// Creates parent directories if they don't exist.
pub fn save_config(config: &RecorderConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config")?;
    std::fs::write(path, yaml).with_context(|| format!("Failed to write config to {:?}", path))?;
    Ok(())
}
