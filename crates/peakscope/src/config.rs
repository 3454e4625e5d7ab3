//! Configuration file support for peakscope.
//!
//! peakscope data lives in a `.peakscope/` directory:
//! - `.peakscope/config.toml` - Configuration file
//! - `.peakscope/traces.jsonl` - Exported traces (default path)
//! - `.peakscope/logs/` - Log files, when file logging is enabled
//!
//! Config discovery searches for `.peakscope/config.toml` starting from the
//! current directory and walking up to parent directories.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use peakscope_shell::{MAX_INTERVAL, MIN_INTERVAL, clamp_interval, parse_sequence};
use serde::{Deserialize, Serialize};

/// The peakscope data directory name.
pub const PEAKSCOPE_DIR: &str = ".peakscope";
/// The config file name within the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Playback settings.
    pub playback: PlaybackConfig,
    /// Default input settings.
    pub input: InputConfig,
    /// Trace export settings.
    pub export: ExportConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Milliseconds between steps while playing.
    pub interval_ms: u64,
    /// Start playing as soon as a trace is loaded.
    pub autoplay: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            interval_ms: 800,
            autoplay: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    /// Sequence used when no input is given on the command line.
    pub default: String,
    /// Size of random rotated inputs.
    pub random_size: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            default: "8,9,0,1,2,3,4,5,6,7".to_string(),
            random_size: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Append every generated trace to the export file.
    pub enabled: bool,
    /// JSONL output path, relative to `.peakscope/` unless absolute.
    pub path: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from("traces.jsonl"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log to `.peakscope/logs/` instead of stderr.
    pub to_file: bool,
}

impl Config {
    /// Load configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Find and load configuration from current or parent directories.
    pub fn find_and_load() -> Result<Option<(Self, PathBuf)>> {
        let current = std::env::current_dir()?;
        Self::find_and_load_from(&current)
    }

    /// Find and load configuration starting from a specific directory.
    ///
    /// Looks for `.peakscope/config.toml` in the directory and its parents and
    /// returns the config with its `.peakscope` directory.
    pub fn find_and_load_from(start: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start.to_path_buf();

        loop {
            let data_dir = dir.join(PEAKSCOPE_DIR);
            let config_path = data_dir.join(CONFIG_FILE);
            if config_path.exists() {
                let config = Self::from_file(&config_path)?;
                return Ok(Some((config, data_dir)));
            }

            if !dir.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Playback interval as a duration, clamped to the allowed range.
    ///
    /// Out-of-range values are still reported by [`Config::validate`].
    pub fn interval(&self) -> Duration {
        clamp_interval(Duration::from_millis(self.playback.interval_ms))
    }

    /// Resolve the export path relative to the `.peakscope` directory.
    pub fn resolve_export_path(&self, data_dir: Option<&Path>) -> PathBuf {
        if self.export.path.is_absolute() {
            self.export.path.clone()
        } else if let Some(dir) = data_dir {
            dir.join(&self.export.path)
        } else {
            PathBuf::from(PEAKSCOPE_DIR).join(&self.export.path)
        }
    }

    /// Render the config as TOML, for `peakscope init`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// Configuration validation error.
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigValidationError {}

impl Config {
    /// Validate the configuration.
    ///
    /// Returns a list of validation errors if any are found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        let interval = Duration::from_millis(self.playback.interval_ms);
        if interval < MIN_INTERVAL || interval > MAX_INTERVAL {
            errors.push(ConfigValidationError {
                field: "playback.interval_ms".to_string(),
                message: format!(
                    "Interval {} ms is outside {}..={} ms.",
                    self.playback.interval_ms,
                    MIN_INTERVAL.as_millis(),
                    MAX_INTERVAL.as_millis()
                ),
            });
        }

        if let Err(e) = parse_sequence(&self.input.default) {
            errors.push(ConfigValidationError {
                field: "input.default".to_string(),
                message: e.to_string(),
            });
        }

        if self.input.random_size == 0 {
            errors.push(ConfigValidationError {
                field: "input.random_size".to_string(),
                message: "Random input size must be at least 1.".to_string(),
            });
        }

        if self.export.path.as_os_str().is_empty() {
            errors.push(ConfigValidationError {
                field: "export.path".to_string(),
                message: "Export path cannot be empty.".to_string(),
            });
        }

        errors
    }
}
