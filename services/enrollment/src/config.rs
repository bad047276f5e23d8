//! services/enrollment/src/config.rs
//!
//! Defines the service's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The
//! `.env` file is used for local development.

use enrollment_core::domain::{CaptureMode, CaptureOptions};
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub log_level: Level,
    /// Upper bound for a single capture attempt.
    pub capture_timeout: Duration,
    /// Minimum acceptable quality score in [0, 100].
    pub quality_threshold: u8,
    pub capture_mode: CaptureMode,
    /// Whether a capture below `quality_threshold` is rejected. Off by
    /// default, matching the observed scanner behavior where the threshold
    /// is accepted but never checked.
    pub enforce_quality_threshold: bool,
    /// Model substring used to recognize the expected scanner among the
    /// enumerated devices.
    pub scanner_model: String,
    /// When false, all simulated adapter delays are zero. Useful for fast
    /// local runs.
    pub mock_delays: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for
    /// development, but this is skipped in test environments to ensure
    /// tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let capture_timeout_str =
            std::env::var("CAPTURE_TIMEOUT_MS").unwrap_or_else(|_| "30000".to_string());
        let capture_timeout_ms = capture_timeout_str.parse::<u64>().map_err(|e| {
            ConfigError::InvalidValue("CAPTURE_TIMEOUT_MS".to_string(), e.to_string())
        })?;

        let quality_threshold_str =
            std::env::var("QUALITY_THRESHOLD").unwrap_or_else(|_| "60".to_string());
        let quality_threshold = quality_threshold_str.parse::<u8>().map_err(|e| {
            ConfigError::InvalidValue("QUALITY_THRESHOLD".to_string(), e.to_string())
        })?;
        if quality_threshold > 100 {
            return Err(ConfigError::InvalidValue(
                "QUALITY_THRESHOLD".to_string(),
                format!("{} is outside the 0-100 range", quality_threshold),
            ));
        }

        let capture_mode_str =
            std::env::var("CAPTURE_MODE").unwrap_or_else(|_| "single".to_string());
        let capture_mode = match capture_mode_str.to_lowercase().as_str() {
            "single" => CaptureMode::Single,
            "multiple" => CaptureMode::Multiple,
            other => {
                return Err(ConfigError::InvalidValue(
                    "CAPTURE_MODE".to_string(),
                    format!("'{}' is not 'single' or 'multiple'", other),
                ))
            }
        };

        let enforce_quality_threshold = parse_bool("ENFORCE_QUALITY_THRESHOLD", false)?;
        let mock_delays = parse_bool("MOCK_DELAYS", true)?;

        let scanner_model =
            std::env::var("SCANNER_MODEL").unwrap_or_else(|_| "FS80H".to_string());

        Ok(Self {
            log_level,
            capture_timeout: Duration::from_millis(capture_timeout_ms),
            quality_threshold,
            capture_mode,
            enforce_quality_threshold,
            scanner_model,
            mock_delays,
        })
    }

    /// Derives the per-capture options handed to the scanner adapter.
    pub fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            timeout: self.capture_timeout,
            quality_threshold: self.quality_threshold,
            mode: self.capture_mode,
        }
    }
}

fn parse_bool(var: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(var) {
        Err(_) => Ok(default),
        Ok(raw) => match raw.to_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Ok(true),
            "0" | "false" | "off" | "no" => Ok(false),
            other => Err(ConfigError::InvalidValue(
                var.to_string(),
                format!("'{}' is not a boolean", other),
            )),
        },
    }
}
