//! services/enrollment/src/error.rs
//!
//! Defines the primary error type for the enrollment service.

use crate::config::ConfigError;
use enrollment_core::ports::{PortError, ScannerError};

/// The primary error type for the `enrollment` service.
#[derive(Debug, thiserror::Error)]
pub enum EnrollmentError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from the scanner adapter.
    #[error("Scanner error: {0}")]
    Scanner(#[from] ScannerError),

    /// Represents an error from one of the non-scanner ports.
    #[error("Service port error: {0}")]
    Port(#[from] PortError),

    /// An operation was attempted in a state that does not permit it.
    #[error("Invalid capture state: {0}")]
    InvalidState(String),

    /// All ten fingers have already been captured in this session.
    #[error("Capture session is complete; all fingers have been recorded")]
    SessionComplete,

    /// The in-flight operation was cancelled via the session token.
    #[error("Capture was cancelled")]
    Cancelled,

    /// A template scored below the configured quality threshold.
    #[error("Capture quality {score} is below the threshold {threshold}")]
    QualityRejected { score: u8, threshold: u8 },

    /// Represents a standard Input/Output error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
