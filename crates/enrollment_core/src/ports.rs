//! crates/enrollment_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the enrollment system's core
//! logic. These traits form the boundary of the hexagonal architecture,
//! allowing the core to stay independent of the concrete scanner driver and
//! of the backing directory (today both are mocks; a real driver implements
//! the same contract).

use async_trait::async_trait;
use crate::domain::{
    CaptureOptions, DeviceInfo, FingerprintImage, FingerprintTemplate, StudentInfo,
    VerificationResult,
};

//=========================================================================================
// Scanner Error Taxonomy
//=========================================================================================

/// Errors a scanner adapter may surface. A real driver maps its native error
/// codes onto this same taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    /// No runtime host for the driver is present at all.
    #[error("Scanner runtime is not available on this host")]
    NotAvailable,
    /// An operation was attempted before `initialize()`.
    #[error("Scanner not initialized. Call initialize() first")]
    NotInitialized,
    /// The driver returned something structurally invalid.
    #[error("Invalid response from scanner: {0}")]
    InvalidResponse(String),
    /// The captured image was malformed or empty.
    #[error("Invalid fingerprint image")]
    InvalidImage,
    /// The extracted template was malformed or empty.
    #[error("Invalid fingerprint template")]
    InvalidTemplate,
    /// No image was produced within the configured timeout.
    #[error("Fingerprint capture timed out")]
    CaptureTimeout,
    #[error("Fingerprint capture failed: {0}")]
    CaptureFailed(String),
    #[error("Template extraction failed: {0}")]
    ExtractionFailed(String),
}

/// A convenience type alias for `Result<T, ScannerError>`.
pub type ScannerResult<T> = Result<T, ScannerError>;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for the non-scanner ports (directory, verifier).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The capture-device boundary.
///
/// Lifecycle: `initialize` establishes a session, `list_devices` enumerates
/// attached scanners, `capture_image`/`extract_template` do the work, and
/// `close` releases the session. `initialize` is idempotent: calling it twice
/// without an intervening `close` must not open a second session.
#[async_trait]
pub trait ScannerDevice: Send + Sync {
    /// Establishes a driver session. Fails with `ScannerError::NotAvailable`
    /// when no runtime host is present.
    async fn initialize(&self) -> ScannerResult<()>;

    /// Enumerates attached scanners. An empty list signals "disconnected".
    async fn list_devices(&self) -> ScannerResult<Vec<DeviceInfo>>;

    /// Suspends until an image is produced or `options.timeout` elapses.
    async fn capture_image(&self, options: &CaptureOptions) -> ScannerResult<FingerprintImage>;

    /// Derives a fixed-size feature template with a quality score in [0, 100].
    async fn extract_template(
        &self,
        image: &FingerprintImage,
    ) -> ScannerResult<FingerprintTemplate>;

    /// Releases the session. Idempotent and infallible.
    async fn close(&self);
}

/// Student-record lookup keyed on a free-text query (matric number or JAMB
/// registration number). `Ok(None)` means no record matched.
#[async_trait]
pub trait StudentDirectory: Send + Sync {
    async fn lookup(&self, query: &str) -> PortResult<Option<StudentInfo>>;
}

/// Identity verification against previously enrolled biometric data.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, query: &str) -> PortResult<VerificationResult>;
}
