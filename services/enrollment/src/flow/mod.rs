pub mod enrollment;
pub mod orchestrator;
pub mod verification;

pub use enrollment::EnrollmentSession;
pub use orchestrator::{CaptureOrchestrator, DeviceStatus, ScannerState};
pub use verification::VerificationFlow;
