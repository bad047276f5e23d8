pub mod domain;
pub mod ports;

pub use domain::{
    CaptureMode, CaptureOptions, CapturedFinger, DeviceInfo, EnrollmentRecord, Finger,
    FingerprintImage, FingerprintTemplate, StudentInfo, VerificationResult,
};
pub use ports::{
    IdentityVerifier, PortError, PortResult, ScannerDevice, ScannerError, ScannerResult,
    StudentDirectory,
};
