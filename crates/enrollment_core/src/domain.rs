//! crates/enrollment_core/src/domain.rs
//!
//! Defines the pure, core data structures for the enrollment system.
//! These structs are independent of any scanner driver or transport;
//! everything here is session-local and discarded when the session ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// The fixed ten-finger enumeration used during capture.
///
/// The ordinal order (right thumb through left little) is the order in which
/// fingers are captured; `CapturedFinger` records are appended in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Finger {
    RightThumb,
    RightIndex,
    RightMiddle,
    RightRing,
    RightLittle,
    LeftThumb,
    LeftIndex,
    LeftMiddle,
    LeftRing,
    LeftLittle,
}

impl Finger {
    /// All ten fingers in capture order.
    pub const ALL: [Finger; 10] = [
        Finger::RightThumb,
        Finger::RightIndex,
        Finger::RightMiddle,
        Finger::RightRing,
        Finger::RightLittle,
        Finger::LeftThumb,
        Finger::LeftIndex,
        Finger::LeftMiddle,
        Finger::LeftRing,
        Finger::LeftLittle,
    ];

    /// Human-readable label, as shown on enrollment progress views.
    pub fn label(&self) -> &'static str {
        match self {
            Finger::RightThumb => "Right Thumb",
            Finger::RightIndex => "Right Index",
            Finger::RightMiddle => "Right Middle",
            Finger::RightRing => "Right Ring",
            Finger::RightLittle => "Right Little",
            Finger::LeftThumb => "Left Thumb",
            Finger::LeftIndex => "Left Index",
            Finger::LeftMiddle => "Left Middle",
            Finger::LeftRing => "Left Ring",
            Finger::LeftLittle => "Left Little",
        }
    }

    /// Position of this finger in the fixed capture order.
    pub fn index(&self) -> usize {
        Finger::ALL
            .iter()
            .position(|f| f == self)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Finger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A student record as returned by the directory lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInfo {
    pub full_name: String,
    pub matric_no: String,
    pub jamb_reg_no: String,
    pub department: String,
    pub faculty: String,
}

/// A raw fingerprint image as produced by the scanner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Scan resolution in dots per inch.
    pub resolution: u32,
    /// Image quality score in [0, 100].
    pub quality: u8,
}

/// A fixed-size feature template derived from a fingerprint image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintTemplate {
    pub data: Vec<u8>,
    /// Template quality score in [0, 100].
    pub quality: u8,
}

impl FingerprintTemplate {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// One successfully captured finger within an enrollment session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedFinger {
    pub finger: Finger,
    pub image: FingerprintImage,
    pub template: FingerprintTemplate,
    pub quality: u8,
    pub captured_at: DateTime<Utc>,
}

/// Scanner identity as reported by the adapter. Advisory only; nothing ties
/// it to a physically connected device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub id: String,
    pub name: String,
    pub vendor: String,
    pub model: String,
    pub serial_number: String,
}

/// Capture acquisition mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureMode {
    Single,
    Multiple,
}

/// Options recognized by `ScannerDevice::capture_image`.
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    /// How long a capture may suspend before failing with `CaptureTimeout`.
    pub timeout: Duration,
    /// Minimum acceptable quality score in [0, 100].
    pub quality_threshold: u8,
    pub mode: CaptureMode,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(30_000),
            quality_threshold: 60,
            mode: CaptureMode::Single,
        }
    }
}

/// Outcome of an identity verification request.
///
/// Identity fields are present exactly when `verified` is true; the
/// confidence score is always present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub verified: bool,
    pub identity: Option<StudentInfo>,
    /// Match confidence in [0, 100].
    pub confidence: u8,
    pub verified_at: DateTime<Utc>,
}

/// The assembled enrollment payload. Not persisted anywhere; it exists only
/// to be handed to a future backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub id: Uuid,
    pub student_info: StudentInfo,
    pub fingerprints: Vec<CapturedFinger>,
    pub device_info: Option<DeviceInfo>,
    pub enrolled_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finger_order_is_right_hand_first() {
        assert_eq!(Finger::ALL.len(), 10);
        assert_eq!(Finger::ALL[0], Finger::RightThumb);
        assert_eq!(Finger::ALL[5], Finger::LeftThumb);
        assert_eq!(Finger::ALL[9], Finger::LeftLittle);
    }

    #[test]
    fn finger_index_matches_position() {
        for (i, finger) in Finger::ALL.iter().enumerate() {
            assert_eq!(finger.index(), i);
        }
    }

    #[test]
    fn finger_labels_are_human_readable() {
        assert_eq!(Finger::RightThumb.label(), "Right Thumb");
        assert_eq!(Finger::LeftLittle.to_string(), "Left Little");
    }

    #[test]
    fn default_capture_options() {
        let opts = CaptureOptions::default();
        assert_eq!(opts.timeout, Duration::from_millis(30_000));
        assert_eq!(opts.quality_threshold, 60);
        assert_eq!(opts.mode, CaptureMode::Single);
    }
}
