//! services/enrollment/src/flow/orchestrator.rs
//!
//! The capture orchestrator: sequences scanner-adapter calls for one
//! enrollment session and maps the results onto per-finger capture records.
//!
//! All session state lives in one explicit `ScannerState` value, so an
//! impossible combination (capturing while uninitialized, for instance)
//! cannot be represented. Every suspension point observes the session's
//! `CancellationToken`.

use crate::error::EnrollmentError;
use chrono::Utc;
use enrollment_core::domain::{
    CaptureOptions, CapturedFinger, DeviceInfo, Finger, FingerprintImage, FingerprintTemplate,
};
use enrollment_core::ports::ScannerDevice;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

/// The capture session's lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerState {
    /// No session yet; `start()` has not been called.
    Idle,
    /// `initialize()` is in flight.
    Initializing,
    /// Session established; a capture may begin if a device is connected.
    Ready,
    /// A capture + extraction pass is in flight.
    Capturing,
    /// Initialization failed; the session is unusable until `shutdown()`.
    Failed,
}

/// Whether a matching scanner was found during device enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    Disconnected,
    Connected,
}

/// Drives one fingerprint-capture session against a `ScannerDevice`.
pub struct CaptureOrchestrator {
    session_id: Uuid,
    scanner: Arc<dyn ScannerDevice>,
    options: CaptureOptions,
    scanner_model: String,
    enforce_quality_threshold: bool,
    state: ScannerState,
    device_status: DeviceStatus,
    device_info: Option<DeviceInfo>,
    captured: Vec<CapturedFinger>,
    cancel: CancellationToken,
}

impl CaptureOrchestrator {
    /// Creates an idle orchestrator. The scanner adapter is injected rather
    /// than discovered through any global side channel.
    pub fn new(
        scanner: Arc<dyn ScannerDevice>,
        options: CaptureOptions,
        scanner_model: impl Into<String>,
        enforce_quality_threshold: bool,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            scanner,
            options,
            scanner_model: scanner_model.into(),
            enforce_quality_threshold,
            state: ScannerState::Idle,
            device_status: DeviceStatus::Disconnected,
            device_info: None,
            captured: Vec::new(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn state(&self) -> ScannerState {
        self.state
    }

    pub fn device_status(&self) -> DeviceStatus {
        self.device_status
    }

    pub fn device_info(&self) -> Option<&DeviceInfo> {
        self.device_info.as_ref()
    }

    /// The records captured so far, in finger order.
    pub fn captured(&self) -> &[CapturedFinger] {
        &self.captured
    }

    /// The next finger eligible for capture, or `None` once all ten are
    /// recorded.
    pub fn next_finger(&self) -> Option<Finger> {
        Finger::ALL.get(self.captured.len()).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.captured.len() >= Finger::ALL.len()
    }

    /// A clone of the session's cancellation token, for cancelling an
    /// in-flight capture from outside. After a cancelled capture unwinds
    /// the session carries a fresh token, so re-fetch it before each
    /// attempt that should be cancellable.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Initializes the scanner session and runs the first device-status
    /// check. `Idle -> Initializing -> Ready`, or `Failed` on adapter error.
    pub async fn start(&mut self) -> Result<(), EnrollmentError> {
        if self.state != ScannerState::Idle {
            return Err(EnrollmentError::InvalidState(format!(
                "cannot start a session from the {:?} state",
                self.state
            )));
        }

        self.state = ScannerState::Initializing;
        if let Err(err) = self.scanner.initialize().await {
            self.state = ScannerState::Failed;
            return Err(err.into());
        }

        match self.refresh_device_status().await {
            Ok(()) => {
                self.state = ScannerState::Ready;
                info!(
                    session = %self.session_id,
                    status = ?self.device_status,
                    "capture session ready"
                );
                Ok(())
            }
            Err(err) => {
                self.state = ScannerState::Failed;
                Err(err)
            }
        }
    }

    /// Re-enumerates devices and updates the connection status. A device
    /// counts as connected when its model or name contains the configured
    /// scanner model string.
    pub async fn refresh_device_status(&mut self) -> Result<(), EnrollmentError> {
        let devices = self.scanner.list_devices().await?;
        let matching = devices.into_iter().find(|d| {
            d.model.contains(&self.scanner_model) || d.name.contains(&self.scanner_model)
        });

        match matching {
            Some(device) => {
                self.device_status = DeviceStatus::Connected;
                self.device_info = Some(device);
            }
            None => {
                warn!(session = %self.session_id, "no matching scanner attached");
                self.device_status = DeviceStatus::Disconnected;
                self.device_info = None;
            }
        }
        Ok(())
    }

    /// Captures the next finger in the fixed enumeration.
    ///
    /// Allowed only in `Ready` with a connected device. On success one
    /// record is appended and the next finger becomes eligible; on any
    /// adapter error the state returns to `Ready` and the error is passed
    /// to the caller. Once all ten fingers are recorded, further calls fail
    /// with `SessionComplete`.
    pub async fn capture_next(&mut self) -> Result<CapturedFinger, EnrollmentError> {
        let finger = self.next_finger().ok_or(EnrollmentError::SessionComplete)?;

        if self.state != ScannerState::Ready {
            return Err(EnrollmentError::InvalidState(format!(
                "cannot capture in the {:?} state",
                self.state
            )));
        }
        if self.device_status != DeviceStatus::Connected {
            return Err(EnrollmentError::InvalidState(
                "no scanner connected".to_string(),
            ));
        }

        self.state = ScannerState::Capturing;
        let result = self.run_capture().await;
        // Whatever happened, the session is ready for another attempt.
        self.state = ScannerState::Ready;
        let (image, template) = match result {
            Err(EnrollmentError::Cancelled) => {
                // A cancelled token stays cancelled forever; issue a fresh
                // one so the next attempt is not stillborn.
                self.cancel = CancellationToken::new();
                return Err(EnrollmentError::Cancelled);
            }
            other => other?,
        };

        if self.enforce_quality_threshold && template.quality < self.options.quality_threshold {
            warn!(
                session = %self.session_id,
                %finger,
                score = template.quality,
                threshold = self.options.quality_threshold,
                "capture rejected below quality threshold"
            );
            return Err(EnrollmentError::QualityRejected {
                score: template.quality,
                threshold: self.options.quality_threshold,
            });
        }

        let record = CapturedFinger {
            finger,
            quality: template.quality,
            image,
            template,
            captured_at: Utc::now(),
        };
        self.captured.push(record.clone());
        info!(
            session = %self.session_id,
            %finger,
            quality = record.quality,
            captured = self.captured.len(),
            "finger captured"
        );
        Ok(record)
    }

    /// The capture + extraction pass, with the cancellation token observed
    /// at each suspension point.
    async fn run_capture(
        &self,
    ) -> Result<(FingerprintImage, FingerprintTemplate), EnrollmentError> {
        let image = tokio::select! {
            _ = self.cancel.cancelled() => return Err(EnrollmentError::Cancelled),
            res = self.scanner.capture_image(&self.options) => res?,
        };

        let template = tokio::select! {
            _ = self.cancel.cancelled() => return Err(EnrollmentError::Cancelled),
            res = self.scanner.extract_template(&image) => res?,
        };

        Ok((image, template))
    }

    /// Discards all captured records so the finger sequence starts over.
    /// The scanner session itself is untouched.
    pub fn restart_capture(&mut self) {
        self.captured.clear();
    }

    /// Closes the scanner session and returns to `Idle`. Safe to call in
    /// any state.
    pub async fn shutdown(&mut self) {
        self.scanner.close().await;
        self.state = ScannerState::Idle;
        self.device_status = DeviceStatus::Disconnected;
        self.device_info = None;
        info!(session = %self.session_id, "capture session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::policy::FixedOutcomes;
    use crate::adapters::scanner::{MockScannerAdapter, ScannerDelays};
    use std::time::Duration;

    fn orchestrator_with(scanner: MockScannerAdapter, enforce: bool) -> CaptureOrchestrator {
        CaptureOrchestrator::new(Arc::new(scanner), CaptureOptions::default(), "FS80H", enforce)
    }

    fn fast_scanner(quality: u8) -> MockScannerAdapter {
        MockScannerAdapter::new(
            ScannerDelays::none(),
            Arc::new(FixedOutcomes::new(quality, true, 90)),
        )
    }

    #[tokio::test]
    async fn start_reaches_ready_with_connected_device() {
        let mut orch = orchestrator_with(fast_scanner(75), false);
        orch.start().await.expect("start");
        assert_eq!(orch.state(), ScannerState::Ready);
        assert_eq!(orch.device_status(), DeviceStatus::Connected);
        let info = orch.device_info().expect("device info");
        assert_eq!(info.model, "FS80H");
    }

    #[tokio::test]
    async fn start_with_no_devices_is_ready_but_disconnected() {
        let mut orch = orchestrator_with(fast_scanner(75).with_no_devices(), false);
        orch.start().await.expect("start");
        assert_eq!(orch.state(), ScannerState::Ready);
        assert_eq!(orch.device_status(), DeviceStatus::Disconnected);
        assert!(orch.device_info().is_none());

        // A disconnected scanner refuses captures.
        let err = orch.capture_next().await.expect_err("capture must fail");
        assert!(matches!(err, EnrollmentError::InvalidState(_)));
    }

    #[tokio::test]
    async fn start_with_unavailable_host_fails() {
        let mut orch = orchestrator_with(fast_scanner(75).with_unavailable_host(), false);
        let err = orch.start().await.expect_err("start must fail");
        assert!(matches!(
            err,
            EnrollmentError::Scanner(enrollment_core::ScannerError::NotAvailable)
        ));
        assert_eq!(orch.state(), ScannerState::Failed);
    }

    #[tokio::test]
    async fn capture_before_start_is_rejected() {
        let mut orch = orchestrator_with(fast_scanner(75), false);
        let err = orch.capture_next().await.expect_err("capture must fail");
        assert!(matches!(err, EnrollmentError::InvalidState(_)));
    }

    #[tokio::test]
    async fn first_capture_is_the_right_thumb() {
        let mut orch = orchestrator_with(fast_scanner(75), false);
        orch.start().await.expect("start");

        assert_eq!(orch.next_finger(), Some(Finger::RightThumb));
        let record = orch.capture_next().await.expect("capture");
        assert_eq!(record.finger, Finger::RightThumb);
        assert_eq!(orch.captured().len(), 1);
        assert_eq!(orch.next_finger(), Some(Finger::RightIndex));
        assert_eq!(orch.state(), ScannerState::Ready);
    }

    #[tokio::test]
    async fn session_never_records_more_than_ten_fingers() {
        let mut orch = orchestrator_with(fast_scanner(75), false);
        orch.start().await.expect("start");

        for _ in 0..Finger::ALL.len() {
            orch.capture_next().await.expect("capture");
        }
        assert!(orch.is_complete());
        assert_eq!(orch.captured().len(), 10);
        assert_eq!(orch.next_finger(), None);

        let err = orch.capture_next().await.expect_err("11th capture");
        assert!(matches!(err, EnrollmentError::SessionComplete));
        assert_eq!(orch.captured().len(), 10);
    }

    #[tokio::test]
    async fn quality_gating_rejects_low_scores_when_enforced() {
        // Image quality 30 -> template quality 40, below the default
        // threshold of 60.
        let mut orch = orchestrator_with(fast_scanner(30), true);
        orch.start().await.expect("start");

        let err = orch.capture_next().await.expect_err("low quality");
        assert!(matches!(
            err,
            EnrollmentError::QualityRejected {
                score: 40,
                threshold: 60
            }
        ));
        assert!(orch.captured().is_empty());
        assert_eq!(orch.state(), ScannerState::Ready);
    }

    #[tokio::test]
    async fn quality_gating_off_accepts_low_scores() {
        let mut orch = orchestrator_with(fast_scanner(30), false);
        orch.start().await.expect("start");
        let record = orch.capture_next().await.expect("capture");
        assert_eq!(record.quality, 40);
    }

    #[tokio::test]
    async fn adapter_failure_returns_state_to_ready() {
        let mut orch = orchestrator_with(fast_scanner(75).with_failing_capture(), false);
        orch.start().await.expect("start");

        let err = orch.capture_next().await.expect_err("capture fault");
        assert!(matches!(err, EnrollmentError::Scanner(_)));
        assert_eq!(orch.state(), ScannerState::Ready);
        assert!(orch.captured().is_empty());

        // The session stays usable for the next attempt.
        assert_eq!(orch.next_finger(), Some(Finger::RightThumb));
    }

    #[tokio::test]
    async fn cancellation_aborts_an_in_flight_capture() {
        let mut delays = ScannerDelays::none();
        delays.capture = Duration::from_millis(50);
        let scanner =
            MockScannerAdapter::new(delays, Arc::new(FixedOutcomes::new(75, true, 90)));
        let mut orch = orchestrator_with(scanner, false);
        orch.start().await.expect("start");

        orch.cancellation_token().cancel();
        let err = orch.capture_next().await.expect_err("cancelled");
        assert!(matches!(err, EnrollmentError::Cancelled));
        assert_eq!(orch.state(), ScannerState::Ready);
        assert!(orch.captured().is_empty());
    }

    #[tokio::test]
    async fn session_recovers_after_a_cancelled_capture() {
        let mut delays = ScannerDelays::none();
        delays.capture = Duration::from_millis(50);
        let scanner =
            MockScannerAdapter::new(delays, Arc::new(FixedOutcomes::new(75, true, 90)));
        let mut orch = orchestrator_with(scanner, false);
        orch.start().await.expect("start");

        orch.cancellation_token().cancel();
        let err = orch.capture_next().await.expect_err("cancelled");
        assert!(matches!(err, EnrollmentError::Cancelled));

        // The session carries a fresh token, so the next attempt succeeds.
        let record = orch
            .capture_next()
            .await
            .expect("capture after cancellation");
        assert_eq!(record.finger, Finger::RightThumb);
        assert_eq!(orch.captured().len(), 1);
        assert_eq!(orch.next_finger(), Some(Finger::RightIndex));
    }

    #[tokio::test]
    async fn restart_discards_captured_records() {
        let mut orch = orchestrator_with(fast_scanner(75), false);
        orch.start().await.expect("start");
        orch.capture_next().await.expect("capture");
        assert_eq!(orch.captured().len(), 1);

        orch.restart_capture();
        assert!(orch.captured().is_empty());
        assert_eq!(orch.next_finger(), Some(Finger::RightThumb));
    }

    #[tokio::test]
    async fn shutdown_resets_to_idle() {
        let mut orch = orchestrator_with(fast_scanner(75), false);
        orch.start().await.expect("start");
        orch.shutdown().await;
        assert_eq!(orch.state(), ScannerState::Idle);
        assert_eq!(orch.device_status(), DeviceStatus::Disconnected);
    }
}
