//! services/enrollment/src/adapters/scanner.rs
//!
//! This module contains the simulated scanner adapter. It implements the
//! `ScannerDevice` port from the `core` crate with timed delays standing in
//! for driver calls; a real driver adapter would replace the sleeps while
//! keeping the same contract and error taxonomy.

use crate::adapters::policy::OutcomePolicy;
use async_trait::async_trait;
use enrollment_core::domain::{CaptureOptions, DeviceInfo, FingerprintImage, FingerprintTemplate};
use enrollment_core::ports::{ScannerDevice, ScannerError, ScannerResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

/// Mock image geometry, matching what the FS80H reports.
const IMAGE_WIDTH: u32 = 256;
const IMAGE_HEIGHT: u32 = 288;
const IMAGE_RESOLUTION: u32 = 500;
const IMAGE_BYTES: usize = 1024;
const TEMPLATE_BYTES: usize = 512;

/// Simulated latency for each scanner operation.
#[derive(Debug, Clone)]
pub struct ScannerDelays {
    pub initialize: Duration,
    pub enumerate: Duration,
    pub capture: Duration,
    pub extract: Duration,
    pub close: Duration,
}

impl ScannerDelays {
    /// The timings a physical FS80H session roughly exhibits.
    pub fn standard() -> Self {
        Self {
            initialize: Duration::from_millis(1500),
            enumerate: Duration::from_millis(500),
            capture: Duration::from_millis(2000),
            extract: Duration::from_millis(1000),
            close: Duration::from_millis(100),
        }
    }

    /// Zero delays everywhere. Used by tests and fast local runs.
    pub fn none() -> Self {
        Self {
            initialize: Duration::ZERO,
            enumerate: Duration::ZERO,
            capture: Duration::ZERO,
            extract: Duration::ZERO,
            close: Duration::ZERO,
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    initialized: bool,
    sessions_opened: u32,
}

/// An adapter that implements the `ScannerDevice` port with a pure
/// simulation.
pub struct MockScannerAdapter {
    delays: ScannerDelays,
    policy: Arc<dyn OutcomePolicy>,
    state: Mutex<MockState>,
    // Fault injection knobs for tests.
    host_available: bool,
    devices_attached: bool,
    fail_capture: bool,
    fail_extraction: bool,
}

impl MockScannerAdapter {
    /// Creates a new adapter with the given delays and outcome policy.
    pub fn new(delays: ScannerDelays, policy: Arc<dyn OutcomePolicy>) -> Self {
        Self {
            delays,
            policy,
            state: Mutex::new(MockState::default()),
            host_available: true,
            devices_attached: true,
            fail_capture: false,
            fail_extraction: false,
        }
    }

    /// Simulates a host without any scanner runtime; `initialize` will fail
    /// with `NotAvailable`.
    pub fn with_unavailable_host(mut self) -> Self {
        self.host_available = false;
        self
    }

    /// Simulates a runtime with no scanner plugged in; `list_devices`
    /// returns an empty list.
    pub fn with_no_devices(mut self) -> Self {
        self.devices_attached = false;
        self
    }

    /// Forces every `capture_image` call to fail.
    pub fn with_failing_capture(mut self) -> Self {
        self.fail_capture = true;
        self
    }

    /// Forces every `extract_template` call to fail.
    pub fn with_failing_extraction(mut self) -> Self {
        self.fail_extraction = true;
        self
    }

    /// Number of distinct sessions opened so far. Exposed so tests can
    /// assert the idempotence of `initialize`.
    pub async fn sessions_opened(&self) -> u32 {
        self.state.lock().await.sessions_opened
    }

    async fn require_initialized(&self) -> ScannerResult<()> {
        if self.state.lock().await.initialized {
            Ok(())
        } else {
            Err(ScannerError::NotInitialized)
        }
    }
}

#[async_trait]
impl ScannerDevice for MockScannerAdapter {
    async fn initialize(&self) -> ScannerResult<()> {
        if !self.host_available {
            return Err(ScannerError::NotAvailable);
        }

        {
            let state = self.state.lock().await;
            if state.initialized {
                // Already have a session; do not open a second one.
                debug!("initialize() called on an initialized scanner; keeping the session");
                return Ok(());
            }
        }

        sleep(self.delays.initialize).await;

        let mut state = self.state.lock().await;
        state.initialized = true;
        state.sessions_opened += 1;
        debug!(sessions = state.sessions_opened, "scanner session opened");
        Ok(())
    }

    async fn list_devices(&self) -> ScannerResult<Vec<DeviceInfo>> {
        self.require_initialized().await?;
        sleep(self.delays.enumerate).await;

        if !self.devices_attached {
            return Ok(Vec::new());
        }

        Ok(vec![DeviceInfo {
            id: "mock-fs80h-001".to_string(),
            name: "Futronic FS80H Scanner".to_string(),
            vendor: "Futronic".to_string(),
            model: "FS80H".to_string(),
            serial_number: "MOCK-001".to_string(),
        }])
    }

    async fn capture_image(&self, options: &CaptureOptions) -> ScannerResult<FingerprintImage> {
        self.require_initialized().await?;

        if self.fail_capture {
            return Err(ScannerError::CaptureFailed(
                "simulated capture fault".to_string(),
            ));
        }

        // The sleep stands in for waiting on the sensor; the surrounding
        // timeout is part of the contract, not the simulation.
        timeout(options.timeout, sleep(self.delays.capture))
            .await
            .map_err(|_| ScannerError::CaptureTimeout)?;

        Ok(FingerprintImage {
            data: vec![0; IMAGE_BYTES],
            width: IMAGE_WIDTH,
            height: IMAGE_HEIGHT,
            resolution: IMAGE_RESOLUTION,
            quality: self.policy.image_quality().min(100),
        })
    }

    async fn extract_template(
        &self,
        image: &FingerprintImage,
    ) -> ScannerResult<FingerprintTemplate> {
        self.require_initialized().await?;

        if image.data.is_empty() {
            return Err(ScannerError::InvalidImage);
        }
        if self.fail_extraction {
            return Err(ScannerError::ExtractionFailed(
                "simulated extraction fault".to_string(),
            ));
        }

        sleep(self.delays.extract).await;

        // Template quality tracks image quality with a small bonus, capped
        // at 100.
        let quality = image.quality.saturating_add(10).min(100);
        Ok(FingerprintTemplate {
            data: vec![0; TEMPLATE_BYTES],
            quality,
        })
    }

    async fn close(&self) {
        {
            let state = self.state.lock().await;
            if !state.initialized {
                warn!("close() called on an uninitialized scanner; nothing to release");
                return;
            }
        }
        sleep(self.delays.close).await;
        self.state.lock().await.initialized = false;
        debug!("scanner session closed");
    }
}
