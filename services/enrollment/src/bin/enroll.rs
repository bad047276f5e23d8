//! services/enrollment/src/bin/enroll.rs
//!
//! Runs one complete enrollment session against the simulated adapters:
//! student lookup, scanner startup, capture of all ten fingers, payload
//! assembly and a single verification request.

use enrollment_lib::{
    adapters::{MockDirectoryAdapter, MockScannerAdapter, MockVerifierAdapter, RandomOutcomes,
        ScannerDelays},
    config::Config,
    error::EnrollmentError,
    flow::{CaptureOrchestrator, DeviceStatus, EnrollmentSession, VerificationFlow},
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), EnrollmentError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting enrollment session...");

    // --- 2. Initialize Service Adapters ---
    let policy = Arc::new(RandomOutcomes);
    let delays = if config.mock_delays {
        ScannerDelays::standard()
    } else {
        ScannerDelays::none()
    };
    let lookup_delay = if config.mock_delays {
        Duration::from_millis(1500)
    } else {
        Duration::ZERO
    };
    let verify_delay = if config.mock_delays {
        Duration::from_millis(2000)
    } else {
        Duration::ZERO
    };

    let scanner = Arc::new(MockScannerAdapter::new(delays, policy.clone()));
    let directory = Arc::new(MockDirectoryAdapter::new(lookup_delay));
    let verifier = Arc::new(MockVerifierAdapter::new(verify_delay, policy));

    // --- 3. Look Up the Student ---
    let mut session = EnrollmentSession::new(directory);
    let query = "EKSU/2021/CS/001";
    match session.search(query).await? {
        Some(student) => info!(name = %student.full_name, "student found"),
        None => {
            error!(%query, "no student record matched");
            return Ok(());
        }
    }

    // --- 4. Start the Scanner & Capture All Fingers ---
    let mut orchestrator = CaptureOrchestrator::new(
        scanner,
        config.capture_options(),
        config.scanner_model.clone(),
        config.enforce_quality_threshold,
    );
    orchestrator.start().await?;

    if orchestrator.device_status() != DeviceStatus::Connected {
        error!("no scanner connected; aborting enrollment");
        orchestrator.shutdown().await;
        return Ok(());
    }
    if let Some(device) = orchestrator.device_info() {
        info!(model = %device.model, serial = %device.serial_number, "scanner connected");
    }

    while let Some(finger) = orchestrator.next_finger() {
        info!(%finger, "place finger on the scanner");
        match orchestrator.capture_next().await {
            Ok(record) => info!(%finger, quality = record.quality, "captured"),
            Err(err) => {
                // No automatic retry; every failure is surfaced to the
                // operator and ends the session.
                error!(%finger, %err, "capture failed");
                orchestrator.shutdown().await;
                return Err(err);
            }
        }
    }

    // --- 5. Assemble the Enrollment Payload ---
    let record = session.finalize(&orchestrator)?;
    let payload = serde_json::to_string_pretty(&record)
        .map_err(|e| EnrollmentError::Internal(e.to_string()))?;
    info!(record = %record.id, "enrollment complete");
    println!("{payload}");

    // --- 6. Run One Verification Request ---
    let verification = VerificationFlow::new(verifier);
    if let Some(result) = verification.verify(query).await? {
        if result.verified {
            info!(confidence = result.confidence, "identity verified");
        } else {
            warn!(confidence = result.confidence, "identity not verified");
        }
    }

    orchestrator.shutdown().await;
    Ok(())
}
