//! services/enrollment/src/flow/enrollment.rs
//!
//! The enrollment session: student lookup plus assembly of the final
//! enrollment payload from the orchestrator's capture records. All state is
//! session-local and discarded with the session.

use crate::error::EnrollmentError;
use crate::flow::orchestrator::CaptureOrchestrator;
use chrono::Utc;
use enrollment_core::domain::{EnrollmentRecord, StudentInfo};
use enrollment_core::ports::StudentDirectory;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// One enrollment session's view state.
pub struct EnrollmentSession {
    directory: Arc<dyn StudentDirectory>,
    student: Option<StudentInfo>,
}

impl EnrollmentSession {
    pub fn new(directory: Arc<dyn StudentDirectory>) -> Self {
        Self {
            directory,
            student: None,
        }
    }

    /// Looks up a student record. An empty or whitespace-only query performs
    /// no lookup at all and leaves the session unchanged.
    pub async fn search(&mut self, query: &str) -> Result<Option<&StudentInfo>, EnrollmentError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let found = self.directory.lookup(query).await?;
        if let Some(student) = &found {
            info!(matric_no = %student.matric_no, "student record found");
        }
        self.student = found;
        Ok(self.student.as_ref())
    }

    pub fn student(&self) -> Option<&StudentInfo> {
        self.student.as_ref()
    }

    /// Clears the looked-up student, as the search form's reset does.
    pub fn clear(&mut self) {
        self.student = None;
    }

    /// Assembles the enrollment payload. Requires a found student and at
    /// least one captured finger.
    pub fn finalize(
        &self,
        orchestrator: &CaptureOrchestrator,
    ) -> Result<EnrollmentRecord, EnrollmentError> {
        let student_info = self
            .student
            .clone()
            .ok_or_else(|| EnrollmentError::InvalidState("no student selected".to_string()))?;

        let fingerprints = orchestrator.captured().to_vec();
        if fingerprints.is_empty() {
            return Err(EnrollmentError::InvalidState(
                "at least one fingerprint must be captured".to_string(),
            ));
        }

        let record = EnrollmentRecord {
            id: Uuid::new_v4(),
            student_info,
            fingerprints,
            device_info: orchestrator.device_info().cloned(),
            enrolled_at: Utc::now(),
        };
        info!(
            record = %record.id,
            fingers = record.fingerprints.len(),
            "enrollment payload assembled"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::directory::MockDirectoryAdapter;
    use crate::adapters::policy::FixedOutcomes;
    use crate::adapters::scanner::{MockScannerAdapter, ScannerDelays};
    use enrollment_core::domain::CaptureOptions;
    use std::time::Duration;

    fn session() -> EnrollmentSession {
        EnrollmentSession::new(Arc::new(MockDirectoryAdapter::new(Duration::ZERO)))
    }

    async fn ready_orchestrator() -> CaptureOrchestrator {
        let scanner = MockScannerAdapter::new(
            ScannerDelays::none(),
            Arc::new(FixedOutcomes::new(75, true, 90)),
        );
        let mut orch = CaptureOrchestrator::new(
            Arc::new(scanner),
            CaptureOptions::default(),
            "FS80H",
            false,
        );
        orch.start().await.expect("start");
        orch
    }

    #[tokio::test]
    async fn empty_query_performs_no_lookup() {
        let mut session = session();
        assert!(session.search("").await.expect("search").is_none());
        assert!(session.search("   ").await.expect("search").is_none());
        assert!(session.student().is_none());
    }

    #[tokio::test]
    async fn non_empty_query_finds_the_record() {
        let mut session = session();
        let student = session
            .search("EKSU/2021/CS/001")
            .await
            .expect("search")
            .expect("record")
            .clone();
        assert_eq!(student.full_name, "Adebola Johnson Taiwo");
        assert_eq!(session.student().map(|s| s.matric_no.as_str()),
            Some("EKSU/2021/CS/001"));
    }

    #[tokio::test]
    async fn finalize_requires_a_student() {
        let session = session();
        let orch = ready_orchestrator().await;
        let err = session.finalize(&orch).expect_err("no student");
        assert!(matches!(err, EnrollmentError::InvalidState(_)));
    }

    #[tokio::test]
    async fn finalize_requires_at_least_one_finger() {
        let mut session = session();
        session.search("EKSU/2021/CS/001").await.expect("search");
        let orch = ready_orchestrator().await;
        let err = session.finalize(&orch).expect_err("no fingers");
        assert!(matches!(err, EnrollmentError::InvalidState(_)));
    }

    #[tokio::test]
    async fn finalize_assembles_the_payload() {
        let mut session = session();
        session.search("EKSU/2021/CS/001").await.expect("search");

        let mut orch = ready_orchestrator().await;
        orch.capture_next().await.expect("capture");

        let record = session.finalize(&orch).expect("finalize");
        assert_eq!(record.student_info.matric_no, "EKSU/2021/CS/001");
        assert_eq!(record.fingerprints.len(), 1);
        assert!(record.device_info.is_some());
    }

    #[tokio::test]
    async fn clear_resets_the_session() {
        let mut session = session();
        session.search("EKSU/2021/CS/001").await.expect("search");
        session.clear();
        assert!(session.student().is_none());
    }
}
