//! services/enrollment/src/adapters/directory.rs
//!
//! This module contains the simulated student-directory adapter. It
//! implements the `StudentDirectory` port from the `core` crate, returning a
//! canned record after a fixed lookup delay regardless of the query content.

use async_trait::async_trait;
use enrollment_core::domain::StudentInfo;
use enrollment_core::ports::{PortResult, StudentDirectory};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// The one student record the simulated directory knows about.
pub fn sample_student() -> StudentInfo {
    StudentInfo {
        full_name: "Adebola Johnson Taiwo".to_string(),
        matric_no: "EKSU/2021/CS/001".to_string(),
        jamb_reg_no: "12345678AB".to_string(),
        department: "Computer Science".to_string(),
        faculty: "Faculty of Science".to_string(),
    }
}

/// An adapter that implements the `StudentDirectory` port with a canned
/// record.
pub struct MockDirectoryAdapter {
    lookup_delay: Duration,
}

impl MockDirectoryAdapter {
    pub fn new(lookup_delay: Duration) -> Self {
        Self { lookup_delay }
    }
}

impl Default for MockDirectoryAdapter {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500))
    }
}

#[async_trait]
impl StudentDirectory for MockDirectoryAdapter {
    async fn lookup(&self, query: &str) -> PortResult<Option<StudentInfo>> {
        debug!(%query, "directory lookup");
        sleep(self.lookup_delay).await;
        // The simulation matches every query against the same record.
        Ok(Some(sample_student()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn any_query_returns_the_canned_record() {
        let directory = MockDirectoryAdapter::new(Duration::ZERO);
        let student = directory
            .lookup("EKSU/2021/CS/001")
            .await
            .expect("lookup")
            .expect("record");
        assert_eq!(student.matric_no, "EKSU/2021/CS/001");
        assert_eq!(student.full_name, "Adebola Johnson Taiwo");
    }
}
