//! services/enrollment/src/flow/verification.rs
//!
//! The verification view: resolves an identity query to a pass/fail result
//! through the `IdentityVerifier` port. Independent of the capture flow.

use crate::error::EnrollmentError;
use enrollment_core::domain::VerificationResult;
use enrollment_core::ports::IdentityVerifier;
use std::sync::Arc;
use tracing::info;

pub struct VerificationFlow {
    verifier: Arc<dyn IdentityVerifier>,
}

impl VerificationFlow {
    pub fn new(verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { verifier }
    }

    /// Runs one verification request. An empty query is a no-op, mirroring
    /// the search behavior.
    pub async fn verify(
        &self,
        query: &str,
    ) -> Result<Option<VerificationResult>, EnrollmentError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let result = self.verifier.verify(query).await?;
        info!(
            verified = result.verified,
            confidence = result.confidence,
            "verification resolved"
        );
        Ok(Some(result))
    }
}
