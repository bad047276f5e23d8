//! services/enrollment/src/adapters/verifier.rs
//!
//! This module contains the simulated identity-verification adapter. It
//! implements the `IdentityVerifier` port from the `core` crate; the verdict
//! comes from the injected outcome policy, not from a real match decision.

use crate::adapters::directory::sample_student;
use crate::adapters::policy::OutcomePolicy;
use async_trait::async_trait;
use chrono::Utc;
use enrollment_core::domain::VerificationResult;
use enrollment_core::ports::{IdentityVerifier, PortResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// An adapter that implements the `IdentityVerifier` port with a simulated
/// match decision.
pub struct MockVerifierAdapter {
    verify_delay: Duration,
    policy: Arc<dyn OutcomePolicy>,
}

impl MockVerifierAdapter {
    pub fn new(verify_delay: Duration, policy: Arc<dyn OutcomePolicy>) -> Self {
        Self {
            verify_delay,
            policy,
        }
    }
}

#[async_trait]
impl IdentityVerifier for MockVerifierAdapter {
    async fn verify(&self, query: &str) -> PortResult<VerificationResult> {
        debug!(%query, "verification request");
        sleep(self.verify_delay).await;

        let verified = self.policy.verification_verdict();
        let confidence = self.policy.confidence(verified).min(100);

        // Identity fields are only attached on the verified branch.
        let identity = verified.then(sample_student);

        Ok(VerificationResult {
            verified,
            identity,
            confidence,
            verified_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::policy::FixedOutcomes;

    #[tokio::test]
    async fn verified_result_carries_identity() {
        let verifier =
            MockVerifierAdapter::new(Duration::ZERO, Arc::new(FixedOutcomes::new(80, true, 92)));
        let result = verifier.verify("EKSU/2021/CS/001").await.expect("verify");
        assert!(result.verified);
        assert_eq!(result.confidence, 92);
        let identity = result.identity.expect("identity present when verified");
        assert_eq!(identity.matric_no, "EKSU/2021/CS/001");
    }

    #[tokio::test]
    async fn denied_result_has_no_identity_but_has_confidence() {
        let verifier =
            MockVerifierAdapter::new(Duration::ZERO, Arc::new(FixedOutcomes::new(80, false, 25)));
        let result = verifier.verify("EKSU/2021/CS/002").await.expect("verify");
        assert!(!result.verified);
        assert!(result.identity.is_none());
        assert_eq!(result.confidence, 25);
    }
}
