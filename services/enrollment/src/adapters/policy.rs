//! services/enrollment/src/adapters/policy.rs
//!
//! This module defines the injectable outcome policy behind the simulated
//! adapters. Quality scores and verification verdicts come from here rather
//! than from inline `rand` calls, so deterministic tests can force both
//! branches.

use rand::Rng;

/// Source of all simulated scores and verdicts.
pub trait OutcomePolicy: Send + Sync {
    /// Quality score for a freshly captured image, in [0, 100].
    fn image_quality(&self) -> u8;

    /// Whether a verification request matches.
    fn verification_verdict(&self) -> bool;

    /// Confidence score attached to a verification result, in [0, 100].
    fn confidence(&self, verified: bool) -> u8;
}

/// The default policy: fresh random values on every call.
#[derive(Debug, Clone, Default)]
pub struct RandomOutcomes;

impl OutcomePolicy for RandomOutcomes {
    fn image_quality(&self) -> u8 {
        rand::thread_rng().gen_range(55..=95)
    }

    fn verification_verdict(&self) -> bool {
        rand::thread_rng().gen_bool(0.5)
    }

    fn confidence(&self, verified: bool) -> u8 {
        let mut rng = rand::thread_rng();
        if verified {
            rng.gen_range(70..=99)
        } else {
            rng.gen_range(5..=45)
        }
    }
}

/// A fixed policy for deterministic tests.
#[derive(Debug, Clone)]
pub struct FixedOutcomes {
    pub quality: u8,
    pub verdict: bool,
    pub confidence: u8,
}

impl FixedOutcomes {
    pub fn new(quality: u8, verdict: bool, confidence: u8) -> Self {
        Self {
            quality,
            verdict,
            confidence,
        }
    }
}

impl OutcomePolicy for FixedOutcomes {
    fn image_quality(&self) -> u8 {
        self.quality
    }

    fn verification_verdict(&self) -> bool {
        self.verdict
    }

    fn confidence(&self, _verified: bool) -> u8 {
        self.confidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_quality_stays_in_range() {
        let policy = RandomOutcomes;
        for _ in 0..100 {
            let q = policy.image_quality();
            assert!((55..=95).contains(&q));
        }
    }

    #[test]
    fn random_confidence_tracks_verdict() {
        let policy = RandomOutcomes;
        for _ in 0..100 {
            assert!(policy.confidence(true) >= 70);
            assert!(policy.confidence(false) <= 45);
        }
    }

    #[test]
    fn fixed_outcomes_are_fixed() {
        let policy = FixedOutcomes::new(80, false, 30);
        assert_eq!(policy.image_quality(), 80);
        assert!(!policy.verification_verdict());
        assert_eq!(policy.confidence(false), 30);
    }
}
