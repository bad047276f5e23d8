pub mod directory;
pub mod policy;
pub mod scanner;
pub mod verifier;

pub use directory::MockDirectoryAdapter;
pub use policy::{FixedOutcomes, OutcomePolicy, RandomOutcomes};
pub use scanner::{MockScannerAdapter, ScannerDelays};
pub use verifier::MockVerifierAdapter;
