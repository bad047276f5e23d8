//! services/enrollment/src/lib.rs
//!
//! The enrollment service: mock adapters for the scanner, directory and
//! verifier ports, plus the capture orchestrator and session flows built on
//! top of them.

pub mod adapters;
pub mod config;
pub mod error;
pub mod flow;
