//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies of the pipeline (verification store, document
//! analysis, liveness biometrics, face comparison, object store) are
//! abstracted behind traits. This crate provides test-friendly
//! implementations that:
//! - Return programmable, deterministic values
//! - Count their calls so tests can assert interactions
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod services;
pub mod store;

pub use services::{
    NullDocumentAnalyzer, NullFaceComparator, NullLivenessService, NullObjectFetcher,
};
pub use store::NullVerificationStore;
