//! Shared utilities for the Attest service.

pub mod logging;

pub use logging::{init_tracing, init_tracing_with};
