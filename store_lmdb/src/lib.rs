//! LMDB storage backend for the Attest verification store.
//!
//! Implements the `attest-store` trait using the `heed` LMDB bindings.
//! A single environment holds one `records` database mapping user id bytes
//! to bincode-encoded verification records.

pub mod environment;
pub mod error;
pub mod records;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use records::LmdbVerificationStore;
