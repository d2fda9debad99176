//! Fundamental types for the Attest identity-verification service.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: user and image identifiers, liveness session handles, document
//! classification, timestamps, and the verification parameter set.

pub mod document;
pub mod error;
pub mod image;
pub mod params;
pub mod session;
pub mod time;
pub mod user;

pub use document::DocumentType;
pub use error::TypeError;
pub use image::ImageKey;
pub use params::VerificationParams;
pub use session::{SessionId, SessionToken};
pub use time::Timestamp;
pub use user::UserId;
