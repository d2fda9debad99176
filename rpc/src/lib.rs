//! HTTP API for the Attest verification pipeline.
//!
//! A single action-dispatch entry point (`POST /api/v1/verify`) keyed by an
//! `action` field, decoded into a tagged request enum and matched
//! exhaustively — one handler arm per action:
//! - `process_document`
//! - `start_liveness_session`
//! - `verify_liveness`
//! - `compare_faces`
//!
//! Plus a health probe and a per-user status endpoint. Every response
//! carries an explicit `status` field; success is never implied by payload
//! shape alone.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::RpcError;
pub use server::{AppState, RpcServer};
