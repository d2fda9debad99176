//! User identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum accepted length of a user identifier, in bytes.
pub const MAX_USER_ID_LEN: usize = 128;

/// An opaque, stable user identifier — the primary key of a verification
/// record.
///
/// Issued by the external authentication layer; the pipeline never derives
/// or interprets it beyond using it as a storage key and an object-store
/// namespace prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a new user id from a raw string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this identifier is well-formed: non-empty, within length
    /// bounds, and free of path separators (it is used as a key prefix).
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && self.0.len() <= MAX_USER_ID_LEN && !self.0.contains('/')
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
