//! Opaque object-store image reference.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference to an image stored in the external object store.
///
/// Keys are opaque to the pipeline: the uploader chooses them (scoped under
/// a per-user namespace) and every collaborator that needs the image bytes
/// resolves the key through the object store interface.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageKey(String);

impl ImageKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ImageKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ImageKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
