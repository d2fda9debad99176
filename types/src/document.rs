//! Identity document classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of identity document detected in an upload.
///
/// Derived from the extracted text by a best-effort keyword match; an
/// unrecognized document is `Unknown`, which by itself never invalidates
/// the document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Passport,
    DriverLicense,
    NationalId,
    #[default]
    Unknown,
}

impl DocumentType {
    /// Wire-format name, matching the serialized representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passport => "PASSPORT",
            Self::DriverLicense => "DRIVER_LICENSE",
            Self::NationalId => "NATIONAL_ID",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether classification produced a concrete document kind.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
