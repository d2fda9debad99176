//! Verification parameters — the threshold configuration every judge reads.
//!
//! Values here are already *resolved*: the configuration layer decides
//! between an explicitly configured value and the documented default before
//! constructing this struct, so a configured zero is honored rather than
//! silently replaced (a configured value and an absent value are distinct
//! states at the config boundary, never conflated by truthiness).

use crate::error::TypeError;
use serde::{Deserialize, Serialize};

/// Default minimum liveness confidence required to pass, in [0,100].
pub const DEFAULT_MIN_LIVENESS_CONFIDENCE: f64 = 90.0;

/// Default face similarity threshold for a match decision, in [0,100].
pub const DEFAULT_FACE_SIMILARITY_THRESHOLD: f64 = 80.0;

/// Default number of audit captures retained per liveness session.
pub const DEFAULT_AUDIT_IMAGES_LIMIT: u32 = 3;

/// Resolved verification parameters shared by the judges and the
/// orchestrator.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct VerificationParams {
    /// Minimum liveness confidence score to pass, boundary inclusive.
    pub min_liveness_confidence: f64,

    /// Minimum face similarity score for a match decision, boundary inclusive.
    pub face_similarity_threshold: f64,

    /// How many audit captures the liveness collaborator retains per session.
    pub audit_images_limit: u32,
}

impl VerificationParams {
    /// Check that both thresholds fall within the score scale [0,100].
    pub fn validate(&self) -> Result<(), TypeError> {
        for (name, value) in [
            ("min_liveness_confidence", self.min_liveness_confidence),
            ("face_similarity_threshold", self.face_similarity_threshold),
        ] {
            if !(0.0..=100.0).contains(&value) || value.is_nan() {
                return Err(TypeError::ThresholdOutOfRange {
                    name: name.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

impl Default for VerificationParams {
    fn default() -> Self {
        Self {
            min_liveness_confidence: DEFAULT_MIN_LIVENESS_CONFIDENCE,
            face_similarity_threshold: DEFAULT_FACE_SIMILARITY_THRESHOLD,
            audit_images_limit: DEFAULT_AUDIT_IMAGES_LIMIT,
        }
    }
}
