//! Face matching — picks the best comparison candidate and thresholds it.
//!
//! Pure judgment over the ranked candidates returned by the comparison
//! collaborator. Never mutates the store; the orchestrator decides what to
//! persist.

use attest_services::MatchCandidate;

/// The matcher's decision together with the similarity that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceMatchVerdict {
    pub matched: bool,
    pub similarity: f64,
}

/// Judges comparison candidates against a similarity threshold.
#[derive(Clone, Copy, Debug)]
pub struct FaceMatcher {
    similarity_threshold: f64,
}

impl FaceMatcher {
    /// The threshold is an already-resolved configuration value.
    pub fn new(similarity_threshold: f64) -> Self {
        Self {
            similarity_threshold,
        }
    }

    pub fn similarity_threshold(&self) -> f64 {
        self.similarity_threshold
    }

    /// Decide from zero-or-more ranked candidates.
    ///
    /// Zero candidates is a normal negative result: `{matched: false,
    /// similarity: 0}`. Otherwise the highest-similarity candidate is used,
    /// ties broken by first-seen order, and matched iff its similarity meets
    /// the threshold (boundary inclusive).
    pub fn decide(&self, candidates: &[MatchCandidate]) -> FaceMatchVerdict {
        let best = candidates
            .iter()
            .copied()
            .reduce(|best, c| if c.similarity > best.similarity { c } else { best });

        match best {
            None => FaceMatchVerdict {
                matched: false,
                similarity: 0.0,
            },
            Some(best) => FaceMatchVerdict {
                matched: best.similarity >= self.similarity_threshold,
                similarity: best.similarity,
            },
        }
    }
}
