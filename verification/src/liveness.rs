//! Liveness evaluation — judges a session's confidence score against the
//! configured minimum.
//!
//! This evaluator never talks to the biometric collaborator; it only judges
//! a result the orchestrator already fetched. It fails closed: a session
//! result with no usable confidence is a failure, not a skipped check.

/// The evaluator's verdict on a liveness session result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LivenessVerdict {
    /// Confidence met the bar (boundary inclusive).
    Passed { confidence: f64 },
    /// Confidence was reported but fell below the bar.
    Rejected { confidence: f64 },
    /// The session reported no confidence at all. Treated as a failure,
    /// but distinct: there is no evidence to persist.
    Unavailable,
}

impl LivenessVerdict {
    pub fn passed(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }

    pub fn confidence(&self) -> Option<f64> {
        match self {
            Self::Passed { confidence } | Self::Rejected { confidence } => Some(*confidence),
            Self::Unavailable => None,
        }
    }
}

/// Judges liveness confidence scores against a configured minimum.
#[derive(Clone, Copy, Debug)]
pub struct LivenessEvaluator {
    min_confidence: f64,
}

impl LivenessEvaluator {
    /// The minimum is an already-resolved configuration value; an explicit
    /// zero is honored.
    pub fn new(min_confidence: f64) -> Self {
        Self { min_confidence }
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Judge a session's reported confidence. `None` fails closed.
    pub fn evaluate(&self, confidence: Option<f64>) -> LivenessVerdict {
        match confidence {
            Some(confidence) if confidence >= self.min_confidence => {
                LivenessVerdict::Passed { confidence }
            }
            Some(confidence) => LivenessVerdict::Rejected { confidence },
            None => LivenessVerdict::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_is_inclusive() {
        let evaluator = LivenessEvaluator::new(90.0);
        assert_eq!(
            evaluator.evaluate(Some(89.9)),
            LivenessVerdict::Rejected { confidence: 89.9 }
        );
        assert_eq!(
            evaluator.evaluate(Some(90.0)),
            LivenessVerdict::Passed { confidence: 90.0 }
        );
        assert_eq!(
            evaluator.evaluate(Some(90.1)),
            LivenessVerdict::Passed { confidence: 90.1 }
        );
    }

    #[test]
    fn test_missing_confidence_fails_closed() {
        let evaluator = LivenessEvaluator::new(90.0);
        let verdict = evaluator.evaluate(None);
        assert_eq!(verdict, LivenessVerdict::Unavailable);
        assert!(!verdict.passed());
        assert_eq!(verdict.confidence(), None);
    }

    #[test]
    fn test_zero_threshold_passes_everything_reported() {
        // A configured zero is a real threshold, not "unset".
        let evaluator = LivenessEvaluator::new(0.0);
        assert!(evaluator.evaluate(Some(0.0)).passed());
        assert!(evaluator.evaluate(Some(12.5)).passed());
        // ...but still fails closed on a missing score.
        assert!(!evaluator.evaluate(None).passed());
    }

    #[test]
    fn test_verdict_carries_evidence() {
        let evaluator = LivenessEvaluator::new(90.0);
        assert_eq!(evaluator.evaluate(Some(42.0)).confidence(), Some(42.0));
        assert_eq!(evaluator.evaluate(Some(99.0)).confidence(), Some(99.0));
    }
}
