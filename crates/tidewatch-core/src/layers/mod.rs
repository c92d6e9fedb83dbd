// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Layer Evaluator Interface
// ─────────────────────────────────────────────────────────────────────
//! One evaluator per evidence layer.
//!
//! Evaluators hold only immutable configuration and provider handles,
//! so identical inputs always give identical results and any number of
//! them may run concurrently. Provider failures never escape: they are
//! turned into degraded neutral results.

use async_trait::async_trait;

use tidewatch_types::{
    EvidenceSnapshot, Layer, LayerResult, ReporterProfile, Submission, TidewatchError,
};

pub mod geofence;
pub mod image;
pub mod reporter;
pub mod text;
pub mod weather;

pub use geofence::GeofenceEvaluator;
pub use image::ImageEvaluator;
pub use reporter::ReporterEvaluator;
pub use text::TextEvaluator;
pub use weather::WeatherEvaluator;

/// Score of a neutral fallback result.
pub const NEUTRAL_SCORE: f64 = 0.5;
/// Confidence of a neutral fallback result.
pub const NEUTRAL_CONFIDENCE: f64 = 0.3;

/// Outcome of the single reporter-profile read made per verification.
#[derive(Debug, Clone, PartialEq)]
pub enum ReporterLookup {
    Found(ReporterProfile),
    Unknown,
    Unavailable(String),
}

/// Everything an evaluator may look at.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub submission: &'a Submission,
    pub evidence: &'a EvidenceSnapshot,
    /// `None` before the reporter profile has been read (geofence gate).
    pub reporter: Option<&'a ReporterLookup>,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(submission: &'a Submission, evidence: &'a EvidenceSnapshot) -> Self {
        Self {
            submission,
            evidence,
            reporter: None,
        }
    }

    pub fn with_reporter(mut self, reporter: &'a ReporterLookup) -> Self {
        self.reporter = Some(reporter);
        self
    }
}

#[async_trait]
pub trait LayerEvaluator: Send + Sync {
    fn layer(&self) -> Layer;

    async fn evaluate(&self, ctx: &EvaluationContext<'_>) -> LayerResult;

    /// Result used when evaluation could not complete (timeout, panic).
    fn fallback(&self, reason: String) -> LayerResult {
        LayerResult::degraded(self.layer(), NEUTRAL_SCORE, NEUTRAL_CONFIDENCE, reason)
    }
}

/// Neutral result for a provider error, logged at `warn`.
pub(crate) fn unavailable(layer: Layer, err: &TidewatchError) -> LayerResult {
    let reason = match err {
        TidewatchError::EvidenceUnavailable { .. } => err.to_string(),
        other => TidewatchError::EvidenceUnavailable {
            layer,
            reason: other.to_string(),
        }
        .to_string(),
    };
    log::warn!("{reason}; using neutral {layer} score");
    LayerResult::degraded(
        layer,
        NEUTRAL_SCORE,
        NEUTRAL_CONFIDENCE,
        format!("{reason}; neutral score used"),
    )
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_wraps_other_errors() {
        let r = unavailable(Layer::Text, &TidewatchError::Validation("bad utf8".into()));
        assert!(r.degraded);
        assert!(r.is_pass());
        assert_eq!(r.score, NEUTRAL_SCORE);
        assert!(r.reasoning.starts_with("text evidence unavailable"));
    }

    #[test]
    fn test_unavailable_keeps_evidence_error() {
        let err = TidewatchError::EvidenceUnavailable {
            layer: Layer::Image,
            reason: "503".into(),
        };
        let r = unavailable(Layer::Image, &err);
        assert!(r.reasoning.contains("503"));
    }
}
