// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Evidence Layer Types
// ─────────────────────────────────────────────────────────────────────

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TidewatchError;
use crate::score::clamp_score;

/// Placeholder score carried by a skipped layer. It never reaches the
/// composite because skipped layers receive zero weight.
pub const SKIPPED_SCORE: f64 = 1.0;

/// Evidence payload key set by the image layer when the classifier
/// refused the picture before scoring it (selfie, screenshot, ...).
pub const PRECLASSIFICATION_REJECTED: &str = "preclassification_rejected";

/// Evidence payload key marking a neutral fallback result.
pub const DEGRADED: &str = "degraded";

/// One independent evidence source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Geofence,
    Weather,
    Text,
    Image,
    Reporter,
}

impl Layer {
    /// All layers in pipeline order.
    pub const ALL: [Layer; 5] = [
        Layer::Geofence,
        Layer::Weather,
        Layer::Text,
        Layer::Image,
        Layer::Reporter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Layer::Geofence => "geofence",
            Layer::Weather => "weather",
            Layer::Text => "text",
            Layer::Image => "image",
            Layer::Reporter => "reporter",
        }
    }

    /// Position in [`Layer::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layer {
    type Err = TidewatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Layer::ALL
            .into_iter()
            .find(|l| l.name() == wanted)
            .ok_or_else(|| TidewatchError::UnknownLayer(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayerStatus {
    Pass,
    Fail,
    Skipped,
}

impl fmt::Display for LayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LayerStatus::Pass => "PASS",
            LayerStatus::Fail => "FAIL",
            LayerStatus::Skipped => "SKIPPED",
        })
    }
}

/// Output of one evaluator.
///
/// `weight` is zero until the orchestrator assigns the redistributed
/// weight, and `timestamp` is `None` until the orchestrator collects the
/// result. Evaluators therefore return identical values for identical
/// inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerResult {
    pub layer: Layer,
    pub status: LayerStatus,
    /// Evidence strength in [0, 1].
    pub score: f64,
    /// Evaluator's certainty in [0, 1].
    pub confidence: f64,
    /// Weight used in the composite, after redistribution.
    pub weight: f64,
    pub reasoning: String,
    pub evidence: Value,
    /// Neutral fallback produced because evidence was unavailable.
    pub degraded: bool,
    pub timestamp: Option<DateTime<Utc>>,
}

impl LayerResult {
    fn build(
        layer: Layer,
        status: LayerStatus,
        score: f64,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            layer,
            status,
            score: clamp_score(score, 0.0, 1.0),
            confidence: clamp_score(confidence, 0.0, 1.0),
            weight: 0.0,
            reasoning: reasoning.into(),
            evidence: Value::Null,
            degraded: false,
            timestamp: None,
        }
    }

    pub fn pass(layer: Layer, score: f64, confidence: f64, reasoning: impl Into<String>) -> Self {
        Self::build(layer, LayerStatus::Pass, score, confidence, reasoning)
    }

    pub fn fail(layer: Layer, score: f64, confidence: f64, reasoning: impl Into<String>) -> Self {
        Self::build(layer, LayerStatus::Fail, score, confidence, reasoning)
    }

    /// Pass or fail depending on whether `score` reaches `pass_score`.
    pub fn judged(
        layer: Layer,
        score: f64,
        pass_score: f64,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        let score = clamp_score(score, 0.0, 1.0);
        if score >= pass_score {
            Self::pass(layer, score, confidence, reasoning)
        } else {
            Self::fail(layer, score, confidence, reasoning)
        }
    }

    pub fn skipped(layer: Layer, reasoning: impl Into<String>) -> Self {
        Self::build(layer, LayerStatus::Skipped, SKIPPED_SCORE, 0.0, reasoning)
    }

    /// Neutral PASS emitted when evidence could not be obtained.
    ///
    /// Missing evidence is not evidence of fraud, so this never fails.
    pub fn degraded(layer: Layer, score: f64, confidence: f64, reasoning: impl Into<String>) -> Self {
        let mut result = Self::pass(layer, score, confidence, reasoning);
        result.degraded = true;
        result.evidence = serde_json::json!({ DEGRADED: true });
        result
    }

    pub fn with_evidence(mut self, evidence: Value) -> Self {
        if self.degraded {
            if let Value::Object(mut map) = evidence {
                map.insert(DEGRADED.to_string(), Value::Bool(true));
                self.evidence = Value::Object(map);
                return self;
            }
        }
        self.evidence = evidence;
        self
    }

    pub fn is_pass(&self) -> bool {
        self.status == LayerStatus::Pass
    }

    pub fn is_fail(&self) -> bool {
        self.status == LayerStatus::Fail
    }

    pub fn is_skipped(&self) -> bool {
        self.status == LayerStatus::Skipped
    }

    /// True when the image classifier refused the picture outright.
    pub fn is_preclassification_rejection(&self) -> bool {
        self.evidence
            .get(PRECLASSIFICATION_REJECTED)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Whether this result carries a real signal for reporter trust.
    pub fn is_trust_signal(&self) -> bool {
        !self.is_skipped() && !self.degraded
    }
}
