// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Verification Score and Result Types
// ─────────────────────────────────────────────────────────────────────

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layer::{Layer, LayerResult};

/// Clamp a value to [lo, hi], mapping NaN to lo and Inf to nearest bound.
#[inline]
pub fn clamp_score(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        log::warn!("clamp_score: NaN detected, clamping to {lo:.4}");
        return lo;
    }
    if value.is_infinite() {
        let boundary = if value > 0.0 { hi } else { lo };
        log::warn!("clamp_score: Inf detected, clamping to {boundary:.4}");
        return boundary;
    }
    value.clamp(lo, hi)
}

/// Terminal outcome of a verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    AutoApproved,
    ManualReview,
    /// Recommended rejection, still revisable by a human.
    Rejected,
    AutoRejected,
}

impl Decision {
    /// Only reports routed to the review queue need a human decision.
    pub fn requires_human_confirmation(self) -> bool {
        self == Decision::ManualReview
    }

    /// Short recommendation label surfaced to reviewers.
    pub fn recommendation(self) -> &'static str {
        match self {
            Decision::AutoApproved => "approve",
            Decision::ManualReview => "review",
            Decision::Rejected | Decision::AutoRejected => "reject",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Decision::AutoApproved => "AUTO_APPROVED",
            Decision::ManualReview => "MANUAL_REVIEW",
            Decision::Rejected => "REJECTED",
            Decision::AutoRejected => "AUTO_REJECTED",
        })
    }
}

/// Audit record produced once per verification attempt.
///
/// Fields are read-only after construction. Re-verifying a submission
/// yields a new record with a fresh id that points at the one it
/// supersedes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    id: Uuid,
    submission_id: String,
    supersedes: Option<Uuid>,
    composite_score: f64,
    decision: Decision,
    decision_reason: String,
    layers: Vec<LayerResult>,
    weights: BTreeMap<Layer, f64>,
    applicable_layers: Vec<Layer>,
    skipped_layers: Vec<Layer>,
    processing_ms: f64,
    created_at: DateTime<Utc>,
    recommendation: Option<String>,
    requires_human_confirmation: bool,
    summary: String,
}

/// Inputs for [`VerificationResult::new`].
#[derive(Debug, Clone)]
pub struct ResultParts {
    pub submission_id: String,
    pub supersedes: Option<Uuid>,
    pub composite_score: f64,
    pub decision: Decision,
    pub decision_reason: String,
    pub layers: Vec<LayerResult>,
    pub weights: BTreeMap<Layer, f64>,
    pub applicable_layers: Vec<Layer>,
    pub skipped_layers: Vec<Layer>,
    pub processing_ms: f64,
}

impl VerificationResult {
    pub fn new(parts: ResultParts) -> Self {
        let summary = summarize(&parts.decision_reason, &parts.layers);
        Self {
            id: Uuid::new_v4(),
            submission_id: parts.submission_id,
            supersedes: parts.supersedes,
            composite_score: clamp_score(parts.composite_score, 0.0, 100.0),
            decision: parts.decision,
            decision_reason: parts.decision_reason,
            layers: parts.layers,
            weights: parts.weights,
            applicable_layers: parts.applicable_layers,
            skipped_layers: parts.skipped_layers,
            processing_ms: parts.processing_ms.max(0.0),
            created_at: Utc::now(),
            recommendation: Some(parts.decision.recommendation().to_string()),
            requires_human_confirmation: parts.decision.requires_human_confirmation(),
            summary,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn submission_id(&self) -> &str {
        &self.submission_id
    }

    pub fn supersedes(&self) -> Option<Uuid> {
        self.supersedes
    }

    pub fn composite_score(&self) -> f64 {
        self.composite_score
    }

    pub fn decision(&self) -> Decision {
        self.decision
    }

    pub fn decision_reason(&self) -> &str {
        &self.decision_reason
    }

    pub fn layers(&self) -> &[LayerResult] {
        &self.layers
    }

    pub fn layer(&self, layer: Layer) -> Option<&LayerResult> {
        self.layers.iter().find(|r| r.layer == layer)
    }

    pub fn weights(&self) -> &BTreeMap<Layer, f64> {
        &self.weights
    }

    pub fn applicable_layers(&self) -> &[Layer] {
        &self.applicable_layers
    }

    pub fn skipped_layers(&self) -> &[Layer] {
        &self.skipped_layers
    }

    pub fn processing_ms(&self) -> f64 {
        self.processing_ms
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn recommendation(&self) -> Option<&str> {
        self.recommendation.as_deref()
    }

    pub fn requires_human_confirmation(&self) -> bool {
        self.requires_human_confirmation
    }

    /// Reason text shown to the submitter.
    pub fn summary(&self) -> &str {
        &self.summary
    }
}

fn summarize(reason: &str, layers: &[LayerResult]) -> String {
    let mut out = reason.to_string();
    for r in layers {
        out.push_str(&format!("\n- {} [{}]: {}", r.layer, r.status, r.reasoning));
    }
    out
}
