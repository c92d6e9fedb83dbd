// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Decision Engine
// ─────────────────────────────────────────────────────────────────────
//! Maps the composite score and layer results to one of four terminal
//! decisions. Hard overrides are checked before thresholds, in a fixed
//! order; the first matching rule wins. Reordering the rules changes
//! outcomes.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use tidewatch_types::config::DecisionThresholds;
use tidewatch_types::{Decision, HazardType, Layer, LayerResult};

use crate::hazards::HazardTable;

/// Rule that produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionRule {
    OutsideCoastalZone,
    ImageRejected,
    SpamSignals,
    EmptyDescriptionFailedImage,
    MissingRequiredImage,
    AutoApproveThreshold,
    ManualReviewThreshold,
    BelowThresholds,
}

impl fmt::Display for DecisionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DecisionRule::OutsideCoastalZone => "outside_coastal_zone",
            DecisionRule::ImageRejected => "image_rejected",
            DecisionRule::SpamSignals => "spam_signals",
            DecisionRule::EmptyDescriptionFailedImage => "empty_description_failed_image",
            DecisionRule::MissingRequiredImage => "missing_required_image",
            DecisionRule::AutoApproveThreshold => "auto_approve_threshold",
            DecisionRule::ManualReviewThreshold => "manual_review_threshold",
            DecisionRule::BelowThresholds => "below_thresholds",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub decision: Decision,
    pub rule: DecisionRule,
    pub reason: String,
}

impl Verdict {
    fn new(decision: Decision, rule: DecisionRule, reason: String) -> Self {
        Self {
            decision,
            rule,
            reason,
        }
    }
}

pub struct DecisionEngine {
    thresholds: DecisionThresholds,
    hazards: Arc<HazardTable>,
}

fn find(layers: &[LayerResult], layer: Layer) -> Option<&LayerResult> {
    layers.iter().find(|r| r.layer == layer)
}

impl DecisionEngine {
    pub fn new(thresholds: DecisionThresholds, hazards: Arc<HazardTable>) -> Self {
        Self {
            thresholds,
            hazards,
        }
    }

    pub fn thresholds(&self) -> &DecisionThresholds {
        &self.thresholds
    }

    /// Decide the outcome for one verification.
    pub fn decide(&self, composite: f64, layers: &[LayerResult], hazard: HazardType) -> Verdict {
        let geofence = find(layers, Layer::Geofence);
        let text = find(layers, Layer::Text);
        let image = find(layers, Layer::Image);

        // Rule 1: hard gate
        if let Some(g) = geofence.filter(|g| g.is_fail()) {
            return Verdict::new(
                Decision::AutoRejected,
                DecisionRule::OutsideCoastalZone,
                format!("Outside valid coastal zone: {}", g.reasoning),
            );
        }

        // Rule 2: non-hazard image content
        if let Some(i) = image.filter(|i| i.is_preclassification_rejection()) {
            return Verdict::new(
                Decision::AutoRejected,
                DecisionRule::ImageRejected,
                format!("Image does not show a hazard: {}", i.reasoning),
            );
        }

        // Rule 3: both content signals fail badly
        let ceiling = self.thresholds.spam_score_ceiling;
        if let (Some(t), Some(i)) = (text, image) {
            if t.is_fail() && i.is_fail() && t.score < ceiling && i.score < ceiling {
                return Verdict::new(
                    Decision::AutoRejected,
                    DecisionRule::SpamSignals,
                    format!(
                        "Text ({:.2}) and image ({:.2}) both below {ceiling:.2}: likely spam or fabricated",
                        t.score, i.score
                    ),
                );
            }
        }

        // Rule 4: no description and a failed image
        if let (Some(t), Some(i)) = (text, image) {
            if t.score == 0.0 && i.is_fail() {
                return Verdict::new(
                    Decision::AutoRejected,
                    DecisionRule::EmptyDescriptionFailedImage,
                    "No description and the image failed verification".to_string(),
                );
            }
        }

        // Rule 5: auto-approve, unless a required photo is missing
        if composite >= self.thresholds.auto_approve {
            let image_missing = image.map_or(true, LayerResult::is_skipped);
            if image_missing && self.hazards.requires_visual_confirmation(hazard) {
                return Verdict::new(
                    Decision::ManualReview,
                    DecisionRule::MissingRequiredImage,
                    format!(
                        "Score {composite:.1} qualifies for approval but {hazard} reports need a photo; human confirmation required"
                    ),
                );
            }
            return Verdict::new(
                Decision::AutoApproved,
                DecisionRule::AutoApproveThreshold,
                format!(
                    "Score {composite:.1} >= {:.1}: auto-approved",
                    self.thresholds.auto_approve
                ),
            );
        }

        // Rule 6: manual review band
        if composite >= self.thresholds.manual_review {
            return Verdict::new(
                Decision::ManualReview,
                DecisionRule::ManualReviewThreshold,
                format!(
                    "Score {composite:.1} >= {:.1}: human confirmation required",
                    self.thresholds.manual_review
                ),
            );
        }

        // Rule 7
        Verdict::new(
            Decision::Rejected,
            DecisionRule::BelowThresholds,
            format!(
                "Score {composite:.1} < {:.1}: rejection recommended",
                self.thresholds.manual_review
            ),
        )
    }
}
