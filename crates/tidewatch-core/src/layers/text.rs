// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Description Text Layer
// ─────────────────────────────────────────────────────────────────────

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use tidewatch_types::config::TextRules;
use tidewatch_types::score::clamp_score;
use tidewatch_types::{Layer, LayerResult};

use super::{unavailable, EvaluationContext, LayerEvaluator};
use crate::classifier::TextClassifier;

/// Validates the free-text description.
///
/// An empty description is a hard FAIL at 0.0 rather than a skip: a
/// report without any description cannot be verified.
pub struct TextEvaluator {
    classifier: Arc<dyn TextClassifier>,
    rules: TextRules,
}

impl TextEvaluator {
    pub fn new(classifier: Arc<dyn TextClassifier>, rules: TextRules) -> Self {
        Self { classifier, rules }
    }
}

#[async_trait]
impl LayerEvaluator for TextEvaluator {
    fn layer(&self) -> Layer {
        Layer::Text
    }

    async fn evaluate(&self, ctx: &EvaluationContext<'_>) -> LayerResult {
        let text = ctx.submission.description.trim();
        let length = text.chars().count();

        if length == 0 {
            return LayerResult::fail(Layer::Text, 0.0, 1.0, "no description provided")
                .with_evidence(json!({ "length": 0 }));
        }
        if length < self.rules.min_length {
            return LayerResult::fail(
                Layer::Text,
                self.rules.too_short_score,
                0.9,
                format!(
                    "description too short ({length} < {} characters)",
                    self.rules.min_length
                ),
            )
            .with_evidence(json!({ "length": length }));
        }

        let hazard = ctx.submission.hazard;
        let classification = match self.classifier.classify(text, hazard).await {
            Ok(c) => c,
            Err(e) => return unavailable(Layer::Text, &e),
        };

        let raw = clamp_score(classification.score, 0.0, 1.0);
        let short = length < self.rules.short_length;
        let (score, penalty) = if short {
            (raw * self.rules.short_penalty, Some(self.rules.short_penalty))
        } else {
            (raw, None)
        };

        let mut reasoning = format!("semantic match with {hazard}: {score:.2}");
        if let Some(label) = &classification.label {
            reasoning.push_str(&format!(" ({label})"));
        }
        if short {
            reasoning.push_str(&format!(
                "; short description penalty x{:.2}",
                self.rules.short_penalty
            ));
        }

        LayerResult::judged(
            Layer::Text,
            score,
            self.rules.pass_score,
            classification.confidence,
            reasoning,
        )
        .with_evidence(json!({
            "length": length,
            "raw_score": raw,
            "penalty": penalty,
            "label": classification.label,
        }))
    }
}
