// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Photo Evidence Layer
// ─────────────────────────────────────────────────────────────────────

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use tidewatch_types::config::ImageRules;
use tidewatch_types::layer::PRECLASSIFICATION_REJECTED;
use tidewatch_types::{Layer, LayerResult};

use super::{unavailable, EvaluationContext, LayerEvaluator};
use crate::classifier::ImageClassifier;

/// Scores the attached photo.
///
/// A missing photo is SKIPPED, never penalized here. Whether the hazard
/// type needed a photo is the decision engine's call.
pub struct ImageEvaluator {
    classifier: Arc<dyn ImageClassifier>,
    rules: ImageRules,
}

impl ImageEvaluator {
    pub fn new(classifier: Arc<dyn ImageClassifier>, rules: ImageRules) -> Self {
        Self { classifier, rules }
    }
}

#[async_trait]
impl LayerEvaluator for ImageEvaluator {
    fn layer(&self) -> Layer {
        Layer::Image
    }

    async fn evaluate(&self, ctx: &EvaluationContext<'_>) -> LayerResult {
        let image_ref = match ctx.submission.image_ref.as_deref().map(str::trim) {
            Some(r) if !r.is_empty() => r,
            _ => return LayerResult::skipped(Layer::Image, "no image supplied"),
        };

        let hazard = ctx.submission.hazard;
        let classification = match self.classifier.classify(image_ref, hazard).await {
            Ok(c) => c,
            Err(e) => return unavailable(Layer::Image, &e),
        };

        if let Some(rejection) = &classification.rejection {
            return LayerResult::fail(
                Layer::Image,
                0.0,
                classification.confidence,
                format!(
                    "image rejected before classification ({}): {}",
                    rejection.category, rejection.reason
                ),
            )
            .with_evidence(json!({
                PRECLASSIFICATION_REJECTED: true,
                "category": rejection.category,
            }));
        }

        let mut reasoning = format!("image match with {hazard}: {:.2}", classification.score);
        if let Some(label) = &classification.label {
            reasoning.push_str(&format!(" ({label})"));
        }
        LayerResult::judged(
            Layer::Image,
            classification.score,
            self.rules.pass_score,
            classification.confidence,
            reasoning,
        )
        .with_evidence(json!({
            PRECLASSIFICATION_REJECTED: false,
            "label": classification.label,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ExternalImageClassifier;
    use crate::layers::fixtures::submission;
    use tidewatch_types::{EvidenceSnapshot, HazardType, ImageClassification, TidewatchError};

    fn fixed(classification: ImageClassification) -> ImageEvaluator {
        ImageEvaluator::new(
            Arc::new(ExternalImageClassifier::new(move |_, _| Ok(classification.clone()))),
            ImageRules::default(),
        )
    }

    fn scored(score: f64) -> ImageClassification {
        ImageClassification {
            score,
            confidence: 0.9,
            label: Some("oil_sheen".into()),
            rejection: None,
        }
    }

    async fn run(eval: &ImageEvaluator, image: Option<&str>) -> LayerResult {
        let sub = submission(HazardType::OilSpill, "oil slick along the tideline", image);
        let ev = EvidenceSnapshot::empty();
        eval.evaluate(&EvaluationContext::new(&sub, &ev)).await
    }

    #[tokio::test]
    async fn test_no_image_skipped_without_penalty() {
        let r = run(&fixed(scored(0.0)), None).await;
        assert!(r.is_skipped());
        assert_eq!(r.score, 1.0);
    }

    #[tokio::test]
    async fn test_image_pass() {
        let r = run(&fixed(scored(0.93)), Some("uploads/a.jpg")).await;
        assert!(r.is_pass());
        assert!((r.score - 0.93).abs() < 1e-9);
        assert!(!r.is_preclassification_rejection());
    }

    #[tokio::test]
    async fn test_image_low_score_fails() {
        let r = run(&fixed(scored(0.1)), Some("uploads/a.jpg")).await;
        assert!(r.is_fail());
        assert!(!r.is_preclassification_rejection());
    }

    #[tokio::test]
    async fn test_selfie_rejection_tagged() {
        let eval = fixed(ImageClassification::rejected("selfie", "portrait of a person", 0.97));
        let r = run(&eval, Some("uploads/me.jpg")).await;
        assert!(r.is_fail());
        assert_eq!(r.score, 0.0);
        assert!(r.is_preclassification_rejection());
        assert_eq!(r.evidence["category"], json!("selfie"));
    }

    #[tokio::test]
    async fn test_classifier_error_degrades() {
        let eval = ImageEvaluator::new(
            Arc::new(ExternalImageClassifier::new(|_, _| {
                Err(TidewatchError::Validation("corrupt jpeg".into()))
            })),
            ImageRules::default(),
        );
        let r = run(&eval, Some("uploads/broken.jpg")).await;
        assert!(r.degraded);
        assert!(r.is_pass());
    }

    #[tokio::test]
    async fn test_idempotent() {
        let eval = fixed(scored(0.71));
        let a = run(&eval, Some("uploads/a.jpg")).await;
        let b = run(&eval, Some("uploads/a.jpg")).await;
        assert_eq!(a, b);

        let rejecting = fixed(ImageClassification::rejected("screenshot", "ui chrome", 0.9));
        assert_eq!(
            run(&rejecting, Some("uploads/s.png")).await,
            run(&rejecting, Some("uploads/s.png")).await
        );
    }
}
