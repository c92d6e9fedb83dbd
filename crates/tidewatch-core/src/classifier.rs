// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Text and Image Classifier Interfaces
// ─────────────────────────────────────────────────────────────────────
//! Classifier traits plus a keyword heuristic for text.
//!
//! In production the semantic text model and the image model run as
//! external services behind these traits. The heuristic backend gives
//! deterministic scores for tests and local runs.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinError;

use tidewatch_types::{
    HazardType, ImageClassification, Layer, TextClassification, TidewatchError, TidewatchResult,
};

/// Text-semantic classifier keyed by (text, declared hazard type).
///
/// Returns how well the description matches the hazard, in [0, 1].
#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn classify(&self, text: &str, hazard: HazardType) -> TidewatchResult<TextClassification>;
}

/// Image classifier keyed by (image reference, declared hazard type).
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn classify(
        &self,
        image_ref: &str,
        hazard: HazardType,
    ) -> TidewatchResult<ImageClassification>;
}

fn keywords(hazard: HazardType) -> &'static [&'static str] {
    match hazard {
        HazardType::HighWaves => &["wave", "waves", "swell", "surf", "breaking"],
        HazardType::RipCurrent => &["rip", "current", "pulled", "undertow", "channel"],
        HazardType::StormSurge => &["surge", "storm", "seawater", "inundation", "wind"],
        HazardType::Flood => &["flood", "flooding", "water", "submerged", "inundated"],
        HazardType::Tsunami => &["tsunami", "receding", "wall", "earthquake", "retreat"],
        HazardType::CoastalErosion => &["erosion", "eroded", "collapse", "cliff", "sand"],
        HazardType::OilSpill => &["oil", "slick", "sheen", "tar", "spill"],
        HazardType::MarineDebris => &["debris", "plastic", "nets", "garbage", "washed"],
        HazardType::WildlifeStranding => &["stranded", "beached", "dolphin", "whale", "turtle"],
        HazardType::WaterPollution => &["pollution", "sewage", "discharge", "foam", "smell"],
        HazardType::Other => &["hazard", "danger", "beach", "coast", "sea"],
    }
}

/// Deterministic keyword-overlap text classifier (no model required).
///
/// Score starts at 0.3 and gains 0.2 per distinct hazard keyword found,
/// capped at 0.95. Confidence rises with description length.
pub struct HeuristicTextClassifier;

impl HeuristicTextClassifier {
    pub fn score(text: &str, hazard: HazardType) -> TextClassification {
        let lower = text.to_lowercase();
        let words: HashSet<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let hits = keywords(hazard)
            .iter()
            .filter(|k| words.contains(**k))
            .count() as f64;
        let confidence = (0.5 + words.len() as f64 / 40.0).min(0.9);
        TextClassification {
            score: (0.3 + 0.2 * hits).min(0.95),
            confidence,
            label: Some(if hits > 0.0 { "consistent" } else { "unrelated" }.to_string()),
        }
    }
}

#[async_trait]
impl TextClassifier for HeuristicTextClassifier {
    async fn classify(&self, text: &str, hazard: HazardType) -> TidewatchResult<TextClassification> {
        Ok(Self::score(text, hazard))
    }
}

fn task_failed(layer: Layer, err: JoinError) -> TidewatchError {
    TidewatchError::EvidenceUnavailable {
        layer,
        reason: format!("classifier task failed: {err}"),
    }
}

/// External text classifier that calls a scoring function.
///
/// Used to wire a remote model client without writing a trait impl.
/// The function may block: it runs on the blocking pool, so the
/// caller's deadline still applies.
type TextClassifyFn =
    Arc<dyn Fn(&str, HazardType) -> TidewatchResult<TextClassification> + Send + Sync>;

pub struct ExternalTextClassifier {
    classify_fn: TextClassifyFn,
}

impl ExternalTextClassifier {
    pub fn new(
        classify_fn: impl Fn(&str, HazardType) -> TidewatchResult<TextClassification>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            classify_fn: Arc::new(classify_fn),
        }
    }
}

#[async_trait]
impl TextClassifier for ExternalTextClassifier {
    async fn classify(&self, text: &str, hazard: HazardType) -> TidewatchResult<TextClassification> {
        let classify_fn = Arc::clone(&self.classify_fn);
        let text = text.to_string();
        tokio::task::spawn_blocking(move || classify_fn(&text, hazard))
            .await
            .map_err(|e| task_failed(Layer::Text, e))?
    }
}

type ImageClassifyFn =
    Arc<dyn Fn(&str, HazardType) -> TidewatchResult<ImageClassification> + Send + Sync>;

/// External image classifier that calls a scoring function.
///
/// Runs on the blocking pool, like [`ExternalTextClassifier`].
pub struct ExternalImageClassifier {
    classify_fn: ImageClassifyFn,
}

impl ExternalImageClassifier {
    pub fn new(
        classify_fn: impl Fn(&str, HazardType) -> TidewatchResult<ImageClassification>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            classify_fn: Arc::new(classify_fn),
        }
    }
}

#[async_trait]
impl ImageClassifier for ExternalImageClassifier {
    async fn classify(
        &self,
        image_ref: &str,
        hazard: HazardType,
    ) -> TidewatchResult<ImageClassification> {
        let classify_fn = Arc::clone(&self.classify_fn);
        let image_ref = image_ref.to_string();
        tokio::task::spawn_blocking(move || classify_fn(&image_ref, hazard))
            .await
            .map_err(|e| task_failed(Layer::Image, e))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_matching_keywords() {
        let c = HeuristicTextClassifier::score(
            "Huge waves breaking over the sea wall, swell is rising fast",
            HazardType::HighWaves,
        );
        assert!(c.score > 0.85);
        assert_eq!(c.label.as_deref(), Some("consistent"));
    }

    #[test]
    fn test_heuristic_unrelated_text() {
        let c = HeuristicTextClassifier::score(
            "Lovely sunny afternoon with ice cream",
            HazardType::OilSpill,
        );
        assert!((c.score - 0.3).abs() < 1e-9);
        assert_eq!(c.label.as_deref(), Some("unrelated"));
    }

    #[test]
    fn test_heuristic_is_deterministic() {
        let a = HeuristicTextClassifier::score("oil slick near the pier", HazardType::OilSpill);
        let b = HeuristicTextClassifier::score("oil slick near the pier", HazardType::OilSpill);
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_external_text_classifier() {
        let c = ExternalTextClassifier::new(|_, _| {
            Ok(TextClassification {
                score: 0.42,
                confidence: 0.8,
                label: None,
            })
        });
        let out = c.classify("anything", HazardType::Flood).await.unwrap();
        assert!((out.score - 0.42).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_external_image_classifier_error() {
        let c = ExternalImageClassifier::new(|_, _| {
            Err(TidewatchError::Validation("unreadable image".into()))
        });
        assert!(c.classify("img.jpg", HazardType::Flood).await.is_err());
    }

    #[tokio::test]
    async fn test_external_classifier_panic_is_an_error() {
        let c = ExternalTextClassifier::new(|_, _| panic!("model crashed"));
        let err = c.classify("anything", HazardType::Flood).await.unwrap_err();
        assert!(matches!(
            err,
            TidewatchError::EvidenceUnavailable {
                layer: Layer::Text,
                ..
            }
        ));
    }
}
