// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Weather / Marine / Seismic Layer
// ─────────────────────────────────────────────────────────────────────

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use tidewatch_types::{EvidenceSnapshot, Layer, LayerResult};

use super::{EvaluationContext, LayerEvaluator, NEUTRAL_CONFIDENCE, NEUTRAL_SCORE};
use crate::hazards::HazardTable;

/// Minimum threat score counted as corroborating the report.
const PASS_SCORE: f64 = 0.5;

/// Confidence when raw readings exist but no threat classification.
const READINGS_ONLY_CONFIDENCE: f64 = 0.4;

/// Corroborates natural hazards against the environmental snapshot.
pub struct WeatherEvaluator {
    hazards: Arc<HazardTable>,
}

impl WeatherEvaluator {
    pub fn new(hazards: Arc<HazardTable>) -> Self {
        Self { hazards }
    }

    fn readings(evidence: &EvidenceSnapshot) -> serde_json::Value {
        json!({
            "weather": evidence.weather,
            "marine": evidence.marine,
            "seismic": evidence.seismic,
        })
    }
}

#[async_trait]
impl LayerEvaluator for WeatherEvaluator {
    fn layer(&self) -> Layer {
        Layer::Weather
    }

    async fn evaluate(&self, ctx: &EvaluationContext<'_>) -> LayerResult {
        let hazard = ctx.submission.hazard;
        if !self.hazards.weather_applicable(hazard) {
            return LayerResult::skipped(
                Layer::Weather,
                format!("not applicable to {hazard} reports"),
            );
        }

        let evidence = ctx.evidence;
        if let Some(threat) = &evidence.threat {
            let score = threat.level.score();
            let level = serde_json::to_value(threat.level).unwrap_or_default();
            let name = level.as_str().unwrap_or("UNKNOWN");
            let mut reasoning = format!("threat classification {name} (score {score:.2})");
            if let Some(why) = &threat.reason {
                reasoning.push_str(&format!(": {why}"));
            }
            return LayerResult::judged(Layer::Weather, score, PASS_SCORE, threat.confidence, reasoning)
                .with_evidence(json!({
                    "threat_level": level,
                    "threat_confidence": threat.confidence,
                    "readings": Self::readings(evidence),
                }));
        }

        if evidence.has_environmental_data() {
            return LayerResult::pass(
                Layer::Weather,
                NEUTRAL_SCORE,
                READINGS_ONLY_CONFIDENCE,
                "environmental readings present but unclassified; neutral score",
            )
            .with_evidence(json!({ "readings": Self::readings(evidence) }));
        }

        LayerResult::pass(
            Layer::Weather,
            NEUTRAL_SCORE,
            NEUTRAL_CONFIDENCE,
            "no environmental data available; neutral score",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::fixtures::submission;
    use tidewatch_types::evidence::MarineReading;
    use tidewatch_types::{HazardType, LayerStatus, ThreatLevel};

    async fn run(hazard: HazardType, evidence: EvidenceSnapshot) -> LayerResult {
        let eval = WeatherEvaluator::new(Arc::new(HazardTable::default()));
        let sub = submission(hazard, "big waves at the pier", None);
        eval.evaluate(&EvaluationContext::new(&sub, &evidence)).await
    }

    #[tokio::test]
    async fn test_non_natural_hazard_skipped() {
        let r = run(HazardType::OilSpill, EvidenceSnapshot::with_threat(ThreatLevel::Warning, 0.9)).await;
        assert_eq!(r.status, LayerStatus::Skipped);
        assert_eq!(r.score, 1.0);
    }

    #[tokio::test]
    async fn test_threat_levels_map_to_scores() {
        for (level, score, status) in [
            (ThreatLevel::Warning, 1.0, LayerStatus::Pass),
            (ThreatLevel::Alert, 0.85, LayerStatus::Pass),
            (ThreatLevel::Watch, 0.70, LayerStatus::Pass),
            (ThreatLevel::NoThreat, 0.0, LayerStatus::Fail),
        ] {
            let r = run(HazardType::HighWaves, EvidenceSnapshot::with_threat(level, 0.8)).await;
            assert!((r.score - score).abs() < 1e-9, "{level:?}");
            assert_eq!(r.status, status);
            assert!((r.confidence - 0.8).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_neutral_pass() {
        let r = run(HazardType::Tsunami, EvidenceSnapshot::empty()).await;
        assert!(r.is_pass());
        assert_eq!(r.score, NEUTRAL_SCORE);
        assert_eq!(r.confidence, NEUTRAL_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_unclassified_readings() {
        let evidence = EvidenceSnapshot {
            marine: Some(MarineReading {
                wave_height_m: Some(4.1),
                ..Default::default()
            }),
            ..Default::default()
        };
        let r = run(HazardType::HighWaves, evidence).await;
        assert!(r.is_pass());
        assert_eq!(r.confidence, READINGS_ONLY_CONFIDENCE);
        assert_eq!(r.evidence["readings"]["marine"]["wave_height_m"], json!(4.1));
    }

    #[tokio::test]
    async fn test_idempotent() {
        let ev = EvidenceSnapshot::with_threat(ThreatLevel::Alert, 0.7);
        assert_eq!(run(HazardType::Flood, ev.clone()).await, run(HazardType::Flood, ev).await);
    }
}
