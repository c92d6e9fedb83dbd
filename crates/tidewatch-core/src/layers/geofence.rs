// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Geofence Layer (Blocking Gate)
// ─────────────────────────────────────────────────────────────────────

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use tidewatch_types::config::GeofenceRules;
use tidewatch_types::{Layer, LayerResult, TidewatchError};

use super::{unavailable, EvaluationContext, LayerEvaluator};
use crate::coastline::CoastlineOracle;

/// Checks that the report lies within the coastal zone.
///
/// PASS score falls linearly from 1.0 at the shoreline to 0.5 at the
/// inland threshold. Beyond it, FAIL with score 0.
pub struct GeofenceEvaluator {
    oracle: Arc<dyn CoastlineOracle>,
    rules: GeofenceRules,
}

impl GeofenceEvaluator {
    pub fn new(oracle: Arc<dyn CoastlineOracle>, rules: GeofenceRules) -> Self {
        Self { oracle, rules }
    }

    fn judge(&self, distance_km: f64) -> LayerResult {
        let threshold = self.rules.inland_threshold_km;
        let evidence = json!({ "distance_km": distance_km, "threshold_km": threshold });
        if distance_km > threshold {
            return LayerResult::fail(
                Layer::Geofence,
                0.0,
                1.0,
                format!(
                    "outside valid coastal zone: {distance_km:.2} km from coast (limit {threshold:.2} km)"
                ),
            )
            .with_evidence(evidence);
        }
        LayerResult::pass(
            Layer::Geofence,
            1.0 - 0.5 * (distance_km / threshold),
            1.0,
            format!("within coastal zone: {distance_km:.2} km from coast"),
        )
        .with_evidence(evidence)
    }
}

#[async_trait]
impl LayerEvaluator for GeofenceEvaluator {
    fn layer(&self) -> Layer {
        Layer::Geofence
    }

    async fn evaluate(&self, ctx: &EvaluationContext<'_>) -> LayerResult {
        let at = ctx.submission.coordinates;
        if !at.is_valid() {
            return LayerResult::fail(
                Layer::Geofence,
                0.0,
                1.0,
                format!("coordinates {at} are not a valid position"),
            );
        }

        match self.oracle.distance_to_coast_km(at).await {
            Ok(d) if !d.is_finite() || d < 0.0 => unavailable(
                Layer::Geofence,
                &TidewatchError::EvidenceUnavailable {
                    layer: Layer::Geofence,
                    reason: format!("oracle returned invalid distance {d}"),
                },
            ),
            Ok(d) => self.judge(d),
            Err(e) => unavailable(Layer::Geofence, &e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coastline::{ExternalCoastline, FixedDistance};
    use crate::layers::fixtures::submission;
    use tidewatch_types::{Coordinates, EvidenceSnapshot, HazardType};

    fn evaluator(distance: f64) -> GeofenceEvaluator {
        GeofenceEvaluator::new(Arc::new(FixedDistance(distance)), GeofenceRules::default())
    }

    async fn run(eval: &GeofenceEvaluator) -> LayerResult {
        let sub = submission(HazardType::HighWaves, "waves", None);
        let ev = EvidenceSnapshot::empty();
        eval.evaluate(&EvaluationContext::new(&sub, &ev)).await
    }

    #[tokio::test]
    async fn test_on_shoreline() {
        let r = run(&evaluator(0.0)).await;
        assert!(r.is_pass());
        assert_eq!(r.score, 1.0);
    }

    #[tokio::test]
    async fn test_at_threshold_still_passes() {
        let r = run(&evaluator(10.0)).await;
        assert!(r.is_pass());
        assert!((r.score - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_inland_fails() {
        let r = run(&evaluator(42.0)).await;
        assert!(r.is_fail());
        assert_eq!(r.score, 0.0);
        assert!(r.reasoning.contains("outside valid coastal zone"));
        assert_eq!(r.evidence["distance_km"], json!(42.0));
    }

    #[tokio::test]
    async fn test_invalid_coordinates_fail() {
        let eval = evaluator(0.0);
        let mut sub = submission(HazardType::Flood, "water", None);
        sub.coordinates = Coordinates::new(123.0, 0.0);
        let ev = EvidenceSnapshot::empty();
        let r = eval.evaluate(&EvaluationContext::new(&sub, &ev)).await;
        assert!(r.is_fail());
    }

    #[tokio::test]
    async fn test_oracle_error_is_neutral_pass() {
        let eval = GeofenceEvaluator::new(
            Arc::new(ExternalCoastline::new(|_| {
                Err(TidewatchError::Persistence("tile server down".into()))
            })),
            GeofenceRules::default(),
        );
        let r = run(&eval).await;
        assert!(r.is_pass());
        assert!(r.degraded);
    }

    #[tokio::test]
    async fn test_nan_distance_is_neutral() {
        let r = run(&evaluator(f64::NAN)).await;
        assert!(r.degraded);
    }

    #[tokio::test]
    async fn test_infinite_distance_is_neutral() {
        let r = run(&evaluator(f64::INFINITY)).await;
        assert!(r.degraded);
        assert!(r.is_pass());
        assert_eq!(r.score, 0.5);
    }

    #[tokio::test]
    async fn test_idempotent() {
        let eval = evaluator(3.0);
        assert_eq!(run(&eval).await, run(&eval).await);
    }
}
