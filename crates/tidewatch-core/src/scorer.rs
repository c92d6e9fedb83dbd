// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Composite Scorer
// ─────────────────────────────────────────────────────────────────────
//! Weighted aggregation of layer scores into a single 0–100 value:
//!
//! `composite = 100 * Σ(score_l * w_l) / Σ(w_l over non-skipped layers)`
//!
//! Each `LayerResult` carries the weight assigned by the redistributor.

use tidewatch_types::score::clamp_score;
use tidewatch_types::LayerResult;

/// Composite used when no layer carries weight.
pub const NEUTRAL_COMPOSITE: f64 = 50.0;

/// Compute the composite score in [0, 100].
pub fn composite_score(layers: &[LayerResult]) -> f64 {
    let (weighted, total) = layers
        .iter()
        .filter(|r| !r.is_skipped())
        .fold((0.0, 0.0), |(acc, tw), r| {
            (acc + r.score * r.weight, tw + r.weight)
        });

    if !(total > 0.0) {
        log::debug!("composite: no weighted layers, defaulting to {NEUTRAL_COMPOSITE}");
        return NEUTRAL_COMPOSITE;
    }

    let composite = clamp_score(100.0 * weighted / total, 0.0, 100.0);
    log::debug!("composite: {composite:.2} (weighted={weighted:.4}, total={total:.4})");
    composite
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidewatch_types::Layer;

    fn weighted(mut r: LayerResult, w: f64) -> LayerResult {
        r.weight = w;
        r
    }

    #[test]
    fn test_weighted_average() {
        // (1.0*0.5 + 0.5*0.5) / 1.0 = 0.75
        let layers = [
            weighted(LayerResult::pass(Layer::Geofence, 1.0, 1.0, ""), 0.5),
            weighted(LayerResult::pass(Layer::Text, 0.5, 1.0, ""), 0.5),
        ];
        assert!((composite_score(&layers) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_skipped_layers_ignored() {
        let layers = [
            weighted(LayerResult::pass(Layer::Text, 0.4, 1.0, ""), 1.0),
            weighted(LayerResult::skipped(Layer::Image, ""), 0.35),
        ];
        assert!((composite_score(&layers) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_skipped_defaults_to_neutral() {
        let layers = [
            LayerResult::skipped(Layer::Weather, ""),
            LayerResult::skipped(Layer::Image, ""),
        ];
        assert_eq!(composite_score(&layers), NEUTRAL_COMPOSITE);
        assert_eq!(composite_score(&[]), NEUTRAL_COMPOSITE);
    }

    #[test]
    fn test_normalizes_partial_weights() {
        // Weights not summing to 1 are normalized by their total.
        let layers = [
            weighted(LayerResult::pass(Layer::Text, 0.8, 1.0, ""), 0.2),
            weighted(LayerResult::pass(Layer::Reporter, 0.8, 1.0, ""), 0.2),
        ];
        assert!((composite_score(&layers) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounded() {
        for s in [0.0, 0.3, 1.0] {
            let layers = [weighted(LayerResult::pass(Layer::Text, s, 1.0, ""), 1.0)];
            let c = composite_score(&layers);
            assert!((0.0..=100.0).contains(&c));
        }
    }
}
