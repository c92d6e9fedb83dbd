// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Weight Redistribution
// ─────────────────────────────────────────────────────────────────────
//! Reallocates the base weight of skipped layers across active layers
//! in proportion to their base weights:
//!
//! `adjusted[l] = base[l] + skipped_total * (base[l] / active_total)`
//!
//! Skipped layers get weight 0, so the composite stays a proper
//! weighted average over the evidence that actually exists.

use std::collections::BTreeMap;

use tidewatch_types::config::LayerWeights;
use tidewatch_types::Layer;

/// Weights in force for one verification.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightPlan {
    pub weights: BTreeMap<Layer, f64>,
    pub applicable: Vec<Layer>,
    pub skipped: Vec<Layer>,
}

impl WeightPlan {
    pub fn weight(&self, layer: Layer) -> f64 {
        self.weights.get(&layer).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }
}

/// Redistribute `base` over the layers not listed in `skipped`.
///
/// If every layer is skipped, or the active layers have no base weight
/// between them, every weight is 0.
pub fn redistribute(base: &LayerWeights, skipped: &[Layer]) -> WeightPlan {
    let (skipped_layers, applicable): (Vec<Layer>, Vec<Layer>) =
        Layer::ALL.into_iter().partition(|l| skipped.contains(l));

    let skipped_total: f64 = skipped_layers.iter().map(|l| base.get(*l)).sum();
    let active_total: f64 = applicable.iter().map(|l| base.get(*l)).sum();

    let mut weights = BTreeMap::new();
    for layer in Layer::ALL {
        let w = if skipped_layers.contains(&layer) || active_total <= 0.0 {
            0.0
        } else {
            let b = base.get(layer);
            b + skipped_total * (b / active_total)
        };
        weights.insert(layer, w);
    }

    log::debug!(
        "weights redistributed: skipped={skipped_layers:?} skipped_total={skipped_total:.3}"
    );

    WeightPlan {
        weights,
        applicable,
        skipped: skipped_layers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_nothing_skipped_keeps_base() {
        let base = LayerWeights::default();
        let plan = redistribute(&base, &[]);
        for layer in Layer::ALL {
            assert!((plan.weight(layer) - base.get(layer)).abs() < EPS);
        }
        assert!(plan.skipped.is_empty());
        assert_eq!(plan.applicable, Layer::ALL.to_vec());
    }

    #[test]
    fn test_image_skipped() {
        // active = 0.65, image 0.35 spread proportionally.
        let plan = redistribute(&LayerWeights::default(), &[Layer::Image]);
        assert_eq!(plan.weight(Layer::Image), 0.0);
        assert!((plan.weight(Layer::Text) - 0.25 / 0.65).abs() < EPS);
        assert!((plan.weight(Layer::Geofence) - 0.10 / 0.65).abs() < EPS);
        assert!((plan.total() - 1.0).abs() < EPS);
        assert_eq!(plan.skipped, vec![Layer::Image]);
    }

    #[test]
    fn test_sum_is_one_for_every_skip_subset() {
        let weight_sets = [
            LayerWeights::default(),
            LayerWeights {
                geofence: 0.2,
                weather: 0.2,
                text: 0.2,
                image: 0.2,
                reporter: 0.2,
            },
            LayerWeights {
                geofence: 0.0,
                weather: 0.5,
                text: 0.3,
                image: 0.15,
                reporter: 0.05,
            },
        ];
        for base in &weight_sets {
            for mask in 0u32..(1 << 5) {
                let skipped: Vec<Layer> = Layer::ALL
                    .into_iter()
                    .filter(|l| mask & (1 << l.index()) != 0)
                    .collect();
                let plan = redistribute(base, &skipped);
                for l in &skipped {
                    assert_eq!(plan.weight(*l), 0.0);
                }
                let active: f64 = plan.applicable.iter().map(|l| base.get(*l)).sum();
                if active > 0.0 {
                    assert!((plan.total() - 1.0).abs() < EPS, "mask {mask:05b}");
                } else {
                    assert_eq!(plan.total(), 0.0);
                }
            }
        }
    }

    #[test]
    fn test_all_skipped_is_all_zero() {
        let plan = redistribute(&LayerWeights::default(), &Layer::ALL);
        assert_eq!(plan.total(), 0.0);
        assert!(plan.applicable.is_empty());
    }

    #[test]
    fn test_proportions_preserved() {
        let base = LayerWeights::default();
        let plan = redistribute(&base, &[Layer::Weather, Layer::Image]);
        let ratio = plan.weight(Layer::Text) / plan.weight(Layer::Geofence);
        assert!((ratio - base.text / base.geofence).abs() < EPS);
    }
}
