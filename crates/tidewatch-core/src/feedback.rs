// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Reporter Trust Feedback Loop
// ─────────────────────────────────────────────────────────────────────
//! Turns verification outcomes and human adjudications into trust
//! events, then applies them through `TrustScore::nudge`. Both paths
//! share the same update function and differ only in the rate.

use serde::Serialize;

use tidewatch_types::config::TrustRates;
use tidewatch_types::{Layer, LayerResult, TrustScore, TrustTarget};

/// Human verdict on a report after review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjudication {
    Confirmed,
    Rejected,
}

/// What produced a trust event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustSource {
    TextLayer,
    ImageLayer,
    HumanConfirmed,
    HumanRejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrustEvent {
    pub source: TrustSource,
    pub target: TrustTarget,
    pub alpha: f64,
}

/// Before/after record of one feedback application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrustUpdate {
    pub before: TrustScore,
    pub after: TrustScore,
    pub events: Vec<TrustEvent>,
}

impl TrustUpdate {
    pub fn changed(&self) -> bool {
        self.before != self.after
    }

    pub fn delta(&self) -> f64 {
        self.after.value() - self.before.value()
    }
}

pub struct TrustFeedback {
    rates: TrustRates,
}

impl TrustFeedback {
    pub fn new(rates: TrustRates) -> Self {
        Self { rates }
    }

    /// Events from the text and image layers, in that order.
    ///
    /// Skipped layers and degraded fallbacks carry no signal.
    pub fn events_for(&self, layers: &[LayerResult]) -> Vec<TrustEvent> {
        let mut events = Vec::with_capacity(2);
        for (layer, source, alpha) in [
            (Layer::Text, TrustSource::TextLayer, self.rates.text_alpha),
            (Layer::Image, TrustSource::ImageLayer, self.rates.image_alpha),
        ] {
            let Some(result) = layers.iter().find(|r| r.layer == layer) else {
                continue;
            };
            if !result.is_trust_signal() {
                continue;
            }
            let target = if result.is_pass() {
                TrustTarget::Up
            } else {
                TrustTarget::Down
            };
            events.push(TrustEvent {
                source,
                target,
                alpha,
            });
        }
        events
    }

    pub fn event_for_adjudication(&self, outcome: Adjudication) -> TrustEvent {
        match outcome {
            Adjudication::Confirmed => TrustEvent {
                source: TrustSource::HumanConfirmed,
                target: TrustTarget::Up,
                alpha: self.rates.confirm_alpha,
            },
            Adjudication::Rejected => TrustEvent {
                source: TrustSource::HumanRejected,
                target: TrustTarget::Down,
                alpha: self.rates.reject_alpha,
            },
        }
    }

    /// Apply events in order.
    pub fn apply(&self, before: TrustScore, events: Vec<TrustEvent>) -> TrustUpdate {
        let after = events
            .iter()
            .fold(before, |score, e| score.nudge(e.alpha, e.target));
        TrustUpdate {
            before,
            after,
            events,
        }
    }

    pub fn apply_verification(&self, before: TrustScore, layers: &[LayerResult]) -> TrustUpdate {
        self.apply(before, self.events_for(layers))
    }

    pub fn apply_adjudication(&self, before: TrustScore, outcome: Adjudication) -> TrustUpdate {
        self.apply(before, vec![self.event_for_adjudication(outcome)])
    }
}
