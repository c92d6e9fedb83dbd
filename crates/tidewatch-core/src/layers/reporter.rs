// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Reporter History Layer
// ─────────────────────────────────────────────────────────────────────

use async_trait::async_trait;
use serde_json::json;

use tidewatch_types::config::ReporterRules;
use tidewatch_types::{Layer, LayerResult, ReporterProfile};

use super::{EvaluationContext, LayerEvaluator, ReporterLookup, NEUTRAL_SCORE};

/// Confidence for reporters without history.
const NEUTRAL_REPORTER_CONFIDENCE: f64 = 0.5;

/// Scores the submitter's track record.
///
/// `score = 0.4 * verified_ratio + 0.6 * trust / 100` with the default
/// rules. Reporters without history get a neutral score and are never
/// penalized for it.
pub struct ReporterEvaluator {
    rules: ReporterRules,
}

impl ReporterEvaluator {
    pub fn new(rules: ReporterRules) -> Self {
        Self { rules }
    }

    fn neutral(reasoning: &str) -> LayerResult {
        LayerResult::pass(
            Layer::Reporter,
            NEUTRAL_SCORE,
            NEUTRAL_REPORTER_CONFIDENCE,
            reasoning,
        )
    }

    fn judge(&self, profile: &ReporterProfile) -> LayerResult {
        if profile.total_reports == 0 {
            return Self::neutral("no reporting history; neutral default");
        }
        let ratio = profile.verified_ratio();
        let trust = profile.trust.value() / 100.0;
        let score = self.rules.verified_ratio_weight * ratio + self.rules.trust_weight * trust;
        let confidence = (0.5 + f64::from(profile.total_reports) / 20.0).min(1.0);
        LayerResult::judged(
            Layer::Reporter,
            score,
            self.rules.pass_score,
            confidence,
            format!(
                "{}/{} reports verified, trust {}",
                profile.verified_reports, profile.total_reports, profile.trust
            ),
        )
        .with_evidence(json!({
            "total_reports": profile.total_reports,
            "verified_reports": profile.verified_reports,
            "rejected_reports": profile.rejected_reports,
            "trust_score": profile.trust,
        }))
    }
}

#[async_trait]
impl LayerEvaluator for ReporterEvaluator {
    fn layer(&self) -> Layer {
        Layer::Reporter
    }

    async fn evaluate(&self, ctx: &EvaluationContext<'_>) -> LayerResult {
        match ctx.reporter {
            Some(ReporterLookup::Found(profile)) => self.judge(profile),
            Some(ReporterLookup::Unknown) | None => {
                Self::neutral("unknown reporter; neutral default")
            }
            Some(ReporterLookup::Unavailable(reason)) => self.fallback(format!(
                "reporter history unavailable: {reason}; neutral default"
            )),
        }
    }

    fn fallback(&self, reason: String) -> LayerResult {
        LayerResult::degraded(
            Layer::Reporter,
            NEUTRAL_SCORE,
            NEUTRAL_REPORTER_CONFIDENCE,
            reason,
        )
    }
}
