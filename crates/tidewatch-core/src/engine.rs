// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Verification Engine (Orchestrator)
// ─────────────────────────────────────────────────────────────────────
//! Runs the geofence gate, the four parallel layers, scoring, the
//! decision and the trust update for one submission.
//!
//! # Pipeline
//!
//! 1. **Gate**: geofence runs alone. A FAIL ends the pipeline with
//!    AUTO_REJECTED; the other layers are never evaluated.
//! 2. **Lookup**: the reporter profile is read once.
//! 3. **Parallel**: weather, text, image and reporter run concurrently.
//!    Each call has its own deadline; a timeout or panic becomes the
//!    evaluator's degraded fallback.
//! 4. **Score**: weights are redistributed over the layers that were
//!    not skipped, then the composite and decision are computed.
//! 5. **Trust**: text/image signals nudge the reporter's trust, written
//!    once. A failed write is reported, never raised.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures_util::FutureExt;
use serde::Serialize;

use tidewatch_types::{
    EvidenceSnapshot, Layer, LayerResult, ResultParts, Submission, TidewatchError,
    TidewatchResult, TrustScore, VerificationConfig, VerificationResult,
};

use crate::classifier::{ImageClassifier, TextClassifier};
use crate::coastline::CoastlineOracle;
use crate::decision::DecisionEngine;
use crate::directory::ReporterDirectory;
use crate::feedback::{Adjudication, TrustFeedback, TrustUpdate};
use crate::hazards::HazardTable;
use crate::layers::{
    EvaluationContext, GeofenceEvaluator, ImageEvaluator, LayerEvaluator, ReporterEvaluator,
    ReporterLookup, TextEvaluator, WeatherEvaluator,
};
use crate::scorer::composite_score;
use crate::weights::redistribute;

/// External services the engine talks to.
#[derive(Clone)]
pub struct Providers {
    pub coastline: Arc<dyn CoastlineOracle>,
    pub text: Arc<dyn TextClassifier>,
    pub image: Arc<dyn ImageClassifier>,
    pub directory: Arc<dyn ReporterDirectory>,
}

/// What happened to the reporter's trust score after a verification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrustOutcome {
    /// No update was attempted.
    Unchanged { reason: String },
    Persisted { update: TrustUpdate },
    /// Computed but the directory write failed.
    NotPersisted { update: TrustUpdate, reason: String },
}

impl TrustOutcome {
    pub fn persisted(&self) -> bool {
        matches!(self, TrustOutcome::Persisted { .. })
    }

    pub fn update(&self) -> Option<&TrustUpdate> {
        match self {
            TrustOutcome::Unchanged { .. } => None,
            TrustOutcome::Persisted { update } | TrustOutcome::NotPersisted { update, .. } => {
                Some(update)
            }
        }
    }
}

/// Output of `verify` / `reverify`.
#[derive(Debug, Clone, Serialize)]
pub struct Verification {
    pub result: VerificationResult,
    pub trust: TrustOutcome,
}

pub struct VerificationEngine {
    config: VerificationConfig,
    geofence: GeofenceEvaluator,
    weather: WeatherEvaluator,
    text: TextEvaluator,
    image: ImageEvaluator,
    reporter: ReporterEvaluator,
    decisions: DecisionEngine,
    feedback: TrustFeedback,
    directory: Arc<dyn ReporterDirectory>,
}

impl VerificationEngine {
    /// Build an engine. Fails on invalid configuration.
    pub fn new(config: VerificationConfig, providers: Providers) -> TidewatchResult<Self> {
        config.validate()?;
        let hazards = Arc::new(HazardTable::from_rules(&config.hazards));

        Ok(Self {
            geofence: GeofenceEvaluator::new(providers.coastline, config.geofence.clone()),
            weather: WeatherEvaluator::new(Arc::clone(&hazards)),
            text: TextEvaluator::new(providers.text, config.text.clone()),
            image: ImageEvaluator::new(providers.image, config.image.clone()),
            reporter: ReporterEvaluator::new(config.reporter.clone()),
            decisions: DecisionEngine::new(config.thresholds.clone(), hazards),
            feedback: TrustFeedback::new(config.trust.clone()),
            directory: providers.directory,
            config,
        })
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    /// Verify a new submission against an evidence snapshot.
    pub async fn verify(
        &self,
        submission: &Submission,
        evidence: &EvidenceSnapshot,
    ) -> Verification {
        self.run(submission, evidence, None).await
    }

    /// Verify again, producing a new record that supersedes `previous`.
    pub async fn reverify(
        &self,
        previous: &VerificationResult,
        submission: &Submission,
        evidence: &EvidenceSnapshot,
    ) -> TidewatchResult<Verification> {
        if previous.submission_id() != submission.id {
            return Err(TidewatchError::Validation(format!(
                "result {} belongs to submission {}, not {}",
                previous.id(),
                previous.submission_id(),
                submission.id
            )));
        }
        Ok(self.run(submission, evidence, Some(previous.id())).await)
    }

    /// Apply a human verdict to a reporter's trust score.
    pub async fn adjudicate(
        &self,
        reporter_id: &str,
        outcome: Adjudication,
    ) -> TidewatchResult<TrustUpdate> {
        let profile = self
            .directory_call("reporter lookup", self.directory.profile(reporter_id))
            .await?
            .ok_or_else(|| TidewatchError::Validation(format!("unknown reporter {reporter_id}")))?;

        let update = self.feedback.apply_adjudication(profile.trust, outcome);
        self.directory_call(
            "trust write",
            self.directory.store_trust(reporter_id, update.after),
        )
        .await?;

        log::info!(
            "adjudication {outcome:?} for {reporter_id}: trust {} -> {}",
            update.before,
            update.after
        );
        Ok(update)
    }

    async fn run(
        &self,
        submission: &Submission,
        evidence: &EvidenceSnapshot,
        supersedes: Option<uuid::Uuid>,
    ) -> Verification {
        let start = Instant::now();
        let ctx = EvaluationContext::new(submission, evidence);

        // ── Gate ────────────────────────────────────────────────────
        let gate = self.evaluate_guarded(&self.geofence, &ctx).await;
        if gate.is_fail() {
            let result = self.finish(submission, vec![gate], supersedes, start);
            return Verification {
                result,
                trust: TrustOutcome::Unchanged {
                    reason: "rejected at geofence gate".to_string(),
                },
            };
        }

        // ── Lookup ──────────────────────────────────────────────────
        let lookup = self.lookup_reporter(&submission.reporter_id).await;
        let ctx = ctx.with_reporter(&lookup);

        // ── Parallel ────────────────────────────────────────────────
        let (weather, text, image, reporter) = tokio::join!(
            self.evaluate_guarded(&self.weather, &ctx),
            self.evaluate_guarded(&self.text, &ctx),
            self.evaluate_guarded(&self.image, &ctx),
            self.evaluate_guarded(&self.reporter, &ctx),
        );

        let result = self.finish(
            submission,
            vec![gate, weather, text, image, reporter],
            supersedes,
            start,
        );

        // ── Trust ───────────────────────────────────────────────────
        let trust = self
            .update_trust(&submission.reporter_id, &lookup, result.layers())
            .await;

        Verification { result, trust }
    }

    /// Run one evaluator under its deadline, containing panics.
    async fn evaluate_guarded(
        &self,
        evaluator: &dyn LayerEvaluator,
        ctx: &EvaluationContext<'_>,
    ) -> LayerResult {
        let layer = evaluator.layer();
        let deadline_ms = self.config.timeouts.evaluator_ms;
        let guarded = AssertUnwindSafe(evaluator.evaluate(ctx)).catch_unwind();

        let result = match tokio::time::timeout(Duration::from_millis(deadline_ms), guarded).await
        {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => {
                log::error!("{layer} evaluator panicked, using fallback");
                evaluator.fallback(format!("{layer} evaluator failed; neutral score used"))
            }
            Err(_) => {
                let err = TidewatchError::Timeout { layer, deadline_ms };
                log::warn!("{err}; using neutral {layer} score");
                evaluator.fallback(format!("{err}; neutral score used"))
            }
        };

        log::debug!(
            "{layer}: {} score={:.3} conf={:.2}{}",
            result.status,
            result.score,
            result.confidence,
            if result.degraded { " (degraded)" } else { "" }
        );
        result
    }

    async fn lookup_reporter(&self, reporter_id: &str) -> ReporterLookup {
        match self
            .directory_call("reporter lookup", self.directory.profile(reporter_id))
            .await
        {
            Ok(Some(profile)) => ReporterLookup::Found(profile),
            Ok(None) => ReporterLookup::Unknown,
            Err(e) => {
                log::warn!("reporter {reporter_id}: {e}");
                ReporterLookup::Unavailable(e.to_string())
            }
        }
    }

    /// Weight, score and decide over the evaluated layers.
    fn finish(
        &self,
        submission: &Submission,
        mut layers: Vec<LayerResult>,
        supersedes: Option<uuid::Uuid>,
        start: Instant,
    ) -> VerificationResult {
        // Layers never evaluated count as skipped for weighting.
        let skipped: Vec<Layer> = Layer::ALL
            .into_iter()
            .filter(|l| {
                layers
                    .iter()
                    .find(|r| r.layer == *l)
                    .map_or(true, LayerResult::is_skipped)
            })
            .collect();
        let plan = redistribute(&self.config.weights, &skipped);

        let now = Utc::now();
        for r in &mut layers {
            r.weight = plan.weight(r.layer);
            r.timestamp = Some(now);
        }

        let composite = composite_score(&layers);
        let verdict = self
            .decisions
            .decide(composite, &layers, submission.hazard);

        log::info!(
            "submission {}: {} ({}) composite={composite:.1}",
            submission.id,
            verdict.decision,
            verdict.rule
        );

        VerificationResult::new(ResultParts {
            submission_id: submission.id.clone(),
            supersedes,
            composite_score: composite,
            decision: verdict.decision,
            decision_reason: verdict.reason,
            layers,
            weights: plan.weights,
            applicable_layers: plan.applicable,
            skipped_layers: plan.skipped,
            processing_ms: start.elapsed().as_secs_f64() * 1000.0,
        })
    }

    async fn update_trust(
        &self,
        reporter_id: &str,
        lookup: &ReporterLookup,
        layers: &[LayerResult],
    ) -> TrustOutcome {
        let before = match lookup {
            ReporterLookup::Found(profile) => profile.trust,
            ReporterLookup::Unknown => TrustScore::default(),
            ReporterLookup::Unavailable(reason) => {
                return TrustOutcome::Unchanged {
                    reason: format!("reporter profile unavailable: {reason}"),
                }
            }
        };

        let update = self.feedback.apply_verification(before, layers);
        if update.events.is_empty() {
            return TrustOutcome::Unchanged {
                reason: "no text or image signal".to_string(),
            };
        }

        match self
            .directory_call(
                "trust write",
                self.directory.store_trust(reporter_id, update.after),
            )
            .await
        {
            Ok(()) => {
                log::debug!(
                    "reporter {reporter_id}: trust {} -> {}",
                    update.before,
                    update.after
                );
                TrustOutcome::Persisted { update }
            }
            Err(e) => {
                log::error!("reporter {reporter_id}: trust update not persisted: {e}");
                TrustOutcome::NotPersisted {
                    update,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Directory call under the directory deadline.
    async fn directory_call<T>(
        &self,
        what: &str,
        call: impl Future<Output = TidewatchResult<T>>,
    ) -> TidewatchResult<T> {
        let deadline_ms = self.config.timeouts.directory_ms;
        match tokio::time::timeout(Duration::from_millis(deadline_ms), call).await {
            Ok(result) => result,
            Err(_) => Err(TidewatchError::Persistence(format!(
                "{what} timed out after {deadline_ms}ms"
            ))),
        }
    }
}
