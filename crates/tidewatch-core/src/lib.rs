// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Verification Kernel Core Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Multi-layer verification and reporter trust scoring for
//! crowd-sourced coastal hazard reports.
//!
//! # Invariants
//!
//! 1. **The geofence is a hard gate**: a geofence FAIL always yields
//!    AUTO_REJECTED, whatever the other layers would have said. No other
//!    layer can short-circuit the pipeline.
//!
//! 2. **Missing evidence is neutral, not negative**: skipped layers have
//!    their weight redistributed, and provider failures, timeouts and
//!    panics become degraded neutral results. Only invalid configuration
//!    is a hard error.
//!
//! 3. **Scores are bounded**: the composite stays in [0, 100] and trust
//!    scores stay in [0, 100]. Non-finite values are clamped.
//!
//! 4. **Trust moves toward its target, never past it**: every update is
//!    `old + α·(target − old)`, and degraded results carry no signal.

pub mod classifier;
pub mod coastline;
pub mod decision;
pub mod directory;
pub mod engine;
pub mod feedback;
pub mod hazards;
pub mod layers;
pub mod scorer;
pub mod weights;

pub use classifier::{
    ExternalImageClassifier, ExternalTextClassifier, HeuristicTextClassifier, ImageClassifier,
    TextClassifier,
};
pub use coastline::{CoastlineOracle, CoastlinePoints, ExternalCoastline, FixedDistance};
pub use decision::{DecisionEngine, DecisionRule, Verdict};
pub use directory::{InMemoryDirectory, ReporterDirectory, UnavailableDirectory};
pub use engine::{Providers, TrustOutcome, Verification, VerificationEngine};
pub use feedback::{Adjudication, TrustEvent, TrustFeedback, TrustSource, TrustUpdate};
pub use hazards::{HazardProfile, HazardTable};
pub use layers::{EvaluationContext, LayerEvaluator, ReporterLookup};
pub use scorer::composite_score;
pub use weights::{redistribute, WeightPlan};
