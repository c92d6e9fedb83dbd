// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Verification Kernel Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! Tidewatch kernel, the verification and trust-scoring engine for
//! crowd-sourced coastal hazard reports.

pub mod config;
pub mod error;
pub mod evidence;
pub mod hazard;
pub mod layer;
pub mod score;
pub mod trust;

pub use config::VerificationConfig;
pub use error::{TidewatchError, TidewatchResult};
pub use evidence::{
    EvidenceSnapshot, ImageClassification, ImageRejection, TextClassification, ThreatAssessment,
    ThreatLevel,
};
pub use hazard::{Coordinates, HazardType, Submission};
pub use layer::{Layer, LayerResult, LayerStatus};
pub use score::{Decision, ResultParts, VerificationResult};
pub use trust::{ReporterProfile, TrustScore, TrustTarget};
