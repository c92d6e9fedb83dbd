// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Verification Kernel Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

use crate::layer::Layer;

/// Root error type for all Tidewatch kernel failures.
///
/// Only the configuration variants are fatal. Evidence and timeout
/// errors are converted into degraded layer results by the evaluators
/// and never reach the submitter.
#[derive(Error, Debug)]
pub enum TidewatchError {
    /// An evidence provider could not produce a result.
    #[error("{layer} evidence unavailable: {reason}")]
    EvidenceUnavailable { layer: Layer, reason: String },

    /// An evaluator exceeded its deadline.
    #[error("timeout: {layer} evaluation exceeded {deadline_ms}ms deadline")]
    Timeout { layer: Layer, deadline_ms: u64 },

    /// Configuration error (weights, thresholds, trust rates).
    #[error("config error: {0}")]
    Config(String),

    /// A layer name did not match any known layer.
    #[error("unknown layer: {0:?}")]
    UnknownLayer(String),

    /// A hazard type name did not match any known hazard type.
    #[error("unknown hazard type: {0:?}")]
    UnknownHazard(String),

    /// Reporter directory read or write failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Invalid caller input.
    #[error("validation error: {0}")]
    Validation(String),
}

impl TidewatchError {
    /// True for errors that must stop the engine from starting.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::UnknownLayer(_) | Self::UnknownHazard(_)
        )
    }
}

pub type TidewatchResult<T> = Result<T, TidewatchError>;
