// ─────────────────────────────────────────────────────────────────────
// Tidewatch — External Evidence Records
// ─────────────────────────────────────────────────────────────────────
//! Read-only inputs produced by collaborators outside the kernel.
//! Every part is optional; evaluators treat absence as "no evidence",
//! never as a negative signal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pre-computed hazard threat classification for the report location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatLevel {
    Warning,
    Alert,
    Watch,
    NoThreat,
}

impl ThreatLevel {
    /// Layer score associated with the threat level.
    pub fn score(self) -> f64 {
        match self {
            ThreatLevel::Warning => 1.0,
            ThreatLevel::Alert => 0.85,
            ThreatLevel::Watch => 0.70,
            ThreatLevel::NoThreat => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatAssessment {
    pub level: ThreatLevel,
    pub confidence: f64,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub wind_speed_kmh: Option<f64>,
    pub gust_kmh: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub pressure_hpa: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarineReading {
    pub wave_height_m: Option<f64>,
    pub swell_period_s: Option<f64>,
    pub sea_level_anomaly_m: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeismicReading {
    pub magnitude: Option<f64>,
    pub depth_km: Option<f64>,
    pub epicenter_distance_km: Option<f64>,
}

/// Environmental snapshot around the report location and time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSnapshot {
    #[serde(default)]
    pub weather: Option<WeatherReading>,
    #[serde(default)]
    pub marine: Option<MarineReading>,
    #[serde(default)]
    pub seismic: Option<SeismicReading>,
    #[serde(default)]
    pub threat: Option<ThreatAssessment>,
    #[serde(default)]
    pub captured_at: Option<DateTime<Utc>>,
}

impl EvidenceSnapshot {
    /// Snapshot with nothing in it.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_threat(level: ThreatLevel, confidence: f64) -> Self {
        Self {
            threat: Some(ThreatAssessment {
                level,
                confidence,
                reason: None,
            }),
            ..Self::default()
        }
    }

    /// True when any raw environmental reading is present.
    pub fn has_environmental_data(&self) -> bool {
        self.weather.is_some() || self.marine.is_some() || self.seismic.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_environmental_data() && self.threat.is_none()
    }
}

/// Result of the text-semantic classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextClassification {
    /// How well the description matches the declared hazard, in [0, 1].
    pub score: f64,
    pub confidence: f64,
    #[serde(default)]
    pub label: Option<String>,
}

/// Refusal issued by the image classifier before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRejection {
    /// e.g. `selfie`, `screenshot`, `unrelated`.
    pub category: String,
    pub reason: String,
}

/// Result of the image classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageClassification {
    pub score: f64,
    pub confidence: f64,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub rejection: Option<ImageRejection>,
}

impl ImageClassification {
    pub fn rejected(category: impl Into<String>, reason: impl Into<String>, confidence: f64) -> Self {
        Self {
            score: 0.0,
            confidence,
            label: None,
            rejection: Some(ImageRejection {
                category: category.into(),
                reason: reason.into(),
            }),
        }
    }
}
