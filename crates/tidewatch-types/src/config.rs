// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Verification Kernel Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{TidewatchError, TidewatchResult};
use crate::hazard::HazardType;
use crate::layer::Layer;

const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Base weight of each evidence layer. Must sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayerWeights {
    pub geofence: f64,
    pub weather: f64,
    pub text: f64,
    pub image: f64,
    pub reporter: f64,
}

impl Default for LayerWeights {
    fn default() -> Self {
        Self {
            geofence: 0.10,
            weather: 0.25,
            text: 0.25,
            image: 0.35,
            reporter: 0.05,
        }
    }
}

impl LayerWeights {
    pub fn get(&self, layer: Layer) -> f64 {
        match layer {
            Layer::Geofence => self.geofence,
            Layer::Weather => self.weather,
            Layer::Text => self.text,
            Layer::Image => self.image,
            Layer::Reporter => self.reporter,
        }
    }

    pub fn total(&self) -> f64 {
        Layer::ALL.iter().map(|l| self.get(*l)).sum()
    }

    pub fn validate(&self) -> TidewatchResult<()> {
        for layer in Layer::ALL {
            let w = self.get(layer);
            if !w.is_finite() || !(0.0..=1.0).contains(&w) {
                return Err(TidewatchError::Config(format!(
                    "weight for {layer} must be in [0, 1], got {w}"
                )));
            }
        }
        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(TidewatchError::Config(format!(
                "layer weights must sum to 1.0, got {total}"
            )));
        }
        Ok(())
    }
}

/// Composite-score thresholds and override limits for the decision engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecisionThresholds {
    /// Composite >= this is auto-approved.
    /// Default: 85.0.
    pub auto_approve: f64,

    /// Composite >= this goes to manual review.
    /// Default: 40.0.
    pub manual_review: f64,

    /// Text and image both failing below this score is treated as spam.
    /// Default: 0.2.
    pub spam_score_ceiling: f64,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            auto_approve: 85.0,
            manual_review: 40.0,
            spam_score_ceiling: 0.2,
        }
    }
}

/// Description length rules for the text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextRules {
    /// Trimmed descriptions shorter than this fail without classification.
    /// Default: 10 characters.
    pub min_length: usize,

    /// Descriptions shorter than this are classified with a penalty.
    /// Default: 30 characters.
    pub short_length: usize,

    /// Multiplier applied to the classifier score of short descriptions.
    /// Default: 0.6.
    pub short_penalty: f64,

    /// Fixed score for descriptions below `min_length`.
    /// Default: 0.1.
    pub too_short_score: f64,

    /// Minimum score for a PASS.
    /// Default: 0.5.
    pub pass_score: f64,
}

impl Default for TextRules {
    fn default() -> Self {
        Self {
            min_length: 10,
            short_length: 30,
            short_penalty: 0.6,
            too_short_score: 0.1,
            pass_score: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeofenceRules {
    /// Reports farther inland than this are outside the coastal zone.
    /// Default: 10.0 km.
    pub inland_threshold_km: f64,
}

impl Default for GeofenceRules {
    fn default() -> Self {
        Self {
            inland_threshold_km: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageRules {
    /// Minimum classifier score for a PASS.
    /// Default: 0.5.
    pub pass_score: f64,
}

impl Default for ImageRules {
    fn default() -> Self {
        Self { pass_score: 0.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReporterRules {
    /// Weight of the verified-report ratio. Default: 0.4.
    pub verified_ratio_weight: f64,
    /// Weight of the normalized trust score. Default: 0.6.
    pub trust_weight: f64,
    /// Minimum score for a PASS. Default: 0.4.
    pub pass_score: f64,
}

impl Default for ReporterRules {
    fn default() -> Self {
        Self {
            verified_ratio_weight: 0.4,
            trust_weight: 0.6,
            pass_score: 0.4,
        }
    }
}

/// Learning rates for the asymptotic trust update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrustRates {
    /// Automated text-layer outcome. Default: 0.025.
    pub text_alpha: f64,
    /// Automated image-layer outcome. Default: 0.05.
    pub image_alpha: f64,
    /// Human confirmation of a report. Default: 0.10.
    pub confirm_alpha: f64,
    /// Human rejection of a report. Default: 0.15.
    pub reject_alpha: f64,
}

impl Default for TrustRates {
    fn default() -> Self {
        Self {
            text_alpha: 0.025,
            image_alpha: 0.05,
            confirm_alpha: 0.10,
            reject_alpha: 0.15,
        }
    }
}

impl TrustRates {
    fn validate(&self) -> TidewatchResult<()> {
        for (name, alpha) in [
            ("text_alpha", self.text_alpha),
            ("image_alpha", self.image_alpha),
            ("confirm_alpha", self.confirm_alpha),
            ("reject_alpha", self.reject_alpha),
        ] {
            if !(alpha > 0.0 && alpha < 0.5) {
                return Err(TidewatchError::Config(format!(
                    "{name} must be in (0, 0.5), got {alpha}"
                )));
            }
        }
        Ok(())
    }
}

/// Which hazard types each optional layer applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HazardRules {
    /// Hazard types checked against environmental data.
    pub natural: Vec<HazardType>,
    /// Hazard types that cannot be auto-approved without a photo.
    pub visual_confirmation: Vec<HazardType>,
}

impl Default for HazardRules {
    fn default() -> Self {
        Self {
            natural: vec![
                HazardType::HighWaves,
                HazardType::RipCurrent,
                HazardType::StormSurge,
                HazardType::Flood,
                HazardType::Tsunami,
            ],
            visual_confirmation: vec![
                HazardType::OilSpill,
                HazardType::MarineDebris,
                HazardType::WildlifeStranding,
            ],
        }
    }
}

/// Runtime configuration for the verification engine.
///
/// Loaded once at startup and handed to the engine by value; nothing in
/// the kernel reads configuration from global state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerificationConfig {
    pub weights: LayerWeights,
    pub thresholds: DecisionThresholds,
    pub text: TextRules,
    pub geofence: GeofenceRules,
    pub image: ImageRules,
    pub reporter: ReporterRules,
    pub trust: TrustRates,
    pub hazards: HazardRules,
    pub timeouts: Timeouts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timeouts {
    /// Deadline for each evaluator call.
    /// Default: 3000 ms.
    pub evaluator_ms: u64,
    /// Deadline for reporter directory reads and writes.
    /// Default: 1000 ms.
    pub directory_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            evaluator_ms: 3000,
            directory_ms: 1000,
        }
    }
}

fn unit_interval(name: &str, value: f64) -> TidewatchResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(TidewatchError::Config(format!(
            "{name} must be in [0, 1], got {value}"
        )));
    }
    Ok(())
}

impl VerificationConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> TidewatchResult<()> {
        self.weights.validate()?;

        let t = &self.thresholds;
        if !(0.0..=100.0).contains(&t.manual_review) || !(0.0..=100.0).contains(&t.auto_approve) {
            return Err(TidewatchError::Config(format!(
                "thresholds must be in [0, 100], got manual_review={} auto_approve={}",
                t.manual_review, t.auto_approve
            )));
        }
        if t.manual_review > t.auto_approve {
            return Err(TidewatchError::Config(format!(
                "manual_review ({}) must not exceed auto_approve ({})",
                t.manual_review, t.auto_approve
            )));
        }
        unit_interval("spam_score_ceiling", t.spam_score_ceiling)?;

        let text = &self.text;
        if text.min_length > text.short_length {
            return Err(TidewatchError::Config(format!(
                "text.min_length ({}) must not exceed text.short_length ({})",
                text.min_length, text.short_length
            )));
        }
        unit_interval("text.short_penalty", text.short_penalty)?;
        unit_interval("text.too_short_score", text.too_short_score)?;
        unit_interval("text.pass_score", text.pass_score)?;
        unit_interval("image.pass_score", self.image.pass_score)?;

        if !(self.geofence.inland_threshold_km > 0.0) {
            return Err(TidewatchError::Config(format!(
                "geofence.inland_threshold_km must be > 0, got {}",
                self.geofence.inland_threshold_km
            )));
        }

        let r = &self.reporter;
        unit_interval("reporter.verified_ratio_weight", r.verified_ratio_weight)?;
        unit_interval("reporter.trust_weight", r.trust_weight)?;
        if (r.verified_ratio_weight + r.trust_weight - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(TidewatchError::Config(format!(
                "reporter weights must sum to 1.0, got {} + {}",
                r.verified_ratio_weight, r.trust_weight
            )));
        }
        unit_interval("reporter.pass_score", r.pass_score)?;

        self.trust.validate()?;

        if self.timeouts.evaluator_ms == 0 || self.timeouts.directory_ms == 0 {
            return Err(TidewatchError::Config(
                "timeouts must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Load from JSON string. Missing sections take their defaults;
    /// unknown keys are rejected.
    pub fn from_json(json: &str) -> TidewatchResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TidewatchError::Config(format!("JSON parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        VerificationConfig::default().validate().unwrap();
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((LayerWeights::default().total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weights_not_summing_rejected() {
        let mut c = VerificationConfig::default();
        c.weights.image = 0.5;
        let err = c.validate().unwrap_err();
        assert!(err.to_string().contains("sum to 1.0"));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut c = VerificationConfig::default();
        c.weights.geofence = -0.1;
        c.weights.image = 0.55;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_threshold_inversion_rejected() {
        let mut c = VerificationConfig::default();
        c.thresholds.manual_review = 90.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_alpha_out_of_range_rejected() {
        let mut c = VerificationConfig::default();
        c.trust.reject_alpha = 0.5;
        assert!(c.validate().is_err());
        c.trust.reject_alpha = 0.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let c = VerificationConfig::from_json(
            r#"{"thresholds": {"auto_approve": 90.0, "manual_review": 50.0, "spam_score_ceiling": 0.2}}"#,
        )
        .unwrap();
        assert_eq!(c.thresholds.auto_approve, 90.0);
        assert_eq!(c.weights, LayerWeights::default());
    }

    #[test]
    fn test_from_json_unknown_layer_rejected() {
        let err = VerificationConfig::from_json(
            r#"{"weights": {"geofence": 0.1, "weather": 0.25, "text": 0.25, "image": 0.35, "radar": 0.05}}"#,
        )
        .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_from_json_bad_sum_rejected() {
        assert!(VerificationConfig::from_json(
            r#"{"weights": {"geofence": 0.2, "weather": 0.25, "text": 0.25, "image": 0.35, "reporter": 0.05}}"#,
        )
        .is_err());
    }

    #[test]
    fn test_from_json_partial_section() {
        let c = VerificationConfig::from_json(r#"{"hazards": {"natural": ["flood"]}}"#).unwrap();
        assert_eq!(c.hazards.natural, vec![HazardType::Flood]);
        assert_eq!(
            c.hazards.visual_confirmation,
            HazardRules::default().visual_confirmation
        );

        let c = VerificationConfig::from_json(r#"{"timeouts": {"evaluator_ms": 500}}"#).unwrap();
        assert_eq!(c.timeouts.evaluator_ms, 500);
        assert_eq!(c.timeouts.directory_ms, 1000);
    }

    #[test]
    fn test_from_json_section_typo_rejected() {
        assert!(VerificationConfig::from_json(r#"{"timeouts": {"evaluator": 500}}"#).is_err());
    }

    #[test]
    fn test_reporter_weights_each_in_unit_interval() {
        let mut c = VerificationConfig::default();
        c.reporter.verified_ratio_weight = 1.5;
        c.reporter.trust_weight = -0.5;
        assert!(matches!(c.validate(), Err(TidewatchError::Config(_))));
    }

    #[test]
    fn test_from_json_garbage() {
        assert!(VerificationConfig::from_json("not json").is_err());
    }
}
