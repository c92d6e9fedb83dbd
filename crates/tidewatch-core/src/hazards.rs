// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Hazard Applicability Table
// ─────────────────────────────────────────────────────────────────────
//! Per-hazard layer applicability, resolved once from configuration
//! into an array indexed by `HazardType`.

use tidewatch_types::config::HazardRules;
use tidewatch_types::HazardType;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HazardProfile {
    /// Weather layer applies (natural hazard).
    pub weather_applicable: bool,
    /// Auto-approval needs a photo.
    pub requires_visual_confirmation: bool,
}

#[derive(Debug, Clone)]
pub struct HazardTable {
    profiles: [HazardProfile; HazardType::COUNT],
}

impl HazardTable {
    pub fn from_rules(rules: &HazardRules) -> Self {
        let mut profiles = [HazardProfile::default(); HazardType::COUNT];
        for hazard in &rules.natural {
            profiles[hazard.index()].weather_applicable = true;
        }
        for hazard in &rules.visual_confirmation {
            profiles[hazard.index()].requires_visual_confirmation = true;
        }
        Self { profiles }
    }

    pub fn profile(&self, hazard: HazardType) -> HazardProfile {
        self.profiles[hazard.index()]
    }

    pub fn weather_applicable(&self, hazard: HazardType) -> bool {
        self.profile(hazard).weather_applicable
    }

    pub fn requires_visual_confirmation(&self, hazard: HazardType) -> bool {
        self.profile(hazard).requires_visual_confirmation
    }
}

impl Default for HazardTable {
    fn default() -> Self {
        Self::from_rules(&HazardRules::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_natural_hazards() {
        let table = HazardTable::default();
        for h in [
            HazardType::HighWaves,
            HazardType::RipCurrent,
            HazardType::StormSurge,
            HazardType::Flood,
            HazardType::Tsunami,
        ] {
            assert!(table.weather_applicable(h), "{h} should be natural");
        }
        assert!(!table.weather_applicable(HazardType::OilSpill));
        assert!(!table.weather_applicable(HazardType::Other));
    }

    #[test]
    fn test_default_visual_confirmation() {
        let table = HazardTable::default();
        assert!(table.requires_visual_confirmation(HazardType::OilSpill));
        assert!(!table.requires_visual_confirmation(HazardType::Flood));
    }

    #[test]
    fn test_custom_rules() {
        let table = HazardTable::from_rules(&HazardRules {
            natural: vec![HazardType::CoastalErosion],
            visual_confirmation: vec![],
        });
        assert!(table.weather_applicable(HazardType::CoastalErosion));
        assert!(!table.weather_applicable(HazardType::Flood));
        assert!(!table.requires_visual_confirmation(HazardType::OilSpill));
    }
}
