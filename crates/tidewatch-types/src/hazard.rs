// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Hazard Taxonomy and Submission Record
// ─────────────────────────────────────────────────────────────────────

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TidewatchError;

/// Declared category of a hazard observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardType {
    HighWaves,
    RipCurrent,
    StormSurge,
    Flood,
    Tsunami,
    CoastalErosion,
    OilSpill,
    MarineDebris,
    WildlifeStranding,
    WaterPollution,
    Other,
}

impl HazardType {
    pub const COUNT: usize = 11;

    pub const ALL: [HazardType; Self::COUNT] = [
        HazardType::HighWaves,
        HazardType::RipCurrent,
        HazardType::StormSurge,
        HazardType::Flood,
        HazardType::Tsunami,
        HazardType::CoastalErosion,
        HazardType::OilSpill,
        HazardType::MarineDebris,
        HazardType::WildlifeStranding,
        HazardType::WaterPollution,
        HazardType::Other,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HazardType::HighWaves => "high_waves",
            HazardType::RipCurrent => "rip_current",
            HazardType::StormSurge => "storm_surge",
            HazardType::Flood => "flood",
            HazardType::Tsunami => "tsunami",
            HazardType::CoastalErosion => "coastal_erosion",
            HazardType::OilSpill => "oil_spill",
            HazardType::MarineDebris => "marine_debris",
            HazardType::WildlifeStranding => "wildlife_stranding",
            HazardType::WaterPollution => "water_pollution",
            HazardType::Other => "other",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for HazardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HazardType {
    type Err = TidewatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        HazardType::ALL
            .into_iter()
            .find(|h| h.name() == wanted)
            .ok_or_else(|| TidewatchError::UnknownHazard(s.to_string()))
    }
}

/// WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

/// A user-submitted hazard observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub hazard: HazardType,
    pub description: String,
    /// Storage reference of the attached photo, if any.
    pub image_ref: Option<String>,
    pub coordinates: Coordinates,
    pub reporter_id: String,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn has_image(&self) -> bool {
        self.image_ref
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hazard_from_str_variants() {
        assert_eq!("rip_current".parse::<HazardType>().unwrap(), HazardType::RipCurrent);
        assert_eq!("Storm Surge".parse::<HazardType>().unwrap(), HazardType::StormSurge);
        assert_eq!("oil-spill".parse::<HazardType>().unwrap(), HazardType::OilSpill);
    }

    #[test]
    fn test_hazard_unknown() {
        assert!(matches!(
            "volcano".parse::<HazardType>(),
            Err(TidewatchError::UnknownHazard(_))
        ));
    }

    #[test]
    fn test_hazard_index_matches_all() {
        for (i, h) in HazardType::ALL.iter().enumerate() {
            assert_eq!(h.index(), i);
        }
    }

    #[test]
    fn test_hazard_serde_matches_name() {
        for h in HazardType::ALL {
            assert_eq!(serde_json::to_string(&h).unwrap(), format!("\"{}\"", h.name()));
        }
    }

    #[test]
    fn test_coordinates_validity() {
        assert!(Coordinates::new(13.08, 80.29).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -181.0).is_valid());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_blank_image_ref_is_no_image() {
        let mut s = Submission {
            id: "s".into(),
            hazard: HazardType::Flood,
            description: String::new(),
            image_ref: Some("   ".into()),
            coordinates: Coordinates::new(0.0, 0.0),
            reporter_id: "r".into(),
            submitted_at: Utc::now(),
        };
        assert!(!s.has_image());
        s.image_ref = Some("uploads/1.jpg".into());
        assert!(s.has_image());
    }
}
