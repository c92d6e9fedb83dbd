// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Reporter Trust Score
// ─────────────────────────────────────────────────────────────────────
//! Long-lived reporter credibility on a 0–100 scale.
//!
//! The only way to change a [`TrustScore`] is [`TrustScore::nudge`],
//! which moves it a fraction `alpha` of the remaining distance toward a
//! target. Automated evidence and human adjudication both go through it
//! with different rates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::score::clamp_score;

pub const TRUST_MIN: f64 = 0.0;
pub const TRUST_MAX: f64 = 100.0;

/// Score given to reporters with no profile.
pub const DEFAULT_TRUST: f64 = 50.0;

/// Direction of a trust event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustTarget {
    /// Evidence supported the reporter: move toward 100.
    Up,
    /// Evidence contradicted the reporter: move toward 0.
    Down,
}

impl TrustTarget {
    pub fn value(self) -> f64 {
        match self {
            TrustTarget::Up => TRUST_MAX,
            TrustTarget::Down => TRUST_MIN,
        }
    }
}

/// Reporter credibility in [0, 100], held at two decimals.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct TrustScore(f64);

impl TrustScore {
    pub fn new(value: f64) -> Self {
        Self(round2(clamp_score(value, TRUST_MIN, TRUST_MAX)))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Asymptotic update: `old + alpha * (target - old)`.
    ///
    /// The result is rounded to two decimals and then held between the
    /// old value and the target, so an event never moves the score the
    /// wrong way and never overshoots. With `alpha < 0.5` a score below
    /// 100 never rounds up to 100 (and symmetrically for 0).
    pub fn nudge(self, alpha: f64, target: TrustTarget) -> Self {
        let old = self.0;
        let goal = target.value();
        let alpha = clamp_score(alpha, 0.0, 1.0);
        let raw = round2(old + alpha * (goal - old));
        let bounded = match target {
            TrustTarget::Up => raw.clamp(old, goal),
            TrustTarget::Down => raw.clamp(goal, old),
        };
        Self(clamp_score(bounded, TRUST_MIN, TRUST_MAX))
    }
}

impl Default for TrustScore {
    fn default() -> Self {
        Self::new(DEFAULT_TRUST)
    }
}

impl From<f64> for TrustScore {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<TrustScore> for f64 {
    fn from(score: TrustScore) -> Self {
        score.0
    }
}

impl fmt::Display for TrustScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Historical record of a reporter as kept by the user store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReporterProfile {
    pub total_reports: u32,
    pub verified_reports: u32,
    pub rejected_reports: u32,
    pub trust: TrustScore,
}

impl ReporterProfile {
    pub fn new(total_reports: u32, verified_reports: u32, rejected_reports: u32, trust: f64) -> Self {
        Self {
            total_reports,
            verified_reports,
            rejected_reports,
            trust: TrustScore::new(trust),
        }
    }

    /// Share of past reports that were verified, 0.0 without history.
    pub fn verified_ratio(&self) -> f64 {
        if self.total_reports == 0 {
            return 0.0;
        }
        clamp_score(
            f64::from(self.verified_reports) / f64::from(self.total_reports),
            0.0,
            1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_and_rounds() {
        assert_eq!(TrustScore::new(120.0).value(), 100.0);
        assert_eq!(TrustScore::new(-3.0).value(), 0.0);
        assert_eq!(TrustScore::new(57.126).value(), 57.13);
        assert_eq!(TrustScore::new(f64::NAN).value(), 0.0);
    }

    #[test]
    fn test_nudge_formula() {
        // 50 + 0.1 * (100 - 50) = 55
        assert_eq!(TrustScore::new(50.0).nudge(0.1, TrustTarget::Up).value(), 55.0);
        // 50 + 0.15 * (0 - 50) = 42.5
        assert_eq!(TrustScore::new(50.0).nudge(0.15, TrustTarget::Down).value(), 42.5);
    }

    #[test]
    fn test_up_never_decreases() {
        for start in [0.0, 12.34, 50.0, 99.0, 99.99, 100.0] {
            for alpha in [0.001, 0.025, 0.05, 0.1, 0.15, 0.49] {
                let s = TrustScore::new(start);
                assert!(s.nudge(alpha, TrustTarget::Up).value() >= s.value());
            }
        }
    }

    #[test]
    fn test_down_never_increases() {
        for start in [0.0, 0.01, 12.34, 50.0, 100.0] {
            for alpha in [0.001, 0.025, 0.05, 0.1, 0.15, 0.49] {
                let s = TrustScore::new(start);
                assert!(s.nudge(alpha, TrustTarget::Down).value() <= s.value());
            }
        }
    }

    #[test]
    fn test_repeated_up_never_reaches_max() {
        let mut s = TrustScore::new(90.0);
        for _ in 0..10_000 {
            s = s.nudge(0.05, TrustTarget::Up);
        }
        assert!(s.value() < 100.0);
        assert!(s.value() > 99.0);
    }

    #[test]
    fn test_step_shrinks_near_target() {
        let far = TrustScore::new(20.0);
        let near = TrustScore::new(80.0);
        let step_far = far.nudge(0.1, TrustTarget::Up).value() - far.value();
        let step_near = near.nudge(0.1, TrustTarget::Up).value() - near.value();
        assert!(step_near < step_far);
    }

    #[test]
    fn test_serde_as_plain_number() {
        let s = TrustScore::new(72.5);
        assert_eq!(serde_json::to_string(&s).unwrap(), "72.5");
        let back: TrustScore = serde_json::from_str("150").unwrap();
        assert_eq!(back.value(), 100.0);
    }

    #[test]
    fn test_verified_ratio() {
        assert_eq!(ReporterProfile::new(0, 0, 0, 50.0).verified_ratio(), 0.0);
        assert_eq!(ReporterProfile::new(10, 7, 3, 50.0).verified_ratio(), 0.7);
    }
}
