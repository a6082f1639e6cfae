use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk or severity tier shared by every analyzer. Ordered Low < Moderate < High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two cut points splitting a score in [0, 1] into three tiers.
///
/// A score sitting exactly on a cut point always lands in the lower-risk tier,
/// whichever direction the score runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub lower: f32,
    pub upper: f32,
}

impl TierThresholds {
    pub fn new(lower: f32, upper: f32) -> Self {
        Self { lower, upper }
    }

    /// Higher score means higher risk (e.g. pallor).
    pub fn rising(&self, score: f32) -> RiskLevel {
        if score > self.upper {
            RiskLevel::High
        } else if score > self.lower {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    /// Lower score means higher risk (e.g. alertness).
    pub fn falling(&self, score: f32) -> RiskLevel {
        if score < self.lower {
            RiskLevel::High
        } else if score < self.upper {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let in_range = |v: f32| (0.0..=1.0).contains(&v);
        if !in_range(self.lower) || !in_range(self.upper) {
            return Err("Thresholds must be between 0.0 and 1.0".to_string());
        }
        if self.lower > self.upper {
            return Err(format!(
                "Lower threshold {} is above upper threshold {}",
                self.lower, self.upper
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn tiers_are_ordered() {
        assert!(RiskLevel::Low < RiskLevel::Moderate);
        assert!(RiskLevel::Moderate < RiskLevel::High);
    }

    #[test]
    fn boundary_scores_fall_to_lower_risk() {
        let alertness = TierThresholds::new(0.3, 0.6);
        assert_eq!(alertness.falling(0.3), RiskLevel::Moderate);
        assert_eq!(alertness.falling(0.6), RiskLevel::Low);
        assert_eq!(alertness.falling(0.29), RiskLevel::High);

        let pallor = TierThresholds::new(0.33, 0.66);
        assert_eq!(pallor.rising(0.33), RiskLevel::Low);
        assert_eq!(pallor.rising(0.66), RiskLevel::Moderate);
        assert_eq!(pallor.rising(0.67), RiskLevel::High);
    }

    #[test]
    fn validate_rejects_inverted_or_out_of_range() {
        assert!(TierThresholds::new(0.6, 0.3).validate().is_err());
        assert!(TierThresholds::new(-0.1, 0.3).validate().is_err());
        assert!(TierThresholds::new(0.3, 1.2).validate().is_err());
        assert!(TierThresholds::new(0.3, 0.6).validate().is_ok());
    }

    proptest! {
        #[test]
        fn rising_tier_never_drops_as_score_grows(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            let t = TierThresholds::new(0.33, 0.66);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(t.rising(lo) <= t.rising(hi));
        }

        #[test]
        fn falling_tier_never_rises_as_score_grows(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            let t = TierThresholds::new(0.3, 0.6);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(t.falling(lo) >= t.falling(hi));
        }
    }
}
