use serde::{Deserialize, Serialize};

use crate::pipeline::types::TierThresholds;

/// Tunables for the anemia (pallor) analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnemiaConfig {
    /// Side of the square grid the capture is downsampled to before averaging.
    pub sample_grid: u32,
    pub thresholds: TierThresholds,
    pub estimator: PallorEstimatorKind,
    pub confidence: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PallorEstimatorKind {
    Redness,
    Placeholder,
}

impl Default for AnemiaConfig {
    fn default() -> Self {
        Self {
            sample_grid: 100,
            thresholds: TierThresholds::new(0.33, 0.66),
            estimator: PallorEstimatorKind::Redness,
            confidence: 0.85,
        }
    }
}

impl AnemiaConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_grid == 0 {
            return Err("Anemia sample grid must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err("Anemia confidence must be between 0.0 and 1.0".to_string());
        }
        self.thresholds
            .validate()
            .map_err(|e| format!("Anemia thresholds: {}", e))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinConfig {
    pub model_load_delay_ms: u64,
    /// Square input size expected by the classifier.
    pub input_size: u32,
    pub confidence_min: f32,
    pub confidence_max: f32,
}

impl Default for SkinConfig {
    fn default() -> Self {
        Self {
            model_load_delay_ms: 1_000,
            input_size: 224,
            confidence_min: 0.75,
            confidence_max: 0.95,
        }
    }
}

impl SkinConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.input_size == 0 {
            return Err("Skin model input size must be greater than 0".to_string());
        }
        let unit = 0.0..=1.0;
        if !unit.contains(&self.confidence_min) || !unit.contains(&self.confidence_max) {
            return Err("Skin confidence band must lie within 0.0 and 1.0".to_string());
        }
        if self.confidence_min >= self.confidence_max {
            return Err("Skin confidence band must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RespiratoryConfig {
    pub processing_delay_ms: u64,
    pub weights: ConditionWeights,
}

/// Relative draw weights for the placeholder acoustic classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionWeights {
    pub normal: f32,
    pub wheezing: f32,
    pub coughing: f32,
    pub stridor: f32,
}

impl Default for ConditionWeights {
    fn default() -> Self {
        Self {
            normal: 0.70,
            wheezing: 0.15,
            coughing: 0.10,
            stridor: 0.05,
        }
    }
}

impl ConditionWeights {
    /// Weights in `RespiratoryCondition::ALL` order.
    pub fn as_array(&self) -> [f32; 4] {
        [self.normal, self.wheezing, self.coughing, self.stridor]
    }
}

impl Default for RespiratoryConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: 2_000,
            weights: ConditionWeights::default(),
        }
    }
}

impl RespiratoryConfig {
    pub fn validate(&self) -> Result<(), String> {
        let weights = self.weights.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err("Respiratory weights must be finite and non-negative".to_string());
        }
        if weights.iter().all(|w| *w == 0.0) {
            return Err("At least one respiratory weight must be positive".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DehydrationConfig {
    /// Alertness cut points; below `lower` is High risk, below `upper` Moderate.
    pub thresholds: TierThresholds,
}

impl Default for DehydrationConfig {
    fn default() -> Self {
        Self {
            thresholds: TierThresholds::new(0.3, 0.6),
        }
    }
}

impl DehydrationConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.thresholds
            .validate()
            .map_err(|e| format!("Dehydration thresholds: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(AnemiaConfig::default().validate().is_ok());
        assert!(SkinConfig::default().validate().is_ok());
        assert!(RespiratoryConfig::default().validate().is_ok());
        assert!(DehydrationConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_settings() {
        let anemia = AnemiaConfig {
            sample_grid: 0,
            ..AnemiaConfig::default()
        };
        assert!(anemia.validate().is_err());

        let skin = SkinConfig {
            confidence_min: 0.9,
            confidence_max: 0.9,
            ..SkinConfig::default()
        };
        assert!(skin.validate().is_err());

        let respiratory = RespiratoryConfig {
            weights: ConditionWeights {
                normal: 0.0,
                wheezing: 0.0,
                coughing: 0.0,
                stridor: 0.0,
            },
            ..RespiratoryConfig::default()
        };
        assert!(respiratory.validate().is_err());
    }

    #[test]
    fn rejects_nan_confidence_band() {
        let low_nan = SkinConfig {
            confidence_min: f32::NAN,
            ..SkinConfig::default()
        };
        assert!(low_nan.validate().is_err());

        let high_nan = SkinConfig {
            confidence_max: f32::NAN,
            ..SkinConfig::default()
        };
        assert!(high_nan.validate().is_err());
    }
}
