use async_trait::async_trait;
use image::RgbImage;
use std::sync::Arc;
use tracing::debug;

use super::config::{AnemiaConfig, PallorEstimatorKind};
use super::Analyzer;
use crate::common::CaptureHandle;
use crate::error::AnalysisError;
use crate::pipeline::media::load_resized;
use crate::pipeline::types::{AnalysisResult, CheckupKind, Finding, RiskLevel};

/// Turns a downsampled capture into a pallor score in [0, 1] (1 = palest).
pub trait PallorEstimator: Send + Sync {
    fn estimate(&self, grid: &RgbImage) -> Result<f32, AnalysisError>;
    fn name(&self) -> &'static str;
}

/// Measures mean red chromaticity r/(r+g+b) over lit pixels.
pub struct RednessEstimator {
    healthy_chromaticity: f32,
    pale_chromaticity: f32,
    min_luma: f32,
}

impl RednessEstimator {
    pub fn new() -> Self {
        Self {
            healthy_chromaticity: 0.45,
            pale_chromaticity: 0.35,
            min_luma: 30.0,
        }
    }

    fn rgb_to_luma(&self, r: u8, g: u8, b: u8) -> f32 {
        // Rec. 709 luminance
        0.2126 * r as f32 + 0.7152 * g as f32 + 0.0722 * b as f32
    }

    fn mean_red_chromaticity(&self, grid: &RgbImage) -> Option<f32> {
        let mut n = 0f32;
        let mut mean = 0f32;

        for px in grid.pixels() {
            let [r, g, b] = px.0;
            if self.rgb_to_luma(r, g, b) < self.min_luma {
                continue;
            }
            let total = r as f32 + g as f32 + b as f32;
            let chroma = r as f32 / total;
            n += 1.0;
            mean += (chroma - mean) / n;
        }

        (n > 0.0).then_some(mean)
    }
}

impl Default for RednessEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl PallorEstimator for RednessEstimator {
    fn estimate(&self, grid: &RgbImage) -> Result<f32, AnalysisError> {
        let redness = self.mean_red_chromaticity(grid).ok_or_else(|| {
            AnalysisError::Processing("capture too dark to measure redness".to_string())
        })?;

        let span = self.healthy_chromaticity - self.pale_chromaticity;
        let pallor = ((self.healthy_chromaticity - redness) / span).clamp(0.0, 1.0);
        debug!("Red chromaticity {:.3} -> pallor {:.3}", redness, pallor);
        Ok(pallor)
    }

    fn name(&self) -> &'static str {
        "RednessEstimator"
    }
}

/// Uniform random score; stands in until a calibrated estimator is chosen.
pub struct RandomPallorEstimator;

impl PallorEstimator for RandomPallorEstimator {
    fn estimate(&self, _grid: &RgbImage) -> Result<f32, AnalysisError> {
        Ok(rand::random::<f32>())
    }

    fn name(&self) -> &'static str {
        "RandomPallorEstimator"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnemiaFinding {
    NormalRedness,
    MildPallor,
    SignificantPallor,
}

impl AnemiaFinding {
    pub fn from_risk(risk: RiskLevel) -> Self {
        match risk {
            RiskLevel::Low => AnemiaFinding::NormalRedness,
            RiskLevel::Moderate => AnemiaFinding::MildPallor,
            RiskLevel::High => AnemiaFinding::SignificantPallor,
        }
    }
}

impl Finding for AnemiaFinding {
    fn risk(&self) -> RiskLevel {
        match self {
            AnemiaFinding::NormalRedness => RiskLevel::Low,
            AnemiaFinding::MildPallor => RiskLevel::Moderate,
            AnemiaFinding::SignificantPallor => RiskLevel::High,
        }
    }

    fn advice(&self) -> &'static str {
        match self {
            AnemiaFinding::NormalRedness => {
                "Your hemoglobin levels appear normal based on visual redness."
            }
            AnemiaFinding::MildPallor => "Mild pallor detected. Consider eating iron-rich foods.",
            AnemiaFinding::SignificantPallor => {
                "Significant pallor detected. Please consult a doctor."
            }
        }
    }
}

pub struct AnemiaAnalyzer {
    config: AnemiaConfig,
    estimator: Arc<dyn PallorEstimator>,
}

impl AnemiaAnalyzer {
    pub fn new(config: AnemiaConfig) -> Self {
        let estimator: Arc<dyn PallorEstimator> = match config.estimator {
            PallorEstimatorKind::Redness => Arc::new(RednessEstimator::new()),
            PallorEstimatorKind::Placeholder => Arc::new(RandomPallorEstimator),
        };
        Self { config, estimator }
    }

    pub fn with_estimator(mut self, estimator: Arc<dyn PallorEstimator>) -> Self {
        self.estimator = estimator;
        self
    }
}

#[async_trait]
impl Analyzer for AnemiaAnalyzer {
    fn kind(&self) -> CheckupKind {
        CheckupKind::Anemia
    }

    fn name(&self) -> &'static str {
        "AnemiaAnalyzer"
    }

    async fn try_analyze(&self, capture: &CaptureHandle) -> Result<AnalysisResult, AnalysisError> {
        let grid = load_resized(capture, self.config.sample_grid).await?;
        let pallor = self.estimator.estimate(&grid)?;
        let finding = AnemiaFinding::from_risk(self.config.thresholds.rising(pallor));

        debug!(
            "{} scored pallor {:.3} -> {:?}",
            self.estimator.name(),
            pallor,
            finding
        );

        Ok(AnalysisResult::from_finding(
            CheckupKind::Anemia,
            &finding,
            self.config.confidence,
        ))
    }
}
