use async_trait::async_trait;
use rand::distr::{weighted::WeightedIndex, Distribution};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::config::{ConditionWeights, RespiratoryConfig};
use super::Analyzer;
use crate::common::CaptureHandle;
use crate::error::AnalysisError;
use crate::pipeline::media::{probe_clip, AudioClip};
use crate::pipeline::types::{AnalysisResult, CheckupKind, RespiratoryCondition};

/// Labels a breathing recording.
pub trait AcousticClassifier: Send + Sync {
    fn classify(&self, clip: &AudioClip) -> Result<RespiratoryCondition, AnalysisError>;
    fn name(&self) -> &'static str;
}

/// Draws a label from fixed weights without listening to the clip.
pub struct WeightedDrawClassifier {
    weights: [f32; 4],
}

impl WeightedDrawClassifier {
    pub fn new(weights: &ConditionWeights) -> Self {
        Self {
            weights: weights.as_array(),
        }
    }
}

impl AcousticClassifier for WeightedDrawClassifier {
    fn classify(&self, _clip: &AudioClip) -> Result<RespiratoryCondition, AnalysisError> {
        let dist = WeightedIndex::new(&self.weights)
            .map_err(|e| AnalysisError::Processing(format!("invalid label weights: {}", e)))?;
        let mut rng = rand::rng();
        Ok(RespiratoryCondition::ALL[dist.sample(&mut rng)])
    }

    fn name(&self) -> &'static str {
        "WeightedDrawClassifier"
    }
}

pub struct RespiratoryAnalyzer {
    processing_delay: Duration,
    classifier: Arc<dyn AcousticClassifier>,
}

impl RespiratoryAnalyzer {
    pub fn new(config: RespiratoryConfig) -> Self {
        Self {
            processing_delay: Duration::from_millis(config.processing_delay_ms),
            classifier: Arc::new(WeightedDrawClassifier::new(&config.weights)),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn AcousticClassifier>) -> Self {
        self.classifier = classifier;
        self
    }
}

#[async_trait]
impl Analyzer for RespiratoryAnalyzer {
    fn kind(&self) -> CheckupKind {
        CheckupKind::Respiratory
    }

    fn name(&self) -> &'static str {
        "RespiratoryAnalyzer"
    }

    async fn try_analyze(&self, capture: &CaptureHandle) -> Result<AnalysisResult, AnalysisError> {
        let clip = probe_clip(capture).await?;
        info!("Analyzing audio: {}", capture.uri());

        // Stands in for PCM decode, mel spectrogram and inference.
        tokio::time::sleep(self.processing_delay).await;

        let condition = self.classifier.classify(&clip)?;
        debug!(
            "{} labelled {} byte clip as {}",
            self.classifier.name(),
            clip.byte_len,
            condition.label()
        );

        Ok(AnalysisResult::from_finding(
            CheckupKind::Respiratory,
            &condition,
            condition.confidence(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{Condition, RiskLevel};
    use std::path::Path;

    fn write_clip(dir: &Path) -> CaptureHandle {
        let path = dir.join("breath.m4a");
        std::fs::write(&path, vec![1u8; 2048]).unwrap();
        CaptureHandle::audio(format!("file://{}", path.display()))
    }

    fn config_with(weights: ConditionWeights) -> RespiratoryConfig {
        RespiratoryConfig {
            processing_delay_ms: 0,
            weights,
        }
    }

    #[tokio::test]
    async fn any_valid_clip_yields_a_known_condition() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = RespiratoryAnalyzer::new(config_with(ConditionWeights::default()));
        let capture = write_clip(dir.path());

        for _ in 0..25 {
            let result = analyzer.analyze(capture.clone()).await;
            assert!(!result.is_fallback());
            let Some(Condition::Respiratory(condition)) = result.condition() else {
                panic!("respiratory result without a condition");
            };
            assert!(RespiratoryCondition::ALL.contains(&condition));
            assert!(!result.advice().is_empty());
            assert_eq!(result.confidence(), condition.confidence());
        }
    }

    #[tokio::test]
    async fn stridor_is_high_risk() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = RespiratoryAnalyzer::new(config_with(ConditionWeights {
            normal: 0.0,
            wheezing: 0.0,
            coughing: 0.0,
            stridor: 1.0,
        }));

        let result = analyzer.analyze(write_clip(dir.path())).await;
        assert_eq!(
            result.condition(),
            Some(Condition::Respiratory(RespiratoryCondition::Stridor))
        );
        assert_eq!(result.risk(), RiskLevel::High);
    }

    #[tokio::test]
    async fn missing_recording_falls_back() {
        let analyzer = RespiratoryAnalyzer::new(config_with(ConditionWeights::default()));
        let result = analyzer
            .analyze(CaptureHandle::audio("/no/such/recording.m4a"))
            .await;
        assert!(result.is_fallback());
        assert_eq!(result.risk(), RiskLevel::Low);
        assert_eq!(result.confidence(), 0.0);
        assert!(result.condition().is_none());
    }

    #[tokio::test]
    async fn image_capture_is_rejected() {
        let analyzer = RespiratoryAnalyzer::new(config_with(ConditionWeights::default()));
        let result = analyzer.analyze(CaptureHandle::image("/tmp/face.jpg")).await;
        assert!(result.is_fallback());
    }
}
