use async_trait::async_trait;
use image::DynamicImage;
use std::sync::Arc;
use tracing::debug;

use super::config::DehydrationConfig;
use super::Analyzer;
use crate::common::CaptureHandle;
use crate::error::AnalysisError;
use crate::pipeline::media::load_image;
use crate::pipeline::types::{AnalysisResult, CheckupKind, Finding, RiskLevel, TierThresholds};

/// Per-face classification probabilities. Missing values count as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FaceObservation {
    pub left_eye_open: Option<f32>,
    pub right_eye_open: Option<f32>,
    pub smiling: Option<f32>,
}

impl FaceObservation {
    pub fn new(left_eye_open: f32, right_eye_open: f32, smiling: f32) -> Self {
        Self {
            left_eye_open: Some(left_eye_open),
            right_eye_open: Some(right_eye_open),
            smiling: Some(smiling),
        }
    }

    /// Unweighted mean of both eye-open probabilities and the smile probability.
    pub fn alertness(&self) -> f32 {
        let left = self.left_eye_open.unwrap_or(0.0);
        let right = self.right_eye_open.unwrap_or(0.0);
        let smiling = self.smiling.unwrap_or(0.0);
        (left + right + smiling) / 3.0
    }
}

/// On-device face detection with landmark classification.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<FaceObservation>, AnalysisError>;
    fn name(&self) -> &'static str;
}

/// Whether a face detector exists on this device, decided once up front.
#[derive(Clone)]
pub enum FaceDetection {
    Available(Arc<dyn FaceDetector>),
    Unsupported { reason: String },
}

impl FaceDetection {
    pub fn available(detector: Arc<dyn FaceDetector>) -> Self {
        FaceDetection::Available(detector)
    }

    pub fn unsupported(reason: impl Into<String>) -> Self {
        FaceDetection::Unsupported {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, FaceDetection::Available(_))
    }

    fn detector(&self) -> Result<Arc<dyn FaceDetector>, AnalysisError> {
        match self {
            FaceDetection::Available(detector) => Ok(Arc::clone(detector)),
            FaceDetection::Unsupported { reason } => {
                Err(AnalysisError::CapabilityUnavailable(reason.clone()))
            }
        }
    }
}

impl Default for FaceDetection {
    fn default() -> Self {
        FaceDetection::unsupported("no face detector is installed on this device")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationFinding {
    Alert,
    Tired,
    Fatigued,
}

impl HydrationFinding {
    pub fn from_risk(risk: RiskLevel) -> Self {
        match risk {
            RiskLevel::Low => HydrationFinding::Alert,
            RiskLevel::Moderate => HydrationFinding::Tired,
            RiskLevel::High => HydrationFinding::Fatigued,
        }
    }

    pub fn confidence(&self) -> f32 {
        match self {
            HydrationFinding::Alert => 0.9,
            HydrationFinding::Tired => 0.7,
            HydrationFinding::Fatigued => 0.8,
        }
    }
}

impl Finding for HydrationFinding {
    fn risk(&self) -> RiskLevel {
        match self {
            HydrationFinding::Alert => RiskLevel::Low,
            HydrationFinding::Tired => RiskLevel::Moderate,
            HydrationFinding::Fatigued => RiskLevel::High,
        }
    }

    fn advice(&self) -> &'static str {
        match self {
            HydrationFinding::Alert => "Face looks alert and hydrated.",
            HydrationFinding::Tired => "You seem tired. Drink water and rest.",
            HydrationFinding::Fatigued => {
                "Signs of fatigue and drowsiness detected. Please hydrate immediately."
            }
        }
    }
}

pub struct DehydrationAnalyzer {
    thresholds: TierThresholds,
    detection: FaceDetection,
}

impl DehydrationAnalyzer {
    pub fn new(config: DehydrationConfig, detection: FaceDetection) -> Self {
        Self {
            thresholds: config.thresholds,
            detection,
        }
    }

    pub fn assess(&self, face: &FaceObservation) -> HydrationFinding {
        HydrationFinding::from_risk(self.thresholds.falling(face.alertness()))
    }
}

#[async_trait]
impl Analyzer for DehydrationAnalyzer {
    fn kind(&self) -> CheckupKind {
        CheckupKind::Dehydration
    }

    fn name(&self) -> &'static str {
        "DehydrationAnalyzer"
    }

    async fn try_analyze(&self, capture: &CaptureHandle) -> Result<AnalysisResult, AnalysisError> {
        let detector = self.detection.detector()?;
        let image = load_image(capture).await?;

        let detector_name = detector.name();
        let faces = tokio::task::spawn_blocking(move || detector.detect(&image)).await??;
        let face = faces.first().ok_or(AnalysisError::NoFaceDetected)?;

        let finding = self.assess(face);
        debug!(
            "{} found {} face(s), alertness {:.3} -> {:?}",
            detector_name,
            faces.len(),
            face.alertness(),
            finding
        );

        Ok(AnalysisResult::from_finding(
            CheckupKind::Dehydration,
            &finding,
            finding.confidence(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::path::Path;

    struct FixedFaces(Vec<FaceObservation>);

    impl FaceDetector for FixedFaces {
        fn detect(&self, _image: &DynamicImage) -> Result<Vec<FaceObservation>, AnalysisError> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &'static str {
            "FixedFaces"
        }
    }

    fn analyzer_seeing(faces: Vec<FaceObservation>) -> DehydrationAnalyzer {
        DehydrationAnalyzer::new(
            DehydrationConfig::default(),
            FaceDetection::available(Arc::new(FixedFaces(faces))),
        )
    }

    fn write_selfie(dir: &Path) -> CaptureHandle {
        let path = dir.join("selfie.png");
        ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(32, 32, Rgb([210, 170, 150]))
            .save(&path)
            .unwrap();
        CaptureHandle::image(path.to_string_lossy())
    }

    #[tokio::test]
    async fn alertness_triples_map_to_tiers() {
        let dir = tempfile::tempdir().unwrap();
        let cases = [
            (FaceObservation::new(0.9, 0.9, 0.9), RiskLevel::Low),
            (FaceObservation::new(0.5, 0.5, 0.1), RiskLevel::Moderate),
            (FaceObservation::new(0.1, 0.1, 0.1), RiskLevel::High),
        ];

        for (face, expected) in cases {
            let result = analyzer_seeing(vec![face])
                .analyze(write_selfie(dir.path()))
                .await;
            assert!(!result.is_fallback());
            assert_eq!(result.risk(), expected, "face {:?}", face);
            assert_eq!(
                result.advice(),
                HydrationFinding::from_risk(expected).advice()
            );
        }
    }

    #[test]
    fn threshold_scores_land_in_lower_risk_tier() {
        let thresholds = DehydrationConfig::default().thresholds;
        assert_eq!(thresholds.falling(0.3), RiskLevel::Moderate);
        assert_eq!(thresholds.falling(0.6), RiskLevel::Low);
    }

    #[test]
    fn missing_probabilities_count_as_zero() {
        let face = FaceObservation {
            left_eye_open: Some(0.6),
            right_eye_open: None,
            smiling: None,
        };
        assert!((face.alertness() - 0.2).abs() < 1e-6);
        assert_eq!(analyzer_seeing(vec![]).assess(&face), HydrationFinding::Fatigued);
    }

    #[tokio::test]
    async fn unsupported_detector_falls_back() {
        let analyzer = DehydrationAnalyzer::new(
            DehydrationConfig::default(),
            FaceDetection::unsupported("face detection module missing"),
        );

        let result = analyzer.analyze(CaptureHandle::image("/tmp/selfie.jpg")).await;
        assert!(result.is_fallback());
        assert_eq!(result.risk(), RiskLevel::Low);
        assert_eq!(result.confidence(), 0.0);
        assert!(!result.advice().is_empty());
        assert!(result
            .fallback_cause()
            .unwrap()
            .contains("face detection module missing"));
    }

    #[tokio::test]
    async fn no_face_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let result = analyzer_seeing(vec![])
            .analyze(write_selfie(dir.path()))
            .await;
        assert!(result.is_fallback());
        assert_eq!(result.fallback_cause(), Some("No face detected"));
    }

    #[tokio::test]
    async fn first_face_wins() {
        let dir = tempfile::tempdir().unwrap();
        let result = analyzer_seeing(vec![
            FaceObservation::new(0.1, 0.1, 0.1),
            FaceObservation::new(0.9, 0.9, 0.9),
        ])
        .analyze(write_selfie(dir.path()))
        .await;
        assert_eq!(result.risk(), RiskLevel::High);
        assert_eq!(result.confidence(), 0.8);
    }
}
