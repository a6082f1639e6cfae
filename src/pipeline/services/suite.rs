use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use tracing::{info, warn};

use super::analyzer_service::AnalyzerServiceBuilder;
use super::instrumented::AnalyzerInstrumentation;
use crate::common::CaptureHandle;
use crate::config::Configuration;
use crate::error::AnalysisError;
use crate::pipeline::analyzers::{
    Analyzer, AnemiaAnalyzer, DehydrationAnalyzer, FaceDetection, RespiratoryAnalyzer,
    SkinAnalyzer,
};
use crate::pipeline::types::{AnalysisResult, CheckupKind};

/// One analyzer per checkup kind. Analyzers share nothing, so any number of
/// calls may be in flight at once.
pub struct ScreeningSuite {
    analyzers: HashMap<CheckupKind, Arc<dyn Analyzer>>,
    timeout: Option<Duration>,
}

impl ScreeningSuite {
    pub fn from_config(configuration: &Configuration) -> Self {
        ScreeningSuiteBuilder::new(configuration.clone()).build()
    }

    pub fn builder(configuration: Configuration) -> ScreeningSuiteBuilder {
        ScreeningSuiteBuilder::new(configuration)
    }

    pub async fn analyze(&self, kind: CheckupKind, capture: CaptureHandle) -> AnalysisResult {
        let Some(analyzer) = self.analyzers.get(&kind) else {
            let err = AnalysisError::CapabilityUnavailable(format!("no {} analyzer", kind));
            return AnalysisResult::fallback(kind, &err);
        };

        let capture_id = capture.capture_id();
        let service = AnalyzerServiceBuilder::new(Arc::clone(analyzer))
            .timeout(self.timeout)
            .build();

        match service.oneshot(capture).await {
            Ok(result) => result,
            Err(err) => {
                let err = if err.is::<tower::timeout::error::Elapsed>() {
                    AnalysisError::TimedOut(self.timeout.unwrap_or_default())
                } else {
                    AnalysisError::Processing(err.to_string())
                };
                warn!(
                    kind = %kind,
                    capture = %capture_id,
                    "Analysis fell back: {}",
                    err
                );
                AnalysisResult::fallback(kind, &err)
            }
        }
    }

    /// Runs every request concurrently. Results come back in request order.
    pub async fn analyze_batch(
        &self,
        requests: Vec<(CheckupKind, CaptureHandle)>,
    ) -> Vec<AnalysisResult> {
        join_all(
            requests
                .into_iter()
                .map(|(kind, capture)| self.analyze(kind, capture)),
        )
        .await
    }
}

pub struct ScreeningSuiteBuilder {
    configuration: Configuration,
    face_detection: FaceDetection,
    overrides: Vec<Arc<dyn Analyzer>>,
}

impl ScreeningSuiteBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            face_detection: FaceDetection::default(),
            overrides: Vec::new(),
        }
    }

    pub fn face_detection(mut self, face_detection: FaceDetection) -> Self {
        self.face_detection = face_detection;
        self
    }

    /// Replaces the built-in analyzer for `analyzer.kind()`.
    pub fn analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.overrides.push(analyzer);
        self
    }

    pub fn build(self) -> ScreeningSuite {
        let configuration = self.configuration;
        let face_detection_available = self.face_detection.is_available();

        let mut analyzers: HashMap<CheckupKind, Arc<dyn Analyzer>> = HashMap::new();
        analyzers.insert(
            CheckupKind::Anemia,
            Arc::new(AnemiaAnalyzer::new(configuration.anemia.clone()).instrumented()),
        );
        analyzers.insert(
            CheckupKind::Skin,
            Arc::new(SkinAnalyzer::new(configuration.skin.clone()).instrumented()),
        );
        analyzers.insert(
            CheckupKind::Respiratory,
            Arc::new(RespiratoryAnalyzer::new(configuration.respiratory.clone()).instrumented()),
        );
        analyzers.insert(
            CheckupKind::Dehydration,
            Arc::new(
                DehydrationAnalyzer::new(configuration.dehydration.clone(), self.face_detection)
                    .instrumented(),
            ),
        );

        for analyzer in self.overrides {
            analyzers.insert(analyzer.kind(), analyzer);
        }

        info!(
            "Screening suite ready: {} analyzers, face detection {}",
            analyzers.len(),
            if face_detection_available {
                "available"
            } else {
                "unavailable"
            }
        );

        ScreeningSuite {
            analyzers,
            timeout: configuration.analysis_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{RiskLevel, SkinCondition};
    use async_trait::async_trait;

    struct AlwaysBurn;

    #[async_trait]
    impl Analyzer for AlwaysBurn {
        fn kind(&self) -> CheckupKind {
            CheckupKind::Skin
        }

        fn name(&self) -> &'static str {
            "AlwaysBurn"
        }

        async fn try_analyze(
            &self,
            _capture: &CaptureHandle,
        ) -> Result<AnalysisResult, AnalysisError> {
            Ok(AnalysisResult::from_finding(
                CheckupKind::Skin,
                &SkinCondition::PotentialBurn,
                0.9,
            ))
        }
    }

    #[tokio::test]
    async fn overrides_replace_builtin_analyzer() {
        let suite = ScreeningSuite::builder(Configuration::without_delays())
            .analyzer(Arc::new(AlwaysBurn))
            .build();

        let result = suite
            .analyze(CheckupKind::Skin, CaptureHandle::image("/whatever.jpg"))
            .await;
        assert_eq!(result.risk(), RiskLevel::High);
    }

    #[tokio::test]
    async fn slow_analysis_times_out_into_fallback() {
        let mut configuration = Configuration::without_delays();
        configuration.respiratory.processing_delay_ms = 500;
        configuration.analysis_timeout_ms = Some(20);
        let suite = ScreeningSuite::from_config(&configuration);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("breath.m4a");
        std::fs::write(&path, vec![3u8; 128]).unwrap();

        let result = suite
            .analyze(
                CheckupKind::Respiratory,
                CaptureHandle::audio(path.to_string_lossy()),
            )
            .await;
        assert!(result.is_fallback());
        assert_eq!(result.confidence(), 0.0);
        assert!(result.fallback_cause().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn default_suite_has_no_face_detector() {
        let suite = ScreeningSuite::from_config(&Configuration::without_delays());
        let result = suite
            .analyze(CheckupKind::Dehydration, CaptureHandle::image("/selfie.jpg"))
            .await;
        assert!(result.is_fallback());
        assert_eq!(result.risk(), RiskLevel::Low);
    }
}
