pub mod anemia;
pub mod config;
pub mod dehydration;
pub mod respiratory;
pub mod skin;

pub use anemia::{AnemiaAnalyzer, PallorEstimator, RandomPallorEstimator, RednessEstimator};
pub use dehydration::{DehydrationAnalyzer, FaceDetection, FaceDetector, FaceObservation};
pub use respiratory::{AcousticClassifier, RespiratoryAnalyzer, WeightedDrawClassifier};
pub use skin::{
    PlaceholderModelLoader, ReferenceKeyedClassifier, SkinAnalyzer, SkinClassifier,
    SkinModelLoader,
};

use async_trait::async_trait;
use tracing::warn;

use crate::common::CaptureHandle;
use crate::error::AnalysisError;
use crate::pipeline::types::{AnalysisResult, CheckupKind};

/// One screening: consumes a capture and always hands back a result.
///
/// Implementors only write `try_analyze`. `analyze` is the boundary that turns
/// any failure into the kind's fallback result, so callers never see an error.
#[async_trait]
pub trait Analyzer: Send + Sync {
    fn kind(&self) -> CheckupKind;

    fn name(&self) -> &'static str;

    async fn try_analyze(&self, capture: &CaptureHandle) -> Result<AnalysisResult, AnalysisError>;

    async fn analyze(&self, capture: CaptureHandle) -> AnalysisResult {
        let expected = self.kind().media();
        let outcome = if capture.media() != expected {
            Err(AnalysisError::UnsupportedMedia {
                expected,
                actual: capture.media(),
            })
        } else {
            self.try_analyze(&capture).await
        };

        match outcome {
            Ok(result) => result,
            Err(err) => {
                warn!(
                    analyzer = self.name(),
                    capture = %capture.capture_id(),
                    category = ?err.category(),
                    "Analysis fell back: {}",
                    err
                );
                AnalysisResult::fallback(self.kind(), &err)
            }
        }
    }
}
