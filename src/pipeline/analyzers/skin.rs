use async_trait::async_trait;
use image::RgbImage;
use rand::distr::{Distribution, Uniform};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::config::SkinConfig;
use super::Analyzer;
use crate::common::CaptureHandle;
use crate::error::AnalysisError;
use crate::pipeline::media::load_resized;
use crate::pipeline::types::{AnalysisResult, CheckupKind, SkinCondition};

/// A loaded skin model. Must give the same label for the same input.
pub trait SkinClassifier: Send + Sync {
    fn classify(&self, capture: &CaptureHandle, input: &RgbImage) -> SkinCondition;
    fn name(&self) -> &'static str;
}

/// Picks the label from the capture reference rather than the pixels, so a
/// given reference maps to the same label for the life of the process.
pub struct ReferenceKeyedClassifier;

impl SkinClassifier for ReferenceKeyedClassifier {
    fn classify(&self, capture: &CaptureHandle, _input: &RgbImage) -> SkinCondition {
        let labels = SkinCondition::LABELS;
        labels[capture.uri().encode_utf16().count() % labels.len()]
    }

    fn name(&self) -> &'static str {
        "ReferenceKeyedClassifier"
    }
}

#[async_trait]
pub trait SkinModelLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn SkinClassifier>, AnalysisError>;
}

/// Simulates the model load latency, then hands out the reference-keyed classifier.
pub struct PlaceholderModelLoader {
    delay: Duration,
}

impl PlaceholderModelLoader {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl SkinModelLoader for PlaceholderModelLoader {
    async fn load(&self) -> Result<Arc<dyn SkinClassifier>, AnalysisError> {
        info!("Loading skin model...");
        tokio::time::sleep(self.delay).await;
        info!("Skin model loaded (placeholder)");
        Ok(Arc::new(ReferenceKeyedClassifier))
    }
}

pub struct SkinAnalyzer {
    config: SkinConfig,
    loader: Arc<dyn SkinModelLoader>,
    model: OnceCell<Arc<dyn SkinClassifier>>,
    load_attempts: AtomicUsize,
}

impl SkinAnalyzer {
    pub fn new(config: SkinConfig) -> Self {
        let loader = Arc::new(PlaceholderModelLoader::new(Duration::from_millis(
            config.model_load_delay_ms,
        )));
        Self::with_loader(config, loader)
    }

    pub fn with_loader(config: SkinConfig, loader: Arc<dyn SkinModelLoader>) -> Self {
        Self {
            config,
            loader,
            model: OnceCell::new(),
            load_attempts: AtomicUsize::new(0),
        }
    }

    /// How many times the loader has been invoked so far.
    pub fn load_attempts(&self) -> usize {
        self.load_attempts.load(Ordering::SeqCst)
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.initialized()
    }

    /// Loads the model on first use. Concurrent callers share one load and a
    /// failed load is retried on the next call.
    async fn model(&self) -> Result<Arc<dyn SkinClassifier>, AnalysisError> {
        let loader = Arc::clone(&self.loader);
        let attempts = &self.load_attempts;
        let model = self
            .model
            .get_or_try_init(move || async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                loader.load().await
            })
            .await?;
        Ok(Arc::clone(model))
    }

    fn draw_confidence(&self) -> Result<f32, AnalysisError> {
        let band = Uniform::new(self.config.confidence_min, self.config.confidence_max)
            .map_err(|e| AnalysisError::Processing(format!("invalid confidence band: {}", e)))?;
        Ok(band.sample(&mut rand::rng()))
    }
}

#[async_trait]
impl Analyzer for SkinAnalyzer {
    fn kind(&self) -> CheckupKind {
        CheckupKind::Skin
    }

    fn name(&self) -> &'static str {
        "SkinAnalyzer"
    }

    async fn try_analyze(&self, capture: &CaptureHandle) -> Result<AnalysisResult, AnalysisError> {
        let model = self.model().await?;
        let input = load_resized(capture, self.config.input_size).await?;
        let condition = model.classify(capture, &input);
        let confidence = self.draw_confidence()?;

        debug!("{} labelled capture as {}", model.name(), condition.label());

        Ok(AnalysisResult::from_finding(
            CheckupKind::Skin,
            &condition,
            confidence,
        ))
    }
}
