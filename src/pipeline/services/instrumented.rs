use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, instrument};

use crate::common::CaptureHandle;
use crate::error::AnalysisError;
use crate::pipeline::analyzers::Analyzer;
use crate::pipeline::types::{AnalysisResult, CheckupKind};

/// Wraps an analyzer with a tracing span plus timing and outcome logs.
pub struct InstrumentedAnalyzer<A> {
    inner: A,
}

impl<A> InstrumentedAnalyzer<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<A> Analyzer for InstrumentedAnalyzer<A>
where
    A: Analyzer,
{
    fn kind(&self) -> CheckupKind {
        self.inner.kind()
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }

    #[instrument(skip(self, capture), fields(analyzer = self.inner.name(), capture = %capture.capture_id()))]
    async fn try_analyze(&self, capture: &CaptureHandle) -> Result<AnalysisResult, AnalysisError> {
        let start = Instant::now();
        debug!("Starting analysis of {}", capture.uri());

        let result = self.inner.try_analyze(capture).await;

        let duration_us = start.elapsed().as_micros() as u64;
        match &result {
            Ok(analysis) => {
                tracing::info!(
                    "Completed {} analysis in {}us: {} risk, confidence {:.2}",
                    analysis.kind(),
                    duration_us,
                    analysis.risk(),
                    analysis.confidence()
                );
            }
            Err(e) => {
                debug!("Analysis failed after {}us: {}", duration_us, e);
            }
        }

        result
    }
}

/// Extension trait to easily wrap analyzers with instrumentation
pub trait AnalyzerInstrumentation: Sized {
    fn instrumented(self) -> InstrumentedAnalyzer<Self>;
}

impl<A> AnalyzerInstrumentation for A
where
    A: Analyzer,
{
    fn instrumented(self) -> InstrumentedAnalyzer<Self> {
        InstrumentedAnalyzer::new(self)
    }
}
