use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use tower::timeout::TimeoutLayer;
use tower::util::BoxCloneService;
use tower::{BoxError, Service, ServiceBuilder};

use crate::common::CaptureHandle;
use crate::pipeline::analyzers::Analyzer;
use crate::pipeline::types::AnalysisResult;

pub type BoxedAnalyzerService = BoxCloneService<CaptureHandle, AnalysisResult, BoxError>;

/// Exposes an analyzer as a tower service. The inner call itself never fails;
/// errors only come from layers stacked on top (e.g. the timeout).
#[derive(Clone)]
pub struct AnalyzerService {
    inner: Arc<dyn Analyzer>,
}

impl AnalyzerService {
    pub fn new(inner: Arc<dyn Analyzer>) -> Self {
        Self { inner }
    }
}

impl Service<CaptureHandle> for AnalyzerService {
    type Response = AnalysisResult;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, capture: CaptureHandle) -> Self::Future {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move { Ok(inner.analyze(capture).await) })
    }
}

pub struct AnalyzerServiceBuilder {
    analyzer: Arc<dyn Analyzer>,
    timeout: Option<Duration>,
}

impl AnalyzerServiceBuilder {
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            analyzer,
            timeout: None,
        }
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> BoxedAnalyzerService {
        let service = ServiceBuilder::new()
            .option_layer(self.timeout.map(TimeoutLayer::new))
            .service(AnalyzerService::new(self.analyzer));

        BoxCloneService::new(service)
    }
}
