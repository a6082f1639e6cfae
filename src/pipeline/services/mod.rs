pub mod analyzer_service;
pub mod instrumented;
pub mod suite;

pub use analyzer_service::{AnalyzerService, AnalyzerServiceBuilder, BoxedAnalyzerService};
pub use instrumented::{AnalyzerInstrumentation, InstrumentedAnalyzer};
pub use suite::{ScreeningSuite, ScreeningSuiteBuilder};
