pub mod analyzers;
pub mod media;
pub mod services;
pub mod types;

pub use analyzers::Analyzer;
pub use services::ScreeningSuite;
pub use types::{AnalysisResult, CheckupKind, RiskLevel};
