pub mod common;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod pipeline;
pub mod records;

pub use crate::common::{CaptureHandle, MediaKind};
pub use crate::config::Configuration;
pub use crate::error::{AnalysisError, AppError, FailureCategory, ProfileError};
pub use crate::knowledge::KnowledgeBase;
pub use crate::pipeline::analyzers::{Analyzer, FaceDetection, FaceDetector, FaceObservation};
pub use crate::pipeline::services::ScreeningSuite;
pub use crate::pipeline::types::{
    AnalysisResult, CheckupKind, Condition, Outcome, RespiratoryCondition, RiskLevel,
    SkinCondition,
};
pub use crate::records::{CheckupRecord, UserProfile};
