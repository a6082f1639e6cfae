mod analysis_result;
mod risk;

pub use analysis_result::{
    AnalysisResult, CheckupKind, Condition, Finding, Outcome, RespiratoryCondition,
    SkinCondition,
};
pub use risk::{RiskLevel, TierThresholds};
