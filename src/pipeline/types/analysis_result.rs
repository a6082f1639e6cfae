use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::risk::RiskLevel;
use crate::common::MediaKind;
use crate::error::AnalysisError;

/// Which screening produced a result. Doubles as the checkup type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckupKind {
    Anemia,
    Skin,
    Respiratory,
    Dehydration,
}

impl CheckupKind {
    pub const ALL: [CheckupKind; 4] = [
        CheckupKind::Anemia,
        CheckupKind::Skin,
        CheckupKind::Respiratory,
        CheckupKind::Dehydration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckupKind::Anemia => "anemia",
            CheckupKind::Skin => "skin",
            CheckupKind::Respiratory => "respiratory",
            CheckupKind::Dehydration => "dehydration",
        }
    }

    /// Capture type the analyzer for this kind consumes.
    pub fn media(&self) -> MediaKind {
        match self {
            CheckupKind::Respiratory => MediaKind::Audio,
            _ => MediaKind::Image,
        }
    }

    /// User-facing text shown when the analysis could not be completed.
    pub fn fallback_hint(&self) -> &'static str {
        match self {
            CheckupKind::Anemia => "Error analyzing image.",
            CheckupKind::Skin => "Could not analyze the skin photo. Retake it in good light.",
            CheckupKind::Respiratory => {
                "Could not analyze the recording. Try again in a quiet place."
            }
            CheckupKind::Dehydration => "Could not analyze face. Ensure good lighting.",
        }
    }
}

impl fmt::Display for CheckupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckupKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anemia" => Ok(CheckupKind::Anemia),
            "skin" => Ok(CheckupKind::Skin),
            "respiratory" | "breathing" => Ok(CheckupKind::Respiratory),
            "dehydration" => Ok(CheckupKind::Dehydration),
            other => Err(format!("unknown checkup kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkinCondition {
    Healthy,
    EczemaDryness,
    FungalInfection,
    PotentialBurn,
}

impl SkinCondition {
    /// Label order used by the classifier output layer.
    pub const LABELS: [SkinCondition; 4] = [
        SkinCondition::Healthy,
        SkinCondition::EczemaDryness,
        SkinCondition::FungalInfection,
        SkinCondition::PotentialBurn,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SkinCondition::Healthy => "Healthy Skin",
            SkinCondition::EczemaDryness => "Eczema / Dryness",
            SkinCondition::FungalInfection => "Fungal Infection",
            SkinCondition::PotentialBurn => "Potential Burn",
        }
    }
}

impl Finding for SkinCondition {
    fn risk(&self) -> RiskLevel {
        match self {
            SkinCondition::Healthy => RiskLevel::Low,
            SkinCondition::EczemaDryness | SkinCondition::FungalInfection => RiskLevel::Moderate,
            SkinCondition::PotentialBurn => RiskLevel::High,
        }
    }

    fn advice(&self) -> &'static str {
        match self {
            SkinCondition::Healthy => "No issues detected. Keep the skin clean and moisturized.",
            SkinCondition::EczemaDryness => "Apply moisturizer. Avoid scratching.",
            SkinCondition::FungalInfection => "Keep area dry. Use anti-fungal cream.",
            SkinCondition::PotentialBurn => {
                "Cool the area with water. Visit a clinic if blistering."
            }
        }
    }

    fn condition(&self) -> Option<Condition> {
        Some(Condition::Skin(*self))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RespiratoryCondition {
    Normal,
    Wheezing,
    Coughing,
    Stridor,
}

impl RespiratoryCondition {
    pub const ALL: [RespiratoryCondition; 4] = [
        RespiratoryCondition::Normal,
        RespiratoryCondition::Wheezing,
        RespiratoryCondition::Coughing,
        RespiratoryCondition::Stridor,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RespiratoryCondition::Normal => "Normal",
            RespiratoryCondition::Wheezing => "Wheezing",
            RespiratoryCondition::Coughing => "Coughing",
            RespiratoryCondition::Stridor => "Stridor",
        }
    }

    /// Nominal confidence reported with each label.
    pub fn confidence(&self) -> f32 {
        match self {
            RespiratoryCondition::Normal => 0.95,
            RespiratoryCondition::Wheezing => 0.88,
            RespiratoryCondition::Coughing => 0.90,
            RespiratoryCondition::Stridor => 0.92,
        }
    }
}

impl Finding for RespiratoryCondition {
    fn risk(&self) -> RiskLevel {
        match self {
            RespiratoryCondition::Normal => RiskLevel::Low,
            RespiratoryCondition::Wheezing | RespiratoryCondition::Coughing => RiskLevel::Moderate,
            RespiratoryCondition::Stridor => RiskLevel::High,
        }
    }

    fn advice(&self) -> &'static str {
        match self {
            RespiratoryCondition::Normal => "Breathing sounds clear and regular.",
            RespiratoryCondition::Wheezing => {
                "Possible airway obstruction or asthma. Keep hydrated and sit upright."
            }
            RespiratoryCondition::Coughing => {
                "Persistent cough detected. Rest, drink warm fluids and see a doctor if it lasts over a week."
            }
            RespiratoryCondition::Stridor => {
                "High-pitched sound detected. Seek immediate medical attention."
            }
        }
    }

    fn condition(&self) -> Option<Condition> {
        Some(Condition::Respiratory(*self))
    }
}

/// Condition label carried by the skin and respiratory results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Skin(SkinCondition),
    Respiratory(RespiratoryCondition),
}

impl Condition {
    pub fn label(&self) -> &'static str {
        match self {
            Condition::Skin(c) => c.label(),
            Condition::Respiratory(c) => c.label(),
        }
    }
}

/// A domain outcome that fixes its tier and advice together.
pub trait Finding {
    fn risk(&self) -> RiskLevel;
    fn advice(&self) -> &'static str;
    fn condition(&self) -> Option<Condition> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Assessed,
    Fallback { cause: String },
}

/// What an analyzer hands back. Exactly one per call, never partial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    kind: CheckupKind,
    risk: RiskLevel,
    confidence: f32,
    advice: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    condition: Option<Condition>,
    outcome: Outcome,
}

impl AnalysisResult {
    pub fn from_finding<F: Finding>(kind: CheckupKind, finding: &F, confidence: f32) -> Self {
        Self {
            kind,
            risk: finding.risk(),
            confidence: clamp_confidence(confidence),
            advice: finding.advice().to_string(),
            condition: finding.condition(),
            outcome: Outcome::Assessed,
        }
    }

    /// Low risk, zero confidence, with the kind's hint and the underlying cause.
    pub fn fallback(kind: CheckupKind, cause: &AnalysisError) -> Self {
        Self {
            kind,
            risk: RiskLevel::Low,
            confidence: 0.0,
            advice: kind.fallback_hint().to_string(),
            condition: None,
            outcome: Outcome::Fallback {
                cause: cause.to_string(),
            },
        }
    }

    pub fn kind(&self) -> CheckupKind {
        self.kind
    }

    pub fn risk(&self) -> RiskLevel {
        self.risk
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn advice(&self) -> &str {
        &self.advice
    }

    pub fn condition(&self) -> Option<Condition> {
        self.condition
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.outcome, Outcome::Fallback { .. })
    }

    pub fn fallback_cause(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Fallback { cause } => Some(cause),
            Outcome::Assessed => None,
        }
    }
}

fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
