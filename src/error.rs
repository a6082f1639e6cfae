use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::common::MediaKind;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Serialization Error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Profile Error: {0}")]
    Profile(#[from] ProfileError),
    #[error("No guide with id '{0}'")]
    UnknownGuide(String),
    #[error("Nothing to screen, pass at least one capture")]
    EmptyScreening,
}

/// Coarse failure classes an analyzer can hit before producing a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    ResourceUnavailable,
    CapabilityUnavailable,
    Processing,
}

// Analyzer Error Type, never crosses `Analyzer::analyze`
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Capture {path} is not readable: {source}")]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Capture reference is empty")]
    EmptyReference,
    #[error("Unsupported capture scheme '{0}'")]
    UnsupportedScheme(String),
    #[error("Capture host '{0}' is not local")]
    RemoteHost(String),
    #[error("Expected {expected} capture, got {actual}")]
    UnsupportedMedia {
        expected: MediaKind,
        actual: MediaKind,
    },
    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),
    #[error("Failed to decode capture: {0}")]
    Decode(String),
    #[error("Processing failed: {0}")]
    Processing(String),
    #[error("No face detected")]
    NoFaceDetected,
    #[error("Analysis timed out after {0:?}")]
    TimedOut(Duration),
}

impl AnalysisError {
    pub fn category(&self) -> FailureCategory {
        match self {
            AnalysisError::ResourceUnavailable { .. }
            | AnalysisError::EmptyReference
            | AnalysisError::UnsupportedScheme(_)
            | AnalysisError::RemoteHost(_)
            | AnalysisError::UnsupportedMedia { .. } => FailureCategory::ResourceUnavailable,
            AnalysisError::CapabilityUnavailable(_) => FailureCategory::CapabilityUnavailable,
            AnalysisError::Decode(_)
            | AnalysisError::Processing(_)
            | AnalysisError::NoFaceDetected
            | AnalysisError::TimedOut(_) => FailureCategory::Processing,
        }
    }
}

impl From<image::ImageError> for AnalysisError {
    fn from(err: image::ImageError) -> Self {
        AnalysisError::Decode(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AnalysisError {
    fn from(err: tokio::task::JoinError) -> Self {
        AnalysisError::Processing(format!("worker task failed: {}", err))
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Name must not be empty")]
    EmptyName,
    #[error("PIN must be exactly 4 digits")]
    InvalidPin,
}
