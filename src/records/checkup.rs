use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::MediaKind;
use crate::pipeline::types::{AnalysisResult, CheckupKind};

/// One row of checkup history: the result as JSON plus where the capture lived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckupRecord {
    pub id: Option<i64>,
    pub user_id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: CheckupKind,
    pub result_json: String,
    pub image_uri: Option<String>,
    pub audio_uri: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CheckupRecord {
    pub fn from_result(
        user_id: Option<i64>,
        capture_uri: &str,
        result: &AnalysisResult,
    ) -> Result<Self, serde_json::Error> {
        let kind = result.kind();
        let (image_uri, audio_uri) = match kind.media() {
            MediaKind::Image => (Some(capture_uri.to_string()), None),
            MediaKind::Audio => (None, Some(capture_uri.to_string())),
        };

        Ok(Self {
            id: None,
            user_id,
            kind,
            result_json: serde_json::to_string(result)?,
            image_uri,
            audio_uri,
            created_at: Utc::now(),
        })
    }

    pub fn result(&self) -> Result<AnalysisResult, serde_json::Error> {
        serde_json::from_str(&self.result_json)
    }
}
