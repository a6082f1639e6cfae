use std::path::PathBuf;
use tracing::debug;

use crate::common::CaptureHandle;
use crate::error::AnalysisError;

/// A recorded clip that is known to exist and hold data.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub path: PathBuf,
    pub byte_len: u64,
}

pub async fn probe_clip(capture: &CaptureHandle) -> Result<AudioClip, AnalysisError> {
    let path = capture.local_path()?;

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(metadata) => metadata,
        Err(source) => return Err(AnalysisError::ResourceUnavailable { path, source }),
    };

    if !metadata.is_file() {
        return Err(AnalysisError::Decode(format!(
            "{} is not a recording",
            path.display()
        )));
    }
    if metadata.len() == 0 {
        return Err(AnalysisError::Decode("recording is empty".to_string()));
    }

    debug!(
        "Probed clip {} ({} bytes)",
        capture.capture_id(),
        metadata.len()
    );

    Ok(AudioClip {
        path,
        byte_len: metadata.len(),
    })
}
