use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::AnalysisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Audio => write!(f, "audio"),
        }
    }
}

/// Reference to a still image or audio recording produced by the capture layer.
///
/// Handed to exactly one analyzer by value; nothing keeps it afterwards.
#[derive(Debug, Clone)]
pub struct CaptureHandle {
    capture_id: Uuid,
    uri: String,
    media: MediaKind,
    captured_at: DateTime<Utc>,
}

impl CaptureHandle {
    pub fn new(uri: impl Into<String>, media: MediaKind) -> Self {
        Self {
            capture_id: Uuid::new_v4(),
            uri: uri.into(),
            media,
            captured_at: Utc::now(),
        }
    }

    pub fn image(uri: impl Into<String>) -> Self {
        Self::new(uri, MediaKind::Image)
    }

    pub fn audio(uri: impl Into<String>) -> Self {
        Self::new(uri, MediaKind::Audio)
    }

    pub fn capture_id(&self) -> Uuid {
        self.capture_id
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn media(&self) -> MediaKind {
        self.media
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Resolves the reference to a local file. Accepts bare paths and `file://` URIs
    /// with an empty or `localhost` authority; percent-escapes are decoded.
    pub fn local_path(&self) -> Result<PathBuf, AnalysisError> {
        let uri = self.uri.trim();
        if uri.is_empty() {
            return Err(AnalysisError::EmptyReference);
        }

        if let Some(rest) = uri.strip_prefix("file://") {
            let path = match rest.find('/') {
                Some(0) => rest,
                Some(at) if rest[..at].eq_ignore_ascii_case("localhost") => &rest[at..],
                Some(at) => return Err(AnalysisError::RemoteHost(rest[..at].to_string())),
                None if rest.is_empty() || rest.eq_ignore_ascii_case("localhost") => {
                    return Err(AnalysisError::EmptyReference)
                }
                None => return Err(AnalysisError::RemoteHost(rest.to_string())),
            };
            return percent_decode(path).map(PathBuf::from);
        }

        match uri.split_once("://") {
            Some((scheme, _)) => Err(AnalysisError::UnsupportedScheme(scheme.to_string())),
            None => Ok(PathBuf::from(uri)),
        }
    }
}

/// Decodes `%XX` escapes in the path part of a `file://` URI.
fn percent_decode(path: &str) -> Result<String, AnalysisError> {
    let malformed = || AnalysisError::Decode(format!("malformed file URI path '{}'", path));
    let bytes = path.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .filter(|h| h.iter().all(u8::is_ascii_hexdigit))
                .ok_or_else(malformed)?;
            let hex = std::str::from_utf8(hex).map_err(|_| malformed())?;
            decoded.push(u8::from_str_radix(hex, 16).map_err(|_| malformed())?);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(decoded).map_err(|_| malformed())
}
