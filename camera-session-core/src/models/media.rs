use serde::{Deserialize, Serialize};

use super::config::{CameraFacing, CaptureConfiguration};

/// Kind of artifact a capture produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
}

/// Result of a completed capture, held for review until discarded or shared.
///
/// Immutable once built. `duration_ms` is present only for video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedMedia {
    id: String,
    uri: String,
    kind: MediaKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_ms: Option<u64>,
    facing: CameraFacing,
    captured_at: String,
}

impl CapturedMedia {
    pub fn photo(uri: impl Into<String>, config: &CaptureConfiguration) -> Self {
        Self::build(uri.into(), MediaKind::Photo, None, config)
    }

    pub fn video(uri: impl Into<String>, duration_ms: u64, config: &CaptureConfiguration) -> Self {
        Self::build(uri.into(), MediaKind::Video, Some(duration_ms), config)
    }

    fn build(
        uri: String,
        kind: MediaKind,
        duration_ms: Option<u64>,
        config: &CaptureConfiguration,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            uri,
            kind,
            duration_ms,
            facing: config.facing,
            captured_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Opaque handle to the artifact produced by the hardware.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    /// Camera that produced the artifact.
    pub fn facing(&self) -> CameraFacing {
        self.facing
    }

    /// RFC 3339 wall-clock time the capture completed.
    pub fn captured_at(&self) -> &str {
        &self.captured_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_has_no_duration() {
        let media = CapturedMedia::photo("file:///a.jpg", &CaptureConfiguration::default());
        assert_eq!(media.kind(), MediaKind::Photo);
        assert_eq!(media.uri(), "file:///a.jpg");
        assert_eq!(media.duration_ms(), None);
        assert_eq!(media.facing(), CameraFacing::Back);
    }

    #[test]
    fn each_capture_gets_its_own_id() {
        let config = CaptureConfiguration::default();
        let a = CapturedMedia::video("v", 1200, &config);
        let b = CapturedMedia::video("v", 1200, &config);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.duration_ms(), Some(1200));
    }

    #[test]
    fn serialized_photo_omits_duration() {
        let media = CapturedMedia::photo("a", &CaptureConfiguration::default());
        let value = serde_json::to_value(&media).unwrap();
        assert_eq!(value["kind"], "photo");
        assert_eq!(value["uri"], "a");
        assert!(value.get("durationMs").is_none());
        assert!(value.get("capturedAt").is_some());
    }
}
