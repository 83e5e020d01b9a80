use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::models::config::{CaptureConfiguration, PhotoOptions, VideoQuality};

/// Artifact handle returned by a successful photo capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoOutput {
    pub uri: String,
}

/// Artifact handle returned when a recording finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoOutput {
    pub uri: String,

    /// Duration as measured by the hardware.
    pub duration_ms: u64,
}

/// Parameters for a single recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingRequest {
    pub quality: VideoQuality,
    pub max_duration: Duration,
}

/// Interface for a platform camera.
///
/// The session is the only caller and never has more than one of
/// `take_photo` / `start_recording` outstanding. Failures are reported as
/// plain messages; the session maps them onto its own error type.
#[async_trait]
pub trait CameraHardware: Send + Sync {
    /// Take a still photo with the given settings.
    async fn take_photo(
        &self,
        config: &CaptureConfiguration,
        options: &PhotoOptions,
    ) -> Result<PhotoOutput, String>;

    /// Record until `stop_recording` is called or `max_duration` elapses.
    ///
    /// Resolves only once the recording has been finalized.
    async fn start_recording(
        &self,
        config: &CaptureConfiguration,
        request: &RecordingRequest,
    ) -> Result<VideoOutput, String>;

    /// Ask an in-progress recording to finish. Fire-and-forget and idempotent.
    fn stop_recording(&self);
}

#[async_trait]
impl<T: CameraHardware> CameraHardware for Arc<T> {
    async fn take_photo(
        &self,
        config: &CaptureConfiguration,
        options: &PhotoOptions,
    ) -> Result<PhotoOutput, String> {
        (**self).take_photo(config, options).await
    }

    async fn start_recording(
        &self,
        config: &CaptureConfiguration,
        request: &RecordingRequest,
    ) -> Result<VideoOutput, String> {
        (**self).start_recording(config, request).await
    }

    fn stop_recording(&self) {
        (**self).stop_recording()
    }
}
