use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which physical camera is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    Front,
    #[default]
    Back,
}

impl CameraFacing {
    pub fn toggled(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }
}

/// Flash/torch intent for the next capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    #[default]
    Off,
    On,
}

impl FlashMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }
}

/// Selects which operation the shutter triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    #[default]
    Photo,
    Video,
}

impl CaptureMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Photo => Self::Video,
            Self::Video => Self::Photo,
        }
    }
}

/// User-facing capture settings.
///
/// Only mutable through the session, and only while it is idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CaptureConfiguration {
    pub facing: CameraFacing,
    pub flash: FlashMode,
    pub mode: CaptureMode,
}

/// Target resolution passed to the hardware for video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VideoQuality {
    #[serde(rename = "720p")]
    Hd720,
    #[default]
    #[serde(rename = "1080p")]
    Hd1080,
    #[serde(rename = "2160p")]
    Uhd2160,
}

/// Options attached to every photo request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoOptions {
    /// Compression quality in `0.0..=1.0` (default: 0.8).
    pub quality: f32,
}

impl Default for PhotoOptions {
    fn default() -> Self {
        Self { quality: 0.8 }
    }
}

/// Options attached to every recording request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingOptions {
    pub quality: VideoQuality,

    /// Hard cap on a single recording (default: 30 seconds).
    pub max_duration: Duration,
}

impl Default for RecordingOptions {
    fn default() -> Self {
        Self {
            quality: VideoQuality::default(),
            max_duration: Duration::from_secs(30),
        }
    }
}

/// Session-wide options fixed at mount time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionOptions {
    pub photo: PhotoOptions,
    pub recording: RecordingOptions,
}

impl SessionOptions {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.photo.quality) {
            return Err(format!("photo quality out of range: {}", self.photo.quality));
        }
        if self.recording.max_duration.is_zero() {
            return Err("max recording duration must be positive".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_back_camera_photo_without_flash() {
        let config = CaptureConfiguration::default();
        assert_eq!(config.facing, CameraFacing::Back);
        assert_eq!(config.flash, FlashMode::Off);
        assert_eq!(config.mode, CaptureMode::Photo);
    }

    #[test]
    fn toggles_flip_between_both_values() {
        assert_eq!(CameraFacing::Back.toggled(), CameraFacing::Front);
        assert_eq!(CameraFacing::Front.toggled(), CameraFacing::Back);
        assert_eq!(FlashMode::Off.toggled(), FlashMode::On);
        assert_eq!(CaptureMode::Photo.toggled().toggled(), CaptureMode::Photo);
    }

    #[test]
    fn default_options_match_camera_screen() {
        let options = SessionOptions::default();
        assert!((options.photo.quality - 0.8).abs() < f32::EPSILON);
        assert_eq!(options.recording.quality, VideoQuality::Hd1080);
        assert_eq!(options.recording.max_duration, Duration::from_secs(30));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_options() {
        let mut options = SessionOptions::default();
        options.photo.quality = 1.5;
        assert!(options.validate().is_err());

        let mut options = SessionOptions::default();
        options.recording.max_duration = Duration::ZERO;
        assert!(options.validate().is_err());
    }

    #[test]
    fn configuration_serializes_lowercase() {
        let config = CaptureConfiguration {
            facing: CameraFacing::Front,
            flash: FlashMode::On,
            mode: CaptureMode::Video,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"facing":"front","flash":"on","mode":"video"}"#);
    }
}
