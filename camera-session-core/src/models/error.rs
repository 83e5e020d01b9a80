use thiserror::Error;

/// Errors surfaced by the capture session.
///
/// None of these are fatal: every variant has a defined path back to an
/// idle (or re-requestable) session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// Camera access has not been granted. A steady state, not a fault.
    #[error("permission denied")]
    PermissionDenied,

    /// The host platform failed to answer a permission check or prompt.
    #[error("permission unavailable: {0}")]
    PermissionUnavailable(String),

    #[error("capture failed: {0}")]
    CaptureFailure(String),

    #[error("recording failed: {0}")]
    RecordingFailure(String),

    /// A command was refused by a state guard.
    #[error("{command} rejected while {state}")]
    InvalidCommand {
        command: &'static str,
        state: &'static str,
    },

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),
}

impl CaptureError {
    pub fn is_invalid_command(&self) -> bool {
        matches!(self, Self::InvalidCommand { .. })
    }

    /// Whether this error was reported by the camera hardware.
    pub fn is_hardware_failure(&self) -> bool {
        matches!(self, Self::CaptureFailure(_) | Self::RecordingFailure(_))
    }
}
