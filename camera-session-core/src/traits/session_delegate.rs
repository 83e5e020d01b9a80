use crate::models::error::CaptureError;
use crate::models::media::CapturedMedia;
use crate::models::state::SessionState;

/// Event delegate for capture session notifications.
///
/// Called after the session has released its internal lock, so
/// implementations may call back into the session. Hardware completions
/// arrive on whichever task resolved them.
pub trait SessionDelegate: Send + Sync {
    /// Called when the session state changes.
    fn on_state_changed(&self, state: &SessionState);

    /// Called when a capture, recording or permission call fails.
    fn on_error(&self, error: &CaptureError);

    /// Called when new media is held for review.
    fn on_media_captured(&self, media: &CapturedMedia);

    /// Called after media has been handed to the post composer.
    fn on_media_shared(&self, _media: &CapturedMedia) {}
}
