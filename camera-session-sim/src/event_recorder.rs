//! `SessionDelegate` that logs and records every notification.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use camera_session_core::models::error::CaptureError;
use camera_session_core::models::media::CapturedMedia;
use camera_session_core::models::state::SessionState;
use camera_session_core::traits::session_delegate::SessionDelegate;

/// A session notification, serializable for JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum SessionEvent {
    StateChanged {
        state: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        remaining_ms: Option<u64>,
    },
    Error {
        message: String,
    },
    MediaCaptured {
        media: CapturedMedia,
    },
    MediaShared {
        media: CapturedMedia,
    },
}

#[derive(Default)]
pub struct EventRecorder {
    events: Mutex<Vec<SessionEvent>>,
}

impl EventRecorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().clone()
    }

    /// Names of the states entered, in order.
    pub fn states(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                SessionEvent::StateChanged { state, .. } => Some(state.clone()),
                _ => None,
            })
            .collect()
    }

    /// How many times `state` was entered.
    pub fn entered(&self, state: &str) -> usize {
        self.states().iter().filter(|s| *s == state).count()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                SessionEvent::Error { message } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: SessionEvent) {
        self.events.lock().push(event);
    }
}

impl SessionDelegate for EventRecorder {
    fn on_state_changed(&self, state: &SessionState) {
        log::info!("state: {}", state);
        self.push(SessionEvent::StateChanged {
            state: state.name().to_string(),
            remaining_ms: state.remaining().map(|d| d.as_millis() as u64),
        });
    }

    fn on_error(&self, error: &CaptureError) {
        log::warn!("error: {}", error);
        self.push(SessionEvent::Error {
            message: error.to_string(),
        });
    }

    fn on_media_captured(&self, media: &CapturedMedia) {
        log::info!("captured {:?}: {}", media.kind(), media.uri());
        self.push(SessionEvent::MediaCaptured {
            media: media.clone(),
        });
    }

    fn on_media_shared(&self, media: &CapturedMedia) {
        self.push(SessionEvent::MediaShared {
            media: media.clone(),
        });
    }
}
