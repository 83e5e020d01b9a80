//! Post composer that keeps what it is given.

use std::sync::Arc;

use parking_lot::Mutex;

use camera_session_core::models::media::CapturedMedia;
use camera_session_core::traits::post_composer::PostComposer;

/// Collects submitted media. Clones share the same outbox.
#[derive(Clone, Default)]
pub struct CollectingComposer {
    submitted: Arc<Mutex<Vec<CapturedMedia>>>,
}

impl CollectingComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submitted(&self) -> Vec<CapturedMedia> {
        self.submitted.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.submitted.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.submitted.lock().is_empty()
    }
}

impl PostComposer for CollectingComposer {
    fn submit(&self, media: CapturedMedia) {
        log::info!("composer received {} ({:?})", media.uri(), media.kind());
        self.submitted.lock().push(media);
    }
}
