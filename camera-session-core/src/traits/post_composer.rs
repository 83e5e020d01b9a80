use std::sync::Arc;

use crate::models::media::CapturedMedia;

/// Receives media the user chose to share.
///
/// One-way handoff: the session keeps no reference after `submit`, and
/// does not wait for or model a composer-side failure.
pub trait PostComposer: Send + Sync {
    fn submit(&self, media: CapturedMedia);
}

impl<C: PostComposer + ?Sized> PostComposer for Arc<C> {
    fn submit(&self, media: CapturedMedia) {
        (**self).submit(media)
    }
}
