use crate::models::media::CapturedMedia;

/// Holds at most one captured media pending the user's decision.
///
/// Discard and share both take the media out, so whichever runs first wins
/// and the other finds nothing to act on.
#[derive(Debug, Default)]
pub struct ReviewHandoff {
    pending: Option<CapturedMedia>,
}

impl ReviewHandoff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store freshly captured media. Replaces anything still pending.
    pub fn hold(&mut self, media: CapturedMedia) {
        if let Some(previous) = self.pending.replace(media) {
            log::warn!("replacing unreviewed media {}", previous.id());
        }
    }

    pub fn current(&self) -> Option<&CapturedMedia> {
        self.pending.as_ref()
    }

    /// Drop the pending media. Returns whether anything was discarded.
    pub fn discard(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Release the pending media for handoff to the composer.
    pub fn take_for_share(&mut self) -> Option<CapturedMedia> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::CaptureConfiguration;

    fn photo(uri: &str) -> CapturedMedia {
        CapturedMedia::photo(uri, &CaptureConfiguration::default())
    }

    #[test]
    fn discard_then_share_yields_nothing() {
        let mut review = ReviewHandoff::new();
        review.hold(photo("a"));

        assert!(review.discard());
        assert!(review.take_for_share().is_none());
        assert!(review.current().is_none());
    }

    #[test]
    fn share_takes_the_held_media_once() {
        let mut review = ReviewHandoff::new();
        review.hold(photo("a"));
        assert_eq!(review.current().map(|m| m.uri()), Some("a"));

        let shared = review.take_for_share().unwrap();
        assert_eq!(shared.uri(), "a");
        assert!(review.take_for_share().is_none());
        assert!(!review.discard());
    }

    #[test]
    fn hold_replaces_pending_media() {
        let mut review = ReviewHandoff::new();
        review.hold(photo("a"));
        review.hold(photo("b"));
        assert_eq!(review.current().map(|m| m.uri()), Some("b"));
    }
}
