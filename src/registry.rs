//! Tracked-document registry
//!
//! Maintains the deduplicated, insertion-ordered set of document
//! identifiers considered "open" for copy purposes. The copy-all command
//! iterates this sequence, so its order is the order documents were first
//! tracked, not the order they were last focused.
//!
//! Identifiers are compared by structural [`Url`] equality (the serialized
//! string form), and the same comparison is used by both `track` and
//! `untrack`.

use url::Url;

/// Ordered, duplicate-free collection of tracked document identifiers.
///
/// Constructed once per server instance and owned by the backend; all
/// mutation goes through [`track`](Self::track) and
/// [`untrack`](Self::untrack).
#[derive(Debug, Default)]
pub struct DocumentRegistry {
    entries: Vec<Url>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the identifier if it is not already tracked.
    ///
    /// Idempotent: tracking an already-present identifier leaves the
    /// sequence untouched. Returns `true` if the identifier was added.
    pub fn track(&mut self, uri: &Url) -> bool {
        if self.entries.iter().any(|tracked| tracked == uri) {
            return false;
        }
        self.entries.push(uri.clone());
        true
    }

    /// Remove every occurrence of the identifier (at most one, by the
    /// uniqueness invariant). Returns `true` if anything was removed.
    pub fn untrack(&mut self, uri: &Url) -> bool {
        let before = self.entries.len();
        self.entries.retain(|tracked| tracked != uri);
        self.entries.len() != before
    }

    /// Track every identifier in `uris` that is not already present,
    /// preserving the iteration order of `uris` for the appended tail.
    ///
    /// Used by copy-all to fold currently visible editors into the
    /// registry before rendering. Returns how many identifiers were newly
    /// added.
    pub fn reconcile<'a>(&mut self, uris: impl IntoIterator<Item = &'a Url>) -> usize {
        uris.into_iter().filter(|uri| self.track(uri)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The current sequence of tracked identifiers, in tracking order.
    ///
    /// Returns an owned copy so iteration can suspend (document resolution
    /// awaits host I/O) without holding a borrow of the registry.
    pub fn snapshot(&self) -> Vec<Url> {
        self.entries.clone()
    }
}
