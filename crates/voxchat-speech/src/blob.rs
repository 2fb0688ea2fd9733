//! Object URLs: short-lived local references to in-memory audio.
//!
//! A synthesized payload is registered once, handed to the audio output by
//! URL, and revoked when its session ends. Revoking drops the bytes.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use uuid::Uuid;

/// Reference to a payload held by a [`BlobStore`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shared registry of live object URLs. Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct BlobStore {
    entries: Arc<Mutex<HashMap<ObjectUrl, Bytes>>>,
}

impl BlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `data` and return a fresh URL for it.
    pub fn create(&self, data: Bytes) -> ObjectUrl {
        let url = ObjectUrl(format!("blob:voxchat/{}", Uuid::new_v4()));
        tracing::trace!(url = %url, bytes = data.len(), "Object URL created");
        self.lock().insert(url.clone(), data);
        url
    }

    /// Payload behind `url`, if it is still live.
    #[must_use]
    pub fn resolve(&self, url: &ObjectUrl) -> Option<Bytes> {
        self.lock().get(url).cloned()
    }

    /// Release `url`. Returns whether it was live.
    pub fn revoke(&self, url: &ObjectUrl) -> bool {
        let removed = self.lock().remove(url).is_some();
        tracing::trace!(url = %url, removed, "Object URL revoked");
        removed
    }

    /// Number of live URLs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ObjectUrl, Bytes>> {
        // The map holds no invariants a panicking writer could break.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_resolve_revoke() {
        let store = BlobStore::new();
        let url = store.create(Bytes::from_static(b"RIFF"));

        assert!(url.as_str().starts_with("blob:voxchat/"));
        assert_eq!(store.resolve(&url).as_deref(), Some(&b"RIFF"[..]));
        assert_eq!(store.len(), 1);

        assert!(store.revoke(&url));
        assert!(store.resolve(&url).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn revoke_twice_is_harmless() {
        let store = BlobStore::new();
        let url = store.create(Bytes::new());
        assert!(store.revoke(&url));
        assert!(!store.revoke(&url));
    }

    #[test]
    fn urls_are_unique_and_clones_share_state() {
        let store = BlobStore::new();
        let other = store.clone();
        let a = store.create(Bytes::from_static(b"a"));
        let b = other.create(Bytes::from_static(b"b"));
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
        assert_eq!(other.resolve(&a).as_deref(), Some(&b"a"[..]));
    }
}
