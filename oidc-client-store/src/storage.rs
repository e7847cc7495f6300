use std::sync::Arc;

use dashmap::DashMap;

/// Synchronous key-value storage, shaped like the Web Storage API.
///
/// This is what a hosting environment exposes as durable storage. The
/// [`WebStorageStateStore`](crate::WebStorageStateStore) adapter turns any
/// `Storage` into a [`StateStore`](crate::StateStore).
pub trait Storage: Send + Sync + 'static {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: String);
    fn remove_item(&self, key: &str) -> Option<String>;
    /// All keys currently held, in no particular order.
    fn keys(&self) -> Vec<String>;
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: String) {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Option<String> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

/// Process-local, non-persistent [`Storage`] backed by `DashMap`.
///
/// Used when no durable storage is available (headless environments, tests).
/// Cloning shares the underlying map.
#[derive(Clone, Debug, Default)]
pub struct InMemoryWebStorage {
    inner: Arc<DashMap<String, String>>,
}

impl InMemoryWebStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.inner.clear();
    }
}

impl Storage for InMemoryWebStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|entry| entry.value().clone())
    }

    fn set_item(&self, key: &str, value: String) {
        self.inner.insert(key.to_string(), value);
    }

    fn remove_item(&self, key: &str) -> Option<String> {
        self.inner.remove(key).map(|(_, value)| value)
    }

    fn keys(&self) -> Vec<String> {
        self.inner.iter().map(|entry| entry.key().clone()).collect()
    }
}
