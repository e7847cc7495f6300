use std::fmt;
use std::future::Future;
use std::pin::Pin;

use tracing::trace;

use crate::storage::Storage;

/// Default key prefix used by [`WebStorageStateStore`].
pub const DEFAULT_PREFIX: &str = "oidc.";

/// Persistence for interaction state kept between starting and completing an
/// authorization round-trip.
///
/// Implement this to back the client with your own storage (Redis, a
/// database, a cookie jar...). Operations are asynchronous so remote stores
/// fit; the bundled adapter completes immediately.
pub trait StateStore: Send + Sync + 'static {
    fn set<'a>(&'a self, key: &'a str, value: String) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
    fn get<'a>(&'a self, key: &'a str) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>>;
    /// Remove an entry, returning the value it held.
    fn remove<'a>(&'a self, key: &'a str) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>>;
    /// Keys of every entry owned by this store.
    fn all_keys(&self) -> Pin<Box<dyn Future<Output = Vec<String>> + Send + '_>>;
}

/// [`StateStore`] adapter over a synchronous [`Storage`].
///
/// Every key is namespaced with a prefix (default `"oidc."`) so the adapter
/// can share a storage area with unrelated data.
pub struct WebStorageStateStore<S> {
    storage: S,
    prefix: String,
}

impl<S: Storage> WebStorageStateStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    /// Replace the key prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The wrapped storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl<S> fmt::Debug for WebStorageStateStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebStorageStateStore")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl<S: Storage> StateStore for WebStorageStateStore<S> {
    fn set<'a>(&'a self, key: &'a str, value: String) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            trace!(key, "state store set");
            self.storage.set_item(&self.storage_key(key), value);
        })
    }

    fn get<'a>(&'a self, key: &'a str) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        Box::pin(async move {
            trace!(key, "state store get");
            self.storage.get_item(&self.storage_key(key))
        })
    }

    fn remove<'a>(&'a self, key: &'a str) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        Box::pin(async move {
            trace!(key, "state store remove");
            self.storage.remove_item(&self.storage_key(key))
        })
    }

    fn all_keys(&self) -> Pin<Box<dyn Future<Output = Vec<String>> + Send + '_>> {
        Box::pin(async move {
            self.storage
                .keys()
                .into_iter()
                .filter_map(|k| k.strip_prefix(self.prefix.as_str()).map(str::to_string))
                .collect()
        })
    }
}
