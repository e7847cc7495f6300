//! Interaction-state persistence for OIDC clients.
//!
//! Provides the [`StateStore`] capability consumed by the protocol client,
//! the [`WebStorageStateStore`] adapter over any synchronous [`Storage`], a
//! process-local [`InMemoryWebStorage`], and the [`StorageProvider`] probe
//! used to discover durable storage offered by the hosting environment.
//!
//! # Example
//!
//! ```ignore
//! use oidc_client_store::{install_ambient_storage, InMemoryWebStorage, StateStore, WebStorageStateStore};
//!
//! install_ambient_storage(my_durable_storage);
//!
//! let store = WebStorageStateStore::new(InMemoryWebStorage::new());
//! store.set("state-123", payload).await;
//! ```

pub mod provider;
pub mod state_store;
pub mod storage;

pub use provider::{
    ambient_storage, install_ambient_storage, AmbientStorage, FixedStorage, Headless,
    StorageProvider,
};
pub use state_store::{StateStore, WebStorageStateStore, DEFAULT_PREFIX};
pub use storage::{InMemoryWebStorage, Storage};

pub mod prelude {
    //! Re-exports of the most commonly used store types.
    pub use crate::{InMemoryWebStorage, StateStore, Storage, StorageProvider, WebStorageStateStore};
}
