use std::convert::Infallible;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::storage::Storage;

/// Capability probe for durable storage offered by the hosting environment.
///
/// Probed once when settings are resolved. `Ok(None)` means the environment
/// has no durable storage and the caller should fall back to an ephemeral
/// store. Errors are not handled by the resolver; they reach its caller.
pub trait StorageProvider {
    type Error;

    fn probe(&self) -> Result<Option<Arc<dyn Storage>>, Self::Error>;
}

// Process-wide durable storage slot.
static AMBIENT_STORAGE: OnceLock<Arc<dyn Storage>> = OnceLock::new();

/// Register the durable storage of the hosting environment.
///
/// Only the first call wins; returns `false` if storage was already installed.
/// Typically called once at application startup.
pub fn install_ambient_storage(storage: impl Storage) -> bool {
    let installed = AMBIENT_STORAGE.set(Arc::new(storage)).is_ok();
    if installed {
        debug!("ambient durable storage installed");
    }
    installed
}

/// The installed durable storage, if any.
pub fn ambient_storage() -> Option<Arc<dyn Storage>> {
    AMBIENT_STORAGE.get().cloned()
}

/// Probes the process-wide slot filled by [`install_ambient_storage`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AmbientStorage;

impl StorageProvider for AmbientStorage {
    type Error = Infallible;

    fn probe(&self) -> Result<Option<Arc<dyn Storage>>, Infallible> {
        Ok(ambient_storage())
    }
}

/// A non-interactive environment: never offers durable storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl StorageProvider for Headless {
    type Error = Infallible;

    fn probe(&self) -> Result<Option<Arc<dyn Storage>>, Infallible> {
        Ok(None)
    }
}

/// Always offers the given storage. Useful for tests and for hosts that
/// manage their own storage handle instead of the global slot.
#[derive(Clone)]
pub struct FixedStorage(pub Arc<dyn Storage>);

impl StorageProvider for FixedStorage {
    type Error = Infallible;

    fn probe(&self) -> Result<Option<Arc<dyn Storage>>, Infallible> {
        Ok(Some(self.0.clone()))
    }
}
