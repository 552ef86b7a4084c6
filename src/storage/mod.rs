//! Origin-scoped key-value storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! Session persistence needs two areas: durable (`localStorage`) and ephemeral
//! (`sessionStorage`). Both sit behind `KeyValueStorage` so the persistence
//! adapter is identical in the browser, during SSR, and in tests.


#[cfg(feature = "hydrate")]
mod browser;
mod memory;

#[cfg(feature = "hydrate")]
pub use browser::BrowserStorage;
pub use memory::MemoryStorage;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage write failed for key `{key}`: {reason}")]
    Write { key: String, reason: String },
}

/// Synchronous string key-value store.
///
/// Reads are infallible from the caller's point of view: an unreadable entry is
/// reported as absent. Writes may fail (quota, privacy mode).
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns `StorageError::Write` if the backing store refuses the value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str);

    /// Snapshot of all keys currently stored.
    fn keys(&self) -> Vec<String>;

    fn clear(&self);
}
