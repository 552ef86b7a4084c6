//! `web-sys` backed `localStorage` / `sessionStorage`.

use super::{KeyValueStorage, StorageError};

/// Wrapper over a browser `Storage` area.
#[derive(Clone, Debug)]
pub struct BrowserStorage {
    inner: web_sys::Storage,
}

impl BrowserStorage {
    /// The origin's durable `localStorage`, if the browser exposes it.
    #[must_use]
    pub fn local() -> Option<Self> {
        let inner = web_sys::window()?.local_storage().ok().flatten()?;
        Some(Self { inner })
    }

    /// The tab's ephemeral `sessionStorage`, if the browser exposes it.
    #[must_use]
    pub fn session() -> Option<Self> {
        let inner = web_sys::window()?.session_storage().ok().flatten()?;
        Some(Self { inner })
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.inner.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set_item(key, value).map_err(|e| StorageError::Write {
            key: key.to_owned(),
            reason: e.as_string().unwrap_or_else(|| format!("{e:?}")),
        })
    }

    fn remove_item(&self, key: &str) {
        let _ = self.inner.remove_item(key);
    }

    fn keys(&self) -> Vec<String> {
        let len = self.inner.length().unwrap_or(0);
        (0..len).filter_map(|i| self.inner.key(i).ok().flatten()).collect()
    }

    fn clear(&self) {
        let _ = self.inner.clear();
    }
}
