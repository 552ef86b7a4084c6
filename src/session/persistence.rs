//! Durable-storage mirror of the session.
//!
//! DESIGN
//! ======
//! Two independent keys, `user` (JSON) and `token` (raw). They are trusted only
//! together: any disagreement or unreadable value is treated as corruption and
//! both keys are deleted on the spot, so the next load starts clean.

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;

use std::rc::Rc;

use crate::net::types::User;
use crate::storage::{KeyValueStorage, StorageError};

pub const USER_KEY: &str = "user";
pub const TOKEN_KEY: &str = "token";

/// Result of reading the persisted session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Found { user: User, token: String },
    NotFound,
    Corrupted,
}

pub struct SessionPersistence {
    durable: Rc<dyn KeyValueStorage>,
    ephemeral: Rc<dyn KeyValueStorage>,
    purge_prefixes: Vec<String>,
}

impl SessionPersistence {
    #[must_use]
    pub fn new(
        durable: Rc<dyn KeyValueStorage>,
        ephemeral: Rc<dyn KeyValueStorage>,
        purge_prefixes: Vec<String>,
    ) -> Self {
        Self { durable, ephemeral, purge_prefixes }
    }

    pub fn load(&self) -> LoadOutcome {
        let stored_user = self.durable.get_item(USER_KEY);
        let stored_token = self.durable.get_item(TOKEN_KEY);

        let reason = match (stored_user, stored_token) {
            (None, None) => return LoadOutcome::NotFound,
            (Some(raw), Some(token)) if !token.trim().is_empty() => match User::from_json_str(&raw) {
                Ok(user) => return LoadOutcome::Found { user, token },
                Err(e) => e.to_string(),
            },
            (Some(_), Some(_)) => "stored token is empty".to_owned(),
            (Some(_), None) => "stored user has no token".to_owned(),
            (None, Some(_)) => "stored token has no user".to_owned(),
        };

        leptos::logging::warn!("discarding corrupted stored session: {reason}");
        self.clear_session();
        LoadOutcome::Corrupted
    }

    /// Write both keys. If either write fails, neither key is left behind.
    ///
    /// # Errors
    ///
    /// Returns the `StorageError` of the failing write.
    pub fn save(&self, user: &User, token: &str) -> Result<(), StorageError> {
        let raw = serialize_user(user)?;
        let written = self
            .durable
            .set_item(USER_KEY, &raw)
            .and_then(|()| self.durable.set_item(TOKEN_KEY, token));
        if let Err(e) = written {
            leptos::logging::error!("session persistence failed: {e}");
            self.clear_session();
            return Err(e);
        }
        Ok(())
    }

    /// Rewrite only the stored user after a profile update.
    ///
    /// # Errors
    ///
    /// Returns the `StorageError` of the failing write.
    pub fn save_user(&self, user: &User) -> Result<(), StorageError> {
        let raw = serialize_user(user)?;
        self.durable.set_item(USER_KEY, &raw)
    }

    /// Remove the session keys, every app-namespaced durable key, and all
    /// ephemeral storage.
    pub fn purge(&self) {
        self.clear_session();
        for key in self.durable.keys() {
            if self.purge_prefixes.iter().any(|prefix| key.starts_with(prefix.as_str())) {
                self.durable.remove_item(&key);
            }
        }
        self.ephemeral.clear();
    }

    /// Remove only the `user` and `token` keys.
    pub fn clear_session(&self) {
        self.durable.remove_item(USER_KEY);
        self.durable.remove_item(TOKEN_KEY);
    }
}

fn serialize_user(user: &User) -> Result<String, StorageError> {
    serde_json::to_string(user)
        .map_err(|e| StorageError::Write { key: USER_KEY.to_owned(), reason: e.to_string() })
}
