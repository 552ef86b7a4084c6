//! Session store: the single source of truth for authentication state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route guards, pages, and the API client all read identity from here.
//! Every transition is synchronous and total; subscribers are notified with
//! a snapshot after the internal borrow is released, so a subscriber may call
//! straight back into the store.
//!
//! INVARIANTS
//! ==========
//! `is_authenticated` is true iff a user with a non-empty id and a non-empty
//! token are both present. Anything that would break that fails closed into
//! the logged-out state.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::net::types::{User, UserPatch};

pub const INVALID_USER_MESSAGE: &str = "Invalid user data received";

/// Snapshot of authentication state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
    token: Option<String>,
    is_authenticated: bool,
    is_loading: bool,
    error: Option<String>,
}

impl Default for Session {
    /// A fresh process starts loading: nothing may be decided until
    /// rehydration settles.
    fn default() -> Self {
        Self { user: None, token: None, is_authenticated: false, is_loading: true, error: None }
    }
}

impl Session {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Name, else username, else "Anonymous".
    #[must_use]
    pub fn display_name(&self) -> String {
        self.user
            .as_ref()
            .and_then(|u| [u.name.trim(), u.username.trim()].into_iter().find(|s| !s.is_empty()))
            .unwrap_or("Anonymous")
            .to_owned()
    }

    /// Up to two uppercase initials from the user's name; "AN" when unknown.
    #[must_use]
    pub fn initials(&self) -> String {
        let Some(name) = self.user.as_ref().map(|u| u.name.trim()).filter(|n| !n.is_empty()) else {
            return "AN".to_owned();
        };
        name.split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }

    fn logged_out(&mut self, error: Option<String>) {
        self.user = None;
        self.token = None;
        self.is_authenticated = false;
        self.is_loading = false;
        self.error = error;
    }
}

/// Handle returned by [`SessionStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Rc<dyn Fn(&Session)>;

/// Observable owner of the process-wide [`Session`].
#[derive(Default)]
pub struct SessionStore {
    state: RefCell<Session>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: Cell<u64>,
    epoch: Cell<u64>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.state.borrow())
            .field("subscribers", &self.subscribers.borrow().len())
            .field("epoch", &self.epoch.get())
            .finish()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Identity generation. Bumped by every transition that changes who (if
    /// anyone) is logged in, so in-flight work can detect it went stale.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch.get()
    }

    pub fn subscribe(&self, callback: impl Fn(&Session) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.borrow_mut().retain(|(sid, _)| *sid != id);
    }

    /// A login, registration, or rehydration is in flight.
    pub fn begin_load(&self) {
        self.transition(false, |s| {
            s.is_loading = true;
            s.error = None;
        });
    }

    /// Enter the authenticated state. An unusable user or empty token fails
    /// closed into the logged-out state with an error instead.
    pub fn set_authenticated(&self, user: User, token: String) {
        if !user.has_identity() || token.trim().is_empty() {
            leptos::logging::warn!("refusing session for user without identity or token");
            self.reject(INVALID_USER_MESSAGE);
            return;
        }
        self.transition(true, move |s| {
            s.user = Some(user);
            s.token = Some(token);
            s.is_authenticated = true;
            s.is_loading = false;
            s.error = None;
        });
    }

    /// Record a failure without changing identity.
    pub fn set_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.transition(false, move |s| {
            s.is_loading = false;
            s.error = Some(message);
        });
    }

    /// Logged out, no error.
    pub fn clear(&self) {
        self.transition(true, |s| s.logged_out(None));
    }

    /// Logged out with an error describing why.
    pub fn reject(&self, message: impl Into<String>) {
        let message = message.into();
        self.transition(true, move |s| s.logged_out(Some(message)));
    }

    /// Settle a load that intentionally leaves identity unchanged.
    pub fn end_load(&self) {
        self.transition(false, |s| {
            s.is_loading = false;
            s.error = None;
        });
    }

    /// Dismiss the error. Subscribers hear nothing when there was none.
    pub fn clear_error(&self) {
        if self.state.borrow().error.is_none() {
            return;
        }
        self.transition(false, |s| s.error = None);
    }

    /// Merge profile fields into the current user. Returns the updated user,
    /// or `None` when nobody is logged in.
    pub fn update_user(&self, patch: UserPatch) -> Option<User> {
        if !self.state.borrow().is_authenticated {
            return None;
        }
        let mut updated = None;
        self.transition(false, |s| {
            if let Some(user) = s.user.as_mut() {
                patch.apply(user);
                updated = Some(user.clone());
            }
        });
        updated
    }

    fn transition(&self, identity_changed: bool, f: impl FnOnce(&mut Session)) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            f(&mut state);
            state.clone()
        };
        if identity_changed {
            self.epoch.set(self.epoch.get() + 1);
        }
        let subscribers: Vec<Subscriber> =
            self.subscribers.borrow().iter().map(|(_, cb)| Rc::clone(cb)).collect();
        for subscriber in subscribers {
            subscriber(&snapshot);
        }
    }
}
