//! Login, registration, and rehydration transitions.
//!
//! DESIGN
//! ======
//! Each action is a small `Idle -> Pending -> Fulfilled | Rejected` machine.
//! Every call takes a sequence number and remembers the store epoch it started
//! under; when the network call resolves, the result is applied only if no
//! newer call of the same action started and the session identity has not
//! changed in the meantime. That keeps a slow login from resurrecting a
//! session the user already logged out of.

#[cfg(test)]
#[path = "actions_test.rs"]
mod actions_test;

use std::cell::Cell;
use std::rc::Rc;

use super::persistence::{LoadOutcome, SessionPersistence};
use super::store::SessionStore;
use crate::net::client::{ApiClient, ApiError};
use crate::net::transport::Transport;
use crate::net::types::{AuthResponse, User, UserPatch};
use crate::storage::StorageError;

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";
pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed";
pub const RESTORE_FAILED_MESSAGE: &str = "Failed to restore session";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Login,
    Register,
    Initialize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActionPhase {
    #[default]
    Idle,
    Pending,
    Fulfilled,
    Rejected,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The backend answered but refused; carries its message.
    #[error("{0}")]
    Rejected(String),
    #[error("Invalid user data received")]
    MalformedPayload,
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("failed to save session: {0}")]
    Storage(#[from] StorageError),
    #[error("Failed to restore session")]
    CorruptedSession,
    /// A newer call or a logout overtook this one; nothing was applied.
    #[error("superseded by a newer session change")]
    Superseded,
}

#[derive(Debug, Default)]
struct ActionTracker {
    phase: Cell<ActionPhase>,
    seq: Cell<u64>,
}

impl ActionTracker {
    fn start(&self) -> u64 {
        let seq = self.seq.get() + 1;
        self.seq.set(seq);
        self.phase.set(ActionPhase::Pending);
        seq
    }

    fn is_current(&self, seq: u64) -> bool {
        self.seq.get() == seq
    }

    fn settle(&self, seq: u64, phase: ActionPhase) {
        if self.is_current(seq) {
            self.phase.set(phase);
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Ticket {
    kind: ActionKind,
    seq: u64,
    epoch: u64,
}

pub struct AuthActions<T> {
    api: Rc<ApiClient<T>>,
    store: Rc<SessionStore>,
    persistence: Rc<SessionPersistence>,
    login: ActionTracker,
    register: ActionTracker,
    initialize: ActionTracker,
}

impl<T: Transport> AuthActions<T> {
    #[must_use]
    pub fn new(api: Rc<ApiClient<T>>, store: Rc<SessionStore>, persistence: Rc<SessionPersistence>) -> Self {
        Self {
            api,
            store,
            persistence,
            login: ActionTracker::default(),
            register: ActionTracker::default(),
            initialize: ActionTracker::default(),
        }
    }

    #[must_use]
    pub fn phase(&self, kind: ActionKind) -> ActionPhase {
        self.tracker(kind).phase.get()
    }

    /// Return a settled action to `Idle` once its outcome has been shown.
    pub fn acknowledge(&self, kind: ActionKind) {
        let tracker = self.tracker(kind);
        if matches!(tracker.phase.get(), ActionPhase::Fulfilled | ActionPhase::Rejected) {
            tracker.phase.set(ActionPhase::Idle);
        }
    }

    /// Authenticate, persist, then publish the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` when the backend refuses, the payload is malformed,
    /// the session cannot be persisted, or the call was superseded. Every error
    /// except `Superseded` leaves the store logged out with the error message.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let ticket = self.begin(ActionKind::Login);
        let result = self.api.authenticate(email, password).await;
        if self.is_stale(ticket) {
            return Err(self.supersede(ticket));
        }

        let accepted = result
            .map_err(login_api_error)
            .and_then(accept_login)
            .and_then(|(user, token)| {
                self.persistence.save(&user, &token)?;
                Ok((user, token))
            });

        match accepted {
            Ok((user, token)) => {
                self.store.set_authenticated(user.clone(), token);
                self.finish(ticket, ActionPhase::Fulfilled);
                Ok(user)
            }
            Err(e) => {
                leptos::logging::warn!("login rejected: {e}");
                self.persistence.clear_session();
                self.store.reject(e.to_string());
                self.finish(ticket, ActionPhase::Rejected);
                Err(e)
            }
        }
    }

    /// Create an account. Success does not log the caller in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` when the backend refuses, the payload is malformed,
    /// or the call was superseded.
    pub async fn register(
        &self,
        full_name: &str,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let ticket = self.begin(ActionKind::Register);
        let result = self.api.register(full_name, username, email, password).await;
        if self.is_stale(ticket) {
            return Err(self.supersede(ticket));
        }

        match result.map_err(AuthError::from).and_then(accept_registration) {
            Ok(user) => {
                self.store.end_load();
                self.finish(ticket, ActionPhase::Fulfilled);
                Ok(user)
            }
            Err(e) => {
                leptos::logging::warn!("registration rejected: {e}");
                self.store.set_error(e.to_string());
                self.finish(ticket, ActionPhase::Rejected);
                Err(e)
            }
        }
    }

    /// Rehydrate the session from durable storage at startup.
    pub fn initialize(&self) -> LoadOutcome {
        let ticket = self.begin(ActionKind::Initialize);
        let outcome = self.persistence.load();
        match &outcome {
            LoadOutcome::Found { user, token } => {
                self.store.set_authenticated(user.clone(), token.clone());
                self.finish(ticket, ActionPhase::Fulfilled);
            }
            LoadOutcome::NotFound => {
                self.store.clear();
                self.finish(ticket, ActionPhase::Fulfilled);
            }
            LoadOutcome::Corrupted => {
                self.store.reject(AuthError::CorruptedSession.to_string());
                self.finish(ticket, ActionPhase::Rejected);
            }
        }
        outcome
    }

    /// User-initiated logout. The route guards take care of leaving the page.
    pub fn logout(&self) {
        self.store.clear();
        self.persistence.purge();
        leptos::logging::log!("user logged out");
    }

    /// Merge profile changes into the session and the stored user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the stored user could not be rewritten; the
    /// in-memory session keeps the update either way.
    pub fn update_profile(&self, patch: UserPatch) -> Result<Option<User>, StorageError> {
        let Some(user) = self.store.update_user(patch) else {
            return Ok(None);
        };
        self.persistence.save_user(&user)?;
        Ok(Some(user))
    }

    fn tracker(&self, kind: ActionKind) -> &ActionTracker {
        match kind {
            ActionKind::Login => &self.login,
            ActionKind::Register => &self.register,
            ActionKind::Initialize => &self.initialize,
        }
    }

    fn begin(&self, kind: ActionKind) -> Ticket {
        let seq = self.tracker(kind).start();
        self.store.begin_load();
        Ticket { kind, seq, epoch: self.store.epoch() }
    }

    fn is_stale(&self, ticket: Ticket) -> bool {
        !self.tracker(ticket.kind).is_current(ticket.seq) || self.store.epoch() != ticket.epoch
    }

    fn supersede(&self, ticket: Ticket) -> AuthError {
        leptos::logging::log!("discarding stale {:?} resolution", ticket.kind);
        self.tracker(ticket.kind).settle(ticket.seq, ActionPhase::Idle);
        AuthError::Superseded
    }

    fn finish(&self, ticket: Ticket, phase: ActionPhase) {
        self.tracker(ticket.kind).settle(ticket.seq, phase);
    }
}

fn non_empty(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}

/// A success body that cannot be decoded is a malformed payload, not a
/// transport problem.
fn login_api_error(err: ApiError) -> AuthError {
    match err {
        ApiError::Decode(_) => AuthError::MalformedPayload,
        other => AuthError::Api(other),
    }
}

fn accept_login(resp: AuthResponse) -> Result<(User, String), AuthError> {
    if !resp.success {
        return Err(AuthError::Rejected(
            non_empty(resp.message).unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_owned()),
        ));
    }
    let user = resp
        .data
        .ok_or(AuthError::MalformedPayload)
        .and_then(|data| User::from_value(data).map_err(|_| AuthError::MalformedPayload))?;
    let token = resp
        .token
        .filter(|t| !t.trim().is_empty())
        .ok_or(AuthError::MalformedPayload)?;
    Ok((user, token))
}

fn accept_registration(resp: AuthResponse) -> Result<User, AuthError> {
    if !resp.success {
        return Err(AuthError::Rejected(
            non_empty(resp.message).unwrap_or_else(|| REGISTRATION_FAILED_MESSAGE.to_owned()),
        ));
    }
    resp.data
        .ok_or(AuthError::MalformedPayload)
        .and_then(|data| User::from_value(data).map_err(|_| AuthError::MalformedPayload))
}
