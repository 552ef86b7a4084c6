//! Hard logout on 401.
//!
//! SYSTEM CONTEXT
//! ==============
//! `ApiClient` reports every 401 from an intercepted call here, tagged with the
//! session epoch the request was issued under. Business fetches never see
//! session expiry; they just get `ApiError::Unauthorized` back.
//!
//! TRADE-OFFS
//! ==========
//! Duplicate triggers are collapsed twice over: the `logging_out` flag absorbs
//! re-entrant triggers raised while the sequence runs, and the epoch check drops
//! 401s from requests that were issued under a session that is already gone.

#[cfg(test)]
#[path = "interceptor_test.rs"]
mod interceptor_test;

use std::cell::Cell;
use std::rc::Rc;

use super::persistence::SessionPersistence;
use super::store::SessionStore;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("no browser window available")]
    NoWindow,
    #[error("navigation to `{path}` failed: {reason}")]
    Failed { path: String, reason: String },
}

/// Performs full-page navigations.
pub trait Navigator {
    /// # Errors
    ///
    /// Returns `NavigationError` when the navigation could not be started.
    fn navigate(&self, path: &str) -> Result<(), NavigationError>;
}

/// Navigator that sets `window.location.href`.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

#[cfg(feature = "hydrate")]
impl Navigator for BrowserNavigator {
    fn navigate(&self, path: &str) -> Result<(), NavigationError> {
        let window = web_sys::window().ok_or(NavigationError::NoWindow)?;
        window.location().set_href(path).map_err(|e| NavigationError::Failed {
            path: path.to_owned(),
            reason: e.as_string().unwrap_or_else(|| format!("{e:?}")),
        })
    }
}

/// Navigator for non-browser builds; there is nowhere to go.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetachedNavigator;

impl Navigator for DetachedNavigator {
    fn navigate(&self, path: &str) -> Result<(), NavigationError> {
        leptos::logging::log!("detached navigator ignoring navigation to {path}");
        Ok(())
    }
}

/// Clears `logging_out` when the logout sequence exits, however it exits.
struct ResetOnDrop<'a>(&'a Cell<bool>);

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct UnauthorizedInterceptor {
    logging_out: Cell<bool>,
    store: Rc<SessionStore>,
    persistence: Rc<SessionPersistence>,
    navigator: Rc<dyn Navigator>,
    login_path: String,
}

impl UnauthorizedInterceptor {
    #[must_use]
    pub fn new(
        store: Rc<SessionStore>,
        persistence: Rc<SessionPersistence>,
        navigator: Rc<dyn Navigator>,
        login_path: String,
    ) -> Self {
        Self { logging_out: Cell::new(false), store, persistence, navigator, login_path }
    }

    /// Whether a logout sequence is currently running.
    #[must_use]
    pub fn is_logging_out(&self) -> bool {
        self.logging_out.get()
    }

    /// Run the hard logout: clear the store, purge storage, go to login.
    ///
    /// Returns `false` without doing anything if a logout is already running.
    pub fn on_unauthorized(&self) -> bool {
        if self.logging_out.replace(true) {
            return false;
        }
        let _reset = ResetOnDrop(&self.logging_out);

        leptos::logging::warn!("401 Unauthorized detected, logging out user");
        self.store.clear();
        self.persistence.purge();
        if let Err(e) = self.navigator.navigate(&self.login_path) {
            leptos::logging::error!("error during logout navigation: {e}");
        }
        leptos::logging::log!("user logged out due to 401 Unauthorized");
        true
    }

    /// Entry point for the API client: a 401 from a request issued under
    /// `issued_epoch`. Stale reports are ignored.
    pub fn notify_unauthorized(&self, issued_epoch: u64) -> bool {
        let current = self.store.epoch();
        if issued_epoch != current {
            leptos::logging::log!(
                "ignoring 401 from stale session (issued at epoch {issued_epoch}, now {current})"
            );
            return false;
        }
        self.on_unauthorized()
    }
}
