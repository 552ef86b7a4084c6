//! The session handle injected into the app.
//!
//! SYSTEM CONTEXT
//! ==============
//! Built once at startup and provided through Leptos context. Everything that
//! talks to the backend or reads identity gets it from here, so there is no
//! process-global interceptor and no patched fetch.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::rc::Rc;

use super::actions::AuthActions;
use super::interceptor::{Navigator, UnauthorizedInterceptor};
use super::persistence::SessionPersistence;
use super::store::{Session, SessionStore, SubscriptionId};
use crate::config::ClientConfig;
use crate::net::client::ApiClient;
use crate::net::transport::{DefaultTransport, Transport};
use crate::storage::{KeyValueStorage, MemoryStorage};

pub struct SessionController<T> {
    config: Rc<ClientConfig>,
    store: Rc<SessionStore>,
    interceptor: Rc<UnauthorizedInterceptor>,
    api: Rc<ApiClient<T>>,
    actions: Rc<AuthActions<T>>,
}

impl<T> Clone for SessionController<T> {
    fn clone(&self) -> Self {
        Self {
            config: Rc::clone(&self.config),
            store: Rc::clone(&self.store),
            interceptor: Rc::clone(&self.interceptor),
            api: Rc::clone(&self.api),
            actions: Rc::clone(&self.actions),
        }
    }
}

impl<T: Transport> SessionController<T> {
    #[must_use]
    pub fn new(
        config: ClientConfig,
        transport: T,
        durable: Rc<dyn KeyValueStorage>,
        ephemeral: Rc<dyn KeyValueStorage>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        let config = Rc::new(config);
        let store = Rc::new(SessionStore::new());
        let persistence = Rc::new(SessionPersistence::new(durable, ephemeral, config.purge_prefixes.clone()));
        let interceptor = Rc::new(UnauthorizedInterceptor::new(
            Rc::clone(&store),
            Rc::clone(&persistence),
            navigator,
            config.routes.login.clone(),
        ));
        let api = Rc::new(ApiClient::new(transport, Rc::clone(&config), Rc::clone(&store), Rc::clone(&interceptor)));
        let actions = Rc::new(AuthActions::new(Rc::clone(&api), Rc::clone(&store), persistence));
        Self { config, store, interceptor, api, actions }
    }
}

impl<T> SessionController<T> {
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.store.snapshot()
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    #[must_use]
    pub fn actions(&self) -> &AuthActions<T> {
        &self.actions
    }

    #[must_use]
    pub fn interceptor(&self) -> &UnauthorizedInterceptor {
        &self.interceptor
    }

    /// Forward every store transition to `callback`, starting with the
    /// current state.
    pub fn watch(&self, callback: impl Fn(&Session) + 'static) -> SubscriptionId {
        callback(&self.store.snapshot());
        self.store.subscribe(callback)
    }
}

impl SessionController<DefaultTransport> {
    /// Controller for the current build target: browser storage, `fetch`, and
    /// full-page navigation under `hydrate`; in-memory and offline otherwise.
    #[must_use]
    pub fn for_current_target(config: ClientConfig) -> Self {
        #[cfg(feature = "hydrate")]
        {
            use super::interceptor::BrowserNavigator;
            use crate::storage::BrowserStorage;

            let durable: Rc<dyn KeyValueStorage> = match BrowserStorage::local() {
                Some(storage) => Rc::new(storage),
                None => {
                    leptos::logging::warn!("localStorage unavailable; session will not survive reloads");
                    Rc::new(MemoryStorage::new())
                }
            };
            let ephemeral: Rc<dyn KeyValueStorage> = match BrowserStorage::session() {
                Some(storage) => Rc::new(storage),
                None => Rc::new(MemoryStorage::new()),
            };
            Self::new(config, DefaultTransport::default(), durable, ephemeral, Rc::new(BrowserNavigator))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            use super::interceptor::DetachedNavigator;

            Self::new(
                config,
                DefaultTransport::default(),
                Rc::new(MemoryStorage::new()),
                Rc::new(MemoryStorage::new()),
                Rc::new(DetachedNavigator),
            )
        }
    }
}
