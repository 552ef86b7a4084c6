//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` builds the one `SessionController` for the page, mirrors its session
//! into a signal for reactive views, and restores any persisted session once
//! mounted in the browser.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::config::ClientConfig;
use crate::guard::{ProtectedRoute, PublicRoute};
use crate::net::transport::DefaultTransport;
use crate::pages::{home::HomePage, login::LoginPage, signup::SignupPage};
use crate::session::persistence::LoadOutcome;
use crate::session::SessionController;

pub type AppController = SessionController<DefaultTransport>;

/// Context handle to the controller. Local storage because the controller is
/// single-threaded.
pub type ControllerHandle = StoredValue<AppController, LocalStorage>;

/// Where a logged-out visitor was headed before being sent to login.
#[derive(Clone, Copy)]
pub struct ReturnTo(pub RwSignal<Option<String>>);

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let controller = AppController::for_current_target(ClientConfig::from_env());

    let session = RwSignal::new(controller.session());
    controller.watch(move |s| {
        let _ = session.try_set(s.clone());
    });

    provide_context(session);
    provide_context(ReturnTo(RwSignal::new(None)));
    let handle: ControllerHandle = StoredValue::new_local(controller);
    provide_context(handle);

    // Effects only run in the browser, so storage is read after hydration.
    Effect::new(move |_| {
        match handle.with_value(|c| c.actions().initialize()) {
            LoadOutcome::Found { user, .. } => leptos::logging::log!("restored session for user {}", user.id),
            LoadOutcome::NotFound => leptos::logging::log!("no saved session"),
            LoadOutcome::Corrupted => {}
        }
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/chirpnest.css"/>
        <Title text="ChirpNest"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route
                    path=StaticSegment("login")
                    view=|| view! { <PublicRoute><LoginPage/></PublicRoute> }
                />
                <Route
                    path=StaticSegment("signup")
                    view=|| view! { <PublicRoute><SignupPage/></PublicRoute> }
                />
                <Route
                    path=StaticSegment("")
                    view=|| view! { <ProtectedRoute><HomePage/></ProtectedRoute> }
                />
            </Routes>
        </Router>
    }
}
