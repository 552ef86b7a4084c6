//! Route guards gating pages on session state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `ProtectedRoute` wraps pages that need a session, `PublicRoute` wraps the
//! login and signup pages. Both hold off on any decision while the session is
//! loading so a restored session never flashes the login screen. The decision
//! logic is plain functions; the components only render the outcome.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_location;

use crate::app::{ControllerHandle, ReturnTo};
use crate::components::loading_spinner::LoadingSpinner;
use crate::config::Routes;
use crate::session::Session;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session state is not settled yet.
    Loading,
    /// Send the visitor to login, remembering where they were headed.
    RedirectToLogin { from: String },
    RedirectTo(String),
    Render,
}

/// Decision for a page that requires a session.
#[must_use]
pub fn protected_decision(session: &Session, location: &str) -> GuardDecision {
    if session.is_loading() {
        GuardDecision::Loading
    } else if !session.is_authenticated() || session.user().is_none() {
        GuardDecision::RedirectToLogin { from: location.to_owned() }
    } else {
        GuardDecision::Render
    }
}

/// Decision for a page only meaningful without a session.
#[must_use]
pub fn public_decision(session: &Session, return_to: Option<&str>, routes: &Routes) -> GuardDecision {
    if session.is_loading() {
        GuardDecision::Loading
    } else if session.is_authenticated() {
        GuardDecision::RedirectTo(sanitize_return_path(return_to, routes))
    } else {
        GuardDecision::Render
    }
}

/// Only same-origin absolute paths outside the auth pages are honored.
#[must_use]
pub fn sanitize_return_path(from: Option<&str>, routes: &Routes) -> String {
    let Some(path) = from.map(str::trim) else {
        return routes.home.clone();
    };
    let route = path.split(['?', '#']).next().unwrap_or_default();
    let is_local = path.starts_with('/') && !path.starts_with("//") && !path.contains('\\');
    if !is_local || route == routes.login || route == routes.signup {
        return routes.home.clone();
    }
    path.to_owned()
}

/// Path plus query string, as recorded for the post-login return.
#[must_use]
pub fn return_path(pathname: &str, search: &str) -> String {
    match search.trim_start_matches('?') {
        "" => pathname.to_owned(),
        query => format!("{pathname}?{query}"),
    }
}

/// Protected decision as a memo, so session changes that keep the decision
/// (an error set or dismissed) do not rebuild the page.
pub fn protected_memo(
    session: RwSignal<Session>,
    location: impl Fn() -> String + Send + Sync + 'static,
) -> Memo<GuardDecision> {
    Memo::new(move |_| {
        let from = location();
        session.with(|s| protected_decision(s, &from))
    })
}

/// Public decision as a memo. The return path is read untracked; it only
/// matters at the moment the session becomes authenticated.
pub fn public_memo(session: RwSignal<Session>, return_to: ReturnTo, routes: Routes) -> Memo<GuardDecision> {
    Memo::new(move |_| {
        let target = return_to.0.get_untracked();
        session.with(|s| public_decision(s, target.as_deref(), &routes))
    })
}

#[component]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let return_to = expect_context::<ReturnTo>();
    let login_path = expect_context::<ControllerHandle>().with_value(|c| c.config().routes.login.clone());
    let location = use_location();
    let decision = protected_memo(session, move || return_path(&location.pathname.get(), &location.search.get()));

    move || match decision.get() {
        GuardDecision::Loading => view! { <LoadingSpinner/> }.into_any(),
        GuardDecision::RedirectToLogin { from } => {
            return_to.0.set(Some(from));
            view! { <Redirect path=login_path.clone()/> }.into_any()
        }
        GuardDecision::RedirectTo(path) => view! { <Redirect path=path/> }.into_any(),
        GuardDecision::Render => children(),
    }
}

#[component]
pub fn PublicRoute(children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let return_to = expect_context::<ReturnTo>();
    let routes = expect_context::<ControllerHandle>().with_value(|c| c.config().routes.clone());
    let decision = public_memo(session, return_to, routes);

    move || match decision.get() {
        GuardDecision::Loading => view! { <LoadingSpinner/> }.into_any(),
        GuardDecision::RedirectTo(path) => {
            return_to.0.set(None);
            view! { <Redirect path=path/> }.into_any()
        }
        GuardDecision::RedirectToLogin { .. } | GuardDecision::Render => children(),
    }
}
