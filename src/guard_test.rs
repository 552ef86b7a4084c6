use super::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::session::SessionStore;
use crate::test_support::{fixture, user};

fn loading() -> Session {
    SessionStore::new().snapshot()
}

fn logged_out() -> Session {
    let store = SessionStore::new();
    store.clear();
    store.snapshot()
}

fn logged_in() -> Session {
    let store = SessionStore::new();
    store.set_authenticated(user("1"), "tok".to_owned());
    store.snapshot()
}

fn loading_while_logged_in() -> Session {
    let store = SessionStore::new();
    store.set_authenticated(user("1"), "tok".to_owned());
    store.begin_load();
    store.snapshot()
}

// =============================================================================
// protected_decision
// =============================================================================

#[test]
fn protected_waits_while_loading_regardless_of_auth() {
    assert_eq!(protected_decision(&loading(), "/"), GuardDecision::Loading);
    assert_eq!(protected_decision(&loading_while_logged_in(), "/"), GuardDecision::Loading);
}

#[test]
fn protected_redirects_logged_out_visitor_with_origin() {
    assert_eq!(
        protected_decision(&logged_out(), "/profile/42"),
        GuardDecision::RedirectToLogin { from: "/profile/42".to_owned() }
    );
}

#[test]
fn protected_renders_for_session() {
    assert_eq!(protected_decision(&logged_in(), "/"), GuardDecision::Render);
}

// =============================================================================
// public_decision
// =============================================================================

#[test]
fn public_waits_while_loading() {
    let routes = Routes::default();
    assert_eq!(public_decision(&loading(), None, &routes), GuardDecision::Loading);
    assert_eq!(public_decision(&loading_while_logged_in(), None, &routes), GuardDecision::Loading);
}

#[test]
fn public_renders_for_logged_out_visitor() {
    assert_eq!(public_decision(&logged_out(), Some("/explore"), &Routes::default()), GuardDecision::Render);
}

#[test]
fn public_sends_session_home_or_back_to_origin() {
    let routes = Routes::default();
    assert_eq!(public_decision(&logged_in(), None, &routes), GuardDecision::RedirectTo("/".to_owned()));
    assert_eq!(
        public_decision(&logged_in(), Some("/notifications"), &routes),
        GuardDecision::RedirectTo("/notifications".to_owned())
    );
}

// =============================================================================
// sanitize_return_path
// =============================================================================

#[test]
fn sanitize_keeps_local_paths_with_query() {
    let routes = Routes::default();
    assert_eq!(sanitize_return_path(Some("/chirp/7?ref=feed"), &routes), "/chirp/7?ref=feed");
}

#[test]
fn sanitize_rejects_foreign_and_auth_paths() {
    let routes = Routes::default();
    for from in [
        None,
        Some(""),
        Some("https://evil.test/"),
        Some("//evil.test/x"),
        Some("/\\evil.test"),
        Some("relative/path"),
        Some("/login"),
        Some("/login?next=/"),
        Some("/signup"),
    ] {
        assert_eq!(sanitize_return_path(from, &routes), "/", "from: {from:?}");
    }
}

// =============================================================================
// return_path
// =============================================================================

#[test]
fn return_path_keeps_query_string() {
    assert_eq!(return_path("/search", "?q=rust"), "/search?q=rust");
    assert_eq!(return_path("/search", "q=rust"), "/search?q=rust");
    assert_eq!(return_path("/", ""), "/");
    assert_eq!(return_path("/", "?"), "/");
}

// =============================================================================
// decision memos
// =============================================================================

/// Counts how often a view reading `decision` would rebuild.
fn render_counter(decision: Memo<GuardDecision>) -> (Memo<GuardDecision>, Arc<AtomicUsize>) {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let rendered = Memo::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        decision.get()
    });
    (rendered, runs)
}

#[test]
fn typing_on_public_page_does_not_rebuild_it() {
    let owner = Owner::new();
    owner.set();
    let fx = fixture();
    let session = RwSignal::new(fx.controller.session());
    fx.controller.watch(move |s| {
        let _ = session.try_set(s.clone());
    });
    let _ = fx.controller.actions().initialize();

    let decision = public_memo(session, ReturnTo(RwSignal::new(None)), Routes::default());
    let (rendered, runs) = render_counter(decision);
    assert_eq!(rendered.get(), GuardDecision::Render);

    for _ in 0..3 {
        fx.controller.store().clear_error();
        assert_eq!(rendered.get(), GuardDecision::Render);
    }
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn session_error_keeps_public_page_mounted() {
    let owner = Owner::new();
    owner.set();
    let session = RwSignal::new(logged_out());
    let decision = public_memo(session, ReturnTo(RwSignal::new(None)), Routes::default());
    let (rendered, runs) = render_counter(decision);
    assert_eq!(rendered.get(), GuardDecision::Render);

    let store = SessionStore::new();
    store.reject("Invalid credentials");
    session.set(store.snapshot());
    assert_eq!(rendered.get(), GuardDecision::Render);
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    session.set(logged_in());
    assert_eq!(rendered.get(), GuardDecision::RedirectTo("/".to_owned()));
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[test]
fn protected_memo_records_full_location() {
    let owner = Owner::new();
    owner.set();
    let session = RwSignal::new(logged_out());
    let decision = protected_memo(session, || return_path("/search", "?q=rust"));
    assert_eq!(decision.get(), GuardDecision::RedirectToLogin { from: "/search?q=rust".to_owned() });

    session.set(logged_in());
    assert_eq!(decision.get(), GuardDecision::Render);
}
