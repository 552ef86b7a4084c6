use super::*;
use std::cell::RefCell;

use crate::test_support::{fixture, user};

#[test]
fn new_controller_starts_loading() {
    let fx = fixture();
    assert!(fx.controller.session().is_loading());
    assert_eq!(fx.controller.config().routes.login, "/login");
}

#[test]
fn clones_share_one_store() {
    let fx = fixture();
    let other = fx.controller.clone();
    other.store().set_authenticated(user("1"), "tok".to_owned());
    assert!(fx.controller.session().is_authenticated());
}

#[test]
fn watch_replays_current_state_then_follows_changes() {
    let fx = fixture();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    fx.controller.watch(move |s| sink.borrow_mut().push((s.is_loading(), s.is_authenticated())));

    let _ = fx.controller.actions().initialize();

    let seen = seen.borrow();
    assert_eq!(seen.first(), Some(&(true, false)));
    assert_eq!(seen.last(), Some(&(false, false)));
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn for_current_target_builds_a_detached_controller() {
    let controller = SessionController::for_current_target(ClientConfig::default());
    assert!(controller.session().is_loading());
    assert_eq!(
        controller.actions().initialize(),
        crate::session::persistence::LoadOutcome::NotFound
    );
    assert!(!controller.session().is_authenticated());
}
