use super::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::test_support::user;

#[test]
fn new_session_starts_loading_and_logged_out() {
    let store = SessionStore::new();
    let s = store.snapshot();
    assert!(s.is_loading());
    assert!(!s.is_authenticated());
    assert!(s.user().is_none());
    assert!(s.token().is_none());
    assert!(s.error().is_none());
}

#[test]
fn set_authenticated_populates_identity() {
    let store = SessionStore::new();
    store.set_authenticated(user("1"), "tok".to_owned());
    let s = store.snapshot();
    assert!(s.is_authenticated());
    assert!(!s.is_loading());
    assert_eq!(s.user().map(|u| u.id.as_str()), Some("1"));
    assert_eq!(s.token(), Some("tok"));
}

#[test]
fn set_authenticated_fails_closed_on_empty_id() {
    let store = SessionStore::new();
    store.set_authenticated(user("1"), "tok".to_owned());
    store.set_authenticated(user("  "), "tok2".to_owned());
    let s = store.snapshot();
    assert!(!s.is_authenticated());
    assert!(s.user().is_none());
    assert!(s.token().is_none());
    assert_eq!(s.error(), Some(INVALID_USER_MESSAGE));
}

#[test]
fn set_authenticated_fails_closed_on_empty_token() {
    let store = SessionStore::new();
    store.set_authenticated(user("1"), String::new());
    let s = store.snapshot();
    assert!(!s.is_authenticated());
    assert!(s.user().is_none());
    assert_eq!(s.error(), Some(INVALID_USER_MESSAGE));
}

#[test]
fn begin_load_clears_previous_error() {
    let store = SessionStore::new();
    store.set_error("bad password");
    store.begin_load();
    let s = store.snapshot();
    assert!(s.is_loading());
    assert!(s.error().is_none());
}

#[test]
fn set_error_keeps_identity() {
    let store = SessionStore::new();
    store.set_authenticated(user("1"), "tok".to_owned());
    store.set_error("profile fetch failed");
    let s = store.snapshot();
    assert!(s.is_authenticated());
    assert_eq!(s.error(), Some("profile fetch failed"));
}

#[test]
fn clear_and_reject_log_out() {
    let store = SessionStore::new();
    store.set_authenticated(user("1"), "tok".to_owned());
    store.clear();
    assert!(!store.snapshot().is_authenticated());
    assert!(store.snapshot().error().is_none());

    store.set_authenticated(user("1"), "tok".to_owned());
    store.reject("Failed to restore session");
    let s = store.snapshot();
    assert!(!s.is_authenticated());
    assert!(!s.is_loading());
    assert_eq!(s.error(), Some("Failed to restore session"));
}

#[test]
fn end_load_and_clear_error() {
    let store = SessionStore::new();
    store.begin_load();
    store.end_load();
    assert!(!store.snapshot().is_loading());
    store.set_error("oops");
    store.clear_error();
    assert!(store.snapshot().error().is_none());
}

#[test]
fn epoch_bumps_only_on_identity_changes() {
    let store = SessionStore::new();
    let start = store.epoch();
    store.begin_load();
    store.set_error("x");
    store.clear_error();
    store.end_load();
    assert_eq!(store.epoch(), start);
    store.set_authenticated(user("1"), "tok".to_owned());
    assert_eq!(store.epoch(), start + 1);
    store.clear();
    assert_eq!(store.epoch(), start + 2);
    store.reject("x");
    assert_eq!(store.epoch(), start + 3);
}

#[test]
fn update_user_merges_when_authenticated() {
    let store = SessionStore::new();
    assert!(store.update_user(UserPatch { name: Some("X".to_owned()), ..UserPatch::default() }).is_none());

    store.set_authenticated(user("1"), "tok".to_owned());
    let updated = store
        .update_user(UserPatch { name: Some("New Name".to_owned()), ..UserPatch::default() })
        .expect("logged in");
    assert_eq!(updated.name, "New Name");
    assert_eq!(store.snapshot().user().map(|u| u.name.as_str()), Some("New Name"));
    assert_eq!(store.snapshot().user().map(|u| u.id.as_str()), Some("1"));
}

#[test]
fn subscribers_see_every_transition_and_can_unsubscribe() {
    let store = SessionStore::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let id = store.subscribe(move |s| sink.borrow_mut().push(s.is_authenticated()));

    store.begin_load();
    store.set_authenticated(user("1"), "tok".to_owned());
    store.clear();
    assert_eq!(*seen.borrow(), vec![false, true, false]);

    store.unsubscribe(id);
    store.begin_load();
    assert_eq!(seen.borrow().len(), 3);
}

#[test]
fn clear_error_without_error_notifies_nobody() {
    let store = SessionStore::new();
    store.clear();
    let calls = Rc::new(Cell::new(0));
    let sink = Rc::clone(&calls);
    store.subscribe(move |_| sink.set(sink.get() + 1));

    store.clear_error();
    store.clear_error();
    assert_eq!(calls.get(), 0);

    store.set_error("oops");
    store.clear_error();
    store.clear_error();
    assert_eq!(calls.get(), 2);
}

#[test]
fn subscriber_may_reenter_store() {
    let store = Rc::new(SessionStore::new());
    let inner = Rc::clone(&store);
    store.subscribe(move |s| {
        if s.error().is_some() {
            inner.clear_error();
        }
    });
    store.set_error("transient");
    assert!(store.snapshot().error().is_none());
}

#[test]
fn display_name_and_initials() {
    let store = SessionStore::new();
    assert_eq!(store.snapshot().display_name(), "Anonymous");
    assert_eq!(store.snapshot().initials(), "AN");

    let mut u = user("1");
    u.name = "ada byron lovelace".to_owned();
    store.set_authenticated(u, "tok".to_owned());
    assert_eq!(store.snapshot().display_name(), "ada byron lovelace");
    assert_eq!(store.snapshot().initials(), "AB");

    let mut u = user("2");
    u.name = String::new();
    u.username = "ada".to_owned();
    store.set_authenticated(u, "tok".to_owned());
    assert_eq!(store.snapshot().display_name(), "ada");
    assert_eq!(store.snapshot().initials(), "AN");
}
