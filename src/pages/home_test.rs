use super::*;
use serde_json::json;

use crate::session::SessionStore;
use crate::test_support::user;

#[test]
fn greeting_uses_display_name() {
    let store = SessionStore::new();
    let mut u = user("1");
    u.name = "Ada Lovelace".to_owned();
    store.set_authenticated(u, "tok".to_owned());
    assert_eq!(greeting(&store.snapshot()), "Welcome back, Ada Lovelace!");
}

#[test]
fn feed_summary_counts_bare_and_wrapped_lists() {
    assert_eq!(feed_summary(&json!([])), "No chirps yet.");
    assert_eq!(feed_summary(&json!([{"id": 1}])), "1 chirp");
    assert_eq!(feed_summary(&json!({"data": [1, 2, 3]})), "3 chirps");
    assert_eq!(feed_summary(&json!({"chirps": [1, 2]})), "2 chirps");
}

#[test]
fn feed_summary_reports_missing_list() {
    assert_eq!(feed_summary(&json!({"message": "ok"})), "Feed returned no list.");
}
