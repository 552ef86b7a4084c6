//! Home feed for a signed-in user.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use leptos::prelude::*;
use serde_json::Value;

use crate::app::ControllerHandle;
use crate::components::user_badge::UserBadge;
use crate::session::Session;

pub const RECENT_CHIRPS_QUERY: &str = "Get all recent chirps";

#[must_use]
pub fn greeting(session: &Session) -> String {
    format!("Welcome back, {}!", session.display_name())
}

/// One-line summary of a feed query result.
///
/// The backend answers with either a bare array or an object wrapping one in
/// `data`, `results`, or `chirps`.
#[must_use]
pub fn feed_summary(body: &Value) -> String {
    let items = body.as_array().or_else(|| {
        ["data", "results", "chirps"].into_iter().find_map(|key| body.get(key).and_then(Value::as_array))
    });
    match items.map(Vec::len) {
        Some(0) => "No chirps yet.".to_owned(),
        Some(1) => "1 chirp".to_owned(),
        Some(n) => format!("{n} chirps"),
        None => "Feed returned no list.".to_owned(),
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let controller = expect_context::<ControllerHandle>();
    let feed = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_refresh = move |_| {
        if busy.get() {
            return;
        }
        busy.set(true);
        feed.set("Loading feed...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let controller = controller.get_value();
            leptos::task::spawn_local(async move {
                let text = match controller.api().query::<Value>(RECENT_CHIRPS_QUERY).await {
                    Ok(body) => feed_summary(&body),
                    Err(e) => format!("Feed failed: {e}"),
                };
                // A 401 tears the page down before we get here.
                let _ = feed.try_set(text);
                let _ = busy.try_set(false);
            });
        }
    };

    let on_logout = move |_| controller.with_value(|c| c.actions().logout());

    view! {
        <div class="home-page">
            <header class="home-page__header">
                <UserBadge/>
                <button class="home-page__logout" on:click=on_logout>
                    "Log out"
                </button>
            </header>
            <h1>{move || session.with(greeting)}</h1>
            <section class="home-page__feed">
                <button class="home-page__refresh" on:click=on_refresh disabled=move || busy.get()>
                    "Load recent chirps"
                </button>
                <Show when=move || !feed.get().is_empty()>
                    <p class="home-page__feed-status">{move || feed.get()}</p>
                </Show>
            </section>
        </div>
    }
}
