//! Avatar, display name, and handle for the signed-in user.

#[cfg(test)]
#[path = "user_badge_test.rs"]
mod user_badge_test;

use leptos::prelude::*;

use crate::session::Session;

/// `@username`, or empty when the user has none.
#[must_use]
pub fn handle(session: &Session) -> String {
    session
        .user()
        .map(|u| u.username.trim())
        .filter(|name| !name.is_empty())
        .map(|name| format!("@{name}"))
        .unwrap_or_default()
}

#[component]
pub fn UserBadge() -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let avatar = move || session.with(|s| s.user().and_then(|u| u.avatar.clone()));
    let verified = move || session.with(|s| s.user().is_some_and(|u| u.verified));

    view! {
        <div class="user-badge">
            {move || match avatar() {
                Some(src) => view! { <img class="user-badge__avatar" src=src alt="avatar"/> }.into_any(),
                None => view! {
                    <span class="user-badge__avatar user-badge__avatar--initials">
                        {move || session.with(Session::initials)}
                    </span>
                }
                .into_any(),
            }}
            <div class="user-badge__names">
                <span class="user-badge__name">
                    {move || session.with(Session::display_name)}
                    <Show when=verified>
                        <span class="user-badge__verified" title="Verified">"✓"</span>
                    </Show>
                </span>
                <span class="user-badge__handle">{move || session.with(handle)}</span>
            </div>
        </div>
    }
}
