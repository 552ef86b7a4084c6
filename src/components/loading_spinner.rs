//! Full-screen placeholder shown while the session is settling.

use leptos::prelude::*;

pub const LOADING_TEXT: &str = "Loading ChirpNest...";

#[component]
pub fn LoadingSpinner() -> impl IntoView {
    view! {
        <div class="loading-screen" role="status" aria-live="polite">
            <div class="loading-screen__spinner"></div>
            <p class="loading-screen__text">{LOADING_TEXT}</p>
        </div>
    }
}
