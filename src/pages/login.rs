//! Login page: email + password against the backend.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_query_map;

use crate::app::ControllerHandle;
use crate::session::Session;

pub const REGISTERED_NOTICE: &str = "Account created. Sign in to start chirping.";

/// Trimmed email and raw password, or the message to show.
pub fn validate_login_input(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email is required");
    }
    if password.is_empty() {
        return Err("Password is required");
    }
    Ok((email.to_owned(), password.to_owned()))
}

/// Notice for arrivals from a completed signup.
#[must_use]
pub fn registered_notice(flag: Option<&str>) -> Option<&'static str> {
    flag.filter(|v| !v.is_empty() && *v != "0").map(|_| REGISTERED_NOTICE)
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let controller = expect_context::<ControllerHandle>();
    let query = use_query_map();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());

    let notice = move || query.with(|q| registered_notice(q.get("registered").as_deref()));
    let auth_error = move || session.with(|s| s.error().map(str::to_owned));

    let on_input = move || {
        info.set(String::new());
        controller.with_value(|c| c.store().clear_error());
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let (email_value, password_value) = match validate_login_input(&email.get(), &password.get()) {
            Ok(values) => values,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        info.set(String::new());

        #[cfg(feature = "hydrate")]
        {
            let controller = controller.get_value();
            leptos::task::spawn_local(async move {
                // Success is picked up by the public route guard.
                if let Err(e) = controller.actions().login(&email_value, &password_value).await {
                    leptos::logging::warn!("login failed: {e}");
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (email_value, password_value);
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"ChirpNest"</h1>
                <p class="login-card__subtitle">"Sign in to your account to continue chirping"</p>
                {move || notice().map(|text| view! { <p class="login-message login-message--ok">{text}</p> })}
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="Enter your email"
                        prop:value=move || email.get()
                        on:input=move |ev| {
                            email.set(event_target_value(&ev));
                            on_input();
                        }
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Enter your password"
                        prop:value=move || password.get()
                        on:input=move |ev| {
                            password.set(event_target_value(&ev));
                            on_input();
                        }
                    />
                    <button class="login-button" type="submit">
                        "Sign in"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                {move || auth_error().map(|e| view! { <p class="login-message login-message--error">{e}</p> })}
                <p class="login-card__footer">
                    "Don't have an account? "
                    <A href="/signup">"Sign up"</A>
                </p>
            </div>
        </div>
    }
}
