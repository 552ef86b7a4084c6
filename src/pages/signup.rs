//! Signup page. A new account still has to sign in afterwards.

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use leptos::prelude::*;
use leptos_router::components::A;

use crate::app::ControllerHandle;
use crate::session::Session;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    /// Trimmed copy ready to submit, or the first problem found.
    pub fn validate(&self) -> Result<Self, &'static str> {
        let full_name = self.full_name.trim();
        let username = self.username.trim();
        let email = self.email.trim();
        if full_name.is_empty() {
            return Err("Full name is required");
        }
        if username.is_empty() {
            return Err("Username is required");
        }
        if email.is_empty() {
            return Err("Email is required");
        }
        if self.password.is_empty() {
            return Err("Password is required");
        }
        if self.password != self.confirm_password {
            return Err("Passwords must match");
        }
        Ok(Self {
            full_name: full_name.to_owned(),
            username: username.to_owned(),
            email: email.to_owned(),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
        })
    }
}

/// Login route carrying the post-signup notice flag.
#[must_use]
pub fn login_after_signup(login_path: &str) -> String {
    format!("{login_path}?registered=1")
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let controller = expect_context::<ControllerHandle>();
    let form = RwSignal::new(SignupForm::default());
    let info = RwSignal::new(String::new());

    #[cfg(feature = "hydrate")]
    let navigate = leptos_router::hooks::use_navigate();

    let auth_error = move || session.with(|s| s.error().map(str::to_owned));

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let submitted = match form.with(SignupForm::validate) {
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
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let result = controller
                    .actions()
                    .register(&submitted.full_name, &submitted.username, &submitted.email, &submitted.password)
                    .await;
                match result {
                    Ok(user) => {
                        leptos::logging::log!("registered user {}", user.id);
                        navigate(&login_after_signup(&controller.config().routes.login), Default::default());
                    }
                    Err(e) => leptos::logging::warn!("registration failed: {e}"),
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = submitted;
    };

    let touched = move || {
        info.set(String::new());
        controller.with_value(|c| c.store().clear_error());
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"ChirpNest"</h1>
                <p class="login-card__subtitle">"Join the conversation"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        placeholder="Full name"
                        prop:value=move || form.with(|f| f.full_name.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            form.update(|f| f.full_name = value);
                            touched();
                        }
                    />
                    <input
                        class="login-input"
                        type="text"
                        placeholder="Username"
                        prop:value=move || form.with(|f| f.username.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            form.update(|f| f.username = value);
                            touched();
                        }
                    />
                    <input
                        class="login-input"
                        type="email"
                        placeholder="Email"
                        prop:value=move || form.with(|f| f.email.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            form.update(|f| f.email = value);
                            touched();
                        }
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || form.with(|f| f.password.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            form.update(|f| f.password = value);
                            touched();
                        }
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Confirm password"
                        prop:value=move || form.with(|f| f.confirm_password.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            form.update(|f| f.confirm_password = value);
                            touched();
                        }
                    />
                    <button class="login-button" type="submit">
                        "Create account"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                {move || auth_error().map(|e| view! { <p class="login-message login-message--error">{e}</p> })}
                <p class="login-card__footer">
                    "Already have an account? "
                    <A href="/login">"Sign in"</A>
                </p>
            </div>
        </div>
    }
}
