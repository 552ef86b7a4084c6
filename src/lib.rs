//! # chirpnest
//!
//! Leptos + WASM frontend core for the ChirpNest social client.
//!
//! This crate owns the client-side session lifecycle: the session store, its
//! durable-storage persistence, the login/register/initialize actions, the
//! unauthorized (401) interceptor, and the route guards that gate pages on
//! session state. Feed, composer, and profile rendering consume these pieces
//! through the `SessionController` provided in Leptos context.

pub mod app;
pub mod components;
pub mod config;
pub mod guard;
pub mod net;
pub mod pages;
pub mod session;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

/// Browser entry point: installs console hooks and hydrates the server shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
