//! Client-side session lifecycle.
//!
//! ARCHITECTURE
//! ============
//! `store` is the single authoritative session record. `persistence` mirrors
//! it to durable storage, `actions` drives login/register/initialize against
//! the backend, and `interceptor` performs the hard logout when any
//! intercepted call comes back 401. `controller` wires them together into the
//! one handle that pages and the API client receive.

pub mod actions;
pub mod controller;
pub mod interceptor;
pub mod persistence;
pub mod store;

pub use controller::SessionController;
pub use store::{Session, SessionStore};
