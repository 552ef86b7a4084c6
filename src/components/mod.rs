//! Reusable UI components shared across pages.

pub mod loading_spinner;
pub mod user_badge;
