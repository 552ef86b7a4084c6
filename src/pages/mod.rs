//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Pages validate form input locally and hand everything else to the session
//! controller. Auth errors are read back from the session, not kept in page
//! state, because the guards unmount a page while an action is in flight.

pub mod home;
pub mod login;
pub mod signup;
