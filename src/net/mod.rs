//! Networking modules for the REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `types` is the validated wire schema, `transport` is the raw HTTP seam, and
//! `client` is the wrapper every backend call goes through so that 401
//! handling stays out of call sites.

pub mod client;
pub mod transport;
pub mod types;
