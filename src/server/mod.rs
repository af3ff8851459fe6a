//! HTTP server for YapYard.
//!
//! A JSON API over per-user [`Session`](crate::session::Session)s. Login
//! returns a session id which every other call passes in the
//! `x-session-id` header.

pub mod routes;

pub use routes::{app_router, AppState, SESSION_HEADER};
