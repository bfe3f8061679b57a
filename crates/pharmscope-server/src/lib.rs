//! PharmScope HTTP server: router, application state, request handlers.
//!
//! Exposed as a library so integration tests can drive the router directly;
//! the `pharmscope` binary lives in `main.rs`.

pub mod routes;
pub mod state;
