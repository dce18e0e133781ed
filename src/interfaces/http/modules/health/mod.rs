//! Liveness endpoint (no auth)

pub mod handlers;

pub use handlers::*;
