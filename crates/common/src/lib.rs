//! Shared building blocks for the console workspace: wire types reused by
//! several crates, tracing initialisation and the admin listener.

pub mod types;
pub mod utils;
pub mod admin_http;
