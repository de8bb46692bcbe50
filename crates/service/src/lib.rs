//! Domain layer of the mock cloud console.
//! - `models`: records, create inputs, partial patches and their validation.
//! - `store`: the in-memory collections behind a single lock.
//! - `console`: validated operations that dispatch post-commit hooks.

pub mod errors;
pub mod models;
pub mod storage;
pub mod store;
pub mod hooks;
pub mod console;
pub mod simulation;
pub mod query;
pub mod metrics;
pub mod seed;

pub use console::ConsoleService;
pub use errors::{ServiceError, ServiceResult};
pub use store::ConsoleStore;
