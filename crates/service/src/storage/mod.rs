//! Storage primitives for the console store
//!
//! Plain data structures with no locking of their own; `ConsoleStore` owns
//! them behind a single lock.

pub mod clock;
pub mod collection;

pub use clock::MonotonicClock;
pub use collection::Collection;
