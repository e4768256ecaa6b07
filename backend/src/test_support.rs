//! Test utilities for the ehotels crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for `cfg(test)` and behind the `test-support` feature.

mod clock;
mod memory_store;

pub use clock::FixedClock;
pub use memory_store::MemoryStore;
