//! Simulation driver.
//!
//! This module hosts the pieces that turn the library into a runnable
//! harness:
//! 1. **Loader:** Boot image loading with the built-in fallback program.
//! 2. **Executor:** The stepping loop that retires instructions on the core,
//!    consults the oracle, and scans watchpoints after every commit.

/// Boot image loader.
pub mod loader;

/// Execution-engine endpoint and the stepping loop.
pub mod executor;

pub use executor::{Commit, Core, CoreView, Executor};
