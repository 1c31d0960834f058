//! Common types shared across the harness.
//!
//! This module provides the building blocks used by every other component:
//! 1. **Errors:** The closed simulator error taxonomy.
//! 2. **Status:** The shared simulation status cell and its stop reasons.

/// Error types for structural simulator failures.
pub mod error;

/// Simulation status state machine and the shared status handle.
pub mod status;

pub use error::SimError;
pub use status::{SimStatus, StatusHandle, StopReason};
