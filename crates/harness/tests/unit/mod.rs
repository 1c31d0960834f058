//! Unit tests for the harness components.






/// Simulation driver: boot image loading and the stepping loop.
pub mod sim;

/// Address space: RAM window, device dispatch, fault policy.
pub mod soc;
