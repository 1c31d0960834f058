//! Address-space unit tests.


/// Microsecond clock device.
pub mod clock;

/// RAM window word and byte-lane semantics.
pub mod memory;
