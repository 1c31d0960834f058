//! Memory-mapped peripherals.
//!
//! The device set is part of the guest-visible ABI and is deliberately
//! closed: a read-only microsecond clock and a write-only serial port.

/// Read-only microsecond clock device.
pub mod clock;

/// Write-only serial output device.
pub mod serial;

pub use clock::Clock;
pub use serial::Serial;
