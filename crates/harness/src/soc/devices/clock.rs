//! Real-time clock device.
//!
//! A read-only device returning a monotonically increasing microsecond
//! counter, split across two consecutive word registers.
//!
//! # Memory Map
//!
//! * `0x00`: elapsed microseconds (low 32 bits)
//! * `0x04`: elapsed microseconds (high 32 bits)
//!
//! The counter epoch is latched at the first read, so the guest observes
//! time relative to its own first access rather than to process start.

use std::time::Instant;

/// Microsecond source; injectable so the 2^32 µs carry is testable.
pub type MicrosSource = Box<dyn FnMut() -> u64>;

/// Read-only microsecond clock.
pub struct Clock {
    source: MicrosSource,
    epoch: Option<u64>,
}

impl std::fmt::Debug for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clock").field("epoch", &self.epoch).finish()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Creates a clock backed by the host monotonic clock.
    pub fn new() -> Self {
        let start = Instant::now();
        Self::with_source(Box::new(move || start.elapsed().as_micros() as u64))
    }

    /// Creates a clock with an injected microsecond source.
    pub fn with_source(source: MicrosSource) -> Self {
        Self {
            source,
            epoch: None,
        }
    }

    /// Reads one half of the counter.
    ///
    /// Offset 0 selects the low 32 bits, offset 4 the high 32 bits. The
    /// dispatcher guarantees no other offset is routed here.
    pub fn read(&mut self, offset: u32) -> u32 {
        debug_assert!(offset == 0 || offset == 4);
        let now = (self.source)();
        let epoch = *self.epoch.get_or_insert(now);
        let elapsed = now.saturating_sub(epoch);
        if offset == 0 {
            elapsed as u32
        } else {
            (elapsed >> 32) as u32
        }
    }
}
