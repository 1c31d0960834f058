//! Serial output device.
//!
//! A write-only device consuming one byte per aligned store and forwarding
//! it to an output sink (stdout by default, injectable for tests and for the
//! reference model, whose output would otherwise duplicate the DUT's).

use std::io::{self, Write};

/// Write-only serial transmit register.
pub struct Serial {
    sink: Box<dyn Write>,
}

impl std::fmt::Debug for Serial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Serial").finish_non_exhaustive()
    }
}

impl Default for Serial {
    fn default() -> Self {
        Self::new()
    }
}

impl Serial {
    /// Creates a serial device writing to stdout.
    pub fn new() -> Self {
        Self::with_sink(Box::new(io::stdout()))
    }

    /// Creates a serial device writing to the given sink.
    pub fn with_sink(sink: Box<dyn Write>) -> Self {
        Self { sink }
    }

    /// Forwards one byte to the sink.
    pub fn transmit(&mut self, byte: u8) {
        let result = self
            .sink
            .write_all(&[byte])
            .and_then(|()| self.sink.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "serial sink write failed");
        }
    }
}
