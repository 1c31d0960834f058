//! Architectural state of one simulation side.
//!
//! This module holds everything the oracle and debugger may inspect:
//! 1. **Register file:** Index-addressed GPRs with `x0` hardwired to zero.
//! 2. **CSRs:** The machine-mode control/status subset with read-modify-write
//!    access primitives.
//! 3. **Context:** An ordered snapshot (GPRs + pc) exchanged with the
//!    reference model and compared field-by-field by the oracle.

/// Control/status register file and identifiers.
pub mod csr;

/// General-purpose register file.
pub mod reg;

pub use csr::CsrFile;
pub use reg::RegisterFile;

/// Snapshot of one side's architectural state.
///
/// Each simulation side (device under test, reference) owns its state
/// independently; a `Context` is a value copied out of it, never a live view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Context {
    /// General-purpose registers, index order. Length is the configured
    /// register count (16 for RV32E).
    pub gprs: Vec<u32>,
    /// Program counter.
    pub pc: u32,
}

impl Context {
    /// Creates a zeroed context with the given register count.
    pub fn new(gpr_count: usize) -> Self {
        Self {
            gprs: vec![0; gpr_count],
            pc: 0,
        }
    }
}
