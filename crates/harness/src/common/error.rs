//! Simulator error taxonomy.
//!
//! This module defines the structural errors of the harness. It covers:
//! 1. **Address-space violations:** Unmapped or ill-masked accesses, which
//!    indicate a simulator bug or genuinely invalid guest behavior.
//! 2. **CSR decode failures:** Identifiers outside the closed, known set.
//! 3. **Divergence:** The oracle's pass/fail verdict, distinguishable from a
//!    fault in the oracle's own machinery.
//!
//! All variants are fatal for the run; user-input errors (bad command syntax,
//! invalid expressions) never reach this type and are surfaced as text at the
//! command boundary instead.

use thiserror::Error;

use crate::difftest::DivergenceReport;

/// A structural simulator failure. Propagates to process termination.
#[derive(Debug, Error)]
pub enum SimError {
    /// A load touched an address outside RAM and every device range while the
    /// simulation was active.
    #[error("unmapped read at physical address {addr:#010x}")]
    UnmappedRead {
        /// The faulting physical address (already alignment-masked).
        addr: u32,
    },

    /// A store touched an address outside RAM, or hit the serial device with
    /// a mask selecting more than one byte lane.
    #[error("unmapped write at physical address {addr:#010x} (wmask {wmask:#06b})")]
    UnmappedWrite {
        /// The faulting physical address (already alignment-masked).
        addr: u32,
        /// The byte-lane mask of the rejected store.
        wmask: u8,
    },

    /// A control/status register access used an identifier outside the
    /// closed, known set. Indicates a decode or configuration bug.
    #[error("invalid CSR address {addr:#05x}")]
    InvalidCsr {
        /// The unrecognized CSR identifier.
        addr: u32,
    },

    /// The core retired an instruction encoding it cannot execute.
    #[error("illegal instruction {inst:#010x} at pc {pc:#010x}")]
    IllegalInstruction {
        /// Program counter of the faulting instruction.
        pc: u32,
        /// The raw instruction word.
        inst: u32,
    },

    /// The device under test and the reference model disagree. This is the
    /// oracle's expected detection outcome, fatal for the run but not a bug
    /// in the oracle itself.
    #[error("architectural divergence after instruction at pc {:#010x}", .0.pc)]
    Divergence(DivergenceReport),
}
