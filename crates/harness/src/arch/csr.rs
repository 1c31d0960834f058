//! Control and Status Register (CSR) subset.
//!
//! This module implements the machine-mode CSR fields the harness models and
//! their access primitives. It provides:
//! 1. **Address definitions:** The closed set of recognized identifiers.
//! 2. **Register storage:** The `CsrFile` struct holding the named fields.
//! 3. **Access logic:** Read, exchange (full replace), and set-bits
//!    (bitwise OR) operations, all read-modify-write returning the old value.
//!
//! Any identifier outside the known set is a fatal [`SimError::InvalidCsr`];
//! there is no silent default.

use crate::common::error::SimError;
use crate::config::defaults;

/// Machine status register CSR address.
pub const MSTATUS: u32 = 0x300;

/// Machine trap vector base address register CSR address.
pub const MTVEC: u32 = 0x305;

/// Machine exception program counter CSR address.
pub const MEPC: u32 = 0x341;

/// Machine cause register CSR address.
pub const MCAUSE: u32 = 0x342;

/// Machine-mode CSR fields of one simulation side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrFile {
    /// Machine status.
    pub mstatus: u32,
    /// Trap vector base address.
    pub mtvec: u32,
    /// Exception program counter.
    pub mepc: u32,
    /// Exception cause.
    pub mcause: u32,
}

impl Default for CsrFile {
    fn default() -> Self {
        Self::new()
    }
}

impl CsrFile {
    /// Creates a CSR file at reset values.
    pub fn new() -> Self {
        Self {
            mstatus: defaults::MSTATUS_RESET,
            mtvec: 0,
            mepc: 0,
            mcause: 0,
        }
    }

    fn field_mut(&mut self, addr: u32) -> Result<&mut u32, SimError> {
        match addr {
            MSTATUS => Ok(&mut self.mstatus),
            MTVEC => Ok(&mut self.mtvec),
            MEPC => Ok(&mut self.mepc),
            MCAUSE => Ok(&mut self.mcause),
            _ => Err(SimError::InvalidCsr { addr }),
        }
    }

    /// Reads the field with the given identifier.
    pub fn read(&self, addr: u32) -> Result<u32, SimError> {
        match addr {
            MSTATUS => Ok(self.mstatus),
            MTVEC => Ok(self.mtvec),
            MEPC => Ok(self.mepc),
            MCAUSE => Ok(self.mcause),
            _ => Err(SimError::InvalidCsr { addr }),
        }
    }

    /// Replaces the field with `value`, returning the previous value (csrrw).
    pub fn exchange(&mut self, addr: u32, value: u32) -> Result<u32, SimError> {
        let field = self.field_mut(addr)?;
        let old = *field;
        *field = value;
        Ok(old)
    }

    /// ORs `mask` into the field, returning the previous value (csrrs).
    pub fn set_bits(&mut self, addr: u32, mask: u32) -> Result<u32, SimError> {
        let field = self.field_mut(addr)?;
        let old = *field;
        *field = old | mask;
        Ok(old)
    }
}
