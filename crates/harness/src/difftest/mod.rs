//! Lockstep correctness oracle.
//!
//! This module detects the first architectural divergence between the device
//! under test (DUT) and a trusted reference model. It provides:
//! 1. **Reference endpoint:** The `RefModel` trait mirroring the classic
//!    five-operation difftest ABI (init, memory copy, register copy,
//!    advance, interrupt delivery), resolved by dependency injection.
//! 2. **Seeding:** One-time copy of the DUT's boot image and initial
//!    architectural state into the reference.
//! 3. **Per-commit check:** Advance the reference by one instruction, pull
//!    its context, and compare every register and the program counter,
//!    accumulating all mismatching fields into a [`DivergenceReport`].
//!
//! The oracle never retries: a divergence is ground truth and fatal for the
//! run. It may only be queried immediately after a confirmed commit.

use std::fmt;

use crate::arch::{Context, reg};
use crate::common::error::SimError;

/// Transfer direction for the reference-model copy operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// DUT state flows into the reference model.
    ToRef,
    /// Reference-model state flows back to the caller.
    FromRef,
}

/// Reference-model endpoint consumed by the oracle.
///
/// Implementations may be in-process (the bundled interpreter), pre-linked,
/// or out-of-process; the oracle only requires that all five operations are
/// available before seeding.
pub trait RefModel {
    /// One-time initialization before any other call.
    fn init(&mut self, flags: u32);

    /// Copies `buf.len()` bytes between guest memory at `addr` and `buf`,
    /// in the given direction.
    fn sync_memory(&mut self, addr: u32, buf: &mut [u8], dir: Direction);

    /// Copies the full architectural context in the given direction.
    fn sync_registers(&mut self, ctx: &mut Context, dir: Direction);

    /// Executes exactly `n` instructions on the reference.
    fn advance(&mut self, n: u64);

    /// Informs the reference that an external interrupt/exception with the
    /// given cause has been taken by the DUT, so both sides observe the same
    /// trap timing. Must be issued before the next comparison.
    fn raise_interrupt(&mut self, cause: u32);
}

/// One mismatching architectural field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    /// Field name (`"a0"`, `"pc"`, ...).
    pub field: &'static str,
    /// Value observed on the device under test.
    pub dut: u32,
    /// Value computed by the reference model.
    pub reference: u32,
}

/// Every mismatching field of one failed comparison.
///
/// Ephemeral: produced per check and carried inside
/// [`SimError::Divergence`]; never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DivergenceReport {
    /// Program counter of the DUT's last committed instruction.
    pub pc: u32,
    /// All fields that differ, register-file order then pc.
    pub mismatches: Vec<Mismatch>,
}

impl fmt::Display for DivergenceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.mismatches {
            writeln!(
                f,
                "{} is different after executing instruction at pc = {:#010x}, \
                 right = {:#010x}, wrong = {:#010x}, diff = {:#010x}",
                m.field,
                self.pc,
                m.reference,
                m.dut,
                m.reference ^ m.dut
            )?;
        }
        Ok(())
    }
}

/// Correctness oracle keeping the DUT and a reference model in lockstep.
pub struct Oracle {
    model: Box<dyn RefModel>,
}

impl fmt::Debug for Oracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Oracle").finish_non_exhaustive()
    }
}

impl Oracle {
    /// Creates an oracle around an injected reference model.
    pub fn new(model: Box<dyn RefModel>) -> Self {
        Self { model }
    }

    /// Establishes identical starting conditions: initializes the reference,
    /// then copies the DUT's boot image and full architectural state into it.
    /// Called exactly once, before execution starts.
    pub fn seed(&mut self, ram_base: u32, ram: &[u8], dut: &Context) {
        self.model.init(0);
        let mut image = ram.to_vec();
        self.model.sync_memory(ram_base, &mut image, Direction::ToRef);
        let mut ctx = dut.clone();
        self.model.sync_registers(&mut ctx, Direction::ToRef);
    }

    /// Advances the reference by one instruction and compares it against the
    /// DUT context snapshotted after the commit.
    ///
    /// The comparison accumulates: every mismatching field is recorded, not
    /// just the first, and the result is the logical AND of the per-field
    /// success flags.
    pub fn check_commit(&mut self, dut: &Context) -> Result<(), SimError> {
        self.model.advance(1);
        let mut reference = Context::new(dut.gprs.len());
        self.model
            .sync_registers(&mut reference, Direction::FromRef);

        let mut report = DivergenceReport {
            pc: dut.pc,
            mismatches: Vec::new(),
        };
        let mut ok = true;
        for (i, (&d, &r)) in dut.gprs.iter().zip(reference.gprs.iter()).enumerate() {
            ok &= check_field(reg::name(i), d, r, &mut report);
        }
        ok &= check_field("pc", dut.pc, reference.pc, &mut report);

        if ok {
            Ok(())
        } else {
            Err(SimError::Divergence(report))
        }
    }

    /// Forwards an external interrupt/exception to the reference model.
    pub fn raise_interrupt(&mut self, cause: u32) {
        self.model.raise_interrupt(cause);
    }
}

fn check_field(field: &'static str, dut: u32, reference: u32, report: &mut DivergenceReport) -> bool {
    if dut == reference {
        true
    } else {
        report.mismatches.push(Mismatch {
            field,
            dut,
            reference,
        });
        false
    }
}
