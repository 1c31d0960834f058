//! General-purpose register file.
//!
//! This module implements the indexed register file shared by the core, the
//! oracle, and the debugger. It provides:
//! 1. **Storage:** A configurable number of 32-bit registers (16 for RV32E).
//! 2. **Zero register:** Reads of `x0` always return 0; writes are ignored.
//! 3. **Naming:** ABI register names for display and expression operands.

/// ABI names of the RISC-V integer registers, index order.
pub const ABI_NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1",
    "a2", "a3", "a4", "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7",
    "s8", "s9", "s10", "s11", "t3", "t4", "t5", "t6",
];

/// Returns the ABI name of register `idx`, or `"?"` when out of range.
pub fn name(idx: usize) -> &'static str {
    ABI_NAMES.get(idx).copied().unwrap_or("?")
}

/// Resolves a register name (`"a0"`, `"x10"`, ...) to its index.
pub fn index_of(name: &str) -> Option<usize> {
    if let Some(pos) = ABI_NAMES.iter().position(|&n| n == name) {
        return Some(pos);
    }
    let numeric = name.strip_prefix('x')?;
    let idx: usize = numeric.parse().ok()?;
    (idx < ABI_NAMES.len()).then_some(idx)
}

/// Index-addressed general-purpose register file.
#[derive(Clone, Debug)]
pub struct RegisterFile {
    regs: Vec<u32>,
}

impl RegisterFile {
    /// Creates a zeroed register file with `count` registers.
    ///
    /// # Panics
    ///
    /// Panics if `count` is 0 or exceeds the 32-register ISA limit.
    pub fn new(count: usize) -> Self {
        assert!(
            count > 0 && count <= ABI_NAMES.len(),
            "register count must be in 1..=32"
        );
        Self {
            regs: vec![0; count],
        }
    }

    /// Number of registers in the file.
    pub fn len(&self) -> usize {
        self.regs.len()
    }

    /// Returns whether the file is empty (never true; kept for API symmetry).
    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }

    /// Reads register `idx`. Register 0 always reads as 0.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is outside the file; callers validate indices against
    /// `len()` first.
    pub fn read(&self, idx: usize) -> u32 {
        if idx == 0 { 0 } else { self.regs[idx] }
    }

    /// Writes register `idx`. Writes to register 0 are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is outside the file.
    pub fn write(&mut self, idx: usize, val: u32) {
        if idx != 0 {
            self.regs[idx] = val;
        }
    }

    /// Copies the whole file out, index order.
    pub fn snapshot(&self) -> Vec<u32> {
        self.regs.clone()
    }

    /// Overwrites the whole file from a snapshot of the same length.
    ///
    /// # Panics
    ///
    /// Panics if `values` has a different length than the file.
    pub fn restore(&mut self, values: &[u32]) {
        assert_eq!(values.len(), self.regs.len(), "register count mismatch");
        self.regs.copy_from_slice(values);
        self.regs[0] = 0;
    }
}
