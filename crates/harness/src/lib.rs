//! Lockstep differential-testing harness for an RV32E processor core.
//!
//! This crate validates a processor implementation by running it side-by-side
//! with a trusted reference model and stopping at the first architectural
//! divergence. It provides:
//! 1. **Address space:** RAM window plus memory-mapped clock and serial devices,
//!    dispatched under alignment and byte-lane mask rules.
//! 2. **Architectural state:** Indexed GPR file, program counter, and the
//!    machine-mode CSR subset (`mstatus`, `mtvec`, `mepc`, `mcause`).
//! 3. **Difftest oracle:** Lockstep comparison against a pluggable reference
//!    model, reporting every mismatching field of the first divergence.
//! 4. **Interactive debugger:** A command loop with expression evaluation and
//!    a fixed-capacity watchpoint pool.
//! 5. **Bundled interpreter:** A compact RV32E core usable as both the demo
//!    device under test and the default in-process reference model.

/// Architectural state (register file, program counter, CSRs).
pub mod arch;
/// Common types shared across the harness (errors, simulation status).
pub mod common;
/// Harness configuration (defaults and hierarchical config structures).
pub mod config;
/// Lockstep correctness oracle and the reference-model endpoint.
pub mod difftest;
/// Bundled RV32E interpreter (demo core and in-process reference model).
pub mod interp;
/// Simple debugger: command loop, expression evaluator, watchpoints.
pub mod sdb;
/// Simulation driver (image loader, execution loop).
pub mod sim;
/// Guest-visible address space (RAM window, clock, serial).
pub mod soc;

/// Harness error taxonomy.
pub use crate::common::error::SimError;
/// Shared simulation status handle; the executor writes it, everyone else reads.
pub use crate::common::status::{SimStatus, StatusHandle, StopReason};
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Guest address space; routes word accesses to RAM or devices.
pub use crate::soc::AddressSpace;
