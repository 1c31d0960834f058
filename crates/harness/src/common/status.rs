//! Simulation status state machine.
//!
//! This module defines the run status shared by the executor, the address
//! space, and the debugger. It provides:
//! 1. **States:** `Idle → Running → Stopped | Ended | Aborted`, with
//!    `Ended`/`Aborted` terminal.
//! 2. **Handle:** A single-threaded shared cell; by convention only the
//!    executor writes it, all other components read.

use std::cell::Cell;
use std::rc::Rc;

/// Why a running simulation returned control to the command loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// A watchpoint expression changed value. Carries the id of the first
    /// watchpoint that triggered in this scan.
    Watchpoint {
        /// Stable slot id of the triggering watchpoint.
        id: usize,
    },
    /// A bounded `step N` retired its full budget.
    StepLimit,
}

/// Current simulation status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SimStatus {
    /// No resume has been issued yet.
    #[default]
    Idle,
    /// Instructions are being retired.
    Running,
    /// Execution halted; the command loop has control and may resume.
    Stopped {
        /// Why execution halted.
        reason: StopReason,
        /// Program counter of the last committed instruction.
        pc: u32,
    },
    /// The guest program ended (terminal).
    Ended {
        /// Guest exit code (`a0` at the end-of-simulation trap).
        code: u32,
    },
    /// A structural error terminated the run (terminal).
    Aborted,
}

impl SimStatus {
    /// Returns whether instructions are currently being retired.
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns whether this status can never transition again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ended { .. } | Self::Aborted)
    }
}

/// Shared handle to the simulation status.
///
/// Cloning the handle shares the same underlying cell. The execution driver
/// owns the transitions; the address space and debugger only read.
#[derive(Clone, Debug, Default)]
pub struct StatusHandle(Rc<Cell<SimStatus>>);

impl StatusHandle {
    /// Creates a fresh handle in the `Idle` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current status.
    pub fn get(&self) -> SimStatus {
        self.0.get()
    }

    /// Replaces the current status.
    pub fn set(&self, status: SimStatus) {
        self.0.set(status);
    }

    /// Convenience for `self.get().is_running()`.
    pub fn is_running(&self) -> bool {
        self.get().is_running()
    }
}
