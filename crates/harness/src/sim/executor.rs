//! Execution-engine endpoint and the stepping loop.
//!
//! This module drives the device under test. It provides:
//! 1. **Core trait:** The narrow interface the harness consumes from an
//!    execution engine — step one instruction, observe commit events,
//!    snapshot architectural state, peek memory.
//! 2. **Executor:** The resume loop — run with an optional step bound, and
//!    after every committed instruction notify the oracle then scan
//!    watchpoints; either may halt the run early.
//! 3. **Machine view:** The read-only adapter expression evaluation uses.
//!
//! The executor owns the status cell transitions. Commitment is final: a
//! stop condition cancels the remaining budget but never rolls back an
//! already-committed instruction.

use crate::arch::{Context, reg};
use crate::common::error::SimError;
use crate::common::status::{SimStatus, StatusHandle, StopReason};
use crate::difftest::Oracle;
use crate::sdb::expr::MachineView;
use crate::sdb::watchpoint::WatchPool;

/// A committed (retired) instruction; architectural effects are final.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Commit {
    /// Program counter of the retired instruction.
    pub pc: u32,
}

/// Execution-engine endpoint consumed by the harness.
pub trait Core {
    /// Advances the engine by one step. Returns the commit event when an
    /// instruction retired; `None` when the step produced no retirement
    /// (for example the end-of-simulation trap).
    fn step(&mut self) -> Result<Option<Commit>, SimError>;

    /// Snapshot of the full architectural state.
    fn context(&self) -> Context;

    /// Side-effect-free word read for the debugger.
    fn peek(&self, addr: u32) -> Result<u32, SimError>;

    /// The boot RAM window, for oracle seeding.
    fn ram(&self) -> (u32, &[u8]);
}

/// Read-only machine view over a core, for expression evaluation.
///
/// Snapshots the context at construction; memory reads go through the
/// core's `peek`.
pub struct CoreView<'a> {
    core: &'a dyn Core,
    ctx: Context,
}

impl<'a> CoreView<'a> {
    /// Captures a view of the core's current state.
    pub fn new(core: &'a dyn Core) -> Self {
        let ctx = core.context();
        Self { core, ctx }
    }
}

impl MachineView for CoreView<'_> {
    fn reg(&self, name: &str) -> Option<u32> {
        if name == "pc" {
            return Some(self.ctx.pc);
        }
        let idx = reg::index_of(name)?;
        self.ctx.gprs.get(idx).copied()
    }

    fn read_word(&self, addr: u32) -> Option<u32> {
        self.core.peek(addr).ok()
    }
}

/// Stepping loop around a core, an optional oracle, and the watchpoint pool.
pub struct Executor {
    core: Box<dyn Core>,
    status: StatusHandle,
    oracle: Option<Oracle>,
    pool: WatchPool,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("status", &self.status.get())
            .finish_non_exhaustive()
    }
}

impl Executor {
    /// Wires a core, an optional oracle, and a fresh watchpoint pool.
    ///
    /// When an oracle is present it is seeded here, before any instruction
    /// retires, from the core's boot image and initial state.
    pub fn new(
        core: Box<dyn Core>,
        status: StatusHandle,
        mut oracle: Option<Oracle>,
        watchpoint_capacity: usize,
    ) -> Self {
        if let Some(oracle) = &mut oracle {
            let (base, image) = core.ram();
            oracle.seed(base, image, &core.context());
            tracing::info!("difftest oracle seeded");
        }
        Self {
            core,
            status,
            oracle,
            pool: WatchPool::new(watchpoint_capacity),
        }
    }

    /// Shared status handle.
    pub fn status(&self) -> SimStatus {
        self.status.get()
    }

    /// The watchpoint pool.
    pub fn pool(&self) -> &WatchPool {
        &self.pool
    }

    /// Mutable watchpoint pool (allocate/delete).
    pub fn pool_mut(&mut self) -> &mut WatchPool {
        &mut self.pool
    }

    /// Read-only view of the core for expression evaluation.
    pub fn view(&self) -> CoreView<'_> {
        CoreView::new(&*self.core)
    }

    /// Snapshot of the core's architectural state.
    pub fn context(&self) -> Context {
        self.core.context()
    }

    /// Forwards an external interrupt taken by the DUT to the reference
    /// model, keeping trap timing identical on both sides.
    pub fn notify_interrupt(&mut self, cause: u32) {
        if let Some(oracle) = &mut self.oracle {
            oracle.raise_interrupt(cause);
        }
    }

    /// Resumes execution for up to `limit` committed instructions
    /// (unbounded when `None`), until a stop condition fires.
    ///
    /// Structural errors abort the run and propagate; the returned status is
    /// the state the simulation settled in otherwise.
    pub fn run(&mut self, limit: Option<u64>) -> Result<SimStatus, SimError> {
        if self.status.get().is_terminal() {
            println!("Program execution has ended. Unable to resume.");
            return Ok(self.status.get());
        }
        self.status.set(SimStatus::Running);
        let mut remaining = limit;

        loop {
            let commit = match self.core.step() {
                Ok(commit) => commit,
                Err(e) => {
                    self.status.set(SimStatus::Aborted);
                    return Err(e);
                }
            };

            if let Some(commit) = commit {
                if let Some(oracle) = &mut self.oracle {
                    if let Err(e) = oracle.check_commit(&self.core.context()) {
                        if let SimError::Divergence(report) = &e {
                            eprint!("{report}");
                        }
                        self.status.set(SimStatus::Aborted);
                        return Err(e);
                    }
                }

                let triggered = {
                    let view = CoreView::new(&*self.core);
                    self.pool.scan(&view, commit.pc)
                };
                if let Some(id) = triggered {
                    // Watchpoint halt wins over any remaining step budget.
                    self.status.set(SimStatus::Stopped {
                        reason: StopReason::Watchpoint { id },
                        pc: commit.pc,
                    });
                    return Ok(self.status.get());
                }

                if let Some(left) = &mut remaining {
                    *left = left.saturating_sub(1);
                    if *left == 0 && self.status.is_running() {
                        self.status.set(SimStatus::Stopped {
                            reason: StopReason::StepLimit,
                            pc: commit.pc,
                        });
                        return Ok(self.status.get());
                    }
                }
            }

            match self.status.get() {
                SimStatus::Running => {}
                status @ SimStatus::Ended { code } => {
                    if code == 0 {
                        tracing::info!("hit good trap");
                    } else {
                        tracing::warn!(code, "hit bad trap");
                    }
                    return Ok(status);
                }
                status => return Ok(status),
            }
        }
    }
}
