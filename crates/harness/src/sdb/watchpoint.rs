//! Fixed-capacity watchpoint pool.
//!
//! This module implements the watchpoint arena scanned after every committed
//! instruction. It provides:
//! 1. **Arena storage:** `capacity` slots with stable ids assigned at pool
//!    initialization, no dynamic allocation after construction.
//! 2. **Two lists:** An allocated list and a free list threaded through an
//!    index-based `next` field; every slot is on exactly one of them.
//! 3. **Scan:** Allocated-order re-evaluation, with evaluation failures
//!    logged and skipped, and any value change flagged as a halt request.
//!
//! Allocate and free are O(1); `delete` unlinks by id with a list walk.

use thiserror::Error;

use crate::sdb::expr::{self, MachineView};

/// Watchpoint pool errors.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// Every slot is already allocated.
    #[error("too many watchpoints")]
    Exhausted,
}

#[derive(Clone, Debug)]
struct Slot {
    id: usize,
    next: Option<usize>,
    expr: String,
    last: u32,
}

/// A view of one allocated watchpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WatchpointInfo<'a> {
    /// Stable slot id.
    pub id: usize,
    /// The watched expression text.
    pub expr: &'a str,
    /// Value observed at allocation or at the last triggering scan.
    pub last_value: u32,
}

/// Fixed-capacity pool of watchpoints.
#[derive(Clone, Debug)]
pub struct WatchPool {
    slots: Vec<Slot>,
    head: Option<usize>,
    free: Option<usize>,
}

impl WatchPool {
    /// Creates a pool of `capacity` slots, all on the free list, with slot
    /// ids equal to their arena index.
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|i| Slot {
                id: i,
                next: (i + 1 < capacity).then_some(i + 1),
                expr: String::new(),
                last: 0,
            })
            .collect();
        Self {
            slots,
            head: None,
            free: (capacity > 0).then_some(0),
        }
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Allocates a watchpoint for `expr` with an already-evaluated initial
    /// value, moving one slot from the free list to the head of the
    /// allocated list. The caller evaluates the expression first so a failed
    /// evaluation never touches the lists.
    pub fn add(&mut self, expr: String, initial: u32) -> Result<usize, PoolError> {
        let idx = self.free.ok_or(PoolError::Exhausted)?;
        self.free = self.slots[idx].next;
        let slot = &mut self.slots[idx];
        slot.expr = expr;
        slot.last = initial;
        slot.next = self.head;
        self.head = Some(idx);
        Ok(slot.id)
    }

    /// Removes the watchpoint with the given id, returning whether it was
    /// allocated. An unknown id leaves both lists untouched.
    pub fn remove(&mut self, id: usize) -> bool {
        let mut prev: Option<usize> = None;
        let mut cur = self.head;
        while let Some(i) = cur {
            if self.slots[i].id == id {
                let next = self.slots[i].next;
                match prev {
                    Some(p) => self.slots[p].next = next,
                    None => self.head = next,
                }
                self.slots[i].next = self.free;
                self.free = Some(i);
                return true;
            }
            prev = cur;
            cur = self.slots[i].next;
        }
        false
    }

    /// Allocated watchpoints, list order (most recently added first).
    pub fn iter(&self) -> impl Iterator<Item = WatchpointInfo<'_>> {
        let mut cur = self.head;
        std::iter::from_fn(move || {
            let i = cur?;
            let slot = &self.slots[i];
            cur = slot.next;
            Some(WatchpointInfo {
                id: slot.id,
                expr: &slot.expr,
                last_value: slot.last,
            })
        })
    }

    /// Re-evaluates every allocated watchpoint against the machine view.
    ///
    /// An evaluation failure is logged and skipped for this cycle without
    /// updating the stored value. A changed value prints the watchpoint id,
    /// the committing pc, and the transition, then updates the stored value.
    /// Returns the id of the first triggered watchpoint, if any; the caller
    /// halts the run regardless of any remaining step budget.
    pub fn scan(&mut self, view: &dyn MachineView, pc: u32) -> Option<usize> {
        let mut triggered = None;
        let mut cur = self.head;
        while let Some(i) = cur {
            cur = self.slots[i].next;
            match expr::eval(&self.slots[i].expr, view) {
                Err(e) => {
                    tracing::warn!(
                        watchpoint = self.slots[i].id,
                        expr = %self.slots[i].expr,
                        error = %e,
                        "watchpoint expression failed to evaluate; skipped"
                    );
                }
                Ok(value) if value != self.slots[i].last => {
                    println!(
                        "Watchpoint {} triggered at pc = {:#010x}: {:#010x} -> {:#010x}",
                        self.slots[i].id, pc, self.slots[i].last, value
                    );
                    self.slots[i].last = value;
                    triggered.get_or_insert(self.slots[i].id);
                }
                Ok(_) => {}
            }
        }
        triggered
    }
}
