//! Configuration system for the lockstep harness.
//!
//! This module defines all configuration structures used to parameterize the
//! harness. It provides:
//! 1. **Defaults:** The guest-visible memory map and baseline debug settings.
//! 2. **Structures:** Hierarchical config for the system, architecture, and
//!    debugger sections.
//!
//! Configuration is supplied as JSON (see the CLI's `--config` flag) or via
//! `Config::default()`.

use serde::Deserialize;

/// Default configuration constants for the harness.
///
/// The addresses below are guest-visible ABI and must match the software
/// image exactly; they are configurable only so alternate memory maps can be
/// tested.
pub mod defaults {
    /// Base of the guest physical RAM window.
    pub const RAM_BASE: u32 = 0x8000_0000;

    /// Size of the guest physical RAM window (128 MiB).
    pub const RAM_SIZE: usize = 0x0800_0000;

    /// Base of the memory-mapped device region.
    pub const DEVICE_BASE: u32 = 0xa000_0000;

    /// Address of the real-time clock device (two consecutive words:
    /// low 32 bits of elapsed microseconds, then the high 32 bits).
    pub const RTC_BASE: u32 = DEVICE_BASE + 0x0000_0048;

    /// Address of the serial transmit register (single-byte writes only).
    pub const SERIAL_BASE: u32 = DEVICE_BASE + 0x0000_03f8;

    /// Reset value of the program counter.
    pub const RESET_VECTOR: u32 = RAM_BASE;

    /// Number of general-purpose registers (RV32E).
    pub const GPR_COUNT: usize = 16;

    /// Reset value of `mstatus`.
    pub const MSTATUS_RESET: u32 = 0x1800;

    /// Capacity of the watchpoint pool.
    pub const WATCHPOINT_CAPACITY: usize = 32;
}

/// Top-level harness configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Guest memory map (RAM window and device addresses).
    pub system: SystemConfig,
    /// Architectural parameters (register count, reset vector).
    pub arch: ArchConfig,
    /// Debugger parameters (watchpoint capacity, difftest toggle).
    pub debug: DebugConfig,
}

/// Guest memory map configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Base of the guest physical RAM window.
    pub ram_base: u32,
    /// Size of the guest physical RAM window in bytes.
    pub ram_size: usize,
    /// Address of the clock device (first of two word registers).
    pub rtc_base: u32,
    /// Address of the serial transmit register.
    pub serial_base: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            ram_base: defaults::RAM_BASE,
            ram_size: defaults::RAM_SIZE,
            rtc_base: defaults::RTC_BASE,
            serial_base: defaults::SERIAL_BASE,
        }
    }
}

/// Architectural parameters of the core under test.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArchConfig {
    /// Number of general-purpose registers. The oracle compares exactly this
    /// many registers; 16 for an RV32E core, 32 for RV32I.
    pub gpr_count: usize,
    /// Program counter reset value.
    pub reset_vector: u32,
}

impl Default for ArchConfig {
    fn default() -> Self {
        Self {
            gpr_count: defaults::GPR_COUNT,
            reset_vector: defaults::RESET_VECTOR,
        }
    }
}

/// Debugger parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Maximum number of simultaneously allocated watchpoints.
    pub watchpoint_capacity: usize,
    /// Run the difftest oracle after every committed instruction.
    pub difftest: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            watchpoint_capacity: defaults::WATCHPOINT_CAPACITY,
            difftest: true,
        }
    }
}
