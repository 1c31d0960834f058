//! Address dispatch between RAM and memory-mapped devices.
//!
//! This module implements the physical address space of one simulation side.
//! It performs:
//! 1. **Alignment masking:** Every access drops the low two address bits
//!    before dispatch, identically for reads and writes.
//! 2. **Routing:** RAM window first, then the fixed device predicates
//!    (clock for reads, serial for single-byte writes).
//! 3. **Fault policy:** Unmapped accesses are fatal while the simulation is
//!    active; outside a run, reads return 0 and writes are no-ops, matching
//!    in-flight accesses settling after the core has halted.

use crate::common::error::SimError;
use crate::common::status::StatusHandle;
use crate::config::SystemConfig;
use crate::soc::devices::{Clock, Serial};
use crate::soc::memory::Memory;

/// Mask dropping the low two bits of a physical address.
const ALIGN_MASK: u32 = !0x3;

/// Byte-lane mask selecting all four lanes of a word.
pub const WMASK_ALL: u8 = 0b1111;

/// Physical address space: RAM window plus clock and serial devices.
#[derive(Debug)]
pub struct AddressSpace {
    mem: Memory,
    clock: Clock,
    serial: Serial,
    rtc_base: u32,
    serial_base: u32,
    status: StatusHandle,
}

impl AddressSpace {
    /// Builds the address space from the configured memory map.
    pub fn new(config: &SystemConfig, status: StatusHandle) -> Self {
        Self::with_devices(config, status, Clock::new(), Serial::new())
    }

    /// Builds the address space with injected devices (test clocks, capture
    /// sinks, or a silenced reference-model serial port).
    pub fn with_devices(
        config: &SystemConfig,
        status: StatusHandle,
        clock: Clock,
        serial: Serial,
    ) -> Self {
        Self {
            mem: Memory::new(config.ram_base, config.ram_size),
            clock,
            serial,
            rtc_base: config.rtc_base,
            serial_base: config.serial_base,
            status,
        }
    }

    fn in_clock(&self, addr: u32) -> bool {
        addr == self.rtc_base || addr == self.rtc_base + 4
    }

    fn in_serial(&self, addr: u32) -> bool {
        addr == self.serial_base
    }

    /// Loads a boot image into RAM at the window base.
    pub fn load_image(&mut self, data: &[u8]) {
        self.mem.load(data);
    }

    /// Base physical address of the RAM window.
    pub fn ram_base(&self) -> u32 {
        self.mem.base()
    }

    /// The RAM window as raw bytes (oracle seeding).
    pub fn ram_bytes(&self) -> &[u8] {
        self.mem.bytes()
    }

    /// Copies bytes into RAM starting at physical address `addr`.
    pub fn write_ram(&mut self, addr: u32, data: &[u8]) {
        self.mem.write_slice(addr, data);
    }

    /// Copies bytes out of RAM starting at physical address `addr`.
    pub fn read_ram(&self, addr: u32, out: &mut [u8]) {
        self.mem.read_slice(addr, out);
    }

    /// Reads the aligned word containing `addr`.
    ///
    /// RAM returns the stored word; the clock returns the counter half
    /// selected by the offset. Any other address is fatal while the
    /// simulation is active and reads as 0 otherwise.
    pub fn read_word(&mut self, addr: u32) -> Result<u32, SimError> {
        let addr = addr & ALIGN_MASK;
        if self.mem.contains(addr) {
            return Ok(self.mem.read_word(addr));
        }
        if self.in_clock(addr) {
            return Ok(self.clock.read(addr - self.rtc_base));
        }
        if self.status.is_running() {
            Err(SimError::UnmappedRead { addr })
        } else {
            Ok(0)
        }
    }

    /// Side-effect-free word read for the debugger.
    ///
    /// Never latches the clock or otherwise perturbs device state; only RAM
    /// is readable this way. Unmapped addresses follow the same fault policy
    /// as `read_word`.
    pub fn peek_word(&self, addr: u32) -> Result<u32, SimError> {
        let addr = addr & ALIGN_MASK;
        if self.mem.contains(addr) {
            return Ok(self.mem.read_word(addr));
        }
        if self.status.is_running() {
            Err(SimError::UnmappedRead { addr })
        } else {
            Ok(0)
        }
    }

    /// Writes the byte lanes of `value` selected by `wmask` to the aligned
    /// word containing `addr`.
    ///
    /// A no-op when the simulation is not active. RAM stores only the
    /// selected lanes; a serial store with a mask selecting exactly one lane
    /// forwards that lane's byte to the sink. Anything else is fatal.
    pub fn write_word(&mut self, addr: u32, value: u32, wmask: u8) -> Result<(), SimError> {
        if !self.status.is_running() {
            return Ok(());
        }
        let addr = addr & ALIGN_MASK;
        if self.mem.contains(addr) {
            self.mem.write_word(addr, value, wmask);
            return Ok(());
        }
        if self.in_serial(addr) && wmask.count_ones() == 1 {
            let lane = wmask.trailing_zeros();
            self.serial.transmit((value >> (lane * 8)) as u8);
            return Ok(());
        }
        Err(SimError::UnmappedWrite { addr, wmask })
    }
}
