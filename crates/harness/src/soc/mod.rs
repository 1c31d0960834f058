//! Guest-visible address space.
//!
//! This module assembles the physical memory map of one simulation side:
//! 1. **RAM:** The fixed guest physical window backed by a byte buffer.
//! 2. **Devices:** The memory-mapped clock and serial-out peripherals.
//! 3. **Dispatch:** The `AddressSpace` routing every word access to the right
//!    target under alignment and byte-lane mask rules.

/// Address dispatch between RAM and devices.
pub mod bus;

/// Memory-mapped peripheral implementations.
pub mod devices;

/// Guest RAM window.
pub mod memory;

pub use bus::AddressSpace;
pub use memory::Memory;
