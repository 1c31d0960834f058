//! Guest RAM window.
//!
//! This module implements the fixed-size byte buffer backing the guest
//! physical window `[base, base + size)`. It provides:
//! 1. **Containment:** A cheap membership predicate used by the dispatcher.
//! 2. **Word access:** Little-endian word reads and byte-lane masked writes.
//! 3. **Bulk access:** Image loading and slice copies for oracle seeding.
//!
//! Base and size are fixed for the process lifetime; the buffer is never
//! resized or freed during a run.

/// Fixed-size guest RAM mapped at a physical base address.
#[derive(Clone, Debug)]
pub struct Memory {
    base: u32,
    bytes: Vec<u8>,
}

impl Memory {
    /// Creates zero-filled RAM of `size` bytes mapped at `base`.
    ///
    /// `size` is rounded down to a whole number of words, so every contained
    /// aligned address has a full word of backing.
    pub fn new(base: u32, size: usize) -> Self {
        Self {
            base,
            bytes: vec![0; size & !0x3],
        }
    }

    /// Base physical address of the window.
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Size of the window in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns whether `addr` falls inside the window.
    pub fn contains(&self, addr: u32) -> bool {
        // Single-comparison range check; wraps below base to a large offset.
        (addr.wrapping_sub(self.base) as usize) < self.bytes.len()
    }

    fn offset(&self, addr: u32) -> usize {
        addr.wrapping_sub(self.base) as usize
    }

    /// Reads the little-endian word at `addr`.
    ///
    /// The caller guarantees `contains(addr)` and 4-byte alignment; the
    /// dispatcher masks addresses before routing here.
    pub fn read_word(&self, addr: u32) -> u32 {
        let off = self.offset(addr);
        let mut word = [0u8; 4];
        word.copy_from_slice(&self.bytes[off..off + 4]);
        u32::from_le_bytes(word)
    }

    /// Writes the byte lanes of `value` selected by `wmask` at `addr`.
    ///
    /// Bit `i` of `wmask` selects byte lane `i` (little-endian); unselected
    /// bytes are left untouched, so sub-word stores compose without
    /// read-modify-write.
    pub fn write_word(&mut self, addr: u32, value: u32, wmask: u8) {
        let off = self.offset(addr);
        let lanes = value.to_le_bytes();
        for (i, lane) in lanes.iter().enumerate() {
            if wmask & (1 << i) != 0 {
                self.bytes[off + i] = *lane;
            }
        }
    }

    /// Copies `data` into the window starting at the base address.
    ///
    /// Data beyond the window size is ignored.
    pub fn load(&mut self, data: &[u8]) {
        let n = data.len().min(self.bytes.len());
        self.bytes[..n].copy_from_slice(&data[..n]);
    }

    /// Copies bytes out of the window, starting at physical address `addr`.
    ///
    /// # Panics
    ///
    /// Panics if the range `[addr, addr + out.len())` leaves the window.
    pub fn read_slice(&self, addr: u32, out: &mut [u8]) {
        let off = self.offset(addr);
        out.copy_from_slice(&self.bytes[off..off + out.len()]);
    }

    /// Copies bytes into the window, starting at physical address `addr`.
    ///
    /// # Panics
    ///
    /// Panics if the range `[addr, addr + data.len())` leaves the window.
    pub fn write_slice(&mut self, addr: u32, data: &[u8]) {
        let off = self.offset(addr);
        self.bytes[off..off + data.len()].copy_from_slice(data);
    }

    /// The whole window as raw bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
