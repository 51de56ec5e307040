//! Register access Hardware Abstraction Layer.
//!
//! Peripheral drivers talk to their device only through [`RegisterBus`],
//! so the same driver runs against memory-mapped hardware or a simulated
//! register file.

use core::ptr::{read_volatile, write_volatile};

/// 32-bit register window of a single device.
pub trait RegisterBus {
    /// Effective base address of the register window.
    fn base_address(&self) -> usize;

    /// Read the register at `offset` from the base.
    fn read(&self, offset: usize) -> u32;

    /// Write the register at `offset` from the base.
    fn write(&mut self, offset: usize, value: u32);
}

/// Memory-mapped register window accessed with volatile loads and stores.
#[derive(Debug)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// Create a register window at `base`.
    ///
    /// # Safety
    ///
    /// - `base` must point to the device's register block
    /// - Only one window should exist per device
    /// - Memory must be mapped as device memory
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }
}

impl RegisterBus for Mmio {
    fn base_address(&self) -> usize {
        self.base
    }

    #[inline]
    fn read(&self, offset: usize) -> u32 {
        // SAFETY: `new` requires `base` to be a valid register block.
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write(&mut self, offset: usize, value: u32) {
        // SAFETY: as for `read`.
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }
}
