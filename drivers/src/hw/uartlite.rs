//! UART Lite register map.
//!
//! Offsets are relative to the device's register base. Every register is
//! 32 bits wide; only the low byte carries data.

use bitflags::bitflags;

/// Receive FIFO (read-only).
pub const RX_FIFO_OFFSET: usize = 0x00;
/// Transmit FIFO (write-only).
pub const TX_FIFO_OFFSET: usize = 0x04;
/// Status register (read-only).
pub const STATUS_REG_OFFSET: usize = 0x08;
/// Control register (write-only).
pub const CONTROL_REG_OFFSET: usize = 0x0C;

/// Depth of both the transmit and the receive FIFO. Fixed in hardware.
pub const FIFO_DEPTH: usize = 16;

/// Register base addresses must be aligned to the register width.
pub const REGISTER_ALIGN: usize = 4;

bitflags! {
    /// Status register bits.
    ///
    /// The error bits describe the byte currently at the head of the
    /// receive FIFO, so status must be sampled before each data read.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Status: u32 {
        const RX_VALID_DATA = 1 << 0;
        const RX_FULL = 1 << 1;
        const TX_EMPTY = 1 << 2;
        const TX_FULL = 1 << 3;
        const INTR_ENABLED = 1 << 4;
        const OVERRUN_ERROR = 1 << 5;
        const FRAME_ERROR = 1 << 6;
        const PARITY_ERROR = 1 << 7;
    }
}

bitflags! {
    /// Control register bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Control: u32 {
        const RESET_TX_FIFO = 1 << 0;
        const RESET_RX_FIFO = 1 << 1;
        const ENABLE_INTR = 1 << 4;
    }
}

bitflags! {
    /// Per-byte receive errors.
    ///
    /// Advisory only: a byte with errors is still delivered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RxErrors: u8 {
        const OVERRUN = 1 << 0;
        const FRAMING = 1 << 1;
        const PARITY = 1 << 2;
    }
}

impl Status {
    /// Either receive condition that raises an interrupt.
    pub const RX_PENDING: Self = Self::RX_VALID_DATA.union(Self::RX_FULL);

    /// Errors flagged for the byte at the head of the receive FIFO.
    pub fn rx_errors(self) -> RxErrors {
        let mut errors = RxErrors::empty();
        errors.set(RxErrors::OVERRUN, self.contains(Self::OVERRUN_ERROR));
        errors.set(RxErrors::FRAMING, self.contains(Self::FRAME_ERROR));
        errors.set(RxErrors::PARITY, self.contains(Self::PARITY_ERROR));
        errors
    }
}
