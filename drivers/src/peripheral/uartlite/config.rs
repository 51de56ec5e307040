//! Build-time parameters of a UART Lite instance.

use crate::hal::register::Mmio;
use crate::hal::serial::{DataBits, Parity, SerialConfig, SerialError, StopBits};
use crate::hw::uartlite::REGISTER_ALIGN;

/// Per-device parameters fixed when the hardware is built.
///
/// Baud rate, parity and data bits cannot be changed by software; the
/// driver only records them so callers can check what they got.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UartLiteConfig {
    /// Unique ID of the device.
    pub device_id: u16,
    /// Physical register base address.
    pub base_address: usize,
    /// Fixed baud rate.
    pub baud_rate: u32,
    /// Parity generated and checked by the hardware.
    pub parity: Parity,
    /// Fixed number of data bits.
    pub data_bits: DataBits,
}

impl UartLiteConfig {
    /// 8N1 device at `base_address`.
    pub const fn new(device_id: u16, base_address: usize, baud_rate: u32) -> Self {
        Self {
            device_id,
            base_address,
            baud_rate,
            parity: Parity::None,
            data_bits: DataBits::Eight,
        }
    }

    pub const fn with_parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    pub const fn with_data_bits(mut self, data_bits: DataBits) -> Self {
        self.data_bits = data_bits;
        self
    }

    /// Check the parameters that software depends on.
    pub fn validate(&self) -> Result<(), SerialError> {
        if self.baud_rate == 0 {
            return Err(SerialError::InvalidConfig);
        }
        Ok(())
    }

    /// The line settings as a generic serial configuration.
    ///
    /// UART Lite always frames with one stop bit.
    pub const fn serial_config(&self) -> SerialConfig {
        SerialConfig {
            baud_rate: self.baud_rate,
            data_bits: self.data_bits,
            parity: self.parity,
            stop_bits: StopBits::One,
        }
    }

    /// Memory-mapped register window at the configured physical address.
    ///
    /// # Safety
    ///
    /// Same contract as [`Mmio::new`]: the address must be mapped as
    /// device memory and no other window may exist for this device.
    pub const unsafe fn mmio(&self) -> Mmio {
        unsafe { Mmio::new(self.base_address) }
    }
}

/// Reject register windows the driver cannot address.
pub(crate) fn check_base_address(base: usize) -> Result<(), SerialError> {
    if base == 0 || base % REGISTER_ALIGN != 0 {
        return Err(SerialError::InvalidConfig);
    }
    Ok(())
}
