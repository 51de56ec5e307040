//! Xilinx UART Lite driver.
//!
//! # Module Organization
//!
//! - [`hal`]: Platform-independent traits (register access, serial port)
//! - [`hw`]: Raw register map
//! - [`peripheral`]: The UART Lite driver itself
//! - [`shared`]: IRQ-safe wrapper for use from interrupt context
//!
//! The driver is RTOS independent. Memory management, threads and mutual
//! exclusion are left to the layer above; the only thing it asks of that
//! layer is an [`IrqControl`](common::sync::IrqControl) implementation
//! when the instance is shared with its interrupt vector.
//!
//! # Usage Example
//!
//! ```no_run
//! use uartlite::peripheral::uartlite::{UartLite, UartLiteConfig};
//! use uartlite::hal::register::Mmio;
//!
//! let config = UartLiteConfig::new(0, 0x4060_0000, 115200);
//! let mut uart: UartLite<'_, Mmio> = UartLite::new();
//! uart.cfg_initialize(&config, unsafe { config.mmio() })?;
//! uart.self_test()?;
//! uart.send(b"Hello, world!\n")?;
//! # Ok::<(), uartlite::SerialError>(())
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod hal;
pub mod hw;
pub mod peripheral;
pub mod shared;

// Re-export commonly used types
pub use hal::register::{Mmio, RegisterBus};
pub use hal::serial::{SerialConfig, SerialError, SerialPort};
pub use peripheral::uartlite::{TransferHandler, UartLite, UartLiteConfig, UartLiteStats};
pub use shared::SharedUartLite;
