//! Peripheral Drivers
//!
//! # Available Peripherals
//!
//! - [`uartlite`]: Xilinx UART Lite

pub mod uartlite;
