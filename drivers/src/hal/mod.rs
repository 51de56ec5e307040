//! Hardware Abstraction Layer (HAL) - Platform-Independent Traits
//!
//! # Available Interfaces
//!
//! - [`register`]: Device register access
//! - [`serial`]: Serial port (UART) communication

pub mod register;
pub mod serial;
