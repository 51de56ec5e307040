//! Raw register definitions.

pub mod uartlite;
