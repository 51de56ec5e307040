//! UART Lite shared between thread context and its interrupt vector.
//!
//! The driver itself never locks. Any state the interrupt handler touches
//! (cursors, statistics, handlers) must only be reached through a critical
//! section; [`SharedUartLite`] is that critical section, built on the
//! platform's [`IrqControl`].
//!
//! # Example
//!
//! ```ignore
//! static UART0: SharedUartLite<'static, Mmio, ArmIrq> = SharedUartLite::new(UartLite::new());
//!
//! fn uart0_irq() {
//!     UART0.on_interrupt();
//! }
//! ```

use common::sync::{IrqControl, IrqSpinLock, IrqSpinLockGuard};
use log::warn;

use crate::hal::register::RegisterBus;
use crate::hal::serial::SerialError;
use crate::peripheral::uartlite::{UartLite, UartLiteStats};

/// A [`UartLite`] behind an IRQ-safe spinlock.
pub struct SharedUartLite<'a, R, I: IrqControl> {
    inner: IrqSpinLock<UartLite<'a, R>, I>,
}

impl<'a, R, I: IrqControl> SharedUartLite<'a, R, I> {
    pub const fn new(uart: UartLite<'a, R>) -> Self {
        Self {
            inner: IrqSpinLock::new(uart),
        }
    }

    /// Lock the instance with interrupts masked.
    ///
    /// Handlers run while the lock is held, so they must not lock the
    /// same instance again.
    pub fn lock(&self) -> IrqSpinLockGuard<'_, UartLite<'a, R>, I> {
        self.inner.lock()
    }

    /// Execute a closure with exclusive access to the UART.
    ///
    /// # Example
    /// ```ignore
    /// UART0.with(|uart| uart.send(b"hi\n"))?;
    /// ```
    pub fn with<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut UartLite<'a, R>) -> T,
    {
        let mut uart = self.inner.lock();
        f(&mut uart)
    }
}

impl<'a, R: RegisterBus, I: IrqControl> SharedUartLite<'a, R, I> {
    /// Entry point for the UART's interrupt vector.
    pub fn on_interrupt(&self) {
        if let Err(e) = self.lock().handle_interrupt() {
            warn!("uartlite: interrupt ignored: {}", e);
        }
    }

    /// Statistics snapshot taken with interrupts masked.
    pub fn stats(&self) -> Result<UartLiteStats, SerialError> {
        self.lock().stats()
    }

    /// Zero the statistics with interrupts masked.
    pub fn clear_stats(&self) -> Result<(), SerialError> {
        self.lock().clear_stats()
    }
}
