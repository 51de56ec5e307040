//! Interrupt-mode operation.
//!
//! The platform calls [`UartLite::handle_interrupt`] from the UART's
//! interrupt vector. The handler saves no processor context; that is the
//! vector's job.

use alloc::boxed::Box;
use log::trace;

use super::{TransferHandler, UartLite, drain_rx_fifo, fill_tx_fifo, read_status};
use crate::hal::register::RegisterBus;
use crate::hal::serial::SerialError;
use crate::hw::uartlite::{CONTROL_REG_OFFSET, Control, Status};

impl<'a, R: RegisterBus> UartLite<'a, R> {
    /// Let the device raise interrupts.
    ///
    /// Transfers in progress are unaffected.
    pub fn enable_interrupt(&mut self) -> Result<(), SerialError> {
        let dev = self.device_mut()?;
        dev.bus.write(CONTROL_REG_OFFSET, Control::ENABLE_INTR.bits());
        Ok(())
    }

    pub fn disable_interrupt(&mut self) -> Result<(), SerialError> {
        let dev = self.device_mut()?;
        dev.bus.write(CONTROL_REG_OFFSET, 0);
        Ok(())
    }

    /// Install the handler called when an interrupt-driven receive fills
    /// its buffer, or with `0` when data arrives and no receive is active.
    ///
    /// Replaces any previous handler from the next interrupt on. The
    /// driver does not guard against a handler invocation in flight.
    pub fn set_recv_handler<H>(&mut self, handler: H) -> Result<(), SerialError>
    where
        H: TransferHandler + Send + 'a,
    {
        self.ensure_ready()?;
        self.recv_handler = Some(Box::new(handler));
        Ok(())
    }

    /// Install the handler called once an interrupt-driven send has left
    /// the transmit FIFO completely.
    pub fn set_send_handler<H>(&mut self, handler: H) -> Result<(), SerialError>
    where
        H: TransferHandler + Send + 'a,
    {
        self.ensure_ready()?;
        self.send_handler = Some(Box::new(handler));
        Ok(())
    }

    /// Service one UART interrupt.
    ///
    /// Receive data is drained into the active receive buffer, and the
    /// transmit FIFO is refilled from the active send buffer when it has
    /// gone empty. With no receive active, pending data stays in the FIFO
    /// and the receive handler is told about it with a count of `0`.
    pub fn handle_interrupt(&mut self) -> Result<(), SerialError> {
        let status = self.status()?;
        trace!("uartlite: irq status {:#04x}", status.bits());

        if status.intersects(Status::RX_PENDING) {
            self.service_receive();
        }

        if status.contains(Status::TX_EMPTY) && self.send_cursor.is_some() {
            self.service_send();
        }

        Ok(())
    }

    fn service_receive(&mut self) {
        let Some(dev) = self.device.as_mut() else {
            return;
        };

        let completed = match self.recv_cursor.take() {
            None => Some(0),
            Some(mut cursor) => {
                let received = drain_rx_fifo(&mut dev.bus, &mut self.stats, cursor.unfilled_mut());
                cursor.advance(received);
                if cursor.is_complete() {
                    let requested = cursor.requested();
                    self.finished_recv = Some(cursor.into_filled());
                    Some(requested)
                } else {
                    self.recv_cursor = Some(cursor);
                    None
                }
            }
        };

        self.stats.record_receive_interrupt();

        if let (Some(count), Some(handler)) = (completed, self.recv_handler.as_mut()) {
            handler.on_complete(count);
        }
    }

    fn service_send(&mut self) {
        let Some(dev) = self.device.as_mut() else {
            return;
        };
        let Some(mut cursor) = self.send_cursor.take() else {
            return;
        };

        if !cursor.is_complete() {
            let sent = fill_tx_fifo(&mut dev.bus, &mut self.stats, cursor.pending());
            cursor.advance(sent);
        }

        self.stats.record_transmit_interrupt();

        // Bytes may still be shifting out of the FIFO; completion waits
        // for the interrupt that reports it empty.
        if cursor.is_complete() && read_status(&dev.bus).contains(Status::TX_EMPTY) {
            if let Some(handler) = self.send_handler.as_mut() {
                handler.on_complete(cursor.requested());
            }
        } else {
            self.send_cursor = Some(cursor);
        }
    }

    /// Mask the device interrupt, returning whether it was enabled.
    pub(super) fn mask_interrupt(&mut self) -> Result<bool, SerialError> {
        let dev = self.device_mut()?;
        let enabled = read_status(&dev.bus).contains(Status::INTR_ENABLED);
        if enabled {
            dev.bus.write(CONTROL_REG_OFFSET, 0);
        }
        Ok(enabled)
    }

    pub(super) fn unmask_interrupt(&mut self, was_enabled: bool) -> Result<(), SerialError> {
        if was_enabled {
            self.enable_interrupt()?;
        }
        Ok(())
    }
}
