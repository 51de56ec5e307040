//! Xilinx UART Lite Driver
//!
//! The UART Lite is a minimal UART: baud rate, parity and data bits are
//! fixed when the hardware is built. It has 16-byte transmit and receive
//! FIFOs and a single interrupt enable. An interrupt fires when the
//! transmit FIFO goes from holding data to empty, and whenever the
//! receive FIFO holds data.
//!
//! The receiver cannot be disabled, so the receive FIFO may hold stale
//! data. Initialization leaves the FIFOs alone; call
//! [`UartLite::reset_fifos`] to clear them.
//!
//! # Features
//!
//! - Polled, non-blocking [`send`](UartLite::send) / [`recv`](UartLite::recv)
//! - Interrupt-driven transfers with completion handlers
//! - Per-byte parity/framing/overrun accounting in [`UartLiteStats`]
//! - Blocking byte I/O through the [`SerialPort`] HAL
//!
//! The driver provides no locking. Wrap it in
//! [`SharedUartLite`](crate::shared::SharedUartLite) when the interrupt
//! vector and thread context both use it.
//!
//! # Example
//!
//! ```no_run
//! use uartlite::hal::register::Mmio;
//! use uartlite::peripheral::uartlite::{UartLite, UartLiteConfig};
//!
//! let config = UartLiteConfig::new(0, 0x4060_0000, 9600);
//! let mut uart: UartLite<'_, Mmio> = UartLite::new();
//! uart.cfg_initialize(&config, unsafe { config.mmio() })?;
//! uart.send(b"Hello, world!\n")?;
//! # Ok::<(), uartlite::hal::serial::SerialError>(())
//! ```

mod config;
mod cursor;
mod handler;
mod intr;
mod stats;

#[cfg(test)]
pub(crate) mod sim;

pub use config::UartLiteConfig;
pub use handler::TransferHandler;
pub use stats::UartLiteStats;

use alloc::boxed::Box;
use log::{debug, warn};

use self::config::check_base_address;
use self::cursor::TransferCursor;
use crate::hal::register::RegisterBus;
use crate::hal::serial::{NonBlockingSerial, SerialConfig, SerialError, SerialPort};
use crate::hw::uartlite::{
    CONTROL_REG_OFFSET, Control, FIFO_DEPTH, RX_FIFO_OFFSET, RxErrors, STATUS_REG_OFFSET, Status,
    TX_FIFO_OFFSET,
};

type BoxedHandler<'a> = Box<dyn TransferHandler + Send + 'a>;

/// Register window plus the parameters it was bound with.
struct Device<R> {
    bus: R,
    config: UartLiteConfig,
}

/// UART Lite driver instance.
///
/// `'a` is the lifetime of buffers handed over for interrupt-driven
/// transfers and of the registered handlers.
pub struct UartLite<'a, R> {
    device: Option<Device<R>>,
    stats: UartLiteStats,
    send_cursor: Option<TransferCursor<&'a [u8]>>,
    recv_cursor: Option<TransferCursor<&'a mut [u8]>>,
    finished_recv: Option<&'a mut [u8]>,
    send_handler: Option<BoxedHandler<'a>>,
    recv_handler: Option<BoxedHandler<'a>>,
}

impl<'a, R> UartLite<'a, R> {
    /// Create an instance that is not yet bound to hardware.
    ///
    /// Every operation fails with [`SerialError::NotReady`] until
    /// [`cfg_initialize`](Self::cfg_initialize) succeeds.
    pub const fn new() -> Self {
        Self {
            device: None,
            stats: UartLiteStats::new(),
            send_cursor: None,
            recv_cursor: None,
            finished_recv: None,
            send_handler: None,
            recv_handler: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.device.is_some()
    }

    /// Parameters the instance was initialized with.
    pub fn config(&self) -> Option<&UartLiteConfig> {
        self.device.as_ref().map(|dev| &dev.config)
    }

    fn device_mut(&mut self) -> Result<&mut Device<R>, SerialError> {
        self.device.as_mut().ok_or(SerialError::NotReady)
    }

    fn ensure_ready(&self) -> Result<(), SerialError> {
        if self.device.is_none() {
            return Err(SerialError::NotReady);
        }
        Ok(())
    }
}

impl<R> Default for UartLite<'_, R> {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn read_status<R: RegisterBus>(bus: &R) -> Status {
    Status::from_bits_retain(bus.read(STATUS_REG_OFFSET))
}

/// Push bytes into the transmit FIFO until it reports full, `FIFO_DEPTH`
/// bytes went in, or `data` runs out.
fn fill_tx_fifo<R: RegisterBus>(bus: &mut R, stats: &mut UartLiteStats, data: &[u8]) -> usize {
    let mut sent = 0;
    while sent < data.len() && sent < FIFO_DEPTH {
        if read_status(bus).contains(Status::TX_FULL) {
            break;
        }
        bus.write(TX_FIFO_OFFSET, data[sent] as u32);
        sent += 1;
    }
    stats.record_transmitted(sent);
    sent
}

/// Pull bytes from the receive FIFO until it is empty, `buf` is full, or
/// `FIFO_DEPTH` bytes came out. Errored bytes are counted and kept.
fn drain_rx_fifo<R: RegisterBus>(bus: &mut R, stats: &mut UartLiteStats, buf: &mut [u8]) -> usize {
    let mut received = 0;
    while received < buf.len() && received < FIFO_DEPTH {
        let status = read_status(bus);
        if !status.contains(Status::RX_VALID_DATA) {
            break;
        }
        buf[received] = bus.read(RX_FIFO_OFFSET) as u8;
        stats.record_rx_errors(status.rx_errors());
        received += 1;
    }
    stats.record_received(received);
    received
}

impl<'a, R: RegisterBus> UartLite<'a, R> {
    /// Bind the instance to its registers and mark it ready.
    ///
    /// `bus` carries the effective base address, which replaces the
    /// physical address in `config` when address translation is in use.
    /// Cursors, handlers and statistics are reset; the hardware FIFOs are
    /// not touched.
    pub fn cfg_initialize(&mut self, config: &UartLiteConfig, bus: R) -> Result<(), SerialError> {
        config.validate()?;
        check_base_address(bus.base_address())?;

        debug!(
            "uartlite{}: ready at {:#x}, {} baud, {} data bits, parity {:?}",
            config.device_id,
            bus.base_address(),
            config.baud_rate,
            config.data_bits.bits(),
            config.parity,
        );

        self.send_cursor = None;
        self.recv_cursor = None;
        self.finished_recv = None;
        self.send_handler = None;
        self.recv_handler = None;
        self.stats.clear();
        self.device = Some(Device {
            bus,
            config: *config,
        });
        Ok(())
    }

    /// Read the raw status register.
    pub fn status(&self) -> Result<Status, SerialError> {
        let dev = self.device.as_ref().ok_or(SerialError::NotReady)?;
        Ok(read_status(&dev.bus))
    }

    /// Clear both hardware FIFOs.
    ///
    /// The interrupt enable is preserved. Cursors are left as they are;
    /// aborting a transfer is up to the caller.
    pub fn reset_fifos(&mut self) -> Result<(), SerialError> {
        let dev = self.device_mut()?;
        let mut control = Control::RESET_TX_FIFO | Control::RESET_RX_FIFO;
        if read_status(&dev.bus).contains(Status::INTR_ENABLED) {
            control |= Control::ENABLE_INTR;
        }
        dev.bus.write(CONTROL_REG_OFFSET, control.bits());
        debug!("uartlite{}: FIFOs reset", dev.config.device_id);
        Ok(())
    }

    /// Polled send: put as much of `data` into the transmit FIFO as fits
    /// and return how many bytes went in.
    ///
    /// Never waits for the FIFO to drain. An interrupt-driven send in
    /// progress is abandoned without calling its handler.
    pub fn send(&mut self, data: &[u8]) -> Result<usize, SerialError> {
        let dev = self.device.as_mut().ok_or(SerialError::NotReady)?;
        if let Some(cursor) = self.send_cursor.take() {
            warn!(
                "uartlite{}: send aborted with {} of {} bytes left",
                dev.config.device_id,
                cursor.remaining(),
                cursor.requested()
            );
        }
        Ok(fill_tx_fifo(&mut dev.bus, &mut self.stats, data))
    }

    /// Polled receive: move whatever the receive FIFO holds into `buf`
    /// and return how many bytes were read.
    ///
    /// Bytes flagged with line errors are delivered and counted in the
    /// statistics. An interrupt-driven receive in progress is abandoned;
    /// its buffer becomes available from
    /// [`take_recv_buffer`](Self::take_recv_buffer).
    pub fn recv(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
        let dev = self.device.as_mut().ok_or(SerialError::NotReady)?;
        if let Some(cursor) = self.recv_cursor.take() {
            warn!(
                "uartlite{}: receive aborted after {} of {} bytes",
                dev.config.device_id,
                cursor.transferred(),
                cursor.requested()
            );
            // An active cursor means no finished buffer is waiting.
            debug_assert!(self.finished_recv.is_none());
            self.finished_recv = Some(cursor.into_filled());
        }
        Ok(drain_rx_fifo(&mut dev.bus, &mut self.stats, buf))
    }

    /// Start an interrupt-driven send of `data`.
    ///
    /// The FIFO is primed immediately and the number of bytes queued is
    /// returned; the interrupt handler sends the rest and calls the send
    /// handler once the last byte has left the FIFO.
    pub fn start_send(&mut self, data: &'a [u8]) -> Result<usize, SerialError> {
        let was_enabled = self.mask_interrupt()?;

        if let Some(old) = self.send_cursor.take() {
            warn!("uartlite: replacing send with {} bytes left", old.remaining());
        }

        let dev = self.device.as_mut().ok_or(SerialError::NotReady)?;
        let mut cursor = TransferCursor::new(data);
        let sent = fill_tx_fifo(&mut dev.bus, &mut self.stats, cursor.pending());
        cursor.advance(sent);
        if cursor.requested() > 0 {
            self.send_cursor = Some(cursor);
        }

        self.unmask_interrupt(was_enabled)?;
        Ok(sent)
    }

    /// Start an interrupt-driven receive into `buf`.
    ///
    /// Whatever the FIFO already holds is copied in right away and that
    /// count is returned. If that fills `buf` the transfer is finished on
    /// the spot and no handler runs. Otherwise the interrupt handler keeps
    /// filling it and calls the receive handler when it is full.
    ///
    /// Fails with [`SerialError::Busy`] while another receive is active or
    /// a finished buffer is still waiting for
    /// [`take_recv_buffer`](Self::take_recv_buffer).
    pub fn start_recv(&mut self, buf: &'a mut [u8]) -> Result<usize, SerialError> {
        self.ensure_ready()?;
        if self.recv_cursor.is_some() || self.finished_recv.is_some() {
            return Err(SerialError::Busy);
        }

        let was_enabled = self.mask_interrupt()?;

        let dev = self.device.as_mut().ok_or(SerialError::NotReady)?;
        let mut cursor = TransferCursor::new(buf);
        let received = drain_rx_fifo(&mut dev.bus, &mut self.stats, cursor.unfilled_mut());
        cursor.advance(received);
        if cursor.is_complete() {
            self.finished_recv = Some(cursor.into_filled());
        } else {
            self.recv_cursor = Some(cursor);
        }

        self.unmask_interrupt(was_enabled)?;
        Ok(received)
    }

    /// Reclaim the buffer of the last finished or abandoned receive,
    /// trimmed to the bytes it actually holds.
    pub fn take_recv_buffer(&mut self) -> Option<&'a mut [u8]> {
        self.finished_recv.take()
    }

    /// Cancel the active interrupt-driven receive and hand back the bytes
    /// it collected. No handler runs.
    pub fn abort_recv(&mut self) -> Option<&'a mut [u8]> {
        let cursor = self.recv_cursor.take()?;
        debug!(
            "uartlite: receive aborted after {} of {} bytes",
            cursor.transferred(),
            cursor.requested()
        );
        Some(cursor.into_filled())
    }

    /// Bytes still expected by the active interrupt-driven receive.
    pub fn recv_remaining(&self) -> usize {
        self.recv_cursor.as_ref().map_or(0, |c| c.remaining())
    }

    /// Bytes of the active interrupt-driven send not yet in the FIFO.
    pub fn send_remaining(&self) -> usize {
        self.send_cursor.as_ref().map_or(0, |c| c.remaining())
    }

    /// True while a send has bytes left or the transmit FIFO still holds
    /// data.
    pub fn is_sending(&self) -> Result<bool, SerialError> {
        let hw_busy = !self.status()?.contains(Status::TX_EMPTY);
        Ok(hw_busy || self.send_remaining() > 0)
    }

    /// Snapshot of the statistics.
    pub fn stats(&self) -> Result<UartLiteStats, SerialError> {
        self.ensure_ready()?;
        Ok(self.stats)
    }

    pub fn clear_stats(&mut self) -> Result<(), SerialError> {
        self.ensure_ready()?;
        self.stats.clear();
        Ok(())
    }

    /// Check basic register connectivity.
    ///
    /// Resets the FIFOs, after which the status register must read "TX
    /// FIFO empty" and nothing else (the interrupt-enable bit aside).
    pub fn self_test(&mut self) -> Result<(), SerialError> {
        self.reset_fifos()?;
        let status = self.status()?.difference(Status::INTR_ENABLED);
        if status != Status::TX_EMPTY {
            warn!("uartlite: self-test failed, status {:#04x}", status.bits());
            return Err(SerialError::SelfTestFailed);
        }
        Ok(())
    }

    /// Read one byte and the line errors flagged for it, if one is
    /// available.
    pub fn try_read_byte_with_status(&mut self) -> Result<(u8, RxErrors), SerialError> {
        let dev = self.device.as_mut().ok_or(SerialError::NotReady)?;
        let status = read_status(&dev.bus);
        if !status.contains(Status::RX_VALID_DATA) {
            return Err(SerialError::WouldBlock);
        }
        let byte = dev.bus.read(RX_FIFO_OFFSET) as u8;
        let errors = status.rx_errors();
        self.stats.record_rx_errors(errors);
        self.stats.record_received(1);
        Ok((byte, errors))
    }
}

// ============================================================================
// HAL Implementation
// ============================================================================

impl<R: RegisterBus> SerialPort for UartLite<'_, R> {
    type Error = SerialError;

    /// Line settings are fixed in hardware; this only accepts the
    /// configuration the device was built with.
    fn configure(&mut self, config: SerialConfig) -> Result<(), SerialError> {
        let dev = self.device.as_ref().ok_or(SerialError::NotReady)?;
        if dev.config.serial_config() != config {
            return Err(SerialError::InvalidConfig);
        }
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), SerialError> {
        loop {
            match self.try_write_byte(byte) {
                Err(SerialError::WouldBlock) => core::hint::spin_loop(),
                other => return other,
            }
        }
    }

    fn read_byte(&mut self) -> Result<u8, SerialError> {
        loop {
            match self.try_read_byte() {
                Err(SerialError::WouldBlock) => core::hint::spin_loop(),
                other => return other,
            }
        }
    }

    fn flush(&mut self) -> Result<(), SerialError> {
        while !self.status()?.contains(Status::TX_EMPTY) {
            core::hint::spin_loop();
        }
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.is_sending().unwrap_or(false)
    }
}

impl<R: RegisterBus> NonBlockingSerial for UartLite<'_, R> {
    fn try_write_byte(&mut self, byte: u8) -> Result<(), SerialError> {
        let dev = self.device.as_mut().ok_or(SerialError::NotReady)?;
        if read_status(&dev.bus).contains(Status::TX_FULL) {
            return Err(SerialError::WouldBlock);
        }
        dev.bus.write(TX_FIFO_OFFSET, byte as u32);
        self.stats.record_transmitted(1);
        Ok(())
    }

    fn try_read_byte(&mut self) -> Result<u8, SerialError> {
        self.try_read_byte_with_status().map(|(byte, _)| byte)
    }
}
