//! Register-level model of a UART Lite used by the unit tests.
//!
//! The model keeps both FIFOs at their hardware depth. Nothing leaves the
//! transmit FIFO until the test drains it, unless `auto_drain` is set.

use std::collections::VecDeque;
use std::sync::Arc;
use std::vec::Vec;

use spin::Mutex;

use crate::hal::register::RegisterBus;
use crate::hw::uartlite::{
    CONTROL_REG_OFFSET, Control, FIFO_DEPTH, RX_FIFO_OFFSET, RxErrors, STATUS_REG_OFFSET, Status,
    TX_FIFO_OFFSET,
};

pub(crate) const SIM_BASE: usize = 0x4060_0000;

#[derive(Default)]
struct SimState {
    rx: VecDeque<(u8, RxErrors)>,
    tx: VecDeque<u8>,
    wire: Vec<u8>,
    intr_enabled: bool,
    auto_drain: bool,
    tx_dropped: usize,
    control_writes: Vec<u32>,
}

/// Handle to a simulated device. Clones share the same registers.
#[derive(Clone)]
pub(crate) struct SimUartLite {
    base: usize,
    state: Arc<Mutex<SimState>>,
}

impl SimUartLite {
    pub(crate) fn new() -> Self {
        Self::at(SIM_BASE)
    }

    pub(crate) fn at(base: usize) -> Self {
        Self {
            base,
            state: Arc::new(Mutex::new(SimState::default())),
        }
    }

    /// Queue bytes from the line. Bytes that do not fit are lost and the
    /// last byte that did fit is flagged as overrun.
    pub(crate) fn push_rx(&self, bytes: &[u8]) {
        for &b in bytes {
            self.push_rx_with_errors(b, RxErrors::empty());
        }
    }

    pub(crate) fn push_rx_with_errors(&self, byte: u8, errors: RxErrors) {
        let mut st = self.state.lock();
        if st.rx.len() == FIFO_DEPTH {
            if let Some(last) = st.rx.back_mut() {
                last.1 |= RxErrors::OVERRUN;
            }
            return;
        }
        st.rx.push_back((byte, errors));
    }

    pub(crate) fn rx_len(&self) -> usize {
        self.state.lock().rx.len()
    }

    pub(crate) fn tx_len(&self) -> usize {
        self.state.lock().tx.len()
    }

    /// Shift up to `count` bytes from the transmit FIFO onto the line.
    pub(crate) fn drain_tx(&self, count: usize) {
        let mut st = self.state.lock();
        for _ in 0..count {
            match st.tx.pop_front() {
                Some(b) => st.wire.push(b),
                None => break,
            }
        }
    }

    pub(crate) fn drain_all_tx(&self) {
        self.drain_tx(usize::MAX);
    }

    /// Everything that has left the transmit FIFO so far.
    pub(crate) fn wire(&self) -> Vec<u8> {
        self.state.lock().wire.clone()
    }

    pub(crate) fn set_auto_drain(&self, on: bool) {
        self.state.lock().auto_drain = on;
    }

    pub(crate) fn intr_enabled(&self) -> bool {
        self.state.lock().intr_enabled
    }

    pub(crate) fn tx_dropped(&self) -> usize {
        self.state.lock().tx_dropped
    }

    pub(crate) fn control_writes(&self) -> Vec<u32> {
        self.state.lock().control_writes.clone()
    }

    fn status(st: &SimState) -> Status {
        let mut status = Status::empty();
        status.set(Status::RX_VALID_DATA, !st.rx.is_empty());
        status.set(Status::RX_FULL, st.rx.len() == FIFO_DEPTH);
        status.set(Status::TX_EMPTY, st.tx.is_empty());
        status.set(Status::TX_FULL, st.tx.len() == FIFO_DEPTH);
        status.set(Status::INTR_ENABLED, st.intr_enabled);
        if let Some(&(_, errors)) = st.rx.front() {
            status.set(Status::OVERRUN_ERROR, errors.contains(RxErrors::OVERRUN));
            status.set(Status::FRAME_ERROR, errors.contains(RxErrors::FRAMING));
            status.set(Status::PARITY_ERROR, errors.contains(RxErrors::PARITY));
        }
        status
    }
}

impl RegisterBus for SimUartLite {
    fn base_address(&self) -> usize {
        self.base
    }

    fn read(&self, offset: usize) -> u32 {
        let mut st = self.state.lock();
        match offset {
            RX_FIFO_OFFSET => st.rx.pop_front().map(|(b, _)| b as u32).unwrap_or(0),
            STATUS_REG_OFFSET => Self::status(&st).bits(),
            _ => 0,
        }
    }

    fn write(&mut self, offset: usize, value: u32) {
        let mut st = self.state.lock();
        match offset {
            TX_FIFO_OFFSET => {
                let byte = value as u8;
                if st.auto_drain {
                    st.wire.push(byte);
                } else if st.tx.len() < FIFO_DEPTH {
                    st.tx.push_back(byte);
                } else {
                    st.tx_dropped += 1;
                }
            }
            CONTROL_REG_OFFSET => {
                st.control_writes.push(value);
                let control = Control::from_bits_truncate(value);
                if control.contains(Control::RESET_TX_FIFO) {
                    st.tx.clear();
                }
                if control.contains(Control::RESET_RX_FIFO) {
                    st.rx.clear();
                }
                st.intr_enabled = control.contains(Control::ENABLE_INTR);
            }
            _ => {}
        }
    }
}

/// Completion counts seen by a handler, shareable with the test body.
#[derive(Clone, Default)]
pub(crate) struct CompletionLog(Arc<Mutex<Vec<usize>>>);

impl CompletionLog {
    pub(crate) fn handler(&self) -> impl FnMut(usize) + Send + use<> {
        let log = self.0.clone();
        move |count| log.lock().push(count)
    }

    pub(crate) fn calls(&self) -> Vec<usize> {
        self.0.lock().clone()
    }
}
