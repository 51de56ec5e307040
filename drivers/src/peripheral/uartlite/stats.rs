use crate::hw::uartlite::RxErrors;

/// Driver statistics.
///
/// Counters only grow until [`UartLiteStats::clear`]; they saturate at
/// `u32::MAX` instead of wrapping.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct UartLiteStats {
    /// Number of transmit interrupts serviced.
    pub transmit_interrupts: u32,
    /// Number of receive interrupts serviced.
    pub receive_interrupts: u32,
    /// Number of characters written to the transmit FIFO.
    pub characters_transmitted: u32,
    /// Number of characters read from the receive FIFO.
    pub characters_received: u32,
    /// Number of received characters flagged with an overrun.
    pub receive_overrun_errors: u32,
    /// Number of received characters flagged with a parity error.
    pub receive_parity_errors: u32,
    /// Number of received characters flagged with a framing error.
    pub receive_framing_errors: u32,
}

fn bump(counter: &mut u32, by: usize) {
    let by = u32::try_from(by).unwrap_or(u32::MAX);
    *counter = counter.saturating_add(by);
}

impl UartLiteStats {
    pub const fn new() -> Self {
        Self {
            transmit_interrupts: 0,
            receive_interrupts: 0,
            characters_transmitted: 0,
            characters_received: 0,
            receive_overrun_errors: 0,
            receive_parity_errors: 0,
            receive_framing_errors: 0,
        }
    }

    /// Reset every counter to zero.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Sum of all receive error counters.
    pub fn receive_errors(&self) -> u32 {
        self.receive_overrun_errors
            .saturating_add(self.receive_parity_errors)
            .saturating_add(self.receive_framing_errors)
    }

    pub(crate) fn record_transmitted(&mut self, count: usize) {
        bump(&mut self.characters_transmitted, count);
    }

    pub(crate) fn record_received(&mut self, count: usize) {
        bump(&mut self.characters_received, count);
    }

    pub(crate) fn record_rx_errors(&mut self, errors: RxErrors) {
        if errors.contains(RxErrors::OVERRUN) {
            bump(&mut self.receive_overrun_errors, 1);
        }
        if errors.contains(RxErrors::PARITY) {
            bump(&mut self.receive_parity_errors, 1);
        }
        if errors.contains(RxErrors::FRAMING) {
            bump(&mut self.receive_framing_errors, 1);
        }
    }

    pub(crate) fn record_transmit_interrupt(&mut self) {
        bump(&mut self.transmit_interrupts, 1);
    }

    pub(crate) fn record_receive_interrupt(&mut self) {
        bump(&mut self.receive_interrupts, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_classes_are_counted_independently() {
        let mut stats = UartLiteStats::new();
        stats.record_rx_errors(RxErrors::OVERRUN);
        stats.record_rx_errors(RxErrors::PARITY | RxErrors::FRAMING);
        stats.record_rx_errors(RxErrors::empty());

        assert_eq!(stats.receive_overrun_errors, 1);
        assert_eq!(stats.receive_parity_errors, 1);
        assert_eq!(stats.receive_framing_errors, 1);
        assert_eq!(stats.receive_errors(), 3);
    }

    #[test]
    fn counters_saturate() {
        let mut stats = UartLiteStats {
            characters_received: u32::MAX - 1,
            ..UartLiteStats::new()
        };
        stats.record_received(5);
        assert_eq!(stats.characters_received, u32::MAX);
        stats.record_received(usize::MAX);
        assert_eq!(stats.characters_received, u32::MAX);
    }

    #[test]
    fn clear_zeroes_everything() {
        let mut stats = UartLiteStats::new();
        stats.record_transmitted(4);
        stats.record_transmit_interrupt();
        stats.record_receive_interrupt();
        stats.clear();
        assert_eq!(stats, UartLiteStats::default());
    }
}
