/// Completion callback for interrupt-driven transfers.
///
/// Runs in interrupt context. `byte_count` is the number of bytes moved
/// for the finished request; the receive side also reports `0` when data
/// arrives with no receive buffer installed.
pub trait TransferHandler {
    fn on_complete(&mut self, byte_count: usize);
}

impl<F: FnMut(usize)> TransferHandler for F {
    fn on_complete(&mut self, byte_count: usize) {
        self(byte_count)
    }
}
