//! Progress tracking for interrupt-driven transfers.

/// A caller-owned buffer moving through the FIFO.
///
/// `requested` is the buffer length. `remaining` only shrinks and hits
/// zero exactly when the transfer is done.
pub(crate) struct TransferCursor<B> {
    buf: B,
    remaining: usize,
}

impl<B: AsRef<[u8]>> TransferCursor<B> {
    pub(crate) fn new(buf: B) -> Self {
        let remaining = buf.as_ref().len();
        Self { buf, remaining }
    }

    pub(crate) fn requested(&self) -> usize {
        self.buf.as_ref().len()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.remaining
    }

    pub(crate) fn transferred(&self) -> usize {
        self.requested() - self.remaining
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Bytes not yet handed to the hardware.
    pub(crate) fn pending(&self) -> &[u8] {
        &self.buf.as_ref()[self.transferred()..]
    }

    pub(crate) fn advance(&mut self, count: usize) {
        debug_assert!(count <= self.remaining);
        self.remaining = self.remaining.saturating_sub(count);
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> TransferCursor<B> {
    /// Space not yet filled from the hardware.
    pub(crate) fn unfilled_mut(&mut self) -> &mut [u8] {
        let start = self.transferred();
        &mut self.buf.as_mut()[start..]
    }
}

impl<'a> TransferCursor<&'a mut [u8]> {
    /// Give the buffer back, trimmed to the bytes actually received.
    pub(crate) fn into_filled(self) -> &'a mut [u8] {
        let filled = self.transferred();
        let TransferCursor { buf, .. } = self;
        &mut buf[..filled]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_cursor_walks_the_buffer() {
        let data = [1u8, 2, 3, 4, 5];
        let mut cursor = TransferCursor::new(&data[..]);
        assert_eq!(cursor.requested(), 5);
        assert_eq!(cursor.pending(), &[1, 2, 3, 4, 5]);

        cursor.advance(2);
        assert_eq!(cursor.remaining(), 3);
        assert_eq!(cursor.pending(), &[3, 4, 5]);
        assert!(!cursor.is_complete());

        cursor.advance(3);
        assert!(cursor.is_complete());
        assert!(cursor.pending().is_empty());
        assert_eq!(cursor.transferred(), 5);
    }

    #[test]
    fn recv_cursor_fills_and_returns_filled_prefix() {
        let mut storage = [0u8; 4];
        let mut cursor = TransferCursor::new(&mut storage[..]);

        cursor.unfilled_mut()[..2].copy_from_slice(b"hi");
        cursor.advance(2);
        assert_eq!(cursor.unfilled_mut().len(), 2);

        let filled = cursor.into_filled();
        assert_eq!(filled, b"hi");
    }

    #[test]
    fn empty_buffer_starts_complete() {
        let cursor = TransferCursor::new(&[0u8; 0][..]);
        assert!(cursor.is_complete());
        assert_eq!(cursor.requested(), 0);
    }
}
