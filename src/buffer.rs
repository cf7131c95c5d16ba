use crate::Error;

/// a bounded first in first out byte channel which fields serialize into and deserialize from.
///
/// bytes are pushed at the write end and popped from the read end in the order they were written.
pub trait Buffer {
    /// appends a byte to the buffer. returns `false` and leaves the buffer unchanged if it is full.
    fn push(&mut self, byte: u8) -> bool;

    /// removes the oldest byte from the buffer, or returns `None` if there are no bytes left to read.
    fn pop(&mut self) -> Option<u8>;

    /// the amount of bytes currently held in the buffer.
    fn size(&self) -> usize;

    /// the total capacity of the buffer.
    fn max_size(&self) -> usize;

    /// the amount of bytes that can still be pushed before the buffer is full.
    ///
    /// buffers which can't reuse the room of bytes that were already popped should override this.
    fn remaining(&self) -> usize {
        self.max_size() - self.size()
    }
}

impl<B: Buffer + ?Sized> Buffer for &mut B {
    fn push(&mut self, byte: u8) -> bool {
        (**self).push(byte)
    }

    fn pop(&mut self) -> Option<u8> {
        (**self).pop()
    }

    fn size(&self) -> usize {
        (**self).size()
    }

    fn max_size(&self) -> usize {
        (**self).max_size()
    }

    fn remaining(&self) -> usize {
        (**self).remaining()
    }
}

/// a buffer which stores up to `N` bytes inline, without any heap allocations.
///
/// # Example
/// ```
/// use stackproto::{ArrayBuffer, Buffer};
///
/// let mut buf = ArrayBuffer::<4>::new();
/// assert!(buf.push(1));
/// assert!(buf.push(2));
/// assert_eq!(buf.pop(), Some(1));
/// assert_eq!(buf.as_slice(), &[2]);
/// ```
#[derive(Debug, Clone)]
pub struct ArrayBuffer<const N: usize> {
    data: [u8; N],
    read_pos: usize,
    write_pos: usize,
}

impl<const N: usize> ArrayBuffer<N> {
    /// creates a new empty buffer.
    pub const fn new() -> Self {
        Self {
            data: [0; N],
            read_pos: 0,
            write_pos: 0,
        }
    }

    /// creates a buffer holding a copy of the given bytes, ready to be deserialized from.
    ///
    /// # Errors
    ///
    /// returns [`Error::BufferTooSmall`] if `bytes` does not fit in `N` bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() > N {
            return Err(Error::BufferTooSmall);
        }
        let mut buf = Self::new();
        buf.data[..bytes.len()].copy_from_slice(bytes);
        buf.write_pos = bytes.len();
        Ok(buf)
    }

    /// returns the bytes which were written but not yet read.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[self.read_pos..self.write_pos]
    }

    /// discards all the bytes held in the buffer.
    pub fn clear(&mut self) {
        self.read_pos = 0;
        self.write_pos = 0;
    }

    /// returns `true` if there are no bytes left to read.
    pub fn is_empty(&self) -> bool {
        self.read_pos == self.write_pos
    }
}

impl<const N: usize> Default for ArrayBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Buffer for ArrayBuffer<N> {
    fn push(&mut self, byte: u8) -> bool {
        if self.write_pos == N {
            return false;
        }
        self.data[self.write_pos] = byte;
        self.write_pos += 1;
        true
    }

    fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let byte = self.data[self.read_pos];
        self.read_pos += 1;

        // once everything was read the storage can be reused from the start.
        if self.is_empty() {
            self.clear();
        }
        Some(byte)
    }

    fn size(&self) -> usize {
        self.write_pos - self.read_pos
    }

    fn max_size(&self) -> usize {
        N
    }

    fn remaining(&self) -> usize {
        N - self.write_pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_stops_at_capacity() {
        let mut buf = ArrayBuffer::<2>::new();
        assert!(buf.push(0xaa));
        assert!(buf.push(0xbb));
        assert!(!buf.push(0xcc));
        assert_eq!(buf.size(), 2);
        assert_eq!(buf.remaining(), 0);
        assert_eq!(buf.as_slice(), &[0xaa, 0xbb]);
    }

    #[test]
    fn pop_is_fifo() {
        let mut buf = ArrayBuffer::<3>::from_slice(&[1, 2, 3]).unwrap();
        assert_eq!(buf.pop(), Some(1));
        assert_eq!(buf.pop(), Some(2));
        assert_eq!(buf.size(), 1);
        assert_eq!(buf.pop(), Some(3));
        assert_eq!(buf.pop(), None);
        assert!(buf.is_empty());
    }

    #[test]
    fn capacity_is_reused_after_draining() {
        let mut buf = ArrayBuffer::<2>::new();
        assert!(buf.push(1));
        assert!(buf.push(2));
        assert_eq!(buf.pop(), Some(1));
        // one byte consumed but not drained, the slot is not free yet.
        assert_eq!(buf.remaining(), 0);
        assert!(!buf.push(3));
        assert_eq!(buf.pop(), Some(2));
        assert_eq!(buf.remaining(), 2);
        assert!(buf.push(3));
        assert_eq!(buf.as_slice(), &[3]);
    }

    #[test]
    fn from_slice_rejects_oversized_input() {
        assert_eq!(
            ArrayBuffer::<2>::from_slice(&[1, 2, 3]).unwrap_err(),
            Error::BufferTooSmall
        );
    }

    #[test]
    fn works_through_mutable_reference() {
        fn fill(mut buf: impl Buffer) {
            while buf.push(7) {}
        }
        let mut buf = ArrayBuffer::<3>::new();
        fill(&mut buf);
        assert_eq!(buf.as_slice(), &[7, 7, 7]);
    }
}
