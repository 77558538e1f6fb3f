//! Per-worker packet buffer

use bytes::BytesMut;

/// Growable byte region a worker builds every packet into.
///
/// Capacity is a high-water mark: it grows to the largest packet requested so
/// far and never shrinks, so steady-state iterations do not allocate. Each
/// [`grant`](PacketBuffer::grant) hands out a zeroed region of exactly the
/// requested size.
#[derive(Debug, Default)]
pub struct PacketBuffer {
    buf: BytesMut,
    len: usize,
}

impl PacketBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = BytesMut::with_capacity(capacity);
        buf.resize(capacity, 0);
        Self { buf, len: 0 }
    }

    /// Ensure at least `size` bytes are available and return them zeroed.
    pub fn grant(&mut self, size: usize) -> &mut [u8] {
        if size > self.buf.len() {
            self.buf.resize(size, 0);
        }
        self.len = size;
        let region = &mut self.buf[..size];
        region.fill(0);
        region
    }

    /// Largest size granted so far
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Size of the current packet
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The current packet
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.buf[..self.len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_exact_size() {
        let mut buffer = PacketBuffer::new();
        assert_eq!(buffer.grant(40).len(), 40);
        assert_eq!(buffer.len(), 40);
        assert_eq!(buffer.as_slice().len(), 40);
    }

    #[test]
    fn test_capacity_never_shrinks() {
        let mut buffer = PacketBuffer::new();
        buffer.grant(100);
        assert_eq!(buffer.capacity(), 100);
        buffer.grant(28);
        assert_eq!(buffer.capacity(), 100);
        assert_eq!(buffer.len(), 28);
        buffer.grant(180);
        assert_eq!(buffer.capacity(), 180);
    }

    #[test]
    fn test_grant_zeroes_previous_contents() {
        let mut buffer = PacketBuffer::with_capacity(16);
        buffer.grant(16).fill(0xAA);
        assert!(buffer.grant(8).iter().all(|b| *b == 0));
    }
}
