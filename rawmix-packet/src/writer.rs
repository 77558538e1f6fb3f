//! Cursor over a granted packet region
//!
//! Writes are big-endian and advance the cursor. Writing past the end of the
//! region panics: a builder that sized its packet wrong is a bug, not a
//! runtime condition.

use bytes::BufMut;
use rawmix_core::random::fill_random;
use std::net::Ipv4Addr;

pub struct PacketWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> PacketWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Start writing at `pos` instead of the beginning
    pub fn at(buf: &'a mut [u8], pos: usize) -> Self {
        assert!(pos <= buf.len(), "cursor outside packet");
        Self { buf, pos }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn tail(&mut self) -> &mut [u8] {
        &mut self.buf[self.pos..]
    }

    pub fn put_u8(&mut self, value: u8) -> &mut Self {
        self.tail().put_u8(value);
        self.pos += 1;
        self
    }

    pub fn put_u16(&mut self, value: u16) -> &mut Self {
        self.tail().put_u16(value);
        self.pos += 2;
        self
    }

    /// Low 24 bits of `value`
    pub fn put_u24(&mut self, value: u32) -> &mut Self {
        self.tail().put_uint(u64::from(value & 0x00FF_FFFF), 3);
        self.pos += 3;
        self
    }

    pub fn put_u32(&mut self, value: u32) -> &mut Self {
        self.tail().put_u32(value);
        self.pos += 4;
        self
    }

    /// Low 48 bits of `value`
    pub fn put_u48(&mut self, value: u64) -> &mut Self {
        self.tail().put_uint(value & 0xFFFF_FFFF_FFFF, 6);
        self.pos += 6;
        self
    }

    pub fn put_addr(&mut self, addr: Ipv4Addr) -> &mut Self {
        self.put_slice(&addr.octets())
    }

    pub fn put_slice(&mut self, bytes: &[u8]) -> &mut Self {
        self.tail().put_slice(bytes);
        self.pos += bytes.len();
        self
    }

    pub fn put_zeros(&mut self, count: usize) -> &mut Self {
        self.tail()[..count].fill(0);
        self.pos += count;
        self
    }

    /// Opaque random bytes (digests, ICVs, payload)
    pub fn put_random(&mut self, count: usize) -> &mut Self {
        fill_random(&mut self.tail()[..count]);
        self.pos += count;
        self
    }

    /// Overwrite a 16-bit field written earlier, leaving the cursor alone.
    pub fn patch_u16(&mut self, at: usize, value: u16) {
        self.buf[at..at + 2].copy_from_slice(&value.to_be_bytes());
    }

    /// Bytes written between `start` and the cursor
    pub fn written_since(&self, start: usize) -> &[u8] {
        &self.buf[start..self.pos]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian_writes() {
        let mut buf = [0u8; 20];
        let mut writer = PacketWriter::new(&mut buf);
        writer
            .put_u8(0x01)
            .put_u16(0x0203)
            .put_u24(0xAA040506)
            .put_u32(0x0708090a)
            .put_u48(0xFFFF_0b0c_0d0e_0f10);
        assert_eq!(writer.position(), 16);
        writer.put_addr(Ipv4Addr::new(192, 0, 2, 1));
        assert_eq!(writer.remaining(), 0);
        assert_eq!(
            buf,
            [
                0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
                0x0e, 0x0f, 0x10, 192, 0, 2, 1
            ]
        );
    }

    #[test]
    fn test_patch_and_written_since() {
        let mut buf = [0u8; 6];
        let mut writer = PacketWriter::at(&mut buf, 2);
        writer.put_u16(0).put_u16(0xBEEF);
        writer.patch_u16(2, 0x1234);
        assert_eq!(writer.written_since(2), &[0x12, 0x34, 0xBE, 0xEF]);
    }

    #[test]
    #[should_panic]
    fn test_overflow_panics() {
        let mut buf = [0u8; 3];
        PacketWriter::new(&mut buf).put_u32(1);
    }
}
