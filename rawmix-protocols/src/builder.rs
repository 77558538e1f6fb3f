//! Shared builder contract
//!
//! A builder sizes its packet, asks [`prepare`] for a region with the outer IP
//! header (and GRE prefix) already written, fills in its own headers through
//! [`Frame::writer`], stores its checksum(s) last and hands the byte count
//! back through [`Frame::finish`]. Builders never fail and never do I/O.

use rawmix_core::config::Config;
use rawmix_core::random::random;
use rawmix_packet::checksum::{internet_checksum, transport_checksum};
use rawmix_packet::gre::{self, gre_header_size};
use rawmix_packet::{IpProtocol, Ipv4Header, PacketBuffer, PacketWriter, IPV4_HEADER_LEN};
use std::net::Ipv4Addr;

/// Entry point every protocol module exposes
pub type BuildFn = fn(&BuildContext<'_>, &mut PacketBuffer) -> usize;

/// Everything a builder needs for one packet.
///
/// The active protocol travels here instead of being written into the shared
/// [`Config`], so workers in mixed mode never race on it.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub config: &'a Config,
    pub protocol: IpProtocol,
    pub destination: Ipv4Addr,
}

impl<'a> BuildContext<'a> {
    pub fn new(config: &'a Config, protocol: IpProtocol, destination: Ipv4Addr) -> Self {
        Self {
            config,
            protocol,
            destination,
        }
    }
}

/// A granted packet with its IP (and GRE) prefix in place
pub struct Frame<'b> {
    bytes: &'b mut [u8],
    /// Start of the protocol header
    offset: usize,
    /// Pseudo-header addresses: the inner header's when encapsulated
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
}

/// Grant `IP + GRE + header_len` bytes and lay down the delivery headers.
pub fn prepare<'b>(ctx: &BuildContext<'_>, buffer: &'b mut PacketBuffer, header_len: usize) -> Frame<'b> {
    let config = ctx.config;
    let gre_len = gre_header_size(config.gre.flags, config.encapsulated);
    let total = IPV4_HEADER_LEN + gre_len + header_len;
    let bytes = buffer.grant(total);

    let outer_protocol = if config.encapsulated {
        IpProtocol::GRE
    } else {
        ctx.protocol
    };
    let mut outer = Ipv4Header::from_options(&config.ip, outer_protocol, ctx.destination, total);
    outer.write(bytes, config.bogus_checksum);

    let inner = gre::encapsulate(
        bytes,
        config,
        &outer,
        ctx.protocol,
        IPV4_HEADER_LEN + header_len,
    );
    let (source, destination) = match inner {
        Some(inner) => (inner.source, inner.destination),
        None => (outer.source, outer.destination),
    };

    Frame {
        bytes,
        offset: IPV4_HEADER_LEN + gre_len,
        source,
        destination,
    }
}

impl<'b> Frame<'b> {
    /// Cursor positioned at the start of the protocol header
    pub fn writer(&mut self) -> PacketWriter<'_> {
        PacketWriter::at(self.bytes, self.offset)
    }

    /// Cursor positioned `skip` bytes into the protocol header
    pub fn writer_at(&mut self, skip: usize) -> PacketWriter<'_> {
        PacketWriter::at(self.bytes, self.offset + skip)
    }

    /// Protocol header and everything after it
    pub fn payload(&self) -> &[u8] {
        &self.bytes[self.offset..]
    }

    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[self.offset..]
    }

    /// Store `value` at `at` bytes into the protocol header
    pub fn set_u16(&mut self, at: usize, value: u16) {
        let at = self.offset + at;
        self.bytes[at..at + 2].copy_from_slice(&value.to_be_bytes());
    }

    /// Internet checksum over the whole protocol payload, stored at `at`.
    pub fn checksum(&mut self, config: &Config, at: usize) {
        let value = if config.bogus_checksum {
            random()
        } else {
            internet_checksum(self.payload())
        };
        self.set_u16(at, value);
    }

    /// Pseudo-header checksum (TCP, UDP, DCCP), stored at `at`.
    pub fn transport_checksum(&mut self, ctx: &BuildContext<'_>, at: usize) {
        let value = if ctx.config.bogus_checksum {
            random()
        } else {
            transport_checksum(
                self.source,
                self.destination,
                ctx.protocol.to_u8(),
                self.payload(),
            )
        };
        self.set_u16(at, value);
    }

    /// Run the GRE checksum pass and return the number of bytes to send.
    pub fn finish(self, config: &Config) -> usize {
        gre::finalize_checksum(self.bytes, config);
        self.bytes.len()
    }
}
