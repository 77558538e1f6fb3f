//! IPv4 header construction
//!
//! Every generated packet starts with a hand-built 20-byte IPv4 header (the
//! socket is opened with `IP_HDRINCL`). When GRE encapsulation is active a
//! second header is derived from the outer one.

use crate::checksum::internet_checksum;
use crate::writer::PacketWriter;
use rawmix_core::config::IpOptions;
use rawmix_core::random::{random, randomize_addr_if_unset, randomize_if_unset};
use std::net::Ipv4Addr;

/// Size of an IPv4 header without options
pub const IPV4_HEADER_LEN: usize = 20;

/// Don't Fragment
pub const IP_DF: u16 = 0x4000;
/// More Fragments
pub const IP_MF: u16 = 0x2000;

/// IP Protocol numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpProtocol {
    /// ICMP (1)
    ICMP,
    /// IGMP (2)
    IGMP,
    /// TCP (6)
    TCP,
    /// EGP (8)
    EGP,
    /// UDP (17)
    UDP,
    /// DCCP (33)
    DCCP,
    /// RSVP (46)
    RSVP,
    /// GRE (47)
    GRE,
    /// ESP (50)
    ESP,
    /// AH (51)
    AH,
    /// EIGRP (88)
    EIGRP,
    /// OSPF (89)
    OSPF,
    /// Custom protocol number
    Custom(u8),
}

impl IpProtocol {
    pub fn to_u8(self) -> u8 {
        match self {
            IpProtocol::ICMP => 1,
            IpProtocol::IGMP => 2,
            IpProtocol::TCP => 6,
            IpProtocol::EGP => 8,
            IpProtocol::UDP => 17,
            IpProtocol::DCCP => 33,
            IpProtocol::RSVP => 46,
            IpProtocol::GRE => 47,
            IpProtocol::ESP => 50,
            IpProtocol::AH => 51,
            IpProtocol::EIGRP => 88,
            IpProtocol::OSPF => 89,
            IpProtocol::Custom(val) => val,
        }
    }

    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => IpProtocol::ICMP,
            2 => IpProtocol::IGMP,
            6 => IpProtocol::TCP,
            8 => IpProtocol::EGP,
            17 => IpProtocol::UDP,
            33 => IpProtocol::DCCP,
            46 => IpProtocol::RSVP,
            47 => IpProtocol::GRE,
            50 => IpProtocol::ESP,
            51 => IpProtocol::AH,
            88 => IpProtocol::EIGRP,
            89 => IpProtocol::OSPF,
            val => IpProtocol::Custom(val),
        }
    }
}

/// A resolved IPv4 header, every random field already drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4Header {
    pub tos: u8,
    pub total_length: u16,
    pub identification: u16,
    /// Flags and fragment offset as they appear on the wire
    pub fragment: u16,
    pub ttl: u8,
    pub protocol: IpProtocol,
    pub checksum: u16,
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
}

impl Ipv4Header {
    /// Resolve the configured header for one packet.
    pub fn from_options(
        ip: &IpOptions,
        protocol: IpProtocol,
        destination: Ipv4Addr,
        total_length: usize,
    ) -> Self {
        Self {
            tos: ip.tos,
            total_length: total_length as u16,
            identification: randomize_if_unset(ip.id),
            fragment: fragment_field(ip.frag_offset),
            ttl: ip.ttl,
            protocol,
            checksum: 0,
            source: randomize_addr_if_unset(ip.source),
            destination,
        }
    }

    /// Serialize into the first 20 bytes of `out`, filling in the checksum
    /// (or a random value when `bogus` is set).
    pub fn write(&mut self, out: &mut [u8], bogus: bool) {
        let header = &mut out[..IPV4_HEADER_LEN];
        let mut writer = PacketWriter::new(header);
        writer
            .put_u8(0x45)
            .put_u8(self.tos)
            .put_u16(self.total_length)
            .put_u16(self.identification)
            .put_u16(self.fragment)
            .put_u8(self.ttl)
            .put_u8(self.protocol.to_u8())
            .put_u16(0)
            .put_addr(self.source)
            .put_addr(self.destination);

        self.checksum = if bogus {
            random()
        } else {
            internet_checksum(header)
        };
        header[10..12].copy_from_slice(&self.checksum.to_be_bytes());
    }

    /// Read back a header written by [`write`](Self::write)
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < IPV4_HEADER_LEN || data[0] != 0x45 {
            return None;
        }
        let word = |at: usize| u16::from_be_bytes([data[at], data[at + 1]]);
        Some(Self {
            tos: data[1],
            total_length: word(2),
            identification: word(4),
            fragment: word(6),
            ttl: data[8],
            protocol: IpProtocol::from_u8(data[9]),
            checksum: word(10),
            source: Ipv4Addr::new(data[12], data[13], data[14], data[15]),
            destination: Ipv4Addr::new(data[16], data[17], data[18], data[19]),
        })
    }
}

/// Non-zero offsets are sent as fragments (offset in 8-byte units, MF set);
/// zero sends an unfragmented datagram with DF set.
pub fn fragment_field(frag_offset: u16) -> u16 {
    if frag_offset != 0 {
        (frag_offset >> 3) | IP_MF
    } else {
        IP_DF
    }
}
