//! GRE encapsulation layer (RFC 1701/1702)
//!
//! With encapsulation on, every packet is laid out as
//! `outer IPv4 | GRE base | [checksum] [key] [sequence] | inner IPv4 | payload`.
//! The inner header copies the outer one; the GRE checksum, when present, is
//! filled in last by [`finalize_checksum`] once the payload is complete.

use crate::checksum::internet_checksum;
use crate::ip::{IpProtocol, Ipv4Header, IPV4_HEADER_LEN};
use crate::writer::PacketWriter;
use rawmix_core::config::{Config, GreFlags};
use rawmix_core::random::{random, randomize_if_unset};

/// Flags, version and protocol type
pub const GRE_BASE_LEN: usize = 4;
/// Each optional word (checksum+offset, key, sequence)
pub const GRE_OPTION_LEN: usize = 4;
/// Protocol type for an IPv4 payload
pub const GRE_PROTO_IPV4: u16 = 0x0800;

const GRE_FLAG_C: u8 = 0x80;
const GRE_FLAG_K: u8 = 0x20;
const GRE_FLAG_S: u8 = 0x10;

/// Bytes the GRE prefix (including the inner IPv4 header) adds after the
/// outer IP header. Zero when encapsulation is off.
pub fn gre_header_size(flags: GreFlags, enabled: bool) -> usize {
    if !enabled {
        return 0;
    }
    GRE_BASE_LEN + GRE_OPTION_LEN * flags.count() + IPV4_HEADER_LEN
}

/// Write the GRE header and the inner IPv4 header right after `outer`.
///
/// `inner_total_length` is the inner datagram size (inner header plus
/// payload). Returns the inner header, whose addresses the caller uses for
/// pseudo-header checksums, or `None` when encapsulation is off.
pub fn encapsulate(
    packet: &mut [u8],
    config: &Config,
    outer: &Ipv4Header,
    protocol: IpProtocol,
    inner_total_length: usize,
) -> Option<Ipv4Header> {
    if !config.encapsulated {
        return None;
    }

    let gre = &config.gre;
    let mut first = 0u8;
    if gre.flags.contains(GreFlags::CHECKSUM) {
        first |= GRE_FLAG_C;
    }
    if gre.flags.contains(GreFlags::KEY) {
        first |= GRE_FLAG_K;
    }
    if gre.flags.contains(GreFlags::SEQUENCE) {
        first |= GRE_FLAG_S;
    }

    let mut writer = PacketWriter::at(packet, IPV4_HEADER_LEN);
    // routing, strict route, recursion and version are all zero
    writer.put_u8(first).put_u8(0).put_u16(GRE_PROTO_IPV4);
    if gre.flags.contains(GreFlags::CHECKSUM) {
        writer.put_u16(0).put_u16(0);
    }
    if gre.flags.contains(GreFlags::KEY) {
        writer.put_u32(randomize_if_unset(gre.key));
    }
    if gre.flags.contains(GreFlags::SEQUENCE) {
        writer.put_u32(randomize_if_unset(gre.sequence));
    }
    let inner_at = writer.position();

    let mut inner = Ipv4Header {
        tos: outer.tos,
        total_length: inner_total_length as u16,
        identification: outer.identification,
        fragment: outer.fragment,
        ttl: outer.ttl,
        protocol,
        checksum: 0,
        source: if gre.source.is_unspecified() {
            outer.source
        } else {
            gre.source
        },
        destination: if gre.destination.is_unspecified() {
            outer.destination
        } else {
            gre.destination
        },
    };
    inner.write(&mut packet[inner_at..], config.bogus_checksum);

    Some(inner)
}

/// Fill the deferred GRE checksum over the GRE header and everything after
/// it. No-op unless encapsulation and the checksum option are both on.
pub fn finalize_checksum(packet: &mut [u8], config: &Config) {
    if !config.encapsulated || !config.gre.flags.contains(GreFlags::CHECKSUM) {
        return;
    }

    let checksum = if config.bogus_checksum {
        random()
    } else {
        internet_checksum(&packet[IPV4_HEADER_LEN..])
    };
    let at = IPV4_HEADER_LEN + GRE_BASE_LEN;
    packet[at..at + 2].copy_from_slice(&checksum.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::validate_checksum;
    use rawmix_core::config::IpOptions;
    use std::net::Ipv4Addr;

    fn outer(total: usize) -> Ipv4Header {
        let options = IpOptions {
            source: Ipv4Addr::new(10, 1, 1, 1),
            id: 0x4242,
            ..IpOptions::default()
        };
        Ipv4Header::from_options(&options, IpProtocol::GRE, Ipv4Addr::new(10, 2, 2, 2), total)
    }

    #[test]
    fn test_header_size() {
        let mut flags = GreFlags::empty();
        assert_eq!(gre_header_size(flags, false), 0);
        assert_eq!(gre_header_size(flags, true), 24);
        flags.insert(GreFlags::KEY);
        assert_eq!(gre_header_size(flags, false), 0);
        assert_eq!(gre_header_size(flags, true), 28);
        flags.insert(GreFlags::CHECKSUM);
        flags.insert(GreFlags::SEQUENCE);
        assert_eq!(gre_header_size(flags, true), 36);
    }

    #[test]
    fn test_disabled_writes_nothing() {
        let config = Config::default();
        let mut packet = [0u8; 28];
        assert!(encapsulate(&mut packet, &config, &outer(28), IpProtocol::ICMP, 28).is_none());
        assert!(packet.iter().all(|b| *b == 0));
    }

    #[test]
    fn test_encapsulate_with_all_options() {
        let mut config = Config {
            encapsulated: true,
            ..Config::default()
        };
        config.gre.flags = GreFlags::from_bits(0x07);
        config.gre.key = 0xCAFEBABE;
        config.gre.sequence = 9;
        config.gre.destination = Ipv4Addr::new(192, 0, 2, 7);

        let gre_len = gre_header_size(config.gre.flags, true);
        let total = IPV4_HEADER_LEN + gre_len + 8;
        let mut packet = vec![0u8; total];
        let mut delivery = outer(total);
        delivery.write(&mut packet, false);

        let inner = encapsulate(&mut packet, &config, &delivery, IpProtocol::ICMP, 28).unwrap();
        packet[total - 8..].copy_from_slice(&[8, 0, 0, 0, 0, 1, 0, 1]);
        finalize_checksum(&mut packet, &config);

        assert_eq!(packet[20], 0xB0);
        assert_eq!(packet[21], 0);
        assert_eq!(&packet[22..24], &[0x08, 0x00]);
        assert_eq!(&packet[28..32], &0xCAFEBABEu32.to_be_bytes());
        assert_eq!(&packet[32..36], &9u32.to_be_bytes());

        assert_eq!(inner.source, Ipv4Addr::new(10, 1, 1, 1));
        assert_eq!(inner.destination, Ipv4Addr::new(192, 0, 2, 7));
        assert_eq!(inner.identification, 0x4242);
        assert_eq!(inner.protocol, IpProtocol::ICMP);

        let inner_bytes = &packet[36..56];
        assert_eq!(Ipv4Header::parse(inner_bytes).as_ref(), Some(&inner));
        assert!(validate_checksum(inner_bytes));
        assert!(validate_checksum(&packet[20..]));
    }

    #[test]
    fn test_bogus_checksum_written() {
        let mut config = Config {
            encapsulated: true,
            bogus_checksum: true,
            ..Config::default()
        };
        config.gre.flags.insert(GreFlags::CHECKSUM);

        let total = IPV4_HEADER_LEN + gre_header_size(config.gre.flags, true);
        let mut packet = vec![0u8; total];
        let mut delivery = outer(total);
        delivery.write(&mut packet, true);
        encapsulate(&mut packet, &config, &delivery, IpProtocol::UDP, 20);
        finalize_checksum(&mut packet, &config);

        // the value is random; only its presence matters
        assert_eq!(packet[20] & GRE_FLAG_C, GRE_FLAG_C);
        assert_eq!(packet.len(), 48);
    }
}
