//! TCP Segment Construction

use super::options::{options_len, write_options};
use crate::builder::{prepare, BuildContext};
use rawmix_core::random::randomize_if_unset;
use rawmix_packet::PacketBuffer;

pub const TCP_HEADER_LEN: usize = 20;

/// Largest value the 4-bit data offset can hold
const MAX_DATA_OFFSET: usize = 15;

pub fn build(ctx: &BuildContext<'_>, buffer: &mut PacketBuffer) -> usize {
    let config = ctx.config;
    let tcp = &config.tcp;
    let optlen = options_len(tcp);

    let data_offset = if tcp.data_offset != 0 {
        tcp.data_offset & 0x0F
    } else {
        ((TCP_HEADER_LEN + optlen) / 4).min(MAX_DATA_OFFSET) as u8
    };
    let acknowledge = if tcp.flags.ack {
        randomize_if_unset(tcp.acknowledge)
    } else {
        tcp.acknowledge
    };
    let urgent_pointer = if tcp.flags.urg {
        randomize_if_unset(tcp.urgent_pointer)
    } else {
        tcp.urgent_pointer
    };

    let mut frame = prepare(ctx, buffer, TCP_HEADER_LEN + optlen);
    let mut writer = frame.writer();
    writer
        .put_u16(randomize_if_unset(config.source_port))
        .put_u16(randomize_if_unset(config.dest_port))
        .put_u32(randomize_if_unset(tcp.sequence))
        .put_u32(acknowledge)
        .put_u8(data_offset << 4)
        .put_u8(tcp.flags.to_u8())
        .put_u16(randomize_if_unset(tcp.window))
        .put_u16(0)
        .put_u16(urgent_pointer);
    write_options(&mut writer, tcp);

    frame.transport_checksum(ctx, 16);
    frame.finish(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::testing::*;
    use rawmix_core::config::{GreFlags, TcpOptionSet};
    use rawmix_packet::IpProtocol;
    use std::net::Ipv4Addr;

    #[test]
    fn test_syn_segment() {
        let mut config = config();
        config.source_port = 1234;
        config.dest_port = 80;
        config.tcp.flags.syn = true;
        config.tcp.sequence = 0x01020304;

        let packet = build_checked(build, &config, IpProtocol::TCP);
        assert_eq!(packet.len(), 40);
        let tcp = body(&packet);
        assert_eq!(word(tcp, 0), 1234);
        assert_eq!(word(tcp, 2), 80);
        assert_eq!(dword(tcp, 4), 0x01020304);
        assert_eq!(dword(tcp, 8), 0);
        assert_eq!(tcp[12], 5 << 4);
        assert_eq!(tcp[13], 0x02);
        assert_eq!(word(tcp, 18), 0);
        assert!(transport_ok(&packet, 6));
    }

    #[test]
    fn test_options_extend_data_offset() {
        let mut config = config();
        config.tcp.options.insert(TcpOptionSet::MSS);
        config.tcp.options.insert(TcpOptionSet::TSOPT);
        config.tcp.mss = 1460;

        let packet = build_checked(build, &config, IpProtocol::TCP);
        let tcp = body(&packet);
        assert_eq!(tcp.len(), 20 + 16);
        assert_eq!(tcp[12] >> 4, 9);
        assert_eq!(&tcp[20..24], &[2, 4, 0x05, 0xB4]);
        assert_eq!(tcp[24], 8);
        // EOL padding
        assert_eq!(&tcp[34..36], &[0, 0]);
        assert!(transport_ok(&packet, 6));
    }

    #[test]
    fn test_data_offset_override() {
        let mut config = config();
        config.tcp.data_offset = 12;
        let packet = build_checked(build, &config, IpProtocol::TCP);
        assert_eq!(body(&packet)[12] >> 4, 12);
        assert_eq!(packet.len(), 40);
    }

    #[test]
    fn test_encapsulated_checksum_uses_inner_addresses() {
        let mut config = config();
        config.encapsulated = true;
        config.gre.flags = GreFlags::empty();
        config.gre.source = Ipv4Addr::new(172, 16, 1, 1);
        config.gre.destination = Ipv4Addr::new(172, 16, 1, 2);

        let packet = build_checked(build, &config, IpProtocol::TCP);
        // outer(20) + gre(4) + inner(20)
        let inner = &packet[24..];
        let segment = &inner[20..];
        let sum = rawmix_packet::transport_checksum(
            Ipv4Addr::new(172, 16, 1, 1),
            Ipv4Addr::new(172, 16, 1, 2),
            6,
            segment,
        );
        assert!(sum == 0 || sum == 0xFFFF);
    }
}
