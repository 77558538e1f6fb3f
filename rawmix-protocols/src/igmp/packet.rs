//! IGMP Packet Construction

use crate::builder::{prepare, BuildContext};
use rawmix_core::config::IgmpOptions;
use rawmix_core::random::{randomize_addr_if_unset, randomize_if_unset};
use rawmix_packet::{PacketBuffer, PacketWriter};
use std::net::Ipv4Addr;

pub const IGMP_V1_LEN: usize = 8;
/// Query header without sources
pub const IGMP_V3_QUERY_LEN: usize = 12;
/// Report header plus one group record without sources
pub const IGMP_V3_REPORT_LEN: usize = 16;

/// IGMP Message Types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IgmpType {
    MembershipQuery = 0x11,
    V1MembershipReport = 0x12,
    V2MembershipReport = 0x16,
    LeaveGroup = 0x17,
    V3MembershipReport = 0x22,
}

pub fn build_v1(ctx: &BuildContext<'_>, buffer: &mut PacketBuffer) -> usize {
    let igmp = &ctx.config.igmp;
    let mut frame = prepare(ctx, buffer, IGMP_V1_LEN);

    frame
        .writer()
        .put_u8(igmp.igmp_type)
        .put_u8(igmp.code)
        .put_u16(0)
        .put_addr(randomize_addr_if_unset(igmp.group));

    frame.checksum(ctx.config, 2);
    frame.finish(ctx.config)
}

pub fn build_v3(ctx: &BuildContext<'_>, buffer: &mut PacketBuffer) -> usize {
    let igmp = &ctx.config.igmp;
    let sources = usize::from(igmp.sources);
    let report = igmp.igmp_type == IgmpType::V3MembershipReport as u8;
    let header = if report {
        IGMP_V3_REPORT_LEN
    } else {
        IGMP_V3_QUERY_LEN
    };
    let length = header + sources * 4;

    let mut frame = prepare(ctx, buffer, length);
    let mut writer = frame.writer();
    if report {
        writer
            .put_u8(igmp.igmp_type)
            .put_u8(0)
            .put_u16(0)
            .put_u16(0)
            // one group record
            .put_u16(1)
            .put_u8(igmp.grec_type)
            .put_u8(0)
            .put_u16(u16::from(igmp.sources))
            .put_addr(randomize_addr_if_unset(igmp.grec_multicast));
    } else {
        let flags = (u8::from(igmp.suppress) << 3) | (randomize_if_unset(igmp.qrv) & 0x07);
        writer
            .put_u8(igmp.igmp_type)
            .put_u8(igmp.code)
            .put_u16(0)
            .put_addr(randomize_addr_if_unset(igmp.group))
            .put_u8(flags)
            .put_u8(randomize_if_unset(igmp.qqic))
            .put_u16(u16::from(igmp.sources));
    }
    put_sources(&mut writer, igmp, sources);

    frame.checksum(ctx.config, 2);
    frame.finish(ctx.config)
}

/// Listed source addresses first, random ones for the rest
fn put_sources(writer: &mut PacketWriter<'_>, igmp: &IgmpOptions, count: usize) {
    for index in 0..count {
        let address = igmp
            .addresses
            .get(index)
            .copied()
            .unwrap_or(Ipv4Addr::UNSPECIFIED);
        writer.put_addr(randomize_addr_if_unset(address));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::testing::*;
    use rawmix_packet::checksum::validate_checksum;
    use rawmix_packet::IpProtocol;

    #[test]
    fn test_v1_layout() {
        let mut config = config();
        config.igmp.igmp_type = IgmpType::V1MembershipReport as u8;
        config.igmp.group = Ipv4Addr::new(239, 1, 1, 1);

        let packet = build_checked(build_v1, &config, IpProtocol::IGMP);
        assert_eq!(packet.len(), 28);
        let igmp = body(&packet);
        assert_eq!(igmp[0], 0x12);
        assert_eq!(&igmp[4..8], &[239, 1, 1, 1]);
        assert!(validate_checksum(igmp));
    }

    #[test]
    fn test_v3_query_with_sources() {
        let mut config = config();
        config.igmp.sources = 3;
        config.igmp.qrv = 2;
        config.igmp.suppress = true;
        config.igmp.qqic = 125;
        config.igmp.addresses = vec![Ipv4Addr::new(10, 9, 9, 9)];

        let packet = build_checked(build_v3, &config, IpProtocol::IGMP);
        let igmp = body(&packet);
        assert_eq!(igmp.len(), 12 + 3 * 4);
        assert_eq!(igmp[0], IgmpType::MembershipQuery as u8);
        assert_eq!(igmp[8], 0x08 | 0x02);
        assert_eq!(igmp[9], 125);
        assert_eq!(word(igmp, 10), 3);
        assert_eq!(&igmp[12..16], &[10, 9, 9, 9]);
        assert!(validate_checksum(igmp));
    }

    #[test]
    fn test_v3_report_record() {
        let mut config = config();
        config.igmp.igmp_type = IgmpType::V3MembershipReport as u8;
        config.igmp.grec_type = 4;
        config.igmp.sources = 2;
        config.igmp.grec_multicast = Ipv4Addr::new(232, 0, 0, 1);

        let packet = build_checked(build_v3, &config, IpProtocol::IGMP);
        let igmp = body(&packet);
        assert_eq!(igmp.len(), 16 + 2 * 4);
        assert_eq!(word(igmp, 6), 1);
        assert_eq!(igmp[8], 4);
        assert_eq!(word(igmp, 10), 2);
        assert_eq!(&igmp[12..16], &[232, 0, 0, 1]);
        assert!(validate_checksum(igmp));
    }

    #[test]
    fn test_v3_without_sources() {
        let mut config = config();
        config.igmp.sources = 0;
        let packet = build_checked(build_v3, &config, IpProtocol::IGMP);
        assert_eq!(body(&packet).len(), IGMP_V3_QUERY_LEN);
    }
}
