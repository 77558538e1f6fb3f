//! OSPF Packet Construction

use super::lls;
use super::lsa::{lsa_len, write_lsa, LSA_HEADER_LEN};
use crate::builder::{prepare, BuildContext};
use rawmix_core::config::OspfOptions;
use rawmix_core::random::{
    random, randomize_addr_if_unset, randomize_if_unset, randomize_netmask_if_unset,
};
use rawmix_packet::checksum::internet_checksum_parts;
use rawmix_packet::{PacketBuffer, PacketWriter};
use std::net::Ipv4Addr;

pub const OSPF_VERSION: u8 = 2;
pub const OSPF_HEADER_LEN: usize = 24;

const OSPF_CHECKSUM_OFFSET: usize = 12;
/// The 64-bit authentication field is left out of the checksum
const OSPF_AUTH_OFFSET: usize = 16;
const OSPF_DIGEST_LEN: usize = 16;

const HELLO_LEN: usize = 20;
const DD_LEN: usize = 8;
const LSR_LEN: usize = 12;
/// Number of LSAs preceding the LSA in an LS Update
const LSU_COUNT_LEN: usize = 4;

/// OSPF Packet Types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OspfPacketType {
    Hello = 1,
    DatabaseDescription = 2,
    LinkStateRequest = 3,
    LinkStateUpdate = 4,
    LinkStateAck = 5,
}

impl OspfPacketType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Hello),
            2 => Some(Self::DatabaseDescription),
            3 => Some(Self::LinkStateRequest),
            4 => Some(Self::LinkStateUpdate),
            5 => Some(Self::LinkStateAck),
            _ => None,
        }
    }
}

/// OSPF Authentication Types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
enum AuthType {
    Null = 0,
    Cryptographic = 2,
}

fn body_len(ospf: &OspfOptions, packet_type: Option<OspfPacketType>) -> usize {
    match packet_type {
        Some(OspfPacketType::Hello) => HELLO_LEN + 4 * usize::from(ospf.neighbors),
        Some(OspfPacketType::DatabaseDescription) if ospf.dd_include_lsa => {
            DD_LEN + LSA_HEADER_LEN
        }
        Some(OspfPacketType::DatabaseDescription) => DD_LEN,
        Some(OspfPacketType::LinkStateRequest) => LSR_LEN,
        Some(OspfPacketType::LinkStateUpdate) => LSU_COUNT_LEN + lsa_len(ospf, true),
        Some(OspfPacketType::LinkStateAck) => LSA_HEADER_LEN,
        None => 0,
    }
}

/// LLS is only defined for Hello and DD packets
fn carries_lls(ospf: &OspfOptions, packet_type: Option<OspfPacketType>) -> bool {
    ospf.options & OspfOptions::OPTION_L != 0
        && matches!(
            packet_type,
            Some(OspfPacketType::Hello | OspfPacketType::DatabaseDescription)
        )
}

pub fn build(ctx: &BuildContext<'_>, buffer: &mut PacketBuffer) -> usize {
    let config = ctx.config;
    let ospf = &config.ospf;
    let packet_type = OspfPacketType::from_u8(ospf.packet_type);

    let ospf_len = OSPF_HEADER_LEN + body_len(ospf, packet_type);
    let digest_len = if ospf.auth { OSPF_DIGEST_LEN } else { 0 };
    let lls_len = if carries_lls(ospf, packet_type) {
        lls::block_len(ospf)
    } else {
        0
    };
    let length = if ospf.length != 0 {
        ospf.length
    } else {
        ospf_len as u16
    };
    let sequence = randomize_if_unset(ospf.sequence);

    let mut frame = prepare(ctx, buffer, ospf_len + digest_len + lls_len);
    let mut writer = frame.writer();
    writer
        .put_u8(OSPF_VERSION)
        .put_u8(ospf.packet_type)
        .put_u16(length)
        .put_addr(randomize_addr_if_unset(ospf.router_id))
        .put_addr(ospf.area_id.unwrap_or_else(|| Ipv4Addr::from(random::<u32>())))
        .put_u16(0);
    if ospf.auth {
        writer
            .put_u16(AuthType::Cryptographic as u16)
            .put_u16(0)
            .put_u8(ospf.key_id)
            .put_u8(OSPF_DIGEST_LEN as u8)
            .put_u32(sequence);
    } else {
        writer.put_u16(AuthType::Null as u16).put_zeros(8);
    }

    match packet_type {
        Some(OspfPacketType::Hello) => write_hello(&mut writer, ospf),
        Some(OspfPacketType::DatabaseDescription) => {
            writer
                .put_u16(randomize_if_unset(ospf.dd_mtu))
                .put_u8(ospf.options)
                .put_u8(ospf.dd_dbdesc)
                .put_u32(randomize_if_unset(ospf.dd_sequence));
            if ospf.dd_include_lsa {
                write_lsa(&mut writer, ospf, false, config.bogus_checksum);
            }
        }
        Some(OspfPacketType::LinkStateRequest) => {
            writer
                .put_u32(u32::from(ospf.lsa_type))
                .put_addr(randomize_addr_if_unset(ospf.lsa_id))
                .put_addr(randomize_addr_if_unset(ospf.lsa_router));
        }
        Some(OspfPacketType::LinkStateUpdate) => {
            writer.put_u32(1);
            write_lsa(&mut writer, ospf, true, config.bogus_checksum);
        }
        Some(OspfPacketType::LinkStateAck) => {
            write_lsa(&mut writer, ospf, false, config.bogus_checksum);
        }
        None => {}
    }

    if ospf.auth {
        writer.put_random(OSPF_DIGEST_LEN);
    }
    if lls_len != 0 {
        lls::write_block(&mut writer, ospf, sequence, config.bogus_checksum);
    }

    let checksum = if config.bogus_checksum {
        random()
    } else {
        let payload = frame.payload();
        internet_checksum_parts(&[
            &payload[..OSPF_AUTH_OFFSET],
            &payload[OSPF_HEADER_LEN..ospf_len],
        ])
    };
    frame.set_u16(OSPF_CHECKSUM_OFFSET, checksum);
    frame.finish(config)
}

fn write_hello(writer: &mut PacketWriter<'_>, ospf: &OspfOptions) {
    writer
        .put_addr(randomize_netmask_if_unset(ospf.netmask))
        .put_u16(randomize_if_unset(ospf.hello_interval))
        .put_u8(ospf.options)
        .put_u8(randomize_if_unset(ospf.hello_priority))
        .put_u32(randomize_if_unset(ospf.hello_dead))
        .put_addr(randomize_addr_if_unset(ospf.hello_design))
        .put_addr(randomize_addr_if_unset(ospf.hello_backup));
    for index in 0..usize::from(ospf.neighbors) {
        let neighbor = ospf
            .neighbor_addresses
            .get(index)
            .copied()
            .unwrap_or(Ipv4Addr::UNSPECIFIED);
        writer.put_addr(randomize_addr_if_unset(neighbor));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::testing::*;
    use rawmix_packet::checksum::internet_checksum_parts;
    use rawmix_packet::IpProtocol;

    /// Header checksum check that skips the authentication field
    fn checksum_ok(ospf: &[u8]) -> bool {
        let length = usize::from(word(ospf, 2));
        let sum = internet_checksum_parts(&[&ospf[..16], &ospf[24..length]]);
        sum == 0 || sum == 0xFFFF
    }

    #[test]
    fn test_hello_with_neighbors() {
        let mut config = config();
        config.ospf.neighbors = 2;
        config.ospf.neighbor_addresses = vec![Ipv4Addr::new(10, 0, 0, 2)];
        config.ospf.area_id = Some(Ipv4Addr::UNSPECIFIED);
        config.ospf.hello_interval = 10;

        let packet = build_checked(build, &config, IpProtocol::OSPF);
        let ospf = body(&packet);
        assert_eq!(ospf.len(), 24 + 20 + 8);
        assert_eq!(ospf[0], OSPF_VERSION);
        assert_eq!(ospf[1], OspfPacketType::Hello as u8);
        assert_eq!(usize::from(word(ospf, 2)), ospf.len());
        assert_eq!(&ospf[8..12], &[0, 0, 0, 0]);
        assert_eq!(word(ospf, 14), 0);
        assert_eq!(word(ospf, 28), 10);
        assert_eq!(ospf[31], 1);
        assert_eq!(dword(ospf, 32), 360);
        assert_eq!(&ospf[44..48], &[10, 0, 0, 2]);
        assert!(checksum_ok(ospf));
    }

    #[test]
    fn test_database_description_with_lsa_header() {
        let mut config = config();
        config.ospf.packet_type = OspfPacketType::DatabaseDescription as u8;
        config.ospf.dd_include_lsa = true;
        config.ospf.dd_dbdesc = 0x07;

        let packet = build_checked(build, &config, IpProtocol::OSPF);
        let ospf = body(&packet);
        assert_eq!(ospf.len(), 24 + 8 + 20);
        assert_eq!(word(ospf, 24), 1500);
        assert_eq!(ospf[27], 0x07);
        assert_eq!(word(ospf, 32 + 18), 20);
        assert!(checksum_ok(ospf));
    }

    #[test]
    fn test_link_state_request() {
        let mut config = config();
        config.ospf.packet_type = OspfPacketType::LinkStateRequest as u8;
        config.ospf.lsa_type = 3;

        let packet = build_checked(build, &config, IpProtocol::OSPF);
        let ospf = body(&packet);
        assert_eq!(ospf.len(), 36);
        assert_eq!(dword(ospf, 24), 3);
        assert!(checksum_ok(ospf));
    }

    #[test]
    fn test_link_state_update_router_lsa() {
        let mut config = config();
        config.ospf.packet_type = OspfPacketType::LinkStateUpdate as u8;

        let packet = build_checked(build, &config, IpProtocol::OSPF);
        let ospf = body(&packet);
        assert_eq!(ospf.len(), 24 + 4 + 20 + 16);
        assert_eq!(dword(ospf, 24), 1);
        assert_eq!(word(ospf, 28 + 18), 36);
        assert!(checksum_ok(ospf));
    }

    #[test]
    fn test_link_state_ack() {
        let mut config = config();
        config.ospf.packet_type = OspfPacketType::LinkStateAck as u8;
        let packet = build_checked(build, &config, IpProtocol::OSPF);
        assert_eq!(body(&packet).len(), 44);
    }

    #[test]
    fn test_crypto_auth_trailer_outside_length() {
        let mut config = config();
        config.ospf.auth = true;
        config.ospf.key_id = 4;
        config.ospf.sequence = 99;

        let packet = build_checked(build, &config, IpProtocol::OSPF);
        let ospf = body(&packet);
        assert_eq!(word(ospf, 2), 44);
        assert_eq!(ospf.len(), 44 + 16);
        assert_eq!(word(ospf, 14), 2);
        assert_eq!(ospf[18], 4);
        assert_eq!(ospf[19], 16);
        assert_eq!(dword(ospf, 20), 99);
        assert!(checksum_ok(ospf));
    }

    #[test]
    fn test_lls_block_after_digest() {
        let mut config = config();
        config.ospf.options = OspfOptions::OPTION_L | OspfOptions::OPTION_E;
        config.ospf.auth = true;
        config.ospf.sequence = 5;

        let packet = build_checked(build, &config, IpProtocol::OSPF);
        let ospf = body(&packet);
        assert_eq!(ospf.len(), 44 + 16 + 36);
        let lls = &ospf[60..];
        assert_eq!(word(lls, 2), 9);
        assert_eq!(dword(lls, 16), 5);
        assert!(checksum_ok(ospf));
    }

    #[test]
    fn test_lls_ignored_for_updates() {
        let mut config = config();
        config.ospf.options = OspfOptions::OPTION_L;
        config.ospf.packet_type = OspfPacketType::LinkStateAck as u8;
        let packet = build_checked(build, &config, IpProtocol::OSPF);
        assert_eq!(body(&packet).len(), 44);
    }

    #[test]
    fn test_length_override() {
        let mut config = config();
        config.ospf.length = 1000;
        let packet = build_checked(build, &config, IpProtocol::OSPF);
        let ospf = body(&packet);
        assert_eq!(word(ospf, 2), 1000);
        assert_eq!(ospf.len(), 44);
    }
}
