//! EIGRP Packet Construction

use super::tlv::{
    route_len, route_prefix, write_authentication, write_parameters, write_route,
    write_software_version, AUTH_TLV_LEN, PARAMETER_TLV_LEN, SOFTWARE_TLV_LEN,
};
use crate::builder::{prepare, BuildContext};
use rawmix_core::random::randomize_if_unset;
use rawmix_packet::PacketBuffer;

pub const EIGRP_VERSION: u8 = 2;
pub const EIGRP_HEADER_LEN: usize = 20;

/// EIGRP Opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EigrpOpcode {
    Update = 1,
    Request = 2,
    Query = 3,
    Reply = 4,
    Hello = 5,
    SiaQuery = 10,
    SiaReply = 11,
}

impl EigrpOpcode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Update),
            2 => Some(Self::Request),
            3 => Some(Self::Query),
            4 => Some(Self::Reply),
            5 => Some(Self::Hello),
            10 => Some(Self::SiaQuery),
            11 => Some(Self::SiaReply),
            _ => None,
        }
    }

    fn carries_route(self) -> bool {
        matches!(self, Self::Update | Self::Query | Self::Reply)
    }
}

pub fn build(ctx: &BuildContext<'_>, buffer: &mut PacketBuffer) -> usize {
    let eigrp = &ctx.config.eigrp;
    let opcode = EigrpOpcode::from_u8(eigrp.opcode);
    let route = opcode
        .filter(|opcode| opcode.carries_route())
        .map(|_| route_prefix(eigrp));
    let hello = opcode == Some(EigrpOpcode::Hello);

    let mut length = EIGRP_HEADER_LEN;
    if eigrp.auth {
        length += AUTH_TLV_LEN;
    }
    if let Some(prefix) = route {
        length += route_len(eigrp, prefix);
    }
    if hello {
        length += PARAMETER_TLV_LEN + SOFTWARE_TLV_LEN;
    }

    let mut frame = prepare(ctx, buffer, length);
    let mut writer = frame.writer();
    writer
        .put_u8(EIGRP_VERSION)
        .put_u8(eigrp.opcode)
        .put_u16(0)
        .put_u32(randomize_if_unset(eigrp.flags))
        .put_u32(randomize_if_unset(eigrp.sequence))
        .put_u32(randomize_if_unset(eigrp.acknowledge))
        // virtual router id
        .put_u16(0)
        .put_u16(randomize_if_unset(eigrp.autonomous_system));

    if eigrp.auth {
        write_authentication(&mut writer, eigrp);
    }
    if let Some(prefix) = route {
        write_route(&mut writer, eigrp, prefix);
    }
    if hello {
        write_parameters(&mut writer, eigrp);
        write_software_version(&mut writer, eigrp);
    }

    frame.checksum(ctx.config, 2);
    frame.finish(ctx.config)
}
