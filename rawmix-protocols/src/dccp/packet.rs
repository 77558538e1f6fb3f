//! DCCP Packet Construction

use crate::builder::{prepare, BuildContext};
use rawmix_core::config::DccpOptions;
use rawmix_core::random::randomize_if_unset;
use rawmix_packet::{PacketBuffer, PacketWriter};

/// Generic header with X=1 (48-bit sequence numbers)
pub const DCCP_EXT_HEADER_LEN: usize = 16;
/// Generic header with X=0 (24-bit sequence numbers)
pub const DCCP_SHORT_HEADER_LEN: usize = 12;
/// Acknowledgement subheader, long and short form
pub const DCCP_EXT_ACK_LEN: usize = 8;
pub const DCCP_SHORT_ACK_LEN: usize = 4;
const DCCP_SERVICE_LEN: usize = 4;
/// Reset code plus three data bytes
const DCCP_RESET_LEN: usize = 4;

const DCCP_CHECKSUM_OFFSET: usize = 6;

/// DCCP Packet Types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DccpType {
    Request = 0,
    Response = 1,
    Data = 2,
    Ack = 3,
    DataAck = 4,
    CloseReq = 5,
    Close = 6,
    Reset = 7,
    Sync = 8,
    SyncAck = 9,
}

impl DccpType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Request),
            1 => Some(Self::Response),
            2 => Some(Self::Data),
            3 => Some(Self::Ack),
            4 => Some(Self::DataAck),
            5 => Some(Self::CloseReq),
            6 => Some(Self::Close),
            7 => Some(Self::Reset),
            8 => Some(Self::Sync),
            9 => Some(Self::SyncAck),
            _ => None,
        }
    }
}

/// What follows the generic header for a given packet type
struct Subheader {
    ack: bool,
    service: bool,
    reset: bool,
}

fn subheader(packet_type: Option<DccpType>) -> Subheader {
    let (ack, service, reset) = match packet_type {
        Some(DccpType::Request) => (false, true, false),
        Some(DccpType::Response) => (true, true, false),
        Some(DccpType::Reset) => (true, false, true),
        Some(DccpType::Data) | None => (false, false, false),
        Some(_) => (true, false, false),
    };
    Subheader {
        ack,
        service,
        reset,
    }
}

/// Generic header plus the type-specific subheader
pub fn header_len(dccp: &DccpOptions) -> usize {
    let sub = subheader(DccpType::from_u8(dccp.packet_type));
    let mut len = if dccp.extended {
        DCCP_EXT_HEADER_LEN
    } else {
        DCCP_SHORT_HEADER_LEN
    };
    if sub.ack {
        len += if dccp.extended {
            DCCP_EXT_ACK_LEN
        } else {
            DCCP_SHORT_ACK_LEN
        };
    }
    if sub.service {
        len += DCCP_SERVICE_LEN;
    }
    if sub.reset {
        len += DCCP_RESET_LEN;
    }
    len
}

pub fn build(ctx: &BuildContext<'_>, buffer: &mut PacketBuffer) -> usize {
    let config = ctx.config;
    let dccp = &config.dccp;
    let length = header_len(dccp);
    let sub = subheader(DccpType::from_u8(dccp.packet_type));
    let data_offset = if dccp.data_offset != 0 {
        dccp.data_offset
    } else {
        (length / 4) as u8
    };

    let mut frame = prepare(ctx, buffer, length);
    let mut writer = frame.writer();
    writer
        .put_u16(randomize_if_unset(config.source_port))
        .put_u16(randomize_if_unset(config.dest_port))
        .put_u8(data_offset)
        .put_u8((dccp.ccval << 4) | (dccp.cscov & 0x0F))
        .put_u16(0)
        .put_u8(((dccp.packet_type & 0x0F) << 1) | u8::from(dccp.extended));

    let sequence = randomize_if_unset(dccp.sequence);
    if dccp.extended {
        writer.put_u8(0).put_u48(sequence);
    } else {
        writer.put_u24(sequence as u32);
    }

    if sub.ack {
        write_ack(&mut writer, dccp);
    }
    if sub.service {
        writer.put_u32(randomize_if_unset(dccp.service));
    }
    if sub.reset {
        writer.put_u8(dccp.reset_code).put_random(3);
    }

    frame.transport_checksum(ctx, DCCP_CHECKSUM_OFFSET);
    frame.finish(config)
}

fn write_ack(writer: &mut PacketWriter<'_>, dccp: &DccpOptions) {
    let acknowledge = randomize_if_unset(dccp.acknowledge);
    if dccp.extended {
        writer.put_u16(0).put_u48(acknowledge);
    } else {
        writer.put_u8(0).put_u24(acknowledge as u32);
    }
}
