//! ICMP Packet Construction

use crate::builder::{prepare, BuildContext};
use rawmix_core::random::{randomize_addr_if_unset, randomize_if_unset};
use rawmix_packet::PacketBuffer;

pub const ICMP_HEADER_LEN: usize = 8;

/// ICMP Message Types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IcmpType {
    EchoReply = 0,
    DestinationUnreachable = 3,
    SourceQuench = 4,
    Redirect = 5,
    EchoRequest = 8,
    TimeExceeded = 11,
    ParameterProblem = 12,
    Timestamp = 13,
    TimestampReply = 14,
}

/// Redirect for network
const REDIRECT_NET: u8 = 0;
/// Redirect for host
const REDIRECT_HOST: u8 = 1;

pub fn build(ctx: &BuildContext<'_>, buffer: &mut PacketBuffer) -> usize {
    let icmp = &ctx.config.icmp;
    let mut frame = prepare(ctx, buffer, ICMP_HEADER_LEN);

    let mut writer = frame.writer();
    writer.put_u8(icmp.icmp_type).put_u8(icmp.code).put_u16(0);
    let redirect = icmp.icmp_type == IcmpType::Redirect as u8
        && matches!(icmp.code, REDIRECT_NET | REDIRECT_HOST);
    if redirect {
        writer.put_addr(randomize_addr_if_unset(icmp.gateway));
    } else {
        writer
            .put_u16(randomize_if_unset(icmp.id))
            .put_u16(randomize_if_unset(icmp.sequence));
    }

    frame.checksum(ctx.config, 2);
    frame.finish(ctx.config)
}
