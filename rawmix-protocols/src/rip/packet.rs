//! RIP Packet Construction

use crate::builder::{prepare, BuildContext};
use crate::udp::packet::{self as udp, UDP_HEADER_LEN};
use rawmix_core::config::RipOptions;
use rawmix_core::random::{
    randomize_addr_if_unset, randomize_if_unset, randomize_netmask_if_unset,
};
use rawmix_packet::{PacketBuffer, PacketWriter};

pub const RIP_PORT: u16 = 520;

/// Command, version and the domain / must-be-zero word
pub const RIP_HEADER_LEN: usize = 4;
/// One route table entry (also the size of the auth entry and trailer)
pub const RIP_ENTRY_LEN: usize = 20;

/// Address family marking an authentication entry or trailer
const RIP_AUTH_FAMILY: u16 = 0xFFFF;
/// Keyed Message Digest (RFC 2082)
const RIP_AUTH_MD5: u16 = 3;
/// Trailer type following the last route entry
const RIP_AUTH_TRAILER: u16 = 0x0001;
const RIP_DIGEST_LEN: usize = 16;

/// RIP Commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RipCommand {
    Request = 1,
    Response = 2,
}

pub fn build_v1(ctx: &BuildContext<'_>, buffer: &mut PacketBuffer) -> usize {
    let rip = &ctx.config.rip;
    let mut frame = prepare(ctx, buffer, UDP_HEADER_LEN + RIP_HEADER_LEN + RIP_ENTRY_LEN);
    udp::write_header(&mut frame, RIP_PORT, RIP_PORT);

    let mut writer = frame.writer_at(UDP_HEADER_LEN);
    writer
        .put_u8(rip.command)
        .put_u8(1)
        .put_u16(0)
        .put_u16(randomize_if_unset(rip.family))
        .put_u16(0)
        .put_addr(randomize_addr_if_unset(rip.address))
        .put_u32(0)
        .put_u32(0)
        .put_u32(randomize_if_unset(rip.metric));

    udp::checksum(&mut frame, ctx);
    frame.finish(ctx.config)
}

pub fn build_v2(ctx: &BuildContext<'_>, buffer: &mut PacketBuffer) -> usize {
    let rip = &ctx.config.rip;
    let auth_len = if rip.auth { 2 * RIP_ENTRY_LEN } else { 0 };
    let mut frame = prepare(
        ctx,
        buffer,
        UDP_HEADER_LEN + RIP_HEADER_LEN + RIP_ENTRY_LEN + auth_len,
    );
    udp::write_header(&mut frame, RIP_PORT, RIP_PORT);

    let mut writer = frame.writer_at(UDP_HEADER_LEN);
    writer
        .put_u8(rip.command)
        .put_u8(2)
        .put_u16(randomize_if_unset(rip.domain));
    if rip.auth {
        write_auth_entry(&mut writer, rip);
    }
    writer
        .put_u16(randomize_if_unset(rip.family))
        .put_u16(randomize_if_unset(rip.tag))
        .put_addr(randomize_addr_if_unset(rip.address))
        .put_addr(randomize_netmask_if_unset(rip.netmask))
        .put_addr(randomize_addr_if_unset(rip.next_hop))
        .put_u32(randomize_if_unset(rip.metric));
    if rip.auth {
        writer
            .put_u16(RIP_AUTH_FAMILY)
            .put_u16(RIP_AUTH_TRAILER)
            .put_random(RIP_DIGEST_LEN);
    }

    udp::checksum(&mut frame, ctx);
    frame.finish(ctx.config)
}

/// RFC 2082 authentication entry; the length field is the offset of the
/// digest trailer from the start of the RIP header.
fn write_auth_entry(writer: &mut PacketWriter<'_>, rip: &RipOptions) {
    let packet_len = (RIP_HEADER_LEN + 2 * RIP_ENTRY_LEN) as u16;
    writer
        .put_u16(RIP_AUTH_FAMILY)
        .put_u16(RIP_AUTH_MD5)
        .put_u16(packet_len)
        .put_u8(rip.key_id)
        .put_u8(RIP_DIGEST_LEN as u8)
        .put_u32(randomize_if_unset(rip.sequence))
        .put_u32(0)
        .put_u32(0);
}
