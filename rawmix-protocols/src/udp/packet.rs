//! UDP Datagram Construction

use crate::builder::{prepare, BuildContext, Frame};
use rawmix_core::random::randomize_if_unset;
use rawmix_packet::PacketBuffer;

pub const UDP_HEADER_LEN: usize = 8;

/// Checksum offset inside the UDP header
pub const UDP_CHECKSUM_OFFSET: usize = 6;

pub fn build(ctx: &BuildContext<'_>, buffer: &mut PacketBuffer) -> usize {
    let config = ctx.config;
    let mut frame = prepare(ctx, buffer, UDP_HEADER_LEN);
    write_header(
        &mut frame,
        randomize_if_unset(config.source_port),
        randomize_if_unset(config.dest_port),
    );
    checksum(&mut frame, ctx);
    frame.finish(config)
}

/// Write the 8-byte header with a zero checksum; the length covers everything
/// the frame holds from the UDP header on.
pub fn write_header(frame: &mut Frame<'_>, source_port: u16, dest_port: u16) {
    let length = frame.payload().len() as u16;
    frame
        .writer()
        .put_u16(source_port)
        .put_u16(dest_port)
        .put_u16(length)
        .put_u16(0);
}

/// Pseudo-header checksum; a computed zero goes out as 0xFFFF (RFC 768).
pub fn checksum(frame: &mut Frame<'_>, ctx: &BuildContext<'_>) {
    frame.transport_checksum(ctx, UDP_CHECKSUM_OFFSET);
    let payload = frame.payload();
    if !ctx.config.bogus_checksum && payload[6] == 0 && payload[7] == 0 {
        frame.set_u16(UDP_CHECKSUM_OFFSET, 0xFFFF);
    }
}
