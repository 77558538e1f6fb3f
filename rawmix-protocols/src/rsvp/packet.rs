//! RSVP Message Construction

use super::object::RsvpObject;
use crate::builder::{prepare, BuildContext};
use rawmix_packet::PacketBuffer;

pub const RSVP_VERSION: u8 = 1;
pub const RSVP_HEADER_LEN: usize = 8;

/// RSVP Message Types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RsvpMessage {
    Path = 1,
    Resv = 2,
    PathErr = 3,
    ResvErr = 4,
    PathTear = 5,
    ResvTear = 6,
    ResvConf = 7,
}

impl RsvpMessage {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Path),
            2 => Some(Self::Resv),
            3 => Some(Self::PathErr),
            4 => Some(Self::ResvErr),
            5 => Some(Self::PathTear),
            6 => Some(Self::ResvTear),
            7 => Some(Self::ResvConf),
            _ => None,
        }
    }
}

/// Objects carried by each message type, in wire order. Unknown types carry
/// a SESSION object only.
pub fn message_objects(message_type: u8) -> &'static [RsvpObject] {
    use RsvpObject::*;

    match RsvpMessage::from_u8(message_type) {
        Some(RsvpMessage::Path) => &[
            Session,
            Hop,
            TimeValues,
            SenderTemplate,
            SenderTspec,
            Adspec,
        ],
        Some(RsvpMessage::Resv) => &[Session, Hop, TimeValues, ResvConfirm, Scope, Style],
        Some(RsvpMessage::PathErr) => &[Session, ErrorSpec, SenderTemplate, SenderTspec, Adspec],
        Some(RsvpMessage::ResvErr) => &[Session, Hop, ErrorSpec, Scope, Style],
        Some(RsvpMessage::PathTear) => &[Session, Hop, SenderTemplate, SenderTspec, Adspec],
        Some(RsvpMessage::ResvTear) => &[Session, Hop, Scope, Style],
        Some(RsvpMessage::ResvConf) => &[Session, ErrorSpec, ResvConfirm, Style],
        None => &[Session],
    }
}

pub fn build(ctx: &BuildContext<'_>, buffer: &mut PacketBuffer) -> usize {
    let rsvp = &ctx.config.rsvp;
    let objects = message_objects(rsvp.message_type);
    let length = RSVP_HEADER_LEN
        + objects
            .iter()
            .map(|object| object.size(rsvp))
            .sum::<usize>();

    let mut frame = prepare(ctx, buffer, length);
    let mut writer = frame.writer();
    writer
        .put_u8((RSVP_VERSION << 4) | (rsvp.flags & 0x0F))
        .put_u8(rsvp.message_type)
        .put_u16(0)
        .put_u8(rsvp.ttl)
        .put_u8(0)
        .put_u16(length as u16);
    for object in objects {
        object.write(&mut writer, rsvp);
    }

    frame.checksum(ctx.config, 2);
    frame.finish(ctx.config)
}
