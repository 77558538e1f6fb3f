//! RSVP object sizing and serialization

use rawmix_core::config::RsvpOptions;
use rawmix_core::random::{randomize_addr_if_unset, randomize_if_unset};
use rawmix_packet::PacketWriter;
use std::net::Ipv4Addr;

/// Length, Class-Num and C-Type
pub const OBJECT_HEADER_LEN: usize = 4;

/// ADSPEC per-service choice
pub const ADSPEC_GUARANTEED: u8 = 2;
pub const ADSPEC_CONTROLLED_LOAD: u8 = 5;

/// Integrated services parameter IDs (RFC 2215)
const PARAM_TOKEN_BUCKET: u8 = 127;
const PARAM_HOP_COUNT: u8 = 4;
const PARAM_PATH_BW: u8 = 6;
const PARAM_MIN_LATENCY: u8 = 8;
const PARAM_COMPOSED_MTU: u8 = 10;
const PARAM_CTOT: u8 = 133;
const PARAM_DTOT: u8 = 134;
const PARAM_CSUM: u8 = 135;
const PARAM_DSUM: u8 = 136;

/// Default general parameters service number
const SERVICE_GENERAL: u8 = 1;

/// Bytes of an ADSPEC general-parameters fragment: header plus four
/// one-word parameters
const ADSPEC_GENERAL_LEN: usize = 4 + 4 * 8;
const ADSPEC_GUARANTEED_LEN: usize = 4 + 4 * 8;
const ADSPEC_CONTROLLED_LEN: usize = 4;

/// RSVP object classes in the order this generator uses them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RsvpObject {
    Session = 1,
    Hop = 3,
    TimeValues = 5,
    ErrorSpec = 6,
    Scope = 7,
    Style = 8,
    SenderTemplate = 11,
    SenderTspec = 12,
    Adspec = 13,
    ResvConfirm = 15,
}

impl RsvpObject {
    fn c_type(self) -> u8 {
        match self {
            RsvpObject::SenderTspec | RsvpObject::Adspec => 2,
            _ => 1,
        }
    }

    /// Object length including its header
    pub fn size(self, rsvp: &RsvpOptions) -> usize {
        OBJECT_HEADER_LEN
            + match self {
                RsvpObject::Session
                | RsvpObject::Hop
                | RsvpObject::ErrorSpec
                | RsvpObject::SenderTemplate => 8,
                RsvpObject::TimeValues | RsvpObject::Style | RsvpObject::ResvConfirm => 4,
                RsvpObject::Scope => 4 * usize::from(rsvp.scope),
                RsvpObject::SenderTspec => 32,
                RsvpObject::Adspec => 4 + ADSPEC_GENERAL_LEN + adspec_service_len(rsvp.adspec),
            }
    }

    pub fn write(self, writer: &mut PacketWriter<'_>, rsvp: &RsvpOptions) {
        writer
            .put_u16(self.size(rsvp) as u16)
            .put_u8(self as u8)
            .put_u8(self.c_type());

        match self {
            RsvpObject::Session => {
                writer
                    .put_addr(randomize_addr_if_unset(rsvp.session_addr))
                    .put_u8(randomize_if_unset(rsvp.session_proto))
                    .put_u8(rsvp.session_flags)
                    .put_u16(randomize_if_unset(rsvp.session_port));
            }
            RsvpObject::Hop => {
                writer
                    .put_addr(randomize_addr_if_unset(rsvp.hop_addr))
                    .put_u32(randomize_if_unset(rsvp.hop_iface));
            }
            RsvpObject::TimeValues => {
                writer.put_u32(randomize_if_unset(rsvp.time_refresh));
            }
            RsvpObject::ErrorSpec => {
                writer
                    .put_addr(randomize_addr_if_unset(rsvp.error_addr))
                    .put_u8(rsvp.error_flags)
                    .put_u8(rsvp.error_code)
                    .put_u16(rsvp.error_value);
            }
            RsvpObject::Scope => {
                for index in 0..usize::from(rsvp.scope) {
                    let address = rsvp
                        .scope_addresses
                        .get(index)
                        .copied()
                        .unwrap_or(Ipv4Addr::UNSPECIFIED);
                    writer.put_addr(randomize_addr_if_unset(address));
                }
            }
            RsvpObject::Style => {
                writer.put_u8(0).put_u24(rsvp.style_opt);
            }
            RsvpObject::SenderTemplate => {
                writer
                    .put_addr(randomize_addr_if_unset(rsvp.sender_addr))
                    .put_u16(0)
                    .put_u16(randomize_if_unset(rsvp.sender_port));
            }
            RsvpObject::SenderTspec => write_tspec(writer, rsvp),
            RsvpObject::Adspec => write_adspec(writer, rsvp),
            RsvpObject::ResvConfirm => {
                writer.put_addr(randomize_addr_if_unset(rsvp.confirm_addr));
            }
        }
    }
}

fn adspec_service_len(adspec: u8) -> usize {
    match adspec {
        ADSPEC_GUARANTEED => ADSPEC_GUARANTEED_LEN,
        ADSPEC_CONTROLLED_LOAD => ADSPEC_CONTROLLED_LEN,
        _ => 0,
    }
}

/// Message header: version (4 bits), 12 reserved bits, length in words
fn put_message_header(writer: &mut PacketWriter<'_>, body_len: usize) {
    writer.put_u16(0).put_u16((body_len / 4) as u16);
}

/// Service header: service number, break bit and reserved, length in words
fn put_service_header(writer: &mut PacketWriter<'_>, service: u8, data_len: usize) {
    writer
        .put_u8(service)
        .put_u8(0)
        .put_u16((data_len / 4) as u16);
}

/// Parameter header and a single 32-bit value
fn put_parameter(writer: &mut PacketWriter<'_>, id: u8, value: u32) {
    writer.put_u8(id).put_u8(0).put_u16(1).put_u32(value);
}

/// RFC 2210 token bucket TSPEC
fn write_tspec(writer: &mut PacketWriter<'_>, rsvp: &RsvpOptions) {
    put_message_header(writer, 28);
    put_service_header(writer, rsvp.tspec, 24);
    writer
        .put_u8(PARAM_TOKEN_BUCKET)
        .put_u8(0)
        .put_u16(5)
        .put_u32(randomize_if_unset(rsvp.tspec_r))
        .put_u32(randomize_if_unset(rsvp.tspec_b))
        .put_u32(randomize_if_unset(rsvp.tspec_p))
        .put_u32(randomize_if_unset(rsvp.tspec_m))
        .put_u32(randomize_if_unset(rsvp.tspec_max));
}

/// Default general parameters plus at most one per-service fragment
fn write_adspec(writer: &mut PacketWriter<'_>, rsvp: &RsvpOptions) {
    let service_len = adspec_service_len(rsvp.adspec);
    put_message_header(writer, ADSPEC_GENERAL_LEN + service_len);

    put_service_header(writer, SERVICE_GENERAL, ADSPEC_GENERAL_LEN - 4);
    put_parameter(writer, PARAM_HOP_COUNT, randomize_if_unset(rsvp.adspec_hop));
    put_parameter(writer, PARAM_PATH_BW, randomize_if_unset(rsvp.adspec_path));
    put_parameter(
        writer,
        PARAM_MIN_LATENCY,
        randomize_if_unset(rsvp.adspec_minimum),
    );
    put_parameter(writer, PARAM_COMPOSED_MTU, randomize_if_unset(rsvp.adspec_mtu));

    match rsvp.adspec {
        ADSPEC_GUARANTEED => {
            put_service_header(writer, ADSPEC_GUARANTEED, ADSPEC_GUARANTEED_LEN - 4);
            put_parameter(writer, PARAM_CTOT, randomize_if_unset(rsvp.adspec_ctot));
            put_parameter(writer, PARAM_DTOT, randomize_if_unset(rsvp.adspec_dtot));
            put_parameter(writer, PARAM_CSUM, randomize_if_unset(rsvp.adspec_csum));
            put_parameter(writer, PARAM_DSUM, randomize_if_unset(rsvp.adspec_dsum));
        }
        ADSPEC_CONTROLLED_LOAD => {
            put_service_header(writer, ADSPEC_CONTROLLED_LOAD, 0);
        }
        _ => {}
    }
}
