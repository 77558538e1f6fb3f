//! EIGRP TLV sizing and serialization

use rand::Rng;
use rawmix_core::config::EigrpOptions;
use rawmix_core::random::{randomize_addr_if_unset, randomize_if_unset};
use rawmix_packet::PacketWriter;

/// EIGRP TLV Types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum EigrpTlvType {
    Parameter = 0x0001,
    Authentication = 0x0002,
    SoftwareVersion = 0x0004,
    InternalRoute = 0x0102,
    ExternalRoute = 0x0103,
}

pub const PARAMETER_TLV_LEN: usize = 12;
pub const SOFTWARE_TLV_LEN: usize = 8;
pub const AUTH_TLV_LEN: usize = 40;
/// Internal route TLV up to and including the prefix length byte
pub const INTERNAL_ROUTE_LEN: usize = 25;
/// External route TLV up to and including the prefix length byte
pub const EXTERNAL_ROUTE_LEN: usize = 45;

/// Keyed MD5
const AUTH_MD5: u16 = 2;
const DIGEST_LEN: usize = 16;

/// The prefix length a route TLV will carry
pub fn route_prefix(eigrp: &EigrpOptions) -> u8 {
    if eigrp.prefix == 0 {
        rand::thread_rng().gen_range(1..=32)
    } else {
        eigrp.prefix.min(32)
    }
}

/// Destination bytes needed for `prefix` bits
pub fn destination_len(prefix: u8) -> usize {
    usize::from(prefix).div_ceil(8)
}

pub fn is_external(eigrp: &EigrpOptions) -> bool {
    eigrp.route_type == EigrpTlvType::ExternalRoute as u16
}

/// Route TLV length for a drawn prefix
pub fn route_len(eigrp: &EigrpOptions, prefix: u8) -> usize {
    let fixed = if is_external(eigrp) {
        EXTERNAL_ROUTE_LEN
    } else {
        INTERNAL_ROUTE_LEN
    };
    fixed + destination_len(prefix)
}

pub fn write_authentication(writer: &mut PacketWriter<'_>, eigrp: &EigrpOptions) {
    writer
        .put_u16(EigrpTlvType::Authentication as u16)
        .put_u16(AUTH_TLV_LEN as u16)
        .put_u16(AUTH_MD5)
        .put_u16(DIGEST_LEN as u16)
        .put_u32(eigrp.key_id)
        .put_u32(randomize_if_unset(eigrp.sequence))
        .put_zeros(8)
        .put_random(DIGEST_LEN);
}

pub fn write_parameters(writer: &mut PacketWriter<'_>, eigrp: &EigrpOptions) {
    writer
        .put_u16(EigrpTlvType::Parameter as u16)
        .put_u16(PARAMETER_TLV_LEN as u16)
        .put_u8(eigrp.k1)
        .put_u8(eigrp.k2)
        .put_u8(eigrp.k3)
        .put_u8(eigrp.k4)
        .put_u8(eigrp.k5)
        .put_u8(0)
        .put_u16(randomize_if_unset(eigrp.hold));
}

pub fn write_software_version(writer: &mut PacketWriter<'_>, eigrp: &EigrpOptions) {
    writer
        .put_u16(EigrpTlvType::SoftwareVersion as u16)
        .put_u16(SOFTWARE_TLV_LEN as u16)
        .put_u8(eigrp.ios_major)
        .put_u8(eigrp.ios_minor)
        .put_u8(eigrp.ver_major)
        .put_u8(eigrp.ver_minor);
}

/// Internal or external IP route TLV. A non-zero `length` option replaces the
/// computed TLV length field.
pub fn write_route(writer: &mut PacketWriter<'_>, eigrp: &EigrpOptions, prefix: u8) {
    let external = is_external(eigrp);
    let length = if eigrp.length != 0 {
        eigrp.length
    } else {
        route_len(eigrp, prefix) as u16
    };
    let tlv_type = if external {
        EigrpTlvType::ExternalRoute
    } else {
        EigrpTlvType::InternalRoute
    };

    writer
        .put_u16(tlv_type as u16)
        .put_u16(length)
        .put_addr(randomize_addr_if_unset(eigrp.next_hop));
    if external {
        writer
            .put_addr(randomize_addr_if_unset(eigrp.src_router))
            .put_u32(randomize_if_unset(eigrp.src_as))
            .put_u32(randomize_if_unset(eigrp.tag))
            .put_u32(randomize_if_unset(eigrp.proto_metric))
            .put_u16(0)
            .put_u8(randomize_if_unset(eigrp.proto_id))
            .put_u8(randomize_if_unset(eigrp.ext_flags));
    }

    let destination = randomize_addr_if_unset(eigrp.destination).octets();
    writer
        .put_u32(randomize_if_unset(eigrp.delay))
        .put_u32(randomize_if_unset(eigrp.bandwidth))
        .put_u24(randomize_if_unset(eigrp.mtu))
        .put_u8(randomize_if_unset(eigrp.hop_count))
        .put_u8(randomize_if_unset(eigrp.reliability))
        .put_u8(randomize_if_unset(eigrp.load))
        .put_u16(0)
        .put_u8(prefix)
        .put_slice(&destination[..destination_len(prefix)]);
}
