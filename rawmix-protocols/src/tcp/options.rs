//! TCP option sizing and serialization

use rawmix_core::config::{TcpOptionSet, TcpOptions};
use rawmix_core::random::randomize_if_unset;
use rawmix_packet::PacketWriter;

/// TCP option kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TcpOptionKind {
    EndOfList = 0,
    NoOperation = 1,
    Mss = 2,
    WindowScale = 3,
    SackPermitted = 4,
    Sack = 5,
    Timestamp = 8,
    Cc = 11,
    CcNew = 12,
    CcEcho = 13,
    Md5Signature = 19,
    Authentication = 29,
}

pub const TCPOLEN_MSS: usize = 4;
pub const TCPOLEN_WSOPT: usize = 3;
pub const TCPOLEN_SACK_OK: usize = 2;
pub const TCPOLEN_TSOPT: usize = 10;
pub const TCPOLEN_CC: usize = 6;
/// One left/right edge pair
pub const TCPOLEN_SACK_EDGE: usize = 10;
pub const TCPOLEN_MD5: usize = 18;
pub const TCPOLEN_AO: usize = 20;

const DIGEST_LEN: usize = 16;

fn unpadded_len(tcp: &TcpOptions) -> usize {
    let set = tcp.options;
    let mut len = 0;
    for (option, size) in [
        (TcpOptionSet::MSS, TCPOLEN_MSS),
        (TcpOptionSet::WSOPT, TCPOLEN_WSOPT),
        (TcpOptionSet::TSOPT, TCPOLEN_TSOPT),
        (TcpOptionSet::SACK_OK, TCPOLEN_SACK_OK),
        (TcpOptionSet::CC, TCPOLEN_CC),
        (TcpOptionSet::CC_NEW, TCPOLEN_CC),
        (TcpOptionSet::CC_ECHO, TCPOLEN_CC),
        (TcpOptionSet::SACK_EDGE, TCPOLEN_SACK_EDGE),
    ] {
        if set.contains(option) {
            len += size;
        }
    }
    if tcp.md5 {
        len += TCPOLEN_MD5;
    }
    if tcp.auth {
        len += TCPOLEN_AO;
    }
    len
}

/// Bytes of options including padding to a 32-bit boundary
pub fn options_len(tcp: &TcpOptions) -> usize {
    (unpadded_len(tcp) + 3) & !3
}

/// Write every enabled option followed by NOP or EOL padding.
pub fn write_options(writer: &mut PacketWriter<'_>, tcp: &TcpOptions) {
    let set = tcp.options;
    let start = writer.position();

    if set.contains(TcpOptionSet::MSS) {
        writer
            .put_u8(TcpOptionKind::Mss as u8)
            .put_u8(TCPOLEN_MSS as u8)
            .put_u16(randomize_if_unset(tcp.mss));
    }
    if set.contains(TcpOptionSet::WSOPT) {
        writer
            .put_u8(TcpOptionKind::WindowScale as u8)
            .put_u8(TCPOLEN_WSOPT as u8)
            .put_u8(randomize_if_unset(tcp.wscale));
    }
    if set.contains(TcpOptionSet::TSOPT) {
        writer
            .put_u8(TcpOptionKind::Timestamp as u8)
            .put_u8(TCPOLEN_TSOPT as u8)
            .put_u32(randomize_if_unset(tcp.tsval))
            .put_u32(randomize_if_unset(tcp.tsecr));
    }
    if set.contains(TcpOptionSet::SACK_OK) {
        writer
            .put_u8(TcpOptionKind::SackPermitted as u8)
            .put_u8(TCPOLEN_SACK_OK as u8);
    }
    for (option, kind, value) in [
        (TcpOptionSet::CC, TcpOptionKind::Cc, tcp.cc),
        (TcpOptionSet::CC_NEW, TcpOptionKind::CcNew, tcp.cc_new),
        (TcpOptionSet::CC_ECHO, TcpOptionKind::CcEcho, tcp.cc_echo),
    ] {
        if set.contains(option) {
            writer
                .put_u8(kind as u8)
                .put_u8(TCPOLEN_CC as u8)
                .put_u32(randomize_if_unset(value));
        }
    }
    if set.contains(TcpOptionSet::SACK_EDGE) {
        writer
            .put_u8(TcpOptionKind::Sack as u8)
            .put_u8(TCPOLEN_SACK_EDGE as u8)
            .put_u32(randomize_if_unset(tcp.sack_left))
            .put_u32(randomize_if_unset(tcp.sack_right));
    }
    if tcp.md5 {
        writer
            .put_u8(TcpOptionKind::Md5Signature as u8)
            .put_u8(TCPOLEN_MD5 as u8)
            .put_random(DIGEST_LEN);
    }
    if tcp.auth {
        writer
            .put_u8(TcpOptionKind::Authentication as u8)
            .put_u8(TCPOLEN_AO as u8)
            .put_u8(tcp.key_id)
            .put_u8(tcp.next_key)
            .put_random(DIGEST_LEN);
    }

    let pad = if tcp.nop {
        TcpOptionKind::NoOperation
    } else {
        TcpOptionKind::EndOfList
    };
    while (writer.position() - start) % 4 != 0 {
        writer.put_u8(pad as u8);
    }
}
