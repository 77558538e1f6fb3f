//! Link-Local Signaling block (RFC 5613)

use rawmix_core::config::OspfOptions;
use rawmix_core::random::random;
use rawmix_packet::checksum::internet_checksum;
use rawmix_packet::PacketWriter;

/// Checksum and length words
pub const LLS_HEADER_LEN: usize = 4;
/// Extended Options TLV
pub const LLS_EO_TLV_LEN: usize = 8;
/// Cryptographic Authentication TLV: sequence number and digest
pub const LLS_CA_TLV_LEN: usize = 24;

const LLS_TLV_EXTENDED_OPTIONS: u16 = 1;
const LLS_TLV_CRYPTO_AUTH: u16 = 2;
const DIGEST_LEN: usize = 16;

pub fn block_len(ospf: &OspfOptions) -> usize {
    let mut len = LLS_HEADER_LEN + LLS_EO_TLV_LEN;
    if ospf.auth {
        len += LLS_CA_TLV_LEN;
    }
    len
}

/// Write the block; `sequence` is the one the OSPF header's crypto auth used.
pub fn write_block(
    writer: &mut PacketWriter<'_>,
    ospf: &OspfOptions,
    sequence: u32,
    bogus: bool,
) {
    let start = writer.position();
    let len = block_len(ospf);

    writer
        .put_u16(0)
        .put_u16((len / 4) as u16)
        .put_u16(LLS_TLV_EXTENDED_OPTIONS)
        .put_u16(4)
        .put_u32(ospf.lls_options);
    if ospf.auth {
        writer
            .put_u16(LLS_TLV_CRYPTO_AUTH)
            .put_u16((LLS_CA_TLV_LEN - 4) as u16)
            .put_u32(sequence)
            .put_random(DIGEST_LEN);
    }

    let checksum = if bogus {
        random()
    } else {
        internet_checksum(writer.written_since(start))
    };
    writer.patch_u16(start, checksum);
}
