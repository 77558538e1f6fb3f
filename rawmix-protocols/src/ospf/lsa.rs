//! OSPF Link State Advertisements
//!
//! The LSA header is shared by DD, LS Update and LS Ack packets; only LS
//! Update carries the body. The LSA checksum is the Fletcher checksum over
//! everything but the age field.

use rawmix_core::config::OspfOptions;
use rawmix_core::random::{
    random, randomize_addr_if_unset, randomize_if_unset, randomize_netmask_if_unset,
};
use rawmix_packet::checksum::fletcher_checksum;
use rawmix_packet::PacketWriter;

pub const LSA_HEADER_LEN: usize = 20;
/// Checksum position inside the LSA header
const LSA_CHECKSUM_OFFSET: usize = 16;
/// Age is excluded from the checksum
const LSA_AGE_LEN: usize = 2;
const DO_NOT_AGE: u16 = 0x8000;
/// External metric type 2 ("larger than any internal metric")
const EXTERNAL_E_BIT: u8 = 0x80;

/// OSPF LSA Types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OspfLsaType {
    RouterLsa = 1,
    NetworkLsa = 2,
    SummaryLsa = 3,
    AsbrSummaryLsa = 4,
    ExternalLsa = 5,
    GroupMembershipLsa = 6,
    NssaLsa = 7,
}

impl OspfLsaType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::RouterLsa),
            2 => Some(Self::NetworkLsa),
            3 => Some(Self::SummaryLsa),
            4 => Some(Self::AsbrSummaryLsa),
            5 => Some(Self::ExternalLsa),
            6 => Some(Self::GroupMembershipLsa),
            7 => Some(Self::NssaLsa),
            _ => None,
        }
    }
}

/// Body size for an LSA type; unknown types carry the header only.
pub fn body_len(lsa_type: u8) -> usize {
    match OspfLsaType::from_u8(lsa_type) {
        Some(OspfLsaType::RouterLsa) => 16,
        Some(OspfLsaType::NetworkLsa) => 8,
        Some(OspfLsaType::SummaryLsa | OspfLsaType::AsbrSummaryLsa) => 8,
        Some(OspfLsaType::ExternalLsa | OspfLsaType::NssaLsa) => 16,
        Some(OspfLsaType::GroupMembershipLsa) => 8,
        None => 0,
    }
}

pub fn lsa_len(ospf: &OspfOptions, with_body: bool) -> usize {
    if with_body {
        LSA_HEADER_LEN + body_len(ospf.lsa_type)
    } else {
        LSA_HEADER_LEN
    }
}

/// Write an LSA header, its body when `with_body` is set, then patch in the
/// Fletcher checksum (random under `bogus`).
pub fn write_lsa(writer: &mut PacketWriter<'_>, ospf: &OspfOptions, with_body: bool, bogus: bool) {
    let start = writer.position();
    let age = if ospf.lsa_do_not_age {
        ospf.lsa_age | DO_NOT_AGE
    } else {
        ospf.lsa_age
    };

    writer
        .put_u16(age)
        .put_u8(ospf.options)
        .put_u8(ospf.lsa_type)
        .put_addr(randomize_addr_if_unset(ospf.lsa_id))
        .put_addr(randomize_addr_if_unset(ospf.lsa_router))
        .put_u32(randomize_if_unset(ospf.lsa_sequence))
        .put_u16(0)
        .put_u16(lsa_len(ospf, with_body) as u16);
    if with_body {
        write_body(writer, ospf);
    }

    let checksum = if bogus {
        random()
    } else {
        let lsa = writer.written_since(start);
        fletcher_checksum(
            &lsa[LSA_AGE_LEN..],
            LSA_CHECKSUM_OFFSET - LSA_AGE_LEN,
        )
    };
    writer.patch_u16(start + LSA_CHECKSUM_OFFSET, checksum);
}

fn write_body(writer: &mut PacketWriter<'_>, ospf: &OspfOptions) {
    let metric = randomize_if_unset(ospf.lsa_metric);
    match OspfLsaType::from_u8(ospf.lsa_type) {
        Some(OspfLsaType::RouterLsa) => {
            writer
                .put_u8(ospf.lsa_flags)
                .put_u8(0)
                // one link
                .put_u16(1)
                .put_addr(randomize_addr_if_unset(ospf.lsa_link_id))
                .put_addr(randomize_addr_if_unset(ospf.lsa_link_data))
                .put_u8(ospf.lsa_link_type)
                .put_u8(0)
                .put_u16(metric as u16);
        }
        Some(OspfLsaType::NetworkLsa) => {
            writer
                .put_addr(randomize_netmask_if_unset(ospf.netmask))
                .put_addr(randomize_addr_if_unset(ospf.lsa_attached));
        }
        Some(OspfLsaType::SummaryLsa | OspfLsaType::AsbrSummaryLsa) => {
            writer
                .put_addr(randomize_netmask_if_unset(ospf.netmask))
                .put_u8(0)
                .put_u24(metric);
        }
        Some(OspfLsaType::ExternalLsa | OspfLsaType::NssaLsa) => {
            let e_bit = if ospf.lsa_larger { EXTERNAL_E_BIT } else { 0 };
            writer
                .put_addr(randomize_netmask_if_unset(ospf.netmask))
                .put_u8(e_bit)
                .put_u24(metric)
                .put_addr(randomize_addr_if_unset(ospf.lsa_forward))
                .put_addr(randomize_addr_if_unset(ospf.lsa_external));
        }
        Some(OspfLsaType::GroupMembershipLsa) => {
            writer
                .put_u32(randomize_if_unset(ospf.vertex_type))
                .put_addr(randomize_addr_if_unset(ospf.vertex_id));
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// RFC 2328 12.1.7: a valid LSA sums to zero under both Fletcher sums
    fn fletcher_ok(lsa: &[u8]) -> bool {
        let (mut c0, mut c1) = (0u32, 0u32);
        for byte in &lsa[LSA_AGE_LEN..] {
            c0 = (c0 + u32::from(*byte)) % 255;
            c1 = (c1 + c0) % 255;
        }
        c0 == 0 && c1 == 0
    }

    fn write(ospf: &OspfOptions, with_body: bool) -> Vec<u8> {
        let mut buf = vec![0u8; lsa_len(ospf, with_body)];
        let mut writer = PacketWriter::new(&mut buf);
        write_lsa(&mut writer, ospf, with_body, false);
        assert_eq!(writer.remaining(), 0);
        buf
    }

    #[test]
    fn test_body_sizes() {
        assert_eq!(body_len(1), 16);
        assert_eq!(body_len(2), 8);
        assert_eq!(body_len(4), 8);
        assert_eq!(body_len(7), 16);
        assert_eq!(body_len(6), 8);
        assert_eq!(body_len(42), 0);
    }

    #[test]
    fn test_every_type_checksums() {
        for lsa_type in 1..=8 {
            let ospf = OspfOptions {
                lsa_type,
                ..OspfOptions::default()
            };
            let lsa = write(&ospf, true);
            assert_eq!(usize::from(u16::from_be_bytes([lsa[18], lsa[19]])), lsa.len());
            assert!(fletcher_ok(&lsa), "type {lsa_type}");
        }
    }

    #[test]
    fn test_header_only() {
        let ospf = OspfOptions {
            lsa_do_not_age: true,
            lsa_type: 5,
            ..OspfOptions::default()
        };
        let lsa = write(&ospf, false);
        assert_eq!(lsa.len(), LSA_HEADER_LEN);
        assert_eq!(u16::from_be_bytes([lsa[0], lsa[1]]), 360 | DO_NOT_AGE);
        assert_eq!(lsa[3], 5);
        assert!(fletcher_ok(&lsa));
    }

    #[test]
    fn test_external_larger_metric() {
        let ospf = OspfOptions {
            lsa_type: OspfLsaType::ExternalLsa as u8,
            lsa_larger: true,
            lsa_metric: 20,
            ..OspfOptions::default()
        };
        let lsa = write(&ospf, true);
        assert_eq!(lsa[24], EXTERNAL_E_BIT);
        assert_eq!(&lsa[25..28], &[0, 0, 20]);
    }
}
