//! EGP Packet Construction

use crate::builder::{prepare, BuildContext};
use rawmix_core::random::randomize_if_unset;
use rawmix_packet::PacketBuffer;

pub const EGP_VERSION: u8 = 2;
/// Header plus the hello/poll intervals of a neighbor acquisition message
pub const EGP_HEADER_LEN: usize = 14;

/// EGP Message Types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EgpType {
    Update = 1,
    Poll = 2,
    NeighborAcquisition = 3,
    NeighborReachability = 5,
    Error = 8,
}

pub fn build(ctx: &BuildContext<'_>, buffer: &mut PacketBuffer) -> usize {
    let egp = &ctx.config.egp;
    let mut frame = prepare(ctx, buffer, EGP_HEADER_LEN);

    frame
        .writer()
        .put_u8(EGP_VERSION)
        .put_u8(egp.egp_type)
        .put_u8(egp.code)
        .put_u8(egp.status)
        .put_u16(0)
        .put_u16(randomize_if_unset(egp.autonomous_system))
        .put_u16(randomize_if_unset(egp.sequence))
        .put_u16(randomize_if_unset(egp.hello))
        .put_u16(randomize_if_unset(egp.poll));

    frame.checksum(ctx.config, 4);
    frame.finish(ctx.config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::testing::*;
    use rawmix_packet::checksum::validate_checksum;
    use rawmix_packet::IpProtocol;

    #[test]
    fn test_neighbor_acquisition() {
        let mut config = config();
        config.egp.autonomous_system = 65001;
        config.egp.hello = 30;
        config.egp.poll = 120;

        let packet = build_checked(build, &config, IpProtocol::EGP);
        assert_eq!(packet.len(), 34);
        let egp = body(&packet);
        assert_eq!(egp[0], EGP_VERSION);
        assert_eq!(egp[1], EgpType::NeighborAcquisition as u8);
        assert_eq!(egp[2], 3);
        assert_eq!(egp[3], 1);
        assert_eq!(word(egp, 6), 65001);
        assert_eq!(word(egp, 10), 30);
        assert_eq!(word(egp, 12), 120);
        assert!(validate_checksum(egp));
    }
}
