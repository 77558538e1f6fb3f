//! AH/ESP Packet Construction

use crate::builder::{prepare, BuildContext};
use rawmix_core::random::randomize_if_unset;
use rawmix_packet::{IpProtocol, PacketBuffer};

/// Fixed AH fields plus a 96-bit ICV
pub const AH_HEADER_LEN: usize = 12 + AH_ICV_LEN;
pub const AH_ICV_LEN: usize = 12;
/// SPI and sequence number followed by eight bytes of ciphertext
pub const ESP_HEADER_LEN: usize = 8 + ESP_DATA_LEN;
pub const ESP_DATA_LEN: usize = 8;

/// AH payload length: header size in 32-bit words minus two
const AH_PAYLOAD_LEN: u8 = (AH_HEADER_LEN / 4 - 2) as u8;

pub fn build(ctx: &BuildContext<'_>, buffer: &mut PacketBuffer) -> usize {
    let ipsec = &ctx.config.ipsec;
    let payload_len = if ipsec.ah_length != 0 {
        ipsec.ah_length
    } else {
        AH_PAYLOAD_LEN
    };

    let mut frame = prepare(ctx, buffer, AH_HEADER_LEN + ESP_HEADER_LEN);
    frame
        .writer()
        .put_u8(IpProtocol::ESP.to_u8())
        .put_u8(payload_len)
        .put_u16(0)
        .put_u32(randomize_if_unset(ipsec.ah_spi))
        .put_u32(randomize_if_unset(ipsec.ah_sequence))
        .put_random(AH_ICV_LEN)
        .put_u32(randomize_if_unset(ipsec.esp_spi))
        .put_u32(randomize_if_unset(ipsec.esp_sequence))
        .put_random(ESP_DATA_LEN);

    frame.finish(ctx.config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::testing::*;

    #[test]
    fn test_ah_then_esp() {
        let mut config = config();
        config.ipsec.ah_spi = 0x100;
        config.ipsec.ah_sequence = 1;
        config.ipsec.esp_spi = 0x200;
        config.ipsec.esp_sequence = 2;

        let packet = build_checked(build, &config, IpProtocol::AH);
        assert_eq!(packet.len(), 20 + 24 + 16);
        let ah = body(&packet);
        assert_eq!(ah[0], 50);
        assert_eq!(ah[1], 4);
        assert_eq!(word(ah, 2), 0);
        assert_eq!(dword(ah, 4), 0x100);
        assert_eq!(dword(ah, 8), 1);
        assert_eq!(dword(ah, 24), 0x200);
        assert_eq!(dword(ah, 28), 2);
    }

    #[test]
    fn test_payload_length_override() {
        let mut config = config();
        config.ipsec.ah_length = 9;
        let packet = build_checked(build, &config, IpProtocol::AH);
        assert_eq!(body(&packet)[1], 9);
    }
}
