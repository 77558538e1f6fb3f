//! Checksum calculations for generated packets
//!
//! The Internet checksum (RFC 1071) covers IP, ICMP, IGMP, EGP, RSVP, GRE,
//! EIGRP and OSPF headers; TCP, UDP and DCCP add a pseudo-header. OSPF LSAs
//! use the Fletcher checksum instead.

use std::net::Ipv4Addr;

/// Calculates the Internet Checksum as defined in RFC 1071.
///
/// Big-endian 16-bit words are summed with end-around carry; an odd trailing
/// byte is padded with zero. The one's complement of the sum is returned.
///
/// # Examples
///
/// ```
/// use rawmix_packet::checksum::internet_checksum;
///
/// let header = [0x45, 0x00, 0x00, 0x1c];
/// let checksum = internet_checksum(&header);
/// ```
pub fn internet_checksum(data: &[u8]) -> u16 {
    !fold(checksum_accumulate(data, 0))
}

/// Checksum over several disjoint ranges, as if they were contiguous.
///
/// Every range except the last must have even length.
pub fn internet_checksum_parts(parts: &[&[u8]]) -> u16 {
    let sum = parts
        .iter()
        .fold(0u32, |acc, part| checksum_accumulate(part, acc));
    !fold(sum)
}

/// Calculates the checksum for a TCP, UDP or DCCP segment including the
/// pseudo-header. The pseudo-header is summed in place, nothing is copied.
pub fn transport_checksum(src: Ipv4Addr, dst: Ipv4Addr, protocol: u8, data: &[u8]) -> u16 {
    let length = data.len() as u16;
    let mut pseudo = [0u8; 12];
    pseudo[0..4].copy_from_slice(&src.octets());
    pseudo[4..8].copy_from_slice(&dst.octets());
    pseudo[9] = protocol;
    pseudo[10..12].copy_from_slice(&length.to_be_bytes());

    let sum = checksum_accumulate(&pseudo, 0);
    !fold(checksum_accumulate(data, sum))
}

/// Validates an Internet checksum.
///
/// Summing data that already carries its checksum yields 0 (or 0xFFFF, its
/// one's complement twin).
pub fn validate_checksum(data: &[u8]) -> bool {
    let result = internet_checksum(data);
    result == 0 || result == 0xFFFF
}

/// Adds `data` to a running sum without folding or complementing.
pub fn checksum_accumulate(data: &[u8], mut sum: u32) -> u32 {
    let mut chunks = data.chunks_exact(2);
    for chunk in &mut chunks {
        sum = sum.wrapping_add(u32::from(u16::from_be_bytes([chunk[0], chunk[1]])));
        // keep headroom so very long buffers never wrap
        if sum & 0x8000_0000 != 0 {
            sum = (sum & 0xFFFF) + (sum >> 16);
        }
    }

    if let Some(&byte) = chunks.remainder().first() {
        sum = sum.wrapping_add(u32::from(byte) << 8);
    }

    sum
}

fn fold(mut sum: u32) -> u16 {
    while (sum >> 16) != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    sum as u16
}

/// ISO 8473 Fletcher checksum as used by OSPF LSAs (RFC 2328 §12.1.7).
///
/// `data` starts at the LS options byte (the age field is excluded) and
/// `offset` is the position of the 16-bit checksum field inside it. The
/// returned value makes both running sums zero when stored at `offset`.
pub fn fletcher_checksum(data: &[u8], offset: usize) -> u16 {
    let mut c0: i32 = 0;
    let mut c1: i32 = 0;

    for (index, byte) in data.iter().enumerate() {
        let value = if index == offset || index == offset + 1 {
            0
        } else {
            i32::from(*byte)
        };
        c0 = (c0 + value) % 255;
        c1 = (c1 + c0) % 255;
    }

    let len = data.len() as i32;
    let pos = offset as i32;
    let mut x = ((len - pos - 1) * c0 - c1) % 255;
    if x <= 0 {
        x += 255;
    }
    let mut y = 510 - c0 - x;
    if y > 255 {
        y -= 255;
    }

    ((x as u16) << 8) | (y as u16 & 0xFF)
}
