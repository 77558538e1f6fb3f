//! Random substitution for unset header fields
//!
//! Every value here comes from `rand::thread_rng()`, which is seeded once per
//! thread from OS entropy, so workers never share generator state.

use rand::distributions::{Distribution, Standard};
use rand::Rng;
use std::net::Ipv4Addr;

/// Returns `value` unchanged unless it is the type's zero value, in which case
/// a fresh random value of the same width is returned.
pub fn randomize_if_unset<T>(value: T) -> T
where
    T: Default + PartialEq,
    Standard: Distribution<T>,
{
    if value == T::default() {
        rand::thread_rng().gen()
    } else {
        value
    }
}

/// Address flavour of [`randomize_if_unset`]: `0.0.0.0` becomes a random address.
pub fn randomize_addr_if_unset(addr: Ipv4Addr) -> Ipv4Addr {
    if addr.is_unspecified() {
        Ipv4Addr::from(rand::thread_rng().gen::<u32>())
    } else {
        addr
    }
}

/// Unset netmasks become a random contiguous mask between /8 and /30.
pub fn randomize_netmask_if_unset(mask: Ipv4Addr) -> Ipv4Addr {
    if mask.is_unspecified() {
        let shift = 8 + rand::thread_rng().gen_range(0..23u32);
        Ipv4Addr::from(!(u32::MAX >> shift))
    } else {
        mask
    }
}

/// A random value, used for bogus checksums and opaque payload words.
pub fn random<T>() -> T
where
    Standard: Distribution<T>,
{
    rand::thread_rng().gen()
}

/// Fill `buf` with random bytes.
pub fn fill_random(buf: &mut [u8]) {
    rand::thread_rng().fill(buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_values_pass_through() {
        assert_eq!(randomize_if_unset(42u8), 42);
        assert_eq!(randomize_if_unset(0xBEEFu16), 0xBEEF);
        assert_eq!(randomize_if_unset(7u32), 7);
        let addr = Ipv4Addr::new(10, 1, 2, 3);
        assert_eq!(randomize_addr_if_unset(addr), addr);
    }

    #[test]
    fn test_unset_u8_covers_range() {
        let mut seen = [false; 256];
        for _ in 0..20_000 {
            seen[randomize_if_unset(0u8) as usize] = true;
        }
        // 20k draws over 256 buckets leave a bucket empty with negligible odds
        assert!(seen.iter().all(|hit| *hit));
    }

    #[test]
    fn test_unset_u32_spreads() {
        let draws: Vec<u32> = (0..1000).map(|_| randomize_if_unset(0u32)).collect();
        assert!(draws.iter().any(|v| *v > u32::MAX / 2));
        assert!(draws.iter().any(|v| *v < u32::MAX / 2));
        let mut unique = draws.clone();
        unique.sort_unstable();
        unique.dedup();
        assert!(unique.len() > 990);
    }

    #[test]
    fn test_unset_address_is_random() {
        let a = randomize_addr_if_unset(Ipv4Addr::UNSPECIFIED);
        let b = randomize_addr_if_unset(Ipv4Addr::UNSPECIFIED);
        let c = randomize_addr_if_unset(Ipv4Addr::UNSPECIFIED);
        assert!(a != b || b != c);
    }

    #[test]
    fn test_random_netmask_is_contiguous() {
        for _ in 0..200 {
            let mask = u32::from(randomize_netmask_if_unset(Ipv4Addr::UNSPECIFIED));
            let prefix = mask.leading_ones();
            assert!((8..=30).contains(&prefix));
            assert_eq!(mask.count_ones(), prefix);
        }
        let fixed = Ipv4Addr::new(255, 255, 0, 0);
        assert_eq!(randomize_netmask_if_unset(fixed), fixed);
    }

    #[test]
    fn test_fill_random() {
        let mut buf = [0u8; 64];
        fill_random(&mut buf);
        assert!(buf.iter().any(|b| *b != 0));
    }
}
