//! Destination range derived from `target/bits`

use crate::{Error, Result};
use rand::Rng;
use std::net::Ipv4Addr;

/// Usable host range of a CIDR block.
///
/// Built once before the workers start and shared read-only. A host count of
/// zero means the destination is a single fixed address (/32).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cidr {
    target: Ipv4Addr,
    bits: u8,
    first: u32,
    hosts: u32,
}

impl Cidr {
    pub fn new(target: Ipv4Addr, bits: u8) -> Result<Self> {
        if bits > 32 {
            return Err(Error::invalid_config(
                "bits",
                "CIDR must be between 0 and 32",
            ));
        }

        let addr = u32::from(target);
        let (first, hosts) = match bits {
            32 => (addr, 0),
            // point-to-point link, both addresses usable (RFC 3021)
            31 => (addr & !1, 2),
            _ => {
                let host_bits = 32 - u32::from(bits);
                let mask = u32::MAX.checked_shl(host_bits).unwrap_or(0);
                let network = addr & mask;
                let span = 1u64 << host_bits;
                (network.wrapping_add(1), (span - 2) as u32)
            }
        };

        Ok(Self {
            target,
            bits,
            first,
            hosts,
        })
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Number of usable host identifiers, zero for a single address
    pub fn host_count(&self) -> u32 {
        self.hosts
    }

    /// First usable address
    pub fn first(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.first)
    }

    /// Whether each iteration should draw a fresh destination
    pub fn varies(&self) -> bool {
        self.hosts > 1
    }

    /// Draw a destination uniformly from the usable range.
    pub fn sample(&self) -> Ipv4Addr {
        self.sample_with(&mut rand::thread_rng())
    }

    pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Ipv4Addr {
        if self.hosts == 0 {
            return self.target;
        }
        Ipv4Addr::from(self.first.wrapping_add(rng.gen_range(0..self.hosts)))
    }

    /// Whether `addr` lies inside the sampled range
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        if self.hosts == 0 {
            return addr == self.target;
        }
        let offset = u32::from(addr).wrapping_sub(self.first);
        offset < self.hosts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slash_30() {
        let cidr = Cidr::new(Ipv4Addr::new(10, 0, 0, 0), 30).unwrap();
        assert_eq!(cidr.host_count(), 2);
        assert_eq!(cidr.first(), Ipv4Addr::new(10, 0, 0, 1));
        for _ in 0..100 {
            let addr = cidr.sample();
            assert!(addr == Ipv4Addr::new(10, 0, 0, 1) || addr == Ipv4Addr::new(10, 0, 0, 2));
        }
    }

    #[test]
    fn test_slash_24_from_host_address() {
        let cidr = Cidr::new(Ipv4Addr::new(192, 168, 7, 77), 24).unwrap();
        assert_eq!(cidr.host_count(), 254);
        assert_eq!(cidr.first(), Ipv4Addr::new(192, 168, 7, 1));
        assert!(cidr.varies());
    }

    #[test]
    fn test_slash_32_is_fixed() {
        let target = Ipv4Addr::new(172, 16, 0, 9);
        let cidr = Cidr::new(target, 32).unwrap();
        assert_eq!(cidr.host_count(), 0);
        assert!(!cidr.varies());
        for _ in 0..50 {
            assert_eq!(cidr.sample(), target);
        }
    }

    #[test]
    fn test_slash_31() {
        let cidr = Cidr::new(Ipv4Addr::new(10, 9, 8, 7), 31).unwrap();
        assert_eq!(cidr.host_count(), 2);
        assert_eq!(cidr.first(), Ipv4Addr::new(10, 9, 8, 6));
    }

    #[test]
    fn test_slash_0() {
        let cidr = Cidr::new(Ipv4Addr::new(1, 2, 3, 4), 0).unwrap();
        assert_eq!(cidr.host_count(), 0xFFFF_FFFE);
        assert_eq!(cidr.first(), Ipv4Addr::new(0, 0, 0, 1));
    }

    #[test]
    fn test_every_prefix_samples_within_network() {
        let target = Ipv4Addr::new(203, 0, 113, 200);
        for bits in 0..=32u8 {
            let cidr = Cidr::new(target, bits).unwrap();
            let mask = if bits == 0 { 0 } else { u32::MAX << (32 - u32::from(bits)) };
            let network = u32::from(target) & mask;
            for _ in 0..64 {
                let addr = cidr.sample();
                assert!(cidr.contains(addr), "/{} produced {}", bits, addr);
                assert_eq!(u32::from(addr) & mask, network, "/{} left the network", bits);
                if bits == 32 {
                    assert_eq!(addr, target);
                }
            }
        }
    }

    #[test]
    fn test_rejects_long_prefix() {
        assert!(Cidr::new(Ipv4Addr::new(10, 0, 0, 1), 33).is_err());
    }
}
