//! Protocol builders and module registry for rawmix
//!
//! Each protocol module exposes a [`BuildFn`] that writes one complete
//! packet (outer IPv4 header, optional GRE, protocol headers, checksums)
//! into a worker's [`PacketBuffer`](rawmix_packet::PacketBuffer).
//!
//! ## Available Modules
//!
//! | Acronym | IP protocol | Module |
//! |---------|-------------|--------|
//! | ICMP    | 1           | [`icmp`] |
//! | IGMPv1  | 2           | [`igmp`] |
//! | IGMPv3  | 2           | [`igmp`] |
//! | TCP     | 6           | [`tcp`] |
//! | EGP     | 8           | [`egp`] |
//! | UDP     | 17          | [`udp`] |
//! | RIPv1   | 17          | [`rip`] |
//! | RIPv2   | 17          | [`rip`] |
//! | DCCP    | 33          | [`dccp`] |
//! | RSVP    | 46          | [`rsvp`] |
//! | IPSEC   | 51          | [`ipsec`] |
//! | EIGRP   | 88          | [`eigrp`] |
//! | OSPF    | 89          | [`ospf`] |
//!
//! With GRE encapsulation on, the outer header carries protocol 47 and the
//! number above moves to the inner header.

pub mod builder;
pub mod registry;

pub mod dccp;
pub mod egp;
pub mod eigrp;
pub mod icmp;
pub mod igmp;
pub mod ipsec;
pub mod ospf;
pub mod rip;
pub mod rsvp;
pub mod tcp;
pub mod udp;

pub use builder::{BuildContext, BuildFn};
pub use registry::{ActiveModules, ModuleDescriptor, ModuleRegistry, MODULES};
