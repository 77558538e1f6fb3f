//! Packet construction primitives for rawmix
//!
//! This crate provides the pieces every protocol builder shares:
//!
//! - [`buffer`] - per-worker growable packet buffer
//! - [`writer`] - big-endian cursor over a granted region
//! - [`checksum`] - Internet (RFC 1071) and Fletcher checksums
//! - [`ip`] - outer IPv4 header
//! - [`gre`] - optional GRE encapsulation with an inner IPv4 header
//!
//! # Example
//!
//! ```rust
//! use std::net::Ipv4Addr;
//! use rawmix_core::config::IpOptions;
//! use rawmix_packet::{IpProtocol, Ipv4Header, PacketBuffer, IPV4_HEADER_LEN};
//!
//! let mut buffer = PacketBuffer::new();
//! let packet = buffer.grant(IPV4_HEADER_LEN + 8);
//! let mut header = Ipv4Header::from_options(
//!     &IpOptions::default(),
//!     IpProtocol::ICMP,
//!     Ipv4Addr::new(192, 0, 2, 1),
//!     IPV4_HEADER_LEN + 8,
//! );
//! header.write(packet, false);
//! ```

pub mod buffer;
pub mod checksum;
pub mod gre;
pub mod ip;
pub mod writer;

pub use buffer::PacketBuffer;
pub use checksum::{internet_checksum, transport_checksum};
pub use gre::gre_header_size;
pub use ip::{IpProtocol, Ipv4Header, IPV4_HEADER_LEN};
pub use writer::PacketWriter;
