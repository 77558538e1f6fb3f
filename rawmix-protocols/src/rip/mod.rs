//! RIP (Routing Information Protocol)
//!
//! RIPv1 (RFC 1058) and RIPv2 (RFC 2453) responses with a single route
//! entry, sent from and to UDP port 520. RIPv2 may add RFC 2082 keyed MD5
//! authentication: an authentication entry ahead of the route and a digest
//! trailer after it.

pub mod packet;

pub use packet::{build_v1, build_v2, RipCommand, RIP_PORT};
