//! ICMP (Internet Control Message Protocol)
//!
//! Echo-style header by default; redirects carry a gateway address in place
//! of the identifier and sequence.

pub mod packet;

pub use packet::{build, IcmpType, ICMP_HEADER_LEN};
