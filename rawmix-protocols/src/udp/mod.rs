//! UDP (User Datagram Protocol)
//!
//! Header only. [`write_header`] is shared with the RIP modules, which ride
//! on UDP port 520.

pub mod packet;

pub use packet::{build, write_header, UDP_HEADER_LEN};
