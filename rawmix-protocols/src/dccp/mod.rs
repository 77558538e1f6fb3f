//! DCCP (Datagram Congestion Control Protocol, RFC 4340)
//!
//! Generic header with 24- or 48-bit sequence numbers followed by the
//! type-specific subheader (acknowledgement, service code, reset code).

pub mod packet;

pub use packet::{build, header_len, DccpType};
