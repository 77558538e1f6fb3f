//! TCP (Transmission Control Protocol)
//!
//! A single segment with no payload. Any combination of the classic options
//! (MSS, window scale, timestamps, SACK, T/TCP connection counts) and one of
//! the signature options (MD5 or TCP-AO) may be appended.

pub mod options;
pub mod packet;

pub use options::{options_len, TcpOptionKind};
pub use packet::{build, TCP_HEADER_LEN};
