//! IPsec AH (RFC 4302) carrying an ESP (RFC 4303) header
//!
//! The IP protocol is AH; its next-header field points at ESP. Integrity
//! values and the ESP payload are opaque random bytes.

pub mod packet;

pub use packet::{build, AH_HEADER_LEN, ESP_HEADER_LEN};
