//! EIGRP (Enhanced Interior Gateway Routing Protocol, RFC 7868)
//!
//! Fixed header, an optional MD5 authentication TLV, then TLVs chosen by
//! opcode: an IP route (internal or external) for updates, queries and
//! replies; parameters and software version for hellos.

pub mod packet;
pub mod tlv;

pub use packet::{build, EigrpOpcode, EIGRP_HEADER_LEN, EIGRP_VERSION};
pub use tlv::EigrpTlvType;
