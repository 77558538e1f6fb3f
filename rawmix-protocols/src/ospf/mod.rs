//! OSPFv2 (Open Shortest Path First, RFC 2328)
//!
//! All five packet types. LS Update carries one complete LSA; DD and LS Ack
//! carry LSA headers. Cryptographic authentication appends a digest after the
//! packet, and with the L option Hello and DD packets end in an RFC 5613
//! link-local signaling block.

pub mod lls;
pub mod lsa;
pub mod packet;

pub use lsa::OspfLsaType;
pub use packet::{build, OspfPacketType, OSPF_HEADER_LEN, OSPF_VERSION};
