//! IGMP (Internet Group Management Protocol)
//!
//! Two modules share this code: IGMPv1 emits the fixed 8-byte header, IGMPv3
//! emits either a membership query or a single-record membership report
//! depending on the configured type.

pub mod packet;

pub use packet::{build_v1, build_v3, IgmpType, IGMP_V1_LEN};
