//! EGP (Exterior Gateway Protocol, RFC 904)

pub mod packet;

pub use packet::{build, EgpType, EGP_HEADER_LEN, EGP_VERSION};
