//! rawmix core library
//!
//! Configuration record, error type, destination range sampling and the
//! random-substitution helpers shared by every packet builder.

pub mod cidr;
pub mod config;
pub mod error;
pub mod random;

pub use cidr::Cidr;
pub use config::{Config, GreFlags, ProtocolSelection, TcpFlags, TcpOptionSet};
pub use error::{Error, Result};
pub use random::{randomize_addr_if_unset, randomize_if_unset};
