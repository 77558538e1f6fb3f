//! Packet sending engine for rawmix
//!
//! This crate drives the protocol builders against a raw socket:
//!
//! - `SocketManager`: the one shared raw IPv4 socket, with send retries
//! - `Worker`: per-thread build/send state machine
//! - `WorkerPool`: threshold balancing, thread spawn and join
//! - `RunCounters` / `RunSummary`: what was sent
//!
//! # Example
//!
//! ```no_run
//! use std::net::Ipv4Addr;
//! use std::sync::Arc;
//! use rawmix_core::{Cidr, Config};
//! use rawmix_engine::{SocketManager, WorkerPool};
//! use rawmix_protocols::ModuleRegistry;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         target: Ipv4Addr::new(192, 0, 2, 1),
//!         ..Config::default()
//!     };
//!     let cidr = Cidr::new(config.target, config.bits)?;
//!     let socket = Arc::new(SocketManager::open()?);
//!
//!     let pool = WorkerPool::spawn(Arc::new(config), cidr, ModuleRegistry::builtin(), socket)?;
//!     let summary = pool.wait()?;
//!     println!("{} packets", summary.packets_sent);
//!     Ok(())
//! }
//! ```

pub mod pool;
pub mod socket;
pub mod stats;
pub mod worker;

pub use pool::{balance_thresholds, worker_quotas, WorkerPool};
pub use socket::{RawSocket, SocketManager, Transmit, MAX_SEND_ATTEMPTS};
pub use stats::{RunCounters, RunSummary};
pub use worker::{RunContext, Worker, WorkerState};
