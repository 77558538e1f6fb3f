//! Packet-generating worker
//!
//! Each worker owns its packet buffer and runs a small state machine:
//!
//! ```text
//! Idle --(quota left or flood)--> Building --> Sending --> Idle
//!   \--(quota spent)--> Done
//! ```
//!
//! Everything else a worker touches (configuration, destination range,
//! registry, socket, counters) is shared read-only through [`RunContext`].

use crate::socket::{SocketManager, Transmit};
use crate::stats::RunCounters;
use rawmix_core::{Cidr, Config, Error};
use rawmix_packet::PacketBuffer;
use rawmix_protocols::{ActiveModules, BuildContext, ModuleRegistry};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// State shared by every worker of a run
pub struct RunContext<T: Transmit> {
    pub config: Arc<Config>,
    pub cidr: Cidr,
    pub registry: ModuleRegistry,
    pub active: ActiveModules,
    pub socket: Arc<SocketManager<T>>,
    pub counters: Arc<RunCounters>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Building,
    /// A packet of `len` bytes from registry entry `module` is ready
    Sending { module: usize, len: usize },
    Done,
}

pub struct Worker<T: Transmit> {
    index: usize,
    shared: Arc<RunContext<T>>,
    /// Packets left to send; ignored when flooding
    quota: u64,
    /// Next registry entry in mixed mode
    cursor: usize,
    destination: Ipv4Addr,
    buffer: PacketBuffer,
    state: WorkerState,
}

impl<T: Transmit> Worker<T> {
    pub fn new(index: usize, shared: Arc<RunContext<T>>, quota: u64) -> Self {
        let destination = shared.cidr.sample();
        Self {
            index,
            shared,
            quota,
            cursor: 0,
            destination,
            buffer: PacketBuffer::new(),
            state: WorkerState::Idle,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn quota(&self) -> u64 {
        self.quota
    }

    /// Run until the quota is spent or the socket goes away.
    pub fn run(mut self) {
        debug!(worker = self.index, quota = self.quota, "worker started");
        while self.step() != WorkerState::Done {}
        debug!(worker = self.index, "worker finished");
    }

    /// Advance the state machine by one transition.
    pub fn step(&mut self) -> WorkerState {
        self.state = match self.state {
            WorkerState::Idle => {
                if self.shared.config.flood || self.quota > 0 {
                    WorkerState::Building
                } else {
                    WorkerState::Done
                }
            }
            WorkerState::Building => self.build(),
            WorkerState::Sending { module, len } => self.send(module, len),
            WorkerState::Done => WorkerState::Done,
        };
        self.state
    }

    fn next_module(&mut self) -> usize {
        match self.shared.active {
            ActiveModules::Single(index) => index,
            ActiveModules::All => {
                let index = self.cursor;
                self.cursor = (self.cursor + 1) % self.shared.registry.count().max(1);
                index
            }
        }
    }

    fn build(&mut self) -> WorkerState {
        if self.shared.cidr.varies() {
            self.destination = self.shared.cidr.sample();
        }

        let index = self.next_module();
        let Some(module) = self.shared.registry.lookup(index) else {
            warn!(worker = self.index, index, "no module at registry index");
            return WorkerState::Done;
        };

        let ctx = BuildContext::new(&self.shared.config, module.protocol, self.destination);
        let len = (module.build)(&ctx, &mut self.buffer);
        trace!(
            worker = self.index,
            module = module.acronym,
            destination = %self.destination,
            len,
            "packet built"
        );
        WorkerState::Sending { module: index, len }
    }

    fn send(&mut self, module: usize, len: usize) -> WorkerState {
        let packet = &self.buffer.as_slice()[..len];
        match self.shared.socket.send(packet, self.destination) {
            Ok(()) => self.shared.counters.record_sent(module, len),
            Err(Error::SocketClosed) => {
                debug!(worker = self.index, "socket closed, stopping");
                return WorkerState::Done;
            }
            Err(err) => {
                self.shared.counters.record_failure();
                warn!(worker = self.index, error = %err, "send failed");
            }
        }

        if !self.shared.config.flood {
            self.quota = self.quota.saturating_sub(1);
        }
        WorkerState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use rawmix_core::config::ProtocolSelection;
    use std::io;

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<(Ipv4Addr, usize)>>,
    }

    impl Transmit for Arc<Recorder> {
        fn transmit(&self, packet: &[u8], destination: Ipv4Addr) -> io::Result<usize> {
            self.sent.lock().push((destination, packet.len()));
            Ok(packet.len())
        }
    }

    fn context(config: Config, recorder: &Arc<Recorder>) -> Arc<RunContext<Arc<Recorder>>> {
        let registry = ModuleRegistry::builtin();
        let active = registry.resolve(&config.selection).unwrap();
        let cidr = Cidr::new(config.target, config.bits).unwrap();
        Arc::new(RunContext {
            config: Arc::new(config),
            cidr,
            registry,
            active,
            socket: Arc::new(SocketManager::with_transmitter(Arc::clone(recorder))),
            counters: Arc::new(RunCounters::new(registry.count())),
        })
    }

    fn config() -> Config {
        let mut config = Config {
            target: Ipv4Addr::new(192, 0, 2, 10),
            ..Config::default()
        };
        config.ip.source = Ipv4Addr::new(192, 0, 2, 99);
        config
    }

    #[test]
    fn test_state_transitions() {
        let recorder = Arc::new(Recorder::default());
        let mut worker = Worker::new(0, context(config(), &recorder), 1);

        assert_eq!(worker.state(), WorkerState::Idle);
        assert_eq!(worker.step(), WorkerState::Building);
        assert!(matches!(
            worker.step(),
            WorkerState::Sending { module: 3, len } if len >= 40
        ));
        assert_eq!(worker.step(), WorkerState::Idle);
        assert_eq!(worker.quota(), 0);
        assert_eq!(worker.step(), WorkerState::Done);
        assert_eq!(worker.step(), WorkerState::Done);

        let sent = recorder.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, Ipv4Addr::new(192, 0, 2, 10));
    }

    #[test]
    fn test_zero_quota_sends_nothing() {
        let recorder = Arc::new(Recorder::default());
        Worker::new(0, context(config(), &recorder), 0).run();
        assert!(recorder.sent.lock().is_empty());
    }

    #[test]
    fn test_mixed_mode_cycles_registry() {
        let recorder = Arc::new(Recorder::default());
        let mut config = config();
        config.selection = ProtocolSelection::Mixed;
        let shared = context(config, &recorder);
        let counters = Arc::clone(&shared.counters);

        Worker::new(0, shared, 26).run();

        let summary = counters.summarize(&ModuleRegistry::builtin(), Default::default());
        assert_eq!(summary.packets_sent, 26);
        assert_eq!(summary.per_module.len(), 13);
        assert!(summary.per_module.iter().all(|(_, count)| *count == 2));
    }

    #[test]
    fn test_closed_socket_stops_flood() {
        let recorder = Arc::new(Recorder::default());
        let mut config = config();
        config.flood = true;
        let shared = context(config, &recorder);
        shared.socket.close();

        Worker::new(0, Arc::clone(&shared), 0).run();
        assert!(recorder.sent.lock().is_empty());
        assert_eq!(
            shared.counters.send_failures.load(std::sync::atomic::Ordering::Relaxed),
            0
        );
    }
}
