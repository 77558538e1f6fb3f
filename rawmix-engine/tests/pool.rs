//! Worker pool runs against an in-memory transmitter

use parking_lot::Mutex;
use rawmix_core::config::ProtocolSelection;
use rawmix_core::{Cidr, Config, Error};
use rawmix_engine::{SocketManager, Transmit, WorkerPool};
use rawmix_packet::{IpProtocol, Ipv4Header};
use rawmix_protocols::ModuleRegistry;
use std::io;
use std::net::Ipv4Addr;
use std::sync::Arc;

/// Records every datagram; optionally refuses packets to one address.
#[derive(Default)]
struct Recorder {
    sent: Mutex<Vec<(Ipv4Addr, Vec<u8>)>>,
    unreachable: Option<Ipv4Addr>,
}

struct Shared(Arc<Recorder>);

impl Transmit for Shared {
    fn transmit(&self, packet: &[u8], destination: Ipv4Addr) -> io::Result<usize> {
        if self.0.unreachable == Some(destination) {
            return Err(io::Error::from_raw_os_error(101)); // ENETUNREACH
        }
        self.0.sent.lock().push((destination, packet.to_vec()));
        Ok(packet.len())
    }
}

fn config(target: Ipv4Addr, bits: u8) -> Config {
    let mut config = Config {
        target,
        bits,
        ..Config::default()
    };
    config.ip.source = Ipv4Addr::new(198, 51, 100, 7);
    config
}

fn run(config: Config, recorder: &Arc<Recorder>) -> rawmix_core::Result<rawmix_engine::RunSummary> {
    let registry = ModuleRegistry::builtin();
    config.validate(registry.count())?;
    let cidr = Cidr::new(config.target, config.bits)?;
    let socket = Arc::new(SocketManager::with_transmitter(Shared(Arc::clone(recorder))));
    WorkerPool::spawn(Arc::new(config), cidr, registry, socket)?.wait()
}

#[test]
fn test_threshold_over_small_network() {
    let recorder = Arc::new(Recorder::default());
    let mut config = config(Ipv4Addr::new(10, 0, 0, 0), 30);
    config.threshold = 4;

    let summary = run(config, &recorder).unwrap();
    assert_eq!(summary.packets_sent, 4);
    assert!(summary.is_clean());

    let sent = recorder.sent.lock();
    assert_eq!(sent.len(), 4);
    for (destination, packet) in sent.iter() {
        assert!(
            *destination == Ipv4Addr::new(10, 0, 0, 1) || *destination == Ipv4Addr::new(10, 0, 0, 2),
            "{destination}"
        );
        let header = Ipv4Header::parse(packet).unwrap();
        assert_eq!(header.destination, *destination);
        assert_eq!(header.protocol, IpProtocol::TCP);
    }
}

#[test]
fn test_threshold_split_across_threads() {
    let recorder = Arc::new(Recorder::default());
    let mut config = config(Ipv4Addr::new(192, 0, 2, 1), 32);
    config.threshold = 11;
    config.threads = 4;
    config.selection = ProtocolSelection::Single("udp".into());

    let summary = run(config, &recorder).unwrap();
    assert_eq!(summary.packets_sent, 11);
    assert_eq!(summary.sent_by("UDP"), 11);
    assert!(recorder
        .sent
        .lock()
        .iter()
        .all(|(destination, _)| *destination == Ipv4Addr::new(192, 0, 2, 1)));
}

#[test]
fn test_mixed_mode_hits_every_module() {
    let recorder = Arc::new(Recorder::default());
    let mut config = config(Ipv4Addr::new(192, 0, 2, 1), 32);
    config.threshold = 26;
    config.selection = ProtocolSelection::Mixed;

    let summary = run(config, &recorder).unwrap();
    assert_eq!(summary.packets_sent, 26);
    for module in ModuleRegistry::builtin().iter() {
        assert_eq!(summary.sent_by(module.acronym), 2, "{}", module.acronym);
    }

    // a single worker walks the registry in order
    let registry = ModuleRegistry::builtin();
    let protocols: Vec<_> = recorder
        .sent
        .lock()
        .iter()
        .map(|(_, packet)| Ipv4Header::parse(packet).unwrap().protocol)
        .collect();
    let expected: Vec<_> = registry.iter().map(|module| module.protocol).collect();
    assert_eq!(&protocols[..13], &expected[..]);
    assert_eq!(&protocols[13..], &expected[..]);
}

#[test]
fn test_encapsulated_run() {
    let recorder = Arc::new(Recorder::default());
    let mut config = config(Ipv4Addr::new(192, 0, 2, 1), 32);
    config.threshold = 3;
    config.encapsulated = true;
    config.selection = ProtocolSelection::Single("ICMP".into());

    run(config, &recorder).unwrap();
    for (_, packet) in recorder.sent.lock().iter() {
        assert_eq!(Ipv4Header::parse(packet).unwrap().protocol, IpProtocol::GRE);
        let inner = Ipv4Header::parse(&packet[24..]).unwrap();
        assert_eq!(inner.protocol, IpProtocol::ICMP);
    }
}

#[test]
fn test_send_failures_are_counted() {
    let recorder = Arc::new(Recorder {
        unreachable: Some(Ipv4Addr::new(192, 0, 2, 1)),
        ..Recorder::default()
    });
    let mut config = config(Ipv4Addr::new(192, 0, 2, 1), 32);
    config.threshold = 5;
    config.threads = 2;

    let summary = run(config, &recorder).unwrap();
    assert_eq!(summary.packets_sent, 0);
    assert_eq!(summary.send_failures, 5);
    assert!(!summary.is_clean());
}

#[test]
fn test_unknown_protocol_rejected() {
    let recorder = Arc::new(Recorder::default());
    let mut config = config(Ipv4Addr::new(192, 0, 2, 1), 32);
    config.selection = ProtocolSelection::Single("SCTP".into());

    assert!(matches!(
        run(config, &recorder),
        Err(Error::UnknownModule(name)) if name == "SCTP"
    ));
    assert!(recorder.sent.lock().is_empty());
}
