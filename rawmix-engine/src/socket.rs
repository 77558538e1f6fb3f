//! Shared raw socket
//!
//! One `IPPROTO_RAW` socket with `IP_HDRINCL` serves every worker. Sends are
//! serialized through a mutex held for exactly one transmit call; the retry
//! loop runs outside the lock so other workers interleave between attempts.

use nix::errno::Errno;
use nix::sys::socket::{setsockopt, sockopt};
use parking_lot::Mutex;
use rawmix_core::{Error, Result};
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io;
use std::net::{Ipv4Addr, SocketAddrV4};
use tracing::{debug, info, trace};

/// Attempts per packet before a send is reported as exhausted
pub const MAX_SEND_ATTEMPTS: usize = 100;

/// Upper bound for the socket send buffer
pub const MAX_SEND_BUFFER: usize = 10 * 1024 * 1024;

const SEND_BUFFER_STEP: usize = 128;

const IPPROTO_RAW: i32 = 255;

/// Something that can put a finished IPv4 datagram on the wire.
///
/// The raw socket is the production implementation; tests substitute
/// recorders and failure injectors.
pub trait Transmit: Send {
    /// Send `packet` towards `destination`, returning the bytes accepted.
    fn transmit(&self, packet: &[u8], destination: Ipv4Addr) -> io::Result<usize>;
}

/// Raw IPv4 socket with the header-included option set
#[derive(Debug)]
pub struct RawSocket {
    socket: Socket,
}

fn setup_error(option: &'static str) -> impl FnOnce(io::Error) -> Error {
    move |source| Error::SocketSetup { option, source }
}

impl RawSocket {
    /// Create and configure the socket. Needs `CAP_NET_RAW`.
    pub fn open() -> Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::from(IPPROTO_RAW)))
            .map_err(setup_error("socket"))?;

        socket
            .set_header_included_v4(true)
            .map_err(setup_error("IP_HDRINCL"))?;
        let send_buffer = grow_send_buffer(&socket)?;
        socket
            .set_broadcast(true)
            .map_err(setup_error("SO_BROADCAST"))?;
        setsockopt(&socket, sockopt::Priority, &1).map_err(|errno| Error::SocketSetup {
            option: "SO_PRIORITY",
            source: errno.into(),
        })?;

        debug!(send_buffer, "raw socket configured");
        Ok(Self { socket })
    }
}

/// Raise SO_SNDBUF in small steps until the kernel refuses or stops
/// granting more, or the cap is reached. Returns the final size.
fn grow_send_buffer(socket: &Socket) -> Result<usize> {
    let mut current = socket
        .send_buffer_size()
        .map_err(setup_error("SO_SNDBUF"))?;
    let mut request = current;

    while request < MAX_SEND_BUFFER {
        request += SEND_BUFFER_STEP;
        match socket.set_send_buffer_size(request) {
            Ok(()) => {}
            Err(err) if err.raw_os_error() == Some(Errno::ENOBUFS as i32) => break,
            Err(err) => return Err(setup_error("SO_SNDBUF")(err)),
        }

        let granted = socket
            .send_buffer_size()
            .map_err(setup_error("SO_SNDBUF"))?;
        if granted <= current {
            break;
        }
        current = granted;
    }

    Ok(current)
}

impl Transmit for RawSocket {
    fn transmit(&self, packet: &[u8], destination: Ipv4Addr) -> io::Result<usize> {
        let address = SockAddr::from(SocketAddrV4::new(destination, 0));
        self.socket.send_to(packet, &address)
    }
}

/// Thread-safe owner of the transmitter
pub struct SocketManager<T: Transmit = RawSocket> {
    inner: Mutex<Option<T>>,
}

impl SocketManager<RawSocket> {
    /// Open the shared raw socket.
    pub fn open() -> Result<Self> {
        let socket = RawSocket::open()?;
        info!("raw socket opened");
        Ok(Self::with_transmitter(socket))
    }
}

impl<T: Transmit> SocketManager<T> {
    pub fn with_transmitter(transmitter: T) -> Self {
        Self {
            inner: Mutex::new(Some(transmitter)),
        }
    }

    pub fn is_open(&self) -> bool {
        self.inner.lock().is_some()
    }

    /// Send one complete packet.
    ///
    /// `EPERM` (typically a local firewall) is retried; partial sends resume
    /// after the bytes already accepted. Anything else fails immediately.
    pub fn send(&self, packet: &[u8], destination: Ipv4Addr) -> Result<()> {
        let mut offset = 0;

        for attempt in 1..=MAX_SEND_ATTEMPTS {
            let result = {
                let guard = self.inner.lock();
                let transmitter = guard.as_ref().ok_or(Error::SocketClosed)?;
                transmitter.transmit(&packet[offset..], destination)
            };

            match result {
                Ok(sent) => {
                    offset += sent;
                    if offset >= packet.len() {
                        return Ok(());
                    }
                    trace!(%destination, attempt, offset, "partial send");
                }
                Err(err) if err.raw_os_error() == Some(Errno::EPERM as i32) => {
                    trace!(%destination, attempt, "send not permitted, retrying");
                }
                Err(source) => return Err(Error::Send { destination, source }),
            }
        }

        Err(Error::SendExhausted {
            destination,
            attempts: MAX_SEND_ATTEMPTS,
            remaining: packet.len() - offset,
        })
    }

    /// Drop the transmitter. Safe to call more than once.
    pub fn close(&self) {
        if self.inner.lock().take().is_some() {
            info!("raw socket closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails with `error` for the first `failures` calls, then accepts at
    /// most `chunk` bytes per call.
    struct Scripted {
        calls: AtomicUsize,
        failures: usize,
        error: i32,
        chunk: usize,
    }

    impl Scripted {
        fn new(failures: usize, error: i32, chunk: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failures,
                error,
                chunk,
            }
        }
    }

    impl Transmit for Scripted {
        fn transmit(&self, packet: &[u8], _destination: Ipv4Addr) -> io::Result<usize> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(io::Error::from_raw_os_error(self.error));
            }
            Ok(packet.len().min(self.chunk))
        }
    }

    const DST: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 1);

    #[test]
    fn test_send_once() {
        let manager = SocketManager::with_transmitter(Scripted::new(0, 0, usize::MAX));
        manager.send(&[0u8; 40], DST).unwrap();
        assert_eq!(manager.inner.lock().as_ref().unwrap().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_eperm_is_retried() {
        let manager =
            SocketManager::with_transmitter(Scripted::new(5, Errno::EPERM as i32, usize::MAX));
        manager.send(&[0u8; 40], DST).unwrap();
        assert_eq!(manager.inner.lock().as_ref().unwrap().calls.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_eperm_exhausts_attempts() {
        let manager = SocketManager::with_transmitter(Scripted::new(
            usize::MAX,
            Errno::EPERM as i32,
            usize::MAX,
        ));
        let err = manager.send(&[0u8; 40], DST).unwrap_err();
        assert!(matches!(
            err,
            Error::SendExhausted {
                attempts: MAX_SEND_ATTEMPTS,
                remaining: 40,
                ..
            }
        ));
        assert!(err.is_send_failure());
    }

    #[test]
    fn test_partial_sends_advance() {
        let manager = SocketManager::with_transmitter(Scripted::new(0, 0, 16));
        manager.send(&[0u8; 40], DST).unwrap();
        assert_eq!(manager.inner.lock().as_ref().unwrap().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_other_errors_fail_immediately() {
        let manager =
            SocketManager::with_transmitter(Scripted::new(1, Errno::ENETUNREACH as i32, 64));
        let err = manager.send(&[0u8; 40], DST).unwrap_err();
        assert!(matches!(err, Error::Send { destination, .. } if destination == DST));
        assert_eq!(manager.inner.lock().as_ref().unwrap().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_close_is_idempotent() {
        let manager = SocketManager::with_transmitter(Scripted::new(0, 0, 64));
        assert!(manager.is_open());
        manager.close();
        manager.close();
        assert!(!manager.is_open());
        assert!(matches!(
            manager.send(&[0u8; 20], DST),
            Err(Error::SocketClosed)
        ));
    }
}
