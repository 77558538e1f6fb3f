//! Error types for rawmix

use std::net::Ipv4Addr;
use thiserror::Error;

/// Result type alias for rawmix operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for rawmix
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raw socket could not be created or configured
    #[error("Failed to set up raw socket ({option}): {source}")]
    SocketSetup {
        option: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Transmit call failed with a non-retryable error
    #[error("Failed to send packet to {destination}: {source}")]
    Send {
        destination: Ipv4Addr,
        #[source]
        source: std::io::Error,
    },

    /// Transmit retries ran out before the whole packet went out
    #[error("Gave up sending to {destination} after {attempts} attempts ({remaining} bytes unsent)")]
    SendExhausted {
        destination: Ipv4Addr,
        attempts: usize,
        remaining: usize,
    },

    /// Socket was closed while workers were still sending
    #[error("Raw socket is closed")]
    SocketClosed,

    /// Worker thread could not be created
    #[error("Failed to spawn worker {index}: {source}")]
    WorkerSpawn {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    /// Worker thread panicked before finishing its quota
    #[error("Worker {0} panicked")]
    WorkerPanicked(usize),

    /// Configuration rejected by validation
    #[error("Invalid configuration '{name}': {reason}")]
    InvalidConfig { name: String, reason: String },

    /// Protocol acronym not present in the module registry
    #[error("Protocol {0} is not implemented")]
    UnknownModule(String),

    /// Host name did not resolve to an IPv4 address
    #[error("Cannot resolve '{0}' to an IPv4 address")]
    Resolve(String),
}

impl Error {
    /// Create an invalid configuration error
    pub fn invalid_config<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Self {
        Error::InvalidConfig {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error came out of the transmit path
    pub fn is_send_failure(&self) -> bool {
        matches!(
            self,
            Error::Send { .. } | Error::SendExhausted { .. } | Error::SocketClosed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_message() {
        let err = Error::invalid_config("bits", "must be between 0 and 32");
        assert_eq!(
            err.to_string(),
            "Invalid configuration 'bits': must be between 0 and 32"
        );
    }

    #[test]
    fn test_send_failure_classification() {
        let exhausted = Error::SendExhausted {
            destination: Ipv4Addr::new(10, 0, 0, 1),
            attempts: 100,
            remaining: 20,
        };
        assert!(exhausted.is_send_failure());
        assert!(Error::SocketClosed.is_send_failure());
        assert!(!Error::UnknownModule("FOO".into()).is_send_failure());
    }
}
