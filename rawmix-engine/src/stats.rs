//! Run counters shared by all workers

use rawmix_protocols::ModuleRegistry;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Lock-free counters updated from worker threads
#[derive(Debug)]
pub struct RunCounters {
    pub packets_sent: AtomicU64,
    pub bytes_sent: AtomicU64,
    pub send_failures: AtomicU64,
    per_module: Vec<AtomicU64>,
}

impl RunCounters {
    pub fn new(module_count: usize) -> Self {
        Self {
            packets_sent: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            send_failures: AtomicU64::new(0),
            per_module: (0..module_count).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    pub fn record_sent(&self, module: usize, bytes: usize) {
        self.packets_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(bytes as u64, Ordering::Relaxed);
        if let Some(counter) = self.per_module.get(module) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_failure(&self) {
        self.send_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot, with per-module counts labelled by acronym
    pub fn summarize(&self, registry: &ModuleRegistry, elapsed: Duration) -> RunSummary {
        let per_module = registry
            .iter()
            .zip(&self.per_module)
            .map(|(module, count)| (module.acronym, count.load(Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0)
            .collect();

        RunSummary {
            packets_sent: self.packets_sent.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
            per_module,
            elapsed,
        }
    }
}

/// What a finished (or interrupted) run did
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub packets_sent: u64,
    pub bytes_sent: u64,
    pub send_failures: u64,
    /// Packets per module that sent at least one
    pub per_module: Vec<(&'static str, u64)>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.send_failures == 0
    }

    pub fn packets_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.packets_sent as f64 / secs
        } else {
            0.0
        }
    }

    pub fn sent_by(&self, acronym: &str) -> u64 {
        self.per_module
            .iter()
            .find(|(name, _)| *name == acronym)
            .map_or(0, |(_, count)| *count)
    }
}
