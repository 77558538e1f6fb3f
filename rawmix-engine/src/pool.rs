//! Worker pool
//!
//! Splits the threshold across the configured number of threads, starts one
//! OS thread per worker and joins them into a [`RunSummary`].

use crate::socket::{SocketManager, Transmit};
use crate::stats::{RunCounters, RunSummary};
use crate::worker::{RunContext, Worker};
use rawmix_core::{Cidr, Config, Error, Result};
use rawmix_protocols::{ActiveModules, ModuleRegistry};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{error, info, warn};

/// Stack size for worker threads; builders only touch their own buffer.
pub const WORKER_STACK_SIZE: usize = 256 * 1024;

/// Split `total` packets over `workers`, giving the remainder one apiece to
/// the first workers.
pub fn balance_thresholds(total: u64, workers: usize) -> Vec<u64> {
    if workers == 0 {
        return Vec::new();
    }
    let count = workers as u64;
    let base = total / count;
    let remainder = total % count;
    (0..count).map(|i| base + u64::from(i < remainder)).collect()
}

/// Per-worker quotas for a run.
///
/// In mixed mode every worker must send whole passes over the registry, so
/// the threshold is rounded down to a multiple of the module count before it
/// is split.
pub fn worker_quotas(config: &Config, active: ActiveModules, module_count: usize) -> Vec<u64> {
    if config.flood {
        return vec![0; config.threads];
    }

    match active {
        ActiveModules::Single(_) => balance_thresholds(config.threshold, config.threads),
        ActiveModules::All => {
            let modules = module_count.max(1) as u64;
            let passes = config.threshold / modules;
            if passes * modules != config.threshold {
                warn!(
                    requested = config.threshold,
                    effective = passes * modules,
                    modules,
                    "threshold rounded down to a multiple of the module count"
                );
            }
            balance_thresholds(passes, config.threads)
                .into_iter()
                .map(|passes| passes * modules)
                .collect()
        }
    }
}

pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
    counters: Arc<RunCounters>,
    registry: ModuleRegistry,
    started: Instant,
}

impl WorkerPool {
    /// Start the workers. They begin sending immediately.
    pub fn spawn<T: Transmit + 'static>(
        config: Arc<Config>,
        cidr: Cidr,
        registry: ModuleRegistry,
        socket: Arc<SocketManager<T>>,
    ) -> Result<Self> {
        let active = registry.resolve(&config.selection)?;
        let quotas = worker_quotas(&config, active, registry.count());
        let counters = Arc::new(RunCounters::new(registry.count()));

        info!(
            workers = quotas.len(),
            threshold = config.threshold,
            flood = config.flood,
            encapsulated = config.encapsulated,
            "starting workers"
        );

        let shared = Arc::new(RunContext {
            config,
            cidr,
            registry,
            active,
            socket,
            counters: Arc::clone(&counters),
        });

        let started = Instant::now();
        let mut handles = Vec::with_capacity(quotas.len());
        for (index, quota) in quotas.into_iter().enumerate() {
            let worker = Worker::new(index, Arc::clone(&shared), quota);
            let handle = thread::Builder::new()
                .name(format!("rawmix-worker-{index}"))
                .stack_size(WORKER_STACK_SIZE)
                .spawn(move || worker.run())
                .map_err(|source| {
                    error!(worker = index, error = %source, "failed to spawn worker");
                    Error::WorkerSpawn { index, source }
                })?;
            handles.push(handle);
        }

        Ok(Self {
            handles,
            counters,
            registry,
            started,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// Live counters, readable while the workers run
    pub fn counters(&self) -> Arc<RunCounters> {
        Arc::clone(&self.counters)
    }

    /// Join every worker and summarize the run.
    pub fn wait(self) -> Result<RunSummary> {
        let mut panicked = None;
        for (index, handle) in self.handles.into_iter().enumerate() {
            if handle.join().is_err() {
                error!(worker = index, "worker panicked");
                panicked.get_or_insert(index);
            }
        }

        let summary = self
            .counters
            .summarize(&self.registry, self.started.elapsed());
        match panicked {
            Some(index) => Err(Error::WorkerPanicked(index)),
            None => Ok(summary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rawmix_core::config::ProtocolSelection;

    #[test]
    fn test_balance_thresholds() {
        assert_eq!(balance_thresholds(10, 3), vec![4, 3, 3]);
        assert_eq!(balance_thresholds(2, 4), vec![1, 1, 0, 0]);
        assert_eq!(balance_thresholds(9, 3), vec![3, 3, 3]);
        assert!(balance_thresholds(5, 0).is_empty());
        assert_eq!(balance_thresholds(11, 4).iter().sum::<u64>(), 11);
    }

    #[test]
    fn test_single_module_quotas() {
        let config = Config {
            threshold: 7,
            threads: 2,
            ..Config::default()
        };
        assert_eq!(
            worker_quotas(&config, ActiveModules::Single(3), 13),
            vec![4, 3]
        );
    }

    #[test]
    fn test_mixed_quotas_are_whole_passes() {
        let config = Config {
            threshold: 70,
            threads: 3,
            selection: ProtocolSelection::Mixed,
            ..Config::default()
        };
        // 70 rounds down to 65 = 5 passes over 13 modules
        let quotas = worker_quotas(&config, ActiveModules::All, 13);
        assert_eq!(quotas, vec![26, 26, 13]);
        assert!(quotas.iter().all(|quota| quota % 13 == 0));
    }

    #[test]
    fn test_flood_quotas() {
        let config = Config {
            flood: true,
            threads: 4,
            ..Config::default()
        };
        assert_eq!(worker_quotas(&config, ActiveModules::All, 13), vec![0; 4]);
    }
}
