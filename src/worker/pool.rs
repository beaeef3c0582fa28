//! Worker pool for salt mining.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver};

use crate::crypto::proxy::init_code_hash;
use crate::crypto::{Address, SaltScheme};
use crate::matcher::Pattern;

use super::cpu::{CpuWorker, WorkerStats};

/// A raw salt whose derived wallet address matches the pattern.
///
/// Carries both salts: the raw salt is what the caller submits to the
/// factory's unsigned path, the effective salt is what the creation
/// primitive will actually consume after mixing.
#[derive(Debug, Clone)]
pub struct MineResult {
    /// The raw salt (32 bytes) to submit to the factory.
    pub raw_salt: [u8; 32],
    /// The mixed salt the creation primitive consumes.
    pub effective_salt: [u8; 32],
    /// The derived wallet address.
    pub address: Address,
    /// Worker ID that found it.
    pub worker_id: usize,
}

impl MineResult {
    /// Raw salt as hex (no 0x).
    pub fn raw_salt_hex(&self) -> String {
        hex::encode(self.raw_salt)
    }

    /// Effective salt as hex (no 0x).
    pub fn effective_salt_hex(&self) -> String {
        hex::encode(self.effective_salt)
    }

    /// Address as checksummed hex (0x...).
    pub fn address_checksum(&self) -> String {
        self.address.to_checksum()
    }
}

pub struct WorkerPool {
    num_workers: usize,
    pattern: Pattern,
    scheme: SaltScheme,
    handles: Option<Vec<JoinHandle<()>>>,
    result_rx: Receiver<MineResult>,
    stop_flag: Arc<AtomicBool>,
    stats: Arc<WorkerStats>,
    start_time: Instant,
}

impl WorkerPool {
    /// Spawns `num_workers` miners over the unsigned deployment path of
    /// one factory. The init code hash is computed once up front; workers
    /// only mix salts and fold them into the creation preimage.
    ///
    /// Results arrive through a bounded channel. When it is full, workers
    /// drop further matches instead of blocking on delivery.
    pub fn new(
        num_workers: usize,
        pattern: Pattern,
        factory: Address,
        scheme: SaltScheme,
        implementation: Address,
    ) -> Self {
        let init_code_hash = init_code_hash(implementation);
        let (result_tx, result_rx) = bounded(100);
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(WorkerStats::new());

        let handles = (0..num_workers)
            .map(|id| {
                let pattern = pattern.clone();
                let result_tx = result_tx.clone();
                let stop_flag = stop_flag.clone();
                let stats = stats.clone();

                thread::Builder::new()
                    .name(format!("salt-miner-{}", id))
                    .spawn(move || {
                        let worker = CpuWorker::new(
                            id,
                            pattern,
                            factory,
                            scheme,
                            init_code_hash,
                            result_tx,
                            stop_flag,
                            stats,
                        );
                        worker.run();
                    })
                    .expect("spawn worker")
            })
            .collect();

        drop(result_tx);

        Self {
            num_workers,
            pattern,
            scheme,
            handles: Some(handles),
            result_rx,
            stop_flag,
            stats,
            start_time: Instant::now(),
        }
    }

    pub fn wait_for_result(&self, timeout: Duration) -> Option<MineResult> {
        self.result_rx.recv_timeout(timeout).ok()
    }

    pub fn try_recv(&self) -> Option<MineResult> {
        self.result_rx.try_recv().ok()
    }

    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    pub fn join(mut self) {
        self.stop();
        if let Some(h) = self.handles.take() {
            for handle in h {
                let _ = handle.join();
            }
        }
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
    pub fn scheme(&self) -> SaltScheme {
        self.scheme
    }
    pub fn total_salts(&self) -> u64 {
        self.stats.total_salts()
    }
    pub fn total_matches(&self) -> u64 {
        self.stats.total_matches()
    }
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
    pub fn salts_per_second(&self) -> f64 {
        let t = self.elapsed().as_secs_f64();
        if t > 0.0 {
            self.total_salts() as f64 / t
        } else {
            0.0
        }
    }
    pub fn stop_flag_clone(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
        if let Some(h) = self.handles.take() {
            for handle in h {
                let _ = handle.join();
            }
        }
    }
}
