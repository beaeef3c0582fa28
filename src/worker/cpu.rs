//! CPU worker for salt mining.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use rand::RngCore;

use crate::crypto::{wallet_address, Address, SaltScheme};
use crate::matcher::Pattern;

use super::MineResult;

#[derive(Debug, Default)]
pub struct WorkerStats {
    pub salts_tried: AtomicU64,
    pub matches_found: AtomicU64,
}

impl WorkerStats {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn total_salts(&self) -> u64 {
        self.salts_tried.load(Ordering::Relaxed)
    }
    pub fn total_matches(&self) -> u64 {
        self.matches_found.load(Ordering::Relaxed)
    }
}

pub struct CpuWorker {
    id: usize,
    pattern: Pattern,
    factory: Address,
    scheme: SaltScheme,
    init_code_hash: [u8; 32],
    result_tx: Sender<MineResult>,
    stop_flag: Arc<AtomicBool>,
    stats: Arc<WorkerStats>,
}

impl CpuWorker {
    pub fn new(
        id: usize,
        pattern: Pattern,
        factory: Address,
        scheme: SaltScheme,
        init_code_hash: [u8; 32],
        result_tx: Sender<MineResult>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> Self {
        Self {
            id,
            pattern,
            factory,
            scheme,
            init_code_hash,
            result_tx,
            stop_flag,
            stats,
        }
    }

    pub fn run(&self) {
        const BATCH_SIZE: u64 = 1000;

        // Each worker starts from a random raw salt and increments
        // sequentially. This avoids per-iteration RNG overhead while
        // keeping workers in different regions of the 256-bit salt space.
        let mut raw_salt = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut raw_salt);

        loop {
            if self.stop_flag.load(Ordering::Relaxed) {
                break;
            }

            for _ in 0..BATCH_SIZE {
                let effective_salt = self.scheme.mix(&raw_salt);
                let address = wallet_address(self.factory, &effective_salt, &self.init_code_hash);

                if self.pattern.matches(&address).is_match() {
                    self.stats.matches_found.fetch_add(1, Ordering::Relaxed);
                    let result = MineResult {
                        raw_salt,
                        effective_salt,
                        address,
                        worker_id: self.id,
                    };
                    // try_send, not send: a worker blocked on a full result
                    // channel never reaches the stop-flag check. Overflow
                    // matches are disposable; the consumer takes the first N.
                    let _ = self.result_tx.try_send(result);
                }

                // Increment the raw salt as a 256-bit big-endian counter
                increment_salt(&mut raw_salt);
            }

            self.stats.salts_tried.fetch_add(BATCH_SIZE, Ordering::Relaxed);
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }
}

/// Increment a 32-byte big-endian integer by 1 (with wrapping).
#[inline]
fn increment_salt(salt: &mut [u8; 32]) {
    for byte in salt.iter_mut().rev() {
        let (val, overflow) = byte.overflowing_add(1);
        *byte = val;
        if !overflow {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_salt_carries() {
        let mut salt = [0u8; 32];
        salt[31] = 0xff;
        increment_salt(&mut salt);

        let mut expected = [0u8; 32];
        expected[30] = 0x01;
        assert_eq!(salt, expected);
    }

    #[test]
    fn test_increment_salt_wraps() {
        let mut salt = [0xffu8; 32];
        increment_salt(&mut salt);
        assert_eq!(salt, [0u8; 32]);
    }
}
