//! Worker pool and CPU workers for salt mining.
//!
//! Mining searches the unsigned deployment path: vary the raw salt, mix
//! it through the factory's salt scheme, derive the wallet address, and
//! report salts whose address matches a pattern.

mod cpu;
mod pool;

pub use cpu::{CpuWorker, WorkerStats};
pub use pool::{MineResult, WorkerPool};
