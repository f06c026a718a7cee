//! Worker pool for parallel wallet generation.
//!
//! This module provides:
//! - Multi-threaded CPU workers sharing a fixed record budget
//! - Progress statistics
//! - Early stop (Ctrl-C or entropy failure)

mod cpu;
mod pool;

pub use cpu::{CpuWorker, DeriveSettings, WorkerStats};
pub use pool::{WalletRecord, WorkerPool};
