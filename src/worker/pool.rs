//! Worker pool management.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::address::{BitcoinAddress, EthereumAddress};
use crate::crypto::{KeyError, Keypair};

use super::cpu::{CpuWorker, DeriveSettings, WorkerStats};

/// A freshly generated wallet: its key pair and both addresses.
#[derive(Debug, Clone)]
pub struct WalletRecord {
    /// The generated key pair
    pub keypair: Keypair,
    /// Ethereum address of the public key
    pub ethereum: EthereumAddress,
    /// Bitcoin address of the public key
    pub bitcoin: BitcoinAddress,
    /// The ID of the worker that produced this record
    pub worker_id: usize,
}

/// Manages a pool of workers generating a fixed number of wallets.
pub struct WorkerPool {
    /// Number of workers
    num_workers: usize,
    /// Number of records requested
    count: u64,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<()>>>,
    /// Channel receiver for results
    result_rx: Receiver<Result<WalletRecord, KeyError>>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Shared statistics
    stats: Arc<WorkerStats>,
    /// Start time
    start_time: Instant,
}

impl WorkerPool {
    /// Creates a pool of `num_workers` threads producing `count` records.
    ///
    /// Never spawns more threads than there are records to produce.
    pub fn new(num_workers: usize, count: u64, settings: DeriveSettings) -> io::Result<Self> {
        let num_workers = num_workers.min(usize::try_from(count).unwrap_or(usize::MAX));
        let (result_tx, result_rx) = bounded(100);
        let remaining = Arc::new(AtomicU64::new(count));
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(WorkerStats::new());

        log::info!(
            "starting {} worker(s) to generate {} wallet(s)",
            num_workers,
            count
        );

        // The pool keeps no sender, so the channel closes once every worker exits.
        let handles = Self::spawn_workers(
            num_workers,
            settings,
            remaining,
            result_tx,
            stop_flag.clone(),
            stats.clone(),
        )?;

        Ok(Self {
            num_workers,
            count,
            handles: Some(handles),
            result_rx,
            stop_flag,
            stats,
            start_time: Instant::now(),
        })
    }

    /// Spawns worker threads.
    fn spawn_workers(
        num_workers: usize,
        settings: DeriveSettings,
        remaining: Arc<AtomicU64>,
        result_tx: Sender<Result<WalletRecord, KeyError>>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> io::Result<Vec<JoinHandle<()>>> {
        let mut handles = Vec::with_capacity(num_workers);

        for id in 0..num_workers {
            let worker = CpuWorker::new(
                id,
                settings,
                remaining.clone(),
                result_tx.clone(),
                stop_flag.clone(),
                stats.clone(),
            );

            let spawned = thread::Builder::new()
                .name(format!("keyaddr-worker-{}", worker.id()))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    stop_flag.store(true, Ordering::Relaxed);
                    return Err(e);
                }
            }
        }

        Ok(handles)
    }

    /// Returns an iterator over results (blocking).
    ///
    /// Ends once every worker has exited: the budget is spent, the pool was
    /// stopped, or the entropy source failed.
    pub fn results(&self) -> impl Iterator<Item = Result<WalletRecord, KeyError>> + '_ {
        self.result_rx.iter()
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Stops the workers and waits for them to complete.
    ///
    /// Results not yet consumed are discarded.
    pub fn join(mut self) {
        self.shutdown();
        log::info!(
            "generated {} key(s) in {:.2}s",
            self.total_keys(),
            self.elapsed().as_secs_f64()
        );
    }

    fn shutdown(&mut self) {
        self.stop();
        // Disconnect the channel so workers blocked on a full buffer return
        let (_, closed_rx) = bounded(0);
        drop(std::mem::replace(&mut self.result_rx, closed_rx));

        if let Some(handles) = self.handles.take() {
            for handle in handles {
                let _ = handle.join();
            }
        }
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Returns the number of records requested.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the total keys generated across all workers.
    pub fn total_keys(&self) -> u64 {
        self.stats.total_keys()
    }

    /// Returns the elapsed time since the pool was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the current generation rate (keys per second).
    pub fn keys_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_keys() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Returns a clone of the stop flag for external use (e.g., signal handlers).
    pub fn stop_flag_clone(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Returns true if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{validate, KeyPrefix};

    #[test]
    fn test_pool_produces_exact_count() {
        let pool = WorkerPool::new(4, 25, DeriveSettings::default()).unwrap();
        let records: Vec<WalletRecord> = pool.results().map(|r| r.unwrap()).collect();

        assert_eq!(records.len(), 25);
        assert_eq!(pool.total_keys(), 25);
        for record in &records {
            assert!(record.worker_id < 4);
            assert_eq!(record.ethereum.to_hex().len(), 40);
            assert!(validate(&record.bitcoin.to_string()));
        }
        pool.join();
    }

    #[test]
    fn test_pool_zero_count() {
        let pool = WorkerPool::new(2, 0, DeriveSettings::default()).unwrap();
        assert_eq!(pool.num_workers(), 0);
        assert_eq!(pool.results().count(), 0);
    }

    #[test]
    fn test_workers_capped_at_count() {
        let pool = WorkerPool::new(8, 3, DeriveSettings::default()).unwrap();
        assert_eq!(pool.num_workers(), 3);
        assert_eq!(pool.count(), 3);

        let records: Vec<WalletRecord> = pool.results().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|record| record.worker_id < 3));

        let single = WorkerPool::new(16, 1, DeriveSettings::default()).unwrap();
        assert_eq!(single.num_workers(), 1);
    }

    #[test]
    fn test_parity_prefix_setting() {
        let settings = DeriveSettings {
            version: 0x6f,
            key_prefix: KeyPrefix::Parity,
        };
        let pool = WorkerPool::new(2, 8, settings).unwrap();
        for record in pool.results() {
            let record = record.unwrap();
            let params = KeyPrefix::Parity.params_for(0x6f, record.keypair.public_key());
            let expected = crate::address::derive_bitcoin_address(
                record.keypair.public_key(),
                params.version,
                params.key_prefix,
            );
            assert_eq!(record.bitcoin, expected);
            assert_eq!(record.bitcoin.version(), 0x6f);
        }
    }

    #[test]
    fn test_stopped_pool_drains() {
        let pool = WorkerPool::new(2, u64::MAX, DeriveSettings::default()).unwrap();
        let first = pool.results().next();
        assert!(matches!(first, Some(Ok(_))));
        pool.stop();
        assert!(pool.is_stopped());
        drop(pool);
    }
}
