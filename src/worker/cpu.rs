//! CPU-based worker for batch wallet generation.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;

use crate::address::bitcoin::WALLET_VERSION;
use crate::address::{derive_bitcoin_address, derive_ethereum_address, KeyPrefix};
use crate::crypto::{KeyError, Keypair};

use super::WalletRecord;

/// Statistics shared by all workers of a pool.
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Total keys generated
    pub keys_generated: AtomicU64,
}

impl WorkerStats {
    /// Creates new worker stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total keys generated.
    pub fn total_keys(&self) -> u64 {
        self.keys_generated.load(Ordering::Relaxed)
    }
}

/// What each worker derives for every generated key.
#[derive(Debug, Clone, Copy)]
pub struct DeriveSettings {
    /// Bitcoin version byte
    pub version: u8,
    /// Bitcoin key-prefix selection
    pub key_prefix: KeyPrefix,
}

impl Default for DeriveSettings {
    fn default() -> Self {
        Self {
            version: WALLET_VERSION,
            key_prefix: KeyPrefix::default(),
        }
    }
}

/// A CPU worker that generates keypairs and derives both addresses.
pub struct CpuWorker {
    /// Worker ID
    id: usize,
    /// Derivation settings
    settings: DeriveSettings,
    /// Records still to be produced by the whole pool
    remaining: Arc<AtomicU64>,
    /// Channel to send results
    result_tx: Sender<Result<WalletRecord, KeyError>>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Worker statistics
    stats: Arc<WorkerStats>,
}

impl CpuWorker {
    /// Creates a new CPU worker.
    pub fn new(
        id: usize,
        settings: DeriveSettings,
        remaining: Arc<AtomicU64>,
        result_tx: Sender<Result<WalletRecord, KeyError>>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> Self {
        Self {
            id,
            settings,
            remaining,
            result_tx,
            stop_flag,
            stats,
        }
    }

    /// Runs the worker loop.
    ///
    /// Claims one record at a time from the shared budget until:
    /// - The budget is exhausted
    /// - Stop flag is set
    /// - The entropy source fails (the error is sent and the pool stopped)
    /// - Channel is closed
    pub fn run(&self) {
        loop {
            if self.stop_flag.load(Ordering::Relaxed) {
                break;
            }

            let claimed = self
                .remaining
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
            if claimed.is_err() {
                break;
            }

            let keypair = match Keypair::generate() {
                Ok(keypair) => keypair,
                Err(e) => {
                    self.stop_flag.store(true, Ordering::Relaxed);
                    let _ = self.result_tx.send(Err(e));
                    break;
                }
            };
            self.stats.keys_generated.fetch_add(1, Ordering::Relaxed);

            let record = self.derive(keypair);
            if self.result_tx.send(Ok(record)).is_err() {
                break;
            }
        }

        log::debug!("worker {} finished", self.id);
    }

    fn derive(&self, keypair: Keypair) -> WalletRecord {
        let params = self
            .settings
            .key_prefix
            .params_for(self.settings.version, keypair.public_key());

        let ethereum = derive_ethereum_address(keypair.public_key());
        let bitcoin = derive_bitcoin_address(keypair.public_key(), params.version, params.key_prefix);

        WalletRecord {
            keypair,
            ethereum,
            bitcoin,
            worker_id: self.id,
        }
    }

    /// Returns the worker ID.
    pub fn id(&self) -> usize {
        self.id
    }
}
