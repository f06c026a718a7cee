//! # keyaddr
//!
//! Derives Ethereum and Bitcoin (Base58Check) addresses from one secp256k1
//! key pair, and validates Base58Check addresses.
//!
//! ## Architecture
//!
//! - `crypto`: Key generation and the hash pipeline
//! - `codec`: Base58 and Base58Check
//! - `address`: Ethereum and Bitcoin derivation, validation
//! - `worker`: Parallel batch generation
//! - `config`: Runtime configuration

pub mod address;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod worker;

pub use address::{
    derive_bitcoin_address, derive_ethereum_address, validate, validate_all, Address,
    BitcoinAddress, BitcoinParams, EthereumAddress, KeyPrefix, Scheme,
};
pub use codec::Base58Error;
pub use config::Config;
pub use crypto::{KeyError, Keypair};
pub use worker::{WalletRecord, WorkerPool};
