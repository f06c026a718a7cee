//! keyaddr CLI
//!
//! Usage:
//!   keyaddr generate                      # One key pair, both addresses
//!   keyaddr generate -n 100 -w 4          # 100 key pairs on 4 threads
//!   keyaddr derive --secret-key 0x01      # Addresses of an existing key
//!   keyaddr validate 1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH
//!   keyaddr text-hash "hello"

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;

use keyaddr::config::{BitcoinArgs, Command};
use keyaddr::crypto::hash::text_and_hash;
use keyaddr::crypto::{public_key_from_hex, Keypair, PUBLIC_KEY_LEN};
use keyaddr::{validate_all, Address, Config, Scheme, WalletRecord, WorkerPool};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::parse();

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }

    let worker_count = config.worker_count();
    let code = match config.command {
        Command::Generate { count, bitcoin, .. } => generate(count, worker_count, &bitcoin),
        Command::Derive {
            secret_key,
            public_key,
            bitcoin,
        } => derive(secret_key.as_deref(), public_key.as_deref(), &bitcoin),
        Command::Validate { addresses } => validate(&addresses),
        Command::TextHash { message } => text_hash(&message),
    };

    process::exit(code);
}

fn generate(count: u64, workers: usize, bitcoin: &BitcoinArgs) -> i32 {
    let pool = match WorkerPool::new(workers, count, bitcoin.derive_settings()) {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Failed to start workers: {}", e);
            return 1;
        }
    };

    ctrlc_handler(pool.stop_flag_clone());

    let mut produced = 0u64;
    let mut code = 0;
    for result in pool.results() {
        match result {
            Ok(record) => {
                produced += 1;
                print_record(&record, produced);
            }
            Err(e) => {
                eprintln!("Key generation failed: {}", e);
                code = 1;
            }
        }
    }

    if pool.is_stopped() && code == 0 && produced < count {
        eprintln!("Stopped by user after {} of {} key pair(s).", produced, count);
    }

    if pool.count() > 1 {
        eprintln!(
            "Generated {} key pair(s) in {:.2}s on {} worker(s) ({:.0}/s)",
            pool.total_keys(),
            pool.elapsed().as_secs_f64(),
            pool.num_workers(),
            pool.keys_per_second()
        );
    }

    pool.join();
    code
}

fn derive(secret_key: Option<&str>, public_key: Option<&str>, bitcoin: &BitcoinArgs) -> i32 {
    let (keypair, public_key) = match (secret_key, public_key) {
        (Some(secret_hex), _) => match Keypair::from_secret_hex(secret_hex) {
            Ok(keypair) => {
                let public_key = *keypair.public_key();
                (Some(keypair), public_key)
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        },
        (None, Some(public_hex)) => match public_key_from_hex(public_hex) {
            Ok(public_key) => (None, public_key),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        },
        (None, None) => {
            eprintln!("Error: no key given");
            return 1;
        }
    };

    print_addresses(keypair.as_ref(), &public_key, bitcoin);
    0
}

fn validate(addresses: &[String]) -> i32 {
    let results = validate_all(addresses);
    for (address, valid) in addresses.iter().zip(&results) {
        println!("{}  {}", if *valid { "valid  " } else { "INVALID" }, address);
    }

    if results.iter().all(|valid| *valid) {
        0
    } else {
        2
    }
}

fn text_hash(message: &str) -> i32 {
    let (hash, framed) = text_and_hash(message.as_bytes());
    println!("Message: {:?}", framed);
    println!("Hash:    0x{}", hex::encode(hash));
    0
}

fn print_record(record: &WalletRecord, index: u64) {
    println!("=== Key pair #{} ===", index);
    println!("Private Key: {}", record.keypair.private_key_hex());
    println!("Public Key:  {}", record.keypair.public_key_hex());
    println!("Ethereum:    {}", record.ethereum);
    println!("Bitcoin:     {}", record.bitcoin);
    println!("Worker:      {}", record.worker_id);
    println!();
}

fn print_addresses(
    keypair: Option<&Keypair>,
    public_key: &[u8; PUBLIC_KEY_LEN],
    bitcoin: &BitcoinArgs,
) {
    let params = bitcoin
        .key_prefix_mode()
        .params_for(bitcoin.version_byte, public_key);

    if let Some(keypair) = keypair {
        println!("Private Key: {}", keypair.private_key_hex());
    }
    println!("Public Key:  {}", hex::encode(public_key));

    for scheme in [Scheme::Ethereum, Scheme::Bitcoin(params)] {
        let address = scheme.derive(public_key);
        println!("{:<13}{}", format!("{}:", scheme), address);
        if let Address::Ethereum(ethereum) = address {
            println!("{:<13}{}", "eip-55:", ethereum.to_checksum());
        }
    }
}

fn ctrlc_handler(stop_flag: Arc<AtomicBool>) {
    if let Err(e) = ctrlc::set_handler(move || {
        stop_flag.store(true, Ordering::Relaxed);
    }) {
        log::warn!("could not install Ctrl-C handler: {}", e);
    }
}
