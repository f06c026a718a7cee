//! Command-line configuration.

use clap::{Args, Parser, Subcommand};

use crate::address::KeyPrefix;
use crate::worker::DeriveSettings;

/// Ethereum and Bitcoin address derivation from secp256k1 keys
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate new key pairs and print both addresses
    Generate {
        /// Number of key pairs to generate
        #[arg(short = 'n', long, default_value = "1")]
        count: u64,

        /// Number of worker threads (default: number of CPU cores)
        #[arg(short = 'w', long)]
        workers: Option<usize>,

        #[command(flatten)]
        bitcoin: BitcoinArgs,
    },

    /// Derive both addresses from an existing key
    Derive {
        /// Hex secret key (32 bytes, 0x prefix optional)
        #[arg(long, conflicts_with = "public_key")]
        secret_key: Option<String>,

        /// Hex public key: 64 raw bytes (X || Y) or 65 bytes starting with 04
        #[arg(long)]
        public_key: Option<String>,

        #[command(flatten)]
        bitcoin: BitcoinArgs,
    },

    /// Check the Base58Check checksum of one or more addresses
    Validate {
        #[arg(required = true)]
        addresses: Vec<String>,
    },

    /// Hash a message with the Ethereum signed-message framing
    TextHash {
        message: String,
    },
}

/// Bitcoin derivation options.
#[derive(Args, Debug, Clone)]
pub struct BitcoinArgs {
    /// Version byte placed in front of the key hash (0 = mainnet, 0x6f = testnet)
    #[arg(long = "version-byte", default_value = "0x00", value_parser = parse_byte)]
    pub version_byte: u8,

    /// Marker byte hashed in front of the X coordinate
    #[arg(long, default_value = "0x02", value_parser = parse_byte)]
    pub key_prefix: u8,

    /// Choose 0x02/0x03 from the Y parity instead of a fixed marker.
    /// Changes the address of every key with an odd Y coordinate.
    #[arg(long, conflicts_with = "key_prefix")]
    pub parity: bool,
}

impl BitcoinArgs {
    /// Returns the key-prefix selection
    pub fn key_prefix_mode(&self) -> KeyPrefix {
        if self.parity {
            KeyPrefix::Parity
        } else {
            KeyPrefix::Fixed(self.key_prefix)
        }
    }

    /// Returns the settings handed to workers
    pub fn derive_settings(&self) -> DeriveSettings {
        DeriveSettings {
            version: self.version_byte,
            key_prefix: self.key_prefix_mode(),
        }
    }
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count
    pub fn worker_count(&self) -> usize {
        match &self.command {
            Command::Generate {
                workers: Some(n), ..
            } => *n,
            _ => num_cpus::get(),
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.command {
            Command::Generate { count, workers, .. } => {
                if *count == 0 {
                    return Err(ConfigError::InvalidCount);
                }
                if *workers == Some(0) {
                    return Err(ConfigError::InvalidWorkers);
                }
            }
            Command::Derive {
                secret_key,
                public_key,
                ..
            } => {
                if secret_key.is_none() && public_key.is_none() {
                    return Err(ConfigError::MissingKey);
                }
            }
            Command::Validate { .. } | Command::TextHash { .. } => {}
        }

        Ok(())
    }
}

/// Parses a byte given in decimal or as 0x-prefixed hex.
fn parse_byte(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(digits) => u8::from_str_radix(digits, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid byte {:?}: {}", s, e))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Count must be at least 1")]
    InvalidCount,

    #[error("Worker count must be at least 1")]
    InvalidWorkers,

    #[error("One of --secret-key or --public-key is required")]
    MissingKey,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::bitcoin::WALLET_VERSION;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["keyaddr"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_generate_defaults() {
        let config = parse(&["generate"]);
        assert!(config.validate().is_ok());
        match config.command {
            Command::Generate { count, bitcoin, .. } => {
                assert_eq!(count, 1);
                assert_eq!(bitcoin.version_byte, WALLET_VERSION);
                assert_eq!(bitcoin.key_prefix_mode(), KeyPrefix::Fixed(0x02));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_byte_parsing() {
        assert_eq!(parse_byte("0x6f"), Ok(0x6f));
        assert_eq!(parse_byte("111"), Ok(111));
        assert!(parse_byte("0x100").is_err());
        assert!(parse_byte("abc").is_err());

        let config = parse(&["generate", "--version-byte", "0x6f", "--parity"]);
        match config.command {
            Command::Generate { bitcoin, .. } => {
                let settings = bitcoin.derive_settings();
                assert_eq!(settings.version, 0x6f);
                assert_eq!(settings.key_prefix, KeyPrefix::Parity);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_invalid_generate() {
        assert!(matches!(
            parse(&["generate", "-n", "0"]).validate(),
            Err(ConfigError::InvalidCount)
        ));
        assert!(matches!(
            parse(&["generate", "-w", "0"]).validate(),
            Err(ConfigError::InvalidWorkers)
        ));
    }

    #[test]
    fn test_derive_requires_key() {
        assert!(matches!(
            parse(&["derive"]).validate(),
            Err(ConfigError::MissingKey)
        ));
        assert!(parse(&["derive", "--secret-key", "01"]).validate().is_ok());
    }

    #[test]
    fn test_conflicting_flags_rejected() {
        assert!(
            Config::try_parse_from(["keyaddr", "generate", "--parity", "--key-prefix", "3"])
                .is_err()
        );
        assert!(Config::try_parse_from(["keyaddr", "validate"]).is_err());
    }

    #[test]
    fn test_worker_count() {
        assert_eq!(parse(&["generate", "-w", "3"]).worker_count(), 3);
        assert_eq!(parse(&["text-hash", "hi"]).worker_count(), num_cpus::get());
    }
}
