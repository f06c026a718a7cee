//! Address derivation for the supported schemes.
//!
//! Both schemes consume the same raw 64-byte public key and share the hash
//! pipeline in [`crate::crypto::hash`]:
//! - Ethereum: `keccak256(X || Y)[12..]`, rendered as 40 lowercase hex chars
//! - Bitcoin: `base58check(version || ripemd160(sha256(prefix || X)))`

pub mod bitcoin;
pub mod ethereum;
mod validator;

use std::fmt;

use crate::crypto::PUBLIC_KEY_LEN;

pub use bitcoin::{derive_bitcoin_address, BitcoinAddress, BitcoinParams, KeyPrefix};
pub use ethereum::{derive_ethereum_address, EthereumAddress};
pub use validator::{validate, validate_all};

/// An address scheme together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Ethereum,
    Bitcoin(BitcoinParams),
}

impl Scheme {
    /// Derives this scheme's address for a raw public key.
    pub fn derive(&self, public_key: &[u8; PUBLIC_KEY_LEN]) -> Address {
        match self {
            Scheme::Ethereum => Address::Ethereum(derive_ethereum_address(public_key)),
            Scheme::Bitcoin(params) => Address::Bitcoin(derive_bitcoin_address(
                public_key,
                params.version,
                params.key_prefix,
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scheme::Ethereum => "ethereum",
            Scheme::Bitcoin(_) => "bitcoin",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An address produced by one of the schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    Ethereum(EthereumAddress),
    Bitcoin(BitcoinAddress),
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Ethereum(address) => fmt::Display::fmt(address, f),
            Address::Bitcoin(address) => fmt::Display::fmt(address, f),
        }
    }
}
