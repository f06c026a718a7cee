//! Ethereum address representation and derivation.

use std::fmt;

use crate::crypto::hash::keccak256;
use crate::crypto::PUBLIC_KEY_LEN;

/// An Ethereum address (20 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EthereumAddress([u8; 20]);

impl EthereumAddress {
    /// Creates an address from raw bytes.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns the address as raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns the address as a lowercase hex string (without 0x prefix).
    #[inline]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns the address with 0x prefix.
    pub fn to_hex_prefixed(&self) -> String {
        format!("0x{}", self.to_hex())
    }

    /// Returns the mixed-case EIP-55 rendering, with 0x prefix.
    ///
    /// Display only; nothing in this crate validates the casing.
    pub fn to_checksum(&self) -> String {
        let hex_addr = self.to_hex();
        let hash = keccak256(hex_addr.as_bytes());

        let mut checksum = String::with_capacity(42);
        checksum.push_str("0x");

        for (i, c) in hex_addr.chars().enumerate() {
            let hash_byte = hash[i / 2];
            let hash_nibble = if i % 2 == 0 {
                hash_byte >> 4
            } else {
                hash_byte & 0x0f
            };

            if c.is_ascii_alphabetic() && hash_nibble >= 8 {
                checksum.push(c.to_ascii_uppercase());
            } else {
                checksum.push(c);
            }
        }

        checksum
    }
}

/// Derives the Ethereum address of a raw public key.
///
/// Process:
/// 1. Hash the 64-byte X || Y key with Keccak-256 (no `0x04` tag)
/// 2. Take the last 20 bytes of the hash
pub fn derive_ethereum_address(public_key: &[u8; PUBLIC_KEY_LEN]) -> EthereumAddress {
    let hash = keccak256(public_key);

    let mut address_bytes = [0u8; 20];
    address_bytes.copy_from_slice(&hash[hash.len() - 20..]);

    let address = EthereumAddress::from_bytes(address_bytes);
    log::debug!("derived ethereum address {}", address.to_hex());
    address
}

impl fmt::Debug for EthereumAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EthereumAddress({})", self.to_checksum())
    }
}

impl fmt::Display for EthereumAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;

    fn keypair(n: u8) -> Keypair {
        let mut secret = [0u8; 32];
        secret[31] = n;
        Keypair::from_secret_key(secret).unwrap()
    }

    #[test]
    fn test_checksum_address() {
        // Test vector from EIP-55
        let bytes = hex::decode("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed")
            .unwrap()
            .try_into()
            .unwrap();
        let addr = EthereumAddress::from_bytes(bytes);
        assert_eq!(addr.to_checksum(), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
    }

    #[test]
    fn test_hex_output() {
        let bytes = [0u8; 20];
        let addr = EthereumAddress::from_bytes(bytes);
        assert_eq!(addr.to_hex(), "0000000000000000000000000000000000000000");
        assert_eq!(
            addr.to_hex_prefixed(),
            "0x0000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_known_addresses() {
        // Addresses for private keys 1, 2 and 6 are well-known
        for (n, expected) in [
            (1, "7e5f4552091a69125d5dfcb7b8c2659029395bdf"),
            (2, "2b5ad5c4795c026514f8317c7a215e218dccd6cf"),
            (6, "e57bfe9f44b819898f47bf37e5af72a0783e1141"),
        ] {
            let address = derive_ethereum_address(keypair(n).public_key());
            assert_eq!(address.to_string(), expected);
        }
    }

    #[test]
    fn test_generated_address_is_lowercase_hex() {
        for _ in 0..16 {
            let keypair = Keypair::generate().unwrap();
            let text = derive_ethereum_address(keypair.public_key()).to_string();
            assert_eq!(text.len(), 40);
            assert!(text
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }
}
