//! Bitcoin-style Base58Check addresses.
//!
//! Layout of the decoded address (25 bytes):
//!   version (1) || pub_key_hash (20) || checksum (4)
//! where `checksum = sha256(sha256(version || pub_key_hash))[0..4]`.
//!
//! The public-key hash covers only the X coordinate behind a fixed marker
//! byte: `ripemd160(sha256(key_prefix || X))`. With the default marker
//! `0x02` this equals the real compressed-key hash only when Y is even; use
//! [`BitcoinParams::parity_corrected`] for the SEC1-correct marker.

use std::fmt;
use std::str::FromStr;

use crate::codec::{base58, check, Base58Error};
use crate::crypto::hash::hash160;
use crate::crypto::{compressed_prefix, COORDINATE_LEN, PUBLIC_KEY_LEN};

/// Version byte of a mainnet pay-to-pubkey-hash address.
pub const WALLET_VERSION: u8 = 0x00;

/// Marker byte placed in front of the X coordinate before hashing.
pub const COMPRESSED_PUBLIC_KEY_PREFIX: u8 = 0x02;

/// Number of checksum bytes at the end of an address payload.
pub const ADDRESS_CHECKSUM_LEN: usize = check::CHECKSUM_LEN;

/// Length of the public-key hash.
pub const PUB_KEY_HASH_LEN: usize = 20;

/// Length of the decoded address: version + hash + checksum.
pub const FULL_PAYLOAD_LEN: usize = 1 + PUB_KEY_HASH_LEN + ADDRESS_CHECKSUM_LEN;

/// Version and key-prefix bytes used when deriving a Bitcoin address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitcoinParams {
    /// Network / address-type byte placed in front of the hash
    pub version: u8,
    /// Marker byte hashed in front of the X coordinate
    pub key_prefix: u8,
}

impl BitcoinParams {
    pub const fn new(version: u8, key_prefix: u8) -> Self {
        Self {
            version,
            key_prefix,
        }
    }

    /// Params whose key prefix follows the Y parity of `public_key`
    /// (`0x02` even, `0x03` odd), giving the standard compressed-key address.
    ///
    /// Addresses derived this way differ from the default ones for every key
    /// with an odd Y coordinate.
    pub fn parity_corrected(version: u8, public_key: &[u8; PUBLIC_KEY_LEN]) -> Self {
        Self::new(version, compressed_prefix(public_key))
    }
}

impl Default for BitcoinParams {
    fn default() -> Self {
        Self::new(WALLET_VERSION, COMPRESSED_PUBLIC_KEY_PREFIX)
    }
}

/// How the key prefix is chosen when deriving addresses for many keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPrefix {
    /// The same marker byte for every key
    Fixed(u8),
    /// `0x02` or `0x03` from each key's Y parity
    Parity,
}

impl KeyPrefix {
    /// Resolves the params for one public key.
    pub fn params_for(&self, version: u8, public_key: &[u8; PUBLIC_KEY_LEN]) -> BitcoinParams {
        match *self {
            KeyPrefix::Fixed(key_prefix) => BitcoinParams::new(version, key_prefix),
            KeyPrefix::Parity => BitcoinParams::parity_corrected(version, public_key),
        }
    }
}

impl Default for KeyPrefix {
    fn default() -> Self {
        KeyPrefix::Fixed(COMPRESSED_PUBLIC_KEY_PREFIX)
    }
}

/// A decoded Bitcoin address: version || hash || checksum.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitcoinAddress {
    payload: [u8; FULL_PAYLOAD_LEN],
}

impl BitcoinAddress {
    /// Builds the address for a public-key hash, appending its checksum.
    pub fn from_pub_key_hash(version: u8, pub_key_hash: &[u8; PUB_KEY_HASH_LEN]) -> Self {
        let full = check::with_checksum(version, pub_key_hash);

        let mut payload = [0u8; FULL_PAYLOAD_LEN];
        payload.copy_from_slice(&full);
        Self { payload }
    }

    /// The version byte.
    #[inline]
    pub fn version(&self) -> u8 {
        self.payload[0]
    }

    /// The 20-byte public-key hash.
    pub fn pub_key_hash(&self) -> [u8; PUB_KEY_HASH_LEN] {
        let mut hash = [0u8; PUB_KEY_HASH_LEN];
        hash.copy_from_slice(&self.payload[1..1 + PUB_KEY_HASH_LEN]);
        hash
    }

    /// The trailing checksum bytes.
    pub fn checksum(&self) -> [u8; ADDRESS_CHECKSUM_LEN] {
        let mut chk = [0u8; ADDRESS_CHECKSUM_LEN];
        chk.copy_from_slice(&self.payload[FULL_PAYLOAD_LEN - ADDRESS_CHECKSUM_LEN..]);
        chk
    }

    /// The full 25-byte payload.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; FULL_PAYLOAD_LEN] {
        &self.payload
    }

    /// Base58 text form of the payload.
    pub fn to_base58(&self) -> String {
        base58::encode(&self.payload)
    }
}

/// Strict parse: the text must decode to exactly 25 bytes with a valid
/// checksum. See [`crate::validate`] for the boolean check.
impl FromStr for BitcoinAddress {
    type Err = Base58Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let full = base58::decode(s)?;
        if full.len() != FULL_PAYLOAD_LEN {
            return Err(Base58Error::InvalidLength {
                expected: FULL_PAYLOAD_LEN,
                actual: full.len(),
            });
        }
        check::split_verified(&full)?;

        let mut payload = [0u8; FULL_PAYLOAD_LEN];
        payload.copy_from_slice(&full);
        Ok(Self { payload })
    }
}

impl fmt::Debug for BitcoinAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitcoinAddress({})", self.to_base58())
    }
}

impl fmt::Display for BitcoinAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

/// `ripemd160(sha256(key_prefix || X))` where X is the first 32 bytes of the key.
pub fn hash_pub_key(
    public_key: &[u8; PUBLIC_KEY_LEN],
    key_prefix: u8,
) -> [u8; PUB_KEY_HASH_LEN] {
    let mut sha_input = [0u8; 1 + COORDINATE_LEN];
    sha_input[0] = key_prefix;
    sha_input[1..].copy_from_slice(&public_key[..COORDINATE_LEN]);
    hash160(&sha_input)
}

/// Derives the Base58Check address of a raw public key.
pub fn derive_bitcoin_address(
    public_key: &[u8; PUBLIC_KEY_LEN],
    version: u8,
    key_prefix: u8,
) -> BitcoinAddress {
    let pub_key_hash = hash_pub_key(public_key, key_prefix);
    let address = BitcoinAddress::from_pub_key_hash(version, &pub_key_hash);
    log::debug!(
        "derived bitcoin address {} (version {:#04x}, key prefix {:#04x}, hash {})",
        address,
        version,
        key_prefix,
        hex::encode(pub_key_hash)
    );
    address
}
