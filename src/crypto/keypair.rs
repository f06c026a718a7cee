//! secp256k1 keypair generation.

use std::fmt;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use secp256k1::{PublicKey, Secp256k1, SecretKey};

/// Width of one affine coordinate on secp256k1.
pub const COORDINATE_LEN: usize = 32;

/// Length of the raw public key (X || Y, no `0x04` tag).
pub const PUBLIC_KEY_LEN: usize = 2 * COORDINATE_LEN;

/// Errors raised while creating or parsing keys.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("Random source unavailable: {0}")]
    RandomSource(#[from] rand::Error),

    #[error("Invalid secret key: {0}")]
    InvalidSecretKey(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}

/// Represents a secp256k1 keypair (private key + raw public key).
#[derive(Clone)]
pub struct Keypair {
    /// The private key bytes (32 bytes)
    secret_key: [u8; 32],
    /// Uncompressed public point, X || Y, each big-endian and zero-padded
    public_key: [u8; PUBLIC_KEY_LEN],
}

impl Keypair {
    /// Generates a new random keypair from the operating system CSPRNG.
    pub fn generate() -> Result<Self, KeyError> {
        Self::generate_with(&mut OsRng)
    }

    /// Generates a new random keypair from the given RNG.
    ///
    /// Entropy failures are returned as [`KeyError::RandomSource`]; there is
    /// no fallback source. Draws that fall outside the curve order are
    /// discarded and redrawn from the same RNG.
    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, KeyError> {
        let mut candidate = [0u8; 32];

        loop {
            if let Err(e) = rng.try_fill_bytes(&mut candidate) {
                log::warn!("entropy source failed during key generation: {}", e);
                return Err(KeyError::RandomSource(e));
            }

            if let Ok(secret_key) = SecretKey::from_slice(&candidate) {
                return Ok(Self::from_secret(&secret_key));
            }
        }
    }

    /// Builds the keypair for an existing secret key.
    pub fn from_secret_key(secret_bytes: [u8; 32]) -> Result<Self, KeyError> {
        let secret_key = SecretKey::from_slice(&secret_bytes)
            .map_err(|e| KeyError::InvalidSecretKey(e.to_string()))?;
        Ok(Self::from_secret(&secret_key))
    }

    /// Builds the keypair for a hex encoded secret key (`0x` prefix optional).
    pub fn from_secret_hex(secret_hex: &str) -> Result<Self, KeyError> {
        let bytes = decode_hex(secret_hex)?;
        let secret_bytes: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            KeyError::InvalidSecretKey(format!("expected 32 bytes, got {}", b.len()))
        })?;
        Self::from_secret_key(secret_bytes)
    }

    fn from_secret(secret_key: &SecretKey) -> Self {
        let secp = Secp256k1::signing_only();
        let public_key = PublicKey::from_secret_key(&secp, secret_key);

        Self {
            secret_key: secret_key.secret_bytes(),
            public_key: raw_public_key(&public_key),
        }
    }

    /// Returns the raw 64-byte public key (X || Y).
    #[inline]
    pub fn public_key(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.public_key
    }

    /// Returns the public key as a hex string (without 0x prefix).
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key)
    }

    /// Returns the private key as a hex string (without 0x prefix).
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key)
    }

    /// Returns the private key bytes.
    pub fn private_key_bytes(&self) -> &[u8; 32] {
        &self.secret_key
    }

    /// Returns true when the Y coordinate is odd.
    pub fn y_is_odd(&self) -> bool {
        y_is_odd(&self.public_key)
    }

    /// The SEC1 compressed-key tag matching this key's Y parity.
    pub fn compressed_prefix(&self) -> u8 {
        compressed_prefix(&self.public_key)
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("secret_key", &"<redacted>")
            .field("public_key", &self.public_key_hex())
            .finish()
    }
}

/// Returns true when the Y coordinate of a raw public key is odd.
pub fn y_is_odd(public_key: &[u8; PUBLIC_KEY_LEN]) -> bool {
    public_key[PUBLIC_KEY_LEN - 1] & 1 == 1
}

/// `0x03` for an odd Y coordinate, `0x02` otherwise.
pub fn compressed_prefix(public_key: &[u8; PUBLIC_KEY_LEN]) -> u8 {
    if y_is_odd(public_key) {
        0x03
    } else {
        0x02
    }
}

/// Parses an externally supplied public key.
///
/// Accepts 64 raw bytes (X || Y) or the 65-byte SEC1 uncompressed form with
/// its `0x04` tag. The point must lie on the curve.
pub fn public_key_from_hex(public_hex: &str) -> Result<[u8; PUBLIC_KEY_LEN], KeyError> {
    let bytes = decode_hex(public_hex)?;

    let mut tagged = [0u8; PUBLIC_KEY_LEN + 1];
    tagged[0] = 0x04;
    match bytes.len() {
        PUBLIC_KEY_LEN => tagged[1..].copy_from_slice(&bytes),
        n if n == PUBLIC_KEY_LEN + 1 && bytes[0] == 0x04 => tagged.copy_from_slice(&bytes),
        n => {
            return Err(KeyError::InvalidPublicKey(format!(
                "expected {} raw or {} tagged bytes, got {}",
                PUBLIC_KEY_LEN,
                PUBLIC_KEY_LEN + 1,
                n
            )))
        }
    }

    let public_key =
        PublicKey::from_slice(&tagged).map_err(|e| KeyError::InvalidPublicKey(e.to_string()))?;
    Ok(raw_public_key(&public_key))
}

/// Serializes the public key uncompressed and strips the `0x04` tag.
fn raw_public_key(public_key: &PublicKey) -> [u8; PUBLIC_KEY_LEN] {
    let serialized = public_key.serialize_uncompressed();
    let mut raw = [0u8; PUBLIC_KEY_LEN];
    raw.copy_from_slice(&serialized[1..]);
    raw
}

fn decode_hex(input: &str) -> Result<Vec<u8>, KeyError> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| KeyError::InvalidHex(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const G_HEX: &str = "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798\
                         483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8";

    fn secret(n: u8) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[31] = n;
        bytes
    }

    /// An RNG whose entropy source is always unavailable.
    struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {}

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "entropy pool drained",
            )))
        }
    }

    impl CryptoRng for FailingRng {}

    #[test]
    fn test_keypair_generation() {
        let keypair = Keypair::generate().unwrap();
        assert_eq!(keypair.private_key_bytes().len(), 32);
        assert_eq!(keypair.public_key().len(), 64);
        assert_ne!(keypair.private_key_bytes(), &[0u8; 32]);
    }

    #[test]
    fn test_generator_point() {
        let keypair = Keypair::from_secret_key(secret(1)).unwrap();
        assert_eq!(keypair.public_key_hex(), G_HEX);
        assert!(!keypair.y_is_odd());
        assert_eq!(keypair.compressed_prefix(), 0x02);
    }

    #[test]
    fn test_odd_parity() {
        // 6G has an odd Y coordinate
        let keypair = Keypair::from_secret_key(secret(6)).unwrap();
        assert!(keypair.y_is_odd());
        assert_eq!(keypair.compressed_prefix(), 0x03);
    }

    #[test]
    fn test_random_source_failure() {
        let err = Keypair::generate_with(&mut FailingRng).unwrap_err();
        assert!(matches!(err, KeyError::RandomSource(_)));
    }

    #[test]
    fn test_zero_secret_rejected() {
        let err = Keypair::from_secret_key([0u8; 32]).unwrap_err();
        assert!(matches!(err, KeyError::InvalidSecretKey(_)));
    }

    #[test]
    fn test_from_secret_hex() {
        let hex_key = format!("0x{}", hex::encode(secret(1)));
        let keypair = Keypair::from_secret_hex(&hex_key).unwrap();
        assert_eq!(keypair.public_key_hex(), G_HEX);

        assert!(matches!(
            Keypair::from_secret_hex("zz"),
            Err(KeyError::InvalidHex(_))
        ));
        assert!(matches!(
            Keypair::from_secret_hex("01"),
            Err(KeyError::InvalidSecretKey(_))
        ));
    }

    #[test]
    fn test_public_key_from_hex() {
        let raw = public_key_from_hex(G_HEX).unwrap();
        assert_eq!(hex::encode(raw), G_HEX);

        let tagged = public_key_from_hex(&format!("04{}", G_HEX)).unwrap();
        assert_eq!(tagged, raw);

        // Not on the curve
        let bogus = "00".repeat(64);
        assert!(matches!(
            public_key_from_hex(&bogus),
            Err(KeyError::InvalidPublicKey(_))
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let keypair = Keypair::from_secret_key(secret(1)).unwrap();
        let printed = format!("{:?}", keypair);
        assert!(printed.contains("<redacted>"));
        assert!(!printed.contains(&keypair.private_key_hex()));
    }
}
