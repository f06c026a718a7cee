//! Reversible text encodings.
//!
//! - `base58`: Bitcoin-alphabet Base58 with leading-zero preservation
//! - `check`: Base58Check framing (version byte + 4-byte double-SHA-256 checksum)

pub mod base58;
pub mod check;

/// Errors raised while decoding Base58 / Base58Check text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Base58Error {
    #[error("Invalid Base58 character {character:?} at position {index}")]
    InvalidCharacter { character: char, index: usize },

    #[error("Payload too short: {0} bytes")]
    TooShort(usize),

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("Invalid payload length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Base58 decoding failed: {0}")]
    Decode(bs58::decode::Error),
}
