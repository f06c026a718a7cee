//! Cryptographic primitives for key and address generation.
//!
//! This module provides:
//! - Secure random key generation using secp256k1
//! - The hash pipeline: Keccak-256, SHA-256, double SHA-256, RIPEMD-160

pub mod hash;
mod keypair;

pub use keypair::{
    compressed_prefix, public_key_from_hex, y_is_odd, KeyError, Keypair, COORDINATE_LEN,
    PUBLIC_KEY_LEN,
};
