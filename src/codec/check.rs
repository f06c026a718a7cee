//! Base58Check: `base58(version || payload || checksum)`.

use crate::crypto::hash::double_sha256;

use super::{base58, Base58Error};

/// Number of checksum bytes appended to a versioned payload.
pub const CHECKSUM_LEN: usize = 4;

/// First four bytes of `sha256(sha256(versioned_payload))`.
pub fn checksum(versioned_payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = double_sha256(versioned_payload);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

/// Builds `version || payload || checksum` without encoding it.
pub fn with_checksum(version: u8, payload: &[u8]) -> Vec<u8> {
    let mut full = Vec::with_capacity(1 + payload.len() + CHECKSUM_LEN);
    full.push(version);
    full.extend_from_slice(payload);
    let chk = checksum(&full);
    full.extend_from_slice(&chk);
    full
}

/// Base58Check-encodes a payload under the given version byte.
pub fn encode(version: u8, payload: &[u8]) -> String {
    base58::encode(&with_checksum(version, payload))
}

/// Decodes a Base58Check string into its version byte and payload.
///
/// Unlike the address validator this reports why the input was rejected.
pub fn decode(input: &str) -> Result<(u8, Vec<u8>), Base58Error> {
    let full = base58::decode(input)?;
    let (version, payload) = split_verified(&full)?;
    Ok((version, payload.to_vec()))
}

/// Splits a decoded Base58Check buffer after verifying its checksum.
pub(crate) fn split_verified(full: &[u8]) -> Result<(u8, &[u8]), Base58Error> {
    if full.len() < 1 + CHECKSUM_LEN {
        return Err(Base58Error::TooShort(full.len()));
    }

    let (versioned, claimed) = full.split_at(full.len() - CHECKSUM_LEN);
    if checksum(versioned)[..] != *claimed {
        return Err(Base58Error::ChecksumMismatch);
    }

    Ok((versioned[0], &versioned[1..]))
}
