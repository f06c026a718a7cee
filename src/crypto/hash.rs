//! Hash primitives shared by both address schemes.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use tiny_keccak::{Hasher, Keccak};

/// Prefix of the Ethereum signed-message framing.
const SIGNED_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Keccak-256 of arbitrary bytes (output 32 bytes).
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(input);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// SHA-256 of arbitrary bytes.
pub fn sha256(input: &[u8]) -> [u8; 32] {
    Sha256::digest(input).into()
}

/// SHA-256 applied twice.
pub fn double_sha256(input: &[u8]) -> [u8; 32] {
    sha256(&sha256(input))
}

/// RIPEMD-160 of arbitrary bytes (output 20 bytes).
pub fn ripemd160(input: &[u8]) -> [u8; 20] {
    Ripemd160::digest(input).into()
}

/// RIPEMD-160 of the SHA-256 digest, the usual Bitcoin "HASH160".
pub fn hash160(input: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(input))
}

/// Hash of `data` framed as an Ethereum signed message.
///
/// Computed as
/// `keccak256("\x19Ethereum Signed Message:\n" ++ len(data) ++ data)`,
/// which keeps a signed message from ever being a valid transaction.
pub fn text_hash(data: &[u8]) -> [u8; 32] {
    text_and_hash(data).0
}

/// Same as [`text_hash`] but also returns the framed message.
///
/// Non-UTF-8 bytes in `data` are replaced lossily in the returned string;
/// the hash always covers the raw bytes.
pub fn text_and_hash(data: &[u8]) -> ([u8; 32], String) {
    let header = format!("{}{}", SIGNED_MESSAGE_PREFIX, data.len());

    let mut framed = Vec::with_capacity(header.len() + data.len());
    framed.extend_from_slice(header.as_bytes());
    framed.extend_from_slice(data);

    let message = format!("{}{}", header, String::from_utf8_lossy(data));
    (keccak256(&framed), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_sha256_abc() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_double_sha256_abc() {
        assert_eq!(
            hex::encode(double_sha256(b"abc")),
            "4f8b42c22dd3729b519ba6f68d2da7cc5b2d606d05daed5ad5128cc03e6c6358"
        );
        assert_eq!(double_sha256(b"abc"), sha256(&sha256(b"abc")));
    }

    #[test]
    fn test_ripemd160_abc() {
        assert_eq!(
            hex::encode(ripemd160(b"abc")),
            "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"
        );
    }

    #[test]
    fn test_hash160_composes() {
        assert_eq!(hash160(b"abc"), ripemd160(&sha256(b"abc")));
    }

    #[test]
    fn test_text_hash() {
        let (hash, message) = text_and_hash(b"hello");
        assert_eq!(message, "\x19Ethereum Signed Message:\n5hello");
        assert_eq!(
            hex::encode(hash),
            "50b2c43fd39106bafbba0da34fc430e1f91e3c96ea2acee2bc34119f92b37750"
        );
        assert_eq!(text_hash(b"hello"), hash);
    }
}
