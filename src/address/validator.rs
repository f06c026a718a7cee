//! Boolean validation of Base58Check addresses.

use rayon::prelude::*;

use crate::codec::{base58, check};

/// Returns true if `address` is Base58 text whose trailing four bytes are
/// the checksum of the rest.
///
/// Only the checksum is checked: any Base58Check payload of at least five
/// bytes passes, whatever its length or version. Parse with
/// [`BitcoinAddress::from_str`](crate::BitcoinAddress) to also require the
/// 25-byte address layout.
///
/// Every failure (foreign character, payload shorter than version +
/// checksum, checksum mismatch) yields `false`. Never panics.
pub fn validate(address: &str) -> bool {
    let payload = match base58::decode(address) {
        Ok(payload) => payload,
        Err(e) => {
            log::debug!("rejecting address: {}", e);
            return false;
        }
    };

    match check::split_verified(&payload) {
        Ok(_) => true,
        Err(e) => {
            log::debug!("rejecting address {:?}: {}", address, e);
            false
        }
    }
}

/// Validates many addresses in parallel, preserving order.
pub fn validate_all<S: AsRef<str> + Sync>(addresses: &[S]) -> Vec<bool> {
    addresses
        .par_iter()
        .map(|address| validate(address.as_ref()))
        .collect()
}
