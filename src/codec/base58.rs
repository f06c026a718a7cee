//! Plain Base58 with the Bitcoin alphabet.
//!
//! Each leading zero byte is written as a leading `'1'` (the zero digit) and
//! restored on decode.

use super::Base58Error;

/// Encodes bytes as Base58.
pub fn encode(input: &[u8]) -> String {
    bs58::encode(input)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_string()
}

/// Decodes a Base58 string, restoring leading zero bytes.
///
/// Error positions are byte offsets into `input`.
pub fn decode(input: &str) -> Result<Vec<u8>, Base58Error> {
    bs58::decode(input)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_vec()
        .map_err(|e| decode_error(input, e))
}

fn decode_error(input: &str, err: bs58::decode::Error) -> Base58Error {
    match err {
        bs58::decode::Error::InvalidCharacter { character, index } => {
            Base58Error::InvalidCharacter { character, index }
        }
        // Every byte before `index` is ASCII, so it starts a char.
        bs58::decode::Error::NonAsciiCharacter { index } => Base58Error::InvalidCharacter {
            character: input
                .get(index..)
                .and_then(|rest| rest.chars().next())
                .unwrap_or(char::REPLACEMENT_CHARACTER),
            index,
        },
        other => Base58Error::Decode(other),
    }
}
