//! Hex string helpers for textual key input.

use crate::error::{K1Error, K1Result};

/// Remove the first occurrence of `0x` from a hex string.
///
/// Only one occurrence is removed, so `"0x0x02.."` keeps its second marker
/// and fails to decode.
pub fn strip_hex_prefix(input: &str) -> String {
    input.replacen("0x", "", 1)
}

/// Decode a hex string (optionally `0x`-marked) into exactly `N` bytes.
pub fn decode_fixed<const N: usize>(input: &str, what: &'static str) -> K1Result<[u8; N]> {
    let bytes = hex::decode(strip_hex_prefix(input))?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| K1Error::invalid_length(what, N, actual))
}
