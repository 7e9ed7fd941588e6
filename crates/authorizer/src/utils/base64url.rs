//! Base64URL decoding (RFC 4648 Section 5, no padding)

use crate::error::{Error, Result};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

/// Decode `input` to bytes, refusing anything that decodes past `max_size`
///
/// The length check runs on the encoded form first so oversized input is
/// never decoded.
pub(crate) fn decode_bytes(input: &str, max_size: usize) -> Result<Vec<u8>> {
    let decoded_len = input.len() / 4 * 3 + (input.len() % 4).saturating_sub(1);
    if decoded_len > max_size {
        return Err(Error::TokenParse(format!(
            "Decoded size exceeds limit: {decoded_len} bytes (max: {max_size})"
        )));
    }

    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| Error::TokenParse(format!("Base64URL decode failed: {e}")))
}

/// Decode `input` to a UTF-8 string with the same limit as [`decode_bytes`]
pub(crate) fn decode_string(input: &str, max_size: usize) -> Result<String> {
    let bytes = decode_bytes(input, max_size)?;
    String::from_utf8(bytes).map_err(|e| Error::TokenParse(format!("Invalid UTF-8: {e}")))
}
