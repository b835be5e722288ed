//! Base64 text wrapping for top-level XDR byte streams.

use crate::error::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Standard-alphabet, padded base64 of raw XDR bytes.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_base64(text: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(text.trim())?)
}
