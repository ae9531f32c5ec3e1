//! Text form of XDR payloads: standard alphabet, padded.

use base64::{engine::general_purpose::STANDARD, Engine};

pub fn base64_encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// ASCII whitespace anywhere in `data` is skipped, so line-wrapped envelopes
/// decode as-is.
pub fn base64_decode(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    if data.bytes().any(|b| b.is_ascii_whitespace()) {
        let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        return STANDARD.decode(compact);
    }
    STANDARD.decode(data)
}
