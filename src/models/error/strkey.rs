use serde::Serialize;
use thiserror::Error;

/// Errors raised by the StrKey text codec.
///
/// Each failure mode is its own variant so callers (and tests) can tell a
/// typo in the alphabet apart from a truncated key or a corrupted checksum.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StrKeyError {
    #[error("Invalid base32 encoding: {0}")]
    InvalidEncoding(String),

    #[error("Unknown version byte: {0}")]
    UnknownVersionByte(u8),

    #[error("Unexpected version byte: expected {expected}, got {actual}")]
    UnexpectedVersionByte { expected: u8, actual: u8 },

    #[error("Invalid payload length {actual} for version byte {version}")]
    InvalidLength { version: u8, actual: usize },

    #[error("Checksum mismatch: expected {expected:#06x}, got {actual:#06x}")]
    ChecksumMismatch { expected: u16, actual: u16 },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}
