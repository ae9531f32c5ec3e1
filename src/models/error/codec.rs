use num_enum::{TryFromPrimitive, TryFromPrimitiveError};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while reading or writing XDR.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CodecError {
    #[error("Unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("Unknown discriminant {value} for {type_name}")]
    UnknownDiscriminant { type_name: &'static str, value: i64 },

    #[error("Non-zero padding byte")]
    NonZeroPadding,

    #[error("Declared length {declared} exceeds remaining input of {remaining} bytes")]
    LengthExceedsInput { declared: usize, remaining: usize },

    #[error("Declared length {declared} exceeds maximum of {max}")]
    LengthExceedsMax { declared: usize, max: u32 },

    #[error("Invalid boolean value: {0}")]
    InvalidBool(u32),

    #[error("Invalid optional presence flag: {0}")]
    InvalidOptionalFlag(u32),

    #[error("Invalid UTF-8 in string")]
    InvalidUtf8,

    #[error("Nesting depth limit exceeded")]
    DepthLimitExceeded,

    #[error("Read length limit exceeded")]
    ReadLimitExceeded,

    #[error("{0} trailing bytes after decoded value")]
    TrailingBytes(usize),

    #[error("Invalid base64: {0}")]
    InvalidBase64(String),

    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}

impl CodecError {
    /// Builds an `UnknownDiscriminant` for a union arm that exists in the
    /// discriminant enum but is not allowed in this particular union.
    pub fn unexpected_arm(type_name: &'static str, value: i32) -> Self {
        CodecError::UnknownDiscriminant {
            type_name,
            value: value as i64,
        }
    }
}

impl<E> From<TryFromPrimitiveError<E>> for CodecError
where
    E: TryFromPrimitive,
    E::Primitive: Into<i64>,
{
    fn from(err: TryFromPrimitiveError<E>) -> Self {
        CodecError::UnknownDiscriminant {
            type_name: E::NAME,
            value: err.number.into(),
        }
    }
}

impl From<base64::DecodeError> for CodecError {
    fn from(err: base64::DecodeError) -> Self {
        CodecError::InvalidBase64(err.to_string())
    }
}
