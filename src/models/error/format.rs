use serde::Serialize;
use thiserror::Error;

/// Errors raised while converting between decimal text and fixed-point amounts.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FormatError {
    #[error("Malformed decimal '{0}'")]
    MalformedDecimal(String),

    #[error("Amount '{value}' has more than {max_digits} fractional digits")]
    PrecisionLoss { value: String, max_digits: usize },

    #[error("Amount '{0}' overflows a 64-bit fixed-point value")]
    Overflow(String),

    #[error("Cannot represent price '{0}' as a 32-bit fraction")]
    InvalidPrice(String),
}
