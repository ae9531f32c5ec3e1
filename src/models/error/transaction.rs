use crate::services::provider::ProviderError;

use super::{CodecError, FormatError, StrKeyError};
use serde::Serialize;
use thiserror::Error;

/// Errors tied to the signature phase of a transaction.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SignatureError {
    #[error("too many signatures: the unsigned envelope was requested after signing")]
    TooMany,

    #[error("not enough signatures: the signed envelope needs at least one signature")]
    NotEnough,

    #[error("signature limit of {0} reached")]
    LimitReached(usize),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Invalid hash(x) preimage: {0}")]
    InvalidPreimage(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FeeError {
    #[error("Fee bump base fee must be at least {required}, got {provided}")]
    BelowMinimum { required: i64, provided: i64 },

    #[error("Inner transaction has no operations")]
    EmptyInnerTransaction,

    #[error("Resource fee {resource_fee} exceeds the inner transaction fee {inner_fee}")]
    ResourceFeeExceedsFee { resource_fee: i64, inner_fee: i64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NetworkError {
    #[error("No network selected: a network passphrase is required to compute a signature base")]
    NotSelected,
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum OverflowError {
    #[error("Fee overflow: {fee_per_operation} x {operation_count} operations (+ {resource_fee} resource fee)")]
    Fee {
        fee_per_operation: i64,
        operation_count: usize,
        resource_fee: i64,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum TransactionError {
    #[error("Transaction validation error: {0}")]
    ValidationError(String),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Address error: {0}")]
    StrKey(#[from] StrKeyError),

    #[error("Amount error: {0}")]
    Format(#[from] FormatError),

    #[error("Signature error: {0}")]
    Signature(#[from] SignatureError),

    #[error("Fee error: {0}")]
    Fee(#[from] FeeError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Overflow error: {0}")]
    Overflow(#[from] OverflowError),

    #[error("Underlying provider error: {0}")]
    UnderlyingProvider(#[from] ProviderError),

    #[error("Stellar transaction simulation failed: {0}")]
    SimulationFailed(String),
}

impl TransactionError {
    /// Determines if this error is transient (can retry) or permanent (should fail).
    ///
    /// Only provider failures can be transient. Everything raised while
    /// building, encoding or signing is deterministic and will fail again.
    pub fn is_transient(&self) -> bool {
        match self {
            TransactionError::UnderlyingProvider(err) => err.is_transient(),
            TransactionError::ValidationError(_)
            | TransactionError::Codec(_)
            | TransactionError::StrKey(_)
            | TransactionError::Format(_)
            | TransactionError::Signature(_)
            | TransactionError::Fee(_)
            | TransactionError::Network(_)
            | TransactionError::Overflow(_)
            | TransactionError::SimulationFailed(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_below_minimum_message_names_required() {
        let err = FeeError::BelowMinimum {
            required: 400,
            provided: 200,
        };
        assert!(err.to_string().contains("at least 400"));
    }

    #[test]
    fn test_signature_phase_messages() {
        assert!(SignatureError::TooMany
            .to_string()
            .starts_with("too many signatures"));
        assert!(SignatureError::NotEnough
            .to_string()
            .starts_with("not enough signatures"));
    }

    #[test]
    fn test_is_transient() {
        assert!(!TransactionError::ValidationError("x".into()).is_transient());
        assert!(!TransactionError::from(NetworkError::NotSelected).is_transient());
        assert!(TransactionError::from(ProviderError::Timeout).is_transient());
        assert!(
            !TransactionError::from(ProviderError::InvalidResponse("bad".into())).is_transient()
        );
    }

    #[test]
    fn test_from_conversions() {
        let err: TransactionError = CodecError::NonZeroPadding.into();
        assert!(matches!(err, TransactionError::Codec(CodecError::NonZeroPadding)));

        let err: TransactionError = SignatureError::NotEnough.into();
        assert!(matches!(
            err,
            TransactionError::Signature(SignatureError::NotEnough)
        ));
    }
}
