use serde::Serialize;
use thiserror::Error;

use crate::models::xdr::TransactionResultCode;

mod retry;
pub use retry::*;

mod stellar;
pub use stellar::*;

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum ProviderError {
    #[error("Request timeout")]
    Timeout,
    #[error("Request cancelled")]
    Cancelled,
    #[error("Rate limited (HTTP 429)")]
    RateLimited,
    #[error("Bad gateway (HTTP 502)")]
    BadGateway,
    #[error("Node asked to try again later")]
    TryAgainLater,
    #[error("Request error (HTTP {status_code}): {error}")]
    RequestError { error: String, status_code: u16 },
    #[error("JSON-RPC error (code {code}): {message}")]
    RpcErrorCode { code: i64, message: String },
    #[error("Transport error: {0}")]
    TransportError(String),
    #[error("Transaction rejected ({code:?}): {message}")]
    Rejected {
        code: Option<TransactionResultCode>,
        message: String,
    },
    #[error("Simulation failed: {0}")]
    SimulationFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Other provider error: {0}")]
    Other(String),
}

impl ProviderError {
    /// Determines if this error is transient (can retry) or permanent (should fail).
    pub fn is_transient(&self) -> bool {
        is_retriable_error(self)
    }
}

impl From<crate::models::CodecError> for ProviderError {
    fn from(err: crate::models::CodecError) -> Self {
        ProviderError::InvalidResponse(format!("XDR decode error: {err}"))
    }
}

impl From<String> for ProviderError {
    fn from(error: String) -> Self {
        ProviderError::Other(error)
    }
}

/// Decides whether a failed RPC call may be retried.
pub fn is_retriable_error(error: &ProviderError) -> bool {
    match error {
        ProviderError::Timeout
        | ProviderError::RateLimited
        | ProviderError::BadGateway
        | ProviderError::TryAgainLater
        | ProviderError::TransportError(_) => true,

        ProviderError::RequestError { status_code, .. } => match *status_code {
            // persistent server-side issues
            501 | 505 => false,
            500 | 502..=504 | 506..=599 => true,
            408 | 425 | 429 => true,
            _ => false,
        },

        ProviderError::RpcErrorCode { code, .. } => match code {
            // resource unavailable, limit exceeded, internal error
            -32002 | -32005 | -32603 => true,
            _ => false,
        },

        ProviderError::Cancelled
        | ProviderError::Rejected { .. }
        | ProviderError::SimulationFailed(_)
        | ProviderError::InvalidResponse(_) => false,

        ProviderError::Other(message) => {
            let msg_lower = message.to_lowercase();
            msg_lower.contains("timeout")
                || msg_lower.contains("connection")
                || msg_lower.contains("reset")
        }
    }
}
