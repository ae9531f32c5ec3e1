//! Transaction result decoding.
//!
//! Only the leading fields of `TransactionResult` are decoded: the fee
//! charged and the result code. Per-operation results follow and are left
//! to callers that need them.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::Serialize;

use super::{xdr_enum_codec, ReadXdr, XdrReader};
use crate::models::CodecError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, Serialize, IntoPrimitive, TryFromPrimitive,
)]
#[repr(i32)]
pub enum TransactionResultCode {
    FeeBumpInnerSuccess = 1,
    Success = 0,
    Failed = -1,
    TooEarly = -2,
    TooLate = -3,
    MissingOperation = -4,
    BadSeq = -5,
    BadAuth = -6,
    InsufficientBalance = -7,
    NoAccount = -8,
    InsufficientFee = -9,
    BadAuthExtra = -10,
    InternalError = -11,
    NotSupported = -12,
    FeeBumpInnerFailed = -13,
    BadSponsorship = -14,
    BadMinSeqAgeOrGap = -15,
    Malformed = -16,
    SorobanInvalid = -17,
}

xdr_enum_codec!(TransactionResultCode);

impl TransactionResultCode {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            TransactionResultCode::Success | TransactionResultCode::FeeBumpInnerSuccess
        )
    }

    /// Codes for which re-submitting the same envelope can never succeed.
    pub fn is_permanent(&self) -> bool {
        !matches!(
            self,
            TransactionResultCode::Success
                | TransactionResultCode::FeeBumpInnerSuccess
                | TransactionResultCode::TooEarly
                | TransactionResultCode::InsufficientFee
                | TransactionResultCode::InternalError
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransactionResultHeader {
    pub fee_charged: i64,
    pub code: TransactionResultCode,
}

impl ReadXdr for TransactionResultHeader {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(TransactionResultHeader {
            fee_charged: r.read_i64()?,
            code: TransactionResultCode::read_xdr(r)?,
        })
    }
}

impl TransactionResultHeader {
    /// Decodes the header from a base64 `TransactionResult`, ignoring the
    /// remainder of the buffer.
    pub fn from_result_xdr_base64(data: &str) -> Result<Self, CodecError> {
        let bytes = crate::utils::base64_decode(data)?;
        let (header, _) = Self::from_xdr_prefix(&bytes)?;
        Ok(header)
    }
}
