//! Results exchanged with a Stellar RPC node.
//!
//! Field names follow the node's JSON (camelCase); XDR payloads stay base64
//! until a caller asks for the decoded form.

use serde::{Deserialize, Serialize};

use crate::models::{
    xdr::{ReadXdr, SorobanAuthorizationEntry, SorobanTransactionData, TransactionResultHeader},
    CodecError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SendTransactionStatus {
    Pending,
    Duplicate,
    TryAgainLater,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionResult {
    pub hash: String,
    pub status: SendTransactionStatus,
    pub latest_ledger: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_result_xdr: Option<String>,
}

impl SendTransactionResult {
    pub fn error_result(&self) -> Option<Result<TransactionResultHeader, CodecError>> {
        self.error_result_xdr
            .as_deref()
            .map(TransactionResultHeader::from_result_xdr_base64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GetTransactionStatus {
    Success,
    Failed,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionResult {
    pub status: GetTransactionStatus,
    pub latest_ledger: u32,
    #[serde(default)]
    pub ledger: Option<u32>,
    #[serde(default)]
    pub envelope_xdr: Option<String>,
    #[serde(default)]
    pub result_xdr: Option<String>,
    #[serde(default)]
    pub result_meta_xdr: Option<String>,
}

impl GetTransactionResult {
    pub fn is_known(&self) -> bool {
        self.status != GetTransactionStatus::NotFound
    }

    pub fn result(&self) -> Option<Result<TransactionResultHeader, CodecError>> {
        self.result_xdr
            .as_deref()
            .map(TransactionResultHeader::from_result_xdr_base64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationHostFunctionResult {
    #[serde(default)]
    pub auth: Vec<String>,
    pub xdr: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub latest_ledger: u32,
    #[serde(default)]
    pub transaction_data: Option<String>,
    #[serde(default, with = "optional_string_number")]
    pub min_resource_fee: Option<i64>,
    #[serde(default)]
    pub results: Vec<SimulationHostFunctionResult>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SimulationResult {
    pub fn soroban_data(&self) -> Result<Option<SorobanTransactionData>, CodecError> {
        self.transaction_data
            .as_deref()
            .map(SorobanTransactionData::from_xdr_base64)
            .transpose()
    }

    /// Authorization entries the simulated invocation requires.
    pub fn auth_entries(&self) -> Result<Vec<SorobanAuthorizationEntry>, CodecError> {
        self.results
            .iter()
            .flat_map(|result| result.auth.iter())
            .map(|entry| SorobanAuthorizationEntry::from_xdr_base64(entry))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryResult {
    pub key: String,
    pub xdr: String,
    pub last_modified_ledger_seq: u32,
    #[serde(default)]
    pub live_until_ledger_seq: Option<u32>,
}

/// RPC nodes encode 64-bit fees as JSON strings.
mod optional_string_number {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_str(&v.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StringOrNumber {
            String(String),
            Number(i64),
        }

        match Option::<StringOrNumber>::deserialize(deserializer)? {
            None => Ok(None),
            Some(StringOrNumber::Number(n)) => Ok(Some(n)),
            Some(StringOrNumber::String(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
        }
    }
}
