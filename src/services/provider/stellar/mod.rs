//! Stellar provider.
//!
//! [`StellarRpcTransport`] is the narrow seam to a Stellar RPC node: it moves
//! base64 XDR and small typed results, and JSON-RPC framing lives in its
//! implementation. [`StellarProvider`] layers retries, per-call timeouts,
//! cancellation and idempotent submission on top of any transport.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::sync::watch;

#[cfg(test)]
use mockall::automock;

use crate::models::{
    rpc::{
        GetTransactionResult, LedgerEntryResult, SendTransactionResult, SendTransactionStatus,
        SimulationResult,
    },
    xdr::{AccountId, Hash, LedgerKey, TransactionEnvelope, WriteXdr},
};
use crate::services::provider::{retry_rpc_call, ProviderError, RetryConfig};

#[async_trait]
#[cfg_attr(test, automock)]
pub trait StellarRpcTransport: Send + Sync {
    async fn send_transaction(
        &self,
        envelope_xdr: &str,
    ) -> Result<SendTransactionResult, ProviderError>;
    async fn get_transaction(&self, hash_hex: &str) -> Result<GetTransactionResult, ProviderError>;
    async fn simulate_transaction(
        &self,
        envelope_xdr: &str,
    ) -> Result<SimulationResult, ProviderError>;
    async fn get_ledger_entries(
        &self,
        keys_xdr: &[String],
    ) -> Result<Vec<LedgerEntryResult>, ProviderError>;
    /// Current sequence number of a `G...` account.
    async fn get_account_sequence(&self, account_id: &str) -> Result<i64, ProviderError>;
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The node took the envelope (`PENDING`, or `DUPLICATE` of an earlier send).
    Accepted {
        hash: String,
        status: SendTransactionStatus,
        latest_ledger: u32,
    },
    /// An earlier attempt already reached the network.
    AlreadyKnown(GetTransactionResult),
}

#[async_trait]
#[cfg_attr(test, automock)]
pub trait StellarProviderTrait: Send + Sync {
    async fn get_account_sequence(&self, account: &AccountId) -> Result<i64, ProviderError>;
    async fn simulate_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SimulationResult, ProviderError>;
    /// Submits `envelope`, whose hash is `hash`. Before any re-send the node is
    /// asked whether the hash is already known, so a transaction is never sent
    /// twice after an ambiguous failure.
    async fn submit_transaction(
        &self,
        envelope: &TransactionEnvelope,
        hash: &Hash,
    ) -> Result<SubmissionOutcome, ProviderError>;
    async fn get_transaction(&self, hash: &Hash) -> Result<GetTransactionResult, ProviderError>;
    async fn get_ledger_entries(
        &self,
        keys: &[LedgerKey],
    ) -> Result<Vec<LedgerEntryResult>, ProviderError>;
}

pub struct StellarProvider<T> {
    transport: Arc<T>,
    retry_config: RetryConfig,
    cancel: Option<watch::Receiver<bool>>,
}

impl<T> Clone for StellarProvider<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            retry_config: self.retry_config.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

impl<T: StellarRpcTransport + 'static> StellarProvider<T> {
    pub fn new(transport: T, retry_config: RetryConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            retry_config,
            cancel: None,
        }
    }

    /// Stops retrying once `true` is published on `cancel`.
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }

    /// Sequence number to use for the account's next transaction.
    pub async fn next_sequence_number(&self, account: &AccountId) -> Result<i64, ProviderError> {
        let current = self.get_account_sequence(account).await?;
        current.checked_add(1).ok_or_else(|| {
            ProviderError::InvalidResponse(format!("sequence number {current} cannot be bumped"))
        })
    }
}

fn interpret_send_result(
    result: SendTransactionResult,
    expected_hash: &str,
) -> Result<SubmissionOutcome, ProviderError> {
    if !result.hash.eq_ignore_ascii_case(expected_hash) {
        return Err(ProviderError::InvalidResponse(format!(
            "node returned hash {} for transaction {expected_hash}",
            result.hash
        )));
    }

    match result.status {
        SendTransactionStatus::Pending | SendTransactionStatus::Duplicate => {
            Ok(SubmissionOutcome::Accepted {
                hash: result.hash,
                status: result.status,
                latest_ledger: result.latest_ledger,
            })
        }
        SendTransactionStatus::TryAgainLater => Err(ProviderError::TryAgainLater),
        SendTransactionStatus::Error => {
            let code = match result.error_result() {
                Some(Ok(header)) => Some(header.code),
                Some(Err(e)) => {
                    warn!("Undecodable error result for {expected_hash}: {e}");
                    None
                }
                None => None,
            };
            Err(ProviderError::Rejected {
                code,
                message: format!("transaction {expected_hash} rejected by the node"),
            })
        }
    }
}

#[async_trait]
impl<T: StellarRpcTransport + 'static> StellarProviderTrait for StellarProvider<T> {
    async fn get_account_sequence(&self, account: &AccountId) -> Result<i64, ProviderError> {
        let account = account.to_string();
        let transport = &self.transport;
        retry_rpc_call(
            "get_account_sequence",
            &self.retry_config,
            self.cancel.as_ref(),
            |_| transport.get_account_sequence(&account),
        )
        .await
    }

    async fn simulate_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SimulationResult, ProviderError> {
        let envelope_xdr = envelope.to_xdr_base64();
        let transport = &self.transport;
        let result = retry_rpc_call(
            "simulate_transaction",
            &self.retry_config,
            self.cancel.as_ref(),
            |_| transport.simulate_transaction(&envelope_xdr),
        )
        .await?;

        if let Some(error) = &result.error {
            debug!("Simulation failed: {error}");
            return Err(ProviderError::SimulationFailed(error.clone()));
        }
        Ok(result)
    }

    async fn submit_transaction(
        &self,
        envelope: &TransactionEnvelope,
        hash: &Hash,
    ) -> Result<SubmissionOutcome, ProviderError> {
        let envelope_xdr = envelope.to_xdr_base64();
        let hash_hex = hash.to_string();
        let transport = &self.transport;
        let (envelope_xdr, hash_hex) = (&envelope_xdr, &hash_hex);

        let outcome = retry_rpc_call(
            "send_transaction",
            &self.retry_config,
            self.cancel.as_ref(),
            |attempt| async move {
                if attempt > 0 {
                    let known = transport.get_transaction(hash_hex).await?;
                    if known.is_known() {
                        info!(
                            "Transaction {hash_hex} already known ({:?}), not re-sending",
                            known.status
                        );
                        return Ok(SubmissionOutcome::AlreadyKnown(known));
                    }
                }
                let result = transport.send_transaction(envelope_xdr).await?;
                interpret_send_result(result, hash_hex)
            },
        )
        .await?;

        info!("Submitted transaction {hash_hex}");
        Ok(outcome)
    }

    async fn get_transaction(&self, hash: &Hash) -> Result<GetTransactionResult, ProviderError> {
        let hash_hex = hash.to_string();
        let transport = &self.transport;
        retry_rpc_call(
            "get_transaction",
            &self.retry_config,
            self.cancel.as_ref(),
            |_| transport.get_transaction(&hash_hex),
        )
        .await
    }

    async fn get_ledger_entries(
        &self,
        keys: &[LedgerKey],
    ) -> Result<Vec<LedgerEntryResult>, ProviderError> {
        let keys_xdr: Vec<String> = keys.iter().map(|key| key.to_xdr_base64()).collect();
        let transport = &self.transport;
        retry_rpc_call(
            "get_ledger_entries",
            &self.retry_config,
            self.cancel.as_ref(),
            |_| transport.get_ledger_entries(&keys_xdr),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            rpc::GetTransactionStatus,
            xdr::{TransactionResultCode, TransactionV1Envelope},
        },
        utils::base64_encode,
    };
    use std::future::ready;

    const HASH: Hash = Hash([0xab; 32]);

    fn provider(transport: MockStellarRpcTransport) -> StellarProvider<MockStellarRpcTransport> {
        StellarProvider::new(transport, RetryConfig::new(2, 1, 2, 1_000))
    }

    fn envelope() -> TransactionEnvelope {
        use crate::models::xdr::{
            Asset, Memo, MuxedAccount, Operation, Preconditions, Transaction, TransactionExt,
        };
        TransactionEnvelope::Tx(TransactionV1Envelope {
            tx: Transaction {
                source_account: MuxedAccount::Ed25519([1u8; 32]),
                fee: 100,
                seq_num: 1,
                cond: Preconditions::None,
                memo: Memo::None,
                operations: vec![Operation::payment(
                    MuxedAccount::Ed25519([2u8; 32]),
                    Asset::Native,
                    1,
                )
                .unwrap()]
                .try_into()
                .unwrap(),
                ext: TransactionExt::V0,
            },
            signatures: Default::default(),
        })
    }

    fn send_result(status: SendTransactionStatus) -> SendTransactionResult {
        SendTransactionResult {
            hash: HASH.to_string(),
            status,
            latest_ledger: 10,
            error_result_xdr: None,
        }
    }

    fn tx_result(status: GetTransactionStatus) -> GetTransactionResult {
        GetTransactionResult {
            status,
            latest_ledger: 11,
            ledger: None,
            envelope_xdr: None,
            result_xdr: None,
            result_meta_xdr: None,
        }
    }

    #[tokio::test]
    async fn test_submit_pending() {
        let mut transport = MockStellarRpcTransport::new();
        let expected_xdr = envelope().to_xdr_base64();
        transport
            .expect_send_transaction()
            .withf(move |xdr| *xdr == expected_xdr)
            .times(1)
            .returning(|_| Box::pin(ready(Ok(send_result(SendTransactionStatus::Pending)))));
        transport.expect_get_transaction().never();

        let outcome = provider(transport)
            .submit_transaction(&envelope(), &HASH)
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            SubmissionOutcome::Accepted {
                status: SendTransactionStatus::Pending,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_duplicate_counts_as_accepted() {
        let mut transport = MockStellarRpcTransport::new();
        transport
            .expect_send_transaction()
            .returning(|_| Box::pin(ready(Ok(send_result(SendTransactionStatus::Duplicate)))));
        let outcome = provider(transport)
            .submit_transaction(&envelope(), &HASH)
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            SubmissionOutcome::Accepted {
                status: SendTransactionStatus::Duplicate,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_resend_checks_hash_first() {
        let mut transport = MockStellarRpcTransport::new();
        transport
            .expect_send_transaction()
            .times(1)
            .returning(|_| Box::pin(ready(Err(ProviderError::Timeout))));
        transport
            .expect_get_transaction()
            .withf(|hash| *hash == HASH.to_string())
            .times(1)
            .returning(|_| Box::pin(ready(Ok(tx_result(GetTransactionStatus::Success)))));

        let outcome = provider(transport)
            .submit_transaction(&envelope(), &HASH)
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            SubmissionOutcome::AlreadyKnown(GetTransactionResult {
                status: GetTransactionStatus::Success,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_resend_when_hash_unknown() {
        let mut transport = MockStellarRpcTransport::new();
        let mut sends = mockall::Sequence::new();
        transport
            .expect_send_transaction()
            .times(1)
            .in_sequence(&mut sends)
            .returning(|_| Box::pin(ready(Ok(send_result(SendTransactionStatus::TryAgainLater)))));
        transport
            .expect_send_transaction()
            .times(1)
            .in_sequence(&mut sends)
            .returning(|_| Box::pin(ready(Ok(send_result(SendTransactionStatus::Pending)))));
        transport
            .expect_get_transaction()
            .times(1)
            .returning(|_| Box::pin(ready(Ok(tx_result(GetTransactionStatus::NotFound)))));

        let outcome = provider(transport)
            .submit_transaction(&envelope(), &HASH)
            .await
            .unwrap();
        assert!(matches!(outcome, SubmissionOutcome::Accepted { .. }));
    }

    #[tokio::test]
    async fn test_error_status_is_rejected_with_code() {
        let mut bytes = 100i64.to_be_bytes().to_vec();
        bytes.extend_from_slice(&(-5i32).to_be_bytes());
        let error_xdr = base64_encode(&bytes);

        let mut transport = MockStellarRpcTransport::new();
        transport.expect_send_transaction().times(1).returning(move |_| {
            let mut result = send_result(SendTransactionStatus::Error);
            result.error_result_xdr = Some(error_xdr.clone());
            Box::pin(ready(Ok(result)))
        });

        let err = provider(transport)
            .submit_transaction(&envelope(), &HASH)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProviderError::Rejected {
                code: Some(TransactionResultCode::BadSeq),
                message: format!("transaction {HASH} rejected by the node"),
            }
        );
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_mismatched_hash_is_invalid_response() {
        let mut transport = MockStellarRpcTransport::new();
        transport.expect_send_transaction().returning(|_| {
            let mut result = send_result(SendTransactionStatus::Pending);
            result.hash = "00".repeat(32);
            Box::pin(ready(Ok(result)))
        });
        let err = provider(transport)
            .submit_transaction(&envelope(), &HASH)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_simulation_error_is_not_retried() {
        let mut transport = MockStellarRpcTransport::new();
        transport.expect_simulate_transaction().times(1).returning(|_| {
            Box::pin(ready(Ok(SimulationResult {
                error: Some("HostError: contract trapped".to_string()),
                ..Default::default()
            })))
        });
        let err = provider(transport)
            .simulate_transaction(&envelope())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProviderError::SimulationFailed("HostError: contract trapped".to_string())
        );
    }

    #[tokio::test]
    async fn test_next_sequence_number_retries_transport_errors() {
        let mut transport = MockStellarRpcTransport::new();
        let mut seq = mockall::Sequence::new();
        transport
            .expect_get_account_sequence()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Box::pin(ready(Err(ProviderError::TransportError(
                    "connection refused".to_string(),
                ))))
            });
        transport
            .expect_get_account_sequence()
            .withf(|account| account.starts_with('G'))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Box::pin(ready(Ok(41))));

        let next = provider(transport)
            .next_sequence_number(&AccountId([3u8; 32]))
            .await
            .unwrap();
        assert_eq!(next, 42);
    }

    #[tokio::test]
    async fn test_cancelled_provider_makes_no_calls() {
        let (tx, rx) = watch::channel(true);
        let mut transport = MockStellarRpcTransport::new();
        transport.expect_get_transaction().never();
        let err = provider(transport)
            .with_cancellation(rx)
            .get_transaction(&HASH)
            .await
            .unwrap_err();
        assert_eq!(err, ProviderError::Cancelled);
        drop(tx);
    }

    #[tokio::test]
    async fn test_ledger_entries_are_sent_as_base64() {
        let key = LedgerKey::Account {
            account_id: AccountId([4u8; 32]),
        };
        let expected = vec![key.to_xdr_base64()];
        let mut transport = MockStellarRpcTransport::new();
        transport
            .expect_get_ledger_entries()
            .withf(move |keys| keys.to_vec() == expected)
            .returning(|_| Box::pin(ready(Ok(vec![]))));
        let entries = provider(transport)
            .get_ledger_entries(&[key])
            .await
            .unwrap();
        assert!(entries.is_empty());
    }
}
