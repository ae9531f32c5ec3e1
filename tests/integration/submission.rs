//! Submission through [`StellarProvider`] over a scripted transport.
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use stellar_txkit::{
    domain::{SignedEnvelope, TransactionBuilder},
    models::{
        rpc::{
            GetTransactionResult, GetTransactionStatus, LedgerEntryResult, SendTransactionResult,
            SendTransactionStatus, SimulationResult,
        },
        Asset, Keypair, Network, Operation,
    },
    services::{
        ProviderError, RetryConfig, StellarProvider, StellarProviderTrait, StellarRpcTransport,
        SubmissionOutcome,
    },
};

#[derive(Default)]
struct Script {
    sends: VecDeque<Result<SendTransactionResult, ProviderError>>,
    lookups: VecDeque<Result<GetTransactionResult, ProviderError>>,
    send_calls: usize,
    lookup_calls: usize,
}

#[derive(Clone, Default)]
struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    fn push_send(&self, result: Result<SendTransactionResult, ProviderError>) {
        self.script.lock().unwrap().sends.push_back(result);
    }

    fn push_lookup(&self, result: Result<GetTransactionResult, ProviderError>) {
        self.script.lock().unwrap().lookups.push_back(result);
    }

    fn calls(&self) -> (usize, usize) {
        let script = self.script.lock().unwrap();
        (script.send_calls, script.lookup_calls)
    }
}

#[async_trait]
impl StellarRpcTransport for ScriptedTransport {
    async fn send_transaction(
        &self,
        _envelope_xdr: &str,
    ) -> Result<SendTransactionResult, ProviderError> {
        let mut script = self.script.lock().unwrap();
        script.send_calls += 1;
        script
            .sends
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Other("unexpected send".to_string())))
    }

    async fn get_transaction(&self, _hash_hex: &str) -> Result<GetTransactionResult, ProviderError> {
        let mut script = self.script.lock().unwrap();
        script.lookup_calls += 1;
        script
            .lookups
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Other("unexpected lookup".to_string())))
    }

    async fn simulate_transaction(
        &self,
        _envelope_xdr: &str,
    ) -> Result<SimulationResult, ProviderError> {
        Err(ProviderError::Other("not scripted".to_string()))
    }

    async fn get_ledger_entries(
        &self,
        _keys_xdr: &[String],
    ) -> Result<Vec<LedgerEntryResult>, ProviderError> {
        Ok(Vec::new())
    }

    async fn get_account_sequence(&self, _account_id: &str) -> Result<i64, ProviderError> {
        Ok(1_000)
    }
}

fn signed_envelope(network: &Network) -> SignedEnvelope {
    let source = Keypair::from_raw_seed(&[7u8; 32]);
    let mut tx = TransactionBuilder::new(source.muxed_account(None), 1_001, 100)
        .add_operation(Operation::payment(source.muxed_account(None), Asset::Native, 10).unwrap())
        .build()
        .unwrap();
    tx.sign(&source, network).unwrap();
    tx.seal().unwrap()
}

fn accepted(hash: &str, status: SendTransactionStatus) -> SendTransactionResult {
    SendTransactionResult {
        hash: hash.to_string(),
        status,
        latest_ledger: 50,
        error_result_xdr: None,
    }
}

fn lookup(status: GetTransactionStatus) -> GetTransactionResult {
    GetTransactionResult {
        status,
        latest_ledger: 51,
        ledger: None,
        envelope_xdr: None,
        result_xdr: None,
        result_meta_xdr: None,
    }
}

fn provider(transport: &ScriptedTransport) -> StellarProvider<ScriptedTransport> {
    StellarProvider::new(transport.clone(), RetryConfig::new(3, 0, 0, 1_000))
}

#[tokio::test]
async fn test_ambiguous_failure_is_not_resent_when_already_known() {
    let network = Network::testnet();
    let envelope = signed_envelope(&network);
    let hash = envelope.hash(&network);

    let transport = ScriptedTransport::default();
    transport.push_send(Err(ProviderError::Timeout));
    transport.push_lookup(Ok(lookup(GetTransactionStatus::Success)));

    let outcome = provider(&transport)
        .submit_transaction(envelope.envelope(), &hash)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SubmissionOutcome::AlreadyKnown(lookup(GetTransactionStatus::Success))
    );
    assert_eq!(transport.calls(), (1, 1));
}

#[tokio::test]
async fn test_unknown_transaction_is_resent() {
    let network = Network::testnet();
    let envelope = signed_envelope(&network);
    let hash = envelope.hash(&network);

    let transport = ScriptedTransport::default();
    transport.push_send(Err(ProviderError::BadGateway));
    transport.push_lookup(Ok(lookup(GetTransactionStatus::NotFound)));
    transport.push_send(Ok(accepted(
        &hash.to_string(),
        SendTransactionStatus::Pending,
    )));

    let outcome = provider(&transport)
        .submit_transaction(envelope.envelope(), &hash)
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        SubmissionOutcome::Accepted {
            status: SendTransactionStatus::Pending,
            latest_ledger: 50,
            ..
        }
    ));
    assert_eq!(transport.calls(), (2, 1));
}

#[tokio::test]
async fn test_rejection_is_final() {
    let network = Network::testnet();
    let envelope = signed_envelope(&network);
    let hash = envelope.hash(&network);

    let transport = ScriptedTransport::default();
    transport.push_send(Ok(accepted(&hash.to_string(), SendTransactionStatus::Error)));

    let result = provider(&transport)
        .submit_transaction(envelope.envelope(), &hash)
        .await;

    assert!(matches!(result, Err(ProviderError::Rejected { code: None, .. })));
    assert_eq!(transport.calls(), (1, 0));
}

#[tokio::test]
async fn test_next_sequence_number() {
    let transport = ScriptedTransport::default();
    let account = Keypair::from_raw_seed(&[7u8; 32]).account_id();
    let next = provider(&transport)
        .next_sequence_number(&account)
        .await
        .unwrap();
    assert_eq!(next, 1_001);
}
