//! The signing state machine.
//!
//! A [`StellarTransaction`] owns an immutable transaction body and an
//! append-only list of signatures. Sealing consumes it and yields a
//! [`SignedEnvelope`] whose signatures can no longer change.

use log::debug;

use super::{
    preconditions::TransactionPreconditions,
    signing::{
        hash_x_signature, signature_base, tagged_transaction, transaction_hash,
        verified_signature, TransactionSigner,
    },
};
use crate::{
    constants::STELLAR_MAX_SIGNATURES,
    models::{
        address::strkey, DecoratedSignature, EnvelopeType, FeeBumpTransaction,
        FeeBumpTransactionEnvelope, Hash, Keypair, MuxedAccount, Network, Operation, ReadXdr,
        SignatureError, TaggedTransaction, Transaction, TransactionEnvelope, TransactionError,
        TransactionV0, TransactionV0Envelope, TransactionV1Envelope, WriteXdr,
    },
    utils::base64_decode,
};

/// The body being signed. V0 bodies keep their envelope type on re-encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionBody {
    V0(TransactionV0),
    V1(Transaction),
    FeeBump(FeeBumpTransaction),
}

impl TransactionBody {
    pub fn envelope_type(&self) -> EnvelopeType {
        match self {
            TransactionBody::V0(_) => EnvelopeType::TxV0,
            TransactionBody::V1(_) => EnvelopeType::Tx,
            TransactionBody::FeeBump(_) => EnvelopeType::TxFeeBump,
        }
    }

    fn into_envelope(
        self,
        signatures: Vec<DecoratedSignature>,
    ) -> Result<TransactionEnvelope, TransactionError> {
        let signatures = signatures.try_into()?;
        Ok(match self {
            TransactionBody::V0(tx) => {
                TransactionEnvelope::TxV0(TransactionV0Envelope { tx, signatures })
            }
            TransactionBody::V1(tx) => {
                TransactionEnvelope::Tx(TransactionV1Envelope { tx, signatures })
            }
            TransactionBody::FeeBump(tx) => {
                TransactionEnvelope::TxFeeBump(FeeBumpTransactionEnvelope { tx, signatures })
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StellarTransaction {
    body: TransactionBody,
    signatures: Vec<DecoratedSignature>,
}

impl StellarTransaction {
    pub fn new(tx: Transaction) -> Self {
        Self::from_body(TransactionBody::V1(tx))
    }

    pub fn from_body(body: TransactionBody) -> Self {
        Self {
            body,
            signatures: Vec::new(),
        }
    }

    /// Restores the signing state of a decoded envelope.
    pub fn from_envelope(envelope: TransactionEnvelope) -> Self {
        let (body, signatures) = match envelope {
            TransactionEnvelope::TxV0(e) => (TransactionBody::V0(e.tx), e.signatures.into_vec()),
            TransactionEnvelope::Tx(e) => (TransactionBody::V1(e.tx), e.signatures.into_vec()),
            TransactionEnvelope::TxFeeBump(e) => {
                (TransactionBody::FeeBump(e.tx), e.signatures.into_vec())
            }
        };
        Self { body, signatures }
    }

    pub fn from_envelope_xdr_base64(xdr: &str) -> Result<Self, TransactionError> {
        debug!("Decoding transaction envelope ({} base64 chars)", xdr.len());
        Ok(Self::from_envelope(TransactionEnvelope::from_xdr_base64(xdr)?))
    }

    pub fn body(&self) -> &TransactionBody {
        &self.body
    }

    pub fn envelope_type(&self) -> EnvelopeType {
        self.body.envelope_type()
    }

    pub fn signatures(&self) -> &[DecoratedSignature] {
        &self.signatures
    }

    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }

    /// The V1 form of a classic transaction; `None` for fee bumps.
    pub fn transaction(&self) -> Option<Transaction> {
        match &self.body {
            TransactionBody::V0(tx) => Some(Transaction::from(tx.clone())),
            TransactionBody::V1(tx) => Some(tx.clone()),
            TransactionBody::FeeBump(_) => None,
        }
    }

    /// Total fee the source is willing to pay, in stroops.
    pub fn fee(&self) -> i64 {
        match &self.body {
            TransactionBody::V0(tx) => i64::from(tx.fee),
            TransactionBody::V1(tx) => i64::from(tx.fee),
            TransactionBody::FeeBump(tx) => tx.fee,
        }
    }

    /// Account whose sequence number (classic) or balance (fee bump) is used.
    pub fn source_account(&self) -> MuxedAccount {
        match &self.body {
            TransactionBody::V0(tx) => MuxedAccount::Ed25519(tx.source_account_ed25519),
            TransactionBody::V1(tx) => tx.source_account.clone(),
            TransactionBody::FeeBump(tx) => tx.fee_source.clone(),
        }
    }

    pub fn operations(&self) -> &[Operation] {
        match &self.body {
            TransactionBody::V0(tx) => &tx.operations,
            TransactionBody::V1(tx) => &tx.operations,
            TransactionBody::FeeBump(tx) => &tx.inner_envelope().tx.operations,
        }
    }

    /// Logical preconditions; fee bumps report those of the inner transaction.
    pub fn preconditions(&self) -> TransactionPreconditions {
        match &self.body {
            TransactionBody::V0(tx) => {
                TransactionPreconditions::from(&Transaction::from(tx.clone()).cond)
            }
            TransactionBody::V1(tx) => TransactionPreconditions::from(&tx.cond),
            TransactionBody::FeeBump(tx) => {
                TransactionPreconditions::from(&tx.inner_envelope().tx.cond)
            }
        }
    }

    pub fn tagged_transaction(&self) -> TaggedTransaction {
        match &self.body {
            TransactionBody::V0(tx) => TaggedTransaction::Tx(Transaction::from(tx.clone())),
            TransactionBody::V1(tx) => TaggedTransaction::Tx(tx.clone()),
            TransactionBody::FeeBump(tx) => TaggedTransaction::TxFeeBump(tx.clone()),
        }
    }

    pub fn signature_base(&self, network: &Network) -> Vec<u8> {
        signature_base(&self.tagged_transaction(), network)
    }

    pub fn hash(&self, network: &Network) -> Hash {
        transaction_hash(&self.tagged_transaction(), network)
    }

    /// Appends a signature. Signatures are never reordered.
    pub fn add_decorated_signature(
        &mut self,
        signature: DecoratedSignature,
    ) -> Result<(), TransactionError> {
        if self.signatures.len() >= STELLAR_MAX_SIGNATURES {
            return Err(SignatureError::LimitReached(STELLAR_MAX_SIGNATURES).into());
        }
        self.signatures.push(signature);
        Ok(())
    }

    pub fn sign(&mut self, keypair: &Keypair, network: &Network) -> Result<(), TransactionError> {
        self.sign_with(keypair, network)
    }

    pub fn sign_with<S: TransactionSigner + ?Sized>(
        &mut self,
        signer: &S,
        network: &Network,
    ) -> Result<(), TransactionError> {
        let hash = self.hash(network);
        let signature = signer.sign_hash(&hash)?;
        debug!(
            "Signed transaction {} as {} ({} signatures)",
            hash,
            signer.signer_key(),
            self.signatures.len() + 1
        );
        self.add_decorated_signature(signature)
    }

    /// Signs with the preimage of a hash(x) signer.
    pub fn sign_hash_x(&mut self, preimage: &[u8]) -> Result<(), TransactionError> {
        let signature = hash_x_signature(preimage)?;
        self.add_decorated_signature(signature)
    }

    /// Signs `payload` for the signed-payload signer `(keypair, payload)`.
    /// The signature covers the payload, not the transaction hash.
    pub fn sign_payload(
        &mut self,
        keypair: &Keypair,
        payload: &[u8],
    ) -> Result<(), TransactionError> {
        if payload.len() > strkey::MAX_SIGNED_PAYLOAD_LEN {
            return Err(SignatureError::InvalidSignature(format!(
                "signed payload must be at most {} bytes, got {}",
                strkey::MAX_SIGNED_PAYLOAD_LEN,
                payload.len()
            ))
            .into());
        }
        let signature = keypair.sign_payload_decorated(payload)?;
        self.add_decorated_signature(signature)
    }

    /// Appends a base64 signature produced elsewhere by `account_id`, after
    /// checking it against this transaction's hash.
    pub fn add_signature(
        &mut self,
        account_id: &str,
        signature_base64: &str,
        network: &Network,
    ) -> Result<(), TransactionError> {
        let public_key = strkey::decode_ed25519_public_key(account_id)?;
        let signature = base64_decode(signature_base64).map_err(|e| {
            SignatureError::InvalidSignature(format!("signature is not valid base64: {e}"))
        })?;
        let decorated = verified_signature(&public_key, &self.hash(network), &signature)?;
        self.add_decorated_signature(decorated)
    }

    /// The envelope with no signatures, for handing to other signers.
    pub fn unsigned_envelope_xdr(&self) -> Result<String, TransactionError> {
        if self.is_signed() {
            return Err(SignatureError::TooMany.into());
        }
        Ok(self.body.clone().into_envelope(Vec::new())?.to_xdr_base64())
    }

    /// The envelope with the current signatures.
    pub fn signed_envelope_xdr(&self) -> Result<String, TransactionError> {
        if !self.is_signed() {
            return Err(SignatureError::NotEnough.into());
        }
        Ok(self
            .body
            .clone()
            .into_envelope(self.signatures.clone())?
            .to_xdr_base64())
    }

    /// Freezes the transaction into its final envelope.
    pub fn seal(self) -> Result<SignedEnvelope, TransactionError> {
        if !self.is_signed() {
            return Err(SignatureError::NotEnough.into());
        }
        Ok(SignedEnvelope {
            envelope: self.body.into_envelope(self.signatures)?,
        })
    }
}

impl From<Transaction> for StellarTransaction {
    fn from(tx: Transaction) -> Self {
        Self::new(tx)
    }
}

impl From<FeeBumpTransaction> for StellarTransaction {
    fn from(tx: FeeBumpTransaction) -> Self {
        Self::from_body(TransactionBody::FeeBump(tx))
    }
}

impl From<TransactionEnvelope> for StellarTransaction {
    fn from(envelope: TransactionEnvelope) -> Self {
        Self::from_envelope(envelope)
    }
}

/// A signed envelope ready for submission. Read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    envelope: TransactionEnvelope,
}

impl SignedEnvelope {
    pub fn envelope(&self) -> &TransactionEnvelope {
        &self.envelope
    }

    pub fn signatures(&self) -> &[DecoratedSignature] {
        self.envelope.signatures()
    }

    pub fn hash(&self, network: &Network) -> Hash {
        transaction_hash(&tagged_transaction(&self.envelope), network)
    }

    pub fn to_xdr(&self) -> Vec<u8> {
        self.envelope.to_xdr()
    }

    pub fn to_xdr_base64(&self) -> String {
        self.envelope.to_xdr_base64()
    }

    pub fn into_envelope(self) -> TransactionEnvelope {
        self.envelope
    }
}
