//! Signature payloads and the signer seam.
//!
//! Every transaction kind is signed over
//! `sha256(network_id || envelope_type || transaction)`. V0 transactions are
//! signed in their V1 form, so a V0 signature stays valid when the
//! transaction is later re-wrapped.

use crate::{
    constants::STELLAR_MAX_HASH_X_PREIMAGE_LEN,
    models::{
        DecoratedSignature, Hash, Keypair, Network, SignatureError, SignatureHint, SignerKey,
        TaggedTransaction, Transaction, TransactionEnvelope, TransactionSignaturePayload,
        TransactionV0, WriteXdr,
    },
    utils::{ed25519_verify, sha256},
};

/// Anything able to produce a decorated ed25519 signature over a transaction
/// hash. Implemented by [`Keypair`]; hardware or remote signers plug in here.
pub trait TransactionSigner {
    fn signer_key(&self) -> SignerKey;

    fn sign_hash(&self, hash: &Hash) -> Result<DecoratedSignature, SignatureError>;
}

impl TransactionSigner for Keypair {
    fn signer_key(&self) -> SignerKey {
        Keypair::signer_key(self)
    }

    fn sign_hash(&self, hash: &Hash) -> Result<DecoratedSignature, SignatureError> {
        self.sign_decorated(&hash.0)
    }
}

/// Convert a V0 transaction to V1 format for signing.
pub fn convert_v0_to_v1_transaction(v0_tx: &TransactionV0) -> Transaction {
    Transaction::from(v0_tx.clone())
}

/// The tagged transaction an envelope's signatures cover.
pub fn tagged_transaction(envelope: &TransactionEnvelope) -> TaggedTransaction {
    match envelope {
        TransactionEnvelope::TxV0(e) => TaggedTransaction::Tx(convert_v0_to_v1_transaction(&e.tx)),
        TransactionEnvelope::Tx(e) => TaggedTransaction::Tx(e.tx.clone()),
        TransactionEnvelope::TxFeeBump(e) => TaggedTransaction::TxFeeBump(e.tx.clone()),
    }
}

pub fn create_signature_payload(
    tagged_transaction: TaggedTransaction,
    network: &Network,
) -> TransactionSignaturePayload {
    TransactionSignaturePayload {
        network_id: network.network_id(),
        tagged_transaction,
    }
}

/// `network_id || envelope_type || transaction` as bytes.
pub fn signature_base(tagged_transaction: &TaggedTransaction, network: &Network) -> Vec<u8> {
    create_signature_payload(tagged_transaction.clone(), network).to_xdr()
}

pub fn transaction_hash(tagged_transaction: &TaggedTransaction, network: &Network) -> Hash {
    Hash(sha256(&signature_base(tagged_transaction, network)))
}

/// Hint for a public key: its last four bytes.
pub fn public_key_hint(public_key: &[u8; 32]) -> SignatureHint {
    let mut hint = [0u8; 4];
    hint.copy_from_slice(&public_key[28..]);
    hint
}

/// A hash(x) signature: the preimage itself, hinted by the tail of its hash.
pub fn hash_x_signature(preimage: &[u8]) -> Result<DecoratedSignature, SignatureError> {
    if preimage.is_empty() || preimage.len() > STELLAR_MAX_HASH_X_PREIMAGE_LEN {
        return Err(SignatureError::InvalidPreimage(format!(
            "preimage must be 1 to {} bytes, got {}",
            STELLAR_MAX_HASH_X_PREIMAGE_LEN,
            preimage.len()
        )));
    }
    let hash = sha256(preimage);
    let mut hint = [0u8; 4];
    hint.copy_from_slice(&hash[28..]);
    Ok(DecoratedSignature {
        hint,
        signature: preimage
            .try_into()
            .map_err(|_| SignatureError::InvalidPreimage("preimage too long".to_string()))?,
    })
}

/// Wraps an externally produced signature after checking it against `hash`.
pub fn verified_signature(
    public_key: &[u8; 32],
    hash: &Hash,
    signature: &[u8],
) -> Result<DecoratedSignature, SignatureError> {
    if !ed25519_verify(public_key, &hash.0, signature) {
        return Err(SignatureError::InvalidSignature(
            "signature does not match the transaction hash".to_string(),
        ));
    }
    Ok(DecoratedSignature {
        hint: public_key_hint(public_key),
        signature: signature
            .try_into()
            .map_err(|_| SignatureError::InvalidSignature("signature too long".to_string()))?,
    })
}
