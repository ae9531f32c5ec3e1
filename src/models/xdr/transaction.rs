//! Transactions, envelopes and the preimages that get hashed for signing.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use super::{
    xdr_enum_codec, xdr_struct_codec, AccountId, ClaimableBalanceId, ContractIdPreimage,
    DecoratedSignature, ExtensionPoint, Hash, Memo, MuxedAccount, Operation, Preconditions,
    ReadXdr, SorobanAuthorizedInvocation, SorobanTransactionData, TimeBounds, Uint256, VecM,
    WriteXdr, XdrReader, XdrWriter,
};
use crate::{
    constants::{STELLAR_MAX_OPERATIONS, STELLAR_MAX_SIGNATURES},
    models::{CodecError, TransactionError},
    utils::sha256,
};

pub type Operations = VecM<Operation, { STELLAR_MAX_OPERATIONS as u32 }>;
pub type Signatures = VecM<DecoratedSignature, { STELLAR_MAX_SIGNATURES as u32 }>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum EnvelopeType {
    TxV0 = 0,
    Scp = 1,
    Tx = 2,
    Auth = 3,
    ScpValue = 4,
    TxFeeBump = 5,
    OpId = 6,
    PoolRevokeOpId = 7,
    ContractId = 8,
    SorobanAuthorization = 9,
}

xdr_enum_codec!(EnvelopeType);

#[derive(Clone, Debug, Default, PartialEq, Eq, std::hash::Hash)]
pub enum TransactionExt {
    #[default]
    V0,
    V1(SorobanTransactionData),
}

impl TransactionExt {
    pub fn soroban_data(&self) -> Option<&SorobanTransactionData> {
        match self {
            TransactionExt::V0 => None,
            TransactionExt::V1(data) => Some(data),
        }
    }
}

impl WriteXdr for TransactionExt {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            TransactionExt::V0 => w.write_i32(0),
            TransactionExt::V1(data) => {
                w.write_i32(1);
                data.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for TransactionExt {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        match r.read_i32()? {
            0 => Ok(TransactionExt::V0),
            1 => Ok(TransactionExt::V1(SorobanTransactionData::read_xdr(r)?)),
            other => Err(CodecError::unexpected_arm("TransactionExt", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct Transaction {
    pub source_account: MuxedAccount,
    pub fee: u32,
    pub seq_num: i64,
    pub cond: Preconditions,
    pub memo: Memo,
    pub operations: Operations,
    pub ext: TransactionExt,
}
xdr_struct_codec!(Transaction {
    source_account,
    fee,
    seq_num,
    cond,
    memo,
    operations,
    ext
});

impl Transaction {
    pub fn resource_fee(&self) -> i64 {
        self.ext.soroban_data().map_or(0, |data| data.resource_fee)
    }
}

/// Legacy transaction format that predates muxed sources and preconditions.
#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct TransactionV0 {
    pub source_account_ed25519: Uint256,
    pub fee: u32,
    pub seq_num: i64,
    pub time_bounds: Option<TimeBounds>,
    pub memo: Memo,
    pub operations: Operations,
    pub ext: ExtensionPoint,
}
xdr_struct_codec!(TransactionV0 {
    source_account_ed25519,
    fee,
    seq_num,
    time_bounds,
    memo,
    operations,
    ext
});

impl From<TransactionV0> for Transaction {
    fn from(tx: TransactionV0) -> Self {
        Transaction {
            source_account: MuxedAccount::Ed25519(tx.source_account_ed25519),
            fee: tx.fee,
            seq_num: tx.seq_num,
            cond: tx.time_bounds.map_or(Preconditions::None, Preconditions::Time),
            memo: tx.memo,
            operations: tx.operations,
            ext: TransactionExt::V0,
        }
    }
}

impl TryFrom<Transaction> for TransactionV0 {
    type Error = TransactionError;

    fn try_from(tx: Transaction) -> Result<Self, Self::Error> {
        let source_account_ed25519 = match tx.source_account {
            MuxedAccount::Ed25519(key) => key,
            MuxedAccount::MuxedEd25519 { .. } => {
                return Err(TransactionError::ValidationError(
                    "V0 transactions cannot have a muxed source account".to_string(),
                ))
            }
        };
        let time_bounds = match tx.cond {
            Preconditions::None => None,
            Preconditions::Time(tb) => Some(tb),
            Preconditions::V2(_) => {
                return Err(TransactionError::ValidationError(
                    "V0 transactions only support time bounds".to_string(),
                ))
            }
        };
        if tx.ext != TransactionExt::V0 {
            return Err(TransactionError::ValidationError(
                "V0 transactions cannot carry Soroban data".to_string(),
            ));
        }
        Ok(TransactionV0 {
            source_account_ed25519,
            fee: tx.fee,
            seq_num: tx.seq_num,
            time_bounds,
            memo: tx.memo,
            operations: tx.operations,
            ext: ExtensionPoint::V0,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct TransactionV0Envelope {
    pub tx: TransactionV0,
    pub signatures: Signatures,
}
xdr_struct_codec!(TransactionV0Envelope { tx, signatures });

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct TransactionV1Envelope {
    pub tx: Transaction,
    pub signatures: Signatures,
}
xdr_struct_codec!(TransactionV1Envelope { tx, signatures });

/// The only inner transaction a fee bump may wrap is a V1 envelope.
#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum FeeBumpTransactionInnerTx {
    Tx(TransactionV1Envelope),
}

impl WriteXdr for FeeBumpTransactionInnerTx {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            FeeBumpTransactionInnerTx::Tx(envelope) => {
                EnvelopeType::Tx.write_xdr(w);
                envelope.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for FeeBumpTransactionInnerTx {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        match EnvelopeType::read_xdr(r)? {
            EnvelopeType::Tx => Ok(FeeBumpTransactionInnerTx::Tx(
                TransactionV1Envelope::read_xdr(r)?,
            )),
            other => Err(CodecError::unexpected_arm(
                "FeeBumpTransactionInnerTx",
                other.into(),
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct FeeBumpTransaction {
    pub fee_source: MuxedAccount,
    pub fee: i64,
    pub inner_tx: FeeBumpTransactionInnerTx,
    pub ext: ExtensionPoint,
}
xdr_struct_codec!(FeeBumpTransaction {
    fee_source,
    fee,
    inner_tx,
    ext
});

impl FeeBumpTransaction {
    pub fn inner_envelope(&self) -> &TransactionV1Envelope {
        match &self.inner_tx {
            FeeBumpTransactionInnerTx::Tx(envelope) => envelope,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct FeeBumpTransactionEnvelope {
    pub tx: FeeBumpTransaction,
    pub signatures: Signatures,
}
xdr_struct_codec!(FeeBumpTransactionEnvelope { tx, signatures });

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum TransactionEnvelope {
    TxV0(TransactionV0Envelope),
    Tx(TransactionV1Envelope),
    TxFeeBump(FeeBumpTransactionEnvelope),
}

impl TransactionEnvelope {
    pub fn envelope_type(&self) -> EnvelopeType {
        match self {
            TransactionEnvelope::TxV0(_) => EnvelopeType::TxV0,
            TransactionEnvelope::Tx(_) => EnvelopeType::Tx,
            TransactionEnvelope::TxFeeBump(_) => EnvelopeType::TxFeeBump,
        }
    }

    pub fn signatures(&self) -> &Signatures {
        match self {
            TransactionEnvelope::TxV0(env) => &env.signatures,
            TransactionEnvelope::Tx(env) => &env.signatures,
            TransactionEnvelope::TxFeeBump(env) => &env.signatures,
        }
    }
}

impl WriteXdr for TransactionEnvelope {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.envelope_type().write_xdr(w);
        match self {
            TransactionEnvelope::TxV0(env) => env.write_xdr(w),
            TransactionEnvelope::Tx(env) => env.write_xdr(w),
            TransactionEnvelope::TxFeeBump(env) => env.write_xdr(w),
        }
    }
}

impl ReadXdr for TransactionEnvelope {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        match EnvelopeType::read_xdr(r)? {
            EnvelopeType::TxV0 => Ok(TransactionEnvelope::TxV0(ReadXdr::read_xdr(r)?)),
            EnvelopeType::Tx => Ok(TransactionEnvelope::Tx(ReadXdr::read_xdr(r)?)),
            EnvelopeType::TxFeeBump => Ok(TransactionEnvelope::TxFeeBump(ReadXdr::read_xdr(r)?)),
            other => Err(CodecError::unexpected_arm(
                "TransactionEnvelope",
                other.into(),
            )),
        }
    }
}

/// The transaction half of a signature payload. V0 transactions are signed
/// in their V1 form.
#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum TaggedTransaction {
    Tx(Transaction),
    TxFeeBump(FeeBumpTransaction),
}

impl WriteXdr for TaggedTransaction {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            TaggedTransaction::Tx(tx) => {
                EnvelopeType::Tx.write_xdr(w);
                tx.write_xdr(w);
            }
            TaggedTransaction::TxFeeBump(tx) => {
                EnvelopeType::TxFeeBump.write_xdr(w);
                tx.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for TaggedTransaction {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        match EnvelopeType::read_xdr(r)? {
            EnvelopeType::Tx => Ok(TaggedTransaction::Tx(ReadXdr::read_xdr(r)?)),
            EnvelopeType::TxFeeBump => Ok(TaggedTransaction::TxFeeBump(ReadXdr::read_xdr(r)?)),
            other => Err(CodecError::unexpected_arm("TaggedTransaction", other.into())),
        }
    }
}

/// `network_id || envelope_type || transaction`, the bytes whose sha256 is
/// signed.
#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct TransactionSignaturePayload {
    pub network_id: Hash,
    pub tagged_transaction: TaggedTransaction,
}
xdr_struct_codec!(TransactionSignaturePayload {
    network_id,
    tagged_transaction
});

/// Preimages hashed to derive protocol identifiers and authorization
/// payloads.
#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum HashIdPreimage {
    OpId {
        source_account: AccountId,
        seq_num: i64,
        op_num: u32,
    },
    ContractId {
        network_id: Hash,
        contract_id_preimage: ContractIdPreimage,
    },
    SorobanAuthorization {
        network_id: Hash,
        nonce: i64,
        signature_expiration_ledger: u32,
        invocation: SorobanAuthorizedInvocation,
    },
}

impl HashIdPreimage {
    pub fn hash(&self) -> Hash {
        Hash(sha256(&self.to_xdr()))
    }
}

impl WriteXdr for HashIdPreimage {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            HashIdPreimage::OpId {
                source_account,
                seq_num,
                op_num,
            } => {
                EnvelopeType::OpId.write_xdr(w);
                source_account.write_xdr(w);
                w.write_i64(*seq_num);
                w.write_u32(*op_num);
            }
            HashIdPreimage::ContractId {
                network_id,
                contract_id_preimage,
            } => {
                EnvelopeType::ContractId.write_xdr(w);
                network_id.write_xdr(w);
                contract_id_preimage.write_xdr(w);
            }
            HashIdPreimage::SorobanAuthorization {
                network_id,
                nonce,
                signature_expiration_ledger,
                invocation,
            } => {
                EnvelopeType::SorobanAuthorization.write_xdr(w);
                network_id.write_xdr(w);
                w.write_i64(*nonce);
                w.write_u32(*signature_expiration_ledger);
                invocation.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for HashIdPreimage {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        match EnvelopeType::read_xdr(r)? {
            EnvelopeType::OpId => Ok(HashIdPreimage::OpId {
                source_account: AccountId::read_xdr(r)?,
                seq_num: r.read_i64()?,
                op_num: r.read_u32()?,
            }),
            EnvelopeType::ContractId => Ok(HashIdPreimage::ContractId {
                network_id: Hash::read_xdr(r)?,
                contract_id_preimage: ContractIdPreimage::read_xdr(r)?,
            }),
            EnvelopeType::SorobanAuthorization => Ok(HashIdPreimage::SorobanAuthorization {
                network_id: Hash::read_xdr(r)?,
                nonce: r.read_i64()?,
                signature_expiration_ledger: r.read_u32()?,
                invocation: SorobanAuthorizedInvocation::read_xdr(r)?,
            }),
            other => Err(CodecError::unexpected_arm("HashIdPreimage", other.into())),
        }
    }
}

impl ClaimableBalanceId {
    /// Id of the balance created by operation `op_index` of the transaction
    /// with the given source and sequence number.
    pub fn for_operation(source_account: AccountId, seq_num: i64, op_index: u32) -> Self {
        ClaimableBalanceId::V0(
            HashIdPreimage::OpId {
                source_account,
                seq_num,
                op_num: op_index,
            }
            .hash(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::xdr::{Asset, PreconditionsV2};

    fn payment_tx(source: MuxedAccount) -> Transaction {
        Transaction {
            source_account: source,
            fee: 100,
            seq_num: 2,
            cond: Preconditions::None,
            memo: Memo::Id(7),
            operations: vec![
                Operation::payment(MuxedAccount::Ed25519([4u8; 32]), Asset::Native, 1).unwrap(),
            ]
            .try_into()
            .unwrap(),
            ext: TransactionExt::V0,
        }
    }

    #[test]
    fn test_v1_envelope_round_trip() {
        let envelope = TransactionEnvelope::Tx(TransactionV1Envelope {
            tx: payment_tx(MuxedAccount::Ed25519([1u8; 32])),
            signatures: vec![DecoratedSignature {
                hint: [1, 2, 3, 4],
                signature: vec![9u8; 64].try_into().unwrap(),
            }]
            .try_into()
            .unwrap(),
        });
        let text = envelope.to_xdr_base64();
        let decoded = TransactionEnvelope::from_xdr_base64(&text).unwrap();
        assert_eq!(decoded, envelope);
        assert_eq!(decoded.envelope_type(), EnvelopeType::Tx);
        assert_eq!(decoded.signatures().len(), 1);
    }

    #[test]
    fn test_v0_conversion() {
        let v0 = TransactionV0 {
            source_account_ed25519: [1u8; 32],
            fee: 100,
            seq_num: 2,
            time_bounds: Some(TimeBounds {
                min_time: 0,
                max_time: 10,
            }),
            memo: Memo::None,
            operations: payment_tx(MuxedAccount::Ed25519([1u8; 32])).operations,
            ext: ExtensionPoint::V0,
        };
        let v1 = Transaction::from(v0.clone());
        assert_eq!(v1.source_account, MuxedAccount::Ed25519([1u8; 32]));
        assert!(matches!(v1.cond, Preconditions::Time(_)));
        assert_eq!(TransactionV0::try_from(v1).unwrap(), v0);

        // the V0 layout starts with the raw key, not a key-type discriminant
        let bytes = v0.to_xdr();
        assert_eq!(&bytes[..32], &[1u8; 32]);
    }

    #[test]
    fn test_v0_conversion_rejects_v1_only_features() {
        let muxed = payment_tx(MuxedAccount::MuxedEd25519 {
            id: 1,
            ed25519: [1u8; 32],
        });
        assert!(TransactionV0::try_from(muxed).is_err());

        let mut general = payment_tx(MuxedAccount::Ed25519([1u8; 32]));
        general.cond = Preconditions::V2(PreconditionsV2 {
            min_seq_ledger_gap: 1,
            ..Default::default()
        });
        assert!(TransactionV0::try_from(general).is_err());
    }

    #[test]
    fn test_fee_bump_inner_must_be_v1() {
        let inner = TransactionV1Envelope {
            tx: payment_tx(MuxedAccount::Ed25519([1u8; 32])),
            signatures: VecM::default(),
        };
        let fee_bump = FeeBumpTransactionEnvelope {
            tx: FeeBumpTransaction {
                fee_source: MuxedAccount::Ed25519([2u8; 32]),
                fee: 400,
                inner_tx: FeeBumpTransactionInnerTx::Tx(inner),
                ext: ExtensionPoint::V0,
            },
            signatures: VecM::default(),
        };
        let mut bytes = TransactionEnvelope::TxFeeBump(fee_bump.clone()).to_xdr();
        assert_eq!(
            TransactionEnvelope::from_xdr(&bytes).unwrap(),
            TransactionEnvelope::TxFeeBump(fee_bump)
        );

        // envelope type, fee source (36 bytes), fee, then the inner discriminant
        let inner_at = 4 + 36 + 8;
        bytes[inner_at..inner_at + 4].copy_from_slice(&0i32.to_be_bytes());
        assert_eq!(
            TransactionEnvelope::from_xdr(&bytes),
            Err(CodecError::UnknownDiscriminant {
                type_name: "FeeBumpTransactionInnerTx",
                value: 0
            })
        );
    }

    #[test]
    fn test_envelope_rejects_non_transaction_types() {
        assert_eq!(
            TransactionEnvelope::from_xdr(&1i32.to_be_bytes()),
            Err(CodecError::UnknownDiscriminant {
                type_name: "TransactionEnvelope",
                value: 1
            })
        );
    }

    #[test]
    fn test_signature_payload_layout() {
        let tx = payment_tx(MuxedAccount::Ed25519([1u8; 32]));
        let payload = TransactionSignaturePayload {
            network_id: Hash([5u8; 32]),
            tagged_transaction: TaggedTransaction::Tx(tx.clone()),
        };
        let bytes = payload.to_xdr();
        assert_eq!(&bytes[..32], &[5u8; 32]);
        assert_eq!(&bytes[32..36], &2i32.to_be_bytes());
        assert_eq!(&bytes[36..], tx.to_xdr().as_slice());
    }

    #[test]
    fn test_claimable_balance_id_depends_on_operation_index() {
        let first = ClaimableBalanceId::for_operation(AccountId([1u8; 32]), 10, 0);
        let second = ClaimableBalanceId::for_operation(AccountId([1u8; 32]), 10, 1);
        assert_ne!(first, second);
        assert!(first.to_string().starts_with('B'));
    }
}
