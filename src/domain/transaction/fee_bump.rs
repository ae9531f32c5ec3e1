//! Fee-bump transaction construction.
//!
//! A fee bump re-wraps a signed inner transaction so that `fee_source` pays
//! for it. The bumped base fee may not be lower than what the inner
//! transaction already offers per operation, nor below the network minimum.

use log::debug;

use super::envelope::{StellarTransaction, TransactionBody};
use crate::{
    constants::STELLAR_DEFAULT_TRANSACTION_FEE,
    models::{
        ExtensionPoint, FeeBumpTransaction, FeeBumpTransactionInnerTx, FeeError, MuxedAccount,
        OverflowError, Transaction, TransactionError, TransactionV1Envelope,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBumpFee {
    /// Per-operation rate charged by the fee bump.
    pub base_fee: i64,
    /// Lowest acceptable `base_fee`.
    pub minimum_base_fee: i64,
    /// `base_fee × (inner operations + 1) + resource_fee`.
    pub total_fee: i64,
}

/// Works out the fee of a fee bump wrapping `inner`.
///
/// The inner rate is `(inner_fee - resource_fee) / operation_count`. When
/// `base_fee` is omitted the inner rate (at least the network minimum) is used.
pub fn calculate_fee_bump_fee(
    inner: &Transaction,
    base_fee: Option<i64>,
) -> Result<FeeBumpFee, TransactionError> {
    let operation_count = inner.operations.len();
    if operation_count == 0 {
        return Err(FeeError::EmptyInnerTransaction.into());
    }

    let inner_fee = i64::from(inner.fee);
    let resource_fee = inner.resource_fee();
    if resource_fee < 0 || resource_fee > inner_fee {
        return Err(FeeError::ResourceFeeExceedsFee {
            resource_fee,
            inner_fee,
        }
        .into());
    }

    let inner_rate = (inner_fee - resource_fee) / operation_count as i64;
    let minimum_base_fee = inner_rate.max(i64::from(STELLAR_DEFAULT_TRANSACTION_FEE));
    let base_fee = base_fee.unwrap_or(minimum_base_fee);
    if base_fee < minimum_base_fee {
        return Err(FeeError::BelowMinimum {
            required: minimum_base_fee,
            provided: base_fee,
        }
        .into());
    }

    let total_fee = base_fee
        .checked_mul(operation_count as i64 + 1)
        .and_then(|fee| fee.checked_add(resource_fee))
        .ok_or(OverflowError::Fee {
            fee_per_operation: base_fee,
            operation_count: operation_count + 1,
            resource_fee,
        })?;

    Ok(FeeBumpFee {
        base_fee,
        minimum_base_fee,
        total_fee,
    })
}

impl FeeBumpTransaction {
    /// Wraps `inner` (a V0 or V1 transaction, with its signatures) so that
    /// `fee_source` pays at `base_fee` per operation.
    pub fn build(
        fee_source: MuxedAccount,
        inner: &StellarTransaction,
        base_fee: Option<i64>,
    ) -> Result<Self, TransactionError> {
        let tx = match inner.body() {
            TransactionBody::V0(tx) => Transaction::from(tx.clone()),
            TransactionBody::V1(tx) => tx.clone(),
            TransactionBody::FeeBump(_) => {
                return Err(TransactionError::ValidationError(
                    "A fee bump transaction cannot wrap another fee bump".to_string(),
                ))
            }
        };

        let fee = calculate_fee_bump_fee(&tx, base_fee)?;
        debug!(
            "Fee bump: base fee {} (minimum {}), total {} stroops",
            fee.base_fee, fee.minimum_base_fee, fee.total_fee
        );

        Ok(FeeBumpTransaction {
            fee_source,
            fee: fee.total_fee,
            inner_tx: FeeBumpTransactionInnerTx::Tx(TransactionV1Envelope {
                tx,
                signatures: inner.signatures().to_vec().try_into()?,
            }),
            ext: ExtensionPoint::V0,
        })
    }
}

impl StellarTransaction {
    /// A new, unsigned fee bump around this transaction.
    pub fn fee_bump(
        &self,
        fee_source: MuxedAccount,
        base_fee: Option<i64>,
    ) -> Result<StellarTransaction, TransactionError> {
        Ok(FeeBumpTransaction::build(fee_source, self, base_fee)?.into())
    }
}
