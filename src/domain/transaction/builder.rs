//! Transaction builder
//!
//! Collects operations, memo, preconditions and Soroban data for a source
//! account, then computes the fee and produces an unsigned
//! [`StellarTransaction`].

use chrono::{Duration, Utc};
use log::debug;

use super::{envelope::StellarTransaction, preconditions::TransactionPreconditions};
use crate::{
    constants::{get_stellar_default_transaction_timeout, STELLAR_MAX_OPERATIONS},
    models::{
        Memo, MuxedAccount, Operation, OverflowError, SorobanTransactionData, TimeBounds,
        Transaction, TransactionError, TransactionExt,
    },
};

/// `fee_per_operation × operation_count + resource_fee`, checked.
pub fn calculate_total_fee(
    fee_per_operation: u32,
    operation_count: usize,
    resource_fee: i64,
) -> Result<u32, OverflowError> {
    let overflow = || OverflowError::Fee {
        fee_per_operation: i64::from(fee_per_operation),
        operation_count,
        resource_fee,
    };
    let count = i64::try_from(operation_count).map_err(|_| overflow())?;
    let total = i64::from(fee_per_operation)
        .checked_mul(count)
        .and_then(|fee| fee.checked_add(resource_fee))
        .ok_or_else(overflow)?;
    u32::try_from(total).map_err(|_| overflow())
}

/// Builder for constructing Stellar transactions
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    source_account: MuxedAccount,
    sequence_number: i64,
    fee_per_operation: u32,
    operations: Vec<Operation>,
    memo: Memo,
    preconditions: TransactionPreconditions,
    soroban_data: Option<SorobanTransactionData>,
}

impl TransactionBuilder {
    /// `sequence_number` is the number the transaction will carry, usually
    /// the account's current sequence plus one.
    pub fn new(source_account: MuxedAccount, sequence_number: i64, fee_per_operation: u32) -> Self {
        Self {
            source_account,
            sequence_number,
            fee_per_operation,
            operations: Vec::new(),
            memo: Memo::None,
            preconditions: TransactionPreconditions::default(),
            soroban_data: None,
        }
    }

    pub fn add_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn add_operations(mut self, operations: impl IntoIterator<Item = Operation>) -> Self {
        self.operations.extend(operations);
        self
    }

    pub fn memo(mut self, memo: Memo) -> Self {
        self.memo = memo;
        self
    }

    /// Replaces all preconditions, time bounds included.
    pub fn preconditions(mut self, preconditions: TransactionPreconditions) -> Self {
        self.preconditions = preconditions;
        self
    }

    pub fn time_bounds(mut self, time_bounds: TimeBounds) -> Self {
        self.preconditions.time_bounds = Some(time_bounds);
        self
    }

    /// Valid from now until `timeout` from now. A deadline outside the
    /// calendar saturates.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let max_time = match Utc::now().checked_add_signed(timeout) {
            Some(deadline) => deadline.timestamp().max(0) as u64,
            None if timeout > Duration::zero() => u64::MAX,
            None => 0,
        };
        self.time_bounds(TimeBounds {
            min_time: 0,
            max_time,
        })
    }

    pub fn with_default_timeout(self) -> Self {
        self.with_timeout(get_stellar_default_transaction_timeout())
    }

    /// Attaches Soroban resources; their resource fee is added to the total.
    pub fn soroban_data(mut self, data: SorobanTransactionData) -> Self {
        self.soroban_data = Some(data);
        self
    }

    fn validate(&self) -> Result<(), TransactionError> {
        if self.operations.is_empty() {
            return Err(TransactionError::ValidationError(
                "Transaction must contain at least one operation".to_string(),
            ));
        }
        if self.operations.len() > STELLAR_MAX_OPERATIONS {
            return Err(TransactionError::ValidationError(format!(
                "Transaction cannot contain more than {} operations, got {}",
                STELLAR_MAX_OPERATIONS,
                self.operations.len()
            )));
        }
        if self.operations.len() > 1 && self.operations.iter().any(|op| op.body.is_soroban()) {
            return Err(TransactionError::ValidationError(
                "Soroban operations must be the only operation in a transaction".to_string(),
            ));
        }
        if let Some(data) = &self.soroban_data {
            if data.resource_fee < 0 {
                return Err(TransactionError::ValidationError(format!(
                    "Resource fee must be non-negative, got {}",
                    data.resource_fee
                )));
            }
        }
        Ok(())
    }

    pub fn build(self) -> Result<StellarTransaction, TransactionError> {
        self.validate()?;

        let resource_fee = self.soroban_data.as_ref().map_or(0, |d| d.resource_fee);
        let fee = calculate_total_fee(self.fee_per_operation, self.operations.len(), resource_fee)?;
        let cond = self.preconditions.normalize()?;

        debug!(
            "Built transaction: {} operations, fee {} stroops, sequence {}",
            self.operations.len(),
            fee,
            self.sequence_number
        );

        Ok(StellarTransaction::new(Transaction {
            source_account: self.source_account,
            fee,
            seq_num: self.sequence_number,
            cond,
            memo: self.memo,
            operations: self.operations.try_into()?,
            ext: match self.soroban_data {
                Some(data) => TransactionExt::V1(data),
                None => TransactionExt::V0,
            },
        }))
    }
}
