//! Logical transaction preconditions and their wire normalisation.
//!
//! Callers describe what must hold for a transaction to be valid; the wire
//! form is chosen from that description. A transaction constrained only by
//! time bounds is encoded with the compact `PRECOND_TIME` arm, anything richer
//! needs `PRECOND_V2`, and an unconstrained one uses `PRECOND_NONE`. Decoding
//! either arm yields the same `TransactionPreconditions`.

use crate::{
    constants::STELLAR_MAX_EXTRA_SIGNERS,
    models::{
        Duration, LedgerBounds, Preconditions, PreconditionsV2, SignerKey, TimeBounds,
        TransactionError,
    },
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionPreconditions {
    pub time_bounds: Option<TimeBounds>,
    pub ledger_bounds: Option<LedgerBounds>,
    pub min_sequence_number: Option<i64>,
    /// Seconds; zero means unset.
    pub min_sequence_age: Duration,
    /// Ledgers; zero means unset.
    pub min_sequence_ledger_gap: u32,
    pub extra_signers: Vec<SignerKey>,
}

impl TransactionPreconditions {
    pub fn with_time_bounds(mut self, time_bounds: TimeBounds) -> Self {
        self.time_bounds = Some(time_bounds);
        self
    }

    pub fn with_ledger_bounds(mut self, ledger_bounds: LedgerBounds) -> Self {
        self.ledger_bounds = Some(ledger_bounds);
        self
    }

    pub fn with_min_sequence_number(mut self, sequence: i64) -> Self {
        self.min_sequence_number = Some(sequence);
        self
    }

    pub fn with_min_sequence_age(mut self, seconds: Duration) -> Self {
        self.min_sequence_age = seconds;
        self
    }

    pub fn with_min_sequence_ledger_gap(mut self, ledgers: u32) -> Self {
        self.min_sequence_ledger_gap = ledgers;
        self
    }

    pub fn add_extra_signer(mut self, signer: SignerKey) -> Self {
        self.extra_signers.push(signer);
        self
    }

    /// True when any constraint other than time bounds is present.
    pub fn needs_v2(&self) -> bool {
        self.ledger_bounds.is_some()
            || self.min_sequence_number.is_some()
            || self.min_sequence_age != 0
            || self.min_sequence_ledger_gap != 0
            || !self.extra_signers.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.time_bounds.is_none() && !self.needs_v2()
    }

    pub fn validate(&self) -> Result<(), TransactionError> {
        if let Some(tb) = &self.time_bounds {
            if tb.max_time != 0 && tb.max_time < tb.min_time {
                return Err(TransactionError::ValidationError(format!(
                    "Time bounds max_time {} is before min_time {}",
                    tb.max_time, tb.min_time
                )));
            }
        }
        if let Some(lb) = &self.ledger_bounds {
            if lb.max_ledger != 0 && lb.max_ledger < lb.min_ledger {
                return Err(TransactionError::ValidationError(format!(
                    "Ledger bounds max_ledger {} is before min_ledger {}",
                    lb.max_ledger, lb.min_ledger
                )));
            }
        }
        if self.extra_signers.len() > STELLAR_MAX_EXTRA_SIGNERS {
            return Err(TransactionError::ValidationError(format!(
                "At most {} extra signers are allowed, got {}",
                STELLAR_MAX_EXTRA_SIGNERS,
                self.extra_signers.len()
            )));
        }
        Ok(())
    }

    /// Picks the smallest wire arm able to carry these preconditions.
    pub fn normalize(&self) -> Result<Preconditions, TransactionError> {
        self.validate()?;

        if self.needs_v2() {
            return Ok(Preconditions::V2(PreconditionsV2 {
                time_bounds: self.time_bounds,
                ledger_bounds: self.ledger_bounds,
                min_seq_num: self.min_sequence_number,
                min_seq_age: self.min_sequence_age,
                min_seq_ledger_gap: self.min_sequence_ledger_gap,
                extra_signers: self.extra_signers.clone().try_into()?,
            }));
        }

        Ok(match self.time_bounds {
            Some(tb) => Preconditions::Time(tb),
            None => Preconditions::None,
        })
    }
}

impl From<&Preconditions> for TransactionPreconditions {
    fn from(cond: &Preconditions) -> Self {
        match cond {
            Preconditions::None => Self::default(),
            Preconditions::Time(tb) => Self::default().with_time_bounds(*tb),
            Preconditions::V2(v2) => Self {
                time_bounds: v2.time_bounds,
                ledger_bounds: v2.ledger_bounds,
                min_sequence_number: v2.min_seq_num,
                min_sequence_age: v2.min_seq_age,
                min_sequence_ledger_gap: v2.min_seq_ledger_gap,
                extra_signers: v2.extra_signers.to_vec(),
            },
        }
    }
}

impl TryFrom<TransactionPreconditions> for Preconditions {
    type Error = TransactionError;

    fn try_from(value: TransactionPreconditions) -> Result<Self, Self::Error> {
        value.normalize()
    }
}
