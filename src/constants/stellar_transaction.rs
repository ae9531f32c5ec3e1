//! Constants for Stellar transaction assembly.
//!
//! Protocol limits enforced by the builder and fee-bump logic, plus the
//! fixed-point scale used for amounts.

use chrono::Duration;

/// Minimum per-operation fee accepted by the network, in stroops.
pub const STELLAR_DEFAULT_TRANSACTION_FEE: u32 = 100;
/// Maximum number of operations allowed in a Stellar transaction
pub const STELLAR_MAX_OPERATIONS: usize = 100;
/// Maximum number of signatures on a single envelope
pub const STELLAR_MAX_SIGNATURES: usize = 20;
/// Maximum number of extra signers in V2 preconditions
pub const STELLAR_MAX_EXTRA_SIGNERS: usize = 2;
/// Maximum byte length of a text memo
pub const STELLAR_MAX_MEMO_TEXT_LEN: usize = 28;
/// Maximum byte length of a hash(x) preimage used as a signature
pub const STELLAR_MAX_HASH_X_PREIMAGE_LEN: usize = 64;

/// Number of fractional digits in an amount
pub const STELLAR_AMOUNT_DECIMALS: usize = 7;
/// One unit expressed in stroops (10^7)
pub const STELLAR_AMOUNT_SCALE: i64 = 10_000_000;

/// Default validity window applied by `TransactionBuilder::with_timeout` callers
pub const STELLAR_DEFAULT_TRANSACTION_TIMEOUT_SECONDS: i64 = 300;

/// Get default transaction validity duration
pub fn get_stellar_default_transaction_timeout() -> Duration {
    Duration::seconds(STELLAR_DEFAULT_TRANSACTION_TIMEOUT_SECONDS)
}
