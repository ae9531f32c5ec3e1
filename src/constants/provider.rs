//! Defaults for the RPC provider retry policy.

/// Default per-call timeout in milliseconds
pub const DEFAULT_RPC_TIMEOUT_MS: u64 = 10_000;
/// Default number of retries after the first attempt
pub const DEFAULT_PROVIDER_MAX_RETRIES: u8 = 3;
/// Default base delay for exponential backoff
pub const DEFAULT_PROVIDER_RETRY_BASE_DELAY_MS: u64 = 100;
/// Default upper bound for a single backoff delay
pub const DEFAULT_PROVIDER_RETRY_MAX_DELAY_MS: u64 = 2000;
