//! Retry with exponential backoff for RPC calls.

use std::{future::Future, time::Duration};

use log::{debug, warn};
use rand::Rng;
use tokio::sync::watch;

use super::{is_retriable_error, ProviderError};
use crate::constants::{
    DEFAULT_PROVIDER_MAX_RETRIES, DEFAULT_PROVIDER_RETRY_BASE_DELAY_MS,
    DEFAULT_PROVIDER_RETRY_MAX_DELAY_MS, DEFAULT_RPC_TIMEOUT_MS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u8,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Upper bound on a single attempt.
    pub timeout_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_PROVIDER_MAX_RETRIES,
            base_delay_ms: DEFAULT_PROVIDER_RETRY_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_PROVIDER_RETRY_MAX_DELAY_MS,
            timeout_ms: DEFAULT_RPC_TIMEOUT_MS,
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u8, base_delay_ms: u64, max_delay_ms: u64, timeout_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            max_delay_ms: max_delay_ms.max(base_delay_ms),
            timeout_ms,
        }
    }

    pub fn from_env() -> Self {
        crate::config::ClientConfig::from_env().retry_config()
    }
}

/// Delay before retry number `attempt` (0-based): `base * 2^attempt` capped
/// at `max`, of which the upper half is randomized.
pub fn calculate_retry_delay(attempt: u8, base_delay_ms: u64, max_delay_ms: u64) -> Duration {
    if base_delay_ms == 0 || max_delay_ms == 0 {
        return Duration::ZERO;
    }
    let exponential = base_delay_ms.saturating_mul(1u64 << attempt.min(63));
    let capped = exponential.min(max_delay_ms);
    let half = capped / 2;
    let jitter = rand::rng().random_range(0..=capped - half);
    Duration::from_millis(half + jitter)
}

fn is_cancelled(cancel: Option<&watch::Receiver<bool>>) -> bool {
    cancel.is_some_and(|rx| *rx.borrow())
}

async fn sleep_unless_cancelled(
    delay: Duration,
    cancel: Option<&watch::Receiver<bool>>,
) -> Result<(), ProviderError> {
    let Some(cancel) = cancel else {
        tokio::time::sleep(delay).await;
        return Ok(());
    };

    let mut rx = cancel.clone();
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);
    let cancelled = tokio::select! {
        _ = &mut sleep => return Ok(()),
        changed = rx.wait_for(|cancelled| *cancelled) => changed.is_ok(),
    };
    if cancelled {
        return Err(ProviderError::Cancelled);
    }
    // sender gone without cancelling; finish the wait
    sleep.await;
    Ok(())
}

/// Runs `operation` until it succeeds, fails with a non-retriable error, or
/// the retry budget is spent. Each attempt is bounded by the configured
/// timeout and the cancel signal is checked between attempts.
///
/// `operation` receives the 0-based attempt number.
pub async fn retry_rpc_call<T, F, Fut>(
    operation_name: &str,
    config: &RetryConfig,
    cancel: Option<&watch::Receiver<bool>>,
    mut operation: F,
) -> Result<T, ProviderError>
where
    F: FnMut(u8) -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let timeout = Duration::from_millis(config.timeout_ms);
    let mut attempt: u8 = 0;

    loop {
        if is_cancelled(cancel) {
            debug!("RPC operation '{operation_name}' cancelled before attempt {attempt}");
            return Err(ProviderError::Cancelled);
        }

        let result = match tokio::time::timeout(timeout, operation(attempt)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout),
        };

        match result {
            Ok(value) => {
                if attempt > 0 {
                    debug!("RPC operation '{operation_name}' succeeded after {attempt} retries");
                }
                return Ok(value);
            }
            Err(e) if is_retriable_error(&e) && attempt < config.max_retries => {
                let delay =
                    calculate_retry_delay(attempt, config.base_delay_ms, config.max_delay_ms);
                warn!(
                    "RPC operation '{}' failed (attempt {}/{}): {}. Retrying in {:?}",
                    operation_name,
                    attempt + 1,
                    u16::from(config.max_retries) + 1,
                    e,
                    delay
                );
                sleep_unless_cancelled(delay, cancel).await?;
                attempt += 1;
            }
            Err(e) => {
                if is_retriable_error(&e) {
                    warn!(
                        "RPC operation '{}' exhausted {} retries: {}",
                        operation_name, config.max_retries, e
                    );
                } else {
                    debug!("RPC operation '{operation_name}' failed with non-retriable error: {e}");
                }
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicU8, Ordering},
        Arc,
    };

    fn fast_config(max_retries: u8) -> RetryConfig {
        RetryConfig::new(max_retries, 1, 4, 1_000)
    }

    #[test]
    fn test_delay_is_bounded() {
        for attempt in 0..10 {
            let delay = calculate_retry_delay(attempt, 100, 2_000);
            let capped = (100u64 << attempt).min(2_000);
            assert!(delay >= Duration::from_millis(capped / 2));
            assert!(delay <= Duration::from_millis(capped));
        }
        assert!(calculate_retry_delay(200, 100, 2_000) <= Duration::from_secs(2));
        assert_eq!(calculate_retry_delay(3, 0, 2_000), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_retries_transient_errors_until_success() {
        let calls = Arc::new(AtomicU8::new(0));
        let counter = calls.clone();
        let result = retry_rpc_call("test", &fast_config(3), None, |_| {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(ProviderError::Timeout)
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_stops_on_permanent_error() {
        let calls = Arc::new(AtomicU8::new(0));
        let counter = calls.clone();
        let result: Result<(), _> = retry_rpc_call("test", &fast_config(3), None, |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(ProviderError::InvalidResponse("bad".to_string())) }
        })
        .await;
        assert!(matches!(result, Err(ProviderError::InvalidResponse(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU8::new(0));
        let counter = calls.clone();
        let result: Result<(), _> = retry_rpc_call("test", &fast_config(2), None, |attempt| {
            assert_eq!(attempt, counter.fetch_add(1, Ordering::SeqCst));
            async { Err(ProviderError::RateLimited) }
        })
        .await;
        assert_eq!(result, Err(ProviderError::RateLimited));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_attempt_timeout() {
        let config = RetryConfig::new(0, 1, 1, 10);
        let result: Result<(), _> = retry_rpc_call("slow", &config, None, |_| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert_eq!(result, Err(ProviderError::Timeout));
    }

    #[tokio::test]
    async fn test_cancelled_before_first_attempt() {
        let (tx, rx) = watch::channel(true);
        let result: Result<(), _> =
            retry_rpc_call("test", &fast_config(3), Some(&rx), |_| async { Ok(()) }).await;
        assert_eq!(result, Err(ProviderError::Cancelled));
        drop(tx);
    }

    #[tokio::test]
    async fn test_cancel_during_backoff() {
        let (tx, rx) = watch::channel(false);
        let config = RetryConfig::new(5, 5_000, 5_000, 1_000);
        let handle = tokio::spawn(async move {
            retry_rpc_call("test", &config, Some(&rx), |_| async {
                Err::<(), _>(ProviderError::BadGateway)
            })
            .await
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        tx.send(true).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result, Err(ProviderError::Cancelled));
    }
}
