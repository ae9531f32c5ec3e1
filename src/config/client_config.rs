use std::env;

use log::warn;

use crate::{
    constants::{
        DEFAULT_PROVIDER_MAX_RETRIES, DEFAULT_PROVIDER_RETRY_BASE_DELAY_MS,
        DEFAULT_PROVIDER_RETRY_MAX_DELAY_MS, DEFAULT_RPC_TIMEOUT_MS,
        STELLAR_DEFAULT_TRANSACTION_FEE,
    },
    models::{KnownNetwork, Network, NetworkError},
    services::provider::RetryConfig,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// `None` until a network is configured; signing needs one.
    pub network: Option<Network>,
    pub base_fee: u32,
    pub rpc_timeout_ms: u64,
    pub provider_max_retries: u8,
    pub provider_retry_base_delay_ms: u64,
    pub provider_retry_max_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: None,
            base_fee: STELLAR_DEFAULT_TRANSACTION_FEE,
            rpc_timeout_ms: DEFAULT_RPC_TIMEOUT_MS,
            provider_max_retries: DEFAULT_PROVIDER_MAX_RETRIES,
            provider_retry_base_delay_ms: DEFAULT_PROVIDER_RETRY_BASE_DELAY_MS,
            provider_retry_max_delay_ms: DEFAULT_PROVIDER_RETRY_MAX_DELAY_MS,
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring malformed {name}={value:?}, using the default");
            default
        }),
        Err(_) => default,
    }
}

fn network_from_env() -> Option<Network> {
    if let Ok(passphrase) = env::var("STELLAR_NETWORK_PASSPHRASE") {
        return Network::new(passphrase).ok();
    }
    let name = env::var("STELLAR_NETWORK").ok()?;
    match name.parse::<KnownNetwork>() {
        Ok(known) => Some(known.into()),
        Err(_) => {
            warn!("Unknown STELLAR_NETWORK {name:?}, no network selected");
            None
        }
    }
}

impl ClientConfig {
    /// Reads the configuration from the environment, loading `.env` first.
    ///
    /// `STELLAR_NETWORK_PASSPHRASE` takes precedence over `STELLAR_NETWORK`
    /// (one of `public`, `testnet`, `futurenet`, `standalone`).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            network: network_from_env(),
            base_fee: parse_env("STELLAR_BASE_FEE", STELLAR_DEFAULT_TRANSACTION_FEE),
            rpc_timeout_ms: parse_env("RPC_TIMEOUT_MS", DEFAULT_RPC_TIMEOUT_MS),
            provider_max_retries: parse_env("PROVIDER_MAX_RETRIES", DEFAULT_PROVIDER_MAX_RETRIES),
            provider_retry_base_delay_ms: parse_env(
                "PROVIDER_RETRY_BASE_DELAY_MS",
                DEFAULT_PROVIDER_RETRY_BASE_DELAY_MS,
            ),
            provider_retry_max_delay_ms: parse_env(
                "PROVIDER_RETRY_MAX_DELAY_MS",
                DEFAULT_PROVIDER_RETRY_MAX_DELAY_MS,
            ),
        }
    }

    pub fn network(&self) -> Result<&Network, NetworkError> {
        self.network.as_ref().ok_or(NetworkError::NotSelected)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new(
            self.provider_max_retries,
            self.provider_retry_base_delay_ms,
            self.provider_retry_max_delay_ms,
            self.rpc_timeout_ms,
        )
    }
}
