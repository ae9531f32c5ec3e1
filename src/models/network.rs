//! Network identity.
//!
//! Every signature commits to a network id, the sha256 of the network
//! passphrase, so a transaction signed for testnet can never be replayed on
//! the public network.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
    constants::{
        STELLAR_FUTURENET_NETWORK_PASSPHRASE, STELLAR_PUBLIC_NETWORK_PASSPHRASE,
        STELLAR_STANDALONE_NETWORK_PASSPHRASE, STELLAR_TESTNET_NETWORK_PASSPHRASE,
    },
    models::{xdr::Hash, NetworkError},
    utils::sha256,
};

/// Networks with a published passphrase.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum KnownNetwork {
    #[strum(to_string = "public", serialize = "mainnet")]
    #[serde(alias = "mainnet")]
    Public,
    Testnet,
    Futurenet,
    Standalone,
}

impl KnownNetwork {
    pub fn passphrase(&self) -> &'static str {
        match self {
            KnownNetwork::Public => STELLAR_PUBLIC_NETWORK_PASSPHRASE,
            KnownNetwork::Testnet => STELLAR_TESTNET_NETWORK_PASSPHRASE,
            KnownNetwork::Futurenet => STELLAR_FUTURENET_NETWORK_PASSPHRASE,
            KnownNetwork::Standalone => STELLAR_STANDALONE_NETWORK_PASSPHRASE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, std::hash::Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Network {
    passphrase: String,
}

impl Network {
    /// Fails with [`NetworkError::NotSelected`] for an empty passphrase.
    pub fn new(passphrase: impl Into<String>) -> Result<Self, NetworkError> {
        let passphrase = passphrase.into();
        if passphrase.is_empty() {
            return Err(NetworkError::NotSelected);
        }
        Ok(Self { passphrase })
    }

    pub fn public() -> Self {
        KnownNetwork::Public.into()
    }

    pub fn testnet() -> Self {
        KnownNetwork::Testnet.into()
    }

    pub fn futurenet() -> Self {
        KnownNetwork::Futurenet.into()
    }

    pub fn standalone() -> Self {
        KnownNetwork::Standalone.into()
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    pub fn network_id(&self) -> Hash {
        Hash(sha256(self.passphrase.as_bytes()))
    }
}

impl From<KnownNetwork> for Network {
    fn from(network: KnownNetwork) -> Self {
        Self {
            passphrase: network.passphrase().to_string(),
        }
    }
}

impl TryFrom<String> for Network {
    type Error = NetworkError;

    fn try_from(passphrase: String) -> Result<Self, Self::Error> {
        Network::new(passphrase)
    }
}

impl From<Network> for String {
    fn from(network: Network) -> Self {
        network.passphrase
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.passphrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_network_ids() {
        assert_eq!(
            Network::public().network_id().to_string(),
            "7ac33997544e3175d266bd022439b22cdb16508c01163f26e5cb2a3e1045a979"
        );
        assert_eq!(
            Network::testnet().network_id().to_string(),
            "cee0302d59844d32bdca915c8203dd44b33fbb7edc19051ea37abedf28ecd472"
        );
    }

    #[test]
    fn test_empty_passphrase_is_not_a_network() {
        assert_eq!(Network::new(""), Err(NetworkError::NotSelected));
        assert!(serde_json::from_str::<Network>("\"\"").is_err());
    }

    #[test]
    fn test_known_network_parsing() {
        assert_eq!("TESTNET".parse::<KnownNetwork>().unwrap(), KnownNetwork::Testnet);
        assert_eq!("mainnet".parse::<KnownNetwork>().unwrap(), KnownNetwork::Public);
        assert_eq!(KnownNetwork::Futurenet.to_string(), "futurenet");
        assert!("devnet".parse::<KnownNetwork>().is_err());
    }

    #[test]
    fn test_serde_uses_passphrase() {
        let json = serde_json::to_string(&Network::standalone()).unwrap();
        assert_eq!(json, format!("\"{STELLAR_STANDALONE_NETWORK_PASSPHRASE}\""));
        let back: Network = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Network::standalone());
    }
}
