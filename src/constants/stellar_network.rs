//! Well-known Stellar network passphrases.

pub const STELLAR_PUBLIC_NETWORK_PASSPHRASE: &str =
    "Public Global Stellar Network ; September 2015";
pub const STELLAR_TESTNET_NETWORK_PASSPHRASE: &str = "Test SDF Network ; September 2015";
pub const STELLAR_FUTURENET_NETWORK_PASSPHRASE: &str = "Test SDF Future Network ; October 2022";
pub const STELLAR_STANDALONE_NETWORK_PASSPHRASE: &str = "Standalone Network ; February 2017";
