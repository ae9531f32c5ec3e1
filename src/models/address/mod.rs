pub mod strkey;
pub use strkey::VersionByte;

use std::{fmt, str::FromStr};

use zeroize::Zeroizing;

use crate::models::{AccountId, MuxedAccount, StrKeyError};

/// A `G...` account address in its wire form.
pub type Address = AccountId;
/// A `G...` or `M...` address in its wire form.
pub type MuxedAddress = MuxedAccount;

/// Any identity the StrKey format can carry, parsed into raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strkey {
    PublicKeyEd25519([u8; 32]),
    PrivateKeyEd25519(Zeroizing<[u8; 32]>),
    PreAuthTx([u8; 32]),
    HashX([u8; 32]),
    MuxedAccountEd25519 { ed25519: [u8; 32], id: u64 },
    SignedPayloadEd25519 { ed25519: [u8; 32], payload: Vec<u8> },
    Contract([u8; 32]),
    LiquidityPool([u8; 32]),
    ClaimableBalance([u8; 32]),
}

impl Strkey {
    pub fn version(&self) -> VersionByte {
        match self {
            Strkey::PublicKeyEd25519(_) => VersionByte::AccountId,
            Strkey::PrivateKeyEd25519(_) => VersionByte::SecretSeed,
            Strkey::PreAuthTx(_) => VersionByte::PreAuthTx,
            Strkey::HashX(_) => VersionByte::HashX,
            Strkey::MuxedAccountEd25519 { .. } => VersionByte::MuxedAccount,
            Strkey::SignedPayloadEd25519 { .. } => VersionByte::SignedPayload,
            Strkey::Contract(_) => VersionByte::Contract,
            Strkey::LiquidityPool(_) => VersionByte::LiquidityPool,
            Strkey::ClaimableBalance(_) => VersionByte::ClaimableBalance,
        }
    }
}

impl fmt::Display for Strkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Strkey::PublicKeyEd25519(key) => strkey::encode_ed25519_public_key(key),
            Strkey::PrivateKeyEd25519(seed) => {
                let text = strkey::encode_ed25519_secret_seed(seed);
                return f.write_str(&text);
            }
            Strkey::PreAuthTx(hash) => strkey::encode_pre_auth_tx(hash),
            Strkey::HashX(hash) => strkey::encode_sha256_hash(hash),
            Strkey::MuxedAccountEd25519 { ed25519, id } => {
                strkey::encode_muxed_account(ed25519, *id)
            }
            Strkey::SignedPayloadEd25519 { ed25519, payload } => {
                strkey::encode_signed_payload(ed25519, payload).map_err(|_| fmt::Error)?
            }
            Strkey::Contract(id) => strkey::encode_contract(id),
            Strkey::LiquidityPool(id) => strkey::encode_liquidity_pool(id),
            Strkey::ClaimableBalance(id) => strkey::encode_claimable_balance(id),
        };
        f.write_str(&text)
    }
}

impl FromStr for Strkey {
    type Err = StrKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (version, _) = strkey::decode(s)?;
        Ok(match version {
            VersionByte::AccountId => Strkey::PublicKeyEd25519(strkey::decode_ed25519_public_key(s)?),
            VersionByte::SecretSeed => {
                Strkey::PrivateKeyEd25519(strkey::decode_ed25519_secret_seed(s)?)
            }
            VersionByte::PreAuthTx => Strkey::PreAuthTx(strkey::decode_pre_auth_tx(s)?),
            VersionByte::HashX => Strkey::HashX(strkey::decode_sha256_hash(s)?),
            VersionByte::MuxedAccount => {
                let (ed25519, id) = strkey::decode_muxed_account(s)?;
                Strkey::MuxedAccountEd25519 { ed25519, id }
            }
            VersionByte::SignedPayload => {
                let (ed25519, payload) = strkey::decode_signed_payload(s)?;
                Strkey::SignedPayloadEd25519 { ed25519, payload }
            }
            VersionByte::Contract => Strkey::Contract(strkey::decode_contract(s)?),
            VersionByte::LiquidityPool => Strkey::LiquidityPool(strkey::decode_liquidity_pool(s)?),
            VersionByte::ClaimableBalance => {
                Strkey::ClaimableBalance(strkey::decode_claimable_balance(s)?)
            }
        })
    }
}
