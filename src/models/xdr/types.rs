//! Keys, accounts, assets, memos and preconditions.

use std::{fmt, str::FromStr};

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

use super::{xdr_enum_codec, BytesM, ReadXdr, StringM, VecM, WriteXdr, XdrReader, XdrWriter};
use crate::{
    constants::{STELLAR_MAX_EXTRA_SIGNERS, STELLAR_MAX_MEMO_TEXT_LEN},
    models::{
        address::strkey::{self, VersionByte},
        CodecError, FormatError, StrKeyError, TransactionError,
    },
    utils::{price_from_decimal, sha256},
};

pub type Uint256 = [u8; 32];
pub type SignatureHint = [u8; 4];
pub type TimePoint = u64;
pub type Duration = u64;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, std::hash::Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
pub struct Hash(pub [u8; 32]);

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for Hash {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| CodecError::InvalidHex(e.to_string()))?;
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| CodecError::LengthExceedsMax {
                declared: v.len(),
                max: 32,
            })?;
        Ok(Hash(array))
    }
}

impl From<[u8; 32]> for Hash {
    fn from(value: [u8; 32]) -> Self {
        Hash(value)
    }
}

impl WriteXdr for Hash {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_fixed_opaque(&self.0);
    }
}

impl ReadXdr for Hash {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(Hash(r.read_fixed_opaque()?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum PublicKeyType {
    Ed25519 = 0,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum CryptoKeyType {
    Ed25519 = 0,
    PreAuthTx = 1,
    HashX = 2,
    Ed25519SignedPayload = 3,
    MuxedEd25519 = 0x100,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum SignerKeyType {
    Ed25519 = 0,
    PreAuthTx = 1,
    HashX = 2,
    Ed25519SignedPayload = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum AssetType {
    Native = 0,
    CreditAlphanum4 = 1,
    CreditAlphanum12 = 2,
    PoolShare = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum MemoType {
    None = 0,
    Text = 1,
    Id = 2,
    Hash = 3,
    Return = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum PreconditionType {
    None = 0,
    Time = 1,
    V2 = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum LiquidityPoolType {
    ConstantProduct = 0,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum ClaimableBalanceIdType {
    V0 = 0,
}

xdr_enum_codec!(
    PublicKeyType,
    CryptoKeyType,
    SignerKeyType,
    AssetType,
    MemoType,
    PreconditionType,
    LiquidityPoolType,
    ClaimableBalanceIdType,
);

/// `ExtensionPoint`, a reserved union with a single void arm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, std::hash::Hash)]
pub enum ExtensionPoint {
    #[default]
    V0,
}

impl WriteXdr for ExtensionPoint {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_i32(0);
    }
}

impl ReadXdr for ExtensionPoint {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        match r.read_i32()? {
            0 => Ok(ExtensionPoint::V0),
            other => Err(CodecError::unexpected_arm("ExtensionPoint", other)),
        }
    }
}

/// An ed25519 account, rendered as a `G...` StrKey.
#[derive(Clone, Copy, Debug, PartialEq, Eq, std::hash::Hash, PartialOrd, Ord)]
pub struct AccountId(pub Uint256);

impl AccountId {
    pub fn as_bytes(&self) -> &Uint256 {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&strkey::encode_ed25519_public_key(&self.0))
    }
}

impl FromStr for AccountId {
    type Err = StrKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(AccountId(strkey::decode_ed25519_public_key(s)?))
    }
}

impl WriteXdr for AccountId {
    fn write_xdr(&self, w: &mut XdrWriter) {
        PublicKeyType::Ed25519.write_xdr(w);
        w.write_fixed_opaque(&self.0);
    }
}

impl ReadXdr for AccountId {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        match PublicKeyType::read_xdr(r)? {
            PublicKeyType::Ed25519 => Ok(AccountId(r.read_fixed_opaque()?)),
        }
    }
}

/// A source or destination that may carry a 64-bit sub-account id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum MuxedAccount {
    Ed25519(Uint256),
    MuxedEd25519 { id: u64, ed25519: Uint256 },
}

impl MuxedAccount {
    /// The underlying signing key.
    pub fn account_id(&self) -> AccountId {
        match self {
            MuxedAccount::Ed25519(key) => AccountId(*key),
            MuxedAccount::MuxedEd25519 { ed25519, .. } => AccountId(*ed25519),
        }
    }

    pub fn is_muxed(&self) -> bool {
        matches!(self, MuxedAccount::MuxedEd25519 { .. })
    }
}

impl From<AccountId> for MuxedAccount {
    fn from(value: AccountId) -> Self {
        MuxedAccount::Ed25519(value.0)
    }
}

impl fmt::Display for MuxedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MuxedAccount::Ed25519(key) => f.write_str(&strkey::encode_ed25519_public_key(key)),
            MuxedAccount::MuxedEd25519 { id, ed25519 } => {
                f.write_str(&strkey::encode_muxed_account(ed25519, *id))
            }
        }
    }
}

impl FromStr for MuxedAccount {
    type Err = StrKeyError;

    /// Accepts both `G...` and `M...` addresses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match strkey::decode(s)? {
            (VersionByte::AccountId, _) => {
                Ok(MuxedAccount::Ed25519(strkey::decode_ed25519_public_key(s)?))
            }
            (VersionByte::MuxedAccount, _) => {
                let (ed25519, id) = strkey::decode_muxed_account(s)?;
                Ok(MuxedAccount::MuxedEd25519 { id, ed25519 })
            }
            (other, _) => Err(StrKeyError::UnexpectedVersionByte {
                expected: VersionByte::MuxedAccount as u8,
                actual: other as u8,
            }),
        }
    }
}

impl WriteXdr for MuxedAccount {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            MuxedAccount::Ed25519(key) => {
                CryptoKeyType::Ed25519.write_xdr(w);
                w.write_fixed_opaque(key);
            }
            MuxedAccount::MuxedEd25519 { id, ed25519 } => {
                CryptoKeyType::MuxedEd25519.write_xdr(w);
                w.write_u64(*id);
                w.write_fixed_opaque(ed25519);
            }
        }
    }
}

impl ReadXdr for MuxedAccount {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        match CryptoKeyType::read_xdr(r)? {
            CryptoKeyType::Ed25519 => Ok(MuxedAccount::Ed25519(r.read_fixed_opaque()?)),
            CryptoKeyType::MuxedEd25519 => {
                let id = r.read_u64()?;
                let ed25519 = r.read_fixed_opaque()?;
                Ok(MuxedAccount::MuxedEd25519 { id, ed25519 })
            }
            other => Err(CodecError::unexpected_arm("MuxedAccount", other.into())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum SignerKey {
    Ed25519(Uint256),
    PreAuthTx(Uint256),
    HashX(Uint256),
    Ed25519SignedPayload {
        ed25519: Uint256,
        payload: BytesM<64>,
    },
}

impl fmt::Display for SignerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SignerKey::Ed25519(key) => strkey::encode_ed25519_public_key(key),
            SignerKey::PreAuthTx(hash) => strkey::encode_pre_auth_tx(hash),
            SignerKey::HashX(hash) => strkey::encode_sha256_hash(hash),
            SignerKey::Ed25519SignedPayload { ed25519, payload } => {
                strkey::encode_signed_payload(ed25519, payload).map_err(|_| fmt::Error)?
            }
        };
        f.write_str(&text)
    }
}

impl FromStr for SignerKey {
    type Err = StrKeyError;

    /// Accepts `G...`, `T...`, `X...` and `P...` keys.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match strkey::decode(s)?.0 {
            VersionByte::AccountId => Ok(SignerKey::Ed25519(strkey::decode_ed25519_public_key(s)?)),
            VersionByte::PreAuthTx => Ok(SignerKey::PreAuthTx(strkey::decode_pre_auth_tx(s)?)),
            VersionByte::HashX => Ok(SignerKey::HashX(strkey::decode_sha256_hash(s)?)),
            VersionByte::SignedPayload => {
                let (ed25519, payload) = strkey::decode_signed_payload(s)?;
                let payload = BytesM::try_from(payload)
                    .map_err(|e| StrKeyError::InvalidPayload(e.to_string()))?;
                Ok(SignerKey::Ed25519SignedPayload { ed25519, payload })
            }
            other => Err(StrKeyError::UnexpectedVersionByte {
                expected: VersionByte::AccountId as u8,
                actual: other as u8,
            }),
        }
    }
}

impl WriteXdr for SignerKey {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            SignerKey::Ed25519(key) => {
                SignerKeyType::Ed25519.write_xdr(w);
                w.write_fixed_opaque(key);
            }
            SignerKey::PreAuthTx(hash) => {
                SignerKeyType::PreAuthTx.write_xdr(w);
                w.write_fixed_opaque(hash);
            }
            SignerKey::HashX(hash) => {
                SignerKeyType::HashX.write_xdr(w);
                w.write_fixed_opaque(hash);
            }
            SignerKey::Ed25519SignedPayload { ed25519, payload } => {
                SignerKeyType::Ed25519SignedPayload.write_xdr(w);
                w.write_fixed_opaque(ed25519);
                payload.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for SignerKey {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(match SignerKeyType::read_xdr(r)? {
            SignerKeyType::Ed25519 => SignerKey::Ed25519(r.read_fixed_opaque()?),
            SignerKeyType::PreAuthTx => SignerKey::PreAuthTx(r.read_fixed_opaque()?),
            SignerKeyType::HashX => SignerKey::HashX(r.read_fixed_opaque()?),
            SignerKeyType::Ed25519SignedPayload => {
                let ed25519 = r.read_fixed_opaque()?;
                let payload = BytesM::read_xdr(r)?;
                SignerKey::Ed25519SignedPayload { ed25519, payload }
            }
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct Signer {
    pub key: SignerKey,
    pub weight: u32,
}

impl WriteXdr for Signer {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.key.write_xdr(w);
        w.write_u32(self.weight);
    }
}

impl ReadXdr for Signer {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(Signer {
            key: SignerKey::read_xdr(r)?,
            weight: r.read_u32()?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct DecoratedSignature {
    pub hint: SignatureHint,
    pub signature: BytesM<64>,
}

impl WriteXdr for DecoratedSignature {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_fixed_opaque(&self.hint);
        self.signature.write_xdr(w);
    }
}

impl ReadXdr for DecoratedSignature {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(DecoratedSignature {
            hint: r.read_fixed_opaque()?,
            signature: BytesM::read_xdr(r)?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, std::hash::Hash, PartialOrd, Ord)]
pub struct AssetCode4(pub [u8; 4]);

#[derive(Clone, Copy, Debug, PartialEq, Eq, std::hash::Hash, PartialOrd, Ord)]
pub struct AssetCode12(pub [u8; 12]);

fn asset_code_str(bytes: &[u8]) -> String {
    let end = bytes.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

fn check_asset_code(code: &str, max: usize) -> Result<(), TransactionError> {
    if code.is_empty() || code.len() > max || !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(TransactionError::ValidationError(format!(
            "Invalid asset code '{code}'"
        )));
    }
    Ok(())
}

impl FromStr for AssetCode4 {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        check_asset_code(s, 4)?;
        let mut code = [0u8; 4];
        code[..s.len()].copy_from_slice(s.as_bytes());
        Ok(AssetCode4(code))
    }
}

impl FromStr for AssetCode12 {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        check_asset_code(s, 12)?;
        let mut code = [0u8; 12];
        code[..s.len()].copy_from_slice(s.as_bytes());
        Ok(AssetCode12(code))
    }
}

impl fmt::Display for AssetCode4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&asset_code_str(&self.0))
    }
}

impl fmt::Display for AssetCode12 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&asset_code_str(&self.0))
    }
}

impl WriteXdr for AssetCode4 {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_fixed_opaque(&self.0);
    }
}

impl ReadXdr for AssetCode4 {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(AssetCode4(r.read_fixed_opaque()?))
    }
}

impl WriteXdr for AssetCode12 {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_fixed_opaque(&self.0);
    }
}

impl ReadXdr for AssetCode12 {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(AssetCode12(r.read_fixed_opaque()?))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash, PartialOrd, Ord)]
pub struct AlphaNum4 {
    pub asset_code: AssetCode4,
    pub issuer: AccountId,
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash, PartialOrd, Ord)]
pub struct AlphaNum12 {
    pub asset_code: AssetCode12,
    pub issuer: AccountId,
}

impl WriteXdr for AlphaNum4 {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.asset_code.write_xdr(w);
        self.issuer.write_xdr(w);
    }
}

impl ReadXdr for AlphaNum4 {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(AlphaNum4 {
            asset_code: AssetCode4::read_xdr(r)?,
            issuer: AccountId::read_xdr(r)?,
        })
    }
}

impl WriteXdr for AlphaNum12 {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.asset_code.write_xdr(w);
        self.issuer.write_xdr(w);
    }
}

impl ReadXdr for AlphaNum12 {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(AlphaNum12 {
            asset_code: AssetCode12::read_xdr(r)?,
            issuer: AccountId::read_xdr(r)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash, PartialOrd, Ord)]
pub enum Asset {
    Native,
    CreditAlphanum4(AlphaNum4),
    CreditAlphanum12(AlphaNum12),
}

impl Asset {
    /// Issued asset; codes of 1-4 characters use the 4-byte arm, 5-12 the
    /// 12-byte arm.
    pub fn credit(code: &str, issuer: AccountId) -> Result<Self, TransactionError> {
        if code.len() <= 4 {
            Ok(Asset::CreditAlphanum4(AlphaNum4 {
                asset_code: code.parse()?,
                issuer,
            }))
        } else {
            Ok(Asset::CreditAlphanum12(AlphaNum12 {
                asset_code: code.parse()?,
                issuer,
            }))
        }
    }

    pub fn asset_type(&self) -> AssetType {
        match self {
            Asset::Native => AssetType::Native,
            Asset::CreditAlphanum4(_) => AssetType::CreditAlphanum4,
            Asset::CreditAlphanum12(_) => AssetType::CreditAlphanum12,
        }
    }
}

impl fmt::Display for Asset {
    /// `native` or `CODE:ISSUER`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Native => f.write_str("native"),
            Asset::CreditAlphanum4(a) => write!(f, "{}:{}", a.asset_code, a.issuer),
            Asset::CreditAlphanum12(a) => write!(f, "{}:{}", a.asset_code, a.issuer),
        }
    }
}

impl FromStr for Asset {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "native" {
            return Ok(Asset::Native);
        }
        let (code, issuer) = s.split_once(':').ok_or_else(|| {
            TransactionError::ValidationError(format!("Invalid asset '{s}', expected CODE:ISSUER"))
        })?;
        Asset::credit(code, issuer.parse()?)
    }
}

impl WriteXdr for Asset {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.asset_type().write_xdr(w);
        match self {
            Asset::Native => {}
            Asset::CreditAlphanum4(a) => a.write_xdr(w),
            Asset::CreditAlphanum12(a) => a.write_xdr(w),
        }
    }
}

impl ReadXdr for Asset {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        match AssetType::read_xdr(r)? {
            AssetType::Native => Ok(Asset::Native),
            AssetType::CreditAlphanum4 => Ok(Asset::CreditAlphanum4(AlphaNum4::read_xdr(r)?)),
            AssetType::CreditAlphanum12 => Ok(Asset::CreditAlphanum12(AlphaNum12::read_xdr(r)?)),
            other => Err(CodecError::unexpected_arm("Asset", other.into())),
        }
    }
}

/// Asset code alone, as used by `AllowTrust`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum AssetCode {
    CreditAlphanum4(AssetCode4),
    CreditAlphanum12(AssetCode12),
}

impl FromStr for AssetCode {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() <= 4 {
            Ok(AssetCode::CreditAlphanum4(s.parse()?))
        } else {
            Ok(AssetCode::CreditAlphanum12(s.parse()?))
        }
    }
}

impl WriteXdr for AssetCode {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            AssetCode::CreditAlphanum4(code) => {
                AssetType::CreditAlphanum4.write_xdr(w);
                code.write_xdr(w);
            }
            AssetCode::CreditAlphanum12(code) => {
                AssetType::CreditAlphanum12.write_xdr(w);
                code.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for AssetCode {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        match AssetType::read_xdr(r)? {
            AssetType::CreditAlphanum4 => Ok(AssetCode::CreditAlphanum4(AssetCode4::read_xdr(r)?)),
            AssetType::CreditAlphanum12 => {
                Ok(AssetCode::CreditAlphanum12(AssetCode12::read_xdr(r)?))
            }
            other => Err(CodecError::unexpected_arm("AssetCode", other.into())),
        }
    }
}

/// Liquidity pool fee in basis points used by every constant-product pool.
pub const LIQUIDITY_POOL_FEE_V18: i32 = 30;

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct LiquidityPoolConstantProductParameters {
    pub asset_a: Asset,
    pub asset_b: Asset,
    pub fee: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum LiquidityPoolParameters {
    ConstantProduct(LiquidityPoolConstantProductParameters),
}

impl LiquidityPoolParameters {
    /// Constant-product parameters with the assets in protocol order.
    pub fn constant_product(asset_a: Asset, asset_b: Asset) -> Result<Self, TransactionError> {
        if asset_a >= asset_b {
            return Err(TransactionError::ValidationError(
                "Liquidity pool assets must be distinct and in lexicographic order".to_string(),
            ));
        }
        Ok(LiquidityPoolParameters::ConstantProduct(
            LiquidityPoolConstantProductParameters {
                asset_a,
                asset_b,
                fee: LIQUIDITY_POOL_FEE_V18,
            },
        ))
    }

    /// Pool id: SHA-256 of the encoded parameters.
    pub fn pool_id(&self) -> PoolId {
        PoolId(Hash(sha256(&self.to_xdr())))
    }
}

impl WriteXdr for LiquidityPoolParameters {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            LiquidityPoolParameters::ConstantProduct(params) => {
                LiquidityPoolType::ConstantProduct.write_xdr(w);
                params.asset_a.write_xdr(w);
                params.asset_b.write_xdr(w);
                w.write_i32(params.fee);
            }
        }
    }
}

impl ReadXdr for LiquidityPoolParameters {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        match LiquidityPoolType::read_xdr(r)? {
            LiquidityPoolType::ConstantProduct => Ok(LiquidityPoolParameters::ConstantProduct(
                LiquidityPoolConstantProductParameters {
                    asset_a: Asset::read_xdr(r)?,
                    asset_b: Asset::read_xdr(r)?,
                    fee: r.read_i32()?,
                },
            )),
        }
    }
}

/// Liquidity pool id, rendered as an `L...` StrKey.
#[derive(Clone, Copy, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct PoolId(pub Hash);

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&strkey::encode_liquidity_pool(&self.0 .0))
    }
}

impl FromStr for PoolId {
    type Err = StrKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PoolId(Hash(strkey::decode_liquidity_pool(s)?)))
    }
}

impl WriteXdr for PoolId {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.0.write_xdr(w);
    }
}

impl ReadXdr for PoolId {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(PoolId(Hash::read_xdr(r)?))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum ChangeTrustAsset {
    Native,
    CreditAlphanum4(AlphaNum4),
    CreditAlphanum12(AlphaNum12),
    PoolShare(LiquidityPoolParameters),
}

impl From<Asset> for ChangeTrustAsset {
    fn from(value: Asset) -> Self {
        match value {
            Asset::Native => ChangeTrustAsset::Native,
            Asset::CreditAlphanum4(a) => ChangeTrustAsset::CreditAlphanum4(a),
            Asset::CreditAlphanum12(a) => ChangeTrustAsset::CreditAlphanum12(a),
        }
    }
}

impl WriteXdr for ChangeTrustAsset {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            ChangeTrustAsset::Native => AssetType::Native.write_xdr(w),
            ChangeTrustAsset::CreditAlphanum4(a) => {
                AssetType::CreditAlphanum4.write_xdr(w);
                a.write_xdr(w);
            }
            ChangeTrustAsset::CreditAlphanum12(a) => {
                AssetType::CreditAlphanum12.write_xdr(w);
                a.write_xdr(w);
            }
            ChangeTrustAsset::PoolShare(params) => {
                AssetType::PoolShare.write_xdr(w);
                params.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for ChangeTrustAsset {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(match AssetType::read_xdr(r)? {
            AssetType::Native => ChangeTrustAsset::Native,
            AssetType::CreditAlphanum4 => ChangeTrustAsset::CreditAlphanum4(AlphaNum4::read_xdr(r)?),
            AssetType::CreditAlphanum12 => {
                ChangeTrustAsset::CreditAlphanum12(AlphaNum12::read_xdr(r)?)
            }
            AssetType::PoolShare => {
                ChangeTrustAsset::PoolShare(LiquidityPoolParameters::read_xdr(r)?)
            }
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum TrustLineAsset {
    Native,
    CreditAlphanum4(AlphaNum4),
    CreditAlphanum12(AlphaNum12),
    PoolShare(PoolId),
}

impl From<Asset> for TrustLineAsset {
    fn from(value: Asset) -> Self {
        match value {
            Asset::Native => TrustLineAsset::Native,
            Asset::CreditAlphanum4(a) => TrustLineAsset::CreditAlphanum4(a),
            Asset::CreditAlphanum12(a) => TrustLineAsset::CreditAlphanum12(a),
        }
    }
}

impl WriteXdr for TrustLineAsset {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            TrustLineAsset::Native => AssetType::Native.write_xdr(w),
            TrustLineAsset::CreditAlphanum4(a) => {
                AssetType::CreditAlphanum4.write_xdr(w);
                a.write_xdr(w);
            }
            TrustLineAsset::CreditAlphanum12(a) => {
                AssetType::CreditAlphanum12.write_xdr(w);
                a.write_xdr(w);
            }
            TrustLineAsset::PoolShare(id) => {
                AssetType::PoolShare.write_xdr(w);
                id.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for TrustLineAsset {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(match AssetType::read_xdr(r)? {
            AssetType::Native => TrustLineAsset::Native,
            AssetType::CreditAlphanum4 => TrustLineAsset::CreditAlphanum4(AlphaNum4::read_xdr(r)?),
            AssetType::CreditAlphanum12 => {
                TrustLineAsset::CreditAlphanum12(AlphaNum12::read_xdr(r)?)
            }
            AssetType::PoolShare => TrustLineAsset::PoolShare(PoolId::read_xdr(r)?),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct Price {
    pub n: i32,
    pub d: i32,
}

impl Price {
    /// Best `n/d` approximation of a decimal string such as `"1.25"`.
    pub fn from_decimal(value: &str) -> Result<Self, FormatError> {
        price_from_decimal(value)
    }
}

impl WriteXdr for Price {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_i32(self.n);
        w.write_i32(self.d);
    }
}

impl ReadXdr for Price {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(Price {
            n: r.read_i32()?,
            d: r.read_i32()?,
        })
    }
}

/// Claimable balance id, rendered as a `B...` StrKey.
#[derive(Clone, Copy, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum ClaimableBalanceId {
    V0(Hash),
}

impl fmt::Display for ClaimableBalanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimableBalanceId::V0(hash) => {
                f.write_str(&strkey::encode_claimable_balance(&hash.0))
            }
        }
    }
}

impl FromStr for ClaimableBalanceId {
    type Err = StrKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ClaimableBalanceId::V0(Hash(strkey::decode_claimable_balance(s)?)))
    }
}

impl WriteXdr for ClaimableBalanceId {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            ClaimableBalanceId::V0(hash) => {
                ClaimableBalanceIdType::V0.write_xdr(w);
                hash.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for ClaimableBalanceId {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        match ClaimableBalanceIdType::read_xdr(r)? {
            ClaimableBalanceIdType::V0 => Ok(ClaimableBalanceId::V0(Hash::read_xdr(r)?)),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, std::hash::Hash)]
pub enum Memo {
    #[default]
    None,
    Text(StringM<28>),
    Id(u64),
    Hash(Hash),
    Return(Hash),
}

impl Memo {
    pub fn text(value: &str) -> Result<Self, TransactionError> {
        StringM::try_from(value).map(Memo::Text).map_err(|_| {
            TransactionError::ValidationError(format!(
                "Memo text must be at most {STELLAR_MAX_MEMO_TEXT_LEN} bytes, got {}",
                value.len()
            ))
        })
    }

    pub fn memo_type(&self) -> MemoType {
        match self {
            Memo::None => MemoType::None,
            Memo::Text(_) => MemoType::Text,
            Memo::Id(_) => MemoType::Id,
            Memo::Hash(_) => MemoType::Hash,
            Memo::Return(_) => MemoType::Return,
        }
    }
}

impl WriteXdr for Memo {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.memo_type().write_xdr(w);
        match self {
            Memo::None => {}
            Memo::Text(text) => text.write_xdr(w),
            Memo::Id(id) => w.write_u64(*id),
            Memo::Hash(hash) | Memo::Return(hash) => hash.write_xdr(w),
        }
    }
}

impl ReadXdr for Memo {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(match MemoType::read_xdr(r)? {
            MemoType::None => Memo::None,
            MemoType::Text => Memo::Text(StringM::read_xdr(r)?),
            MemoType::Id => Memo::Id(r.read_u64()?),
            MemoType::Hash => Memo::Hash(Hash::read_xdr(r)?),
            MemoType::Return => Memo::Return(Hash::read_xdr(r)?),
        })
    }
}

/// Inclusive unix-time window; a `max_time` of 0 means no upper bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, std::hash::Hash, Serialize, Deserialize)]
pub struct TimeBounds {
    pub min_time: TimePoint,
    pub max_time: TimePoint,
}

impl WriteXdr for TimeBounds {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_u64(self.min_time);
        w.write_u64(self.max_time);
    }
}

impl ReadXdr for TimeBounds {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(TimeBounds {
            min_time: r.read_u64()?,
            max_time: r.read_u64()?,
        })
    }
}

/// Ledger sequence window; a `max_ledger` of 0 means no upper bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, std::hash::Hash, Serialize, Deserialize)]
pub struct LedgerBounds {
    pub min_ledger: u32,
    pub max_ledger: u32,
}

impl WriteXdr for LedgerBounds {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_u32(self.min_ledger);
        w.write_u32(self.max_ledger);
    }
}

impl ReadXdr for LedgerBounds {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(LedgerBounds {
            min_ledger: r.read_u32()?,
            max_ledger: r.read_u32()?,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, std::hash::Hash)]
pub struct PreconditionsV2 {
    pub time_bounds: Option<TimeBounds>,
    pub ledger_bounds: Option<LedgerBounds>,
    pub min_seq_num: Option<i64>,
    pub min_seq_age: Duration,
    pub min_seq_ledger_gap: u32,
    pub extra_signers: VecM<SignerKey, { STELLAR_MAX_EXTRA_SIGNERS as u32 }>,
}

impl WriteXdr for PreconditionsV2 {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.time_bounds.write_xdr(w);
        self.ledger_bounds.write_xdr(w);
        self.min_seq_num.write_xdr(w);
        w.write_u64(self.min_seq_age);
        w.write_u32(self.min_seq_ledger_gap);
        self.extra_signers.write_xdr(w);
    }
}

impl ReadXdr for PreconditionsV2 {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(PreconditionsV2 {
            time_bounds: Option::read_xdr(r)?,
            ledger_bounds: Option::read_xdr(r)?,
            min_seq_num: Option::read_xdr(r)?,
            min_seq_age: r.read_u64()?,
            min_seq_ledger_gap: r.read_u32()?,
            extra_signers: VecM::read_xdr(r)?,
        })
    }
}

/// Wire form of a transaction's preconditions.
#[derive(Clone, Debug, Default, PartialEq, Eq, std::hash::Hash)]
pub enum Preconditions {
    #[default]
    None,
    Time(TimeBounds),
    V2(PreconditionsV2),
}

impl WriteXdr for Preconditions {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            Preconditions::None => PreconditionType::None.write_xdr(w),
            Preconditions::Time(tb) => {
                PreconditionType::Time.write_xdr(w);
                tb.write_xdr(w);
            }
            Preconditions::V2(v2) => {
                PreconditionType::V2.write_xdr(w);
                v2.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for Preconditions {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(match PreconditionType::read_xdr(r)? {
            PreconditionType::None => Preconditions::None,
            PreconditionType::Time => Preconditions::Time(TimeBounds::read_xdr(r)?),
            PreconditionType::V2 => Preconditions::V2(PreconditionsV2::read_xdr(r)?),
        })
    }
}
