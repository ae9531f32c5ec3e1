//! Smart-contract values (`SCVal`) and the types they embed.
//!
//! Maps keep the entry order they were built or decoded with; nothing here
//! sorts keys.

use std::{fmt, str::FromStr};

use num_enum::{IntoPrimitive, TryFromPrimitive};

use super::{
    xdr_enum_codec, AccountId, BytesM, ClaimableBalanceId, Hash, PoolId, ReadXdr, StringM,
    Uint256, VecM, WriteXdr, XdrReader, XdrWriter,
};
use crate::models::{
    address::strkey::{self, VersionByte},
    CodecError, StrKeyError, TransactionError,
};

pub const SC_SYMBOL_LIMIT: u32 = 32;

pub type ScSymbol = StringM<SC_SYMBOL_LIMIT>;
pub type ScString = StringM;
pub type ScBytes = BytesM;
pub type ScVec = VecM<ScVal>;
pub type ScMap = VecM<ScMapEntry>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum ScValType {
    Bool = 0,
    Void = 1,
    Error = 2,
    U32 = 3,
    I32 = 4,
    U64 = 5,
    I64 = 6,
    Timepoint = 7,
    Duration = 8,
    U128 = 9,
    I128 = 10,
    U256 = 11,
    I256 = 12,
    Bytes = 13,
    String = 14,
    Symbol = 15,
    Vec = 16,
    Map = 17,
    Address = 18,
    ContractInstance = 19,
    LedgerKeyContractInstance = 20,
    LedgerKeyNonce = 21,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum ScErrorType {
    Contract = 0,
    WasmVm = 1,
    Context = 2,
    Storage = 3,
    Object = 4,
    Crypto = 5,
    Events = 6,
    Budget = 7,
    Value = 8,
    Auth = 9,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum ScErrorCode {
    ArithDomain = 0,
    IndexBounds = 1,
    InvalidInput = 2,
    MissingValue = 3,
    ExistingValue = 4,
    ExceededLimit = 5,
    InvalidAction = 6,
    InternalError = 7,
    UnexpectedType = 8,
    UnexpectedSize = 9,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum ScAddressType {
    Account = 0,
    Contract = 1,
    MuxedAccount = 2,
    ClaimableBalance = 3,
    LiquidityPool = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum ContractExecutableType {
    Wasm = 0,
    StellarAsset = 1,
}

xdr_enum_codec!(
    ScValType,
    ScErrorType,
    ScErrorCode,
    ScAddressType,
    ContractExecutableType,
);

/// Host error: a contract-defined code, or a category plus a generic code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum ScError {
    Contract(u32),
    WasmVm(ScErrorCode),
    Context(ScErrorCode),
    Storage(ScErrorCode),
    Object(ScErrorCode),
    Crypto(ScErrorCode),
    Events(ScErrorCode),
    Budget(ScErrorCode),
    Value(ScErrorCode),
    Auth(ScErrorCode),
}

impl ScError {
    pub fn error_type(&self) -> ScErrorType {
        match self {
            ScError::Contract(_) => ScErrorType::Contract,
            ScError::WasmVm(_) => ScErrorType::WasmVm,
            ScError::Context(_) => ScErrorType::Context,
            ScError::Storage(_) => ScErrorType::Storage,
            ScError::Object(_) => ScErrorType::Object,
            ScError::Crypto(_) => ScErrorType::Crypto,
            ScError::Events(_) => ScErrorType::Events,
            ScError::Budget(_) => ScErrorType::Budget,
            ScError::Value(_) => ScErrorType::Value,
            ScError::Auth(_) => ScErrorType::Auth,
        }
    }
}

impl WriteXdr for ScError {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.error_type().write_xdr(w);
        match self {
            ScError::Contract(code) => w.write_u32(*code),
            ScError::WasmVm(code)
            | ScError::Context(code)
            | ScError::Storage(code)
            | ScError::Object(code)
            | ScError::Crypto(code)
            | ScError::Events(code)
            | ScError::Budget(code)
            | ScError::Value(code)
            | ScError::Auth(code) => code.write_xdr(w),
        }
    }
}

impl ReadXdr for ScError {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(match ScErrorType::read_xdr(r)? {
            ScErrorType::Contract => ScError::Contract(r.read_u32()?),
            ScErrorType::WasmVm => ScError::WasmVm(ScErrorCode::read_xdr(r)?),
            ScErrorType::Context => ScError::Context(ScErrorCode::read_xdr(r)?),
            ScErrorType::Storage => ScError::Storage(ScErrorCode::read_xdr(r)?),
            ScErrorType::Object => ScError::Object(ScErrorCode::read_xdr(r)?),
            ScErrorType::Crypto => ScError::Crypto(ScErrorCode::read_xdr(r)?),
            ScErrorType::Events => ScError::Events(ScErrorCode::read_xdr(r)?),
            ScErrorType::Budget => ScError::Budget(ScErrorCode::read_xdr(r)?),
            ScErrorType::Value => ScError::Value(ScErrorCode::read_xdr(r)?),
            ScErrorType::Auth => ScError::Auth(ScErrorCode::read_xdr(r)?),
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, std::hash::Hash)]
pub struct UInt128Parts {
    pub hi: u64,
    pub lo: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, std::hash::Hash)]
pub struct Int128Parts {
    pub hi: i64,
    pub lo: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, std::hash::Hash)]
pub struct UInt256Parts {
    pub hi_hi: u64,
    pub hi_lo: u64,
    pub lo_hi: u64,
    pub lo_lo: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, std::hash::Hash)]
pub struct Int256Parts {
    pub hi_hi: i64,
    pub hi_lo: u64,
    pub lo_hi: u64,
    pub lo_lo: u64,
}

impl From<u128> for UInt128Parts {
    fn from(value: u128) -> Self {
        UInt128Parts {
            hi: (value >> 64) as u64,
            lo: value as u64,
        }
    }
}

impl From<UInt128Parts> for u128 {
    fn from(value: UInt128Parts) -> Self {
        ((value.hi as u128) << 64) | value.lo as u128
    }
}

impl From<i128> for Int128Parts {
    fn from(value: i128) -> Self {
        Int128Parts {
            hi: (value >> 64) as i64,
            lo: value as u64,
        }
    }
}

impl From<Int128Parts> for i128 {
    fn from(value: Int128Parts) -> Self {
        ((value.hi as i128) << 64) | value.lo as i128
    }
}

impl WriteXdr for UInt128Parts {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_u64(self.hi);
        w.write_u64(self.lo);
    }
}

impl ReadXdr for UInt128Parts {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(UInt128Parts {
            hi: r.read_u64()?,
            lo: r.read_u64()?,
        })
    }
}

impl WriteXdr for Int128Parts {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_i64(self.hi);
        w.write_u64(self.lo);
    }
}

impl ReadXdr for Int128Parts {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(Int128Parts {
            hi: r.read_i64()?,
            lo: r.read_u64()?,
        })
    }
}

impl WriteXdr for UInt256Parts {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_u64(self.hi_hi);
        w.write_u64(self.hi_lo);
        w.write_u64(self.lo_hi);
        w.write_u64(self.lo_lo);
    }
}

impl ReadXdr for UInt256Parts {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(UInt256Parts {
            hi_hi: r.read_u64()?,
            hi_lo: r.read_u64()?,
            lo_hi: r.read_u64()?,
            lo_lo: r.read_u64()?,
        })
    }
}

impl WriteXdr for Int256Parts {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_i64(self.hi_hi);
        w.write_u64(self.hi_lo);
        w.write_u64(self.lo_hi);
        w.write_u64(self.lo_lo);
    }
}

impl ReadXdr for Int256Parts {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(Int256Parts {
            hi_hi: r.read_i64()?,
            hi_lo: r.read_u64()?,
            lo_hi: r.read_u64()?,
            lo_lo: r.read_u64()?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct MuxedEd25519Account {
    pub id: u64,
    pub ed25519: Uint256,
}

/// Contract-visible address. Only the wire form is stored; the StrKey text is
/// produced and parsed on demand through `Display` and `FromStr`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum ScAddress {
    Account(AccountId),
    Contract(Hash),
    MuxedAccount(MuxedEd25519Account),
    ClaimableBalance(ClaimableBalanceId),
    LiquidityPool(PoolId),
}

impl ScAddress {
    pub fn address_type(&self) -> ScAddressType {
        match self {
            ScAddress::Account(_) => ScAddressType::Account,
            ScAddress::Contract(_) => ScAddressType::Contract,
            ScAddress::MuxedAccount(_) => ScAddressType::MuxedAccount,
            ScAddress::ClaimableBalance(_) => ScAddressType::ClaimableBalance,
            ScAddress::LiquidityPool(_) => ScAddressType::LiquidityPool,
        }
    }
}

impl fmt::Display for ScAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScAddress::Account(account) => write!(f, "{account}"),
            ScAddress::Contract(hash) => f.write_str(&strkey::encode_contract(&hash.0)),
            ScAddress::MuxedAccount(muxed) => {
                f.write_str(&strkey::encode_muxed_account(&muxed.ed25519, muxed.id))
            }
            ScAddress::ClaimableBalance(id) => write!(f, "{id}"),
            ScAddress::LiquidityPool(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for ScAddress {
    type Err = StrKeyError;

    /// Accepts `G...`, `C...`, `M...`, `B...` and `L...` addresses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (version, _) = strkey::decode(s)?;
        match version {
            VersionByte::AccountId => Ok(ScAddress::Account(s.parse()?)),
            VersionByte::Contract => Ok(ScAddress::Contract(Hash(strkey::decode_contract(s)?))),
            VersionByte::MuxedAccount => {
                let (ed25519, id) = strkey::decode_muxed_account(s)?;
                Ok(ScAddress::MuxedAccount(MuxedEd25519Account { id, ed25519 }))
            }
            VersionByte::ClaimableBalance => Ok(ScAddress::ClaimableBalance(s.parse()?)),
            VersionByte::LiquidityPool => Ok(ScAddress::LiquidityPool(s.parse()?)),
            other => Err(StrKeyError::UnexpectedVersionByte {
                expected: VersionByte::Contract as u8,
                actual: other as u8,
            }),
        }
    }
}

impl From<AccountId> for ScAddress {
    fn from(value: AccountId) -> Self {
        ScAddress::Account(value)
    }
}

impl WriteXdr for ScAddress {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.address_type().write_xdr(w);
        match self {
            ScAddress::Account(account) => account.write_xdr(w),
            ScAddress::Contract(hash) => hash.write_xdr(w),
            ScAddress::MuxedAccount(muxed) => {
                w.write_u64(muxed.id);
                w.write_fixed_opaque(&muxed.ed25519);
            }
            ScAddress::ClaimableBalance(id) => id.write_xdr(w),
            ScAddress::LiquidityPool(id) => id.write_xdr(w),
        }
    }
}

impl ReadXdr for ScAddress {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(match ScAddressType::read_xdr(r)? {
            ScAddressType::Account => ScAddress::Account(AccountId::read_xdr(r)?),
            ScAddressType::Contract => ScAddress::Contract(Hash::read_xdr(r)?),
            ScAddressType::MuxedAccount => {
                let id = r.read_u64()?;
                let ed25519 = r.read_fixed_opaque()?;
                ScAddress::MuxedAccount(MuxedEd25519Account { id, ed25519 })
            }
            ScAddressType::ClaimableBalance => {
                ScAddress::ClaimableBalance(ClaimableBalanceId::read_xdr(r)?)
            }
            ScAddressType::LiquidityPool => ScAddress::LiquidityPool(PoolId::read_xdr(r)?),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum ContractExecutable {
    Wasm(Hash),
    StellarAsset,
}

impl WriteXdr for ContractExecutable {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            ContractExecutable::Wasm(hash) => {
                ContractExecutableType::Wasm.write_xdr(w);
                hash.write_xdr(w);
            }
            ContractExecutable::StellarAsset => ContractExecutableType::StellarAsset.write_xdr(w),
        }
    }
}

impl ReadXdr for ContractExecutable {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(match ContractExecutableType::read_xdr(r)? {
            ContractExecutableType::Wasm => ContractExecutable::Wasm(Hash::read_xdr(r)?),
            ContractExecutableType::StellarAsset => ContractExecutable::StellarAsset,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct ScContractInstance {
    pub executable: ContractExecutable,
    pub storage: Option<ScMap>,
}

impl WriteXdr for ScContractInstance {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.executable.write_xdr(w);
        self.storage.write_xdr(w);
    }
}

impl ReadXdr for ScContractInstance {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(ScContractInstance {
            executable: ContractExecutable::read_xdr(r)?,
            storage: Option::read_xdr(r)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct ScMapEntry {
    pub key: ScVal,
    pub val: ScVal,
}

impl WriteXdr for ScMapEntry {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.key.write_xdr(w);
        self.val.write_xdr(w);
    }
}

impl ReadXdr for ScMapEntry {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(ScMapEntry {
            key: ScVal::read_xdr(r)?,
            val: ScVal::read_xdr(r)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum ScVal {
    Bool(bool),
    Void,
    Error(ScError),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    Timepoint(u64),
    Duration(u64),
    U128(UInt128Parts),
    I128(Int128Parts),
    U256(UInt256Parts),
    I256(Int256Parts),
    Bytes(ScBytes),
    String(ScString),
    Symbol(ScSymbol),
    Vec(Option<ScVec>),
    Map(Option<ScMap>),
    Address(ScAddress),
    ContractInstance(ScContractInstance),
    LedgerKeyContractInstance,
    LedgerKeyNonce(i64),
}

impl ScVal {
    pub fn val_type(&self) -> ScValType {
        match self {
            ScVal::Bool(_) => ScValType::Bool,
            ScVal::Void => ScValType::Void,
            ScVal::Error(_) => ScValType::Error,
            ScVal::U32(_) => ScValType::U32,
            ScVal::I32(_) => ScValType::I32,
            ScVal::U64(_) => ScValType::U64,
            ScVal::I64(_) => ScValType::I64,
            ScVal::Timepoint(_) => ScValType::Timepoint,
            ScVal::Duration(_) => ScValType::Duration,
            ScVal::U128(_) => ScValType::U128,
            ScVal::I128(_) => ScValType::I128,
            ScVal::U256(_) => ScValType::U256,
            ScVal::I256(_) => ScValType::I256,
            ScVal::Bytes(_) => ScValType::Bytes,
            ScVal::String(_) => ScValType::String,
            ScVal::Symbol(_) => ScValType::Symbol,
            ScVal::Vec(_) => ScValType::Vec,
            ScVal::Map(_) => ScValType::Map,
            ScVal::Address(_) => ScValType::Address,
            ScVal::ContractInstance(_) => ScValType::ContractInstance,
            ScVal::LedgerKeyContractInstance => ScValType::LedgerKeyContractInstance,
            ScVal::LedgerKeyNonce(_) => ScValType::LedgerKeyNonce,
        }
    }

    /// Symbol made of `[a-zA-Z0-9_]`, at most 32 characters.
    pub fn symbol(value: &str) -> Result<Self, TransactionError> {
        if !value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            return Err(TransactionError::ValidationError(format!(
                "Invalid symbol '{value}'"
            )));
        }
        Ok(ScVal::Symbol(StringM::try_from(value)?))
    }

    pub fn string(value: &str) -> Result<Self, CodecError> {
        Ok(ScVal::String(StringM::try_from(value)?))
    }

    pub fn bytes(value: &[u8]) -> Result<Self, CodecError> {
        Ok(ScVal::Bytes(BytesM::try_from(value)?))
    }

    pub fn vec(items: Vec<ScVal>) -> Result<Self, CodecError> {
        Ok(ScVal::Vec(Some(items.try_into()?)))
    }

    pub fn u128(value: u128) -> Self {
        ScVal::U128(value.into())
    }

    pub fn i128(value: i128) -> Self {
        ScVal::I128(value.into())
    }

    /// Map with entries kept in the given order.
    pub fn map(entries: Vec<(ScVal, ScVal)>) -> Result<Self, CodecError> {
        let entries: Vec<ScMapEntry> = entries
            .into_iter()
            .map(|(key, val)| ScMapEntry { key, val })
            .collect();
        Ok(ScVal::Map(Some(entries.try_into()?)))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScVal::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            ScVal::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            ScVal::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ScVal::U64(v) | ScVal::Timepoint(v) | ScVal::Duration(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ScVal::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u128(&self) -> Option<u128> {
        match self {
            ScVal::U128(parts) => Some((*parts).into()),
            _ => None,
        }
    }

    pub fn as_i128(&self) -> Option<i128> {
        match self {
            ScVal::I128(parts) => Some((*parts).into()),
            _ => None,
        }
    }

    /// Text of a string or symbol value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScVal::String(s) => Some(s.as_str()),
            ScVal::Symbol(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ScVal::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    pub fn as_vec(&self) -> Option<&[ScVal]> {
        match self {
            ScVal::Vec(Some(items)) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[ScMapEntry]> {
        match self {
            ScVal::Map(Some(entries)) => Some(entries.as_slice()),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<&ScAddress> {
        match self {
            ScVal::Address(address) => Some(address),
            _ => None,
        }
    }
}

impl From<bool> for ScVal {
    fn from(value: bool) -> Self {
        ScVal::Bool(value)
    }
}

impl From<u32> for ScVal {
    fn from(value: u32) -> Self {
        ScVal::U32(value)
    }
}

impl From<i32> for ScVal {
    fn from(value: i32) -> Self {
        ScVal::I32(value)
    }
}

impl From<u64> for ScVal {
    fn from(value: u64) -> Self {
        ScVal::U64(value)
    }
}

impl From<i64> for ScVal {
    fn from(value: i64) -> Self {
        ScVal::I64(value)
    }
}

impl From<u128> for ScVal {
    fn from(value: u128) -> Self {
        ScVal::U128(value.into())
    }
}

impl From<i128> for ScVal {
    fn from(value: i128) -> Self {
        ScVal::I128(value.into())
    }
}

impl From<ScAddress> for ScVal {
    fn from(value: ScAddress) -> Self {
        ScVal::Address(value)
    }
}

impl From<ScError> for ScVal {
    fn from(value: ScError) -> Self {
        ScVal::Error(value)
    }
}

impl WriteXdr for ScVal {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.val_type().write_xdr(w);
        match self {
            ScVal::Bool(b) => w.write_bool(*b),
            ScVal::Void | ScVal::LedgerKeyContractInstance => {}
            ScVal::Error(e) => e.write_xdr(w),
            ScVal::U32(v) => w.write_u32(*v),
            ScVal::I32(v) => w.write_i32(*v),
            ScVal::U64(v) | ScVal::Timepoint(v) | ScVal::Duration(v) => w.write_u64(*v),
            ScVal::I64(v) | ScVal::LedgerKeyNonce(v) => w.write_i64(*v),
            ScVal::U128(parts) => parts.write_xdr(w),
            ScVal::I128(parts) => parts.write_xdr(w),
            ScVal::U256(parts) => parts.write_xdr(w),
            ScVal::I256(parts) => parts.write_xdr(w),
            ScVal::Bytes(bytes) => bytes.write_xdr(w),
            ScVal::String(s) => s.write_xdr(w),
            ScVal::Symbol(s) => s.write_xdr(w),
            ScVal::Vec(items) => items.write_xdr(w),
            ScVal::Map(entries) => entries.write_xdr(w),
            ScVal::Address(address) => address.write_xdr(w),
            ScVal::ContractInstance(instance) => instance.write_xdr(w),
        }
    }
}

impl ReadXdr for ScVal {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        r.nested(|r| {
            Ok(match ScValType::read_xdr(r)? {
                ScValType::Bool => ScVal::Bool(r.read_bool()?),
                ScValType::Void => ScVal::Void,
                ScValType::Error => ScVal::Error(ScError::read_xdr(r)?),
                ScValType::U32 => ScVal::U32(r.read_u32()?),
                ScValType::I32 => ScVal::I32(r.read_i32()?),
                ScValType::U64 => ScVal::U64(r.read_u64()?),
                ScValType::I64 => ScVal::I64(r.read_i64()?),
                ScValType::Timepoint => ScVal::Timepoint(r.read_u64()?),
                ScValType::Duration => ScVal::Duration(r.read_u64()?),
                ScValType::U128 => ScVal::U128(UInt128Parts::read_xdr(r)?),
                ScValType::I128 => ScVal::I128(Int128Parts::read_xdr(r)?),
                ScValType::U256 => ScVal::U256(UInt256Parts::read_xdr(r)?),
                ScValType::I256 => ScVal::I256(Int256Parts::read_xdr(r)?),
                ScValType::Bytes => ScVal::Bytes(BytesM::read_xdr(r)?),
                ScValType::String => ScVal::String(StringM::read_xdr(r)?),
                ScValType::Symbol => ScVal::Symbol(StringM::read_xdr(r)?),
                ScValType::Vec => ScVal::Vec(Option::read_xdr(r)?),
                ScValType::Map => ScVal::Map(Option::read_xdr(r)?),
                ScValType::Address => ScVal::Address(ScAddress::read_xdr(r)?),
                ScValType::ContractInstance => {
                    ScVal::ContractInstance(ScContractInstance::read_xdr(r)?)
                }
                ScValType::LedgerKeyContractInstance => ScVal::LedgerKeyContractInstance,
                ScValType::LedgerKeyNonce => ScVal::LedgerKeyNonce(r.read_i64()?),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::xdr::{Limits, DEFAULT_DEPTH_LIMIT};
    use proptest::prelude::*;

    const CONTRACT: &str = "CA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJUWDA";

    #[test]
    fn test_simple_values_encode_exactly() {
        assert_eq!(ScVal::Bool(true).to_xdr(), vec![0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(ScVal::Void.to_xdr(), vec![0, 0, 0, 1]);
        assert_eq!(
            ScVal::U32(7).to_xdr(),
            vec![0, 0, 0, 3, 0, 0, 0, 7]
        );
        assert_eq!(
            ScVal::symbol("hello").unwrap().to_xdr(),
            vec![0, 0, 0, 15, 0, 0, 0, 5, b'h', b'e', b'l', b'l', b'o', 0, 0, 0]
        );
        assert_eq!(
            ScVal::Vec(None).to_xdr(),
            vec![0, 0, 0, 16, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_error_variants_round_trip() {
        let errors = [
            ScError::Contract(42),
            ScError::WasmVm(ScErrorCode::InvalidAction),
            ScError::Context(ScErrorCode::InternalError),
            ScError::Storage(ScErrorCode::MissingValue),
            ScError::Object(ScErrorCode::UnexpectedType),
            ScError::Crypto(ScErrorCode::InvalidInput),
            ScError::Events(ScErrorCode::ExceededLimit),
            ScError::Budget(ScErrorCode::ExceededLimit),
            ScError::Value(ScErrorCode::UnexpectedSize),
            ScError::Auth(ScErrorCode::InvalidAction),
        ];
        for err in errors {
            let val = ScVal::from(err);
            assert_eq!(ScVal::from_xdr(&val.to_xdr()).unwrap(), val);
        }
    }

    #[test]
    fn test_unknown_error_code_is_rejected() {
        let mut bytes = i32::from(ScValType::Error).to_be_bytes().to_vec();
        bytes.extend_from_slice(&1i32.to_be_bytes());
        bytes.extend_from_slice(&10i32.to_be_bytes());
        assert!(matches!(
            ScVal::from_xdr(&bytes),
            Err(CodecError::UnknownDiscriminant { value: 10, .. })
        ));
    }

    #[test]
    fn test_unknown_scval_type_is_rejected() {
        assert!(matches!(
            ScVal::from_xdr(&22i32.to_be_bytes()),
            Err(CodecError::UnknownDiscriminant {
                type_name: "ScValType",
                value: 22
            })
        ));
    }

    #[test]
    fn test_big_integer_parts() {
        for v in [0i128, -1, i128::MIN, i128::MAX, 1 << 64, -(1 << 64) + 5] {
            let val = ScVal::from(v);
            assert_eq!(val.as_i128(), Some(v));
            assert_eq!(ScVal::from_xdr(&val.to_xdr()).unwrap().as_i128(), Some(v));
        }
        let val = ScVal::from(u128::MAX);
        assert_eq!(
            val,
            ScVal::U128(UInt128Parts {
                hi: u64::MAX,
                lo: u64::MAX
            })
        );
        assert_eq!(val.as_u128(), Some(u128::MAX));
        assert_eq!(ScVal::u128(u128::MAX), val);
        assert_eq!(ScVal::i128(-7).as_i128(), Some(-7));
    }

    #[test]
    fn test_map_preserves_insertion_order() {
        let map = ScVal::map(vec![
            (ScVal::symbol("zeta").unwrap(), ScVal::U32(1)),
            (ScVal::symbol("alpha").unwrap(), ScVal::U32(2)),
        ])
        .unwrap();
        let decoded = ScVal::from_xdr(&map.to_xdr()).unwrap();
        let keys: Vec<&str> = decoded
            .as_map()
            .unwrap()
            .iter()
            .map(|e| e.key.as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_address_text_is_derived_from_wire_form() {
        let address: ScAddress = CONTRACT.parse().unwrap();
        assert!(matches!(address, ScAddress::Contract(_)));
        assert_eq!(address.to_string(), CONTRACT);

        let val = ScVal::from(address);
        let decoded = ScVal::from_xdr(&val.to_xdr()).unwrap();
        assert_eq!(decoded.as_address().unwrap().to_string(), CONTRACT);

        for text in [
            "GA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVSGZ",
            "MA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJUAAAAAAAAAAAACJUQ",
            "BAAD6DBUX6J22DMZOHIEZTEQ64CVCHEDRKWZONFEUL5Q26QD7R76RGR4TU",
            "LA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJUPJN",
        ] {
            let address: ScAddress = text.parse().unwrap();
            assert_eq!(address.to_string(), text);
            assert_eq!(ScAddress::from_xdr(&address.to_xdr()).unwrap(), address);
        }

        assert!("SAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABSU2"
            .parse::<ScAddress>()
            .is_err());
    }

    #[test]
    fn test_symbol_validation() {
        assert!(ScVal::symbol("transfer_from").is_ok());
        assert!(ScVal::symbol("has space").is_err());
        assert!(ScVal::symbol(&"a".repeat(33)).is_err());
    }

    #[test]
    fn test_deep_nesting_hits_depth_limit() {
        let mut val = ScVal::Void;
        for _ in 0..20 {
            val = ScVal::vec(vec![val]).unwrap();
        }
        let bytes = val.to_xdr();
        assert!(ScVal::from_xdr(&bytes).is_ok());
        assert_eq!(
            ScVal::from_xdr_with_limits(&bytes, Limits::depth(10)),
            Err(CodecError::DepthLimitExceeded)
        );
    }

    /// `wrappers` single-element vectors around a void, encoded without
    /// recursion.
    fn nested_vec_bytes(wrappers: usize) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(wrappers * 12 + 4);
        for _ in 0..wrappers {
            bytes.extend_from_slice(&16u32.to_be_bytes()); // SCV_VEC
            bytes.extend_from_slice(&1u32.to_be_bytes()); // present
            bytes.extend_from_slice(&1u32.to_be_bytes()); // one element
        }
        bytes.extend_from_slice(&1u32.to_be_bytes()); // SCV_VOID
        bytes
    }

    #[test]
    fn test_default_depth_limit_decodes_on_test_thread() {
        // wrappers + 1 levels: the deepest value the default limit accepts
        let deepest = nested_vec_bytes(DEFAULT_DEPTH_LIMIT as usize - 1);
        let mut val = ScVal::from_xdr(&deepest).unwrap();
        let mut depth = 1;
        while let Some(items) = val.as_vec() {
            val = items[0].clone();
            depth += 1;
        }
        assert_eq!(val, ScVal::Void);
        assert_eq!(depth, DEFAULT_DEPTH_LIMIT);

        assert_eq!(
            ScVal::from_xdr(&nested_vec_bytes(DEFAULT_DEPTH_LIMIT as usize)),
            Err(CodecError::DepthLimitExceeded)
        );
    }

    #[test]
    fn test_contract_instance_round_trip() {
        let val = ScVal::ContractInstance(ScContractInstance {
            executable: ContractExecutable::Wasm(Hash([8u8; 32])),
            storage: Some(
                vec![ScMapEntry {
                    key: ScVal::LedgerKeyNonce(5),
                    val: ScVal::Duration(60),
                }]
                .try_into()
                .unwrap(),
            ),
        });
        assert_eq!(ScVal::from_xdr(&val.to_xdr()).unwrap(), val);
    }

    fn arb_leaf() -> impl Strategy<Value = ScVal> {
        prop_oneof![
            any::<bool>().prop_map(ScVal::Bool),
            Just(ScVal::Void),
            any::<u32>().prop_map(ScVal::U32),
            any::<i32>().prop_map(ScVal::I32),
            any::<u64>().prop_map(ScVal::U64),
            any::<i64>().prop_map(ScVal::I64),
            any::<u64>().prop_map(ScVal::Timepoint),
            any::<u64>().prop_map(ScVal::Duration),
            any::<u128>().prop_map(ScVal::from),
            any::<i128>().prop_map(ScVal::from),
            any::<(u64, u64, u64, u64)>().prop_map(|(a, b, c, d)| ScVal::U256(UInt256Parts {
                hi_hi: a,
                hi_lo: b,
                lo_hi: c,
                lo_lo: d
            })),
            any::<(i64, u64, u64, u64)>().prop_map(|(a, b, c, d)| ScVal::I256(Int256Parts {
                hi_hi: a,
                hi_lo: b,
                lo_hi: c,
                lo_lo: d
            })),
            proptest::collection::vec(any::<u8>(), 0..40)
                .prop_map(|b| ScVal::Bytes(b.try_into().unwrap())),
            "[a-zA-Z0-9 ]{0,40}".prop_map(|s| ScVal::string(&s).unwrap()),
            "[a-zA-Z0-9_]{0,32}".prop_map(|s| ScVal::symbol(&s).unwrap()),
            any::<[u8; 32]>().prop_map(|h| ScVal::Address(ScAddress::Contract(Hash(h)))),
            any::<[u8; 32]>().prop_map(|k| ScVal::Address(ScAddress::Account(AccountId(k)))),
            (any::<u64>(), any::<[u8; 32]>()).prop_map(|(id, ed25519)| ScVal::Address(
                ScAddress::MuxedAccount(MuxedEd25519Account { id, ed25519 })
            )),
            Just(ScVal::LedgerKeyContractInstance),
            any::<i64>().prop_map(ScVal::LedgerKeyNonce),
            any::<u32>().prop_map(|c| ScVal::Error(ScError::Contract(c))),
        ]
    }

    fn arb_scval() -> impl Strategy<Value = ScVal> {
        arb_leaf().prop_recursive(4, 64, 6, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..6)
                    .prop_map(|items| ScVal::vec(items).unwrap()),
                proptest::collection::vec((inner.clone(), inner), 0..4)
                    .prop_map(|entries| ScVal::map(entries).unwrap()),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_scval_round_trip(val in arb_scval()) {
            let bytes = val.to_xdr();
            prop_assert_eq!(bytes.len() % 4, 0);
            prop_assert_eq!(ScVal::from_xdr(&bytes).unwrap(), val);
        }
    }
}
