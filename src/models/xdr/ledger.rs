//! Ledger keys and the Soroban resource footprint attached to transactions.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use super::{
    xdr_enum_codec, AccountId, ClaimableBalanceId, Hash, PoolId, ReadXdr, ScAddress, ScVal,
    StringM, TrustLineAsset, VecM, WriteXdr, XdrReader, XdrWriter,
};
use crate::{models::CodecError, utils::sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum LedgerEntryType {
    Account = 0,
    Trustline = 1,
    Offer = 2,
    Data = 3,
    ClaimableBalance = 4,
    LiquidityPool = 5,
    ContractData = 6,
    ContractCode = 7,
    ConfigSetting = 8,
    Ttl = 9,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum ContractDataDurability {
    Temporary = 0,
    Persistent = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum ConfigSettingId {
    ContractMaxSizeBytes = 0,
    ContractComputeV0 = 1,
    ContractLedgerCostV0 = 2,
    ContractHistoricalDataV0 = 3,
    ContractEventsV0 = 4,
    ContractBandwidthV0 = 5,
    ContractCostParamsCpuInstructions = 6,
    ContractCostParamsMemoryBytes = 7,
    ContractDataKeySizeBytes = 8,
    ContractDataEntrySizeBytes = 9,
    StateArchival = 10,
    ContractExecutionLanes = 11,
    LiveSorobanStateSizeWindow = 12,
    EvictionIterator = 13,
    ContractParallelComputeV0 = 14,
    ContractLedgerCostExtV0 = 15,
    ScpTiming = 16,
}

xdr_enum_codec!(LedgerEntryType, ContractDataDurability, ConfigSettingId);

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum LedgerKey {
    Account {
        account_id: AccountId,
    },
    Trustline {
        account_id: AccountId,
        asset: TrustLineAsset,
    },
    Offer {
        seller_id: AccountId,
        offer_id: i64,
    },
    Data {
        account_id: AccountId,
        data_name: StringM<64>,
    },
    ClaimableBalance {
        balance_id: ClaimableBalanceId,
    },
    LiquidityPool {
        liquidity_pool_id: PoolId,
    },
    ContractData {
        contract: ScAddress,
        key: ScVal,
        durability: ContractDataDurability,
    },
    ContractCode {
        hash: Hash,
    },
    ConfigSetting {
        config_setting_id: ConfigSettingId,
    },
    Ttl {
        key_hash: Hash,
    },
}

impl LedgerKey {
    pub fn entry_type(&self) -> LedgerEntryType {
        match self {
            LedgerKey::Account { .. } => LedgerEntryType::Account,
            LedgerKey::Trustline { .. } => LedgerEntryType::Trustline,
            LedgerKey::Offer { .. } => LedgerEntryType::Offer,
            LedgerKey::Data { .. } => LedgerEntryType::Data,
            LedgerKey::ClaimableBalance { .. } => LedgerEntryType::ClaimableBalance,
            LedgerKey::LiquidityPool { .. } => LedgerEntryType::LiquidityPool,
            LedgerKey::ContractData { .. } => LedgerEntryType::ContractData,
            LedgerKey::ContractCode { .. } => LedgerEntryType::ContractCode,
            LedgerKey::ConfigSetting { .. } => LedgerEntryType::ConfigSetting,
            LedgerKey::Ttl { .. } => LedgerEntryType::Ttl,
        }
    }

    /// Key of the TTL entry that tracks this contract data or code entry.
    pub fn ttl_key(&self) -> LedgerKey {
        LedgerKey::Ttl {
            key_hash: Hash(sha256(&self.to_xdr())),
        }
    }
}

impl WriteXdr for LedgerKey {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.entry_type().write_xdr(w);
        match self {
            LedgerKey::Account { account_id } => account_id.write_xdr(w),
            LedgerKey::Trustline { account_id, asset } => {
                account_id.write_xdr(w);
                asset.write_xdr(w);
            }
            LedgerKey::Offer {
                seller_id,
                offer_id,
            } => {
                seller_id.write_xdr(w);
                w.write_i64(*offer_id);
            }
            LedgerKey::Data {
                account_id,
                data_name,
            } => {
                account_id.write_xdr(w);
                data_name.write_xdr(w);
            }
            LedgerKey::ClaimableBalance { balance_id } => balance_id.write_xdr(w),
            LedgerKey::LiquidityPool { liquidity_pool_id } => liquidity_pool_id.write_xdr(w),
            LedgerKey::ContractData {
                contract,
                key,
                durability,
            } => {
                contract.write_xdr(w);
                key.write_xdr(w);
                durability.write_xdr(w);
            }
            LedgerKey::ContractCode { hash } => hash.write_xdr(w),
            LedgerKey::ConfigSetting { config_setting_id } => config_setting_id.write_xdr(w),
            LedgerKey::Ttl { key_hash } => key_hash.write_xdr(w),
        }
    }
}

impl ReadXdr for LedgerKey {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(match LedgerEntryType::read_xdr(r)? {
            LedgerEntryType::Account => LedgerKey::Account {
                account_id: AccountId::read_xdr(r)?,
            },
            LedgerEntryType::Trustline => LedgerKey::Trustline {
                account_id: AccountId::read_xdr(r)?,
                asset: TrustLineAsset::read_xdr(r)?,
            },
            LedgerEntryType::Offer => LedgerKey::Offer {
                seller_id: AccountId::read_xdr(r)?,
                offer_id: r.read_i64()?,
            },
            LedgerEntryType::Data => LedgerKey::Data {
                account_id: AccountId::read_xdr(r)?,
                data_name: StringM::read_xdr(r)?,
            },
            LedgerEntryType::ClaimableBalance => LedgerKey::ClaimableBalance {
                balance_id: ClaimableBalanceId::read_xdr(r)?,
            },
            LedgerEntryType::LiquidityPool => LedgerKey::LiquidityPool {
                liquidity_pool_id: PoolId::read_xdr(r)?,
            },
            LedgerEntryType::ContractData => LedgerKey::ContractData {
                contract: ScAddress::read_xdr(r)?,
                key: ScVal::read_xdr(r)?,
                durability: ContractDataDurability::read_xdr(r)?,
            },
            LedgerEntryType::ContractCode => LedgerKey::ContractCode {
                hash: Hash::read_xdr(r)?,
            },
            LedgerEntryType::ConfigSetting => LedgerKey::ConfigSetting {
                config_setting_id: ConfigSettingId::read_xdr(r)?,
            },
            LedgerEntryType::Ttl => LedgerKey::Ttl {
                key_hash: Hash::read_xdr(r)?,
            },
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, std::hash::Hash)]
pub struct LedgerFootprint {
    pub read_only: VecM<LedgerKey>,
    pub read_write: VecM<LedgerKey>,
}

impl WriteXdr for LedgerFootprint {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.read_only.write_xdr(w);
        self.read_write.write_xdr(w);
    }
}

impl ReadXdr for LedgerFootprint {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(LedgerFootprint {
            read_only: VecM::read_xdr(r)?,
            read_write: VecM::read_xdr(r)?,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, std::hash::Hash)]
pub struct SorobanResources {
    pub footprint: LedgerFootprint,
    pub instructions: u32,
    pub disk_read_bytes: u32,
    pub write_bytes: u32,
}

impl WriteXdr for SorobanResources {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.footprint.write_xdr(w);
        w.write_u32(self.instructions);
        w.write_u32(self.disk_read_bytes);
        w.write_u32(self.write_bytes);
    }
}

impl ReadXdr for SorobanResources {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(SorobanResources {
            footprint: LedgerFootprint::read_xdr(r)?,
            instructions: r.read_u32()?,
            disk_read_bytes: r.read_u32()?,
            write_bytes: r.read_u32()?,
        })
    }
}

/// Soroban data extension; V1 lists archived entries to restore automatically.
#[derive(Clone, Debug, Default, PartialEq, Eq, std::hash::Hash)]
pub enum SorobanTransactionDataExt {
    #[default]
    V0,
    V1 {
        archived_soroban_entries: VecM<u32>,
    },
}

impl WriteXdr for SorobanTransactionDataExt {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            SorobanTransactionDataExt::V0 => w.write_i32(0),
            SorobanTransactionDataExt::V1 {
                archived_soroban_entries,
            } => {
                w.write_i32(1);
                archived_soroban_entries.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for SorobanTransactionDataExt {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        match r.read_i32()? {
            0 => Ok(SorobanTransactionDataExt::V0),
            1 => Ok(SorobanTransactionDataExt::V1 {
                archived_soroban_entries: VecM::read_xdr(r)?,
            }),
            other => Err(CodecError::unexpected_arm(
                "SorobanTransactionDataExt",
                other,
            )),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, std::hash::Hash)]
pub struct SorobanTransactionData {
    pub ext: SorobanTransactionDataExt,
    pub resources: SorobanResources,
    pub resource_fee: i64,
}

impl WriteXdr for SorobanTransactionData {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.ext.write_xdr(w);
        self.resources.write_xdr(w);
        w.write_i64(self.resource_fee);
    }
}

impl ReadXdr for SorobanTransactionData {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(SorobanTransactionData {
            ext: SorobanTransactionDataExt::read_xdr(r)?,
            resources: SorobanResources::read_xdr(r)?,
            resource_fee: r.read_i64()?,
        })
    }
}
