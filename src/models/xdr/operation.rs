//! Operations (classic and Soroban) and the structures they carry.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use super::{
    xdr_enum_codec, xdr_struct_codec, AccountId, Asset, AssetCode, BytesM, ChangeTrustAsset,
    ClaimableBalanceId, ContractExecutable, ExtensionPoint, LedgerKey, MuxedAccount, PoolId,
    Price, ReadXdr, ScAddress, ScSymbol, ScVal, Signer, SignerKey, StringM, Uint256, VecM,
    WriteXdr, XdrReader, XdrWriter,
};
use crate::models::{CodecError, TransactionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum OperationType {
    CreateAccount = 0,
    Payment = 1,
    PathPaymentStrictReceive = 2,
    ManageSellOffer = 3,
    CreatePassiveSellOffer = 4,
    SetOptions = 5,
    ChangeTrust = 6,
    AllowTrust = 7,
    AccountMerge = 8,
    Inflation = 9,
    ManageData = 10,
    BumpSequence = 11,
    ManageBuyOffer = 12,
    PathPaymentStrictSend = 13,
    CreateClaimableBalance = 14,
    ClaimClaimableBalance = 15,
    BeginSponsoringFutureReserves = 16,
    EndSponsoringFutureReserves = 17,
    RevokeSponsorship = 18,
    Clawback = 19,
    ClawbackClaimableBalance = 20,
    SetTrustLineFlags = 21,
    LiquidityPoolDeposit = 22,
    LiquidityPoolWithdraw = 23,
    InvokeHostFunction = 24,
    ExtendFootprintTtl = 25,
    RestoreFootprint = 26,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum ClaimPredicateType {
    Unconditional = 0,
    And = 1,
    Or = 2,
    Not = 3,
    BeforeAbsoluteTime = 4,
    BeforeRelativeTime = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum HostFunctionType {
    InvokeContract = 0,
    CreateContract = 1,
    UploadContractWasm = 2,
    CreateContractV2 = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum ContractIdPreimageType {
    FromAddress = 0,
    FromAsset = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum SorobanCredentialsType {
    SourceAccount = 0,
    Address = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum SorobanAuthorizedFunctionType {
    ContractFn = 0,
    CreateContractHostFn = 1,
    CreateContractV2HostFn = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum RevokeSponsorshipType {
    LedgerEntry = 0,
    Signer = 1,
}

xdr_enum_codec!(
    OperationType,
    ClaimPredicateType,
    HostFunctionType,
    ContractIdPreimageType,
    SorobanCredentialsType,
    SorobanAuthorizedFunctionType,
    RevokeSponsorshipType,
);

/// Condition under which a claimant may claim a balance.
#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum ClaimPredicate {
    Unconditional,
    And(VecM<ClaimPredicate, 2>),
    Or(VecM<ClaimPredicate, 2>),
    Not(Option<Box<ClaimPredicate>>),
    BeforeAbsoluteTime(i64),
    BeforeRelativeTime(i64),
}

impl ClaimPredicate {
    pub fn predicate_type(&self) -> ClaimPredicateType {
        match self {
            ClaimPredicate::Unconditional => ClaimPredicateType::Unconditional,
            ClaimPredicate::And(_) => ClaimPredicateType::And,
            ClaimPredicate::Or(_) => ClaimPredicateType::Or,
            ClaimPredicate::Not(_) => ClaimPredicateType::Not,
            ClaimPredicate::BeforeAbsoluteTime(_) => ClaimPredicateType::BeforeAbsoluteTime,
            ClaimPredicate::BeforeRelativeTime(_) => ClaimPredicateType::BeforeRelativeTime,
        }
    }

    pub fn and(left: ClaimPredicate, right: ClaimPredicate) -> Result<Self, CodecError> {
        Ok(ClaimPredicate::And(vec![left, right].try_into()?))
    }

    pub fn or(left: ClaimPredicate, right: ClaimPredicate) -> Result<Self, CodecError> {
        Ok(ClaimPredicate::Or(vec![left, right].try_into()?))
    }

    pub fn not(predicate: ClaimPredicate) -> Self {
        ClaimPredicate::Not(Some(Box::new(predicate)))
    }
}

impl WriteXdr for ClaimPredicate {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.predicate_type().write_xdr(w);
        match self {
            ClaimPredicate::Unconditional => {}
            ClaimPredicate::And(items) | ClaimPredicate::Or(items) => items.write_xdr(w),
            ClaimPredicate::Not(inner) => inner.write_xdr(w),
            ClaimPredicate::BeforeAbsoluteTime(t) | ClaimPredicate::BeforeRelativeTime(t) => {
                w.write_i64(*t)
            }
        }
    }
}

impl ReadXdr for ClaimPredicate {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        r.nested(|r| {
            Ok(match ClaimPredicateType::read_xdr(r)? {
                ClaimPredicateType::Unconditional => ClaimPredicate::Unconditional,
                ClaimPredicateType::And => ClaimPredicate::And(VecM::read_xdr(r)?),
                ClaimPredicateType::Or => ClaimPredicate::Or(VecM::read_xdr(r)?),
                ClaimPredicateType::Not => ClaimPredicate::Not(Option::read_xdr(r)?),
                ClaimPredicateType::BeforeAbsoluteTime => {
                    ClaimPredicate::BeforeAbsoluteTime(r.read_i64()?)
                }
                ClaimPredicateType::BeforeRelativeTime => {
                    ClaimPredicate::BeforeRelativeTime(r.read_i64()?)
                }
            })
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum Claimant {
    V0 {
        destination: AccountId,
        predicate: ClaimPredicate,
    },
}

impl WriteXdr for Claimant {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            Claimant::V0 {
                destination,
                predicate,
            } => {
                w.write_i32(0);
                destination.write_xdr(w);
                predicate.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for Claimant {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        match r.read_i32()? {
            0 => Ok(Claimant::V0 {
                destination: AccountId::read_xdr(r)?,
                predicate: ClaimPredicate::read_xdr(r)?,
            }),
            other => Err(CodecError::unexpected_arm("Claimant", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum ContractIdPreimage {
    FromAddress { address: ScAddress, salt: Uint256 },
    FromAsset(Asset),
}

impl WriteXdr for ContractIdPreimage {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            ContractIdPreimage::FromAddress { address, salt } => {
                ContractIdPreimageType::FromAddress.write_xdr(w);
                address.write_xdr(w);
                w.write_fixed_opaque(salt);
            }
            ContractIdPreimage::FromAsset(asset) => {
                ContractIdPreimageType::FromAsset.write_xdr(w);
                asset.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for ContractIdPreimage {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(match ContractIdPreimageType::read_xdr(r)? {
            ContractIdPreimageType::FromAddress => ContractIdPreimage::FromAddress {
                address: ScAddress::read_xdr(r)?,
                salt: r.read_fixed_opaque()?,
            },
            ContractIdPreimageType::FromAsset => ContractIdPreimage::FromAsset(Asset::read_xdr(r)?),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct InvokeContractArgs {
    pub contract_address: ScAddress,
    pub function_name: ScSymbol,
    pub args: VecM<ScVal>,
}
xdr_struct_codec!(InvokeContractArgs {
    contract_address,
    function_name,
    args
});

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct CreateContractArgs {
    pub contract_id_preimage: ContractIdPreimage,
    pub executable: ContractExecutable,
}
xdr_struct_codec!(CreateContractArgs {
    contract_id_preimage,
    executable
});

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct CreateContractArgsV2 {
    pub contract_id_preimage: ContractIdPreimage,
    pub executable: ContractExecutable,
    pub constructor_args: VecM<ScVal>,
}
xdr_struct_codec!(CreateContractArgsV2 {
    contract_id_preimage,
    executable,
    constructor_args
});

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum HostFunction {
    InvokeContract(InvokeContractArgs),
    CreateContract(CreateContractArgs),
    UploadContractWasm(BytesM),
    CreateContractV2(CreateContractArgsV2),
}

impl WriteXdr for HostFunction {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            HostFunction::InvokeContract(args) => {
                HostFunctionType::InvokeContract.write_xdr(w);
                args.write_xdr(w);
            }
            HostFunction::CreateContract(args) => {
                HostFunctionType::CreateContract.write_xdr(w);
                args.write_xdr(w);
            }
            HostFunction::UploadContractWasm(wasm) => {
                HostFunctionType::UploadContractWasm.write_xdr(w);
                wasm.write_xdr(w);
            }
            HostFunction::CreateContractV2(args) => {
                HostFunctionType::CreateContractV2.write_xdr(w);
                args.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for HostFunction {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(match HostFunctionType::read_xdr(r)? {
            HostFunctionType::InvokeContract => {
                HostFunction::InvokeContract(InvokeContractArgs::read_xdr(r)?)
            }
            HostFunctionType::CreateContract => {
                HostFunction::CreateContract(CreateContractArgs::read_xdr(r)?)
            }
            HostFunctionType::UploadContractWasm => {
                HostFunction::UploadContractWasm(BytesM::read_xdr(r)?)
            }
            HostFunctionType::CreateContractV2 => {
                HostFunction::CreateContractV2(CreateContractArgsV2::read_xdr(r)?)
            }
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum SorobanAuthorizedFunction {
    ContractFn(InvokeContractArgs),
    CreateContractHostFn(CreateContractArgs),
    CreateContractV2HostFn(CreateContractArgsV2),
}

impl WriteXdr for SorobanAuthorizedFunction {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            SorobanAuthorizedFunction::ContractFn(args) => {
                SorobanAuthorizedFunctionType::ContractFn.write_xdr(w);
                args.write_xdr(w);
            }
            SorobanAuthorizedFunction::CreateContractHostFn(args) => {
                SorobanAuthorizedFunctionType::CreateContractHostFn.write_xdr(w);
                args.write_xdr(w);
            }
            SorobanAuthorizedFunction::CreateContractV2HostFn(args) => {
                SorobanAuthorizedFunctionType::CreateContractV2HostFn.write_xdr(w);
                args.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for SorobanAuthorizedFunction {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(match SorobanAuthorizedFunctionType::read_xdr(r)? {
            SorobanAuthorizedFunctionType::ContractFn => {
                SorobanAuthorizedFunction::ContractFn(InvokeContractArgs::read_xdr(r)?)
            }
            SorobanAuthorizedFunctionType::CreateContractHostFn => {
                SorobanAuthorizedFunction::CreateContractHostFn(CreateContractArgs::read_xdr(r)?)
            }
            SorobanAuthorizedFunctionType::CreateContractV2HostFn => {
                SorobanAuthorizedFunction::CreateContractV2HostFn(CreateContractArgsV2::read_xdr(
                    r,
                )?)
            }
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct SorobanAuthorizedInvocation {
    pub function: SorobanAuthorizedFunction,
    pub sub_invocations: VecM<SorobanAuthorizedInvocation>,
}

impl WriteXdr for SorobanAuthorizedInvocation {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.function.write_xdr(w);
        self.sub_invocations.write_xdr(w);
    }
}

impl ReadXdr for SorobanAuthorizedInvocation {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        r.nested(|r| {
            Ok(SorobanAuthorizedInvocation {
                function: SorobanAuthorizedFunction::read_xdr(r)?,
                sub_invocations: VecM::read_xdr(r)?,
            })
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct SorobanAddressCredentials {
    pub address: ScAddress,
    pub nonce: i64,
    pub signature_expiration_ledger: u32,
    pub signature: ScVal,
}
xdr_struct_codec!(SorobanAddressCredentials {
    address,
    nonce,
    signature_expiration_ledger,
    signature
});

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum SorobanCredentials {
    SourceAccount,
    Address(SorobanAddressCredentials),
}

impl WriteXdr for SorobanCredentials {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            SorobanCredentials::SourceAccount => SorobanCredentialsType::SourceAccount.write_xdr(w),
            SorobanCredentials::Address(creds) => {
                SorobanCredentialsType::Address.write_xdr(w);
                creds.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for SorobanCredentials {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(match SorobanCredentialsType::read_xdr(r)? {
            SorobanCredentialsType::SourceAccount => SorobanCredentials::SourceAccount,
            SorobanCredentialsType::Address => {
                SorobanCredentials::Address(SorobanAddressCredentials::read_xdr(r)?)
            }
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct SorobanAuthorizationEntry {
    pub credentials: SorobanCredentials,
    pub root_invocation: SorobanAuthorizedInvocation,
}
xdr_struct_codec!(SorobanAuthorizationEntry {
    credentials,
    root_invocation
});

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct CreateAccountOp {
    pub destination: AccountId,
    pub starting_balance: i64,
}
xdr_struct_codec!(CreateAccountOp {
    destination,
    starting_balance
});

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct PaymentOp {
    pub destination: MuxedAccount,
    pub asset: Asset,
    pub amount: i64,
}
xdr_struct_codec!(PaymentOp {
    destination,
    asset,
    amount
});

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct PathPaymentStrictReceiveOp {
    pub send_asset: Asset,
    pub send_max: i64,
    pub destination: MuxedAccount,
    pub dest_asset: Asset,
    pub dest_amount: i64,
    pub path: VecM<Asset, 5>,
}
xdr_struct_codec!(PathPaymentStrictReceiveOp {
    send_asset,
    send_max,
    destination,
    dest_asset,
    dest_amount,
    path
});

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct PathPaymentStrictSendOp {
    pub send_asset: Asset,
    pub send_amount: i64,
    pub destination: MuxedAccount,
    pub dest_asset: Asset,
    pub dest_min: i64,
    pub path: VecM<Asset, 5>,
}
xdr_struct_codec!(PathPaymentStrictSendOp {
    send_asset,
    send_amount,
    destination,
    dest_asset,
    dest_min,
    path
});

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct ManageSellOfferOp {
    pub selling: Asset,
    pub buying: Asset,
    pub amount: i64,
    pub price: Price,
    pub offer_id: i64,
}
xdr_struct_codec!(ManageSellOfferOp {
    selling,
    buying,
    amount,
    price,
    offer_id
});

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct ManageBuyOfferOp {
    pub selling: Asset,
    pub buying: Asset,
    pub buy_amount: i64,
    pub price: Price,
    pub offer_id: i64,
}
xdr_struct_codec!(ManageBuyOfferOp {
    selling,
    buying,
    buy_amount,
    price,
    offer_id
});

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct CreatePassiveSellOfferOp {
    pub selling: Asset,
    pub buying: Asset,
    pub amount: i64,
    pub price: Price,
}
xdr_struct_codec!(CreatePassiveSellOfferOp {
    selling,
    buying,
    amount,
    price
});

#[derive(Clone, Debug, Default, PartialEq, Eq, std::hash::Hash)]
pub struct SetOptionsOp {
    pub inflation_dest: Option<AccountId>,
    pub clear_flags: Option<u32>,
    pub set_flags: Option<u32>,
    pub master_weight: Option<u32>,
    pub low_threshold: Option<u32>,
    pub med_threshold: Option<u32>,
    pub high_threshold: Option<u32>,
    pub home_domain: Option<StringM<32>>,
    pub signer: Option<Signer>,
}
xdr_struct_codec!(SetOptionsOp {
    inflation_dest,
    clear_flags,
    set_flags,
    master_weight,
    low_threshold,
    med_threshold,
    high_threshold,
    home_domain,
    signer
});

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct ChangeTrustOp {
    pub line: ChangeTrustAsset,
    pub limit: i64,
}
xdr_struct_codec!(ChangeTrustOp { line, limit });

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct AllowTrustOp {
    pub trustor: AccountId,
    pub asset: AssetCode,
    pub authorize: u32,
}
xdr_struct_codec!(AllowTrustOp {
    trustor,
    asset,
    authorize
});

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct ManageDataOp {
    pub data_name: StringM<64>,
    pub data_value: Option<BytesM<64>>,
}
xdr_struct_codec!(ManageDataOp {
    data_name,
    data_value
});

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct BumpSequenceOp {
    pub bump_to: i64,
}
xdr_struct_codec!(BumpSequenceOp { bump_to });

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct CreateClaimableBalanceOp {
    pub asset: Asset,
    pub amount: i64,
    pub claimants: VecM<Claimant, 10>,
}
xdr_struct_codec!(CreateClaimableBalanceOp {
    asset,
    amount,
    claimants
});

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct ClaimClaimableBalanceOp {
    pub balance_id: ClaimableBalanceId,
}
xdr_struct_codec!(ClaimClaimableBalanceOp { balance_id });

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct BeginSponsoringFutureReservesOp {
    pub sponsored_id: AccountId,
}
xdr_struct_codec!(BeginSponsoringFutureReservesOp { sponsored_id });

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum RevokeSponsorshipOp {
    LedgerEntry(LedgerKey),
    Signer {
        account_id: AccountId,
        signer_key: SignerKey,
    },
}

impl WriteXdr for RevokeSponsorshipOp {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            RevokeSponsorshipOp::LedgerEntry(key) => {
                RevokeSponsorshipType::LedgerEntry.write_xdr(w);
                key.write_xdr(w);
            }
            RevokeSponsorshipOp::Signer {
                account_id,
                signer_key,
            } => {
                RevokeSponsorshipType::Signer.write_xdr(w);
                account_id.write_xdr(w);
                signer_key.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for RevokeSponsorshipOp {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(match RevokeSponsorshipType::read_xdr(r)? {
            RevokeSponsorshipType::LedgerEntry => {
                RevokeSponsorshipOp::LedgerEntry(LedgerKey::read_xdr(r)?)
            }
            RevokeSponsorshipType::Signer => RevokeSponsorshipOp::Signer {
                account_id: AccountId::read_xdr(r)?,
                signer_key: SignerKey::read_xdr(r)?,
            },
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct ClawbackOp {
    pub asset: Asset,
    pub from: MuxedAccount,
    pub amount: i64,
}
xdr_struct_codec!(ClawbackOp {
    asset,
    from,
    amount
});

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct ClawbackClaimableBalanceOp {
    pub balance_id: ClaimableBalanceId,
}
xdr_struct_codec!(ClawbackClaimableBalanceOp { balance_id });

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct SetTrustLineFlagsOp {
    pub trustor: AccountId,
    pub asset: Asset,
    pub clear_flags: u32,
    pub set_flags: u32,
}
xdr_struct_codec!(SetTrustLineFlagsOp {
    trustor,
    asset,
    clear_flags,
    set_flags
});

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct LiquidityPoolDepositOp {
    pub liquidity_pool_id: PoolId,
    pub max_amount_a: i64,
    pub max_amount_b: i64,
    pub min_price: Price,
    pub max_price: Price,
}
xdr_struct_codec!(LiquidityPoolDepositOp {
    liquidity_pool_id,
    max_amount_a,
    max_amount_b,
    min_price,
    max_price
});

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct LiquidityPoolWithdrawOp {
    pub liquidity_pool_id: PoolId,
    pub amount: i64,
    pub min_amount_a: i64,
    pub min_amount_b: i64,
}
xdr_struct_codec!(LiquidityPoolWithdrawOp {
    liquidity_pool_id,
    amount,
    min_amount_a,
    min_amount_b
});

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct InvokeHostFunctionOp {
    pub host_function: HostFunction,
    pub auth: VecM<SorobanAuthorizationEntry>,
}
xdr_struct_codec!(InvokeHostFunctionOp {
    host_function,
    auth
});

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct ExtendFootprintTtlOp {
    pub ext: ExtensionPoint,
    pub extend_to: u32,
}
xdr_struct_codec!(ExtendFootprintTtlOp { ext, extend_to });

#[derive(Clone, Debug, Default, PartialEq, Eq, std::hash::Hash)]
pub struct RestoreFootprintOp {
    pub ext: ExtensionPoint,
}
xdr_struct_codec!(RestoreFootprintOp { ext });

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub enum OperationBody {
    CreateAccount(CreateAccountOp),
    Payment(PaymentOp),
    PathPaymentStrictReceive(PathPaymentStrictReceiveOp),
    ManageSellOffer(ManageSellOfferOp),
    CreatePassiveSellOffer(CreatePassiveSellOfferOp),
    SetOptions(SetOptionsOp),
    ChangeTrust(ChangeTrustOp),
    AllowTrust(AllowTrustOp),
    AccountMerge(MuxedAccount),
    Inflation,
    ManageData(ManageDataOp),
    BumpSequence(BumpSequenceOp),
    ManageBuyOffer(ManageBuyOfferOp),
    PathPaymentStrictSend(PathPaymentStrictSendOp),
    CreateClaimableBalance(CreateClaimableBalanceOp),
    ClaimClaimableBalance(ClaimClaimableBalanceOp),
    BeginSponsoringFutureReserves(BeginSponsoringFutureReservesOp),
    EndSponsoringFutureReserves,
    RevokeSponsorship(RevokeSponsorshipOp),
    Clawback(ClawbackOp),
    ClawbackClaimableBalance(ClawbackClaimableBalanceOp),
    SetTrustLineFlags(SetTrustLineFlagsOp),
    LiquidityPoolDeposit(LiquidityPoolDepositOp),
    LiquidityPoolWithdraw(LiquidityPoolWithdrawOp),
    InvokeHostFunction(InvokeHostFunctionOp),
    ExtendFootprintTtl(ExtendFootprintTtlOp),
    RestoreFootprint(RestoreFootprintOp),
}

impl OperationBody {
    pub fn operation_type(&self) -> OperationType {
        match self {
            OperationBody::CreateAccount(_) => OperationType::CreateAccount,
            OperationBody::Payment(_) => OperationType::Payment,
            OperationBody::PathPaymentStrictReceive(_) => OperationType::PathPaymentStrictReceive,
            OperationBody::ManageSellOffer(_) => OperationType::ManageSellOffer,
            OperationBody::CreatePassiveSellOffer(_) => OperationType::CreatePassiveSellOffer,
            OperationBody::SetOptions(_) => OperationType::SetOptions,
            OperationBody::ChangeTrust(_) => OperationType::ChangeTrust,
            OperationBody::AllowTrust(_) => OperationType::AllowTrust,
            OperationBody::AccountMerge(_) => OperationType::AccountMerge,
            OperationBody::Inflation => OperationType::Inflation,
            OperationBody::ManageData(_) => OperationType::ManageData,
            OperationBody::BumpSequence(_) => OperationType::BumpSequence,
            OperationBody::ManageBuyOffer(_) => OperationType::ManageBuyOffer,
            OperationBody::PathPaymentStrictSend(_) => OperationType::PathPaymentStrictSend,
            OperationBody::CreateClaimableBalance(_) => OperationType::CreateClaimableBalance,
            OperationBody::ClaimClaimableBalance(_) => OperationType::ClaimClaimableBalance,
            OperationBody::BeginSponsoringFutureReserves(_) => {
                OperationType::BeginSponsoringFutureReserves
            }
            OperationBody::EndSponsoringFutureReserves => {
                OperationType::EndSponsoringFutureReserves
            }
            OperationBody::RevokeSponsorship(_) => OperationType::RevokeSponsorship,
            OperationBody::Clawback(_) => OperationType::Clawback,
            OperationBody::ClawbackClaimableBalance(_) => OperationType::ClawbackClaimableBalance,
            OperationBody::SetTrustLineFlags(_) => OperationType::SetTrustLineFlags,
            OperationBody::LiquidityPoolDeposit(_) => OperationType::LiquidityPoolDeposit,
            OperationBody::LiquidityPoolWithdraw(_) => OperationType::LiquidityPoolWithdraw,
            OperationBody::InvokeHostFunction(_) => OperationType::InvokeHostFunction,
            OperationBody::ExtendFootprintTtl(_) => OperationType::ExtendFootprintTtl,
            OperationBody::RestoreFootprint(_) => OperationType::RestoreFootprint,
        }
    }

    /// Soroban operations must be the only operation in their transaction.
    pub fn is_soroban(&self) -> bool {
        matches!(
            self,
            OperationBody::InvokeHostFunction(_)
                | OperationBody::ExtendFootprintTtl(_)
                | OperationBody::RestoreFootprint(_)
        )
    }
}

impl WriteXdr for OperationBody {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.operation_type().write_xdr(w);
        match self {
            OperationBody::CreateAccount(op) => op.write_xdr(w),
            OperationBody::Payment(op) => op.write_xdr(w),
            OperationBody::PathPaymentStrictReceive(op) => op.write_xdr(w),
            OperationBody::ManageSellOffer(op) => op.write_xdr(w),
            OperationBody::CreatePassiveSellOffer(op) => op.write_xdr(w),
            OperationBody::SetOptions(op) => op.write_xdr(w),
            OperationBody::ChangeTrust(op) => op.write_xdr(w),
            OperationBody::AllowTrust(op) => op.write_xdr(w),
            OperationBody::AccountMerge(destination) => destination.write_xdr(w),
            OperationBody::Inflation | OperationBody::EndSponsoringFutureReserves => {}
            OperationBody::ManageData(op) => op.write_xdr(w),
            OperationBody::BumpSequence(op) => op.write_xdr(w),
            OperationBody::ManageBuyOffer(op) => op.write_xdr(w),
            OperationBody::PathPaymentStrictSend(op) => op.write_xdr(w),
            OperationBody::CreateClaimableBalance(op) => op.write_xdr(w),
            OperationBody::ClaimClaimableBalance(op) => op.write_xdr(w),
            OperationBody::BeginSponsoringFutureReserves(op) => op.write_xdr(w),
            OperationBody::RevokeSponsorship(op) => op.write_xdr(w),
            OperationBody::Clawback(op) => op.write_xdr(w),
            OperationBody::ClawbackClaimableBalance(op) => op.write_xdr(w),
            OperationBody::SetTrustLineFlags(op) => op.write_xdr(w),
            OperationBody::LiquidityPoolDeposit(op) => op.write_xdr(w),
            OperationBody::LiquidityPoolWithdraw(op) => op.write_xdr(w),
            OperationBody::InvokeHostFunction(op) => op.write_xdr(w),
            OperationBody::ExtendFootprintTtl(op) => op.write_xdr(w),
            OperationBody::RestoreFootprint(op) => op.write_xdr(w),
        }
    }
}

impl ReadXdr for OperationBody {
    fn read_xdr(r: &mut XdrReader) -> Result<Self, CodecError> {
        Ok(match OperationType::read_xdr(r)? {
            OperationType::CreateAccount => OperationBody::CreateAccount(ReadXdr::read_xdr(r)?),
            OperationType::Payment => OperationBody::Payment(ReadXdr::read_xdr(r)?),
            OperationType::PathPaymentStrictReceive => {
                OperationBody::PathPaymentStrictReceive(ReadXdr::read_xdr(r)?)
            }
            OperationType::ManageSellOffer => OperationBody::ManageSellOffer(ReadXdr::read_xdr(r)?),
            OperationType::CreatePassiveSellOffer => {
                OperationBody::CreatePassiveSellOffer(ReadXdr::read_xdr(r)?)
            }
            OperationType::SetOptions => OperationBody::SetOptions(ReadXdr::read_xdr(r)?),
            OperationType::ChangeTrust => OperationBody::ChangeTrust(ReadXdr::read_xdr(r)?),
            OperationType::AllowTrust => OperationBody::AllowTrust(ReadXdr::read_xdr(r)?),
            OperationType::AccountMerge => OperationBody::AccountMerge(ReadXdr::read_xdr(r)?),
            OperationType::Inflation => OperationBody::Inflation,
            OperationType::ManageData => OperationBody::ManageData(ReadXdr::read_xdr(r)?),
            OperationType::BumpSequence => OperationBody::BumpSequence(ReadXdr::read_xdr(r)?),
            OperationType::ManageBuyOffer => OperationBody::ManageBuyOffer(ReadXdr::read_xdr(r)?),
            OperationType::PathPaymentStrictSend => {
                OperationBody::PathPaymentStrictSend(ReadXdr::read_xdr(r)?)
            }
            OperationType::CreateClaimableBalance => {
                OperationBody::CreateClaimableBalance(ReadXdr::read_xdr(r)?)
            }
            OperationType::ClaimClaimableBalance => {
                OperationBody::ClaimClaimableBalance(ReadXdr::read_xdr(r)?)
            }
            OperationType::BeginSponsoringFutureReserves => {
                OperationBody::BeginSponsoringFutureReserves(ReadXdr::read_xdr(r)?)
            }
            OperationType::EndSponsoringFutureReserves => {
                OperationBody::EndSponsoringFutureReserves
            }
            OperationType::RevokeSponsorship => {
                OperationBody::RevokeSponsorship(ReadXdr::read_xdr(r)?)
            }
            OperationType::Clawback => OperationBody::Clawback(ReadXdr::read_xdr(r)?),
            OperationType::ClawbackClaimableBalance => {
                OperationBody::ClawbackClaimableBalance(ReadXdr::read_xdr(r)?)
            }
            OperationType::SetTrustLineFlags => {
                OperationBody::SetTrustLineFlags(ReadXdr::read_xdr(r)?)
            }
            OperationType::LiquidityPoolDeposit => {
                OperationBody::LiquidityPoolDeposit(ReadXdr::read_xdr(r)?)
            }
            OperationType::LiquidityPoolWithdraw => {
                OperationBody::LiquidityPoolWithdraw(ReadXdr::read_xdr(r)?)
            }
            OperationType::InvokeHostFunction => {
                OperationBody::InvokeHostFunction(ReadXdr::read_xdr(r)?)
            }
            OperationType::ExtendFootprintTtl => {
                OperationBody::ExtendFootprintTtl(ReadXdr::read_xdr(r)?)
            }
            OperationType::RestoreFootprint => {
                OperationBody::RestoreFootprint(ReadXdr::read_xdr(r)?)
            }
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, std::hash::Hash)]
pub struct Operation {
    pub source_account: Option<MuxedAccount>,
    pub body: OperationBody,
}
xdr_struct_codec!(Operation {
    source_account,
    body
});

fn check_amount(field: &str, amount: i64, allow_zero: bool) -> Result<(), TransactionError> {
    if amount < 0 || (!allow_zero && amount == 0) {
        return Err(TransactionError::ValidationError(format!(
            "{field} must be {}, got {amount}",
            if allow_zero { "non-negative" } else { "positive" }
        )));
    }
    Ok(())
}

fn check_price(price: &Price) -> Result<(), TransactionError> {
    if price.n <= 0 || price.d <= 0 {
        return Err(TransactionError::ValidationError(format!(
            "Price must be positive, got {}/{}",
            price.n, price.d
        )));
    }
    Ok(())
}

/// Constructors validate amounts and bounds; the source account defaults to
/// the transaction source and is set with [`Operation::with_source`].
impl Operation {
    pub fn new(body: OperationBody) -> Self {
        Operation {
            source_account: None,
            body,
        }
    }

    pub fn with_source(mut self, source: MuxedAccount) -> Self {
        self.source_account = Some(source);
        self
    }

    pub fn create_account(
        destination: AccountId,
        starting_balance: i64,
    ) -> Result<Self, TransactionError> {
        check_amount("starting_balance", starting_balance, true)?;
        Ok(Self::new(OperationBody::CreateAccount(CreateAccountOp {
            destination,
            starting_balance,
        })))
    }

    pub fn payment(
        destination: MuxedAccount,
        asset: Asset,
        amount: i64,
    ) -> Result<Self, TransactionError> {
        check_amount("amount", amount, false)?;
        Ok(Self::new(OperationBody::Payment(PaymentOp {
            destination,
            asset,
            amount,
        })))
    }

    pub fn path_payment_strict_receive(
        send_asset: Asset,
        send_max: i64,
        destination: MuxedAccount,
        dest_asset: Asset,
        dest_amount: i64,
        path: Vec<Asset>,
    ) -> Result<Self, TransactionError> {
        check_amount("send_max", send_max, false)?;
        check_amount("dest_amount", dest_amount, false)?;
        Ok(Self::new(OperationBody::PathPaymentStrictReceive(
            PathPaymentStrictReceiveOp {
                send_asset,
                send_max,
                destination,
                dest_asset,
                dest_amount,
                path: path.try_into()?,
            },
        )))
    }

    pub fn path_payment_strict_send(
        send_asset: Asset,
        send_amount: i64,
        destination: MuxedAccount,
        dest_asset: Asset,
        dest_min: i64,
        path: Vec<Asset>,
    ) -> Result<Self, TransactionError> {
        check_amount("send_amount", send_amount, false)?;
        check_amount("dest_min", dest_min, false)?;
        Ok(Self::new(OperationBody::PathPaymentStrictSend(
            PathPaymentStrictSendOp {
                send_asset,
                send_amount,
                destination,
                dest_asset,
                dest_min,
                path: path.try_into()?,
            },
        )))
    }

    /// An `amount` of zero deletes the offer identified by `offer_id`.
    pub fn manage_sell_offer(
        selling: Asset,
        buying: Asset,
        amount: i64,
        price: Price,
        offer_id: i64,
    ) -> Result<Self, TransactionError> {
        check_amount("amount", amount, true)?;
        check_price(&price)?;
        Ok(Self::new(OperationBody::ManageSellOffer(ManageSellOfferOp {
            selling,
            buying,
            amount,
            price,
            offer_id,
        })))
    }

    pub fn manage_buy_offer(
        selling: Asset,
        buying: Asset,
        buy_amount: i64,
        price: Price,
        offer_id: i64,
    ) -> Result<Self, TransactionError> {
        check_amount("buy_amount", buy_amount, true)?;
        check_price(&price)?;
        Ok(Self::new(OperationBody::ManageBuyOffer(ManageBuyOfferOp {
            selling,
            buying,
            buy_amount,
            price,
            offer_id,
        })))
    }

    pub fn create_passive_sell_offer(
        selling: Asset,
        buying: Asset,
        amount: i64,
        price: Price,
    ) -> Result<Self, TransactionError> {
        check_amount("amount", amount, false)?;
        check_price(&price)?;
        Ok(Self::new(OperationBody::CreatePassiveSellOffer(
            CreatePassiveSellOfferOp {
                selling,
                buying,
                amount,
                price,
            },
        )))
    }

    pub fn set_options(options: SetOptionsOp) -> Result<Self, TransactionError> {
        for (name, value) in [
            ("master_weight", options.master_weight),
            ("low_threshold", options.low_threshold),
            ("med_threshold", options.med_threshold),
            ("high_threshold", options.high_threshold),
        ] {
            if value.is_some_and(|v| v > 255) {
                return Err(TransactionError::ValidationError(format!(
                    "{name} must be between 0 and 255"
                )));
            }
        }
        if options.signer.as_ref().is_some_and(|s| s.weight > 255) {
            return Err(TransactionError::ValidationError(
                "signer weight must be between 0 and 255".to_string(),
            ));
        }
        Ok(Self::new(OperationBody::SetOptions(options)))
    }

    pub fn change_trust(line: ChangeTrustAsset, limit: i64) -> Result<Self, TransactionError> {
        check_amount("limit", limit, true)?;
        Ok(Self::new(OperationBody::ChangeTrust(ChangeTrustOp {
            line,
            limit,
        })))
    }

    pub fn allow_trust(trustor: AccountId, asset: AssetCode, authorize: u32) -> Self {
        Self::new(OperationBody::AllowTrust(AllowTrustOp {
            trustor,
            asset,
            authorize,
        }))
    }

    pub fn account_merge(destination: MuxedAccount) -> Self {
        Self::new(OperationBody::AccountMerge(destination))
    }

    pub fn inflation() -> Self {
        Self::new(OperationBody::Inflation)
    }

    /// A `None` value deletes the data entry.
    pub fn manage_data(name: &str, value: Option<&[u8]>) -> Result<Self, TransactionError> {
        if name.is_empty() {
            return Err(TransactionError::ValidationError(
                "data name must not be empty".to_string(),
            ));
        }
        Ok(Self::new(OperationBody::ManageData(ManageDataOp {
            data_name: StringM::try_from(name)?,
            data_value: value.map(BytesM::try_from).transpose()?,
        })))
    }

    pub fn bump_sequence(bump_to: i64) -> Result<Self, TransactionError> {
        check_amount("bump_to", bump_to, true)?;
        Ok(Self::new(OperationBody::BumpSequence(BumpSequenceOp {
            bump_to,
        })))
    }

    pub fn create_claimable_balance(
        asset: Asset,
        amount: i64,
        claimants: Vec<Claimant>,
    ) -> Result<Self, TransactionError> {
        check_amount("amount", amount, false)?;
        if claimants.is_empty() {
            return Err(TransactionError::ValidationError(
                "at least one claimant is required".to_string(),
            ));
        }
        Ok(Self::new(OperationBody::CreateClaimableBalance(
            CreateClaimableBalanceOp {
                asset,
                amount,
                claimants: claimants.try_into()?,
            },
        )))
    }

    pub fn claim_claimable_balance(balance_id: ClaimableBalanceId) -> Self {
        Self::new(OperationBody::ClaimClaimableBalance(
            ClaimClaimableBalanceOp { balance_id },
        ))
    }

    pub fn begin_sponsoring_future_reserves(sponsored_id: AccountId) -> Self {
        Self::new(OperationBody::BeginSponsoringFutureReserves(
            BeginSponsoringFutureReservesOp { sponsored_id },
        ))
    }

    pub fn end_sponsoring_future_reserves() -> Self {
        Self::new(OperationBody::EndSponsoringFutureReserves)
    }

    pub fn revoke_sponsorship(revoke: RevokeSponsorshipOp) -> Self {
        Self::new(OperationBody::RevokeSponsorship(revoke))
    }

    pub fn clawback(asset: Asset, from: MuxedAccount, amount: i64) -> Result<Self, TransactionError> {
        check_amount("amount", amount, false)?;
        Ok(Self::new(OperationBody::Clawback(ClawbackOp {
            asset,
            from,
            amount,
        })))
    }

    pub fn clawback_claimable_balance(balance_id: ClaimableBalanceId) -> Self {
        Self::new(OperationBody::ClawbackClaimableBalance(
            ClawbackClaimableBalanceOp { balance_id },
        ))
    }

    pub fn set_trust_line_flags(
        trustor: AccountId,
        asset: Asset,
        clear_flags: u32,
        set_flags: u32,
    ) -> Self {
        Self::new(OperationBody::SetTrustLineFlags(SetTrustLineFlagsOp {
            trustor,
            asset,
            clear_flags,
            set_flags,
        }))
    }

    pub fn liquidity_pool_deposit(
        liquidity_pool_id: PoolId,
        max_amount_a: i64,
        max_amount_b: i64,
        min_price: Price,
        max_price: Price,
    ) -> Result<Self, TransactionError> {
        check_amount("max_amount_a", max_amount_a, false)?;
        check_amount("max_amount_b", max_amount_b, false)?;
        check_price(&min_price)?;
        check_price(&max_price)?;
        Ok(Self::new(OperationBody::LiquidityPoolDeposit(
            LiquidityPoolDepositOp {
                liquidity_pool_id,
                max_amount_a,
                max_amount_b,
                min_price,
                max_price,
            },
        )))
    }

    pub fn liquidity_pool_withdraw(
        liquidity_pool_id: PoolId,
        amount: i64,
        min_amount_a: i64,
        min_amount_b: i64,
    ) -> Result<Self, TransactionError> {
        check_amount("amount", amount, false)?;
        check_amount("min_amount_a", min_amount_a, true)?;
        check_amount("min_amount_b", min_amount_b, true)?;
        Ok(Self::new(OperationBody::LiquidityPoolWithdraw(
            LiquidityPoolWithdrawOp {
                liquidity_pool_id,
                amount,
                min_amount_a,
                min_amount_b,
            },
        )))
    }

    pub fn invoke_host_function(
        host_function: HostFunction,
        auth: Vec<SorobanAuthorizationEntry>,
    ) -> Result<Self, TransactionError> {
        Ok(Self::new(OperationBody::InvokeHostFunction(
            InvokeHostFunctionOp {
                host_function,
                auth: auth.try_into()?,
            },
        )))
    }

    /// Calls `function` on `contract` with `args`.
    pub fn invoke_contract(
        contract: ScAddress,
        function: &str,
        args: Vec<ScVal>,
    ) -> Result<Self, TransactionError> {
        let ScVal::Symbol(function_name) = ScVal::symbol(function)? else {
            return Err(TransactionError::ValidationError(format!(
                "Invalid function name '{function}'"
            )));
        };
        Self::invoke_host_function(
            HostFunction::InvokeContract(InvokeContractArgs {
                contract_address: contract,
                function_name,
                args: args.try_into()?,
            }),
            Vec::new(),
        )
    }

    pub fn extend_footprint_ttl(extend_to: u32) -> Self {
        Self::new(OperationBody::ExtendFootprintTtl(ExtendFootprintTtlOp {
            ext: ExtensionPoint::V0,
            extend_to,
        }))
    }

    pub fn restore_footprint() -> Self {
        Self::new(OperationBody::RestoreFootprint(RestoreFootprintOp::default()))
    }
}
