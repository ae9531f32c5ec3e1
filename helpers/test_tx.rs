/// Builds a handful of sample transactions, signs them with a throwaway key on
/// the network selected by `STELLAR_NETWORK` (testnet when unset) and prints
/// their base64 envelopes and hashes.
/// Can be used for testing transaction encoding and decoding.
/// Run with  cargo run --example test_tx
use eyre::Result;
use stellar_txkit::{
    config::ClientConfig,
    domain::{StellarTransaction, TransactionBuilder},
    models::{Asset, Keypair, Memo, Network, Operation, ScAddress, ScVal},
    utils::to_fixed_point,
};

fn main() -> Result<()> {
    let config = ClientConfig::from_env();
    let network = config.network().cloned().unwrap_or_else(|_| Network::testnet());

    let source = Keypair::random();
    let destination = Keypair::random();
    let sequence = 1;

    let transactions = vec![
        create_payment(&source, &destination, sequence, config.base_fee)?,
        create_account(&source, &destination, sequence + 1, config.base_fee)?,
        create_multi_operation(&source, &destination, sequence + 2, config.base_fee)?,
        create_contract_call(&source, sequence + 3, config.base_fee)?,
    ];

    for (i, mut tx) in transactions.into_iter().enumerate() {
        tx.sign(&source, &network)?;
        println!("Transaction {}: {}", i, tx.signed_envelope_xdr()?);
        println!("  hash: {}", tx.hash(&network));
    }

    Ok(())
}

fn create_payment(
    source: &Keypair,
    destination: &Keypair,
    sequence: i64,
    fee: u32,
) -> Result<StellarTransaction> {
    Ok(TransactionBuilder::new(source.muxed_account(None), sequence, fee)
        .add_operation(Operation::payment(
            destination.muxed_account(None),
            Asset::Native,
            to_fixed_point("0.001")?,
        )?)
        .with_default_timeout()
        .build()?)
}

fn create_account(
    source: &Keypair,
    destination: &Keypair,
    sequence: i64,
    fee: u32,
) -> Result<StellarTransaction> {
    Ok(TransactionBuilder::new(source.muxed_account(None), sequence, fee)
        .add_operation(Operation::create_account(
            destination.account_id(),
            to_fixed_point("10")?,
        )?)
        .memo(Memo::text("welcome")?)
        .with_default_timeout()
        .build()?)
}

fn create_multi_operation(
    source: &Keypair,
    destination: &Keypair,
    sequence: i64,
    fee: u32,
) -> Result<StellarTransaction> {
    let usdc = Asset::credit("USDC", destination.account_id())?;
    Ok(TransactionBuilder::new(source.muxed_account(None), sequence, fee)
        .add_operation(Operation::payment(
            destination.muxed_account(Some(7)),
            Asset::Native,
            to_fixed_point("1.5")?,
        )?)
        .add_operation(Operation::payment(
            destination.muxed_account(None),
            usdc,
            to_fixed_point("25")?,
        )?)
        .add_operation(Operation::manage_data("note", Some(b"sample"))?)
        .memo(Memo::Id(42))
        .with_default_timeout()
        .build()?)
}

fn create_contract_call(source: &Keypair, sequence: i64, fee: u32) -> Result<StellarTransaction> {
    let contract: ScAddress = "CA3D5KRYM6CB7OWQ6TWYRR3Z4T7GNZLKERYNZGGA5SOAOPIFY6YQGAXE".parse()?;
    let args = vec![
        ScVal::Address(source.account_id().into()),
        ScVal::i128(1_000_000),
    ];
    Ok(TransactionBuilder::new(source.muxed_account(None), sequence, fee)
        .add_operation(Operation::invoke_contract(contract, "mint", args)?)
        .with_default_timeout()
        .build()?)
}
