//! Fee Bump Tool
//!
//! Wraps a signed transaction envelope in a fee bump paid by another account
//! and prints the signed fee bump envelope.
//!
//! # Usage
//!
//! ```bash
//! FEE_SOURCE_SECRET=S... STELLAR_NETWORK=testnet \
//!   cargo run --example fee_bump_tx -- <inner envelope base64> [base fee]
//! ```
//!
//! When the base fee is omitted the inner transaction's own rate is used.
use eyre::{eyre, Result};
use stellar_txkit::{config::ClientConfig, domain::StellarTransaction, models::Keypair};

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let inner_xdr = args
        .next()
        .ok_or_else(|| eyre!("Usage: fee_bump_tx <inner envelope base64> [base fee]"))?;
    let base_fee = args
        .next()
        .map(|fee| {
            fee.parse::<i64>()
                .map_err(|e| eyre!("Base fee must be an integer: {}", e))
        })
        .transpose()?;

    let config = ClientConfig::from_env();
    let network = config.network()?;
    let secret =
        std::env::var("FEE_SOURCE_SECRET").map_err(|_| eyre!("FEE_SOURCE_SECRET is not set"))?;
    let fee_source = Keypair::from_secret_seed(&secret)?;

    let inner = StellarTransaction::from_envelope_xdr_base64(&inner_xdr)?;
    if !inner.is_signed() {
        eprintln!("Warning: the inner transaction carries no signatures");
    }

    let mut bump = inner.fee_bump(fee_source.muxed_account(None), base_fee)?;
    bump.sign(&fee_source, network)?;

    println!("Fee: {} stroops", bump.fee());
    println!("Hash: {}", bump.hash(network));
    println!("{}", bump.signed_envelope_xdr()?);
    Ok(())
}
