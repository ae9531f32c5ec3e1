//! Stellar Key Generation Tool
//!
//! Generates a random ed25519 keypair and prints its account address and
//! secret seed. Pass a numeric id to also print the muxed (`M...`) address.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example create_key
//! cargo run --example create_key -- 42
//! ```
use eyre::{eyre, Result};
use stellar_txkit::models::Keypair;

fn main() -> Result<()> {
    let muxed_id = std::env::args()
        .nth(1)
        .map(|id| {
            id.parse::<u64>()
                .map_err(|e| eyre!("Muxed id must be an unsigned integer: {}", e))
        })
        .transpose()?;

    let keypair = Keypair::random();
    let secret = keypair
        .secret_seed()
        .map_err(|e| eyre!("Failed to encode secret seed: {}", e))?;

    println!("Account address: {}", keypair.address());
    println!("Secret seed:     {}", secret.as_str());
    if let Some(id) = muxed_id {
        println!("Muxed address:   {}", keypair.muxed_account(Some(id)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_seed_restores_keypair() {
        let keypair = Keypair::random();
        let secret = keypair.secret_seed().unwrap();
        assert!(secret.starts_with('S'));

        let restored = Keypair::from_secret_seed(&secret).unwrap();
        assert_eq!(restored.address(), keypair.address());
    }

    #[test]
    fn test_keys_are_different() {
        assert_ne!(Keypair::random().address(), Keypair::random().address());
    }
}
