//! Ed25519 keypairs.
//!
//! A keypair either holds a secret seed and can sign, or only a public key
//! and can verify. The seed is wiped from memory when the keypair is dropped.

use std::fmt;

use ed25519_dalek::{Signer as _, SigningKey};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::{
    models::{
        address::strkey,
        xdr::{AccountId, DecoratedSignature, MuxedAccount, SignatureHint, SignerKey},
        SignatureError, TransactionError,
    },
    utils::{ed25519_public_key_from_der, ed25519_verify},
};

#[derive(Clone)]
pub struct Keypair {
    public_key: [u8; 32],
    signing_key: Option<SigningKey>,
}

impl Keypair {
    pub fn from_raw_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self {
            public_key: signing_key.verifying_key().to_bytes(),
            signing_key: Some(signing_key),
        }
    }

    /// Parses an `S...` secret seed.
    pub fn from_secret_seed(seed: &str) -> Result<Self, TransactionError> {
        let raw = strkey::decode_ed25519_secret_seed(seed)?;
        Ok(Self::from_raw_seed(&raw))
    }

    /// A verify-only keypair from a `G...` account id.
    pub fn from_public_key(address: &str) -> Result<Self, TransactionError> {
        Ok(Self::from_raw_public_key(strkey::decode_ed25519_public_key(
            address,
        )?))
    }

    pub fn from_raw_public_key(public_key: [u8; 32]) -> Self {
        Self {
            public_key,
            signing_key: None,
        }
    }

    /// A verify-only keypair from a DER/SPKI public key.
    pub fn from_public_key_der(der: &[u8]) -> Result<Self, SignatureError> {
        Ok(Self::from_raw_public_key(ed25519_public_key_from_der(der)?))
    }

    pub fn random() -> Self {
        let seed = Zeroizing::new(rand::random::<[u8; 32]>());
        Self::from_raw_seed(&seed)
    }

    pub fn can_sign(&self) -> bool {
        self.signing_key.is_some()
    }

    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    pub fn account_id(&self) -> AccountId {
        AccountId(self.public_key)
    }

    pub fn muxed_account(&self, id: Option<u64>) -> MuxedAccount {
        match id {
            Some(id) => MuxedAccount::MuxedEd25519 {
                id,
                ed25519: self.public_key,
            },
            None => MuxedAccount::Ed25519(self.public_key),
        }
    }

    /// The `G...` address.
    pub fn address(&self) -> String {
        strkey::encode_ed25519_public_key(&self.public_key)
    }

    pub fn secret_seed(&self) -> Result<Zeroizing<String>, SignatureError> {
        let signing_key = self.signing_key()?;
        Ok(strkey::encode_ed25519_secret_seed(&signing_key.to_bytes()))
    }

    pub fn signer_key(&self) -> SignerKey {
        SignerKey::Ed25519(self.public_key)
    }

    /// Last four bytes of the public key.
    pub fn signature_hint(&self) -> SignatureHint {
        let mut hint = [0u8; 4];
        hint.copy_from_slice(&self.public_key[28..]);
        hint
    }

    pub fn sign(&self, data: &[u8]) -> Result<[u8; 64], SignatureError> {
        Ok(self.signing_key()?.sign(data).to_bytes())
    }

    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        ed25519_verify(&self.public_key, data, signature)
    }

    pub fn sign_decorated(&self, data: &[u8]) -> Result<DecoratedSignature, SignatureError> {
        Ok(DecoratedSignature {
            hint: self.signature_hint(),
            signature: self.sign(data)?.to_vec().try_into().map_err(|_| {
                SignatureError::InvalidSignature("signature exceeds 64 bytes".to_string())
            })?,
        })
    }

    /// Signs `payload` for an ed25519 signed-payload signer. The hint is the
    /// key hint XOR the last four bytes of the payload. A shorter payload
    /// fills the front of those four bytes and the rest stays zero.
    pub fn sign_payload_decorated(
        &self,
        payload: &[u8],
    ) -> Result<DecoratedSignature, SignatureError> {
        let mut decorated = self.sign_decorated(payload)?;
        let mut tail = [0u8; 4];
        let take = payload.len().min(4);
        tail[..take].copy_from_slice(&payload[payload.len() - take..]);
        for (h, t) in decorated.hint.iter_mut().zip(tail) {
            *h ^= t;
        }
        Ok(decorated)
    }

    fn signing_key(&self) -> Result<&SigningKey, SignatureError> {
        self.signing_key.as_ref().ok_or_else(|| {
            SignatureError::InvalidKey(format!("{} has no secret key", self.address()))
        })
    }
}

impl PartialEq for Keypair {
    fn eq(&self, other: &Self) -> bool {
        let secrets_match = match (&self.signing_key, &other.signing_key) {
            (Some(a), Some(b)) => {
                let (a, b) = (Zeroizing::new(a.to_bytes()), Zeroizing::new(b.to_bytes()));
                bool::from(a[..].ct_eq(&b[..]))
            }
            (None, None) => true,
            _ => false,
        };
        self.public_key == other.public_key && secrets_match
    }
}

impl Eq for Keypair {}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("address", &self.address())
            .field("can_sign", &self.can_sign())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "SCOWDMM5576VUYF2QRFPJEXMFTCEISOFNF5TE2IZOA52YAY4VZ7WBQNO";
    const ADDRESS: &str = "GDLVVGABQKYQVN6VJP7NHSLEA45A5YLS6PNKMIZFV4BBU2HXA5IRVHUR";

    #[test]
    fn test_keypair_from_seed() {
        let keypair = Keypair::from_secret_seed(SEED).unwrap();
        assert_eq!(keypair.address(), ADDRESS);
        assert_eq!(keypair.secret_seed().unwrap().as_str(), SEED);
        assert_eq!(keypair.signature_hint(), [0xf7, 0x07, 0x51, 0x1a]);
        assert!(keypair.can_sign());
    }

    #[test]
    fn test_sign_matches_rfc8032() {
        let keypair = Keypair::from_secret_seed(SEED).unwrap();
        let signature = keypair.sign(b"").unwrap();
        assert_eq!(
            hex::encode(signature),
            "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b"
        );
        assert!(keypair.verify(b"", &signature));
    }

    #[test]
    fn test_public_only_keypair_cannot_sign() {
        let keypair = Keypair::from_public_key(ADDRESS).unwrap();
        assert!(!keypair.can_sign());
        assert!(matches!(
            keypair.sign(b"data"),
            Err(SignatureError::InvalidKey(_))
        ));
        assert!(keypair.secret_seed().is_err());
        assert!(Keypair::from_public_key(SEED).is_err());
    }

    #[test]
    fn test_signed_payload_hint() {
        let keypair = Keypair::from_secret_seed(SEED).unwrap();
        let decorated = keypair.sign_payload_decorated(&[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(
            decorated.hint,
            [0xf7 ^ 2, 0x07 ^ 3, 0x51 ^ 4, 0x1a ^ 5]
        );
        let short = keypair.sign_payload_decorated(&[0xff]).unwrap();
        assert_eq!(short.hint, [0x08, 0x07, 0x51, 0x1a]);
        assert!(keypair.verify(&[0xff], &short.signature));

        let three = keypair.sign_payload_decorated(&[1, 2, 3]).unwrap();
        assert_eq!(three.hint, [0xf7 ^ 1, 0x07 ^ 2, 0x51 ^ 3, 0x1a]);

        let empty = keypair.sign_payload_decorated(&[]).unwrap();
        assert_eq!(empty.hint, keypair.signature_hint());
    }

    #[test]
    fn test_random_keypairs_differ() {
        let a = Keypair::random();
        let b = Keypair::random();
        assert_ne!(a, b);
        assert!(strkey::is_valid_ed25519_public_key(&a.address()));
    }

    #[test]
    fn test_debug_hides_secret() {
        let keypair = Keypair::from_secret_seed(SEED).unwrap();
        let debug = format!("{keypair:?}");
        assert!(debug.contains(ADDRESS));
        assert!(!debug.contains(SEED));
    }
}
