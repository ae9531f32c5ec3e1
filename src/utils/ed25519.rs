//! Ed25519 key material parsing.
//!
//! Keys handed over by external signers (HSMs, cloud KMS) usually arrive as
//! DER/SPKI blobs rather than raw 32-byte keys.

use ed25519_dalek::{pkcs8::DecodePublicKey, Signature, VerifyingKey};

use crate::models::SignatureError;

/// Extract the raw 32-byte Ed25519 public key from a DER/SPKI encoding.
///
/// A 32-byte input is taken to be the raw key already.
pub fn ed25519_public_key_from_der(der: &[u8]) -> Result<[u8; 32], SignatureError> {
    if let Ok(raw) = <[u8; 32]>::try_from(der) {
        return Ok(raw);
    }

    let verifying_key = VerifyingKey::from_public_key_der(der)
        .map_err(|e| SignatureError::InvalidKey(format!("ASN.1 parse error: {e}")))?;

    Ok(verifying_key.to_bytes())
}

/// Verify `signature` over `message` with a raw public key.
pub fn ed25519_verify(public_key: &[u8; 32], message: &[u8], signature: &[u8]) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };
    key.verify_strict(message, &signature).is_ok()
}
