//! StrKey: base32 text encoding of a version byte, a raw payload and a
//! CRC16/XMODEM checksum (SEP-23).
//!
//! Decoding validates, in order, the base32 alphabet, the overall length, the
//! version byte, the payload length expected for that version, and finally
//! the checksum. Each check fails with its own [`StrKeyError`] variant.

use data_encoding::BASE32_NOPAD;
use log::debug;
use strum::{Display, EnumIter, IntoEnumIterator};
use zeroize::Zeroizing;

use crate::models::StrKeyError;

/// Length of an ed25519 key, hash or contract id payload.
pub const KEY_LEN: usize = 32;
/// Largest payload a signed-payload signer can carry.
pub const MAX_SIGNED_PAYLOAD_LEN: usize = 64;

const CHECKSUM_LEN: usize = 2;
const CLAIMABLE_BALANCE_V0: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, Display, EnumIter)]
#[repr(u8)]
pub enum VersionByte {
    /// `G...`
    AccountId = 6 << 3,
    /// `S...`
    SecretSeed = 18 << 3,
    /// `T...`
    PreAuthTx = 19 << 3,
    /// `X...`
    HashX = 23 << 3,
    /// `M...`
    MuxedAccount = 12 << 3,
    /// `P...`
    SignedPayload = 15 << 3,
    /// `C...`
    Contract = 2 << 3,
    /// `L...`
    LiquidityPool = 11 << 3,
    /// `B...`
    ClaimableBalance = 1 << 3,
}

impl VersionByte {
    pub fn from_byte(byte: u8) -> Result<Self, StrKeyError> {
        VersionByte::iter()
            .find(|v| *v as u8 == byte)
            .ok_or(StrKeyError::UnknownVersionByte(byte))
    }

    /// First character of every key encoded with this version byte.
    pub fn prefix(self) -> char {
        match self {
            VersionByte::AccountId => 'G',
            VersionByte::SecretSeed => 'S',
            VersionByte::PreAuthTx => 'T',
            VersionByte::HashX => 'X',
            VersionByte::MuxedAccount => 'M',
            VersionByte::SignedPayload => 'P',
            VersionByte::Contract => 'C',
            VersionByte::LiquidityPool => 'L',
            VersionByte::ClaimableBalance => 'B',
        }
    }

    /// Checks the payload length (and fixed structure) required by this version.
    pub fn check_payload(self, payload: &[u8]) -> Result<(), StrKeyError> {
        let invalid_length = || StrKeyError::InvalidLength {
            version: self as u8,
            actual: payload.len(),
        };
        match self {
            VersionByte::AccountId
            | VersionByte::SecretSeed
            | VersionByte::PreAuthTx
            | VersionByte::HashX
            | VersionByte::Contract
            | VersionByte::LiquidityPool => {
                if payload.len() != KEY_LEN {
                    return Err(invalid_length());
                }
            }
            VersionByte::MuxedAccount => {
                if payload.len() != KEY_LEN + 8 {
                    return Err(invalid_length());
                }
            }
            VersionByte::ClaimableBalance => {
                if payload.len() != KEY_LEN + 1 {
                    return Err(invalid_length());
                }
                if payload[0] != CLAIMABLE_BALANCE_V0 {
                    return Err(StrKeyError::InvalidPayload(format!(
                        "unknown claimable balance id type {}",
                        payload[0]
                    )));
                }
            }
            VersionByte::SignedPayload => {
                let min = KEY_LEN + 4 + 4;
                let max = KEY_LEN + 4 + MAX_SIGNED_PAYLOAD_LEN;
                if payload.len() < min || payload.len() > max {
                    return Err(invalid_length());
                }
                let mut len_bytes = [0u8; 4];
                len_bytes.copy_from_slice(&payload[KEY_LEN..KEY_LEN + 4]);
                let inner_len = u32::from_be_bytes(len_bytes) as usize;
                if inner_len == 0 || inner_len > MAX_SIGNED_PAYLOAD_LEN {
                    return Err(StrKeyError::InvalidPayload(format!(
                        "signed payload length {inner_len} out of range"
                    )));
                }
                let padded = inner_len.div_ceil(4) * 4;
                if payload.len() != KEY_LEN + 4 + padded {
                    return Err(invalid_length());
                }
                if payload[KEY_LEN + 4 + inner_len..].iter().any(|b| *b != 0) {
                    return Err(StrKeyError::InvalidPayload(
                        "signed payload padding must be zero".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// CRC16/XMODEM: polynomial 0x1021, initial value 0, no reflection.
pub fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Encodes a payload under the given version byte.
///
/// The payload is written as given; use the typed helpers below to get
/// payload validation for free.
pub fn encode(version: VersionByte, payload: &[u8]) -> String {
    let mut data = Zeroizing::new(Vec::with_capacity(1 + payload.len() + CHECKSUM_LEN));
    data.push(version as u8);
    data.extend_from_slice(payload);
    let checksum = crc16_xmodem(&data);
    data.extend_from_slice(&checksum.to_le_bytes());
    BASE32_NOPAD.encode(&data)
}

/// Decodes any supported StrKey into its version byte and payload.
pub fn decode(text: &str) -> Result<(VersionByte, Vec<u8>), StrKeyError> {
    let data = Zeroizing::new(
        BASE32_NOPAD
            .decode(text.as_bytes())
            .map_err(|e| StrKeyError::InvalidEncoding(e.to_string()))?,
    );

    if data.len() < 1 + CHECKSUM_LEN {
        return Err(StrKeyError::InvalidLength {
            version: data.first().copied().unwrap_or_default(),
            actual: data.len().saturating_sub(1 + CHECKSUM_LEN),
        });
    }

    let version = VersionByte::from_byte(data[0])?;
    let (body, checksum_bytes) = data.split_at(data.len() - CHECKSUM_LEN);
    let payload = &body[1..];
    version.check_payload(payload)?;

    let expected = crc16_xmodem(body);
    let actual = u16::from_le_bytes([checksum_bytes[0], checksum_bytes[1]]);
    if expected != actual {
        debug!("strkey checksum mismatch for version {}", version);
        return Err(StrKeyError::ChecksumMismatch { expected, actual });
    }

    Ok((version, payload.to_vec()))
}

/// Decodes a StrKey that must carry the `expected` version byte.
pub fn decode_version(expected: VersionByte, text: &str) -> Result<Vec<u8>, StrKeyError> {
    let (version, payload) = decode(text)?;
    if version != expected {
        return Err(StrKeyError::UnexpectedVersionByte {
            expected: expected as u8,
            actual: version as u8,
        });
    }
    Ok(payload)
}

fn decode_key(expected: VersionByte, text: &str) -> Result<[u8; KEY_LEN], StrKeyError> {
    let payload = Zeroizing::new(decode_version(expected, text)?);
    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&payload[..KEY_LEN]);
    Ok(key)
}

pub fn encode_ed25519_public_key(key: &[u8; KEY_LEN]) -> String {
    encode(VersionByte::AccountId, key)
}

pub fn decode_ed25519_public_key(text: &str) -> Result<[u8; KEY_LEN], StrKeyError> {
    decode_key(VersionByte::AccountId, text)
}

pub fn encode_ed25519_secret_seed(seed: &[u8; KEY_LEN]) -> Zeroizing<String> {
    Zeroizing::new(encode(VersionByte::SecretSeed, seed))
}

pub fn decode_ed25519_secret_seed(text: &str) -> Result<Zeroizing<[u8; KEY_LEN]>, StrKeyError> {
    decode_key(VersionByte::SecretSeed, text).map(Zeroizing::new)
}

pub fn encode_pre_auth_tx(hash: &[u8; KEY_LEN]) -> String {
    encode(VersionByte::PreAuthTx, hash)
}

pub fn decode_pre_auth_tx(text: &str) -> Result<[u8; KEY_LEN], StrKeyError> {
    decode_key(VersionByte::PreAuthTx, text)
}

pub fn encode_sha256_hash(hash: &[u8; KEY_LEN]) -> String {
    encode(VersionByte::HashX, hash)
}

pub fn decode_sha256_hash(text: &str) -> Result<[u8; KEY_LEN], StrKeyError> {
    decode_key(VersionByte::HashX, text)
}

pub fn encode_contract(id: &[u8; KEY_LEN]) -> String {
    encode(VersionByte::Contract, id)
}

pub fn decode_contract(text: &str) -> Result<[u8; KEY_LEN], StrKeyError> {
    decode_key(VersionByte::Contract, text)
}

pub fn encode_liquidity_pool(id: &[u8; KEY_LEN]) -> String {
    encode(VersionByte::LiquidityPool, id)
}

pub fn decode_liquidity_pool(text: &str) -> Result<[u8; KEY_LEN], StrKeyError> {
    decode_key(VersionByte::LiquidityPool, text)
}

/// Muxed account payload: the ed25519 key followed by the big-endian id.
pub fn encode_muxed_account(key: &[u8; KEY_LEN], id: u64) -> String {
    let mut payload = Vec::with_capacity(KEY_LEN + 8);
    payload.extend_from_slice(key);
    payload.extend_from_slice(&id.to_be_bytes());
    encode(VersionByte::MuxedAccount, &payload)
}

pub fn decode_muxed_account(text: &str) -> Result<([u8; KEY_LEN], u64), StrKeyError> {
    let payload = decode_version(VersionByte::MuxedAccount, text)?;
    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&payload[..KEY_LEN]);
    let mut id = [0u8; 8];
    id.copy_from_slice(&payload[KEY_LEN..]);
    Ok((key, u64::from_be_bytes(id)))
}

/// Claimable balance ids are encoded with a leading sub-type byte (V0 only).
pub fn encode_claimable_balance(hash: &[u8; KEY_LEN]) -> String {
    let mut payload = Vec::with_capacity(KEY_LEN + 1);
    payload.push(CLAIMABLE_BALANCE_V0);
    payload.extend_from_slice(hash);
    encode(VersionByte::ClaimableBalance, &payload)
}

pub fn decode_claimable_balance(text: &str) -> Result<[u8; KEY_LEN], StrKeyError> {
    let payload = decode_version(VersionByte::ClaimableBalance, text)?;
    let mut hash = [0u8; KEY_LEN];
    hash.copy_from_slice(&payload[1..]);
    Ok(hash)
}

/// Signed payload signer: ed25519 key, u32 payload length, zero-padded payload.
pub fn encode_signed_payload(key: &[u8; KEY_LEN], payload: &[u8]) -> Result<String, StrKeyError> {
    if payload.is_empty() || payload.len() > MAX_SIGNED_PAYLOAD_LEN {
        return Err(StrKeyError::InvalidPayload(format!(
            "signed payload length {} out of range",
            payload.len()
        )));
    }
    let padded = payload.len().div_ceil(4) * 4;
    let mut raw = Vec::with_capacity(KEY_LEN + 4 + padded);
    raw.extend_from_slice(key);
    raw.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    raw.extend_from_slice(payload);
    raw.resize(KEY_LEN + 4 + padded, 0);
    Ok(encode(VersionByte::SignedPayload, &raw))
}

pub fn decode_signed_payload(text: &str) -> Result<([u8; KEY_LEN], Vec<u8>), StrKeyError> {
    let raw = decode_version(VersionByte::SignedPayload, text)?;
    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&raw[..KEY_LEN]);
    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&raw[KEY_LEN..KEY_LEN + 4]);
    let len = u32::from_be_bytes(len_bytes) as usize;
    Ok((key, raw[KEY_LEN + 4..KEY_LEN + 4 + len].to_vec()))
}

pub fn is_valid_ed25519_public_key(text: &str) -> bool {
    decode_ed25519_public_key(text).is_ok()
}

pub fn is_valid_ed25519_secret_seed(text: &str) -> bool {
    decode_ed25519_secret_seed(text).is_ok()
}

pub fn is_valid_pre_auth_tx(text: &str) -> bool {
    decode_pre_auth_tx(text).is_ok()
}

pub fn is_valid_sha256_hash(text: &str) -> bool {
    decode_sha256_hash(text).is_ok()
}

pub fn is_valid_muxed_account(text: &str) -> bool {
    decode_muxed_account(text).is_ok()
}

pub fn is_valid_signed_payload(text: &str) -> bool {
    decode_signed_payload(text).is_ok()
}

pub fn is_valid_contract(text: &str) -> bool {
    decode_contract(text).is_ok()
}

pub fn is_valid_liquidity_pool(text: &str) -> bool {
    decode_liquidity_pool(text).is_ok()
}

pub fn is_valid_claimable_balance(text: &str) -> bool {
    decode_claimable_balance(text).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const KEY_HEX: &str = "3f0c34bf93ad0d9971d04ccc90f705511c838aad9734a4a2fb0d7a03fc7fe89a";
    const ACCOUNT: &str = "GA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVSGZ";

    fn key() -> [u8; 32] {
        hex::decode(KEY_HEX).unwrap().try_into().unwrap()
    }

    /// A structurally valid payload for every version byte.
    fn sample_payload(version: VersionByte) -> Vec<u8> {
        match version {
            VersionByte::MuxedAccount => [&key()[..], &42u64.to_be_bytes()[..]].concat(),
            VersionByte::ClaimableBalance => [&[0u8][..], &key()[..]].concat(),
            VersionByte::SignedPayload => {
                [&key()[..], &3u32.to_be_bytes()[..], &[1u8, 2, 3, 0][..]].concat()
            }
            _ => key().to_vec(),
        }
    }

    #[test]
    fn test_crc16_xmodem_check_value() {
        assert_eq!(crc16_xmodem(b"123456789"), 0x31c3);
    }

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            encode_ed25519_public_key(&[0u8; 32]),
            "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF"
        );
        assert_eq!(encode_ed25519_public_key(&key()), ACCOUNT);
        assert_eq!(
            encode_muxed_account(&key(), 0),
            "MA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJUAAAAAAAAAAAACJUQ"
        );
        assert_eq!(
            encode_muxed_account(&key(), 9223372036854775808),
            "MA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVAAAAAAAAAAAAAJLK"
        );
        assert_eq!(
            encode_contract(&key()),
            "CA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJUWDA"
        );
        assert_eq!(
            encode_claimable_balance(&key()),
            "BAAD6DBUX6J22DMZOHIEZTEQ64CVCHEDRKWZONFEUL5Q26QD7R76RGR4TU"
        );
        assert_eq!(
            encode_liquidity_pool(&key()),
            "LA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJUPJN"
        );
        assert_eq!(
            encode_ed25519_secret_seed(&[0u8; 32]).as_str(),
            "SAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABSU2"
        );
    }

    #[test]
    fn test_signed_payload_vectors() {
        let payload: Vec<u8> = (1..=32).collect();
        let encoded = encode_signed_payload(&key(), &payload).unwrap();
        assert_eq!(
            encoded,
            "PA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJUAAAAAQACAQDAQCQMBYIBEFAWDANBYHRAEISCMKBKFQXDAMRUGY4DUPB6IBZGM"
        );
        assert_eq!(decode_signed_payload(&encoded).unwrap(), (key(), payload));

        let payload: Vec<u8> = (1..=29).collect();
        let encoded = encode_signed_payload(&key(), &payload).unwrap();
        assert_eq!(
            encoded,
            "PA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJUAAAAAOQCAQDAQCQMBYIBEFAWDANBYHRAEISCMKBKFQXDAMRUGY4DUAAAAFGBU"
        );
        assert_eq!(decode_signed_payload(&encoded).unwrap(), (key(), payload));
    }

    #[test]
    fn test_signed_payload_bounds() {
        assert!(encode_signed_payload(&key(), &[]).is_err());
        assert!(encode_signed_payload(&key(), &[7u8; 65]).is_err());
        assert!(encode_signed_payload(&key(), &[7u8; 64]).is_ok());
    }

    #[test]
    fn test_signed_payload_rejects_non_zero_padding() {
        let raw = [&key()[..], &3u32.to_be_bytes()[..], &[1u8, 2, 3, 9][..]].concat();
        let text = encode(VersionByte::SignedPayload, &raw);
        assert!(matches!(
            decode(&text),
            Err(StrKeyError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_signed_payload_rejects_inconsistent_length() {
        // declares 8 bytes but only carries 4
        let raw = [&key()[..], &8u32.to_be_bytes()[..], &[1u8, 2, 3, 4][..]].concat();
        let text = encode(VersionByte::SignedPayload, &raw);
        assert!(matches!(
            decode(&text),
            Err(StrKeyError::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_muxed_account_round_trip() {
        let text = encode_muxed_account(&key(), u64::MAX);
        assert_eq!(decode_muxed_account(&text).unwrap(), (key(), u64::MAX));
    }

    #[test]
    fn test_invalid_alphabet() {
        let lower = ACCOUNT.to_lowercase();
        assert!(matches!(
            decode(&lower),
            Err(StrKeyError::InvalidEncoding(_))
        ));
        let mut bad = ACCOUNT.to_string();
        bad.replace_range(10..11, "1");
        assert!(matches!(decode(&bad), Err(StrKeyError::InvalidEncoding(_))));
    }

    #[test]
    fn test_invalid_length() {
        let text = encode(VersionByte::AccountId, &[0u8; 31]);
        assert_eq!(
            decode(&text),
            Err(StrKeyError::InvalidLength {
                version: VersionByte::AccountId as u8,
                actual: 31
            })
        );
        let text = encode(VersionByte::MuxedAccount, &[0u8; 32]);
        assert!(matches!(
            decode(&text),
            Err(StrKeyError::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_unknown_version_byte() {
        let text = encode_with_raw_version(5 << 3, &[0u8; 32]);
        assert_eq!(decode(&text), Err(StrKeyError::UnknownVersionByte(5 << 3)));
    }

    fn encode_with_raw_version(version: u8, payload: &[u8]) -> String {
        let mut data = vec![version];
        data.extend_from_slice(payload);
        let checksum = crc16_xmodem(&data);
        data.extend_from_slice(&checksum.to_le_bytes());
        BASE32_NOPAD.encode(&data)
    }

    #[test]
    fn test_unexpected_version_byte() {
        let seed = encode_ed25519_secret_seed(&[1u8; 32]);
        assert_eq!(
            decode_ed25519_public_key(&seed),
            Err(StrKeyError::UnexpectedVersionByte {
                expected: VersionByte::AccountId as u8,
                actual: VersionByte::SecretSeed as u8
            })
        );
        assert!(!is_valid_ed25519_public_key(&seed));
        assert!(is_valid_ed25519_secret_seed(&seed));
    }

    #[test]
    fn test_checksum_bit_flips_fail_for_every_version() {
        for version in VersionByte::iter() {
            let payload = sample_payload(version);
            let text = encode(version, &payload);
            assert_eq!(decode(&text).unwrap(), (version, payload.clone()));

            let mut raw = BASE32_NOPAD.decode(text.as_bytes()).unwrap();
            let checksum_start = raw.len() - 2;
            for byte in checksum_start..raw.len() {
                for bit in 0..8 {
                    raw[byte] ^= 1 << bit;
                    let corrupted = BASE32_NOPAD.encode(&raw);
                    assert!(
                        matches!(
                            decode(&corrupted),
                            Err(StrKeyError::ChecksumMismatch { .. })
                        ),
                        "bit {bit} of byte {byte} for {version}"
                    );
                    raw[byte] ^= 1 << bit;
                }
            }
        }
    }

    #[test]
    fn test_prefixes() {
        for version in VersionByte::iter() {
            let text = encode(version, &sample_payload(version));
            assert!(text.starts_with(version.prefix()), "{version}");
        }
    }

    #[test]
    fn test_is_valid_predicates() {
        assert!(is_valid_ed25519_public_key(ACCOUNT));
        assert!(!is_valid_ed25519_public_key("GBAD"));
        assert!(is_valid_contract(&encode_contract(&key())));
        assert!(is_valid_liquidity_pool(&encode_liquidity_pool(&key())));
        assert!(is_valid_claimable_balance(&encode_claimable_balance(&key())));
        assert!(is_valid_muxed_account(&encode_muxed_account(&key(), 1)));
        assert!(is_valid_pre_auth_tx(&encode_pre_auth_tx(&key())));
        assert!(is_valid_sha256_hash(&encode_sha256_hash(&key())));
        assert!(is_valid_signed_payload(
            &encode_signed_payload(&key(), &[1]).unwrap()
        ));
        assert!(!is_valid_contract(ACCOUNT));
    }

    #[test]
    fn test_claimable_balance_rejects_unknown_sub_type() {
        let raw = [&[1u8][..], &key()[..]].concat();
        let text = encode(VersionByte::ClaimableBalance, &raw);
        assert!(matches!(decode(&text), Err(StrKeyError::InvalidPayload(_))));
    }

    proptest! {
        #[test]
        fn prop_account_id_round_trip(bytes in any::<[u8; 32]>()) {
            let text = encode_ed25519_public_key(&bytes);
            prop_assert_eq!(decode(&text).unwrap(), (VersionByte::AccountId, bytes.to_vec()));
        }

        #[test]
        fn prop_signed_payload_round_trip(
            k in any::<[u8; 32]>(),
            payload in proptest::collection::vec(any::<u8>(), 1..=64),
        ) {
            let text = encode_signed_payload(&k, &payload).unwrap();
            prop_assert_eq!(decode_signed_payload(&text).unwrap(), (k, payload));
        }
    }
}
