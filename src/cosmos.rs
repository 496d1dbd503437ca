//! SDK secp256k1 keys and bech32 addresses
//!
//! Address bytes are RIPEMD160(SHA256(compressed key)), the same as the
//! consensus engine's, rendered with an account or validator prefix.

use std::fmt;

use bech32::{FromBase32, ToBase32, Variant};
use serde::{Deserialize, Serialize};

use crate::config::AddressConfig;
use crate::error::{K1Error, K1Result};
use crate::types::{PubKeyBytes, ADDRESS_LEN, PUBKEY_COMPRESSED_LEN};
use crate::utils::crypto::hash160;

/// SDK secp256k1 public key (compressed)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PubKey {
    #[serde(with = "crate::serde_bytes::hex_array")]
    key: [u8; PUBKEY_COMPRESSED_LEN],
}

impl PubKey {
    pub fn from_slice(bytes: &[u8]) -> K1Result<Self> {
        let key: [u8; PUBKEY_COMPRESSED_LEN] = bytes
            .try_into()
            .map_err(|_| K1Error::invalid_length("pubkey", PUBKEY_COMPRESSED_LEN, bytes.len()))?;
        Ok(Self { key })
    }

    pub fn key(&self) -> &[u8; PUBKEY_COMPRESSED_LEN] {
        &self.key
    }

    pub fn address(&self) -> [u8; ADDRESS_LEN] {
        hash160(&self.key)
    }

    pub fn acc_address(&self) -> AccAddress {
        AccAddress(self.address())
    }

    pub fn val_address(&self) -> ValAddress {
        ValAddress(self.address())
    }
}

impl PubKeyBytes for PubKey {
    fn pub_key_bytes(&self) -> Vec<u8> {
        self.key.to_vec()
    }
}

impl fmt::Debug for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PubKeySecp256k1{{{}}}", hex::encode_upper(self.key))
    }
}

/// Account (delegator) address bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccAddress(pub [u8; ADDRESS_LEN]);

/// Validator operator address bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValAddress(pub [u8; ADDRESS_LEN]);

impl AccAddress {
    pub fn to_bech32(&self, config: &AddressConfig) -> K1Result<String> {
        encode_bech32(&config.account_prefix, &self.0)
    }

    pub fn from_bech32(s: &str, config: &AddressConfig) -> K1Result<Self> {
        decode_bech32(s, &config.account_prefix).map(Self)
    }
}

impl ValAddress {
    pub fn to_bech32(&self, config: &AddressConfig) -> K1Result<String> {
        encode_bech32(&config.validator_prefix, &self.0)
    }

    pub fn from_bech32(s: &str, config: &AddressConfig) -> K1Result<Self> {
        decode_bech32(s, &config.validator_prefix).map(Self)
    }
}

/// Encode address bytes with the given HRP
fn encode_bech32(hrp: &str, bytes: &[u8]) -> K1Result<String> {
    bech32::encode(hrp, bytes.to_base32(), Variant::Bech32)
        .map_err(|e| K1Error::conversion("bech32 encode", e))
}

fn decode_bech32(s: &str, expected_hrp: &str) -> K1Result<[u8; ADDRESS_LEN]> {
    let (hrp, data, variant) = bech32::decode(s)?;
    if variant != Variant::Bech32 {
        return Err(K1Error::decode("bech32 decode", "expected bech32, got bech32m"));
    }
    if hrp != expected_hrp {
        return Err(K1Error::decode(
            "bech32 decode",
            format!("invalid prefix: expected {}, got {}", expected_hrp, hrp),
        ));
    }

    let bytes = Vec::<u8>::from_base32(&data)?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| K1Error::invalid_length("address", ADDRESS_LEN, actual))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pubkey_length() {
        assert!(PubKey::from_slice(&[0x02; 33]).is_ok());
        assert_eq!(
            PubKey::from_slice(&[0x02; 32]).unwrap_err(),
            K1Error::invalid_length("pubkey", 33, 32)
        );
    }

    #[test]
    fn test_acc_and_val_address_share_bytes() {
        let pubkey = PubKey::from_slice(&[0x03; 33]).unwrap();
        assert_eq!(pubkey.acc_address().0, pubkey.val_address().0);
        assert_eq!(pubkey.acc_address().0, hash160(&[0x03; 33]));
    }

    #[test]
    fn test_bech32_roundtrip() {
        let config = AddressConfig::story();
        let addr = AccAddress([7u8; 20]);

        let encoded = addr.to_bech32(&config).unwrap();
        assert!(encoded.starts_with("story1"));
        assert_eq!(AccAddress::from_bech32(&encoded, &config).unwrap(), addr);

        let val = ValAddress([7u8; 20]);
        let encoded_val = val.to_bech32(&config).unwrap();
        assert!(encoded_val.starts_with("storyvaloper1"));
        assert_eq!(ValAddress::from_bech32(&encoded_val, &config).unwrap(), val);
    }

    #[test]
    fn test_bech32_rejects_wrong_prefix() {
        let config = AddressConfig::story();
        let encoded = AccAddress([7u8; 20]).to_bech32(&AddressConfig::cosmos_hub()).unwrap();
        assert!(AccAddress::from_bech32(&encoded, &config).is_err());
        assert!(AccAddress::from_bech32("story1notbech32", &config).is_err());
    }

    #[test]
    fn test_cosmos_hub_address_shape() {
        let pubkey = PubKey::from_slice(&[0x02; 33]).unwrap();
        let addr = pubkey.acc_address().to_bech32(&AddressConfig::cosmos_hub()).unwrap();
        assert!(addr.starts_with("cosmos1"));
        // 20 bytes -> 32 data chars + 6 checksum chars
        assert_eq!(addr.len(), "cosmos1".len() + 38);
    }
}
