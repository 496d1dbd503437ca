//! Key and Address Conversions
//!
//! Moves secp256k1 keys between the consensus engine, SDK and
//! standard-curve representations, and derives addresses from them.
//!
//! Every function checks input length before touching the curve library.
//! Decompression of a point that is not on the curve is a
//! [`K1Error::Decode`], never a panic.

use secp256k1::{PublicKey, SecretKey};

use crate::comet::{self, PublicKeyProto};
use crate::config::AddressConfig;
use crate::cosmos;
use crate::error::{K1Error, K1Result};
use crate::types::{
    Address, PrivKeyBytes, PubKeyBytes, PRIV_KEY_LEN, PUBKEY_BYTES64_LEN, PUBKEY_COMPRESSED_LEN,
    PUBKEY_UNCOMPRESSED_LEN, PUBKEY_UNCOMPRESSED_PREFIX,
};
use crate::utils::encoding::decode_fixed;

/// Ethereum address of a compressed secp256k1 public key.
pub fn pubkey_to_address<K>(pubkey: &K) -> K1Result<Address>
where
    K: PubKeyBytes + ?Sized,
{
    compressed_to_address(&pubkey.pub_key_bytes())
}

/// Ethereum address of a protobuf-wrapped secp256k1 public key.
///
/// A message carrying an ed25519 key, or no key, has an empty secp256k1
/// payload and fails the length check.
pub fn pubkey_pb_to_address(pubkey: &PublicKeyProto) -> K1Result<Address> {
    compressed_to_address(pubkey.get_secp256k1())
}

/// Ethereum address of a 33-byte SDK public key.
pub fn cosmos_pubkey_to_evm_address(pubkey_cmp: &[u8]) -> K1Result<Address> {
    compressed_to_address(pubkey_cmp)
}

fn compressed_to_address(bytes: &[u8]) -> K1Result<Address> {
    if bytes.len() != PUBKEY_COMPRESSED_LEN {
        return Err(K1Error::invalid_length("pubkey", PUBKEY_COMPRESSED_LEN, bytes.len()));
    }

    let pubkey = PublicKey::from_slice(bytes).map_err(|e| K1Error::decode("decompress pubkey", e))?;
    Ok(Address::from_pubkey(&pubkey))
}

// MARK: - Private keys

pub fn std_privkey_to_comet(privkey: &SecretKey) -> K1Result<comet::PrivKey> {
    comet::PrivKey::from_slice(&privkey.priv_key_bytes())
}

/// Standard-curve key from a consensus-engine key. The scalar must be
/// non-zero and below the curve order.
pub fn std_privkey_from_comet<K>(privkey: &K) -> K1Result<SecretKey>
where
    K: PrivKeyBytes + ?Sized,
{
    let bz = privkey.priv_key_bytes();
    if bz.len() != PRIV_KEY_LEN {
        return Err(K1Error::invalid_length("private key", PRIV_KEY_LEN, bz.len()));
    }

    SecretKey::from_slice(&bz).map_err(|e| K1Error::conversion("convert to ECDSA", e))
}

// MARK: - SDK and protobuf wrappers

pub fn std_pubkey_to_cosmos(pubkey: &PublicKey) -> K1Result<cosmos::PubKey> {
    pubkey_bytes_to_cosmos(&pubkey.serialize())
}

pub fn pubkey_to_cosmos<K>(pubkey: &K) -> K1Result<cosmos::PubKey>
where
    K: PubKeyBytes + ?Sized,
{
    pubkey_bytes_to_cosmos(&pubkey.pub_key_bytes())
}

pub fn pubkey_bytes_to_cosmos(pubkey: &[u8]) -> K1Result<cosmos::PubKey> {
    cosmos::PubKey::from_slice(pubkey)
}

pub fn pb_pubkey_from_bytes(pubkey: &[u8]) -> K1Result<PublicKeyProto> {
    if pubkey.len() != PUBKEY_COMPRESSED_LEN {
        return Err(K1Error::invalid_length("pubkey", PUBKEY_COMPRESSED_LEN, pubkey.len()));
    }

    Ok(PublicKeyProto::secp256k1(pubkey.to_vec()))
}

// MARK: - 64-byte uncompressed form

/// Uncompressed public key with the `0x04` prefix removed.
pub fn pubkey_to_bytes64(pubkey: &PublicKey) -> [u8; PUBKEY_BYTES64_LEN] {
    let uncompressed = pubkey.serialize_uncompressed();
    let mut out = [0u8; PUBKEY_BYTES64_LEN];
    out.copy_from_slice(&uncompressed[1..]);
    out
}

/// Public key from its 64-byte `X || Y` form. The `0x04` prefix is added
/// back before parsing; off-curve points are rejected.
pub fn pubkey_from_bytes64(pubkey: &[u8]) -> K1Result<PublicKey> {
    if pubkey.len() != PUBKEY_BYTES64_LEN {
        return Err(K1Error::invalid_length("pubkey", PUBKEY_BYTES64_LEN, pubkey.len()));
    }

    let mut full = [0u8; PUBKEY_UNCOMPRESSED_LEN];
    full[0] = PUBKEY_UNCOMPRESSED_PREFIX;
    full[1..].copy_from_slice(pubkey);

    PublicKey::from_slice(&full).map_err(|e| K1Error::decode("unmarshal pubkey", e))
}

// MARK: - Hex input

/// Bech32 account address for a hex compressed key, default prefixes.
pub fn cmp_pubkey_to_delegator_address(cmp_pubkey_hex: &str) -> K1Result<String> {
    cmp_pubkey_to_delegator_address_with(cmp_pubkey_hex, &AddressConfig::default())
}

pub fn cmp_pubkey_to_delegator_address_with(
    cmp_pubkey_hex: &str,
    config: &AddressConfig,
) -> K1Result<String> {
    decode_pubkey_from_hex(cmp_pubkey_hex)?.acc_address().to_bech32(config)
}

/// Bech32 validator operator address for a hex compressed key, default
/// prefixes.
pub fn cmp_pubkey_to_validator_address(cmp_pubkey_hex: &str) -> K1Result<String> {
    cmp_pubkey_to_validator_address_with(cmp_pubkey_hex, &AddressConfig::default())
}

pub fn cmp_pubkey_to_validator_address_with(
    cmp_pubkey_hex: &str,
    config: &AddressConfig,
) -> K1Result<String> {
    decode_pubkey_from_hex(cmp_pubkey_hex)?.val_address().to_bech32(config)
}

/// The key is only length-checked, not decompressed.
fn decode_pubkey_from_hex(pubkey_hex: &str) -> K1Result<cosmos::PubKey> {
    let bytes = decode_fixed::<PUBKEY_COMPRESSED_LEN>(pubkey_hex, "pubkey")?;
    cosmos::PubKey::from_slice(&bytes)
}
