//! Consensus-engine secp256k1 keys
//!
//! Mirrors the consensus engine's key model:
//! - `PrivKey`: 32-byte scalar
//! - `PubKey`: 33-byte compressed point, address = RIPEMD160(SHA256(key))
//! - `PublicKeyProto`: the `tendermint.crypto.PublicKey` protobuf oneof
//!
//! None of these types check that their bytes lie on the curve. That
//! happens when they are converted into standard-curve keys.

use std::fmt;

use secp256k1::{PublicKey, Secp256k1, SecretKey};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{K1Error, K1Result};
use crate::types::{PrivKeyBytes, PubKeyBytes, ADDRESS_LEN, PRIV_KEY_LEN, PUBKEY_COMPRESSED_LEN};
use crate::utils::crypto::hash160;

// MARK: - Private Key

/// Consensus-engine secp256k1 private key. Wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivKey([u8; PRIV_KEY_LEN]);

impl PrivKey {
    pub fn new(bytes: [u8; PRIV_KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> K1Result<Self> {
        let arr: [u8; PRIV_KEY_LEN] = bytes
            .try_into()
            .map_err(|_| K1Error::invalid_length("private key", PRIV_KEY_LEN, bytes.len()))?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; PRIV_KEY_LEN] {
        &self.0
    }

    /// Derive the compressed public key. Fails for the zero scalar or one
    /// not below the curve order.
    pub fn pub_key(&self) -> K1Result<PubKey> {
        let secret = SecretKey::from_slice(&self.0)
            .map_err(|e| K1Error::conversion("parse private key", e))?;
        let public = PublicKey::from_secret_key(&Secp256k1::signing_only(), &secret);
        Ok(PubKey(public.serialize()))
    }
}

impl PrivKeyBytes for PrivKey {
    fn priv_key_bytes(&self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(self.0.to_vec())
    }
}

impl fmt::Debug for PrivKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivKey([REDACTED])")
    }
}

// MARK: - Public Key

/// Consensus-engine secp256k1 public key (compressed).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PubKey(#[serde(with = "crate::serde_bytes::hex_array")] [u8; PUBKEY_COMPRESSED_LEN]);

impl PubKey {
    pub fn new(bytes: [u8; PUBKEY_COMPRESSED_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> K1Result<Self> {
        let arr: [u8; PUBKEY_COMPRESSED_LEN] = bytes
            .try_into()
            .map_err(|_| K1Error::invalid_length("pubkey", PUBKEY_COMPRESSED_LEN, bytes.len()))?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; PUBKEY_COMPRESSED_LEN] {
        &self.0
    }

    /// Validator address: RIPEMD160(SHA256(key)).
    pub fn address(&self) -> [u8; ADDRESS_LEN] {
        hash160(&self.0)
    }
}

impl PubKeyBytes for PubKey {
    fn pub_key_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl fmt::Debug for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PubKeySecp256k1{{{}}}", hex::encode_upper(self.0))
    }
}

// MARK: - Protobuf Public Key

/// Field number of `ed25519` in `tendermint.crypto.PublicKey`.
const FIELD_ED25519: u64 = 1;
/// Field number of `secp256k1` in `tendermint.crypto.PublicKey`.
const FIELD_SECP256K1: u64 = 2;

const WIRE_VARINT: u64 = 0;
const WIRE_FIXED64: u64 = 1;
const WIRE_LEN: u64 = 2;
const WIRE_FIXED32: u64 = 5;

/// The `sum` oneof of `tendermint.crypto.PublicKey`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKeySum {
    Ed25519(Vec<u8>),
    Secp256k1(Vec<u8>),
}

/// `tendermint.crypto.PublicKey`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicKeyProto {
    pub sum: Option<PublicKeySum>,
}

impl PublicKeyProto {
    pub fn secp256k1(key: Vec<u8>) -> Self {
        Self {
            sum: Some(PublicKeySum::Secp256k1(key)),
        }
    }

    pub fn ed25519(key: Vec<u8>) -> Self {
        Self {
            sum: Some(PublicKeySum::Ed25519(key)),
        }
    }

    /// The secp256k1 key bytes, or an empty slice when another (or no)
    /// variant is set.
    pub fn get_secp256k1(&self) -> &[u8] {
        match &self.sum {
            Some(PublicKeySum::Secp256k1(key)) => key,
            _ => &[],
        }
    }

    pub fn get_ed25519(&self) -> &[u8] {
        match &self.sum {
            Some(PublicKeySum::Ed25519(key)) => key,
            _ => &[],
        }
    }

    /// Protobuf wire encoding. A set oneof member is always written, even
    /// when empty.
    pub fn encode_to_vec(&self) -> Vec<u8> {
        let (field, key) = match &self.sum {
            Some(PublicKeySum::Ed25519(key)) => (FIELD_ED25519, key),
            Some(PublicKeySum::Secp256k1(key)) => (FIELD_SECP256K1, key),
            None => return Vec::new(),
        };

        let mut out = Vec::with_capacity(key.len() + 3);
        encode_varint((field << 3) | WIRE_LEN, &mut out);
        encode_varint(key.len() as u64, &mut out);
        out.extend_from_slice(key);
        out
    }

    /// Decode the protobuf wire encoding. Unknown fields are skipped; when
    /// the oneof appears more than once the last occurrence wins.
    pub fn decode(mut buf: &[u8]) -> K1Result<Self> {
        let mut msg = Self::default();

        while !buf.is_empty() {
            let tag = decode_varint(&mut buf)?;
            let field = tag >> 3;
            let wire_type = tag & 0x7;
            if field == 0 {
                return Err(K1Error::decode("decode pubkey proto", "field number 0"));
            }

            match (field, wire_type) {
                (FIELD_ED25519, WIRE_LEN) => {
                    msg.sum = Some(PublicKeySum::Ed25519(take_len_delimited(&mut buf)?.to_vec()));
                }
                (FIELD_SECP256K1, WIRE_LEN) => {
                    msg.sum = Some(PublicKeySum::Secp256k1(take_len_delimited(&mut buf)?.to_vec()));
                }
                (FIELD_ED25519 | FIELD_SECP256K1, other) => {
                    return Err(K1Error::decode(
                        "decode pubkey proto",
                        format!("field {} has wire type {}, want {}", field, other, WIRE_LEN),
                    ));
                }
                (_, wire_type) => skip_field(wire_type, &mut buf)?,
            }
        }

        Ok(msg)
    }
}

fn encode_varint(mut value: u64, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

fn decode_varint<'a>(buf: &mut &'a [u8]) -> K1Result<u64> {
    let mut value = 0u64;
    for i in 0..10 {
        let data: &'a [u8] = *buf;
        let Some((&byte, rest)) = data.split_first() else {
            return Err(K1Error::decode("decode pubkey proto", "truncated varint"));
        };
        *buf = rest;
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte < 0x80 {
            return Ok(value);
        }
    }
    Err(K1Error::decode("decode pubkey proto", "varint overflow"))
}

fn take_len_delimited<'a>(buf: &mut &'a [u8]) -> K1Result<&'a [u8]> {
    let len = decode_varint(buf)?;
    let len = usize::try_from(len)
        .ok()
        .filter(|len| *len <= buf.len())
        .ok_or_else(|| K1Error::decode("decode pubkey proto", "length exceeds buffer"))?;
    let data: &'a [u8] = *buf;
    let (head, tail) = data.split_at(len);
    *buf = tail;
    Ok(head)
}

fn skip_field(wire_type: u64, buf: &mut &[u8]) -> K1Result<()> {
    let skip = match wire_type {
        WIRE_VARINT => {
            decode_varint(buf)?;
            return Ok(());
        }
        WIRE_LEN => {
            take_len_delimited(buf)?;
            return Ok(());
        }
        WIRE_FIXED64 => 8,
        WIRE_FIXED32 => 4,
        other => {
            return Err(K1Error::decode(
                "decode pubkey proto",
                format!("unsupported wire type {}", other),
            ))
        }
    };
    if buf.len() < skip {
        return Err(K1Error::decode("decode pubkey proto", "truncated fixed field"));
    }
    let data: &[u8] = *buf;
    *buf = &data[skip..];
    Ok(())
}
