//! Fixed-length value types shared by every conversion.
//!
//! Each type owns an array of its exact size, so a value that exists is
//! already the right length. Constructors from slices check the length
//! and return [`K1Error::InvalidLength`] otherwise.

use std::fmt;
use std::str::FromStr;

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{PublicKey, SecretKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroizing;

use crate::error::{K1Error, K1Result};
use crate::utils::crypto::{keccak256, to_checksum_address};

/// Length of a secp256k1 private key.
pub const PRIV_KEY_LEN: usize = 32;
/// Length of a secp256k1 compressed public key.
pub const PUBKEY_COMPRESSED_LEN: usize = 33;
/// Length of a secp256k1 uncompressed public key, prefix included.
pub const PUBKEY_UNCOMPRESSED_LEN: usize = 65;
/// Length of an uncompressed public key without its prefix.
pub const PUBKEY_BYTES64_LEN: usize = PUBKEY_UNCOMPRESSED_LEN - 1;
/// Prefix byte of an uncompressed public key.
pub const PUBKEY_UNCOMPRESSED_PREFIX: u8 = 0x04;
/// Length of a signed digest.
pub const DIGEST_LEN: usize = 32;
/// Length of an RSV or compact signature.
pub const SIGNATURE_LEN: usize = 65;
/// Length of an Ethereum or SDK address.
pub const ADDRESS_LEN: usize = 20;
/// Offset added to the recovery id in the external V byte.
pub const RECOVERY_ID_OFFSET: u8 = 27;

/// A 32-byte pre-hashed message.
pub type Digest = [u8; DIGEST_LEN];

/// Raw scalar bytes of a private key, whatever ecosystem wraps it.
///
/// The returned buffer is wiped when dropped.
pub trait PrivKeyBytes {
    fn priv_key_bytes(&self) -> Zeroizing<Vec<u8>>;
}

/// Raw encoded bytes of a public key, whatever ecosystem wraps it.
pub trait PubKeyBytes {
    fn pub_key_bytes(&self) -> Vec<u8>;
}

impl PrivKeyBytes for [u8] {
    fn priv_key_bytes(&self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(self.to_vec())
    }
}

impl<const N: usize> PrivKeyBytes for [u8; N] {
    fn priv_key_bytes(&self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(self.to_vec())
    }
}

impl PrivKeyBytes for SecretKey {
    fn priv_key_bytes(&self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(self.secret_bytes().to_vec())
    }
}

impl PubKeyBytes for [u8] {
    fn pub_key_bytes(&self) -> Vec<u8> {
        self.to_vec()
    }
}

impl<const N: usize> PubKeyBytes for [u8; N] {
    fn pub_key_bytes(&self) -> Vec<u8> {
        self.to_vec()
    }
}

impl PubKeyBytes for Vec<u8> {
    fn pub_key_bytes(&self) -> Vec<u8> {
        self.clone()
    }
}

/// Standard-curve keys expose their compressed encoding.
impl PubKeyBytes for PublicKey {
    fn pub_key_bytes(&self) -> Vec<u8> {
        self.serialize().to_vec()
    }
}

// MARK: - Address

/// 20-byte Ethereum account address: the last 20 bytes of
/// `keccak256(X || Y)` of an uncompressed public key.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> K1Result<Self> {
        let arr: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| K1Error::invalid_length("address", ADDRESS_LEN, bytes.len()))?;
        Ok(Self(arr))
    }

    /// Derive the address of a standard-curve public key
    pub fn from_pubkey(pubkey: &PublicKey) -> Self {
        let uncompressed = pubkey.serialize_uncompressed();
        let hash = keccak256(&uncompressed[1..]);
        let mut out = [0u8; ADDRESS_LEN];
        out.copy_from_slice(&hash[12..]);
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn into_inner(self) -> [u8; ADDRESS_LEN] {
        self.0
    }

    /// EIP-55 checksummed `0x` string
    pub fn to_checksum(&self) -> String {
        to_checksum_address(&self.0)
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl FromStr for Address {
    type Err = K1Error;

    /// Parse a hex address, with or without `0x`. Case is not checked.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped)?;
        Self::from_slice(&bytes)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// MARK: - Signatures

/// Index of V in an [`RsvSignature`].
pub const RSV_V_INDEX: usize = 64;
/// Index of the header byte in a [`CompactSignature`].
pub const COMPACT_HEADER_INDEX: usize = 0;

/// Ethereum signature, `R (32) || S (32) || V (1)` with V = 27 + recovery id.
///
/// Construction does not check V; [`crate::signer::verify`] does.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RsvSignature(#[serde(with = "crate::serde_bytes::hex_array")] [u8; SIGNATURE_LEN]);

impl RsvSignature {
    pub const fn new(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> K1Result<Self> {
        let arr: [u8; SIGNATURE_LEN] = bytes
            .try_into()
            .map_err(|_| K1Error::invalid_length("signature", SIGNATURE_LEN, bytes.len()))?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    pub fn into_inner(self) -> [u8; SIGNATURE_LEN] {
        self.0
    }

    pub fn r(&self) -> &[u8] {
        &self.0[..32]
    }

    pub fn s(&self) -> &[u8] {
        &self.0[32..RSV_V_INDEX]
    }

    pub fn v(&self) -> u8 {
        self.0[RSV_V_INDEX]
    }

    /// Recovery id (0 or 1) encoded in V.
    pub fn recovery_id(&self) -> K1Result<u8> {
        match self.v() {
            v @ (27 | 28) => Ok(v - RECOVERY_ID_OFFSET),
            v => Err(K1Error::InvalidRecoveryId(v)),
        }
    }

    /// Move the header byte of a compact signature from the front to the
    /// back (rotate left by one).
    pub fn from_compact(compact: &CompactSignature) -> K1Result<Self> {
        compact.recovery_id()?;
        let mut out = compact.0;
        out.rotate_left(1);
        Ok(Self(out))
    }

    /// Inverse of [`RsvSignature::from_compact`].
    pub fn to_compact(&self) -> K1Result<CompactSignature> {
        CompactSignature::from_rsv(self)
    }
}

impl From<[u8; SIGNATURE_LEN]> for RsvSignature {
    fn from(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for RsvSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for RsvSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RsvSignature(0x{})", hex::encode(self.0))
    }
}

/// Compact recoverable signature in curve-library order:
/// `header (1) || R (32) || S (32)` with header = 27 + recovery id.
///
/// This is the layout Bitcoin message signing uses for uncompressed keys.
/// Compressed-key headers (31..=34) are not accepted.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompactSignature([u8; SIGNATURE_LEN]);

impl CompactSignature {
    /// Package a library signature. Only recovery ids 0 and 1 are
    /// representable in the 27/28 header.
    pub fn from_recoverable(sig: &RecoverableSignature) -> K1Result<Self> {
        let (recovery_id, rs) = sig.serialize_compact();
        let rec = recovery_id.to_i32();
        if !(0..=1).contains(&rec) {
            return Err(K1Error::conversion(
                "compact signature",
                format!("unsupported recovery id {}", rec),
            ));
        }

        let mut out = [0u8; SIGNATURE_LEN];
        out[COMPACT_HEADER_INDEX] = RECOVERY_ID_OFFSET + rec as u8;
        out[1..].copy_from_slice(&rs);
        Ok(Self(out))
    }

    pub fn from_slice(bytes: &[u8]) -> K1Result<Self> {
        let arr: [u8; SIGNATURE_LEN] = bytes
            .try_into()
            .map_err(|_| K1Error::invalid_length("compact signature", SIGNATURE_LEN, bytes.len()))?;
        Ok(Self(arr))
    }

    /// Move V from the back of an RSV signature to the front (rotate right
    /// by one).
    pub fn from_rsv(rsv: &RsvSignature) -> K1Result<Self> {
        rsv.recovery_id()?;
        let mut out = rsv.0;
        out.rotate_right(1);
        Ok(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    pub fn header(&self) -> u8 {
        self.0[COMPACT_HEADER_INDEX]
    }

    pub fn recovery_id(&self) -> K1Result<u8> {
        match self.header() {
            h @ (27 | 28) => Ok(h - RECOVERY_ID_OFFSET),
            h => Err(K1Error::InvalidRecoveryId(h)),
        }
    }

    /// Rebuild the library signature.
    pub fn to_recoverable(&self) -> K1Result<RecoverableSignature> {
        let rec = RecoveryId::from_i32(i32::from(self.recovery_id()?))
            .map_err(|e| K1Error::decode("recovery id", e))?;
        RecoverableSignature::from_compact(&self.0[1..], rec)
            .map_err(|e| K1Error::decode("parse compact signature", e))
    }
}

impl fmt::Debug for CompactSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompactSignature(0x{})", hex::encode(self.0))
    }
}
