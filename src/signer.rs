//! Ethereum RSV Signing and Verification
//!
//! Signs 32-byte digests with secp256k1 and produces 65-byte signatures in
//! the Ethereum `R || S || V` layout, V = 27 + recovery id.
//!
//! The curve library hands back a recovery id and `R || S`. These are
//! first packaged as a [`CompactSignature`] (`header || R || S`) and only
//! then rotated into [`RsvSignature`] order, so the byte layout on each
//! side is a checked type rather than an index convention.
//!
//! No hashing happens here: callers pass digests.

use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

use crate::error::{K1Error, K1Result};
use crate::types::{
    Address, CompactSignature, Digest, PrivKeyBytes, RsvSignature, PRIV_KEY_LEN,
};
use crate::{log_debug, log_warn};

const MODULE: &str = "signer";

/// Sign a digest, returning `R || S || V` with V in {27, 28}.
///
/// Nonces are deterministic (RFC 6979): the same key and digest always
/// give the same signature.
pub fn sign<K>(key: &K, digest: &Digest) -> K1Result<RsvSignature>
where
    K: PrivKeyBytes + ?Sized,
{
    let bz = key.priv_key_bytes();
    if bz.len() != PRIV_KEY_LEN {
        return Err(K1Error::invalid_length("private key", PRIV_KEY_LEN, bz.len()));
    }

    let secret = SecretKey::from_slice(&bz)
        .map_err(|e| K1Error::conversion("parse private key", e))?;

    let secp = Secp256k1::signing_only();
    let sig = secp.sign_ecdsa_recoverable(&Message::from_digest(*digest), &secret);

    let compact = CompactSignature::from_recoverable(&sig)?;
    RsvSignature::from_compact(&compact)
}

/// Recover the signer's public key from an RSV signature.
///
/// V must be 27 or 28. Any recovery failure is an error.
pub fn recover_pubkey(digest: &Digest, sig: &RsvSignature) -> K1Result<PublicKey> {
    let compact = CompactSignature::from_rsv(sig).inspect_err(|_| {
        log_warn!(MODULE, "rejected signature recovery id", v = sig.v());
    })?;

    let recoverable = compact.to_recoverable()?;
    Secp256k1::verification_only()
        .recover_ecdsa(&Message::from_digest(*digest), &recoverable)
        .map_err(|e| K1Error::decode("recover public key", e))
}

/// Recover the signer's address from an RSV signature.
pub fn recover_address(digest: &Digest, sig: &RsvSignature) -> K1Result<Address> {
    recover_pubkey(digest, sig).map(|pubkey| Address::from_pubkey(&pubkey))
}

/// Whether `sig` over `digest` was produced by the key behind `address`.
///
/// Returns `Ok(false)` when a key is recovered but its address differs,
/// and `Err` when V is malformed or no key can be recovered.
pub fn verify(address: &Address, digest: &Digest, sig: &RsvSignature) -> K1Result<bool> {
    let actual = recover_address(digest, sig)?;

    if actual != *address {
        log_debug!(
            MODULE,
            "signature does not match address",
            expected = address,
            recovered = actual,
        );
        return Ok(false);
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comet::PrivKey;
    use crate::types::RSV_V_INDEX;
    use crate::utils::crypto::keccak256;

    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn test_key() -> PrivKey {
        PrivKey::from_slice(&hex::decode(TEST_PRIVATE_KEY).unwrap()).unwrap()
    }

    fn test_address() -> Address {
        TEST_ADDRESS.parse().unwrap()
    }

    #[test]
    fn test_sign_and_verify() {
        let digest = keccak256(b"hello");
        let sig = sign(&test_key(), &digest).unwrap();

        assert!(sig.v() == 27 || sig.v() == 28);
        assert!(verify(&test_address(), &digest, &sig).unwrap());
        assert_eq!(recover_address(&digest, &sig).unwrap(), test_address());
    }

    #[test]
    fn test_sign_is_deterministic() {
        let digest = [0xAB; 32];
        let a = sign(&test_key(), &digest).unwrap();
        let b = sign(&test_key(), &digest).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sign_accepts_every_key_wrapper() {
        let digest = [0x11; 32];
        let bytes = hex::decode(TEST_PRIVATE_KEY).unwrap();
        let secret = SecretKey::from_slice(&bytes).unwrap();

        let from_comet = sign(&test_key(), &digest).unwrap();
        let from_std = sign(&secret, &digest).unwrap();
        let from_slice = sign(bytes.as_slice(), &digest).unwrap();

        assert_eq!(from_comet, from_std);
        assert_eq!(from_comet, from_slice);
    }

    #[test]
    fn test_sign_rejects_bad_key_length() {
        let digest = [0u8; 32];
        assert_eq!(
            sign(&[1u8; 31][..], &digest).unwrap_err(),
            K1Error::invalid_length("private key", 32, 31)
        );
        assert_eq!(
            sign(&[1u8; 64][..], &digest).unwrap_err(),
            K1Error::invalid_length("private key", 32, 64)
        );
    }

    #[test]
    fn test_sign_rejects_zero_scalar() {
        let err = sign(&[0u8; 32][..], &[0u8; 32]).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::ConversionFailure);
    }

    #[test]
    fn test_verify_rejects_bad_v() {
        let digest = [0x22; 32];
        let sig = sign(&test_key(), &digest).unwrap();

        for v in [0u8, 1, 26, 29, 35, 255] {
            let mut bytes = sig.into_inner();
            bytes[RSV_V_INDEX] = v;
            let err = verify(&test_address(), &digest, &RsvSignature::new(bytes)).unwrap_err();
            assert_eq!(err, K1Error::InvalidRecoveryId(v));
        }
    }

    #[test]
    fn test_verify_wrong_address_is_false() {
        let digest = [0x33; 32];
        let sig = sign(&test_key(), &digest).unwrap();
        let other = Address::new([0x12; 20]);
        assert!(!verify(&other, &digest, &sig).unwrap());
    }

    #[test]
    fn test_verify_wrong_digest_is_false() {
        let sig = sign(&test_key(), &[0x44; 32]).unwrap();
        assert!(!verify(&test_address(), &[0x45; 32], &sig).unwrap());
    }

    #[test]
    fn test_tampered_s_is_false() {
        let digest = [0x55; 32];
        let sig = sign(&test_key(), &digest).unwrap();

        let mut bytes = sig.into_inner();
        bytes[63] ^= 0x01;
        assert!(!verify(&test_address(), &digest, &RsvSignature::new(bytes)).unwrap());
    }

    #[test]
    fn test_tampered_r_never_verifies() {
        let digest = [0x66; 32];
        let sig = sign(&test_key(), &digest).unwrap();

        for i in 0..32 {
            let mut bytes = sig.into_inner();
            bytes[i] ^= 0x01;
            let result = verify(&test_address(), &digest, &RsvSignature::new(bytes));
            assert!(!matches!(result, Ok(true)), "tampered byte {} verified", i);
        }
    }

    #[test]
    fn test_zero_signature_is_an_error() {
        let mut bytes = [0u8; 65];
        bytes[RSV_V_INDEX] = 27;
        let err = verify(&test_address(), &[0x77; 32], &RsvSignature::new(bytes)).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::DecodeFailure);
    }
}
