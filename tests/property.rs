use k1util::convert::{
    cmp_pubkey_to_delegator_address, cosmos_pubkey_to_evm_address, pb_pubkey_from_bytes,
    pubkey_bytes_to_cosmos, pubkey_from_bytes64, pubkey_pb_to_address, pubkey_to_address,
    pubkey_to_bytes64,
};
use k1util::comet::PublicKeyProto;
use k1util::types::RSV_V_INDEX;
use k1util::{recover_address, sign, verify, Address, K1Error, RsvSignature};
use proptest::prelude::*;
use secp256k1::{PublicKey, Secp256k1, SecretKey};

fn any_secret_key() -> impl Strategy<Value = SecretKey> {
    prop::array::uniform32(any::<u8>()).prop_filter_map("valid secp256k1 scalar", |bytes| {
        SecretKey::from_slice(&bytes).ok()
    })
}

fn public_key(secret: &SecretKey) -> PublicKey {
    PublicKey::from_secret_key(&Secp256k1::new(), secret)
}

proptest! {
    #[test]
    fn signatures_verify_against_signer_address(
        secret in any_secret_key(),
        digest in prop::array::uniform32(any::<u8>()),
    ) {
        let address = pubkey_to_address(&public_key(&secret)).expect("address");
        let sig = sign(&secret, &digest).expect("sign");

        prop_assert!(sig.v() == 27 || sig.v() == 28);
        prop_assert!(verify(&address, &digest, &sig).expect("verify"));
        prop_assert_eq!(recover_address(&digest, &sig).expect("recover"), address);
    }

    #[test]
    fn signatures_do_not_verify_for_other_keys(
        signer in any_secret_key(),
        other in any_secret_key(),
        digest in prop::array::uniform32(any::<u8>()),
    ) {
        prop_assume!(signer != other);
        let other_address = pubkey_to_address(&public_key(&other)).expect("address");
        let sig = sign(&signer, &digest).expect("sign");

        prop_assert!(!verify(&other_address, &digest, &sig).expect("verify"));
    }

    #[test]
    fn invalid_v_is_rejected(
        secret in any_secret_key(),
        digest in prop::array::uniform32(any::<u8>()),
        v in any::<u8>().prop_filter("not 27 or 28", |v| *v != 27 && *v != 28),
    ) {
        let mut bytes = sign(&secret, &digest).expect("sign").into_inner();
        bytes[RSV_V_INDEX] = v;

        let err = verify(&Address::new([0u8; 20]), &digest, &RsvSignature::new(bytes)).unwrap_err();
        prop_assert_eq!(err, K1Error::InvalidRecoveryId(v));
    }

    #[test]
    fn bytes64_form_matches_uncompressed(secret in any_secret_key()) {
        let pubkey = public_key(&secret);
        let bytes = pubkey_to_bytes64(&pubkey);

        prop_assert_eq!(&bytes[..], &pubkey.serialize_uncompressed()[1..]);
        prop_assert_eq!(pubkey_from_bytes64(&bytes).expect("parse"), pubkey);
    }

    #[test]
    fn protobuf_key_gives_same_address(secret in any_secret_key()) {
        let compressed = public_key(&secret).serialize();
        let pb = pb_pubkey_from_bytes(&compressed).expect("wrap");
        let decoded = PublicKeyProto::decode(&pb.encode_to_vec()).expect("decode");

        prop_assert_eq!(
            pubkey_pb_to_address(&decoded).expect("pb address"),
            pubkey_to_address(&compressed).expect("address")
        );
    }

    #[test]
    fn non_compressed_lengths_are_rejected(bytes in prop::collection::vec(any::<u8>(), 0..100)) {
        prop_assume!(bytes.len() != 33);

        let expected = K1Error::invalid_length("pubkey", 33, bytes.len());
        prop_assert_eq!(pubkey_to_address(bytes.as_slice()).unwrap_err(), expected.clone());
        prop_assert_eq!(cosmos_pubkey_to_evm_address(&bytes).unwrap_err(), expected.clone());
        prop_assert_eq!(pb_pubkey_from_bytes(&bytes).unwrap_err(), expected.clone());
        prop_assert_eq!(pubkey_bytes_to_cosmos(&bytes).unwrap_err(), expected);
    }

    #[test]
    fn hex_prefix_is_optional(secret in any_secret_key()) {
        let hex_key = hex::encode(public_key(&secret).serialize());
        let bare = cmp_pubkey_to_delegator_address(&hex_key).expect("bare");
        let prefixed = cmp_pubkey_to_delegator_address(&format!("0x{}", hex_key)).expect("prefixed");

        prop_assert_eq!(bare, prefixed);
    }
}
