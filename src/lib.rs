//! k1util
//!
//! secp256k1 key and address conversions between a CometBFT consensus
//! engine, the Cosmos SDK and Ethereum, plus Ethereum-style RSV signing.
//!
//! # Architecture
//!
//! This crate provides:
//! - **types**: fixed-length addresses, signatures and key-byte traits
//! - **comet**: consensus-engine keys and the protobuf public key message
//! - **cosmos**: SDK public keys and bech32 account/validator addresses
//! - **convert**: conversions between the three key representations
//! - **signer**: RSV signing, recovery and verification over digests
//! - **config**: bech32 prefixes used for SDK addresses
//!
//! # Security
//!
//! This crate uses `zeroize` to clear private key material from memory.
//! Private keys are never logged; the logger redacts key-like fields.
//!
//! # Example
//!
//! ```rust,ignore
//! use k1util::{comet::PrivKey, signer, convert};
//!
//! let key = PrivKey::from_slice(&bytes)?;
//! let address = convert::pubkey_to_address(&key.pub_key()?)?;
//! let sig = signer::sign(&key, &digest)?;
//! assert!(signer::verify(&address, &digest, &sig)?);
//! ```

pub mod comet;
pub mod config;
pub mod convert;
pub mod cosmos;
pub mod error;
pub mod serde_bytes;
pub mod signer;
pub mod types;
pub mod utils;

// Re-export key types for convenience
pub use config::AddressConfig;
pub use error::{ErrorCode, K1Error, K1Result};
pub use signer::{recover_address, recover_pubkey, sign, verify};
pub use types::{Address, CompactSignature, Digest, PrivKeyBytes, PubKeyBytes, RsvSignature};
