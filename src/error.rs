//! Unified error types for k1util
//!
//! Every conversion and signing operation returns [`K1Result`]. Errors carry
//! the offending length or the operation that failed, and map onto a small,
//! serialisable [`ErrorCode`] for callers that only need the category.

use serde::{Deserialize, Serialize};

/// Main error type for all k1util operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum K1Error {
    #[error("invalid {what} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid recovery id (V) {0}, must be 27 or 28")]
    InvalidRecoveryId(u8),

    #[error("{context}: {reason}")]
    Decode {
        context: &'static str,
        reason: String,
    },

    #[error("{context}: {reason}")]
    Conversion {
        context: &'static str,
        reason: String,
    },
}

impl K1Error {
    pub fn invalid_length(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength { what, expected, actual }
    }

    pub fn decode(context: &'static str, reason: impl ToString) -> Self {
        Self::Decode {
            context,
            reason: reason.to_string(),
        }
    }

    pub fn conversion(context: &'static str, reason: impl ToString) -> Self {
        Self::Conversion {
            context,
            reason: reason.to_string(),
        }
    }

    /// Stable category of this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidLength { .. } => ErrorCode::InvalidLength,
            Self::InvalidRecoveryId(_) => ErrorCode::InvalidRecoveryId,
            Self::Decode { .. } => ErrorCode::DecodeFailure,
            Self::Conversion { .. } => ErrorCode::ConversionFailure,
        }
    }
}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidLength,
    InvalidRecoveryId,
    DecodeFailure,
    ConversionFailure,
}

/// Result type alias for k1util operations
pub type K1Result<T> = Result<T, K1Error>;

// Conversions from common error types

impl From<hex::FromHexError> for K1Error {
    fn from(e: hex::FromHexError) -> Self {
        K1Error::decode("hex decode", e)
    }
}

impl From<bech32::Error> for K1Error {
    fn from(e: bech32::Error) -> Self {
        K1Error::decode("bech32 decode", e)
    }
}
