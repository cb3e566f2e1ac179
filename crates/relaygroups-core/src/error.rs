//! Error types for relaygroups core.

use thiserror::Error;

use crate::types::EventId;

/// Core errors raised before or instead of a cryptographic computation.
///
/// A structurally valid signature that does not verify is not an error;
/// verification reports it as `Ok(false)`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid input length for {what}: expected {expected}, got {got}")]
    InvalidInputLength {
        what: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("invalid key: scalar must be in (0, n)")]
    InvalidKey,

    #[error("signing key does not match event pubkey")]
    KeyMismatch,

    #[error("random source failure: {0}")]
    RandomSource(String),

    #[error("encoding error: {0}")]
    EncodingError(String),
}

impl CoreError {
    pub(crate) fn length(what: &'static str, expected: &'static str, got: usize) -> Self {
        CoreError::InvalidInputLength {
            what,
            expected,
            got,
        }
    }
}

impl From<hex::FromHexError> for CoreError {
    fn from(e: hex::FromHexError) -> Self {
        CoreError::InvalidEncoding(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::EncodingError(e.to_string())
    }
}

/// Reasons a signed event fails verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("event id mismatch: stated {stated}, computed {computed}")]
    IdMismatch { stated: EventId, computed: EventId },

    #[error("signature verification failed")]
    SignatureFailed,

    #[error("structural error: {0}")]
    StructuralError(String),
}

impl From<CoreError> for ValidationError {
    fn from(e: CoreError) -> Self {
        ValidationError::StructuralError(e.to_string())
    }
}
