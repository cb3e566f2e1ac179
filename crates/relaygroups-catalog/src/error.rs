//! Error types for the catalog.

use relaygroups_core::CoreError;
use thiserror::Error;

/// Errors that can occur while building envelopes.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Key, encoding or signing failure from the core.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// A caller-supplied parameter is unusable.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Envelope serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
