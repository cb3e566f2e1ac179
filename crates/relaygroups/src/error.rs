//! Error types for the client.

use relaygroups_catalog::CatalogError;
use relaygroups_core::{CoreError, ValidationError};
use thiserror::Error;

/// Errors that can occur during client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Key, encoding or signing failure.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// An event failed verification.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An action or query could not be built.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
