//! Error types for flight extraction

use thiserror::Error;

/// Errors surfaced by the engine.
///
/// Field extraction itself never fails; these cover decoding of raw
/// messages and of the persisted inputs handed to the engine.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to parse the raw message structure
    #[error("Failed to parse email structure: {0}")]
    Structure(String),

    /// Missing required header
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    /// Processed-store document could not be decoded
    #[error("Invalid processed store: {0}")]
    Store(#[source] serde_json::Error),

    /// Engine configuration could not be decoded
    #[error("Invalid engine config: {0}")]
    Config(#[source] serde_json::Error),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;
