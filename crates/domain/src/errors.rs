//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for PartSync
///
/// Batch-level errors (`Config`) abort a sync run before any network
/// activity; every other variant is row-scoped and ends up inside a
/// single row's outcome.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PartSyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid part reference: {0}")]
    InvalidReference(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (HTTP {status}): {message}")]
    Transport { status: u16, message: String },

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for PartSync operations
pub type Result<T> = std::result::Result<T, PartSyncError>;
