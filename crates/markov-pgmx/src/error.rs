//! Model document error types.

use std::path::PathBuf;

use markov_core::{EvidenceError, NetworkError, PotentialError};

/// Errors that can occur while reading or writing model documents.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// The file could not be opened, read or written.
    #[error("cannot access {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document is not valid JSON or does not match the schema.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported format version {found} (this reader handles up to {supported})")]
    UnsupportedVersion { found: String, supported: String },

    /// No decoder is registered for a potential's `type`.
    #[error("unknown potential type '{0}'")]
    UnknownPotentialType(String),

    /// A potential, link or finding names a variable the network lacks.
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    /// Well-formed JSON with content the model cannot hold.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid format version: {0}")]
    Version(#[from] semver::Error),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Potential(#[from] PotentialError),

    #[error(transparent)]
    Evidence(#[from] EvidenceError),
}

/// Result type alias for document operations.
pub type Result<T> = std::result::Result<T, IoError>;
