//! Edit engine error types.

use markov_core::{EvidenceError, NetworkError, PotentialError};

/// Errors that can occur while applying or reverting an edit.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    /// A structural edit broke a constraint and was rolled back.
    #[error(
        "{operation} is not possible in the case of {origin} -> {destination} because:\n{}",
        format_unsatisfied(.unsatisfied)
    )]
    DoEditFailure {
        operation: String,
        origin: String,
        destination: String,
        unsatisfied: Vec<String>,
    },

    /// `undo` was called on an edit that has not been applied.
    #[error("{0} has not been applied")]
    NotApplied(&'static str),

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,

    /// The node has no potential at the requested position.
    #[error("node '{node}' has no potential at index {index}")]
    PotentialNotFound { node: String, index: usize },

    /// The potential has no table to carry uncertain values.
    #[error("{kind} potential of node '{node}' has no table")]
    NoTable { node: String, kind: String },

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Potential(#[from] PotentialError),

    #[error(transparent)]
    Evidence(#[from] EvidenceError),
}

fn format_unsatisfied(unsatisfied: &[String]) -> String {
    let mut message = String::new();
    for constraint in unsatisfied {
        message.push_str("    ");
        message.push_str(constraint);
        message.push('\n');
    }
    message.push_str("Undoing operation.");
    message
}

/// Result type alias for edit operations.
pub type Result<T> = std::result::Result<T, EditError>;
