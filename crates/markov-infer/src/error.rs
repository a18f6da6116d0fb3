//! Inference error types.

use markov_core::{EvidenceError, NetworkError, PotentialError};

/// Errors that can occur while evaluating a network.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    /// The network does not meet the requirements for evaluation.
    #[error("network cannot be evaluated: {0}")]
    NotEvaluableNetwork(String),

    /// A finding lies outside its variable's domain.
    #[error("invalid state '{state}' for variable '{variable}'")]
    InvalidState { variable: String, state: String },

    /// Findings that contradict each other or the model.
    #[error("incompatible evidence: {0}")]
    IncompatibleEvidence(String),

    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// Any other failure while combining or marginalizing potentials.
    #[error("unexpected inference failure: {0}")]
    UnexpectedInference(String),
}

impl From<EvidenceError> for InferenceError {
    fn from(e: EvidenceError) -> Self {
        match e {
            EvidenceError::NodeNotFound(name) => InferenceError::NodeNotFound(name),
            EvidenceError::InvalidState { variable, state } => {
                InferenceError::InvalidState { variable, state }
            }
            e @ EvidenceError::IncompatibleEvidence { .. } => {
                InferenceError::IncompatibleEvidence(e.to_string())
            }
        }
    }
}

impl From<NetworkError> for InferenceError {
    fn from(e: NetworkError) -> Self {
        match e {
            NetworkError::NodeNotFound(name) => InferenceError::NodeNotFound(name),
            other => InferenceError::NotEvaluableNetwork(other.to_string()),
        }
    }
}

impl From<PotentialError> for InferenceError {
    fn from(e: PotentialError) -> Self {
        InferenceError::UnexpectedInference(e.to_string())
    }
}

/// Result type alias for inference operations.
pub type Result<T> = std::result::Result<T, InferenceError>;
