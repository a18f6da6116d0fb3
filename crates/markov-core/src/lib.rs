//! Network model and potential algebra for the Markov probabilistic
//! graphical model engine.
//!
//! A [`Network`] holds chance, decision and utility [`Node`]s joined by
//! [`Link`]s and validated by structural [`Constraint`]s. Each node owns
//! [`Potential`]s: dense tables over its variables in mixed-radix order,
//! exact distributions over a numeric child, or named parametric
//! distributions. Evidence is collected in an [`EvidenceCase`].

pub mod constraint;
pub mod evidence;
pub mod hash;
pub mod link;
pub mod network;
pub mod node;
pub mod potential;
pub mod variable;

// Re-exports for convenience.
pub use constraint::Constraint;
pub use evidence::{EvidenceCase, EvidenceError, Finding};
pub use hash::{fingerprint_hex, Fingerprint, FingerprintError};
pub use link::Link;
pub use network::{Criterion, Network, NetworkError, NetworkType, RemovedNode};
pub use node::Node;
pub use potential::{
    DistributionPotential, ExactDistrPotential, Potential, PotentialError, PotentialRole,
    TablePotential, UncertainValue,
};
pub use variable::{Domain, State, Variable, VariableKind};
