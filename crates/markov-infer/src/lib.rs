//! Inference for Markov networks.
//!
//! [`OptimalIntervention`] evaluates an influence diagram by variable
//! elimination and returns the optimal [`StrategyTree`] along with one
//! [`Policy`] per decision. [`extract_advice`] reads advisory text off the
//! tree, and [`posterior`] answers marginal queries on Bayesian networks.

pub mod elimination;
pub mod error;
pub mod policy;
pub mod posterior;
pub mod strategy;

pub use elimination::{InferenceResult, OptimalIntervention};
pub use error::{InferenceError, Result};
pub use policy::Policy;
pub use posterior::posterior;
pub use strategy::{extract_advice, Advice, StrategyBranch, StrategyTree};
