//! Reversible edits for Markov networks.
//!
//! Every change to a [`Network`](markov_core::Network) goes through an
//! [`Edit`]: a value that applies the change, keeps an owned snapshot of
//! what it replaced, and can restore it. Structural edits re-check the
//! network's constraints after applying and roll themselves back with a
//! [`EditError::DoEditFailure`] when one breaks. [`NetworkEditor`] keeps the
//! undo history of one network.

pub mod edit;
pub mod error;
pub mod history;
pub mod link_edits;
pub mod node_edits;
pub mod potential_edits;

// Re-exports for convenience.
pub use edit::Edit;
pub use error::{EditError, Result};
pub use history::{EditId, NetworkEditor};
pub use link_edits::{AddLinkEdit, InvertLinkEdit, RemoveLinkEdit};
pub use node_edits::{AddNodeEdit, RemoveNodeEdit};
pub use potential_edits::{SetPotentialEdit, UncertainValuesEdit, UncertainValuesRemoveEdit};
