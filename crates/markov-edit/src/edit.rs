//! The edit abstraction.
//!
//! An edit captures an owned snapshot of exactly what it replaces when it
//! is applied, and restores that snapshot on undo. Both directions swap
//! whole potential lists and links in the network rather than mutating
//! shared values in place.

use markov_core::{Network, Potential, Variable, VariableKind};

use crate::error::{EditError, Result};

/// A reversible change to a network.
pub trait Edit {
    /// Apply the change. On error the network is left as it was.
    fn do_edit(&mut self, network: &mut Network) -> Result<()>;

    /// Revert a previously applied change.
    fn undo(&mut self, network: &mut Network) -> Result<()>;

    /// Human-readable operation name, e.g. `Invert link`.
    fn operation_name(&self) -> &'static str;

    /// Short description used in logs.
    fn describe(&self) -> String {
        self.operation_name().to_string()
    }
}

/// Verify the network's constraints after a structural change. On failure
/// the edit is undone and a [`EditError::DoEditFailure`] returned.
///
/// Link edits call this before updating potentials, so a broken constraint
/// is reported even when the potential update itself would fail.
pub(crate) fn check_or_rollback<E: Edit + ?Sized>(
    edit: &mut E,
    network: &mut Network,
    failure_name: &str,
    origin: &str,
    destination: &str,
) -> Result<()> {
    if network.check_constraints() {
        return Ok(());
    }
    let unsatisfied = network.unsatisfied_constraints();
    edit.undo(network)?;
    Err(EditError::DoEditFailure {
        operation: failure_name.to_string(),
        origin: origin.to_string(),
        destination: destination.to_string(),
        unsatisfied,
    })
}

/// Finish an edit whose structure already passed the constraint check: a
/// failed potential update undoes the whole edit.
pub(crate) fn update_or_rollback<E: Edit + ?Sized, T>(
    edit: &mut E,
    network: &mut Network,
    update: Result<T>,
) -> Result<T> {
    match update {
        Ok(value) => Ok(value),
        Err(e) => {
            edit.undo(network)?;
            Err(e)
        }
    }
}

/// Whether a directed link into this node changes its potentials.
pub(crate) fn tracks_parents(kind: VariableKind) -> bool {
    kind != VariableKind::Decision
}

/// Copies of `potentials` extended with `variable`.
pub(crate) fn with_variable(potentials: &[Potential], variable: &Variable) -> Result<Vec<Potential>> {
    potentials
        .iter()
        .map(|p| p.add_variable(variable).map_err(EditError::from))
        .collect()
}

/// Copies of `potentials` without `variable`.
pub(crate) fn without_variable(potentials: &[Potential], variable: &Variable) -> Vec<Potential> {
    potentials.iter().map(|p| p.remove_variable(variable)).collect()
}
