//! Per-network undo history.
//!
//! The editor owns its network, so `&mut` access serializes every edit and
//! inference pass against it. Applied edits are kept with a cursor; undo
//! moves the cursor back, redo forward, and a fresh edit discards anything
//! past the cursor.

use std::fmt;

use markov_core::{fingerprint_hex, Network};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::edit::Edit;
use crate::error::{EditError, Result};

/// Identifier of an applied edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EditId(pub Uuid);

impl fmt::Display for EditId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct Applied {
    id: EditId,
    edit: Box<dyn Edit>,
}

/// A network together with the edits applied to it.
pub struct NetworkEditor {
    network: Network,
    history: Vec<Applied>,
    position: usize,
}

impl NetworkEditor {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            history: Vec::new(),
            position: 0,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Give up the history and return the network.
    pub fn into_network(self) -> Network {
        self.network
    }

    /// Apply an edit and record it.
    ///
    /// A failed edit is not recorded and leaves the network unchanged.
    ///
    /// # Panics
    ///
    /// Panics if a failed edit leaves the network different from before the
    /// attempt.
    pub fn apply<E: Edit + 'static>(&mut self, edit: E) -> Result<EditId> {
        self.apply_boxed(Box::new(edit))
    }

    pub fn apply_boxed(&mut self, mut edit: Box<dyn Edit>) -> Result<EditId> {
        let before = self.network.fingerprint()?;
        match edit.do_edit(&mut self.network) {
            Ok(()) => {
                let id = EditId(Uuid::new_v4());
                debug!(edit = %edit.describe(), %id, "edit applied");
                self.history.truncate(self.position);
                self.history.push(Applied { id, edit });
                self.position = self.history.len();
                Ok(id)
            }
            Err(e) => {
                let after = self.network.fingerprint()?;
                assert_eq!(
                    fingerprint_hex(&before),
                    fingerprint_hex(&after),
                    "rejected edit '{}' did not restore the network",
                    edit.describe()
                );
                warn!(edit = %edit.describe(), error = %e, "edit rejected");
                Err(e)
            }
        }
    }

    /// Revert the most recent applied edit.
    pub fn undo(&mut self) -> Result<EditId> {
        if self.position == 0 {
            return Err(EditError::NothingToUndo);
        }
        let applied = &mut self.history[self.position - 1];
        applied.edit.undo(&mut self.network)?;
        self.position -= 1;
        debug!(edit = %applied.edit.describe(), id = %applied.id, "edit undone");
        Ok(applied.id)
    }

    /// Re-apply the most recently undone edit.
    pub fn redo(&mut self) -> Result<EditId> {
        if self.position == self.history.len() {
            return Err(EditError::NothingToRedo);
        }
        let applied = &mut self.history[self.position];
        applied.edit.do_edit(&mut self.network)?;
        self.position += 1;
        debug!(edit = %applied.edit.describe(), id = %applied.id, "edit redone");
        Ok(applied.id)
    }

    pub fn can_undo(&self) -> bool {
        self.position > 0
    }

    pub fn can_redo(&self) -> bool {
        self.position < self.history.len()
    }

    /// Number of edits currently applied.
    pub fn applied_count(&self) -> usize {
        self.position
    }

    /// Descriptions of the applied edits, oldest first.
    pub fn describe_history(&self) -> Vec<String> {
        self.history[..self.position]
            .iter()
            .map(|a| a.edit.describe())
            .collect()
    }
}
