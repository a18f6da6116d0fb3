//! Adding, removing and inverting links.
//!
//! A directed link into a chance or utility node makes the source variable
//! a conditioning variable of the target's potentials, so these edits keep
//! the target's potential list in step with its parents.

use markov_core::{Link, Network, Potential};

use crate::edit::{
    check_or_rollback, tracks_parents, update_or_rollback, with_variable, without_variable, Edit,
};
use crate::error::{EditError, Result};

/// Add a link between two nodes.
#[derive(Debug, Clone)]
pub struct AddLinkEdit {
    source: String,
    target: String,
    directed: bool,
    added_at: Option<usize>,
    old_target_potentials: Option<Vec<Potential>>,
}

impl AddLinkEdit {
    pub fn new(source: impl Into<String>, target: impl Into<String>, directed: bool) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            directed,
            added_at: None,
            old_target_potentials: None,
        }
    }
}

impl Edit for AddLinkEdit {
    fn do_edit(&mut self, network: &mut Network) -> Result<()> {
        let source = network.variable(&self.source)?.clone();
        let target_kind = network.node(&self.target)?.node_type();

        let index = network.links().len();
        network.add_link(&self.source, &self.target, self.directed)?;
        self.added_at = Some(index);
        self.old_target_potentials = None;
        let (origin, destination) = (self.source.clone(), self.target.clone());
        check_or_rollback(self, network, "Link addition", &origin, &destination)?;

        if self.directed && tracks_parents(target_kind) {
            let updated = with_variable(network.node_potentials(&self.target)?, &source);
            let potentials = update_or_rollback(self, network, updated)?;
            self.old_target_potentials = Some(network.set_potentials(&self.target, potentials)?);
        }
        Ok(())
    }

    fn undo(&mut self, network: &mut Network) -> Result<()> {
        let index = self
            .added_at
            .take()
            .ok_or(EditError::NotApplied("Add link"))?;
        network.remove_link_at(index)?;
        if let Some(potentials) = self.old_target_potentials.take() {
            network.set_potentials(&self.target, potentials)?;
        }
        Ok(())
    }

    fn operation_name(&self) -> &'static str {
        "Add link"
    }

    fn describe(&self) -> String {
        format!(
            "{}: {}",
            self.operation_name(),
            Link::new(self.source.as_str(), self.target.as_str(), self.directed)
        )
    }
}

/// Remove a link and drop the source from the target's potentials.
#[derive(Debug, Clone)]
pub struct RemoveLinkEdit {
    source: String,
    target: String,
    directed: bool,
    removed: Option<(usize, Link)>,
    old_target_potentials: Option<Vec<Potential>>,
}

impl RemoveLinkEdit {
    pub fn new(source: impl Into<String>, target: impl Into<String>, directed: bool) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            directed,
            removed: None,
            old_target_potentials: None,
        }
    }
}

impl Edit for RemoveLinkEdit {
    fn do_edit(&mut self, network: &mut Network) -> Result<()> {
        let source = network.variable(&self.source)?.clone();
        let target = network.node(&self.target)?;
        let updated = if self.directed && tracks_parents(target.node_type()) {
            Some(without_variable(target.potentials(), &source))
        } else {
            None
        };

        self.removed = Some(network.remove_link(&self.source, &self.target, self.directed)?);
        self.old_target_potentials = match updated {
            Some(potentials) => Some(network.set_potentials(&self.target, potentials)?),
            None => None,
        };
        let (origin, destination) = (self.source.clone(), self.target.clone());
        check_or_rollback(self, network, "Link removal", &origin, &destination)
    }

    fn undo(&mut self, network: &mut Network) -> Result<()> {
        let (index, link) = self
            .removed
            .take()
            .ok_or(EditError::NotApplied("Remove link"))?;
        network.insert_link_at(index, link)?;
        if let Some(potentials) = self.old_target_potentials.take() {
            network.set_potentials(&self.target, potentials)?;
        }
        Ok(())
    }

    fn operation_name(&self) -> &'static str {
        "Remove link"
    }

    fn describe(&self) -> String {
        format!(
            "{}: {}",
            self.operation_name(),
            Link::new(self.source.as_str(), self.target.as_str(), self.directed)
        )
    }
}

/// Replace `parent -> child` by `child -> parent`.
///
/// Unless the child is a decision, the parent variable leaves the child's
/// potentials and the child variable joins the parent's. A cycle or any
/// other broken constraint rolls the inversion back before any potential
/// is touched.
#[derive(Debug, Clone)]
pub struct InvertLinkEdit {
    parent: String,
    child: String,
    directed: bool,
    removed: Option<(usize, Link)>,
    inverted_at: Option<usize>,
    old_parent_potentials: Option<Vec<Potential>>,
    old_child_potentials: Option<Vec<Potential>>,
}

impl InvertLinkEdit {
    pub fn new(parent: impl Into<String>, child: impl Into<String>, directed: bool) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
            directed,
            removed: None,
            inverted_at: None,
            old_parent_potentials: None,
            old_child_potentials: None,
        }
    }
}

impl Edit for InvertLinkEdit {
    fn do_edit(&mut self, network: &mut Network) -> Result<()> {
        let parent = network.variable(&self.parent)?.clone();
        let child = network.variable(&self.child)?.clone();

        self.removed = Some(network.remove_link(&self.parent, &self.child, self.directed)?);
        self.inverted_at = Some(network.links().len());
        network.add_link(&self.child, &self.parent, self.directed)?;
        (self.old_parent_potentials, self.old_child_potentials) = (None, None);
        let (origin, destination) = (self.parent.clone(), self.child.clone());
        check_or_rollback(self, network, "Link inversion", &origin, &destination)?;

        if tracks_parents(child.kind) {
            let updated = with_variable(network.node_potentials(&self.parent)?, &child);
            let parent_potentials = update_or_rollback(self, network, updated)?;
            let child_potentials = without_variable(network.node_potentials(&self.child)?, &parent);
            self.old_parent_potentials =
                Some(network.set_potentials(&self.parent, parent_potentials)?);
            self.old_child_potentials = Some(network.set_potentials(&self.child, child_potentials)?);
        }
        Ok(())
    }

    fn undo(&mut self, network: &mut Network) -> Result<()> {
        let (index, link) = self
            .removed
            .take()
            .ok_or(EditError::NotApplied("Invert link"))?;
        let inverted = self
            .inverted_at
            .take()
            .ok_or(EditError::NotApplied("Invert link"))?;
        network.remove_link_at(inverted)?;
        network.insert_link_at(index, link)?;
        if let Some(potentials) = self.old_parent_potentials.take() {
            network.set_potentials(&self.parent, potentials)?;
        }
        if let Some(potentials) = self.old_child_potentials.take() {
            network.set_potentials(&self.child, potentials)?;
        }
        Ok(())
    }

    fn operation_name(&self) -> &'static str {
        "Invert link"
    }

    fn describe(&self) -> String {
        format!(
            "{}: {} -> {} ==> {} -> {}",
            self.operation_name(),
            self.parent,
            self.child,
            self.child,
            self.parent
        )
    }
}
