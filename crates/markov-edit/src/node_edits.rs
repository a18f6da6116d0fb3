//! Adding and removing nodes.

use markov_core::{Network, Node, Potential, RemovedNode};

use crate::edit::{check_or_rollback, tracks_parents, without_variable, Edit};
use crate::error::{EditError, Result};

/// Add a node without links.
#[derive(Debug, Clone)]
pub struct AddNodeEdit {
    node: Node,
    applied: bool,
}

impl AddNodeEdit {
    pub fn new(node: Node) -> Self {
        Self {
            node,
            applied: false,
        }
    }
}

impl Edit for AddNodeEdit {
    fn do_edit(&mut self, network: &mut Network) -> Result<()> {
        network.add_node(self.node.clone())?;
        self.applied = true;
        let name = self.node.name().to_string();
        check_or_rollback(self, network, "Node addition", &name, &name)
    }

    fn undo(&mut self, network: &mut Network) -> Result<()> {
        if !self.applied {
            return Err(EditError::NotApplied(self.operation_name()));
        }
        network.remove_node(self.node.name())?;
        self.applied = false;
        Ok(())
    }

    fn operation_name(&self) -> &'static str {
        "Add node"
    }

    fn describe(&self) -> String {
        format!("{}: {}", self.operation_name(), self.node)
    }
}

/// Remove a node, its links, and its variable from its children's
/// potentials.
#[derive(Debug, Clone)]
pub struct RemoveNodeEdit {
    name: String,
    removed: Option<RemovedNode>,
    old_child_potentials: Vec<(String, Vec<Potential>)>,
}

impl RemoveNodeEdit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            removed: None,
            old_child_potentials: Vec::new(),
        }
    }
}

impl Edit for RemoveNodeEdit {
    fn do_edit(&mut self, network: &mut Network) -> Result<()> {
        let variable = network.variable(&self.name)?.clone();
        let mut updates: Vec<(String, Vec<Potential>)> = Vec::new();
        for child in network.children(&self.name) {
            let node = network.node(child)?;
            // Parallel links list a child more than once.
            let seen = updates.iter().any(|(name, _)| name == child);
            if !seen && tracks_parents(node.node_type()) {
                updates.push((
                    child.to_string(),
                    without_variable(node.potentials(), &variable),
                ));
            }
        }

        self.removed = Some(network.remove_node(&self.name)?);
        self.old_child_potentials.clear();
        for (child, potentials) in updates {
            let old = network.set_potentials(&child, potentials)?;
            self.old_child_potentials.push((child, old));
        }
        let name = self.name.clone();
        check_or_rollback(self, network, "Node removal", &name, &name)
    }

    fn undo(&mut self, network: &mut Network) -> Result<()> {
        let removed = self
            .removed
            .take()
            .ok_or(EditError::NotApplied("Remove node"))?;
        network.insert_node_at(removed.index, removed.node)?;
        for (index, link) in removed.links {
            network.insert_link_at(index, link)?;
        }
        for (child, potentials) in self.old_child_potentials.drain(..).rev() {
            network.set_potentials(&child, potentials)?;
        }
        Ok(())
    }

    fn operation_name(&self) -> &'static str {
        "Remove node"
    }

    fn describe(&self) -> String {
        format!("{}: {}", self.operation_name(), self.name)
    }
}
