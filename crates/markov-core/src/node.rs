//! Nodes: a variable plus the potentials attached to it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::potential::{Potential, PotentialRole};
use crate::variable::{Variable, VariableKind};

/// A node of a probabilistic network.
///
/// Wraps exactly one variable. The node type mirrors the variable kind.
/// Decision nodes normally carry no potential; when they do, the
/// potentials are policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    variable: Variable,
    potentials: Vec<Potential>,
    /// Free-form name/value properties.
    pub additional_properties: BTreeMap<String, String>,
}

impl Node {
    /// Create a node without potentials.
    pub fn new(variable: Variable) -> Self {
        Self {
            variable,
            potentials: Vec::new(),
            additional_properties: BTreeMap::new(),
        }
    }

    /// Builder: attach potentials.
    pub fn with_potentials(mut self, potentials: Vec<Potential>) -> Self {
        self.potentials = potentials;
        self
    }

    /// Builder: attach a single potential.
    pub fn with_potential(mut self, potential: Potential) -> Self {
        self.potentials.push(potential);
        self
    }

    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    pub fn name(&self) -> &str {
        &self.variable.name
    }

    /// The node type, which always mirrors the variable kind.
    pub fn node_type(&self) -> VariableKind {
        self.variable.kind
    }

    pub fn potentials(&self) -> &[Potential] {
        &self.potentials
    }

    /// Replace the potential list, returning the previous one.
    pub(crate) fn replace_potentials(&mut self, potentials: Vec<Potential>) -> Vec<Potential> {
        std::mem::replace(&mut self.potentials, potentials)
    }

    pub(crate) fn potentials_mut(&mut self) -> &mut [Potential] {
        &mut self.potentials
    }

    /// Whether this is a decision node with an imposed or computed policy.
    pub fn has_policy(&self) -> bool {
        self.node_type() == VariableKind::Decision
            && self
                .potentials
                .iter()
                .any(|p| p.role() == PotentialRole::Policy)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.variable.name, self.variable.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::potential::TablePotential;

    #[test]
    fn node_type_mirrors_variable() {
        let node = Node::new(Variable::decision("Advice", ["wait", "call"]));
        assert_eq!(node.node_type(), VariableKind::Decision);
        assert!(!node.has_policy());
    }

    #[test]
    fn policy_detection() {
        let d = Variable::decision("Advice", ["wait", "call"]);
        let policy = TablePotential::new(vec![d.clone()], PotentialRole::Policy).unwrap();
        let node = Node::new(d).with_potential(Potential::Table(policy));
        assert!(node.has_policy());
    }
}
