//! The network container: nodes, links, constraints, and metadata.
//!
//! Nodes are kept in insertion order and looked up by name. Links are an
//! ordered list; removing and re-inserting at the recorded index restores
//! the exact prior order, which the edit engine relies on for undo.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constraint::Constraint;
use crate::hash::{self, Fingerprint, FingerprintError};
use crate::link::Link;
use crate::node::Node;
use crate::potential::{Potential, PotentialError, PotentialRole, TablePotential};
use crate::variable::{Variable, VariableKind};

/// Errors raised by network lookups and mutations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("duplicate node: {0}")]
    DuplicateNode(String),

    #[error("link not found: {0}")]
    LinkNotFound(String),

    #[error("cycle detected involving node {0}")]
    CycleDetected(String),

    #[error("invalid restriction on link {link}: {reason}")]
    InvalidRestriction { link: String, reason: String },

    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),

    #[error(transparent)]
    Potential(#[from] PotentialError),
}

/// The kinds of network the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkType {
    BayesianNetwork,
    InfluenceDiagram,
}

const BAYESIAN_NETWORK_CONSTRAINTS: &[Constraint] = &[
    Constraint::NoSelfLoop,
    Constraint::NoMultipleLinks,
    Constraint::NoCycle,
    Constraint::OnlyDirectedLinks,
    Constraint::OnlyChanceNodes,
];

const INFLUENCE_DIAGRAM_CONSTRAINTS: &[Constraint] = &[
    Constraint::NoSelfLoop,
    Constraint::NoMultipleLinks,
    Constraint::NoCycle,
    Constraint::OnlyDirectedLinks,
    Constraint::NoUtilityChildren,
    Constraint::DecisionsTotallyOrdered,
];

impl NetworkType {
    /// Document name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkType::BayesianNetwork => "BayesianNetwork",
            NetworkType::InfluenceDiagram => "InfluenceDiagram",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BayesianNetwork" => Some(NetworkType::BayesianNetwork),
            "InfluenceDiagram" => Some(NetworkType::InfluenceDiagram),
            _ => None,
        }
    }

    /// Constraints every network of this type carries.
    pub fn default_constraints(&self) -> &'static [Constraint] {
        match self {
            NetworkType::BayesianNetwork => BAYESIAN_NETWORK_CONSTRAINTS,
            NetworkType::InfluenceDiagram => INFLUENCE_DIAGRAM_CONSTRAINTS,
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decision criterion utilities are measured in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
    pub unit: Option<String>,
}

impl Criterion {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: None,
        }
    }
}

/// A Bayesian network or influence diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub name: String,
    pub network_type: NetworkType,
    nodes: IndexMap<String, Node>,
    links: Vec<Link>,
    constraints: Vec<Constraint>,
    pub decision_criteria: Vec<Criterion>,
    pub agents: Vec<String>,
    pub language: Option<String>,
    pub temporal_unit: Option<String>,
    pub comment: Option<String>,
    pub additional_properties: BTreeMap<String, String>,
}

impl Network {
    /// Create an empty network carrying its type's default constraints.
    pub fn new(name: impl Into<String>, network_type: NetworkType) -> Self {
        Self {
            name: name.into(),
            network_type,
            nodes: IndexMap::new(),
            links: Vec::new(),
            constraints: network_type.default_constraints().to_vec(),
            decision_criteria: Vec::new(),
            agents: Vec::new(),
            language: None,
            temporal_unit: None,
            comment: None,
            additional_properties: BTreeMap::new(),
        }
    }

    // --- Nodes ---

    /// Add a node at the end of the node order.
    pub fn add_node(&mut self, node: Node) -> Result<(), NetworkError> {
        let name = node.name().to_string();
        if self.nodes.contains_key(&name) {
            return Err(NetworkError::DuplicateNode(name));
        }
        self.nodes.insert(name, node);
        Ok(())
    }

    /// Insert a node at a position of the node order.
    pub fn insert_node_at(&mut self, index: usize, node: Node) -> Result<(), NetworkError> {
        let name = node.name().to_string();
        if self.nodes.contains_key(&name) {
            return Err(NetworkError::DuplicateNode(name));
        }
        let index = index.min(self.nodes.len());
        self.nodes.shift_insert(index, name, node);
        Ok(())
    }

    /// Remove a node and every link touching it.
    ///
    /// Returns the node's former position, the node, and the removed links
    /// with their former positions in ascending order.
    pub fn remove_node(&mut self, name: &str) -> Result<RemovedNode, NetworkError> {
        let (index, _, node) = self
            .nodes
            .shift_remove_full(name)
            .ok_or_else(|| NetworkError::NodeNotFound(name.to_string()))?;
        let mut links = Vec::new();
        let mut position = 0;
        self.links.retain(|link| {
            let keep = !link.touches(name);
            if !keep {
                links.push((position, link.clone()));
            }
            position += 1;
            keep
        });
        Ok(RemovedNode { index, node, links })
    }

    /// Look a node up by name.
    pub fn node(&self, name: &str) -> Result<&Node, NetworkError> {
        self.nodes
            .get(name)
            .ok_or_else(|| NetworkError::NodeNotFound(name.to_string()))
    }

    pub fn node_mut(&mut self, name: &str) -> Result<&mut Node, NetworkError> {
        self.nodes
            .get_mut(name)
            .ok_or_else(|| NetworkError::NodeNotFound(name.to_string()))
    }

    /// The variable wrapped by the named node.
    pub fn variable(&self, name: &str) -> Result<&Variable, NetworkError> {
        self.node(name).map(Node::variable)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Nodes of one kind, in insertion order.
    pub fn nodes_of(&self, kind: VariableKind) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(move |n| n.node_type() == kind)
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    // --- Links ---

    /// Add a link between two existing nodes.
    ///
    /// Potentials are not touched; callers update them separately.
    pub fn add_link(
        &mut self,
        source: &str,
        target: &str,
        directed: bool,
    ) -> Result<(), NetworkError> {
        self.add_link_with(Link::new(source, target, directed))
    }

    /// Add a prepared link, restriction included.
    ///
    /// The restriction is stored in normalized form; see
    /// [`Network::set_link_restriction`].
    pub fn add_link_with(&mut self, mut link: Link) -> Result<(), NetworkError> {
        self.node(&link.source)?;
        self.node(&link.target)?;
        if let Some(restriction) = link.restriction.take() {
            link.restriction = self.normalize_restriction(&link, restriction)?;
        }
        self.links.push(link);
        Ok(())
    }

    /// Re-insert a link at a position of the link order.
    pub fn insert_link_at(&mut self, index: usize, link: Link) -> Result<(), NetworkError> {
        self.node(&link.source)?;
        self.node(&link.target)?;
        let index = index.min(self.links.len());
        self.links.insert(index, link);
        Ok(())
    }

    /// Remove the link joining two nodes, returning it with its position.
    pub fn remove_link(
        &mut self,
        source: &str,
        target: &str,
        directed: bool,
    ) -> Result<(usize, Link), NetworkError> {
        let index = self
            .links
            .iter()
            .position(|l| l.connects(source, target, directed))
            .ok_or_else(|| link_not_found(source, target, directed))?;
        Ok((index, self.links.remove(index)))
    }

    /// Remove the link at a position of the link order.
    pub fn remove_link_at(&mut self, index: usize) -> Result<Link, NetworkError> {
        if index >= self.links.len() {
            return Err(NetworkError::LinkNotFound(format!("#{index}")));
        }
        Ok(self.links.remove(index))
    }

    /// The link joining two nodes, if any.
    pub fn link(&self, source: &str, target: &str, directed: bool) -> Option<&Link> {
        self.links.iter().find(|l| l.connects(source, target, directed))
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Attach or clear the restriction of an existing link, returning the
    /// previous one.
    ///
    /// A restriction must span exactly the link's two endpoints, both
    /// discrete, with every cell 0 (forbidden) or 1 (allowed). It is stored
    /// with axes `[source, target]` and the restriction role; one that
    /// forbids nothing is stored as no restriction at all.
    pub fn set_link_restriction(
        &mut self,
        source: &str,
        target: &str,
        directed: bool,
        restriction: Option<TablePotential>,
    ) -> Result<Option<TablePotential>, NetworkError> {
        let index = self
            .links
            .iter()
            .position(|l| l.connects(source, target, directed))
            .ok_or_else(|| link_not_found(source, target, directed))?;
        let restriction = match restriction {
            Some(r) => self.normalize_restriction(&self.links[index], r)?,
            None => None,
        };
        Ok(std::mem::replace(
            &mut self.links[index].restriction,
            restriction,
        ))
    }

    fn normalize_restriction(
        &self,
        link: &Link,
        restriction: TablePotential,
    ) -> Result<Option<TablePotential>, NetworkError> {
        let invalid = |reason: String| NetworkError::InvalidRestriction {
            link: link.to_string(),
            reason,
        };
        let source = self.variable(&link.source)?;
        let target = self.variable(&link.target)?;
        if source.is_numeric() || target.is_numeric() {
            return Err(invalid("both endpoints must be discrete".to_string()));
        }

        let axes = restriction.variables();
        let names: Vec<&str> = axes.iter().map(|v| v.name.as_str()).collect();
        let (source_axis, target_axis) = match names.as_slice() {
            [a, b] if *a == source.name && *b == target.name => (0, 1),
            [a, b] if *a == target.name && *b == source.name => (1, 0),
            _ => {
                return Err(invalid(format!(
                    "expected variables {} and {}, found [{}]",
                    source.name,
                    target.name,
                    names.join(", ")
                )))
            }
        };
        if axes[source_axis] != *source || axes[target_axis] != *target {
            return Err(invalid("variable domains differ from the network's".to_string()));
        }
        if let Some(cell) = restriction.values().iter().find(|v| **v != 0.0 && **v != 1.0) {
            return Err(invalid(format!("cell {cell} is neither 0 nor 1")));
        }

        let source_states = source.num_states();
        let mut values = vec![0.0; restriction.table_size()];
        let mut coordinates = [0; 2];
        for (position, value) in values.iter_mut().enumerate() {
            coordinates[source_axis] = position % source_states;
            coordinates[target_axis] = position / source_states;
            *value = restriction.value_at(&coordinates);
        }
        if !values.contains(&0.0) {
            return Ok(None);
        }
        let normalized = TablePotential::with_values(
            vec![source.clone(), target.clone()],
            PotentialRole::Restriction,
            values,
        )?;
        Ok(Some(normalized))
    }

    /// Names of the nodes with a directed link into `name`, in link order.
    pub fn parents(&self, name: &str) -> Vec<&str> {
        self.links
            .iter()
            .filter(|l| l.directed && l.target == name)
            .map(|l| l.source.as_str())
            .collect()
    }

    /// Names of the nodes `name` has a directed link into, in link order.
    pub fn children(&self, name: &str) -> Vec<&str> {
        self.links
            .iter()
            .filter(|l| l.directed && l.source == name)
            .map(|l| l.target.as_str())
            .collect()
    }

    // --- Potentials ---

    /// Replace a node's potentials, returning the previous list.
    pub fn set_potentials(
        &mut self,
        name: &str,
        potentials: Vec<Potential>,
    ) -> Result<Vec<Potential>, NetworkError> {
        Ok(self.node_mut(name)?.replace_potentials(potentials))
    }

    pub fn node_potentials(&self, name: &str) -> Result<&[Potential], NetworkError> {
        self.node(name).map(Node::potentials)
    }

    pub fn node_potentials_mut(&mut self, name: &str) -> Result<&mut [Potential], NetworkError> {
        self.node_mut(name).map(Node::potentials_mut)
    }

    /// Every potential of every node, with the owning node's name.
    pub fn potentials(&self) -> impl Iterator<Item = (&str, &Potential)> {
        self.nodes
            .values()
            .flat_map(|n| n.potentials().iter().map(move |p| (n.name(), p)))
    }

    // --- Constraints ---

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Register an extra constraint; already registered ones are ignored.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        if !self.constraints.contains(&constraint) {
            self.constraints.push(constraint);
        }
    }

    /// Drop a constraint, reporting whether it was registered.
    pub fn remove_constraint(&mut self, constraint: Constraint) -> bool {
        let before = self.constraints.len();
        self.constraints.retain(|c| *c != constraint);
        self.constraints.len() != before
    }

    /// Constraints beyond the network type's defaults.
    pub fn additional_constraints(&self) -> Vec<Constraint> {
        let defaults = self.network_type.default_constraints();
        self.constraints
            .iter()
            .filter(|c| !defaults.contains(c))
            .copied()
            .collect()
    }

    /// Whether every registered constraint holds.
    pub fn check_constraints(&self) -> bool {
        self.constraints.iter().all(|c| c.check(self).is_ok())
    }

    /// One description per violated constraint.
    pub fn unsatisfied_constraints(&self) -> Vec<String> {
        self.constraints
            .iter()
            .filter_map(|c| c.check(self).err())
            .collect()
    }

    // --- Orders ---

    /// Node names ordered so every directed link points forward.
    ///
    /// Ties are broken by insertion order.
    pub fn topological_order(&self) -> Result<Vec<String>, NetworkError> {
        let mut in_degree: IndexMap<&str, usize> =
            self.nodes.keys().map(|k| (k.as_str(), 0)).collect();
        for link in self.links.iter().filter(|l| l.directed) {
            if let Some(deg) = in_degree.get_mut(link.target.as_str()) {
                *deg += 1;
            }
        }

        let mut order = Vec::with_capacity(self.nodes.len());
        let mut placed = vec![false; in_degree.len()];
        while order.len() < in_degree.len() {
            let next = in_degree
                .iter()
                .enumerate()
                .find(|(i, (_, deg))| !placed[*i] && **deg == 0)
                .map(|(i, (name, _))| (i, *name));
            let Some((index, name)) = next else {
                let stuck = in_degree
                    .iter()
                    .enumerate()
                    .find(|(i, _)| !placed[*i])
                    .map(|(_, (name, _))| name.to_string())
                    .unwrap_or_default();
                return Err(NetworkError::CycleDetected(stuck));
            };
            placed[index] = true;
            order.push(name.to_string());
            for child in self.children(name) {
                if let Some(deg) = in_degree.get_mut(child) {
                    *deg = deg.saturating_sub(1);
                }
            }
        }
        Ok(order)
    }

    /// Decision nodes in topological order.
    pub fn decision_order(&self) -> Result<Vec<String>, NetworkError> {
        Ok(self
            .topological_order()?
            .into_iter()
            .filter(|n| {
                self.nodes
                    .get(n)
                    .is_some_and(|node| node.node_type() == VariableKind::Decision)
            })
            .collect())
    }

    /// Whether a directed path leads from one node to another.
    pub fn has_path(&self, from: &str, to: &str) -> bool {
        crate::constraint::reachable(self, from, to)
    }

    /// SHA-256 over the full network state.
    pub fn fingerprint(&self) -> Result<Fingerprint, NetworkError> {
        Ok(hash::fingerprint(self)?)
    }
}

fn link_not_found(source: &str, target: &str, directed: bool) -> NetworkError {
    NetworkError::LinkNotFound(Link::new(source, target, directed).to_string())
}

/// What [`Network::remove_node`] took out of the network.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedNode {
    pub index: usize,
    pub node: Node,
    pub links: Vec<(usize, Link)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chance(name: &str) -> Node {
        Node::new(Variable::chance(name, ["yes", "no"]))
    }

    fn chain() -> Network {
        let mut net = Network::new("chain", NetworkType::BayesianNetwork);
        for name in ["A", "B", "C"] {
            net.add_node(chance(name)).unwrap();
        }
        net.add_link("A", "B", true).unwrap();
        net.add_link("B", "C", true).unwrap();
        net
    }

    #[test]
    fn duplicate_and_missing_nodes() {
        let mut net = chain();
        assert_eq!(
            net.add_node(chance("A")),
            Err(NetworkError::DuplicateNode("A".to_string()))
        );
        assert!(matches!(net.node("Z"), Err(NetworkError::NodeNotFound(_))));
        assert!(net.add_link("A", "Z", true).is_err());
    }

    #[test]
    fn remove_node_drops_incident_links() {
        let mut net = chain();
        let removed = net.remove_node("B").unwrap();
        assert_eq!(removed.index, 1);
        assert_eq!(removed.links.len(), 2);
        assert!(net.links().is_empty());

        net.insert_node_at(removed.index, removed.node).unwrap();
        for (index, link) in removed.links {
            net.insert_link_at(index, link).unwrap();
        }
        assert_eq!(net.fingerprint().unwrap(), chain().fingerprint().unwrap());
    }

    #[test]
    fn parents_children_and_order() {
        let net = chain();
        assert_eq!(net.parents("B"), vec!["A"]);
        assert_eq!(net.children("B"), vec!["C"]);
        assert_eq!(net.topological_order().unwrap(), vec!["A", "B", "C"]);
        assert!(net.has_path("A", "C"));
        assert!(!net.has_path("C", "A"));
    }

    #[test]
    fn constraint_report_names_each_violation() {
        let mut net = chain();
        assert!(net.check_constraints());
        net.add_link("C", "A", true).unwrap();
        net.add_link("A", "A", true).unwrap();
        assert!(!net.check_constraints());
        let report = net.unsatisfied_constraints();
        assert_eq!(report.len(), 2);
        assert!(report[0].starts_with("no self loops"));
        assert!(matches!(
            net.topological_order(),
            Err(NetworkError::CycleDetected(_))
        ));
    }

    #[test]
    fn remove_missing_link() {
        let mut net = chain();
        assert!(matches!(
            net.remove_link("B", "A", true),
            Err(NetworkError::LinkNotFound(_))
        ));
        let (index, link) = net.remove_link("A", "B", true).unwrap();
        assert_eq!(index, 0);
        assert_eq!(link.to_string(), "A -> B");
    }

    #[test]
    fn potentials_are_swapped_whole() {
        let mut net = chain();
        let a = net.variable("A").unwrap().clone();
        let table = TablePotential::new(vec![a], PotentialRole::ConditionalProbability).unwrap();
        let old = net
            .set_potentials("A", vec![Potential::Table(table)])
            .unwrap();
        assert!(old.is_empty());
        assert_eq!(net.potentials().count(), 1);
        assert_eq!(net.node_potentials("A").unwrap().len(), 1);
    }

    fn restriction(variables: Vec<Variable>, values: Vec<f64>) -> TablePotential {
        TablePotential::with_values(variables, PotentialRole::Unspecified, values).unwrap()
    }

    #[test]
    fn transposed_restriction_is_stored_source_first() {
        let mut net = chain();
        let (a, b) = (net.variable("A").unwrap().clone(), net.variable("B").unwrap().clone());
        // B = no is forbidden when A = yes.
        let transposed = restriction(vec![b.clone(), a.clone()], vec![1.0, 0.0, 1.0, 1.0]);
        net.set_link_restriction("A", "B", true, Some(transposed))
            .unwrap();

        let stored = net.link("A", "B", true).unwrap().restriction.as_ref().unwrap();
        assert_eq!(stored.variables(), &[a, b][..]);
        assert_eq!(stored.role, PotentialRole::Restriction);
        assert_eq!(stored.values(), &[1.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn permissive_restriction_is_dropped() {
        let mut net = chain();
        let (a, b) = (net.variable("A").unwrap().clone(), net.variable("B").unwrap().clone());
        net.set_link_restriction("A", "B", true, Some(restriction(vec![a, b], vec![1.0; 4])))
            .unwrap();
        assert_eq!(net.link("A", "B", true).unwrap().restriction, None);
        assert!(!net.link("A", "B", true).unwrap().has_restrictions());
    }

    #[test]
    fn malformed_restrictions_are_rejected() {
        let mut net = chain();
        let a = net.variable("A").unwrap().clone();
        let b = net.variable("B").unwrap().clone();
        let c = net.variable("C").unwrap().clone();
        let other_b = Variable::chance("B", ["low", "mid", "high"]);
        let weight = Variable::numeric("W", VariableKind::Chance, 0.0, 1.0);
        net.add_node(Node::new(weight)).unwrap();
        net.add_link("A", "W", true).unwrap();

        let cases = [
            ("A", "B", restriction(vec![a.clone(), c], vec![0.0, 1.0, 1.0, 1.0])),
            ("A", "B", restriction(vec![a.clone()], vec![0.0, 1.0])),
            ("A", "B", restriction(vec![a.clone(), other_b], vec![0.0; 6])),
            ("A", "B", restriction(vec![a.clone(), b], vec![0.0, 0.5, 1.0, 1.0])),
            ("A", "W", restriction(vec![a], vec![0.0, 1.0])),
        ];
        for (source, target, table) in cases {
            let err = net
                .set_link_restriction(source, target, true, Some(table))
                .unwrap_err();
            assert!(matches!(err, NetworkError::InvalidRestriction { .. }), "{err}");
        }
        assert!(net.links().iter().all(|l| l.restriction.is_none()));
    }

    #[test]
    fn prepared_links_are_normalized_too() {
        let mut net = chain();
        let (b, c) = (net.variable("B").unwrap().clone(), net.variable("C").unwrap().clone());
        net.remove_link("B", "C", true).unwrap();
        let link = Link::new("B", "C", true)
            .with_restriction(restriction(vec![c, b], vec![1.0; 4]));
        net.add_link_with(link).unwrap();
        assert_eq!(net.link("B", "C", true).unwrap().restriction, None);
    }

    #[test]
    fn constraints_can_be_dropped() {
        let mut net = chain();
        assert!(net.remove_constraint(Constraint::NoMultipleLinks));
        assert!(!net.remove_constraint(Constraint::NoMultipleLinks));
        net.add_link("A", "B", true).unwrap();
        assert!(net.check_constraints());
    }

    #[test]
    fn influence_diagrams_allow_decisions() {
        let net = Network::new("id", NetworkType::InfluenceDiagram);
        assert!(!net.constraints().contains(&Constraint::OnlyChanceNodes));
        assert!(net.additional_constraints().is_empty());
    }
}
