//! Links between nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::potential::TablePotential;

/// A directed or undirected link between two nodes, identified by name.
///
/// A link may carry a restriction potential over `[source, target]` whose
/// zero cells forbid the corresponding joint configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub directed: bool,
    pub restriction: Option<TablePotential>,
}

impl Link {
    pub fn new(source: impl Into<String>, target: impl Into<String>, directed: bool) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            directed,
            restriction: None,
        }
    }

    /// Builder: attach a restriction potential.
    pub fn with_restriction(mut self, restriction: TablePotential) -> Self {
        self.restriction = Some(restriction);
        self
    }

    /// Whether this link joins `a` and `b` with the given directedness.
    ///
    /// Undirected links match in either orientation.
    pub fn connects(&self, a: &str, b: &str, directed: bool) -> bool {
        if self.directed != directed {
            return false;
        }
        if directed {
            self.source == a && self.target == b
        } else {
            (self.source == a && self.target == b) || (self.source == b && self.target == a)
        }
    }

    /// Whether the link touches the named node.
    pub fn touches(&self, node: &str) -> bool {
        self.source == node || self.target == node
    }

    /// Whether the restriction forbids at least one configuration.
    pub fn has_restrictions(&self) -> bool {
        self.restriction
            .as_ref()
            .is_some_and(|r| r.values().iter().any(|v| *v == 0.0))
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.directed { "->" } else { "--" };
        write!(f, "{} {arrow} {}", self.source, self.target)
    }
}
