//! Structural constraints a network must satisfy.
//!
//! Each network type registers a fixed set of constraints; documents may
//! add more. A constraint check returns a human-readable description of
//! the first violation it finds.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::network::Network;
use crate::variable::VariableKind;

/// A structural rule over nodes and links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constraint {
    NoSelfLoop,
    NoMultipleLinks,
    NoCycle,
    OnlyDirectedLinks,
    OnlyChanceNodes,
    DecisionsTotallyOrdered,
    NoUtilityChildren,
}

impl Constraint {
    /// Identifier used in documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Constraint::NoSelfLoop => "NoSelfLoop",
            Constraint::NoMultipleLinks => "NoMultipleLinks",
            Constraint::NoCycle => "NoCycle",
            Constraint::OnlyDirectedLinks => "OnlyDirectedLinks",
            Constraint::OnlyChanceNodes => "OnlyChanceNodes",
            Constraint::DecisionsTotallyOrdered => "DecisionsTotallyOrdered",
            Constraint::NoUtilityChildren => "NoUtilityChildren",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NoSelfLoop" => Some(Constraint::NoSelfLoop),
            "NoMultipleLinks" => Some(Constraint::NoMultipleLinks),
            "NoCycle" => Some(Constraint::NoCycle),
            "OnlyDirectedLinks" => Some(Constraint::OnlyDirectedLinks),
            "OnlyChanceNodes" => Some(Constraint::OnlyChanceNodes),
            "DecisionsTotallyOrdered" => Some(Constraint::DecisionsTotallyOrdered),
            "NoUtilityChildren" => Some(Constraint::NoUtilityChildren),
            _ => None,
        }
    }

    /// Check the constraint, describing the violation on failure.
    pub fn check(&self, network: &Network) -> Result<(), String> {
        match self {
            Constraint::NoSelfLoop => match network.links().iter().find(|l| l.source == l.target) {
                Some(link) => Err(format!("{self}: {link}")),
                None => Ok(()),
            },
            Constraint::NoMultipleLinks => {
                let mut seen = BTreeSet::new();
                for link in network.links() {
                    let pair = if link.source <= link.target {
                        (link.source.as_str(), link.target.as_str())
                    } else {
                        (link.target.as_str(), link.source.as_str())
                    };
                    if !seen.insert(pair) {
                        return Err(format!("{self}: {} and {}", pair.0, pair.1));
                    }
                }
                Ok(())
            }
            Constraint::NoCycle => match find_cycle(network) {
                Some(cycle) => Err(format!("{self}: {}", cycle.join(" -> "))),
                None => Ok(()),
            },
            Constraint::OnlyDirectedLinks => match network.links().iter().find(|l| !l.directed) {
                Some(link) => Err(format!("{self}: {link}")),
                None => Ok(()),
            },
            Constraint::OnlyChanceNodes => match network
                .nodes()
                .find(|n| n.node_type() != VariableKind::Chance)
            {
                Some(node) => Err(format!("{self}: {node}")),
                None => Ok(()),
            },
            Constraint::DecisionsTotallyOrdered => check_decision_order(network)
                .map_err(|(first, second)| format!("{self}: no path from {first} to {second}")),
            Constraint::NoUtilityChildren => {
                let utility_parent = network.links().iter().find(|l| {
                    l.directed
                        && network
                            .node(&l.source)
                            .is_ok_and(|n| n.node_type() == VariableKind::Utility)
                });
                match utility_parent {
                    Some(link) => Err(format!("{self}: {link}")),
                    None => Ok(()),
                }
            }
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Constraint::NoSelfLoop => "no self loops",
            Constraint::NoMultipleLinks => "no multiple links",
            Constraint::NoCycle => "no directed cycles",
            Constraint::OnlyDirectedLinks => "only directed links",
            Constraint::OnlyChanceNodes => "only chance nodes",
            Constraint::DecisionsTotallyOrdered => "decisions totally ordered",
            Constraint::NoUtilityChildren => "utility nodes have no children",
        };
        f.write_str(text)
    }
}

/// Adjacency over directed links, keyed by node name.
fn successors(network: &Network) -> BTreeMap<&str, Vec<&str>> {
    let mut adjacency: BTreeMap<&str, Vec<&str>> =
        network.nodes().map(|n| (n.name(), Vec::new())).collect();
    for link in network.links().iter().filter(|l| l.directed) {
        adjacency
            .entry(link.source.as_str())
            .or_default()
            .push(link.target.as_str());
    }
    adjacency
}

/// A directed cycle as a closed walk of node names, if one exists.
fn find_cycle(network: &Network) -> Option<Vec<String>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Fresh,
        Open,
        Done,
    }

    fn visit<'a>(
        node: &'a str,
        adjacency: &BTreeMap<&'a str, Vec<&'a str>>,
        marks: &mut BTreeMap<&'a str, Mark>,
        stack: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        marks.insert(node, Mark::Open);
        stack.push(node);
        for &next in adjacency.get(node).map(Vec::as_slice).unwrap_or_default() {
            match marks.get(next).copied().unwrap_or(Mark::Fresh) {
                Mark::Open => {
                    let start = stack.iter().position(|n| *n == next).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        stack[start..].iter().map(|n| n.to_string()).collect();
                    cycle.push(next.to_string());
                    return Some(cycle);
                }
                Mark::Fresh => {
                    if let Some(cycle) = visit(next, adjacency, marks, stack) {
                        return Some(cycle);
                    }
                }
                Mark::Done => {}
            }
        }
        stack.pop();
        marks.insert(node, Mark::Done);
        None
    }

    let adjacency = successors(network);
    let mut marks = BTreeMap::new();
    let mut stack = Vec::new();
    for &node in adjacency.keys() {
        if marks.get(node).copied().unwrap_or(Mark::Fresh) == Mark::Fresh {
            if let Some(cycle) = visit(node, &adjacency, &mut marks, &mut stack) {
                return Some(cycle);
            }
        }
    }
    None
}

/// Whether a directed path leads from `from` to `to`.
pub(crate) fn reachable(network: &Network, from: &str, to: &str) -> bool {
    let adjacency = successors(network);
    let mut seen = BTreeSet::new();
    let mut frontier = vec![from];
    while let Some(node) = frontier.pop() {
        if node == to {
            return true;
        }
        if seen.insert(node) {
            if let Some(next) = adjacency.get(node) {
                frontier.extend(next.iter().copied());
            }
        }
    }
    false
}

/// Consecutive decisions in topological order must be joined by a path.
/// A cyclic network is left to [`Constraint::NoCycle`].
fn check_decision_order(network: &Network) -> Result<(), (String, String)> {
    let Ok(decisions) = network.decision_order() else {
        return Ok(());
    };
    for pair in decisions.windows(2) {
        if !reachable(network, &pair[0], &pair[1]) {
            return Err((pair[0].clone(), pair[1].clone()));
        }
    }
    Ok(())
}
