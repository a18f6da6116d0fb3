//! Strategy trees and advice extraction.
//!
//! A strategy tree alternates between observed chance variables, which
//! branch on their states, and decisions, which carry a single branch
//! holding the optimal state. The leaves are the final decision's choices.

use std::fmt;

use markov_core::Variable;
use serde::Serialize;
use tracing::warn;

/// One node of a strategy tree.
///
/// The empty tree (no variable, no branches) is the result for a network
/// without decisions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyTree {
    pub variable: Option<Variable>,
    pub branches: Vec<StrategyBranch>,
}

/// A set of states of the parent node's variable and what follows them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyBranch {
    /// State indices guarding this branch.
    pub states: Vec<usize>,
    /// `None` for a leaf.
    pub subtree: Option<StrategyTree>,
}

impl StrategyTree {
    pub fn empty() -> Self {
        Self {
            variable: None,
            branches: Vec::new(),
        }
    }

    /// A decision node fixing `decision` at `state`.
    pub fn decision(decision: Variable, state: usize, then: Option<StrategyTree>) -> Self {
        Self {
            variable: Some(decision),
            branches: vec![StrategyBranch {
                states: vec![state],
                subtree: then,
            }],
        }
    }

    /// A chance node with one subtree per state of `variable`.
    ///
    /// States whose subtrees are equal share one branch.
    pub fn observation(variable: Variable, subtrees: Vec<StrategyTree>) -> Self {
        let mut branches: Vec<StrategyBranch> = Vec::new();
        for (state, subtree) in subtrees.into_iter().enumerate() {
            match branches
                .iter_mut()
                .find(|b| b.subtree.as_ref() == Some(&subtree))
            {
                Some(branch) => branch.states.push(state),
                None => branches.push(StrategyBranch {
                    states: vec![state],
                    subtree: Some(subtree),
                }),
            }
        }
        Self {
            variable: Some(variable),
            branches,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Labels of every leaf state, depth first in branch order.
    pub fn leaf_states(&self) -> Vec<&str> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a str>) {
        for branch in &self.branches {
            match &branch.subtree {
                Some(subtree) => subtree.collect_leaves(leaves),
                None => {
                    if let Some(variable) = &self.variable {
                        leaves.extend(
                            branch
                                .states
                                .iter()
                                .filter_map(|s| variable.states().get(*s))
                                .map(|s| s.name()),
                        );
                    }
                }
            }
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let Some(variable) = &self.variable else {
            return Ok(());
        };
        for branch in &self.branches {
            let labels: Vec<&str> = branch
                .states
                .iter()
                .filter_map(|s| variable.states().get(*s))
                .map(|s| s.name())
                .collect();
            writeln!(
                f,
                "{:indent$}{} = {}",
                "",
                variable.name,
                labels.join(" | "),
                indent = depth * 2
            )?;
            if let Some(subtree) = &branch.subtree {
                subtree.write_indented(f, depth + 1)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for StrategyTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Advisory text read off a strategy tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advice {
    /// Every leaf label, concatenated.
    pub text: String,
    pub leaves: Vec<String>,
}

impl Advice {
    /// More than one leaf matched; the text joins all of them.
    pub fn is_ambiguous(&self) -> bool {
        self.leaves.len() > 1
    }
}

impl fmt::Display for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Walk the tree and concatenate every leaf state label.
///
/// A well-posed request yields exactly one leaf. Several leaves are still
/// concatenated, with a warning.
pub fn extract_advice(tree: &StrategyTree) -> Advice {
    let leaves: Vec<String> = tree.leaf_states().into_iter().map(String::from).collect();
    if leaves.len() > 1 {
        warn!(leaves = ?leaves, "multiple advices found in strategy tree");
    }
    Advice {
        text: leaves.concat(),
        leaves,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn treat() -> Variable {
        Variable::decision("Treat", ["no", "yes"])
    }

    fn test() -> Variable {
        Variable::chance("Test", ["negative", "positive"])
    }

    #[test]
    fn single_decision_yields_one_leaf() {
        let tree = StrategyTree::decision(treat(), 1, None);
        let advice = extract_advice(&tree);
        assert_eq!(advice.text, "yes");
        assert!(!advice.is_ambiguous());
    }

    #[test]
    fn equal_subtrees_share_a_branch() {
        let tree = StrategyTree::observation(
            test(),
            vec![
                StrategyTree::decision(treat(), 0, None),
                StrategyTree::decision(treat(), 0, None),
            ],
        );
        assert_eq!(tree.branches.len(), 1);
        assert_eq!(tree.branches[0].states, vec![0, 1]);
        assert_eq!(extract_advice(&tree).leaves, vec!["no"]);
    }

    #[test]
    fn distinct_subtrees_concatenate_in_state_order() {
        let tree = StrategyTree::observation(
            test(),
            vec![
                StrategyTree::decision(treat(), 0, None),
                StrategyTree::decision(treat(), 1, None),
            ],
        );
        let advice = extract_advice(&tree);
        assert_eq!(advice.text, "noyes");
        assert!(advice.is_ambiguous());
    }

    #[test]
    fn display_indents_by_depth() {
        let tree = StrategyTree::observation(
            test(),
            vec![
                StrategyTree::decision(treat(), 0, None),
                StrategyTree::decision(treat(), 1, None),
            ],
        );
        assert_eq!(
            tree.to_string(),
            "Test = negative\n  Treat = no\nTest = positive\n  Treat = yes\n"
        );
    }

    #[test]
    fn empty_tree_has_no_advice() {
        let advice = extract_advice(&StrategyTree::empty());
        assert_eq!(advice.text, "");
        assert!(advice.leaves.is_empty());
    }
}
