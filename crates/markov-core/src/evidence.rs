//! Findings and evidence cases.

use indexmap::IndexMap;

use crate::network::Network;
use crate::variable::Variable;

/// An observed value of one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub variable: Variable,
    /// Observed state of a discrete variable.
    pub state_index: usize,
    /// Observed value of a numeric variable.
    pub numeric_value: Option<f64>,
}

impl Finding {
    /// The label of the observed state, for discrete variables.
    pub fn state_name(&self) -> Option<&str> {
        self.variable.states().get(self.state_index).map(|s| s.name())
    }
}

/// Errors raised while building an evidence case.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvidenceError {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// The observed value lies outside the variable's domain.
    #[error("invalid state '{state}' for variable '{variable}'")]
    InvalidState { variable: String, state: String },

    /// The variable already carries a different finding.
    #[error("incompatible evidence for '{variable}': already '{existing}', got '{incoming}'")]
    IncompatibleEvidence {
        variable: String,
        existing: String,
        incoming: String,
    },
}

/// Findings keyed by variable name, at most one per variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvidenceCase {
    findings: IndexMap<String, Finding>,
}

impl EvidenceCase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finding. Repeating an identical finding is a no-op.
    pub fn insert(&mut self, finding: Finding) -> Result<(), EvidenceError> {
        let variable = &finding.variable;
        if variable.is_numeric() {
            let value = finding.numeric_value.filter(|v| variable.admits(*v));
            if value.is_none() {
                return Err(EvidenceError::InvalidState {
                    variable: variable.name.clone(),
                    state: describe(&finding),
                });
            }
        } else if finding.state_index >= variable.num_states() {
            return Err(EvidenceError::InvalidState {
                variable: variable.name.clone(),
                state: describe(&finding),
            });
        }

        if let Some(existing) = self.findings.get(&variable.name) {
            if existing.state_index == finding.state_index
                && existing.numeric_value == finding.numeric_value
            {
                return Ok(());
            }
            return Err(EvidenceError::IncompatibleEvidence {
                variable: variable.name.clone(),
                existing: describe(existing),
                incoming: describe(&finding),
            });
        }
        self.findings.insert(variable.name.clone(), finding);
        Ok(())
    }

    /// Observe the named state of a network variable.
    pub fn add_finding(
        &mut self,
        network: &Network,
        variable: &str,
        state: &str,
    ) -> Result<(), EvidenceError> {
        let node = network
            .node(variable)
            .map_err(|_| EvidenceError::NodeNotFound(variable.to_string()))?;
        let variable = node.variable().clone();
        let state_index =
            variable
                .state_index(state)
                .ok_or_else(|| EvidenceError::InvalidState {
                    variable: variable.name.clone(),
                    state: state.to_string(),
                })?;
        self.insert(Finding {
            variable,
            state_index,
            numeric_value: None,
        })
    }

    /// Observe a value of a numeric network variable.
    pub fn add_numeric_finding(
        &mut self,
        network: &Network,
        variable: &str,
        value: f64,
    ) -> Result<(), EvidenceError> {
        let node = network
            .node(variable)
            .map_err(|_| EvidenceError::NodeNotFound(variable.to_string()))?;
        self.insert(Finding {
            variable: node.variable().clone(),
            state_index: 0,
            numeric_value: Some(value),
        })
    }

    pub fn finding(&self, variable: &str) -> Option<&Finding> {
        self.findings.get(variable)
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.findings.contains_key(variable)
    }

    /// Findings in insertion order.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.values()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}

fn describe(finding: &Finding) -> String {
    match (finding.numeric_value, finding.state_name()) {
        (Some(value), _) => value.to_string(),
        (None, Some(name)) => name.to_string(),
        (None, None) => format!("#{}", finding.state_index),
    }
}
