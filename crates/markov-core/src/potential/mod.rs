//! Potentials: tables and distributions attached to nodes.
//!
//! [`Potential`] is a closed union of the supported variants. Each variant
//! answers the same operation table (projection, adding and removing a
//! variable) so callers never need to know which one they hold.

pub mod distribution;
pub mod exact;
pub mod ops;
pub mod table;
pub mod uncertain;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::evidence::EvidenceCase;
use crate::variable::Variable;

pub use distribution::DistributionPotential;
pub use exact::ExactDistrPotential;
pub use table::TablePotential;
pub use uncertain::{has_uncertain_values, UncertainValue};

/// What a potential represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PotentialRole {
    ConditionalProbability,
    Utility,
    Policy,
    Restriction,
    Unspecified,
}

impl PotentialRole {
    /// Name used in documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            PotentialRole::ConditionalProbability => "conditionalProbability",
            PotentialRole::Utility => "utility",
            PotentialRole::Policy => "policy",
            PotentialRole::Restriction => "restriction",
            PotentialRole::Unspecified => "unspecified",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "conditionalProbability" => Some(PotentialRole::ConditionalProbability),
            "utility" => Some(PotentialRole::Utility),
            "policy" => Some(PotentialRole::Policy),
            "restriction" => Some(PotentialRole::Restriction),
            "unspecified" => Some(PotentialRole::Unspecified),
            _ => None,
        }
    }
}

impl fmt::Display for PotentialRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Misuse of the potential algebra.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PotentialError {
    /// The potential cannot be restricted to a table.
    #[error("{kind} potential is not projectable: {reason}")]
    NonProjectable { kind: String, reason: String },

    /// An evidenced variable belongs to another decision criterion.
    #[error("variable '{variable}' has criterion '{found}', potential expects '{expected}'")]
    WrongCriterion {
        variable: String,
        expected: String,
        found: String,
    },

    /// Value array length does not match the variables.
    #[error("table shape mismatch: expected {expected} cells, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Numeric variables cannot be table axes.
    #[error("numeric variable '{0}' cannot index a table")]
    NumericAxis(String),

    /// A discrete variable without states.
    #[error("variable '{0}' has no states")]
    EmptyDomain(String),

    /// The same variable appears twice.
    #[error("variable '{0}' appears more than once")]
    DuplicateVariable(String),

    /// A state index outside the variable's domain.
    #[error("state index {index} out of range for variable '{variable}'")]
    StateOutOfRange { variable: String, index: usize },

    /// A conditioning variable is not fixed by the configuration.
    #[error("configuration does not fix variable '{0}'")]
    MissingConfiguration(String),
}

/// A potential attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Potential {
    Table(TablePotential),
    ExactDistr(ExactDistrPotential),
    Distribution(DistributionPotential),
}

impl Potential {
    pub fn variables(&self) -> &[Variable] {
        match self {
            Potential::Table(t) => t.variables(),
            Potential::ExactDistr(e) => e.variables(),
            Potential::Distribution(d) => d.variables(),
        }
    }

    pub fn role(&self) -> PotentialRole {
        match self {
            Potential::Table(t) => t.role,
            Potential::ExactDistr(e) => e.role,
            Potential::Distribution(d) => d.role,
        }
    }

    /// Decision criterion of a utility potential.
    pub fn criterion(&self) -> Option<&str> {
        match self {
            Potential::Table(t) => t.criterion.as_deref(),
            Potential::ExactDistr(e) => e.child_variable().criterion.as_deref(),
            Potential::Distribution(d) => d.variables()[0].criterion.as_deref(),
        }
    }

    /// The variable at index 0, if any.
    pub fn child_variable(&self) -> Option<&Variable> {
        self.variables().first()
    }

    /// Discriminator name used in documents and diagnostics.
    pub fn kind_name(&self) -> &str {
        match self {
            Potential::Table(_) => "Table",
            Potential::ExactDistr(_) => "ExactDistr",
            Potential::Distribution(d) => &d.distribution,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables().iter().any(|v| v.name == name)
    }

    /// Restrict the potential to its non-evidenced variables.
    pub fn table_project(
        &self,
        evidence: &EvidenceCase,
    ) -> Result<Vec<TablePotential>, PotentialError> {
        match self {
            Potential::Table(t) => t.table_project(evidence),
            Potential::ExactDistr(e) => e.table_project(evidence),
            Potential::Distribution(d) => Err(PotentialError::NonProjectable {
                kind: d.distribution.clone(),
                reason: "parametric distributions have no table form".to_string(),
            }),
        }
    }

    /// Return a copy extended with `variable`.
    pub fn add_variable(&self, variable: &Variable) -> Result<Potential, PotentialError> {
        Ok(match self {
            Potential::Table(t) => Potential::Table(t.add_variable(variable)?),
            Potential::ExactDistr(e) => Potential::ExactDistr(e.add_variable(variable)?),
            Potential::Distribution(d) => Potential::Distribution(d.add_variable(variable)?),
        })
    }

    /// Return a copy without `variable`.
    pub fn remove_variable(&self, variable: &Variable) -> Potential {
        match self {
            Potential::Table(t) => Potential::Table(t.remove_variable(variable)),
            Potential::ExactDistr(e) => Potential::ExactDistr(e.remove_variable(variable)),
            Potential::Distribution(d) => Potential::Distribution(d.remove_variable(variable)),
        }
    }

    /// The table holding this potential's cells, if it has one.
    pub fn table(&self) -> Option<&TablePotential> {
        match self {
            Potential::Table(t) => Some(t),
            Potential::ExactDistr(e) => Some(e.table()),
            Potential::Distribution(_) => None,
        }
    }

    pub fn table_mut(&mut self) -> Option<&mut TablePotential> {
        match self {
            Potential::Table(t) => Some(t),
            Potential::ExactDistr(e) => Some(e.table_mut()),
            Potential::Distribution(_) => None,
        }
    }

    /// Length of one uncertain column: the child's cardinality for a plain
    /// table, a single cell for an exact distribution's parent table.
    pub fn uncertain_column_length(&self) -> usize {
        match self {
            Potential::Table(t) => t.variables().first().map_or(1, Variable::num_states),
            Potential::ExactDistr(_) | Potential::Distribution(_) => 1,
        }
    }

    /// Whether the potential's table is indexed by parents only.
    pub fn indexed_by_parents(&self) -> bool {
        matches!(self, Potential::ExactDistr(_))
    }

    pub fn is_uncertain(&self) -> bool {
        self.table().is_some_and(TablePotential::is_uncertain)
    }
}

impl fmt::Display for Potential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.variables().iter().map(|v| v.name.as_str()).collect();
        match names.split_first() {
            Some((child, parents)) if !parents.is_empty() => write!(
                f,
                "{} {}({child} | {})",
                self.kind_name(),
                self.role(),
                parents.join(", ")
            ),
            Some((child, _)) => write!(f, "{} {}({child})", self.kind_name(), self.role()),
            None => write!(f, "{} {}()", self.kind_name(), self.role()),
        }
    }
}
