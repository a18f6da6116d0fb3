//! Exact distributions over a numeric child.

use serde::{Deserialize, Serialize};

use super::table::TablePotential;
use super::{PotentialError, PotentialRole};
use crate::evidence::EvidenceCase;
use crate::variable::Variable;

/// A numeric child whose value is given exactly for each parent
/// configuration.
///
/// The variable at index 0 is the numeric child and the rest are parents.
/// The values live in a wrapped [`TablePotential`] over the parents only;
/// every table operation is delegated to it and the variable list is kept
/// in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactDistrPotential {
    variables: Vec<Variable>,
    pub role: PotentialRole,
    table: TablePotential,
}

impl ExactDistrPotential {
    /// Create an exact distribution with all values at zero.
    ///
    /// `variables` must contain at least the child.
    pub fn new(variables: Vec<Variable>, role: PotentialRole) -> Result<Self, PotentialError> {
        let parents = parents_of(&variables)?;
        let table = TablePotential::new(parents, PotentialRole::Unspecified)?;
        Ok(Self {
            variables,
            role,
            table,
        })
    }

    /// Create an exact distribution with one value per parent configuration.
    pub fn with_values(
        variables: Vec<Variable>,
        role: PotentialRole,
        values: Vec<f64>,
    ) -> Result<Self, PotentialError> {
        let parents = parents_of(&variables)?;
        let table = TablePotential::with_values(parents, PotentialRole::Unspecified, values)?;
        Ok(Self {
            variables,
            role,
            table,
        })
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// The distinguished numeric child.
    pub fn child_variable(&self) -> &Variable {
        &self.variables[0]
    }

    /// The wrapped table over the parents.
    pub fn table(&self) -> &TablePotential {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TablePotential {
        &mut self.table
    }

    /// Replace the wrapped table. Its variables must be this potential's
    /// parents, in order.
    pub fn set_table(&mut self, table: TablePotential) -> Result<(), PotentialError> {
        let parents = &self.variables[1..];
        if table.variables() != parents {
            return Err(PotentialError::ShapeMismatch {
                expected: parents.len(),
                actual: table.variables().len(),
            });
        }
        self.table = table;
        Ok(())
    }

    /// Project the wrapped table. The result takes the child's criterion
    /// and role [`PotentialRole::Unspecified`].
    pub fn table_project(
        &self,
        evidence: &EvidenceCase,
    ) -> Result<Vec<TablePotential>, PotentialError> {
        let mut projected = self.table.table_project(evidence)?;
        if let Some(first) = projected.first_mut() {
            first.criterion = self.child_variable().criterion.clone();
            first.role = PotentialRole::Unspecified;
        }
        Ok(projected)
    }

    /// Add a parent.
    pub fn add_variable(&self, variable: &Variable) -> Result<Self, PotentialError> {
        if self.variables.iter().any(|v| v.name == variable.name) {
            return Ok(self.clone());
        }
        let table = self.table.add_variable(variable)?;
        let mut variables = self.variables.clone();
        variables.push(variable.clone());
        Ok(Self {
            variables,
            role: self.role,
            table,
        })
    }

    /// Remove a parent. The child cannot be removed; asking to do so
    /// returns an unchanged copy.
    pub fn remove_variable(&self, variable: &Variable) -> Self {
        if self.child_variable().name == variable.name {
            return self.clone();
        }
        let table = self.table.remove_variable(variable);
        let variables = self
            .variables
            .iter()
            .filter(|v| v.name != variable.name)
            .cloned()
            .collect();
        Self {
            variables,
            role: self.role,
            table,
        }
    }
}

fn parents_of(variables: &[Variable]) -> Result<Vec<Variable>, PotentialError> {
    match variables.split_first() {
        Some((_, parents)) => Ok(parents.to_vec()),
        None => Err(PotentialError::ShapeMismatch {
            expected: 1,
            actual: 0,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::Finding;
    use crate::variable::VariableKind;

    fn utility() -> Variable {
        Variable::numeric("QALY", VariableKind::Utility, 0.0, 50.0).with_criterion("effectiveness")
    }

    fn treat() -> Variable {
        Variable::decision("Treat", ["no", "yes"])
    }

    fn disease() -> Variable {
        Variable::chance("Disease", ["absent", "present"])
    }

    fn potential() -> ExactDistrPotential {
        ExactDistrPotential::with_values(
            vec![utility(), disease(), treat()],
            PotentialRole::Utility,
            vec![10.0, 3.0, 9.0, 8.0],
        )
        .unwrap()
    }

    #[test]
    fn wrapped_table_covers_parents_only() {
        let p = potential();
        assert_eq!(p.child_variable().name, "QALY");
        assert_eq!(p.table().variables().len(), 2);
        assert_eq!(p.table().table_size(), 4);
    }

    #[test]
    fn projection_takes_child_criterion() {
        let mut evidence = EvidenceCase::new();
        evidence
            .insert(Finding {
                variable: disease(),
                state_index: 1,
                numeric_value: None,
            })
            .unwrap();
        let projected = potential().table_project(&evidence).unwrap();
        assert_eq!(projected[0].values(), &[3.0, 8.0]);
        assert_eq!(projected[0].criterion.as_deref(), Some("effectiveness"));
        assert_eq!(projected[0].role, PotentialRole::Unspecified);
    }

    #[test]
    fn variables_stay_in_sync() {
        let extra = Variable::chance("Age", ["young", "old"]);
        let added = potential().add_variable(&extra).unwrap();
        assert_eq!(added.variables().len(), 4);
        assert_eq!(added.table().variables().len(), 3);

        let removed = added.remove_variable(&disease());
        assert_eq!(removed.variables().len(), 3);
        assert_eq!(&removed.variables()[1..], removed.table().variables());

        assert_eq!(potential().remove_variable(&utility()), potential());
    }
}
