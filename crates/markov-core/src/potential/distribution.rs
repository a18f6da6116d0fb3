//! Named univariate distributions with per-configuration parameters.

use serde::{Deserialize, Serialize};

use super::table::{table_size, validate_variables};
use super::{PotentialError, PotentialRole};
use crate::variable::Variable;

/// A univariate distribution of the child, parametrized per parent
/// configuration.
///
/// `parameters` holds `parameter_count` consecutive values for each parent
/// configuration, configurations in table order. These potentials are
/// carried through editing and persistence but never projected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionPotential {
    variables: Vec<Variable>,
    pub role: PotentialRole,
    /// Distribution family, e.g. `Beta` or `Normal`.
    pub distribution: String,
    /// Parametrization name, e.g. `alphaBeta` or `muSigma`.
    pub parametrization: String,
    parameters: Vec<f64>,
    parameter_count: usize,
}

impl DistributionPotential {
    pub fn new(
        variables: Vec<Variable>,
        role: PotentialRole,
        distribution: impl Into<String>,
        parametrization: impl Into<String>,
        parameters: Vec<f64>,
    ) -> Result<Self, PotentialError> {
        let Some((_, parents)) = variables.split_first() else {
            return Err(PotentialError::ShapeMismatch {
                expected: 1,
                actual: 0,
            });
        };
        validate_variables(parents)?;
        let configurations = table_size(parents);
        if parameters.is_empty() || parameters.len() % configurations != 0 {
            return Err(PotentialError::ShapeMismatch {
                expected: configurations,
                actual: parameters.len(),
            });
        }
        let parameter_count = parameters.len() / configurations;
        Ok(Self {
            variables,
            role,
            distribution: distribution.into(),
            parametrization: parametrization.into(),
            parameters,
            parameter_count,
        })
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    /// Number of parameters per parent configuration.
    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    /// Add a parent; the parameters are repeated for each of its states.
    pub fn add_variable(&self, variable: &Variable) -> Result<Self, PotentialError> {
        if self.variables.iter().any(|v| v.name == variable.name) {
            return Ok(self.clone());
        }
        let mut variables = self.variables.clone();
        variables.push(variable.clone());
        validate_variables(&variables[1..])?;
        Ok(Self {
            variables,
            parameters: self.parameters.repeat(variable.num_states()),
            ..self.clone()
        })
    }

    /// Remove a parent; its parameters are averaged away.
    pub fn remove_variable(&self, variable: &Variable) -> Self {
        let Some(axis) = self.variables.iter().position(|v| v.name == variable.name) else {
            return self.clone();
        };
        if axis == 0 {
            return self.clone();
        }
        let parents = &self.variables[1..];
        let parent_axis = axis - 1;
        let inner: usize = parents[..parent_axis].iter().map(Variable::num_states).product();
        let removed = parents[parent_axis].num_states();
        let block = inner * self.parameter_count;

        let mut parameters = Vec::with_capacity(self.parameters.len() / removed);
        for outer in self.parameters.chunks(block * removed) {
            for offset in 0..block {
                let total: f64 = (0..removed).map(|s| outer[s * block + offset]).sum();
                parameters.push(total / removed as f64);
            }
        }

        let variables = self
            .variables
            .iter()
            .filter(|v| v.name != variable.name)
            .cloned()
            .collect();
        Self {
            variables,
            parameters,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beta() -> DistributionPotential {
        let p = Variable::chance("P", ["low", "high"]);
        let group = Variable::chance("Group", ["a", "b"]);
        DistributionPotential::new(
            vec![p, group],
            PotentialRole::ConditionalProbability,
            "Beta",
            "alphaBeta",
            vec![2.0, 8.0, 4.0, 6.0],
        )
        .unwrap()
    }

    #[test]
    fn parameter_count_inferred_from_configurations() {
        assert_eq!(beta().parameter_count(), 2);
    }

    #[test]
    fn ragged_parameters_rejected() {
        let p = Variable::chance("P", ["low", "high"]);
        let group = Variable::chance("Group", ["a", "b"]);
        assert!(DistributionPotential::new(
            vec![p, group],
            PotentialRole::ConditionalProbability,
            "Beta",
            "alphaBeta",
            vec![2.0, 8.0, 4.0],
        )
        .is_err());
    }

    #[test]
    fn removing_parent_averages_parameters() {
        let group = Variable::chance("Group", ["a", "b"]);
        let reduced = beta().remove_variable(&group);
        assert_eq!(reduced.variables().len(), 1);
        assert_eq!(reduced.parameters(), &[3.0, 7.0]);

        let extended = reduced.add_variable(&group).unwrap();
        assert_eq!(extended.parameters(), &[3.0, 7.0, 3.0, 7.0]);
    }
}
