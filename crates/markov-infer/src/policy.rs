//! Decision rules recorded while eliminating decisions.

use std::fmt;

use markov_core::potential::table::{dimensions_of, position_in, table_size};
use markov_core::{PotentialRole, TablePotential, Variable};
use serde::Serialize;

/// The optimal choice of one decision for every configuration of the
/// variables known when it is taken.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Policy {
    pub decision: Variable,
    /// Informational predecessors, in table order.
    pub domain: Vec<Variable>,
    /// Chosen state index per domain configuration.
    pub choices: Vec<usize>,
}

impl Policy {
    /// # Panics
    ///
    /// Panics if `choices` does not hold one entry per domain
    /// configuration.
    pub fn new(decision: Variable, domain: Vec<Variable>, choices: Vec<usize>) -> Self {
        assert_eq!(
            choices.len(),
            table_size(&domain),
            "policy for '{}' needs one choice per configuration",
            decision.name
        );
        Self {
            decision,
            domain,
            choices,
        }
    }

    /// The chosen state for the configuration described by `state_of`, or
    /// `None` if a domain variable is unassigned.
    pub fn choice(&self, state_of: impl Fn(&str) -> Option<usize>) -> Option<usize> {
        let coordinates = self
            .domain
            .iter()
            .map(|v| state_of(&v.name))
            .collect::<Option<Vec<usize>>>()?;
        Some(self.choices[position_in(&dimensions_of(&self.domain), &coordinates)])
    }

    /// Deterministic policy table over `[decision, domain..]`: one where
    /// the decision takes its chosen state, zero elsewhere.
    pub fn to_potential(&self) -> TablePotential {
        let mut variables = Vec::with_capacity(self.domain.len() + 1);
        variables.push(self.decision.clone());
        variables.extend(self.domain.iter().cloned());
        let states = self.decision.num_states();
        let mut values = vec![0.0; states * self.choices.len()];
        for (configuration, choice) in self.choices.iter().enumerate() {
            values[configuration * states + choice] = 1.0;
        }
        TablePotential::with_values(variables, PotentialRole::Policy, values)
            .expect("policy variables come from a validated network")
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.domain.iter().map(|v| v.name.as_str()).collect();
        if names.is_empty() {
            write!(f, "policy({})", self.decision.name)
        } else {
            write!(f, "policy({} | {})", self.decision.name, names.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_reads_the_matching_configuration() {
        let d = Variable::decision("D", ["wait", "treat"]);
        let x = Variable::chance("X", ["lo", "mid", "hi"]);
        let policy = Policy::new(d, vec![x], vec![0, 1, 1]);
        assert_eq!(policy.choice(|_| Some(0)), Some(0));
        assert_eq!(policy.choice(|_| Some(2)), Some(1));
        assert_eq!(policy.choice(|_| None), None);
    }

    #[test]
    fn policy_table_is_deterministic() {
        let d = Variable::decision("D", ["wait", "treat"]);
        let x = Variable::chance("X", ["lo", "hi"]);
        let table = Policy::new(d, vec![x], vec![1, 0]).to_potential();
        assert_eq!(table.role, PotentialRole::Policy);
        assert_eq!(table.values(), &[0.0, 1.0, 1.0, 0.0]);
    }
}
