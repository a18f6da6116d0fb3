//! Posterior marginals of Bayesian networks.

use markov_core::potential::ops::{expand, multiply};
use markov_core::{EvidenceCase, Network, PotentialRole, TablePotential, VariableKind};
use tracing::debug;

use crate::elimination::{check_evaluable, check_evidence, Factors};
use crate::error::{InferenceError, Result};

/// Distribution of one chance variable given the evidence.
///
/// Every other chance variable is summed out with the same elimination
/// machinery [`crate::OptimalIntervention`] uses. An observed variable gets
/// a degenerate distribution at its finding.
pub fn posterior(
    network: &Network,
    evidence: &EvidenceCase,
    variable: &str,
) -> Result<TablePotential> {
    check_evaluable(network)?;
    if network.nodes_of(VariableKind::Decision).next().is_some() {
        return Err(InferenceError::NotEvaluableNetwork(
            "posterior queries need a network without decisions".to_string(),
        ));
    }
    check_evidence(network, evidence)?;

    let target = network.variable(variable)?.clone();
    if target.kind != VariableKind::Chance || target.is_numeric() {
        return Err(InferenceError::NotEvaluableNetwork(format!(
            "'{variable}' is not a discrete chance variable"
        )));
    }

    if let Some(finding) = evidence.finding(variable) {
        let mut values = vec![0.0; target.num_states()];
        values[finding.state_index] = 1.0;
        return Ok(TablePotential::with_values(
            vec![target],
            PotentialRole::ConditionalProbability,
            values,
        )?);
    }

    let mut factors = Factors::project(network, evidence)?;
    let others = factors
        .variables()
        .into_iter()
        .filter(|v| v.name != variable)
        .collect();
    factors.eliminate_chance_group(others);

    let joint = multiply(&factors.probabilities().iter().collect::<Vec<_>>());
    let mut marginal = expand(&joint, std::slice::from_ref(&target));
    let total: f64 = marginal.values().iter().sum();
    if total <= 0.0 {
        return Err(InferenceError::IncompatibleEvidence(
            "the findings have zero probability under the model".to_string(),
        ));
    }
    marginal.normalize();
    marginal.role = PotentialRole::ConditionalProbability;
    debug!(variable, evidence_probability = total, "posterior computed");
    Ok(marginal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use markov_core::{NetworkType, Node, Potential, Variable};

    fn disease() -> Variable {
        Variable::chance("Disease", ["absent", "present"])
    }

    fn test() -> Variable {
        Variable::chance("Test", ["negative", "positive"])
    }

    fn network() -> Network {
        let mut net = Network::new("screening", NetworkType::BayesianNetwork);
        let prior = TablePotential::with_values(
            vec![disease()],
            PotentialRole::ConditionalProbability,
            vec![0.9, 0.1],
        )
        .unwrap();
        let sensitivity = TablePotential::with_values(
            vec![test(), disease()],
            PotentialRole::ConditionalProbability,
            vec![0.95, 0.05, 0.2, 0.8],
        )
        .unwrap();
        net.add_node(Node::new(disease()).with_potential(Potential::Table(prior)))
            .unwrap();
        net.add_node(Node::new(test()).with_potential(Potential::Table(sensitivity)))
            .unwrap();
        net.add_link("Disease", "Test", true).unwrap();
        net
    }

    #[test]
    fn prior_marginal_of_a_child() {
        let posterior = posterior(&network(), &EvidenceCase::new(), "Test").unwrap();
        // 0.9 * 0.05 + 0.1 * 0.8
        assert!((posterior.values()[1] - 0.125).abs() < 1e-12);
    }

    #[test]
    fn bayes_rule_on_a_positive_test() {
        let net = network();
        let mut evidence = EvidenceCase::new();
        evidence.add_finding(&net, "Test", "positive").unwrap();
        let posterior = posterior(&net, &evidence, "Disease").unwrap();
        assert!((posterior.values()[1] - 0.08 / 0.125).abs() < 1e-12);
    }

    #[test]
    fn observed_variable_is_degenerate() {
        let net = network();
        let mut evidence = EvidenceCase::new();
        evidence.add_finding(&net, "Test", "negative").unwrap();
        let posterior = posterior(&net, &evidence, "Test").unwrap();
        assert_eq!(posterior.values(), &[1.0, 0.0]);
    }

    #[test]
    fn unknown_variable_is_reported() {
        let err = posterior(&network(), &EvidenceCase::new(), "Age").unwrap_err();
        assert_eq!(err, InferenceError::NodeNotFound("Age".to_string()));
    }
}
