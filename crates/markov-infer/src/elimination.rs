//! Optimal intervention by variable elimination.
//!
//! Chance variables that no decision observes go first. Then the decisions
//! are eliminated from last to first, each one after the chance variables
//! observed just before the following decision. Summing a chance variable
//! out turns the utilities that mention it into conditional expectations;
//! maximizing a decision out records its policy. The policies are then
//! replayed top-down into a [`StrategyTree`].

use std::collections::BTreeSet;

use markov_core::potential::ops::{
    divide, expand, max_out, multiply, pick, sum, sum_out, union_variables,
};
use markov_core::potential::table::table_size;
use markov_core::{
    EvidenceCase, Network, NetworkType, Potential, TablePotential, Variable, VariableKind,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{InferenceError, Result};
use crate::policy::Policy;
use crate::strategy::{extract_advice, Advice, StrategyTree};

/// What an evaluation produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceResult {
    pub strategy_tree: StrategyTree,
    /// One policy per unobserved decision, in decision order.
    pub policies: Vec<Policy>,
    /// Maximum expected utility given the evidence.
    pub expected_utility: f64,
    /// Probability of the evidence under the optimal strategy.
    pub evidence_probability: f64,
}

impl InferenceResult {
    pub fn advice(&self) -> Advice {
        extract_advice(&self.strategy_tree)
    }

    pub fn policy(&self, decision: &str) -> Option<&Policy> {
        self.policies.iter().find(|p| p.decision.name == decision)
    }
}

/// The optimal strategy of an influence diagram given evidence.
#[derive(Debug)]
pub struct OptimalIntervention<'a> {
    network: &'a Network,
    evidence: &'a EvidenceCase,
}

impl<'a> OptimalIntervention<'a> {
    /// Check that the network can be evaluated and the evidence fits it.
    pub fn new(network: &'a Network, evidence: &'a EvidenceCase) -> Result<Self> {
        check_evaluable(network)?;
        check_evidence(network, evidence)?;
        Ok(Self { network, evidence })
    }

    pub fn evaluate(&self) -> Result<InferenceResult> {
        let decisions: Vec<Variable> = self
            .network
            .decision_order()?
            .iter()
            .filter(|name| !self.evidence.contains(name))
            .map(|name| self.network.variable(name).cloned())
            .collect::<std::result::Result<_, _>>()?;

        let mut factors = Factors::project(self.network, self.evidence)?;
        let mut policies = Vec::with_capacity(decisions.len());
        for step in self.elimination_steps(&factors, &decisions) {
            match step {
                Step::Chance(group) => factors.eliminate_chance_group(group),
                Step::Decision(decision) => policies.push(factors.eliminate_decision(&decision)),
            }
        }
        policies.reverse();

        let evidence_probability = factors.probability_constant()?;
        if evidence_probability <= 0.0 {
            return Err(InferenceError::IncompatibleEvidence(
                "the findings have zero probability under the model".to_string(),
            ));
        }
        let expected_utility = factors.utility_constant()?;
        let strategy_tree = if policies.is_empty() {
            StrategyTree::empty()
        } else {
            build_strategy(&policies, 0, &mut Vec::new())?
        };

        info!(
            network = %self.network.name,
            decisions = policies.len(),
            findings = self.evidence.len(),
            expected_utility,
            "optimal intervention evaluated"
        );
        Ok(InferenceResult {
            strategy_tree,
            policies,
            expected_utility,
            evidence_probability,
        })
    }

    /// Groups of chance variables interleaved with decisions, in
    /// elimination order.
    fn elimination_steps(&self, factors: &Factors, decisions: &[Variable]) -> Vec<Step> {
        let decision_names: BTreeSet<&str> = decisions.iter().map(|d| d.name.as_str()).collect();
        let mut unassigned: Vec<Variable> = factors
            .variables()
            .into_iter()
            .filter(|v| !decision_names.contains(v.name.as_str()))
            .collect();

        // Chance variables observed right before each decision.
        let mut observed = Vec::with_capacity(decisions.len());
        for decision in decisions {
            let parents = self.network.parents(&decision.name);
            let (known, rest): (Vec<Variable>, Vec<Variable>) = unassigned
                .into_iter()
                .partition(|v| parents.contains(&v.name.as_str()));
            observed.push(known);
            unassigned = rest;
        }

        let mut steps = vec![Step::Chance(unassigned)];
        for (decision, known) in decisions.iter().zip(observed).rev() {
            steps.push(Step::Decision(decision.clone()));
            steps.push(Step::Chance(known));
        }
        steps
    }
}

enum Step {
    Chance(Vec<Variable>),
    Decision(Variable),
}

/// The probability and utility tables still in play.
pub(crate) struct Factors {
    probabilities: Vec<TablePotential>,
    utilities: Vec<TablePotential>,
}

impl Factors {
    /// Project every potential onto the evidence. Chance nodes and
    /// restricted links contribute probabilities, utility nodes
    /// utilities. Decision potentials play no part.
    pub(crate) fn project(network: &Network, evidence: &EvidenceCase) -> Result<Self> {
        let mut probabilities = Vec::new();
        let mut utilities = Vec::new();
        for node in network.nodes() {
            let target = match node.node_type() {
                VariableKind::Chance => &mut probabilities,
                VariableKind::Utility => &mut utilities,
                VariableKind::Decision => continue,
            };
            for potential in node.potentials() {
                target.extend(potential.table_project(evidence)?);
            }
        }
        for link in network.links().iter().filter(|l| l.has_restrictions()) {
            if let Some(restriction) = &link.restriction {
                probabilities.extend(restriction.table_project(evidence)?);
            }
        }
        debug!(
            probabilities = probabilities.len(),
            utilities = utilities.len(),
            "potentials projected"
        );
        Ok(Self {
            probabilities,
            utilities,
        })
    }

    /// Every variable still mentioned by a table.
    pub(crate) fn variables(&self) -> Vec<Variable> {
        union_variables(self.probabilities.iter().chain(&self.utilities))
    }

    /// Size of the table produced by combining everything over `variable`.
    fn elimination_cost(&self, variable: &Variable) -> usize {
        let touching = self
            .probabilities
            .iter()
            .chain(&self.utilities)
            .filter(|t| t.contains(&variable.name));
        table_size(&union_variables(touching))
    }

    /// Eliminate a group of chance variables, cheapest first. Ties go to
    /// the alphabetically first name.
    pub(crate) fn eliminate_chance_group(&mut self, mut group: Vec<Variable>) {
        while !group.is_empty() {
            let next = group
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    self.elimination_cost(a)
                        .cmp(&self.elimination_cost(b))
                        .then_with(|| a.name.cmp(&b.name))
                })
                .map_or(0, |(i, _)| i);
            let variable = group.remove(next);
            self.eliminate_chance(&variable);
        }
    }

    fn eliminate_chance(&mut self, variable: &Variable) {
        let name = variable.name.as_str();
        let probabilities = take_containing(&mut self.probabilities, name);
        let utilities = take_containing(&mut self.utilities, name);

        let joint = multiply(&probabilities.iter().collect::<Vec<_>>());
        let marginal = sum_out(&joint, name);
        if !utilities.is_empty() {
            let utility = sum(&utilities.iter().collect::<Vec<_>>());
            let weighted = sum_out(&multiply(&[&joint, &utility]), name);
            self.utilities.push(divide(&weighted, &marginal));
        }
        debug!(
            variable = name,
            size = joint.table_size(),
            utilities = utilities.len(),
            "chance variable eliminated"
        );
        self.probabilities.push(marginal);
    }

    /// Maximize a decision out and return its policy.
    fn eliminate_decision(&mut self, decision: &Variable) -> Policy {
        let name = decision.name.as_str();
        let probabilities = take_containing(&mut self.probabilities, name);
        let utilities = take_containing(&mut self.utilities, name);

        let joint = multiply(&probabilities.iter().collect::<Vec<_>>());
        let utility = sum(&utilities.iter().collect::<Vec<_>>());
        let mut variables = union_variables([&joint, &utility]);
        if !variables.iter().any(|v| v.name == name) {
            variables.push(decision.clone());
        }
        let joint = expand(&joint, &variables);
        let utility = expand(&utility, &variables);

        // Options with zero probability, restricted ones included, are
        // never chosen over possible ones.
        let mut weighted = multiply(&[&joint, &utility]);
        for (value, probability) in weighted.values_mut().iter_mut().zip(joint.values()) {
            if *probability == 0.0 {
                *value = f64::NEG_INFINITY;
            }
        }
        let (_, choices) = max_out(&weighted, name);
        self.utilities.push(pick(&utility, name, &choices));
        self.probabilities.push(pick(&joint, name, &choices));

        let domain: Vec<Variable> = variables.into_iter().filter(|v| v.name != name).collect();
        debug!(
            decision = name,
            domain = domain.len(),
            "decision eliminated"
        );
        Policy::new(decision.clone(), domain, choices)
    }

    pub(crate) fn probabilities(&self) -> &[TablePotential] {
        &self.probabilities
    }

    /// Product of the remaining probability tables, which must all be
    /// constants.
    fn probability_constant(&self) -> Result<f64> {
        self.probabilities.iter().map(constant_value).product()
    }

    /// Sum of the remaining utility tables, which must all be constants.
    fn utility_constant(&self) -> Result<f64> {
        self.utilities.iter().map(constant_value).sum()
    }
}

/// Remove and return the tables that mention `name`.
fn take_containing(tables: &mut Vec<TablePotential>, name: &str) -> Vec<TablePotential> {
    let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(tables)
        .into_iter()
        .partition(|t| t.contains(name));
    *tables = kept;
    taken
}

fn constant_value(table: &TablePotential) -> Result<f64> {
    match table.variables() {
        [] => Ok(table.values()[0]),
        variables => Err(InferenceError::UnexpectedInference(format!(
            "table over {} survived elimination",
            variables
                .iter()
                .map(|v| v.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

fn state_in(assignment: &[(String, usize)], name: &str) -> Option<usize> {
    assignment
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, state)| *state)
}

/// Replay `policies[index..]` under `assignment`, branching on every
/// domain variable the path has not fixed yet.
fn build_strategy(
    policies: &[Policy],
    index: usize,
    assignment: &mut Vec<(String, usize)>,
) -> Result<StrategyTree> {
    let policy = &policies[index];
    let open = policy
        .domain
        .iter()
        .find(|v| state_in(assignment, &v.name).is_none());

    if let Some(variable) = open {
        let mut subtrees = Vec::with_capacity(variable.num_states());
        for state in 0..variable.num_states() {
            assignment.push((variable.name.clone(), state));
            let subtree = build_strategy(policies, index, assignment);
            assignment.pop();
            subtrees.push(subtree?);
        }
        return Ok(StrategyTree::observation(variable.clone(), subtrees));
    }

    let choice = policy
        .choice(|name| state_in(assignment, name))
        .ok_or_else(|| {
            InferenceError::UnexpectedInference(format!("{policy} has an unassigned domain"))
        })?;
    let then = if index + 1 < policies.len() {
        assignment.push((policy.decision.name.clone(), choice));
        let subtree = build_strategy(policies, index + 1, assignment);
        assignment.pop();
        Some(subtree?)
    } else {
        None
    };
    Ok(StrategyTree::decision(policy.decision.clone(), choice, then))
}

/// Requirements every evaluated network meets.
pub(crate) fn check_evaluable(network: &Network) -> Result<()> {
    let unsatisfied = network.unsatisfied_constraints();
    if !unsatisfied.is_empty() {
        return Err(InferenceError::NotEvaluableNetwork(unsatisfied.join("; ")));
    }
    if network.network_type != NetworkType::InfluenceDiagram
        && network.nodes_of(VariableKind::Decision).next().is_some()
    {
        return Err(InferenceError::NotEvaluableNetwork(format!(
            "a {} cannot hold decisions",
            network.network_type
        )));
    }

    for node in network.nodes() {
        let variable = node.variable();
        if variable.kind == VariableKind::Decision {
            continue;
        }
        if variable.kind == VariableKind::Chance && variable.is_numeric() {
            return Err(InferenceError::NotEvaluableNetwork(format!(
                "numeric chance variable '{}'",
                variable.name
            )));
        }
        if node.potentials().is_empty() {
            return Err(InferenceError::NotEvaluableNetwork(format!(
                "node '{}' has no potential",
                variable.name
            )));
        }
        if let Some(Potential::Distribution(d)) = node
            .potentials()
            .iter()
            .find(|p| matches!(p, Potential::Distribution(_)))
        {
            return Err(InferenceError::NotEvaluableNetwork(format!(
                "node '{}' has a {} distribution with no table form",
                variable.name, d.distribution
            )));
        }
    }
    Ok(())
}

/// Every finding must name a non-utility node and a state of its domain.
pub(crate) fn check_evidence(network: &Network, evidence: &EvidenceCase) -> Result<()> {
    for finding in evidence.findings() {
        let variable = network.variable(&finding.variable.name)?;
        if variable.kind == VariableKind::Utility {
            return Err(InferenceError::IncompatibleEvidence(format!(
                "utility variable '{}' cannot be observed",
                variable.name
            )));
        }
        if variable.is_numeric() {
            let value = finding.numeric_value.filter(|v| variable.admits(*v));
            if value.is_none() {
                return Err(InferenceError::InvalidState {
                    variable: variable.name.clone(),
                    state: format!("{:?}", finding.numeric_value),
                });
            }
            continue;
        }
        let expected = variable.states().get(finding.state_index).map(|s| s.name());
        if expected.is_none() || expected != finding.state_name() {
            return Err(InferenceError::InvalidState {
                variable: variable.name.clone(),
                state: finding
                    .state_name()
                    .map_or_else(|| finding.state_index.to_string(), String::from),
            });
        }
    }
    Ok(())
}
