//! `markov evaluate`: optimal strategy of an influence diagram.

use std::fmt::{self, Write as _};
use std::path::Path;

use anyhow::{Context, Result};
use markov_core::potential::table::{coordinates_in, dimensions_of};
use markov_infer::{InferenceResult, OptimalIntervention, Policy};

use super::{load_model, parse_findings};

/// Evaluate the model under the given findings.
pub fn evaluate(model: &Path, findings: &[String]) -> Result<InferenceResult> {
    let loaded = load_model(model, None)?;
    let evidence = parse_findings(&loaded.network, findings)?;
    let result = OptimalIntervention::new(&loaded.network, &evidence)
        .and_then(|intervention| intervention.evaluate())
        .with_context(|| format!("evaluating {}", loaded.network.name))?;
    Ok(result)
}

/// Human-readable report of an evaluation.
pub fn render(result: &InferenceResult) -> Result<String, fmt::Error> {
    let mut out = String::new();
    if result.strategy_tree.is_empty() {
        out.push_str("Strategy: none (no decision left to take)\n");
    } else {
        write!(out, "Strategy:\n{}", result.strategy_tree)?;
    }
    for policy in &result.policies {
        writeln!(out, "{policy}:")?;
        for line in policy_rules(policy) {
            writeln!(out, "  {line}")?;
        }
    }
    writeln!(out, "Expected utility: {:.4}", result.expected_utility)?;
    writeln!(
        out,
        "Probability of evidence: {:.6}",
        result.evidence_probability
    )?;
    Ok(out)
}

/// One `X = x, Y = y -> D = d` line per domain configuration.
fn policy_rules(policy: &Policy) -> Vec<String> {
    let dimensions = dimensions_of(&policy.domain);
    let label = |variable: &markov_core::Variable, state: usize| {
        variable
            .states()
            .get(state)
            .map_or_else(|| state.to_string(), |s| s.name().to_string())
    };
    policy
        .choices
        .iter()
        .enumerate()
        .map(|(position, &choice)| {
            let decided = format!("{} = {}", policy.decision.name, label(&policy.decision, choice));
            if policy.domain.is_empty() {
                return decided;
            }
            let condition: Vec<String> = policy
                .domain
                .iter()
                .zip(coordinates_in(&dimensions, position))
                .map(|(variable, state)| format!("{} = {}", variable.name, label(variable, state)))
                .collect();
            format!("{} -> {decided}", condition.join(", "))
        })
        .collect()
}

pub fn run(model: &Path, findings: &[String], json: bool) -> Result<()> {
    let result = evaluate(model, findings)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render(&result)?);
    }
    Ok(())
}
