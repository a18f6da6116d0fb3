//! `markov posterior`: marginal distribution of one chance variable.

use std::fmt::{self, Write as _};
use std::path::Path;

use anyhow::{Context, Result};
use markov_core::TablePotential;

use super::{load_model, parse_findings};

pub fn compute(model: &Path, variable: &str, findings: &[String]) -> Result<TablePotential> {
    let loaded = load_model(model, None)?;
    let evidence = parse_findings(&loaded.network, findings)?;
    markov_infer::posterior(&loaded.network, &evidence, variable)
        .with_context(|| format!("computing the posterior of '{variable}'"))
}

/// `state: probability` lines.
pub fn render(distribution: &TablePotential) -> Result<String, fmt::Error> {
    let mut out = String::new();
    if let Some(variable) = distribution.variables().first() {
        for (state, p) in variable.states().iter().zip(distribution.values()) {
            writeln!(out, "{} = {}: {p:.6}", variable.name, state.name())?;
        }
    }
    Ok(out)
}

pub fn run(model: &Path, variable: &str, findings: &[String]) -> Result<()> {
    print!("{}", render(&compute(model, variable, findings)?)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use markov_core::{PotentialRole, Variable};

    #[test]
    fn one_line_per_state() {
        let symptom = Variable::chance("Symptom", ["absent", "present"]);
        let distribution = TablePotential::with_values(
            vec![symptom],
            PotentialRole::ConditionalProbability,
            vec![0.25, 0.75],
        )
        .unwrap();
        assert_eq!(
            render(&distribution).unwrap(),
            "Symptom = absent: 0.250000\nSymptom = present: 0.750000\n"
        );
    }

    #[test]
    fn constant_renders_nothing() {
        let constant = TablePotential::constant(1.0, PotentialRole::ConditionalProbability);
        assert_eq!(render(&constant).unwrap(), "");
    }
}
