//! CLI command implementations.

pub mod advise;
pub mod convert;
pub mod evaluate;
pub mod inspect;
pub mod invert_link;
pub mod posterior;

use std::path::Path;

use anyhow::{bail, Context, Result};
use markov_core::{EvidenceCase, Network};
use markov_pgmx::{LoadedModel, PgmxReader};
use tracing::warn;

/// Load a model, reporting a name other than the configured one.
pub fn load_model(path: &Path, expected_name: Option<&str>) -> Result<LoadedModel> {
    let model = PgmxReader::load(path).with_context(|| format!("loading {}", path.display()))?;
    if let Some(expected) = expected_name {
        if model.network.name != expected {
            warn!(
                expected,
                found = %model.network.name,
                "model name differs from the configured one"
            );
        }
    }
    Ok(model)
}

/// Build evidence from `VARIABLE=STATE` arguments. Numeric variables take
/// a number after the `=`.
pub fn parse_findings(network: &Network, args: &[String]) -> Result<EvidenceCase> {
    let mut evidence = EvidenceCase::new();
    for arg in args {
        let Some((variable, value)) = arg.split_once('=') else {
            bail!("finding '{arg}' is not of the form VARIABLE=STATE");
        };
        let (variable, value) = (variable.trim(), value.trim());
        if network.variable(variable)?.is_numeric() {
            let number: f64 = value
                .parse()
                .with_context(|| format!("'{value}' is not a number for '{variable}'"))?;
            evidence.add_numeric_finding(network, variable, number)?;
        } else {
            evidence.add_finding(network, variable, value)?;
        }
    }
    Ok(evidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use markov_core::{NetworkType, Node, Variable, VariableKind};

    fn network() -> Network {
        let mut net = Network::new("findings", NetworkType::BayesianNetwork);
        net.add_node(Node::new(Variable::chance("Cough", ["0", "1", "2", "3"])))
            .unwrap();
        net.add_node(Node::new(Variable::numeric(
            "Weight",
            VariableKind::Chance,
            0.0,
            300.0,
        )))
        .unwrap();
        net
    }

    #[test]
    fn discrete_and_numeric_findings() {
        let net = network();
        let evidence =
            parse_findings(&net, &["Cough=2".to_string(), "Weight = 81.5".to_string()]).unwrap();
        assert_eq!(evidence.finding("Cough").unwrap().state_index, 2);
        assert_eq!(
            evidence.finding("Weight").unwrap().numeric_value,
            Some(81.5)
        );
    }

    #[test]
    fn malformed_findings_are_rejected() {
        let net = network();
        assert!(parse_findings(&net, &["Cough".to_string()]).is_err());
        assert!(parse_findings(&net, &["Cough=7".to_string()]).is_err());
        assert!(parse_findings(&net, &["Weight=heavy".to_string()]).is_err());
        assert!(parse_findings(&net, &["Fever=1".to_string()]).is_err());
    }
}
