//! `markov inspect`: network summary and constraint report.

use std::fmt::{self, Write as _};
use std::path::Path;

use anyhow::Result;
use markov_core::{Domain, Network, VariableKind};
use markov_pgmx::LoadedModel;

use super::load_model;

pub fn render(model: &LoadedModel) -> Result<String, fmt::Error> {
    let network = &model.network;
    let mut out = String::new();
    writeln!(out, "Network: {} ({})", network.name, network.network_type)?;
    writeln!(out, "Format version: {}", model.format_version)?;
    let count = |kind: VariableKind| network.nodes_of(kind).count();
    writeln!(
        out,
        "Nodes: {} ({} chance, {} decision, {} utility)",
        network.num_nodes(),
        count(VariableKind::Chance),
        count(VariableKind::Decision),
        count(VariableKind::Utility)
    )?;
    writeln!(out, "Links: {}", network.links().len())?;
    if !model.evidence.is_empty() {
        writeln!(out, "Evidence cases: {}", model.evidence.len())?;
    }

    out.push('\n');
    for node in network.nodes() {
        writeln!(out, "{node}: {}", describe_domain(&node.variable().domain))?;
        let parents = network.parents(node.name());
        if !parents.is_empty() {
            writeln!(out, "  parents: {}", parents.join(", "))?;
        }
        for potential in node.potentials() {
            writeln!(out, "  potential: {potential}")?;
        }
    }

    out.push('\n');
    render_constraints(network, &mut out)?;
    Ok(out)
}

fn describe_domain(domain: &Domain) -> String {
    match domain {
        Domain::FiniteStates(states) => {
            let names: Vec<&str> = states.iter().map(|s| s.name()).collect();
            format!("[{}]", names.join(", "))
        }
        Domain::Numeric { min, max, unit } => match unit {
            Some(unit) => format!("[{min}, {max}] {unit}"),
            None => format!("[{min}, {max}]"),
        },
    }
}

fn render_constraints(network: &Network, out: &mut String) -> fmt::Result {
    let names: Vec<&str> = network.constraints().iter().map(|c| c.as_str()).collect();
    writeln!(out, "Constraints: {}", names.join(", "))?;
    let unsatisfied = network.unsatisfied_constraints();
    if unsatisfied.is_empty() {
        out.push_str("All constraints satisfied.\n");
    } else {
        for message in unsatisfied {
            writeln!(out, "  violated: {message}")?;
        }
    }
    Ok(())
}

pub fn run(model: &Path, expected_name: Option<&str>) -> Result<()> {
    let loaded = load_model(model, expected_name)?;
    print!("{}", render(&loaded)?);
    Ok(())
}
