//! Reading model documents into networks and evidence.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use markov_core::{
    Constraint, Criterion, Domain, EvidenceCase, Link, Network, NetworkType, Node, Potential,
    PotentialRole, State, TablePotential, Variable, VariableKind,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::document::{Document, EvidenceCaseDoc, LinkDoc, PotentialDoc, VariableDoc};
use crate::error::{IoError, Result};
use crate::registry::decoder_for;
use crate::version::{self, Version};

/// A network with the evidence cases stored alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModel {
    pub network: Network,
    pub evidence: Vec<EvidenceCase>,
    /// Version the document was written at.
    pub format_version: Version,
}

/// Reads documents at any readable format version.
pub struct PgmxReader;

impl PgmxReader {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<LoadedModel> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<LoadedModel> {
        Self::from_value(serde_json::from_reader(reader)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<LoadedModel> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| IoError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_reader(BufReader::new(file))?;
        info!(
            path = %path.display(),
            network = %model.network.name,
            nodes = model.network.num_nodes(),
            version = %model.format_version,
            "model loaded"
        );
        Ok(model)
    }

    /// Check the version before committing to the schema, so a newer
    /// document is reported as such rather than as a parse error.
    fn from_value(value: Value) -> Result<LoadedModel> {
        let found = value
            .get("formatVersion")
            .and_then(Value::as_str)
            .ok_or_else(|| IoError::InvalidDocument("missing formatVersion".to_string()))?;
        let format_version = Version::parse(found)?;
        if !version::is_readable(&format_version) {
            return Err(IoError::UnsupportedVersion {
                found: format_version.to_string(),
                supported: version::CURRENT.to_string(),
            });
        }
        let document: Document = serde_json::from_value(value)?;
        let network = decode_network(&document)?;
        let evidence = document
            .evidence_cases
            .iter()
            .map(|case| decode_evidence(&network, case))
            .collect::<Result<Vec<_>>>()?;
        Ok(LoadedModel {
            network,
            evidence,
            format_version,
        })
    }
}

fn decode_network(document: &Document) -> Result<Network> {
    let doc = &document.network;
    let network_type = NetworkType::parse(&doc.network_type).ok_or_else(|| {
        IoError::InvalidDocument(format!("unknown network type '{}'", doc.network_type))
    })?;
    let mut network = Network::new(doc.name.clone(), network_type);
    network.comment = doc.comment.clone();
    network.agents = doc.agents.clone();
    network.language = doc.language.clone();
    network.temporal_unit = doc.temporal_unit.clone();
    network.additional_properties = doc.additional_properties.clone();
    network.decision_criteria = doc
        .decision_criteria
        .iter()
        .map(|c| Criterion {
            name: c.name.clone(),
            unit: c.unit.clone(),
        })
        .collect();
    for name in &doc.additional_constraints {
        let constraint = Constraint::parse(name)
            .ok_or_else(|| IoError::InvalidDocument(format!("unknown constraint '{name}'")))?;
        network.add_constraint(constraint);
    }

    for variable in &doc.variables {
        network.add_node(decode_node(variable)?)?;
    }
    for link in &doc.links {
        network.add_link_with(decode_link(&network, link)?)?;
    }
    for potential in doc.potentials.iter().chain(&doc.policies) {
        let (owner, potential) = decode_potential(&network, potential)?;
        let mut list = network.node_potentials(&owner)?.to_vec();
        list.push(potential);
        network.set_potentials(&owner, list)?;
    }
    debug!(
        network = %network.name,
        nodes = network.num_nodes(),
        links = network.links().len(),
        "network decoded"
    );
    Ok(network)
}

fn decode_node(doc: &VariableDoc) -> Result<Node> {
    let kind = VariableKind::parse(&doc.role).ok_or_else(|| {
        IoError::InvalidDocument(format!("variable '{}' has unknown role '{}'", doc.name, doc.role))
    })?;
    let domain = match doc.domain.as_str() {
        "finiteStates" => Domain::FiniteStates(doc.states.iter().map(State::new).collect()),
        "numeric" => Domain::Numeric {
            min: doc.min.unwrap_or(f64::NEG_INFINITY),
            max: doc.max.unwrap_or(f64::INFINITY),
            unit: doc.unit.clone(),
        },
        other => {
            return Err(IoError::InvalidDocument(format!(
                "variable '{}' has unknown type '{other}'",
                doc.name
            )))
        }
    };
    let variable = Variable {
        name: doc.name.clone(),
        kind,
        domain,
        criterion: doc.criterion.clone(),
        comment: doc.comment.clone(),
    };
    let mut node = Node::new(variable);
    node.additional_properties = doc.additional_properties.clone();
    Ok(node)
}

fn lookup(network: &Network, name: &str) -> Result<Variable> {
    network
        .variable(name)
        .cloned()
        .map_err(|_| IoError::UnknownVariable(name.to_string()))
}

fn decode_link(network: &Network, doc: &LinkDoc) -> Result<Link> {
    let source = lookup(network, &doc.source)?;
    let target = lookup(network, &doc.target)?;
    let mut link = Link::new(doc.source.as_str(), doc.target.as_str(), doc.directed);
    if let Some(values) = &doc.restriction {
        link = link.with_restriction(TablePotential::with_values(
            vec![source, target],
            PotentialRole::Restriction,
            values.clone(),
        )?);
    }
    Ok(link)
}

/// Decode a potential and name the node it belongs to.
fn decode_potential(network: &Network, doc: &PotentialDoc) -> Result<(String, Potential)> {
    let decoder =
        decoder_for(&doc.kind).ok_or_else(|| IoError::UnknownPotentialType(doc.kind.clone()))?;
    let role = PotentialRole::parse(&doc.role).ok_or_else(|| {
        IoError::InvalidDocument(format!("unknown potential role '{}'", doc.role))
    })?;
    let variables = doc
        .variables
        .iter()
        .map(|name| lookup(network, name))
        .collect::<Result<Vec<_>>>()?;
    let owner = match (&doc.node, doc.variables.first()) {
        (Some(node), _) => node.clone(),
        (None, Some(first)) => first.clone(),
        (None, None) => {
            return Err(IoError::InvalidDocument(
                "potential without node or variables".to_string(),
            ))
        }
    };
    if !network.contains_node(&owner) {
        return Err(IoError::UnknownVariable(owner));
    }
    Ok((owner, decoder(doc, variables, role)?))
}

fn decode_evidence(network: &Network, doc: &EvidenceCaseDoc) -> Result<EvidenceCase> {
    let mut evidence = EvidenceCase::new();
    for finding in &doc.findings {
        if !network.contains_node(&finding.variable) {
            return Err(IoError::UnknownVariable(finding.variable.clone()));
        }
        match (&finding.state, finding.value) {
            (Some(state), _) => evidence.add_finding(network, &finding.variable, state)?,
            (None, Some(value)) => {
                evidence.add_numeric_finding(network, &finding.variable, value)?
            }
            (None, None) => {
                return Err(IoError::InvalidDocument(format!(
                    "finding for '{}' has neither state nor value",
                    finding.variable
                )))
            }
        }
    }
    Ok(evidence)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "formatVersion": "0.2.0",
        "network": {
            "type": "BayesianNetwork",
            "name": "minimal",
            "variables": [
                { "name": "A", "role": "chance", "type": "finiteStates", "states": ["yes", "no"] }
            ],
            "potentials": [
                { "type": "ProbTable", "role": "conditionalProbability",
                  "variables": ["A"], "values": [0.4, 0.6] }
            ]
        }
    }"#;

    #[test]
    fn legacy_document_without_owner_uses_first_variable() {
        let model = PgmxReader::from_str(MINIMAL).unwrap();
        assert_eq!(model.format_version, version::LEGACY);
        let potentials = model.network.node_potentials("A").unwrap();
        assert_eq!(potentials.len(), 1);
        assert_eq!(potentials[0].table().unwrap().values(), &[0.4, 0.6]);
    }

    #[test]
    fn newer_document_is_rejected_before_schema_checks() {
        let json = r#"{ "formatVersion": "2.0.0", "graph": {} }"#;
        let err = PgmxReader::from_str(json).unwrap_err();
        assert!(matches!(err, IoError::UnsupportedVersion { ref found, .. } if found == "2.0.0"));
    }

    #[test]
    fn missing_version_is_invalid() {
        let err = PgmxReader::from_str(r#"{ "network": {} }"#).unwrap_err();
        assert!(matches!(err, IoError::InvalidDocument(_)));
    }

    #[test]
    fn unknown_potential_type_is_reported() {
        let json = MINIMAL.replace("ProbTable", "TreeADD");
        let err = PgmxReader::from_str(&json).unwrap_err();
        assert!(matches!(err, IoError::UnknownPotentialType(ref t) if t == "TreeADD"));
    }

    #[test]
    fn unknown_variable_in_potential_is_reported() {
        let json = MINIMAL.replace(r#""variables": ["A"]"#, r#""variables": ["A", "B"]"#);
        let err = PgmxReader::from_str(&json).unwrap_err();
        assert!(matches!(err, IoError::UnknownVariable(ref v) if v == "B"));
    }
}
