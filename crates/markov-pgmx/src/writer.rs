//! Writing networks and evidence to model documents.

use std::fs;
use std::io::Write;
use std::path::Path;

use markov_core::{Domain, EvidenceCase, Network, Node, Potential, VariableKind};
use tracing::info;

use crate::document::{
    CriterionDoc, Document, EvidenceCaseDoc, FindingDoc, LinkDoc, NetworkDoc, PotentialDoc,
    VariableDoc,
};
use crate::error::{IoError, Result};
use crate::version::{self, Version};

/// Serializes networks at a fixed format version.
#[derive(Debug, Clone)]
pub struct PgmxWriter {
    version: Version,
}

impl Default for PgmxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PgmxWriter {
    /// Writer for the current format.
    pub fn new() -> Self {
        Self {
            version: version::CURRENT,
        }
    }

    /// Writer for the legacy format, which drops uncertain values,
    /// additional properties and policies.
    pub fn legacy() -> Self {
        Self {
            version: version::LEGACY,
        }
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn to_document(&self, network: &Network, evidence: &[EvidenceCase]) -> Document {
        let extended = version::has_extensions(&self.version);
        let mut potentials = Vec::new();
        let mut policies = Vec::new();
        for node in network.nodes() {
            let target = match node.node_type() {
                VariableKind::Decision if !extended => continue,
                VariableKind::Decision => &mut policies,
                VariableKind::Chance | VariableKind::Utility => &mut potentials,
            };
            target.extend(
                node.potentials()
                    .iter()
                    .map(|p| encode_potential(node.name(), p, extended)),
            );
        }

        Document {
            format_version: self.version.to_string(),
            network: NetworkDoc {
                network_type: network.network_type.as_str().to_string(),
                name: network.name.clone(),
                comment: network.comment.clone(),
                additional_constraints: network
                    .additional_constraints()
                    .iter()
                    .map(|c| c.as_str().to_string())
                    .collect(),
                decision_criteria: network
                    .decision_criteria
                    .iter()
                    .map(|c| CriterionDoc {
                        name: c.name.clone(),
                        unit: c.unit.clone(),
                    })
                    .collect(),
                agents: network.agents.clone(),
                language: network.language.clone(),
                temporal_unit: network.temporal_unit.clone(),
                additional_properties: if extended {
                    network.additional_properties.clone()
                } else {
                    Default::default()
                },
                variables: network
                    .nodes()
                    .map(|n| encode_variable(n, extended))
                    .collect(),
                links: network
                    .links()
                    .iter()
                    .map(|link| LinkDoc {
                        source: link.source.clone(),
                        target: link.target.clone(),
                        directed: link.directed,
                        restriction: link
                            .restriction
                            .as_ref()
                            .filter(|_| link.has_restrictions())
                            .map(|r| r.values().to_vec()),
                    })
                    .collect(),
                potentials,
                policies,
            },
            evidence_cases: evidence.iter().map(encode_evidence).collect(),
        }
    }

    /// Render the document as pretty-printed JSON.
    pub fn to_string(&self, network: &Network, evidence: &[EvidenceCase]) -> Result<String> {
        Ok(serde_json::to_string_pretty(
            &self.to_document(network, evidence),
        )?)
    }

    pub fn write_to<W: Write>(
        &self,
        mut writer: W,
        network: &Network,
        evidence: &[EvidenceCase],
    ) -> Result<()> {
        let mut bytes = serde_json::to_vec_pretty(&self.to_document(network, evidence))?;
        bytes.push(b'\n');
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// Write the document to `path`, replacing any existing file.
    pub fn save(
        &self,
        path: impl AsRef<Path>,
        network: &Network,
        evidence: &[EvidenceCase],
    ) -> Result<()> {
        let path = path.as_ref();
        let mut bytes = Vec::new();
        self.write_to(&mut bytes, network, evidence)?;
        fs::write(path, bytes).map_err(|source| IoError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            path = %path.display(),
            network = %network.name,
            version = %self.version,
            "model saved"
        );
        Ok(())
    }
}

fn encode_variable(node: &Node, extended: bool) -> VariableDoc {
    let variable = node.variable();
    let (domain, states, min, max, unit) = match &variable.domain {
        Domain::FiniteStates(states) => (
            "finiteStates",
            states.iter().map(|s| s.name().to_string()).collect(),
            None,
            None,
            None,
        ),
        Domain::Numeric { min, max, unit } => (
            "numeric",
            Vec::new(),
            Some(*min).filter(|v| v.is_finite()),
            Some(*max).filter(|v| v.is_finite()),
            unit.clone(),
        ),
    };
    VariableDoc {
        name: variable.name.clone(),
        role: variable.kind.as_str().to_string(),
        domain: domain.to_string(),
        states,
        min,
        max,
        unit,
        criterion: variable.criterion.clone(),
        comment: variable.comment.clone(),
        additional_properties: if extended {
            node.additional_properties.clone()
        } else {
            Default::default()
        },
    }
}

fn encode_potential(node: &str, potential: &Potential, extended: bool) -> PotentialDoc {
    let mut doc = PotentialDoc {
        kind: "Table".to_string(),
        node: Some(node.to_string()),
        role: potential.role().as_str().to_string(),
        variables: potential
            .variables()
            .iter()
            .map(|v| v.name.clone())
            .collect(),
        distribution: None,
        parametrization: None,
        values: None,
        parameters: None,
        uncertain_values: None,
        criterion: None,
        comment: None,
    };
    match potential {
        Potential::Table(table) => {
            doc.criterion = table.criterion.clone();
            doc.comment = table.comment.clone();
        }
        Potential::ExactDistr(_) => {
            doc.kind = "UnivariateDistr".to_string();
            doc.distribution = Some("Exact".to_string());
        }
        Potential::Distribution(distribution) => {
            doc.kind = "UnivariateDistr".to_string();
            doc.distribution = Some(distribution.distribution.clone());
            doc.parametrization = Some(distribution.parametrization.clone());
            doc.parameters = Some(distribution.parameters().to_vec());
        }
    }
    if let Some(table) = potential.table() {
        doc.values = Some(table.values().to_vec());
        if extended {
            doc.uncertain_values = table.uncertain_values().map(<[_]>::to_vec);
        }
    }
    doc
}

fn encode_evidence(evidence: &EvidenceCase) -> EvidenceCaseDoc {
    EvidenceCaseDoc {
        findings: evidence
            .findings()
            .map(|f| FindingDoc {
                variable: f.variable.name.clone(),
                state: match f.numeric_value {
                    Some(_) => None,
                    None => f.state_name().map(String::from),
                },
                value: f.numeric_value,
            })
            .collect(),
    }
}
