//! The serialized shape of a model document.
//!
//! These types mirror the JSON layout one to one. Conversion to and from
//! the core model lives in the reader and writer.

use std::collections::BTreeMap;

use markov_core::UncertainValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub format_version: String,
    pub network: NetworkDoc,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence_cases: Vec<EvidenceCaseDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDoc {
    #[serde(rename = "type")]
    pub network_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_constraints: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decision_criteria: Vec<CriterionDoc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal_unit: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_properties: BTreeMap<String, String>,
    pub variables: Vec<VariableDoc>,
    #[serde(default)]
    pub links: Vec<LinkDoc>,
    /// Potentials of chance and utility nodes.
    #[serde(default)]
    pub potentials: Vec<PotentialDoc>,
    /// Potentials of decision nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<PotentialDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionDoc {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDoc {
    pub name: String,
    /// `chance`, `decision` or `utility`.
    pub role: String,
    /// `finiteStates` or `numeric`.
    #[serde(rename = "type")]
    pub domain: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub states: Vec<String>,
    /// Absent for an unbounded side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criterion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkDoc {
    pub source: String,
    pub target: String,
    pub directed: bool,
    /// Cells over `[source, target]`; written only when one of them is 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restriction: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotentialDoc {
    /// Decoder discriminator, e.g. `Table` or `UnivariateDistr`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Owning node; defaults to the first variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    pub role: String,
    pub variables: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parametrization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertain_values: Option<Vec<Option<UncertainValue>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criterion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceCaseDoc {
    pub findings: Vec<FindingDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingDoc {
    pub variable: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}
