//! Potential decoders keyed by the document's `type` discriminator.

use markov_core::{
    DistributionPotential, ExactDistrPotential, Potential, PotentialRole, TablePotential, Variable,
};

use crate::document::PotentialDoc;
use crate::error::{IoError, Result};

/// Build a potential from its document form and resolved variables.
pub type Decoder = fn(&PotentialDoc, Vec<Variable>, PotentialRole) -> Result<Potential>;

/// Every registered decoder. `ProbTable` is the name older tools use for
/// plain tables.
static DECODERS: &[(&str, Decoder)] = &[
    ("Table", decode_table),
    ("ProbTable", decode_table),
    ("UnivariateDistr", decode_univariate),
];

pub fn decoder_for(kind: &str) -> Option<Decoder> {
    DECODERS
        .iter()
        .find(|(name, _)| *name == kind)
        .map(|(_, decoder)| *decoder)
}

pub fn registered_types() -> impl Iterator<Item = &'static str> {
    DECODERS.iter().map(|(name, _)| *name)
}

fn required_values<'a>(doc: &'a PotentialDoc) -> Result<&'a [f64]> {
    doc.values.as_deref().ok_or_else(|| {
        IoError::InvalidDocument(format!(
            "{} potential over [{}] has no values",
            doc.kind,
            doc.variables.join(", ")
        ))
    })
}

fn decode_table(
    doc: &PotentialDoc,
    variables: Vec<Variable>,
    role: PotentialRole,
) -> Result<Potential> {
    let mut table = TablePotential::with_values(variables, role, required_values(doc)?.to_vec())?;
    table.criterion = doc.criterion.clone();
    table.comment = doc.comment.clone();
    table.set_uncertain_values(doc.uncertain_values.clone())?;
    Ok(Potential::Table(table))
}

fn decode_univariate(
    doc: &PotentialDoc,
    variables: Vec<Variable>,
    role: PotentialRole,
) -> Result<Potential> {
    match doc.distribution.as_deref() {
        Some("Exact") => {
            let mut exact =
                ExactDistrPotential::with_values(variables, role, required_values(doc)?.to_vec())?;
            exact
                .table_mut()
                .set_uncertain_values(doc.uncertain_values.clone())?;
            Ok(Potential::ExactDistr(exact))
        }
        Some(distribution) => {
            let parameters = doc.parameters.clone().ok_or_else(|| {
                IoError::InvalidDocument(format!("{distribution} distribution has no parameters"))
            })?;
            Ok(Potential::Distribution(DistributionPotential::new(
                variables,
                role,
                distribution,
                doc.parametrization.clone().unwrap_or_default(),
                parameters,
            )?))
        }
        None => Err(IoError::InvalidDocument(
            "UnivariateDistr potential without a distribution".to_string(),
        )),
    }
}
