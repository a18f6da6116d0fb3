//! Edits on potentials: replacing a node's potentials and placing or
//! removing one configuration's column of uncertain values.
//!
//! A column is the contiguous run of cells holding one configuration of
//! the conditioning variables: the child's whole domain for a conditional
//! table, a single cell for an exact distribution's parent table.

use markov_core::{EvidenceCase, Network, Potential, PotentialError, UncertainValue};

use crate::edit::Edit;
use crate::error::{EditError, Result};

/// Replace a node's whole potential list.
#[derive(Debug, Clone)]
pub struct SetPotentialEdit {
    node: String,
    potentials: Vec<Potential>,
    old_potentials: Option<Vec<Potential>>,
}

impl SetPotentialEdit {
    pub fn new(node: impl Into<String>, potentials: Vec<Potential>) -> Self {
        Self {
            node: node.into(),
            potentials,
            old_potentials: None,
        }
    }
}

impl Edit for SetPotentialEdit {
    fn do_edit(&mut self, network: &mut Network) -> Result<()> {
        for potential in &self.potentials {
            for variable in potential.variables() {
                network.node(&variable.name)?;
            }
        }
        self.old_potentials = Some(network.set_potentials(&self.node, self.potentials.clone())?);
        Ok(())
    }

    fn undo(&mut self, network: &mut Network) -> Result<()> {
        let old = self
            .old_potentials
            .take()
            .ok_or(EditError::NotApplied("Set potential"))?;
        network.set_potentials(&self.node, old)?;
        Ok(())
    }

    fn operation_name(&self) -> &'static str {
        "Set potential"
    }

    fn describe(&self) -> String {
        format!("{}: {}", self.operation_name(), self.node)
    }
}

/// Locate the column of `configuration` in one of a node's potentials.
///
/// Returns the column length and its base position.
fn locate_column(
    network: &Network,
    node: &str,
    index: usize,
    configuration: &EvidenceCase,
) -> Result<(usize, usize)> {
    let potential = network
        .node_potentials(node)?
        .get(index)
        .ok_or_else(|| EditError::PotentialNotFound {
            node: node.to_string(),
            index,
        })?;
    let table = potential.table().ok_or_else(|| EditError::NoTable {
        node: node.to_string(),
        kind: potential.kind_name().to_string(),
    })?;
    let base = table.base_position(configuration, potential.indexed_by_parents())?;
    Ok((potential.uncertain_column_length(), base))
}

/// A copy of the node's potential list with one column replaced.
fn with_column(
    network: &Network,
    node: &str,
    index: usize,
    column: Option<&[Option<UncertainValue>]>,
    column_length: usize,
    base: usize,
) -> Result<Vec<Potential>> {
    let mut potentials = network.node_potentials(node)?.to_vec();
    let potential = potentials
        .get_mut(index)
        .ok_or_else(|| EditError::PotentialNotFound {
            node: node.to_string(),
            index,
        })?;
    let kind = potential.kind_name().to_string();
    let table = potential.table_mut().ok_or_else(|| EditError::NoTable {
        node: node.to_string(),
        kind,
    })?;
    table.place_uncertain_column(column, column_length, base);
    Ok(potentials)
}

/// Attach uncertain values to one configuration's column.
#[derive(Debug, Clone)]
pub struct UncertainValuesEdit {
    node: String,
    potential_index: usize,
    configuration: EvidenceCase,
    column: Vec<Option<UncertainValue>>,
    old_potentials: Option<Vec<Potential>>,
}

impl UncertainValuesEdit {
    /// Place `column` at the configuration of the node's first potential.
    pub fn new(
        node: impl Into<String>,
        configuration: EvidenceCase,
        column: Vec<Option<UncertainValue>>,
    ) -> Self {
        Self {
            node: node.into(),
            potential_index: 0,
            configuration,
            column,
            old_potentials: None,
        }
    }

    /// Builder: target another potential of the node.
    pub fn with_potential_index(mut self, index: usize) -> Self {
        self.potential_index = index;
        self
    }
}

impl Edit for UncertainValuesEdit {
    fn do_edit(&mut self, network: &mut Network) -> Result<()> {
        let (column_length, base) =
            locate_column(network, &self.node, self.potential_index, &self.configuration)?;
        if self.column.len() != column_length {
            return Err(PotentialError::ShapeMismatch {
                expected: column_length,
                actual: self.column.len(),
            }
            .into());
        }
        let potentials = with_column(
            network,
            &self.node,
            self.potential_index,
            Some(self.column.as_slice()),
            column_length,
            base,
        )?;
        self.old_potentials = Some(network.set_potentials(&self.node, potentials)?);
        Ok(())
    }

    fn undo(&mut self, network: &mut Network) -> Result<()> {
        let old = self
            .old_potentials
            .take()
            .ok_or(EditError::NotApplied("Set uncertain values"))?;
        network.set_potentials(&self.node, old)?;
        Ok(())
    }

    fn operation_name(&self) -> &'static str {
        "Set uncertain values"
    }
}

/// The column a removal saved for undo.
#[derive(Debug, Clone, PartialEq)]
struct SavedColumn {
    base_position: usize,
    column_length: usize,
    /// `None` when the column carried no uncertain value at all.
    column: Option<Vec<Option<UncertainValue>>>,
}

/// Clear the uncertain values of one configuration's column. When no cell
/// of the table keeps an uncertain value the whole overlay is dropped.
#[derive(Debug, Clone)]
pub struct UncertainValuesRemoveEdit {
    node: String,
    potential_index: usize,
    configuration: EvidenceCase,
    saved: Option<SavedColumn>,
}

impl UncertainValuesRemoveEdit {
    pub fn new(node: impl Into<String>, configuration: EvidenceCase) -> Self {
        Self {
            node: node.into(),
            potential_index: 0,
            configuration,
            saved: None,
        }
    }

    /// Builder: target another potential of the node.
    pub fn with_potential_index(mut self, index: usize) -> Self {
        self.potential_index = index;
        self
    }
}

impl Edit for UncertainValuesRemoveEdit {
    fn do_edit(&mut self, network: &mut Network) -> Result<()> {
        let (column_length, base_position) =
            locate_column(network, &self.node, self.potential_index, &self.configuration)?;
        let potential = &network.node_potentials(&self.node)?[self.potential_index];
        let projected = potential.table_project(&self.configuration)?;
        let column = projected
            .first()
            .and_then(|t| t.uncertain_values())
            .map(<[_]>::to_vec);

        if column.is_some() {
            let potentials = with_column(
                network,
                &self.node,
                self.potential_index,
                None,
                column_length,
                base_position,
            )?;
            network.set_potentials(&self.node, potentials)?;
        }
        self.saved = Some(SavedColumn {
            base_position,
            column_length,
            column,
        });
        Ok(())
    }

    fn undo(&mut self, network: &mut Network) -> Result<()> {
        let saved = self
            .saved
            .take()
            .ok_or(EditError::NotApplied("Remove uncertain values"))?;
        if let Some(column) = &saved.column {
            // Placing a column allocates an all-absent overlay when the
            // table has none left.
            let potentials = with_column(
                network,
                &self.node,
                self.potential_index,
                Some(column.as_slice()),
                saved.column_length,
                saved.base_position,
            )?;
            network.set_potentials(&self.node, potentials)?;
        }
        Ok(())
    }

    fn operation_name(&self) -> &'static str {
        "Remove uncertain values"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markov_core::{Finding, NetworkType, Node, PotentialRole, TablePotential, Variable};

    fn a() -> Variable {
        Variable::chance("A", ["a0", "a1"])
    }

    fn b() -> Variable {
        Variable::chance("B", ["b0", "b1"])
    }

    fn network() -> Network {
        let mut net = Network::new("uncertain", NetworkType::BayesianNetwork);
        let pa = TablePotential::new(vec![a()], PotentialRole::ConditionalProbability).unwrap();
        let pb = TablePotential::new(vec![b(), a()], PotentialRole::ConditionalProbability).unwrap();
        net.add_node(Node::new(a()).with_potential(Potential::Table(pa)))
            .unwrap();
        net.add_node(Node::new(b()).with_potential(Potential::Table(pb)))
            .unwrap();
        net.add_link("A", "B", true).unwrap();
        net
    }

    fn configuration(state_index: usize) -> EvidenceCase {
        let mut evidence = EvidenceCase::new();
        evidence
            .insert(Finding {
                variable: a(),
                state_index,
                numeric_value: None,
            })
            .unwrap();
        evidence
    }

    fn overlay(net: &Network) -> Option<Vec<Option<UncertainValue>>> {
        net.node_potentials("B").unwrap()[0]
            .table()
            .and_then(TablePotential::uncertain_values)
            .map(<[_]>::to_vec)
    }

    #[test]
    fn placing_a_column_fills_the_configuration_run() {
        let mut net = network();
        let column = vec![Some(UncertainValue::new("Beta(3,7)")), None];
        let mut edit = UncertainValuesEdit::new("B", configuration(1), column);
        edit.do_edit(&mut net).unwrap();
        let cells = overlay(&net).unwrap();
        assert_eq!(cells[2], Some(UncertainValue::new("Beta(3,7)")));
        assert!(cells[0].is_none() && cells[1].is_none() && cells[3].is_none());

        edit.undo(&mut net).unwrap();
        assert_eq!(overlay(&net), None);
    }

    #[test]
    fn wrong_column_length_is_rejected() {
        let mut net = network();
        let mut edit = UncertainValuesEdit::new("B", configuration(0), vec![None]);
        assert!(matches!(
            edit.do_edit(&mut net),
            Err(EditError::Potential(PotentialError::ShapeMismatch { .. }))
        ));
    }

    #[test]
    fn removing_the_last_column_drops_the_overlay() {
        let mut net = network();
        let column = vec![
            Some(UncertainValue::new("Beta(1,1)")),
            Some(UncertainValue::new("Complement(1)")),
        ];
        UncertainValuesEdit::new("B", configuration(0), column)
            .do_edit(&mut net)
            .unwrap();
        let before = overlay(&net);

        let mut remove = UncertainValuesRemoveEdit::new("B", configuration(0));
        remove.do_edit(&mut net).unwrap();
        assert_eq!(overlay(&net), None);

        remove.undo(&mut net).unwrap();
        assert_eq!(overlay(&net), before);
    }

    #[test]
    fn removing_an_empty_column_is_a_no_op() {
        let mut net = network();
        let before = net.fingerprint().unwrap();
        let mut remove = UncertainValuesRemoveEdit::new("B", configuration(1));
        remove.do_edit(&mut net).unwrap();
        remove.undo(&mut net).unwrap();
        assert_eq!(net.fingerprint().unwrap(), before);
    }
}
