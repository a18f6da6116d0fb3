//! Dense table potentials and mixed-radix indexing.
//!
//! A table stores one value per joint configuration of its variables. The
//! variable at index 0 is the least significant axis: consecutive cells
//! walk through its states first. For a conditional probability table this
//! keeps every parent configuration's distribution over the child in one
//! contiguous run starting at the configuration's base position.

use serde::{Deserialize, Serialize};

use super::uncertain::UncertainValue;
use super::{PotentialError, PotentialRole};
use crate::evidence::EvidenceCase;
use crate::variable::Variable;

/// A dense table over an ordered tuple of discrete variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePotential {
    variables: Vec<Variable>,
    /// What the table represents.
    pub role: PotentialRole,
    /// Decision criterion of a utility table.
    pub criterion: Option<String>,
    values: Vec<f64>,
    uncertain_values: Option<Vec<Option<UncertainValue>>>,
    pub comment: Option<String>,
}

impl TablePotential {
    /// Create a table with role-dependent default values.
    ///
    /// Conditional probabilities and policies start uniform over the
    /// variable at index 0, restrictions start with every configuration
    /// allowed, and utilities start at zero.
    pub fn new(variables: Vec<Variable>, role: PotentialRole) -> Result<Self, PotentialError> {
        validate_variables(&variables)?;
        let size = table_size(&variables);
        let fill = match role {
            PotentialRole::ConditionalProbability | PotentialRole::Policy => variables
                .first()
                .map_or(1.0, |child| 1.0 / child.num_states() as f64),
            PotentialRole::Restriction => 1.0,
            PotentialRole::Utility | PotentialRole::Unspecified => 0.0,
        };
        Ok(Self {
            variables,
            role,
            criterion: None,
            values: vec![fill; size],
            uncertain_values: None,
            comment: None,
        })
    }

    /// Create a table from explicit values.
    pub fn with_values(
        variables: Vec<Variable>,
        role: PotentialRole,
        values: Vec<f64>,
    ) -> Result<Self, PotentialError> {
        validate_variables(&variables)?;
        let expected = table_size(&variables);
        if values.len() != expected {
            return Err(PotentialError::ShapeMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            variables,
            role,
            criterion: None,
            values,
            uncertain_values: None,
            comment: None,
        })
    }

    /// A table with no variables holding a single value.
    pub fn constant(value: f64, role: PotentialRole) -> Self {
        Self {
            variables: Vec::new(),
            role,
            criterion: None,
            values: vec![value],
            uncertain_values: None,
            comment: None,
        }
    }

    /// Builder: set the decision criterion.
    pub fn with_criterion(mut self, criterion: impl Into<String>) -> Self {
        self.criterion = Some(criterion.into());
        self
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Axis of the named variable.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Mutable access to the cells; the table length cannot change.
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Replace every value.
    pub fn set_values(&mut self, values: Vec<f64>) -> Result<(), PotentialError> {
        if values.len() != self.values.len() {
            return Err(PotentialError::ShapeMismatch {
                expected: self.values.len(),
                actual: values.len(),
            });
        }
        self.values = values;
        Ok(())
    }

    pub fn uncertain_values(&self) -> Option<&[Option<UncertainValue>]> {
        self.uncertain_values.as_deref()
    }

    /// Replace the uncertainty overlay. An overlay whose cells are all
    /// absent is stored as no overlay.
    pub fn set_uncertain_values(
        &mut self,
        cells: Option<Vec<Option<UncertainValue>>>,
    ) -> Result<(), PotentialError> {
        if let Some(cells) = &cells {
            if cells.len() != self.values.len() {
                return Err(PotentialError::ShapeMismatch {
                    expected: self.values.len(),
                    actual: cells.len(),
                });
            }
        }
        self.uncertain_values = cells;
        self.canonicalize_uncertainty();
        Ok(())
    }

    pub fn is_uncertain(&self) -> bool {
        self.uncertain_values.is_some()
    }

    /// Number of cells: the product of all cardinalities.
    pub fn table_size(&self) -> usize {
        self.values.len()
    }

    /// Cardinality of each axis.
    pub fn dimensions(&self) -> Vec<usize> {
        dimensions_of(&self.variables)
    }

    /// Stride of each axis in the flat array.
    pub fn offsets(&self) -> Vec<usize> {
        offsets_of(&self.dimensions())
    }

    /// Linear index of a state-index tuple given in variable order.
    ///
    /// # Panics
    ///
    /// Panics if the tuple has the wrong arity or a coordinate is outside
    /// its variable's domain.
    pub fn position(&self, coordinates: &[usize]) -> usize {
        position_in(&self.dimensions(), coordinates)
    }

    /// Inverse of [`TablePotential::position`].
    pub fn coordinates(&self, position: usize) -> Vec<usize> {
        coordinates_in(&self.dimensions(), position)
    }

    /// Value stored at a state-index tuple.
    pub fn value_at(&self, coordinates: &[usize]) -> f64 {
        self.values[self.position(coordinates)]
    }

    /// Restrict the table to its non-evidenced variables.
    ///
    /// Each evidenced axis is fixed at its observed state. The result keeps
    /// the remaining variables in their original order, along with the
    /// role, criterion and the matching slice of the uncertainty overlay.
    pub fn table_project(
        &self,
        evidence: &EvidenceCase,
    ) -> Result<Vec<TablePotential>, PotentialError> {
        let offsets = self.offsets();
        let mut base = 0;
        let mut free = Vec::new();
        let mut free_offsets = Vec::new();

        for (axis, variable) in self.variables.iter().enumerate() {
            match evidence.finding(&variable.name) {
                Some(finding) => {
                    if let (Some(found), Some(expected)) =
                        (&finding.variable.criterion, &self.criterion)
                    {
                        if found != expected {
                            return Err(PotentialError::WrongCriterion {
                                variable: variable.name.clone(),
                                expected: expected.clone(),
                                found: found.clone(),
                            });
                        }
                    }
                    if finding.state_index >= variable.num_states() {
                        return Err(PotentialError::StateOutOfRange {
                            variable: variable.name.clone(),
                            index: finding.state_index,
                        });
                    }
                    base += finding.state_index * offsets[axis];
                }
                None => {
                    free.push(variable.clone());
                    free_offsets.push(offsets[axis]);
                }
            }
        }

        if free.len() == self.variables.len() {
            return Ok(vec![self.clone()]);
        }

        let dims = dimensions_of(&free);
        let mut values = Vec::with_capacity(table_size(&free));
        let mut cells = self
            .uncertain_values
            .as_ref()
            .map(|_| Vec::with_capacity(values.capacity()));

        for_each_configuration(&dims, |_, coords| {
            let source = base
                + coords
                    .iter()
                    .zip(&free_offsets)
                    .map(|(c, o)| c * o)
                    .sum::<usize>();
            values.push(self.values[source]);
            if let (Some(target), Some(overlay)) = (cells.as_mut(), &self.uncertain_values) {
                target.push(overlay[source].clone());
            }
        });

        let mut projected = TablePotential {
            variables: free,
            role: self.role,
            criterion: self.criterion.clone(),
            values,
            uncertain_values: cells,
            comment: self.comment.clone(),
        };
        projected.canonicalize_uncertainty();
        Ok(vec![projected])
    }

    /// Return a copy extended with `variable` as the most significant axis.
    ///
    /// Existing values (and uncertainty cells) are repeated once per state
    /// of the new variable, so the new variable has no effect on the table.
    pub fn add_variable(&self, variable: &Variable) -> Result<TablePotential, PotentialError> {
        if self.contains(&variable.name) {
            return Ok(self.clone());
        }
        let mut variables = self.variables.clone();
        variables.push(variable.clone());
        validate_variables(&variables)?;

        let copies = variable.num_states();
        let values = self.values.repeat(copies);
        let uncertain_values = self.uncertain_values.as_ref().map(|cells| {
            (0..copies)
                .flat_map(|_| cells.iter().cloned())
                .collect::<Vec<_>>()
        });

        Ok(TablePotential {
            variables,
            role: self.role,
            criterion: self.criterion.clone(),
            values,
            uncertain_values,
            comment: self.comment.clone(),
        })
    }

    /// Return a copy without `variable`.
    ///
    /// For a conditional probability the variable is summed out and every
    /// remaining distribution over the child is renormalized; removing the
    /// child itself leaves the unnormalized sums with role
    /// [`PotentialRole::Unspecified`]. Any other role averages over the
    /// removed axis. Uncertainty cells are taken from the variable's first
    /// state. A variable the table does not use leaves it unchanged.
    pub fn remove_variable(&self, variable: &Variable) -> TablePotential {
        let Some(axis) = self.index_of(&variable.name) else {
            return self.clone();
        };

        let dims = self.dimensions();
        let removed = dims[axis];
        let remaining: Vec<Variable> = self
            .variables
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != axis)
            .map(|(_, v)| v.clone())
            .collect();
        let remaining_offsets = offsets_of(&dimensions_of(&remaining));
        let strides: Vec<usize> = (0..dims.len())
            .map(|i| match i.cmp(&axis) {
                std::cmp::Ordering::Less => remaining_offsets[i],
                std::cmp::Ordering::Equal => 0,
                std::cmp::Ordering::Greater => remaining_offsets[i - 1],
            })
            .collect();

        let size = table_size(&remaining);
        let mut values = vec![0.0; size];
        let mut cells = self.uncertain_values.as_ref().map(|_| vec![None; size]);

        for_each_configuration(&dims, |index, coords| {
            let target: usize = coords.iter().zip(&strides).map(|(c, s)| c * s).sum();
            values[target] += self.values[index];
            if coords[axis] == 0 {
                if let (Some(target_cells), Some(overlay)) = (cells.as_mut(), &self.uncertain_values)
                {
                    target_cells[target] = overlay[index].clone();
                }
            }
        });

        let mut role = self.role;
        match self.role {
            PotentialRole::ConditionalProbability if axis > 0 => {
                if let Some(child) = remaining.first() {
                    normalize_columns(&mut values, child.num_states());
                }
            }
            PotentialRole::ConditionalProbability => role = PotentialRole::Unspecified,
            _ => {
                for value in &mut values {
                    *value /= removed as f64;
                }
            }
        }

        let mut reduced = TablePotential {
            variables: remaining,
            role,
            criterion: self.criterion.clone(),
            values,
            uncertain_values: cells,
            comment: self.comment.clone(),
        };
        reduced.canonicalize_uncertainty();
        reduced
    }

    /// First cell of the contiguous run holding one configuration.
    ///
    /// `configuration` must fix every conditioning variable. When the table
    /// belongs to a plain conditional potential, axis 0 is the child and is
    /// placed at its first state; when it is wrapped by an exact
    /// distribution, every axis is a parent and must be fixed.
    pub fn base_position(
        &self,
        configuration: &EvidenceCase,
        in_exact_distr: bool,
    ) -> Result<usize, PotentialError> {
        let mut coordinates = Vec::with_capacity(self.variables.len());
        for (axis, variable) in self.variables.iter().enumerate() {
            if axis == 0 && !in_exact_distr {
                coordinates.push(0);
                continue;
            }
            let finding = configuration
                .finding(&variable.name)
                .ok_or_else(|| PotentialError::MissingConfiguration(variable.name.clone()))?;
            if finding.state_index >= variable.num_states() {
                return Err(PotentialError::StateOutOfRange {
                    variable: variable.name.clone(),
                    index: finding.state_index,
                });
            }
            coordinates.push(finding.state_index);
        }
        Ok(self.position(&coordinates))
    }

    /// Overwrite or clear one contiguous run of the uncertainty overlay.
    ///
    /// With `None` the run is cleared. With a column, an all-absent overlay
    /// is allocated first if the table has none. Either way the overlay is
    /// dropped afterwards if no cell carries a value.
    ///
    /// # Panics
    ///
    /// Panics if the run extends past the end of the table or the column
    /// length differs from `column_length`.
    pub fn place_uncertain_column(
        &mut self,
        column: Option<&[Option<UncertainValue>]>,
        column_length: usize,
        base_position: usize,
    ) {
        let size = self.values.len();
        assert!(
            base_position + column_length <= size,
            "uncertain column [{base_position}, {}) exceeds table of {size} cells",
            base_position + column_length
        );
        let run = base_position..base_position + column_length;
        match column {
            None => {
                if let Some(cells) = self.uncertain_values.as_mut() {
                    for cell in &mut cells[run] {
                        *cell = None;
                    }
                }
            }
            Some(column) => {
                assert_eq!(
                    column.len(),
                    column_length,
                    "uncertain column has {} cells, expected {column_length}",
                    column.len()
                );
                let cells = self
                    .uncertain_values
                    .get_or_insert_with(|| vec![None; size]);
                cells[run].clone_from_slice(column);
            }
        }
        self.canonicalize_uncertainty();
    }

    /// Drop the overlay when no cell carries a value.
    pub fn canonicalize_uncertainty(&mut self) {
        if self
            .uncertain_values
            .as_ref()
            .is_some_and(|cells| cells.iter().all(Option::is_none))
        {
            self.uncertain_values = None;
        }
    }

    /// Scale all values so they sum to one. A zero table is left as is.
    pub fn normalize(&mut self) {
        let total: f64 = self.values.iter().sum();
        if total > 0.0 {
            for value in &mut self.values {
                *value /= total;
            }
        }
    }

    pub(crate) fn from_parts(
        variables: Vec<Variable>,
        role: PotentialRole,
        criterion: Option<String>,
        values: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(values.len(), table_size(&variables));
        Self {
            variables,
            role,
            criterion,
            values,
            uncertain_values: None,
            comment: None,
        }
    }
}

/// Reject variables that cannot form a table axis.
pub(crate) fn validate_variables(variables: &[Variable]) -> Result<(), PotentialError> {
    for (i, variable) in variables.iter().enumerate() {
        if variable.is_numeric() {
            return Err(PotentialError::NumericAxis(variable.name.clone()));
        }
        if variable.num_states() == 0 {
            return Err(PotentialError::EmptyDomain(variable.name.clone()));
        }
        if variables[..i].iter().any(|v| v.name == variable.name) {
            return Err(PotentialError::DuplicateVariable(variable.name.clone()));
        }
    }
    Ok(())
}

/// Cardinality of each variable.
pub fn dimensions_of(variables: &[Variable]) -> Vec<usize> {
    variables.iter().map(Variable::num_states).collect()
}

/// Number of joint configurations of `variables`.
pub fn table_size(variables: &[Variable]) -> usize {
    variables.iter().map(Variable::num_states).product()
}

/// Stride of each axis: the product of all less significant cardinalities.
pub fn offsets_of(dimensions: &[usize]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(dimensions.len());
    let mut stride = 1;
    for &dim in dimensions {
        offsets.push(stride);
        stride *= dim;
    }
    offsets
}

/// Mixed-radix encoding of `coordinates` with axis 0 least significant.
///
/// # Panics
///
/// Panics if the tuple arity differs from the number of axes or a
/// coordinate is outside its axis.
pub fn position_in(dimensions: &[usize], coordinates: &[usize]) -> usize {
    assert_eq!(
        dimensions.len(),
        coordinates.len(),
        "coordinate tuple has {} entries for {} axes",
        coordinates.len(),
        dimensions.len()
    );
    let mut position = 0;
    let mut stride = 1;
    for (axis, (&coord, &dim)) in coordinates.iter().zip(dimensions).enumerate() {
        assert!(
            coord < dim,
            "coordinate {coord} out of bounds for axis {axis} of size {dim}"
        );
        position += coord * stride;
        stride *= dim;
    }
    position
}

/// Decode a linear index into per-axis coordinates.
///
/// # Panics
///
/// Panics if `position` is not below the product of `dimensions`.
pub fn coordinates_in(dimensions: &[usize], position: usize) -> Vec<usize> {
    let size: usize = dimensions.iter().product();
    assert!(
        position < size,
        "position {position} out of bounds for table of {size} cells"
    );
    let mut rest = position;
    dimensions
        .iter()
        .map(|&dim| {
            let coord = rest % dim;
            rest /= dim;
            coord
        })
        .collect()
}

/// Visit every configuration in table order with its linear index.
pub(crate) fn for_each_configuration<F>(dimensions: &[usize], mut visit: F)
where
    F: FnMut(usize, &[usize]),
{
    if dimensions.iter().any(|&d| d == 0) {
        return;
    }
    let size: usize = dimensions.iter().product();
    let mut coords = vec![0usize; dimensions.len()];
    for index in 0..size {
        visit(index, &coords);
        for (axis, coord) in coords.iter_mut().enumerate() {
            *coord += 1;
            if *coord < dimensions[axis] {
                break;
            }
            *coord = 0;
        }
    }
}

/// Renormalize each contiguous run of `column` cells to sum to one.
fn normalize_columns(values: &mut [f64], column: usize) {
    if column == 0 {
        return;
    }
    for chunk in values.chunks_mut(column) {
        let total: f64 = chunk.iter().sum();
        if total > 0.0 {
            for value in chunk {
                *value /= total;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::{EvidenceCase, Finding};

    fn a() -> Variable {
        Variable::chance("A", ["a0", "a1"])
    }

    fn b() -> Variable {
        Variable::chance("B", ["b0", "b1", "b2"])
    }

    fn finding(variable: Variable, state_index: usize) -> Finding {
        Finding {
            variable,
            state_index,
            numeric_value: None,
        }
    }

    /// P(A | B) with columns (0.9, 0.1), (0.5, 0.5), (0.2, 0.8).
    fn cpt() -> TablePotential {
        TablePotential::with_values(
            vec![a(), b()],
            PotentialRole::ConditionalProbability,
            vec![0.9, 0.1, 0.5, 0.5, 0.2, 0.8],
        )
        .unwrap()
    }

    #[test]
    fn default_values_depend_on_role() {
        let cpt = TablePotential::new(vec![b(), a()], PotentialRole::ConditionalProbability)
            .unwrap();
        assert!(cpt.values().iter().all(|v| (*v - 1.0 / 3.0).abs() < 1e-12));
        let utility = TablePotential::new(vec![a()], PotentialRole::Utility).unwrap();
        assert_eq!(utility.values(), &[0.0, 0.0]);
        let restriction = TablePotential::new(vec![a(), b()], PotentialRole::Restriction).unwrap();
        assert_eq!(restriction.table_size(), 6);
        assert!(restriction.values().iter().all(|v| *v == 1.0));
    }

    #[test]
    fn shape_is_checked() {
        let err = TablePotential::with_values(vec![a()], PotentialRole::Utility, vec![1.0])
            .unwrap_err();
        assert_eq!(
            err,
            PotentialError::ShapeMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn numeric_and_duplicate_axes_rejected() {
        let numeric = Variable::utility("U");
        assert!(matches!(
            TablePotential::new(vec![numeric], PotentialRole::Utility),
            Err(PotentialError::NumericAxis(_))
        ));
        assert!(matches!(
            TablePotential::new(vec![a(), a()], PotentialRole::Utility),
            Err(PotentialError::DuplicateVariable(_))
        ));
    }

    #[test]
    fn axis_zero_varies_fastest() {
        let t = cpt();
        assert_eq!(t.offsets(), vec![1, 2]);
        assert_eq!(t.position(&[1, 0]), 1);
        assert_eq!(t.position(&[0, 2]), 4);
        assert_eq!(t.coordinates(5), vec![1, 2]);
        assert_eq!(t.value_at(&[1, 2]), 0.8);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn out_of_bounds_coordinate_panics() {
        cpt().position(&[0, 3]);
    }

    #[test]
    fn project_fixes_evidenced_axis() {
        let mut evidence = EvidenceCase::new();
        evidence.insert(finding(b(), 2)).unwrap();
        let projected = cpt().table_project(&evidence).unwrap();
        assert_eq!(projected.len(), 1);
        assert_eq!(projected[0].variables().len(), 1);
        assert_eq!(projected[0].variables()[0].name, "A");
        assert_eq!(projected[0].values(), &[0.2, 0.8]);

        let mut child_evidence = EvidenceCase::new();
        child_evidence.insert(finding(a(), 1)).unwrap();
        let projected = cpt().table_project(&child_evidence).unwrap();
        assert_eq!(projected[0].values(), &[0.1, 0.5, 0.8]);
    }

    #[test]
    fn project_without_relevant_evidence_is_identity() {
        let evidence = EvidenceCase::new();
        let projected = cpt().table_project(&evidence).unwrap();
        assert_eq!(projected[0], cpt());
    }

    #[test]
    fn project_rejects_mismatched_criterion() {
        let scored = a().with_criterion("cost");
        let table = TablePotential::new(vec![b(), scored.clone()], PotentialRole::Utility)
            .unwrap()
            .with_criterion("effectiveness");
        let mut evidence = EvidenceCase::new();
        evidence.insert(finding(scored, 0)).unwrap();
        assert!(matches!(
            table.table_project(&evidence),
            Err(PotentialError::WrongCriterion { .. })
        ));
    }

    #[test]
    fn add_variable_broadcasts() {
        let c = Variable::chance("C", ["c0", "c1"]);
        let extended = cpt().add_variable(&c).unwrap();
        assert_eq!(extended.table_size(), 12);
        assert_eq!(extended.variables()[2].name, "C");
        for coords in [[0, 1], [1, 2]] {
            let before = cpt().value_at(&coords);
            assert_eq!(extended.value_at(&[coords[0], coords[1], 0]), before);
            assert_eq!(extended.value_at(&[coords[0], coords[1], 1]), before);
        }
        // adding a present variable is a no-op
        assert_eq!(cpt().add_variable(&a()).unwrap(), cpt());
    }

    #[test]
    fn remove_parent_renormalizes() {
        let reduced = cpt().remove_variable(&b());
        assert_eq!(reduced.variables().len(), 1);
        assert_eq!(reduced.table_size(), 2);
        let expected = [1.6 / 3.0, 1.4 / 3.0];
        for (got, want) in reduced.values().iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
        assert_eq!(reduced.role, PotentialRole::ConditionalProbability);
    }

    #[test]
    fn remove_from_utility_averages() {
        let utility =
            TablePotential::with_values(vec![a(), b()], PotentialRole::Utility, vec![
                1.0, 2.0, 3.0, 4.0, 5.0, 6.0,
            ])
            .unwrap();
        let reduced = utility.remove_variable(&b());
        assert_eq!(reduced.values(), &[3.0, 4.0]);
    }

    #[test]
    fn remove_absent_variable_is_identity() {
        let c = Variable::chance("C", ["c0"]);
        assert_eq!(cpt().remove_variable(&c), cpt());
    }

    #[test]
    fn base_position_of_parent_configuration() {
        let mut configuration = EvidenceCase::new();
        configuration.insert(finding(b(), 2)).unwrap();
        assert_eq!(cpt().base_position(&configuration, false).unwrap(), 4);
        // as a wrapped table every axis is a parent
        let parents = TablePotential::new(vec![b()], PotentialRole::Unspecified).unwrap();
        assert_eq!(parents.base_position(&configuration, true).unwrap(), 2);
        assert!(matches!(
            cpt().base_position(&EvidenceCase::new(), false),
            Err(PotentialError::MissingConfiguration(_))
        ));
    }

    #[test]
    fn placing_and_clearing_columns_canonicalizes() {
        let mut t = cpt();
        let column = vec![Some(UncertainValue::new("Beta(2,3)")), None];
        t.place_uncertain_column(Some(column.as_slice()), 2, 2);
        let cells = t.uncertain_values().unwrap();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[2], Some(UncertainValue::new("Beta(2,3)")));
        assert!(cells[3].is_none());

        t.place_uncertain_column(None, 2, 2);
        assert!(t.uncertain_values().is_none());
    }

    #[test]
    fn all_absent_overlay_is_not_stored() {
        let mut t = cpt();
        t.set_uncertain_values(Some(vec![None; 6])).unwrap();
        assert!(!t.is_uncertain());
    }

    #[test]
    fn configurations_enumerate_in_table_order() {
        let mut seen = Vec::new();
        for_each_configuration(&[2, 3], |index, coords| {
            assert_eq!(position_in(&[2, 3], coords), index);
            seen.push(coords.to_vec());
        });
        assert_eq!(seen.len(), 6);
        assert_eq!(seen[1], vec![1, 0]);
    }
}
