//! Table arithmetic used by variable elimination.
//!
//! Every binary operation broadcasts its operands over the union of their
//! variables, taken in order of first appearance.

use super::table::{dimensions_of, for_each_configuration, table_size, TablePotential};
use super::PotentialRole;
use crate::variable::Variable;

/// Maximizing choices closer than this are treated as ties.
pub const TIE_TOLERANCE: f64 = 1e-12;

/// Union of the tables' variables in order of first appearance.
pub fn union_variables<'a, I>(tables: I) -> Vec<Variable>
where
    I: IntoIterator<Item = &'a TablePotential>,
{
    let mut union: Vec<Variable> = Vec::new();
    for table in tables {
        for variable in table.variables() {
            if !union.iter().any(|v| v.name == variable.name) {
                union.push(variable.clone());
            }
        }
    }
    union
}

/// Stride of each target axis inside `table`; zero where the table does
/// not depend on the axis.
fn strides_into(table: &TablePotential, target: &[Variable]) -> Vec<usize> {
    let offsets = table.offsets();
    target
        .iter()
        .map(|v| table.index_of(&v.name).map_or(0, |axis| offsets[axis]))
        .collect()
}

fn combine<F>(tables: &[&TablePotential], identity: f64, role: PotentialRole, op: F) -> TablePotential
where
    F: Fn(f64, f64) -> f64,
{
    let variables = union_variables(tables.iter().copied());
    let strides: Vec<Vec<usize>> = tables.iter().map(|t| strides_into(t, &variables)).collect();
    let mut values = Vec::with_capacity(table_size(&variables));
    for_each_configuration(&dimensions_of(&variables), |_, coords| {
        let mut acc = identity;
        for (table, stride) in tables.iter().zip(&strides) {
            let index: usize = coords.iter().zip(stride).map(|(c, s)| c * s).sum();
            acc = op(acc, table.values()[index]);
        }
        values.push(acc);
    });
    TablePotential::from_parts(variables, role, None, values)
}

/// Broadcast `table` onto `variables`, which must include all of its own.
///
/// # Panics
///
/// Panics if `variables` misses one of the table's variables.
pub fn expand(table: &TablePotential, variables: &[Variable]) -> TablePotential {
    for variable in table.variables() {
        assert!(
            variables.iter().any(|v| v.name == variable.name),
            "cannot expand a table over '{}' onto a set without it",
            variable.name
        );
    }
    let strides = strides_into(table, variables);
    let mut values = Vec::with_capacity(table_size(variables));
    for_each_configuration(&dimensions_of(variables), |_, coords| {
        let index: usize = coords.iter().zip(&strides).map(|(c, s)| c * s).sum();
        values.push(table.values()[index]);
    });
    TablePotential::from_parts(variables.to_vec(), table.role, table.criterion.clone(), values)
}

/// Pointwise product. An empty product is the constant one.
pub fn multiply(tables: &[&TablePotential]) -> TablePotential {
    combine(tables, 1.0, PotentialRole::Unspecified, |a, b| a * b)
}

/// Pointwise sum. An empty sum is the constant zero.
pub fn sum(tables: &[&TablePotential]) -> TablePotential {
    combine(tables, 0.0, PotentialRole::Utility, |a, b| a + b)
}

/// Pointwise quotient, with anything divided by zero taken as zero.
pub fn divide(numerator: &TablePotential, denominator: &TablePotential) -> TablePotential {
    let variables = union_variables([numerator, denominator]);
    let num = expand(numerator, &variables);
    let den = expand(denominator, &variables);
    let values = num
        .values()
        .iter()
        .zip(den.values())
        .map(|(n, d)| if *d == 0.0 { 0.0 } else { n / d })
        .collect();
    TablePotential::from_parts(variables, numerator.role, None, values)
}

/// Remove `name` from the variable list, returning the remaining variables
/// and the axis it occupied.
fn split_axis(table: &TablePotential, name: &str) -> Option<(usize, Vec<Variable>)> {
    let axis = table.index_of(name)?;
    let remaining = table
        .variables()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != axis)
        .map(|(_, v)| v.clone())
        .collect();
    Some((axis, remaining))
}

/// Visit each configuration of the remaining variables with the flat
/// indices of its cells along the eliminated axis.
fn for_each_fiber<F>(table: &TablePotential, axis: usize, remaining: &[Variable], mut visit: F)
where
    F: FnMut(&[usize]),
{
    let offsets = table.offsets();
    let stride = offsets[axis];
    let states = table.variables()[axis].num_states();
    let remaining_offsets: Vec<usize> = (0..offsets.len())
        .filter(|i| *i != axis)
        .map(|i| offsets[i])
        .collect();
    let mut fiber = vec![0; states];
    for_each_configuration(&dimensions_of(remaining), |_, coords| {
        let base: usize = coords.iter().zip(&remaining_offsets).map(|(c, o)| c * o).sum();
        for (state, index) in fiber.iter_mut().enumerate() {
            *index = base + state * stride;
        }
        visit(&fiber);
    });
}

/// Marginalize `name` out by summation. A table without the variable is
/// returned unchanged.
pub fn sum_out(table: &TablePotential, name: &str) -> TablePotential {
    let Some((axis, remaining)) = split_axis(table, name) else {
        return table.clone();
    };
    let mut values = Vec::with_capacity(table_size(&remaining));
    for_each_fiber(table, axis, &remaining, |fiber| {
        values.push(fiber.iter().map(|i| table.values()[*i]).sum());
    });
    TablePotential::from_parts(remaining, table.role, table.criterion.clone(), values)
}

/// Maximize `name` out.
///
/// Returns the maximum table over the remaining variables together with
/// the maximizing state index of `name` for each remaining configuration,
/// in table order. Ties go to the lowest state index.
///
/// # Panics
///
/// Panics if the table does not contain `name`.
pub fn max_out(table: &TablePotential, name: &str) -> (TablePotential, Vec<usize>) {
    let (axis, remaining) = split_axis(table, name)
        .unwrap_or_else(|| panic!("cannot maximize '{name}' out of a table without it"));
    let size = table_size(&remaining);
    let mut values = Vec::with_capacity(size);
    let mut choices = Vec::with_capacity(size);
    for_each_fiber(table, axis, &remaining, |fiber| {
        let mut best = 0;
        for state in 1..fiber.len() {
            if table.values()[fiber[state]] > table.values()[fiber[best]] + TIE_TOLERANCE {
                best = state;
            }
        }
        values.push(table.values()[fiber[best]]);
        choices.push(best);
    });
    (
        TablePotential::from_parts(remaining, table.role, table.criterion.clone(), values),
        choices,
    )
}

/// Fix `name` at the chosen state for each remaining configuration.
///
/// `choices` is indexed like the output of [`max_out`] on a table with the
/// same variables.
///
/// # Panics
///
/// Panics if the table does not contain `name` or `choices` has the wrong
/// length.
pub fn pick(table: &TablePotential, name: &str, choices: &[usize]) -> TablePotential {
    let (axis, remaining) = split_axis(table, name)
        .unwrap_or_else(|| panic!("cannot pick '{name}' from a table without it"));
    assert_eq!(
        choices.len(),
        table_size(&remaining),
        "choice list does not match the remaining configurations"
    );
    let mut values = Vec::with_capacity(choices.len());
    let mut configuration = 0;
    for_each_fiber(table, axis, &remaining, |fiber| {
        values.push(table.values()[fiber[choices[configuration]]]);
        configuration += 1;
    });
    TablePotential::from_parts(remaining, table.role, table.criterion.clone(), values)
}
