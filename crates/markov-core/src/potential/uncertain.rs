//! Per-cell parametric uncertainty overlays.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Uncertainty attached to one table cell.
///
/// The literal cell value is kept separately; the overlay carries the
/// function expression describing how that value may vary (for example
/// `Beta(2, 8)` or `Complement(1)`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UncertainValue {
    pub function: String,
    pub name: Option<String>,
}

impl UncertainValue {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            name: None,
        }
    }

    /// Builder: label the uncertain parameter.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl fmt::Display for UncertainValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}: {}", self.function),
            None => write!(f, "{}", self.function),
        }
    }
}

/// Whether any cell of an overlay carries a value.
pub fn has_uncertain_values(cells: Option<&[Option<UncertainValue>]>) -> bool {
    cells.is_some_and(|cells| cells.iter().any(Option::is_some))
}
