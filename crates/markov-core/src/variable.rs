//! Variables and their value domains.
//!
//! A variable is either discrete (an ordered list of named states) or
//! numeric. The order of states is significant: it fixes the axis order of
//! every table the variable appears in and must match the persisted order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named state of a discrete variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    name: String,
}

impl State {
    /// Create a state with the given label.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The state's label.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The role a variable (and the node wrapping it) plays in a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableKind {
    Chance,
    Decision,
    Utility,
}

impl VariableKind {
    /// Lower-case name used in documents and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableKind::Chance => "chance",
            VariableKind::Decision => "decision",
            VariableKind::Utility => "utility",
        }
    }

    /// Parse the lower-case name produced by [`VariableKind::as_str`].
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "chance" => Some(VariableKind::Chance),
            "decision" => Some(VariableKind::Decision),
            "utility" => Some(VariableKind::Utility),
            _ => None,
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of values a variable ranges over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Domain {
    /// Ordered, named states.
    FiniteStates(Vec<State>),
    /// A real-valued interval.
    Numeric {
        min: f64,
        max: f64,
        unit: Option<String>,
    },
}

/// A random, decision, or utility variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Unique name within a network.
    pub name: String,
    /// Chance, decision, or utility.
    pub kind: VariableKind,
    /// States or numeric interval.
    pub domain: Domain,
    /// Decision criterion this variable contributes to (utility variables).
    pub criterion: Option<String>,
    /// Free-text comment.
    pub comment: Option<String>,
}

impl Variable {
    /// Create a discrete variable from state labels.
    pub fn finite<I, S>(name: impl Into<String>, kind: VariableKind, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind,
            domain: Domain::FiniteStates(states.into_iter().map(State::new).collect()),
            criterion: None,
            comment: None,
        }
    }

    /// Create a discrete chance variable.
    pub fn chance<I, S>(name: impl Into<String>, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::finite(name, VariableKind::Chance, states)
    }

    /// Create a discrete decision variable.
    pub fn decision<I, S>(name: impl Into<String>, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::finite(name, VariableKind::Decision, states)
    }

    /// Create a numeric variable bounded by `[min, max]`.
    pub fn numeric(name: impl Into<String>, kind: VariableKind, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            domain: Domain::Numeric {
                min,
                max,
                unit: None,
            },
            criterion: None,
            comment: None,
        }
    }

    /// Create an unbounded numeric utility variable.
    pub fn utility(name: impl Into<String>) -> Self {
        Self::numeric(
            name,
            VariableKind::Utility,
            f64::NEG_INFINITY,
            f64::INFINITY,
        )
    }

    /// Builder: set the decision criterion.
    pub fn with_criterion(mut self, criterion: impl Into<String>) -> Self {
        self.criterion = Some(criterion.into());
        self
    }

    /// Builder: set a comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// States of a discrete variable; empty for numeric variables.
    pub fn states(&self) -> &[State] {
        match &self.domain {
            Domain::FiniteStates(states) => states,
            Domain::Numeric { .. } => &[],
        }
    }

    /// Number of states; zero for numeric variables.
    pub fn num_states(&self) -> usize {
        self.states().len()
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.domain, Domain::Numeric { .. })
    }

    /// Index of the state with the given label.
    pub fn state_index(&self, state: &str) -> Option<usize> {
        self.states().iter().position(|s| s.name() == state)
    }

    /// Whether a numeric value lies inside this variable's interval.
    pub fn admits(&self, value: f64) -> bool {
        match &self.domain {
            Domain::Numeric { min, max, .. } => value >= *min && value <= *max,
            Domain::FiniteStates(_) => false,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_variable_states() {
        let v = Variable::chance("Cough", ["0", "1", "2", "3"]);
        assert_eq!(v.num_states(), 4);
        assert_eq!(v.state_index("2"), Some(2));
        assert_eq!(v.state_index("7"), None);
        assert!(!v.is_numeric());
        assert_eq!(v.states()[3].to_string(), "3");
    }

    #[test]
    fn numeric_variable_admits_interval() {
        let v = Variable::numeric("Cost", VariableKind::Chance, 0.0, 10.0);
        assert!(v.is_numeric());
        assert_eq!(v.num_states(), 0);
        assert!(v.admits(5.0));
        assert!(!v.admits(11.0));
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in [
            VariableKind::Chance,
            VariableKind::Decision,
            VariableKind::Utility,
        ] {
            assert_eq!(VariableKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(VariableKind::parse("oopn"), None);
    }
}
