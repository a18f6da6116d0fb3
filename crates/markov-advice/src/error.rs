//! Advice error types.

use std::collections::BTreeMap;

/// What a caller of the advice boundary can observe.
///
/// Core failures are logged and collapse into [`AdviceError::Internal`];
/// their detail never crosses the boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdviceError {
    /// Field name to message, for every field that failed validation.
    #[error("invalid request: {}", format_fields(.0))]
    Validation(BTreeMap<String, String>),

    #[error("failed to calculate advice")]
    Internal,
}

fn format_fields(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{field} {message}"))
        .collect::<Vec<_>>()
        .join(", ")
}
