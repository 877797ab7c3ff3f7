//! Error types for constraint-to-query translation.

use serde_json::Value;
use thiserror::Error;

/// Errors raised by individual field encoders when a value does not match
/// the shape the field expects.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    /// Value could not be parsed as a number or numeric interval.
    #[error("expected a numeric value or range, got '{0}'")]
    InvalidNumber(String),

    /// Value could not be parsed as a date or date interval.
    #[error("expected a date like '01-01-2011' or a range, got '{0}'")]
    InvalidDate(String),

    /// Value could not be parsed as a sky position.
    #[error("expected 'ra, dec[, radius]' in degrees, got '{0}'")]
    InvalidPosition(String),

    /// Value had a type the encoder does not accept.
    #[error("expected {expected}, got '{value}'")]
    UnexpectedType {
        /// What the encoder would have accepted.
        expected: &'static str,
        /// The literal offending value.
        value: String,
    },
}

/// Errors raised while compiling a constraint set into a query string.
#[derive(Error, Debug)]
pub enum CompileError {
    /// One or more constraint keys did not match any registered field.
    ///
    /// Every offending key is collected before failing so the caller can
    /// correct the whole batch in one pass. Pairs are reported verbatim in
    /// insertion order.
    #[error("Unsupported constraints were passed:\n{}", list_unresolved(.0))]
    UnsupportedConstraints(Vec<(String, Value)>),

    /// An encoder rejected the value supplied for a recognized field.
    #[error("constraint '{field}': {source}")]
    Encode {
        /// Logical field name of the offending constraint.
        field: String,
        /// Underlying encoder error.
        #[source]
        source: EncodeError,
    },
}

fn list_unresolved(unresolved: &[(String, Value)]) -> String {
    unresolved
        .iter()
        .map(|(key, value)| format!("{} -> {}", key, display_value(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a constraint value the way the caller supplied it, without JSON
/// quoting around strings.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
