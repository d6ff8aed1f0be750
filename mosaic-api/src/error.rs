//! Model decoding errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("malformed document: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("expected a {expected} document, got {found}")]
    Shape {
        expected: &'static str,
        found: &'static str,
    },
}

/// Name of a JSON value's type, for shape errors.
pub(crate) fn type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
