//! Dynamic form-field option resolution.
//!
//! Schema fields may declare an `x-dynamic-options` descriptor: a label
//! to collect values for, a templated match expression, and the other
//! fields the expression depends on. The resolver substitutes the
//! caller's current parameter state into the match expression and asks
//! the datasource for label values.

use serde::Deserialize;
use serde_json::Value;

use crate::error::EngineError;
use crate::render;

/// Option-query descriptor attached to a schema field.
#[derive(Debug, Clone, Deserialize)]
pub struct DynamicOptions {
    #[serde(rename = "type")]
    pub kind: String,
    /// The label to query values for.
    #[serde(default)]
    pub label: String,
    /// Templated match expression (may reference current field values).
    #[serde(default, rename = "match")]
    pub match_expr: String,
    /// Fields the match expression depends on.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Extract the `x-dynamic-options` descriptor for a schema field.
pub fn extract(schema: &str, field_path: &str) -> Result<DynamicOptions, EngineError> {
    let schema_doc: Value = serde_json::from_str(schema)
        .map_err(|e| EngineError::Schema(format!("failed to parse schema: {e}")))?;

    let field = navigate_to_field(&schema_doc, field_path)
        .ok_or_else(|| EngineError::FieldNotFound(field_path.to_string()))?;

    let raw = field
        .get("x-dynamic-options")
        .ok_or_else(|| EngineError::NoDynamicOptions(field_path.to_string()))?;

    serde_json::from_value(raw.clone())
        .map_err(|e| EngineError::Schema(format!("failed to parse dynamic options: {e}")))
}

/// Walk `properties.<segment>` chains to a field definition.
fn navigate_to_field<'a>(schema: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let mut cursor = schema;
    for part in path.split('.') {
        cursor = cursor.get("properties")?.get(part)?;
    }
    Some(cursor)
}

/// Substitute the caller's current values into the match expression.
pub fn substitute_match(options: &DynamicOptions, current: &Value) -> Result<String, EngineError> {
    render::render_str(&options.match_expr, current)
        .map_err(|e| EngineError::Schema(format!("failed to substitute match expression: {e}")))
}
