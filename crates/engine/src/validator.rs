//! JSON-Schema parameter validation.
//!
//! Violations are human-readable strings (instance path + message) and
//! go back to the caller verbatim.

use serde_json::Value;

use crate::error::EngineError;

/// Collect all schema violations for a candidate parameter document.
///
/// An unparseable or uncompilable schema is a [`EngineError::Schema`],
/// not a violation.
pub fn violations(schema: &str, parameters: &Value) -> Result<Vec<String>, EngineError> {
    let schema_doc: Value = serde_json::from_str(schema)
        .map_err(|e| EngineError::Schema(format!("failed to parse schema: {e}")))?;

    let validator = jsonschema::validator_for(&schema_doc)
        .map_err(|e| EngineError::Schema(e.to_string()))?;

    Ok(validator
        .iter_errors(parameters)
        .map(|e| format!("{}: {}", e.instance_path, e))
        .collect())
}

/// Validate parameters against a schema, failing with the full list of
/// violations joined into one message.
pub fn validate(schema: &str, parameters: &Value) -> Result<(), EngineError> {
    let errors = violations(schema, parameters)?;
    if errors.is_empty() {
        Ok(())
    } else {
        Err(EngineError::Validation(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SCHEMA: &str = r#"{
        "type": "object",
        "required": ["target"],
        "properties": {
            "target": {
                "type": "object",
                "required": ["namespace"],
                "properties": {"namespace": {"type": "string"}}
            },
            "common": {
                "type": "object",
                "properties": {
                    "severity": {"type": "string", "enum": ["warning", "critical"]}
                }
            }
        }
    }"#;

    #[test]
    fn valid_parameters_pass() {
        let params = json!({"target": {"namespace": "backend"}});
        assert!(validate(SCHEMA, &params).is_ok());
    }

    #[test]
    fn missing_required_field_lists_violation() {
        let params = json!({"common": {"severity": "critical"}});
        let errors = violations(SCHEMA, &params).unwrap();
        assert!(!errors.is_empty());
        assert!(errors[0].contains("target"));
    }

    #[test]
    fn enum_violation_is_reported() {
        let params = json!({"target": {"namespace": "backend"},
                            "common": {"severity": "page-me"}});
        let err = validate(SCHEMA, &params).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert!(err.to_string().contains("severity"));
    }

    #[test]
    fn conditional_subschema_activates_on_sibling_const() {
        // rule_type selects which shape the item must take.
        let schema = r#"{
            "type": "object",
            "required": ["rule"],
            "properties": {
                "rule": {
                    "oneOf": [
                        {
                            "properties": {
                                "rule_type": {"const": "cpu"},
                                "threshold": {"type": "number", "maximum": 1}
                            },
                            "required": ["rule_type", "threshold"]
                        },
                        {
                            "properties": {
                                "rule_type": {"const": "ram"},
                                "threshold": {"type": "number"}
                            },
                            "required": ["rule_type", "threshold"]
                        }
                    ]
                }
            }
        }"#;

        let cpu_ok = json!({"rule": {"rule_type": "cpu", "threshold": 0.9}});
        assert!(validate(schema, &cpu_ok).is_ok());

        // A cpu threshold above 1 only violates the cpu branch.
        let cpu_bad = json!({"rule": {"rule_type": "cpu", "threshold": 2.0}});
        assert!(validate(schema, &cpu_bad).is_err());

        let ram_ok = json!({"rule": {"rule_type": "ram", "threshold": 2000000000.0}});
        assert!(validate(schema, &ram_ok).is_ok());
    }

    #[test]
    fn broken_schema_is_schema_error_not_violation() {
        let err = validate("{\"type\": ", &json!({})).unwrap_err();
        assert!(matches!(err, EngineError::Schema(_)));
    }
}
