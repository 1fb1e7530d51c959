//! Uniqueness-based change planning.
//!
//! A plan is a pure computation deciding whether a candidate submission
//! creates a new rule, overrides an existing one, or collides with a
//! different record. Uniqueness is declared per template via
//! `uniqueness_keys`; different monitoring domains legitimately key
//! rules differently.

use serde::Serialize;
use serde_json::Value;

use rulegen_core::document::string_at_path;
use rulegen_store::{RuleFilter, RuleRecord};

/// Fallback uniqueness: the shared target plus the item discriminator.
pub const DEFAULT_UNIQUENESS_KEYS: &[&str] = &["target", "rules.rule_type"];

/// Outcome of planning a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanAction {
    Create,
    Update,
    Conflict,
}

/// The computed plan. Never persisted; the caller decides what to do
/// with it (a `Conflict` in particular requires manual resolution).
#[derive(Debug, Clone, Serialize)]
pub struct RulePlan {
    pub action: PlanAction,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_rule: Option<RuleRecord>,
    pub new_rule: RuleRecord,
}

/// Build the field-equality filter that defines "the same rule" for a
/// submission under the given uniqueness keys.
///
/// The literal key `"target"` expands to one entry per direct string
/// field of the submission's `target` object. Any other key is resolved
/// as a dot-path (descending into first array elements) and contributes
/// an entry only when it lands on a non-empty string.
pub fn build_uniqueness_filter(
    template_name: &str,
    uniqueness_keys: &[String],
    parameters: &Value,
) -> RuleFilter {
    let mut filter = RuleFilter::for_template(template_name);

    for key in uniqueness_keys {
        if key == "target" {
            if let Some(Value::Object(target)) = parameters.get("target") {
                for (field, value) in target {
                    if let Value::String(s) = value {
                        filter
                            .parameters
                            .insert(format!("target.{field}"), s.clone());
                    }
                }
            }
            continue;
        }

        if let Some(value) = string_at_path(parameters, key) {
            if !value.is_empty() {
                filter.parameters.insert(key.clone(), value.to_string());
            }
        }
    }

    filter
}

/// Resolve the effective uniqueness keys for a schema: the declared
/// list, or the default when none are declared.
pub fn effective_keys(declared: &[String]) -> Vec<String> {
    if declared.is_empty() {
        DEFAULT_UNIQUENESS_KEYS
            .iter()
            .map(|k| k.to_string())
            .collect()
    } else {
        declared.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn target_key_expands_string_leaves() {
        let params = json!({
            "target": {
                "namespace": "backend",
                "workload": "api",
                "replicas": 3
            }
        });
        let keys = vec!["target".to_string()];
        let filter = build_uniqueness_filter("k8s", &keys, &params);

        assert_eq!(filter.template_name.as_deref(), Some("k8s"));
        assert_eq!(filter.parameters.len(), 2);
        assert_eq!(filter.parameters["target.namespace"], "backend");
        assert_eq!(filter.parameters["target.workload"], "api");
        // Numeric leaves do not contribute filter entries.
        assert!(!filter.parameters.contains_key("target.replicas"));
    }

    #[test]
    fn dot_path_key_descends_arrays() {
        let params = json!({"rules": [{"rule_type": "cpu"}]});
        let keys = vec!["rules.rule_type".to_string()];
        let filter = build_uniqueness_filter("k8s", &keys, &params);
        assert_eq!(filter.parameters["rules.rule_type"], "cpu");
    }

    #[test]
    fn unresolvable_or_empty_keys_are_dropped() {
        let params = json!({"common": {"severity": ""}});
        let keys = vec![
            "common.severity".to_string(),
            "common.owner".to_string(),
        ];
        let filter = build_uniqueness_filter("k8s", &keys, &params);
        assert!(filter.parameters.is_empty());
    }

    #[test]
    fn default_keys_apply_when_none_declared() {
        assert_eq!(
            effective_keys(&[]),
            vec!["target".to_string(), "rules.rule_type".to_string()]
        );
        let declared = vec!["target.namespace".to_string()];
        assert_eq!(effective_keys(&declared), declared);
    }
}
