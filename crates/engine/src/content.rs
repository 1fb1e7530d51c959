//! Structural validation of rendered rule bodies.
//!
//! A rendered body must parse as a YAML alerting or recording rule with
//! a non-empty expression. The expression itself is treated as opaque
//! query text.

use serde::Deserialize;

use crate::error::EngineError;

/// The structurally significant fields; labels, annotations, and `for`
/// stay opaque.
#[derive(Debug, Deserialize)]
struct RuleBody {
    #[serde(default)]
    alert: Option<String>,
    #[serde(default)]
    record: Option<String>,
    #[serde(default)]
    expr: Option<String>,
}

/// Validate that a rendered body forms a structurally valid rule.
pub fn validate_rule_content(body: &str) -> Result<(), EngineError> {
    let rule: RuleBody = serde_yaml::from_str(body)
        .map_err(|e| EngineError::Content(format!("failed to parse rule: {e}")))?;

    match (&rule.alert, &rule.record) {
        (Some(_), Some(_)) => {
            return Err(EngineError::Content(
                "rule declares both 'alert' and 'record'".into(),
            ))
        }
        (None, None) => {
            return Err(EngineError::Content(
                "rule declares neither 'alert' nor 'record'".into(),
            ))
        }
        _ => {}
    }

    if rule.expr.as_deref().unwrap_or_default().trim().is_empty() {
        return Err(EngineError::Content("rule has an empty 'expr'".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_alert_rule_passes() {
        let body = "alert: HighCPU\nexpr: cpu_usage > 0.9\nfor: 5m\nlabels:\n  severity: critical\n";
        assert!(validate_rule_content(body).is_ok());
    }

    #[test]
    fn recording_rule_passes() {
        let body = "record: job:cpu:rate5m\nexpr: rate(cpu_total[5m])\n";
        assert!(validate_rule_content(body).is_ok());
    }

    #[test]
    fn missing_expr_fails() {
        let err = validate_rule_content("alert: NoExpr\n").unwrap_err();
        assert!(err.to_string().contains("empty 'expr'"));
    }

    #[test]
    fn alert_and_record_together_fail() {
        let body = "alert: A\nrecord: r\nexpr: up\n";
        let err = validate_rule_content(body).unwrap_err();
        assert!(err.to_string().contains("both"));
    }

    #[test]
    fn unparseable_yaml_fails() {
        let err = validate_rule_content("alert: [unclosed\n").unwrap_err();
        assert!(matches!(err, EngineError::Content(_)));
    }
}
