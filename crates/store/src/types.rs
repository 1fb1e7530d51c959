use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A persisted alert rule instance: the template it was generated from
/// plus the opaque parameter document it was submitted with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRecord {
    pub id: String,
    pub template_name: String,
    pub parameters: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RuleRecord {
    /// Build a fresh record with a generated id and current timestamps.
    pub fn new(template_name: impl Into<String>, parameters: Value) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            template_name: template_name.into(),
            parameters,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Field-equality filter for rule searches.
///
/// `parameters` keys are dot-paths within the record's parameter document
/// (e.g. `"target.namespace"`), resolved by the store's native query
/// notation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleFilter {
    pub template_name: Option<String>,
    pub parameters: HashMap<String, String>,
}

impl RuleFilter {
    pub fn for_template(name: impl Into<String>) -> Self {
        Self {
            template_name: Some(name.into()),
            parameters: HashMap::new(),
        }
    }
}

/// A schema listed together with the template name it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedSchema {
    pub name: String,
    pub schema: String,
}
