//! Targeted partial decoding of engine metadata out of schema documents.
//!
//! A schema is an open-ended JSON document owned by template authors.
//! The engine only cares about a few embedded sections — the datasource
//! descriptor, uniqueness keys, and pipeline declarations — so those are
//! pulled out with narrow serde structs and the rest is left untouched.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EngineError;

/// Connection details for the external metrics backend, embedded in the
/// schema rather than supplied by the end user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Datasource {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

/// One declarative validation step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStep {
    pub name: String,
    #[serde(rename = "type")]
    pub step_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<StepCondition>,
    #[serde(default)]
    pub parameters: serde_json::Map<String, Value>,
}

/// Gate for a pipeline step. `value` may be a string, boolean, or
/// number; comparison is by typed equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepCondition {
    pub property: String,
    pub value: Value,
}

/// Engine-relevant slices of a schema document.
#[derive(Debug, Default, Deserialize)]
pub struct SchemaMeta {
    #[serde(default)]
    pub datasource: Option<Datasource>,
    #[serde(default)]
    pub uniqueness_keys: Vec<String>,
    #[serde(default)]
    pub pipelines: Vec<PipelineStep>,
    #[serde(default)]
    properties: SchemaProperties,
}

#[derive(Debug, Default, Deserialize)]
struct SchemaProperties {
    #[serde(default)]
    rules: RulesProperty,
}

#[derive(Debug, Default, Deserialize)]
struct RulesProperty {
    #[serde(default)]
    items: RuleItems,
}

#[derive(Debug, Default, Deserialize)]
struct RuleItems {
    #[serde(default, rename = "oneOf")]
    one_of: Vec<RuleVariant>,
}

#[derive(Debug, Default, Deserialize)]
struct RuleVariant {
    #[serde(default)]
    properties: VariantProperties,
    #[serde(default)]
    pipelines: Vec<PipelineStep>,
}

#[derive(Debug, Default, Deserialize)]
struct VariantProperties {
    #[serde(default)]
    rule_type: RuleTypeProperty,
}

#[derive(Debug, Default, Deserialize)]
struct RuleTypeProperty {
    #[serde(default, rename = "const")]
    constant: Option<String>,
}

impl SchemaMeta {
    /// Decode the engine-relevant sections of a schema document.
    pub fn parse(schema: &str) -> Result<Self, EngineError> {
        serde_json::from_str(schema)
            .map_err(|e| EngineError::Schema(format!("failed to parse schema metadata: {e}")))
    }

    /// Per-item pipelines, keyed by the `rule_type` const discriminator
    /// of each `oneOf` branch under `properties.rules.items`.
    pub fn item_pipelines(&self) -> HashMap<&str, &[PipelineStep]> {
        let mut out = HashMap::new();
        for variant in &self.properties.rules.items.one_of {
            if let Some(rule_type) = variant.properties.rule_type.constant.as_deref() {
                if !variant.pipelines.is_empty() {
                    out.insert(rule_type, variant.pipelines.as_slice());
                }
            }
        }
        out
    }
}
