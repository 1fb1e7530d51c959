//! In-memory store used by tests and local development.
//!
//! Holds schemas, templates, and rule records behind `RwLock`s. Rule
//! records keep insertion order so pagination is stable.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;
use uuid::Uuid;

use rulegen_core::document::string_at_path;

use crate::traits::{RuleStore, StoreError, TemplateProvider};
use crate::types::{NamedSchema, RuleFilter, RuleRecord};

#[derive(Default)]
pub struct MemoryStore {
    schemas: RwLock<HashMap<String, String>>,
    templates: RwLock<HashMap<String, String>>,
    rules: RwLock<Vec<RuleRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TemplateProvider for MemoryStore {
    async fn get_schema(&self, name: &str) -> Result<String, StoreError> {
        self.schemas
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::SchemaNotFound(name.to_string()))
    }

    async fn get_template(&self, name: &str) -> Result<String, StoreError> {
        self.templates
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::TemplateNotFound(name.to_string()))
    }

    async fn create_schema(&self, name: &str, content: &str) -> Result<(), StoreError> {
        self.schemas
            .write()
            .unwrap()
            .insert(name.to_string(), content.to_string());
        Ok(())
    }

    async fn create_template(&self, name: &str, content: &str) -> Result<(), StoreError> {
        self.templates
            .write()
            .unwrap()
            .insert(name.to_string(), content.to_string());
        Ok(())
    }

    async fn delete_schema(&self, name: &str) -> Result<(), StoreError> {
        self.schemas
            .write()
            .unwrap()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::SchemaNotFound(name.to_string()))
    }

    async fn delete_template(&self, name: &str) -> Result<(), StoreError> {
        self.templates
            .write()
            .unwrap()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::TemplateNotFound(name.to_string()))
    }

    async fn list_schemas(&self) -> Result<Vec<NamedSchema>, StoreError> {
        let schemas = self.schemas.read().unwrap();
        let mut out: Vec<NamedSchema> = schemas
            .iter()
            .map(|(name, schema)| NamedSchema {
                name: name.clone(),
                schema: schema.clone(),
            })
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }
}

/// True when every filter entry matches the record's parameter document.
fn matches_filter(parameters: &Value, filter: &RuleFilter) -> bool {
    filter
        .parameters
        .iter()
        .all(|(path, expected)| string_at_path(parameters, path) == Some(expected.as_str()))
}

#[async_trait::async_trait]
impl RuleStore for MemoryStore {
    async fn create_rule(&self, mut rule: RuleRecord) -> Result<RuleRecord, StoreError> {
        if rule.id.is_empty() {
            rule.id = Uuid::new_v4().to_string();
        }
        rule.updated_at = chrono::Utc::now();
        self.rules.write().unwrap().push(rule.clone());
        Ok(rule)
    }

    async fn get_rule(&self, id: &str) -> Result<RuleRecord, StoreError> {
        self.rules
            .read()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| StoreError::RuleNotFound(id.to_string()))
    }

    async fn list_rules(&self, offset: usize, limit: usize) -> Result<Vec<RuleRecord>, StoreError> {
        let rules = self.rules.read().unwrap();
        Ok(rules.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn update_rule(&self, id: &str, rule: RuleRecord) -> Result<(), StoreError> {
        let mut rules = self.rules.write().unwrap();
        let slot = rules
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::RuleNotFound(id.to_string()))?;

        slot.template_name = rule.template_name;
        slot.parameters = rule.parameters;
        slot.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn delete_rule(&self, id: &str) -> Result<(), StoreError> {
        let mut rules = self.rules.write().unwrap();
        let before = rules.len();
        rules.retain(|r| r.id != id);
        if rules.len() == before {
            return Err(StoreError::RuleNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn search_rules(&self, filter: &RuleFilter) -> Result<Vec<RuleRecord>, StoreError> {
        let rules = self.rules.read().unwrap();
        Ok(rules
            .iter()
            .filter(|r| {
                filter
                    .template_name
                    .as_deref()
                    .map_or(true, |name| r.template_name == name)
                    && matches_filter(&r.parameters, filter)
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(template: &str, parameters: Value) -> RuleRecord {
        RuleRecord::new(template, parameters)
    }

    #[tokio::test]
    async fn schema_roundtrip_and_not_found() {
        let store = MemoryStore::new();
        store.create_schema("k8s", "{}").await.unwrap();
        assert_eq!(store.get_schema("k8s").await.unwrap(), "{}");

        let err = store.get_schema("missing").await.unwrap_err();
        assert!(matches!(err, StoreError::SchemaNotFound(_)));
    }

    #[tokio::test]
    async fn create_overwrites_schema() {
        let store = MemoryStore::new();
        store.create_schema("k8s", "v1").await.unwrap();
        store.create_schema("k8s", "v2").await.unwrap();
        assert_eq!(store.get_schema("k8s").await.unwrap(), "v2");
    }

    #[tokio::test]
    async fn list_rules_paginates_in_insertion_order() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .create_rule(record("k8s", json!({"n": i})))
                .await
                .unwrap();
        }

        let page = store.list_rules(1, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].parameters["n"], 1);
        assert_eq!(page[1].parameters["n"], 2);
    }

    #[tokio::test]
    async fn search_matches_nested_paths_scoped_to_template() {
        let store = MemoryStore::new();
        store
            .create_rule(record(
                "k8s",
                json!({"target": {"namespace": "backend", "workload": "api"}}),
            ))
            .await
            .unwrap();
        store
            .create_rule(record(
                "k8s",
                json!({"target": {"namespace": "frontend", "workload": "web"}}),
            ))
            .await
            .unwrap();
        store
            .create_rule(record(
                "host",
                json!({"target": {"namespace": "backend"}}),
            ))
            .await
            .unwrap();

        let mut filter = RuleFilter::for_template("k8s");
        filter
            .parameters
            .insert("target.namespace".to_string(), "backend".to_string());

        let hits = store.search_rules(&filter).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].parameters["target"]["workload"], "api");
    }

    #[tokio::test]
    async fn search_descends_into_rule_arrays() {
        let store = MemoryStore::new();
        store
            .create_rule(record(
                "k8s",
                json!({"rules": [{"rule_type": "cpu"}], "target": {"workload": "api"}}),
            ))
            .await
            .unwrap();

        let mut filter = RuleFilter::for_template("k8s");
        filter
            .parameters
            .insert("rules.rule_type".to_string(), "cpu".to_string());

        assert_eq!(store.search_rules(&filter).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_preserves_identity_and_created_at() {
        let store = MemoryStore::new();
        let created = store
            .create_rule(record("k8s", json!({"v": 1})))
            .await
            .unwrap();

        let mut updated = created.clone();
        updated.parameters = json!({"v": 2});
        store.update_rule(&created.id, updated).await.unwrap();

        let fetched = store.get_rule(&created.id).await.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.created_at, created.created_at);
        assert_eq!(fetched.parameters["v"], 2);
        assert!(fetched.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn delete_missing_rule_errors() {
        let store = MemoryStore::new();
        let err = store.delete_rule("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::RuleNotFound(_)));
    }
}
