//! Collaborator trait definitions and shared error type.

use crate::types::{NamedSchema, RuleFilter, RuleRecord};

/// Errors surfaced by storage collaborators.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("schema not found: {0}")]
    SchemaNotFound(String),

    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("rule not found: {0}")]
    RuleNotFound(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Key-value store of named (schema, render-template) pairs.
///
/// A template name always resolves to exactly one schema and one render
/// body, or neither. Writes overwrite; there is no version history.
#[async_trait::async_trait]
pub trait TemplateProvider: Send + Sync {
    async fn get_schema(&self, name: &str) -> Result<String, StoreError>;
    async fn get_template(&self, name: &str) -> Result<String, StoreError>;
    async fn create_schema(&self, name: &str, content: &str) -> Result<(), StoreError>;
    async fn create_template(&self, name: &str, content: &str) -> Result<(), StoreError>;
    async fn delete_schema(&self, name: &str) -> Result<(), StoreError>;
    async fn delete_template(&self, name: &str) -> Result<(), StoreError>;
    async fn list_schemas(&self) -> Result<Vec<NamedSchema>, StoreError>;
}

/// Document store for persisted rule records.
#[async_trait::async_trait]
pub trait RuleStore: Send + Sync {
    /// Persist a new record, returning it with id and timestamps assigned.
    async fn create_rule(&self, rule: RuleRecord) -> Result<RuleRecord, StoreError>;
    async fn get_rule(&self, id: &str) -> Result<RuleRecord, StoreError>;
    async fn list_rules(&self, offset: usize, limit: usize) -> Result<Vec<RuleRecord>, StoreError>;
    async fn update_rule(&self, id: &str, rule: RuleRecord) -> Result<(), StoreError>;
    async fn delete_rule(&self, id: &str) -> Result<(), StoreError>;
    /// Field-equality search over nested parameter paths, optionally
    /// scoped to a template name.
    async fn search_rules(&self, filter: &RuleFilter) -> Result<Vec<RuleRecord>, StoreError>;
}
