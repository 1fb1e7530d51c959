//! Read-through cache for template schemas and render bodies.
//!
//! Wraps any `TemplateProvider`. Reads populate a per-kind map; every
//! write or delete invalidates its key before delegating, so the next
//! read is guaranteed to observe fresh data. Safe under concurrent
//! request access; lock guards are never held across an await.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::traits::{StoreError, TemplateProvider};
use crate::types::NamedSchema;

pub struct CachingTemplateProvider {
    inner: Arc<dyn TemplateProvider>,
    schemas: RwLock<HashMap<String, String>>,
    templates: RwLock<HashMap<String, String>>,
}

impl CachingTemplateProvider {
    pub fn new(inner: Arc<dyn TemplateProvider>) -> Self {
        Self {
            inner,
            schemas: RwLock::new(HashMap::new()),
            templates: RwLock::new(HashMap::new()),
        }
    }

    fn invalidate_schema(&self, name: &str) {
        self.schemas.write().unwrap().remove(name);
    }

    fn invalidate_template(&self, name: &str) {
        self.templates.write().unwrap().remove(name);
    }
}

#[async_trait::async_trait]
impl TemplateProvider for CachingTemplateProvider {
    async fn get_schema(&self, name: &str) -> Result<String, StoreError> {
        if let Some(cached) = self.schemas.read().unwrap().get(name) {
            debug!(name, "schema cache hit");
            return Ok(cached.clone());
        }

        let schema = self.inner.get_schema(name).await?;
        self.schemas
            .write()
            .unwrap()
            .insert(name.to_string(), schema.clone());
        Ok(schema)
    }

    async fn get_template(&self, name: &str) -> Result<String, StoreError> {
        if let Some(cached) = self.templates.read().unwrap().get(name) {
            debug!(name, "template cache hit");
            return Ok(cached.clone());
        }

        let body = self.inner.get_template(name).await?;
        self.templates
            .write()
            .unwrap()
            .insert(name.to_string(), body.clone());
        Ok(body)
    }

    async fn create_schema(&self, name: &str, content: &str) -> Result<(), StoreError> {
        // Invalidate before the write so a concurrent read cannot re-cache
        // stale content after the store has changed.
        self.invalidate_schema(name);
        self.inner.create_schema(name, content).await
    }

    async fn create_template(&self, name: &str, content: &str) -> Result<(), StoreError> {
        self.invalidate_template(name);
        self.inner.create_template(name, content).await
    }

    async fn delete_schema(&self, name: &str) -> Result<(), StoreError> {
        self.invalidate_schema(name);
        self.inner.delete_schema(name).await
    }

    async fn delete_template(&self, name: &str) -> Result<(), StoreError> {
        self.invalidate_template(name);
        self.inner.delete_template(name).await
    }

    async fn list_schemas(&self) -> Result<Vec<NamedSchema>, StoreError> {
        self.inner.list_schemas().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn caching_pair() -> (Arc<MemoryStore>, CachingTemplateProvider) {
        let inner = Arc::new(MemoryStore::new());
        let cache = CachingTemplateProvider::new(inner.clone());
        (inner, cache)
    }

    #[tokio::test]
    async fn read_populates_cache() {
        let (inner, cache) = caching_pair();
        inner.create_schema("k8s", "v1").await.unwrap();

        assert_eq!(cache.get_schema("k8s").await.unwrap(), "v1");

        // Mutating the inner store directly is invisible to cached reads.
        inner.create_schema("k8s", "v2").await.unwrap();
        assert_eq!(cache.get_schema("k8s").await.unwrap(), "v1");
    }

    #[tokio::test]
    async fn write_through_invalidates() {
        let (_, cache) = caching_pair();
        cache.create_schema("k8s", "v1").await.unwrap();
        assert_eq!(cache.get_schema("k8s").await.unwrap(), "v1");

        cache.create_schema("k8s", "v2").await.unwrap();
        assert_eq!(cache.get_schema("k8s").await.unwrap(), "v2");
    }

    #[tokio::test]
    async fn delete_invalidates_and_propagates_not_found() {
        let (_, cache) = caching_pair();
        cache.create_template("k8s", "body").await.unwrap();
        assert_eq!(cache.get_template("k8s").await.unwrap(), "body");

        cache.delete_template("k8s").await.unwrap();
        let err = cache.get_template("k8s").await.unwrap_err();
        assert!(matches!(err, StoreError::TemplateNotFound(_)));
    }

    #[tokio::test]
    async fn schema_and_template_caches_are_independent() {
        let (_, cache) = caching_pair();
        cache.create_schema("k8s", "schema").await.unwrap();
        cache.create_template("k8s", "body").await.unwrap();

        assert_eq!(cache.get_schema("k8s").await.unwrap(), "schema");
        assert_eq!(cache.get_template("k8s").await.unwrap(), "body");

        cache.delete_schema("k8s").await.unwrap();
        assert!(cache.get_schema("k8s").await.is_err());
        assert_eq!(cache.get_template("k8s").await.unwrap(), "body");
    }
}
