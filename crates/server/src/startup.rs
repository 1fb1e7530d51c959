//! Server startup: shared state construction and template seeding.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use rulegen_core::Config;
use rulegen_engine::{seeder, RuleService};
use rulegen_metrics::{MetricsQuerier, PromClient};
use rulegen_store::{CachingTemplateProvider, MemoryStore, RuleStore, TemplateProvider};

use crate::state::AppState;

/// Build `AppState`: store, caching template provider, metrics client,
/// and the rule service, seeded from the configured directory.
pub async fn build_app_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let store = Arc::new(MemoryStore::new());

    let templates: Arc<dyn TemplateProvider> =
        Arc::new(CachingTemplateProvider::new(store.clone()));
    let rules: Arc<dyn RuleStore> = store;

    let metrics: Arc<dyn MetricsQuerier> = Arc::new(PromClient::new(Duration::from_secs(
        config.metrics.timeout_secs,
    ))?);

    if let Some(seed_dir) = &config.templates.seed_dir {
        info!(dir = %seed_dir.display(), "seeding templates");
        seeder::seed_templates(templates.as_ref(), seed_dir).await?;
    }

    let service = RuleService::new(templates.clone(), rules.clone(), metrics);

    Ok(Arc::new(AppState {
        templates,
        rules,
        service,
    }))
}
