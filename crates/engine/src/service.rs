//! Facade over the engine components.
//!
//! Owns the collaborator handles and wires validation, pipelines,
//! rendering, planning, aggregation, and option resolution into the
//! operations the transport layer exposes.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::warn;

use rulegen_core::document::deep_merge;
use rulegen_metrics::MetricsQuerier;
use rulegen_store::{RuleRecord, RuleStore, TemplateProvider};

use crate::aggregate::{self, RenderedGroups};
use crate::content;
use crate::error::EngineError;
use crate::options;
use crate::pipeline::PipelineProcessor;
use crate::plan::{self, PlanAction, RulePlan};
use crate::render;
use crate::schema_meta::SchemaMeta;
use crate::validator;

pub struct RuleService {
    templates: Arc<dyn TemplateProvider>,
    rules: Arc<dyn RuleStore>,
    metrics: Arc<dyn MetricsQuerier>,
    pipelines: PipelineProcessor,
}

impl RuleService {
    pub fn new(
        templates: Arc<dyn TemplateProvider>,
        rules: Arc<dyn RuleStore>,
        metrics: Arc<dyn MetricsQuerier>,
    ) -> Self {
        let pipelines = PipelineProcessor::new(metrics.clone());
        Self {
            templates,
            rules,
            metrics,
            pipelines,
        }
    }

    /// Validate parameters against the named template's schema and
    /// render the rule body.
    pub async fn generate_rule(
        &self,
        template_name: &str,
        parameters: &Value,
    ) -> Result<String, EngineError> {
        let schema = self.templates.get_schema(template_name).await?;
        validator::validate(&schema, parameters)?;

        let body = self.templates.get_template(template_name).await?;
        Ok(render::render_str(&body, parameters)?)
    }

    /// Validate parameters against the schema, then execute the
    /// schema's declared pipelines: global steps first, then per-item
    /// steps selected by each item's `rule_type` discriminator.
    pub async fn validate_rule(
        &self,
        template_name: &str,
        parameters: &Value,
    ) -> Result<(), EngineError> {
        let schema = self.templates.get_schema(template_name).await?;
        validator::validate(&schema, parameters)?;

        let meta = SchemaMeta::parse(&schema)?;
        if !meta.pipelines.is_empty() {
            self.pipelines
                .execute(&meta.pipelines, meta.datasource.as_ref(), parameters)
                .await?;
        }

        let item_pipelines = meta.item_pipelines();
        if item_pipelines.is_empty() {
            return Ok(());
        }
        let Some(items) = parameters.get("rules").and_then(Value::as_array) else {
            return Ok(());
        };

        for (index, item) in items.iter().enumerate() {
            let Some(fields) = item.as_object() else {
                continue;
            };
            // Items without a discriminator are caught by schema validation.
            let Some(rule_type) = fields.get("rule_type").and_then(Value::as_str) else {
                continue;
            };
            let Some(steps) = item_pipelines.get(rule_type) else {
                continue;
            };

            // Overlay the item's own fields onto the shared submission
            // fields so steps can reference both.
            let mut scoped = parameters.clone();
            if let Value::Object(root) = &mut scoped {
                for (key, value) in fields {
                    root.insert(key.clone(), value.clone());
                }
            }

            self.pipelines
                .execute(steps, meta.datasource.as_ref(), &scoped)
                .await
                .map_err(|e| EngineError::ItemPipeline {
                    index,
                    rule_type: rule_type.to_string(),
                    source: Box::new(e),
                })?;
        }
        Ok(())
    }

    /// Decide whether a submission creates a new rule or overrides an
    /// existing one under the template's uniqueness keys.
    pub async fn plan_rule_creation(
        &self,
        template_name: &str,
        parameters: Value,
    ) -> Result<RulePlan, EngineError> {
        let schema = self.templates.get_schema(template_name).await?;
        validator::validate(&schema, &parameters)?;

        let meta = SchemaMeta::parse(&schema)?;
        let keys = plan::effective_keys(&meta.uniqueness_keys);
        let filter = plan::build_uniqueness_filter(template_name, &keys, &parameters);

        let existing = self.rules.search_rules(&filter).await?;
        let new_rule = candidate_record(String::new(), template_name, parameters);

        match existing.into_iter().next() {
            Some(existing_rule) => Ok(RulePlan {
                action: PlanAction::Update,
                reason: format!(
                    "rule with same uniqueness constraints ({keys:?}) already exists"
                ),
                existing_rule: Some(existing_rule),
                new_rule,
            }),
            None => Ok(RulePlan {
                action: PlanAction::Create,
                reason: "no existing rule found with these constraints".to_string(),
                existing_rule: None,
                new_rule,
            }),
        }
    }

    /// Decide whether updating an existing rule (with a possibly
    /// partial parameter document) collides with a different record.
    pub async fn plan_rule_update(
        &self,
        id: &str,
        template_name: Option<&str>,
        parameters: Option<Value>,
    ) -> Result<RulePlan, EngineError> {
        let existing = self.rules.get_rule(id).await?;
        let template_name = template_name.unwrap_or(&existing.template_name);

        let merged = match parameters {
            Some(updates) => {
                let mut base = existing.parameters.clone();
                deep_merge(&mut base, updates);
                base
            }
            None => existing.parameters.clone(),
        };

        let schema = self.templates.get_schema(template_name).await?;
        validator::validate(&schema, &merged)?;

        let meta = SchemaMeta::parse(&schema)?;
        let keys = plan::effective_keys(&meta.uniqueness_keys);
        let filter = plan::build_uniqueness_filter(template_name, &keys, &merged);

        let matches = self.rules.search_rules(&filter).await?;
        let new_rule = candidate_record(id.to_string(), template_name, merged);

        match matches.into_iter().find(|r| r.id != id) {
            Some(other) => Ok(RulePlan {
                action: PlanAction::Conflict,
                reason: format!(
                    "rule with same uniqueness constraints ({keys:?}) already exists (id: {})",
                    other.id
                ),
                existing_rule: Some(other),
                new_rule,
            }),
            None => Ok(RulePlan {
                action: PlanAction::Update,
                reason: "no conflict found".to_string(),
                existing_rule: None,
                new_rule,
            }),
        }
    }

    /// Render every record and assemble the grouped composite document.
    ///
    /// A record that fails to render is logged and skipped; the feed is
    /// built from the remaining records.
    pub async fn generate_aggregate(&self, records: &[RuleRecord]) -> String {
        let mut groups = RenderedGroups::new();

        for record in records {
            match self
                .generate_rule(&record.template_name, &record.parameters)
                .await
            {
                Ok(body) => groups
                    .entry(record.template_name.clone())
                    .or_default()
                    .push(body),
                Err(e) => {
                    warn!(id = %record.id, error = %e, "failed to generate rule, skipping");
                }
            }
        }

        aggregate::write_grouped_document(&groups)
    }

    /// Render a candidate template body against sample parameters and
    /// check the output forms a valid rule.
    pub async fn validate_template(
        &self,
        template_body: &str,
        parameters: &Value,
    ) -> Result<String, EngineError> {
        let rendered = render::render_str(template_body, parameters)?;
        content::validate_rule_content(&rendered)?;
        Ok(rendered)
    }

    /// Resolve a schema field's dynamic options against the datasource.
    pub async fn get_options(
        &self,
        template_name: &str,
        field_path: &str,
        current_values: &Value,
    ) -> Result<Vec<String>, EngineError> {
        let schema = self.templates.get_schema(template_name).await?;

        let opts = options::extract(&schema, field_path)?;
        if opts.kind != "prometheus_query" {
            return Err(EngineError::Schema(format!(
                "unsupported dynamic options type: {}",
                opts.kind
            )));
        }
        if opts.label.is_empty() {
            return Err(EngineError::Schema("dynamic options label is empty".into()));
        }
        if opts.match_expr.is_empty() {
            return Err(EngineError::Schema("dynamic options match is empty".into()));
        }

        let match_expr = options::substitute_match(&opts, current_values)?;

        let meta = SchemaMeta::parse(&schema)?;
        let datasource = meta
            .datasource
            .ok_or_else(|| EngineError::Schema("datasource not configured in template".into()))?;

        Ok(self
            .metrics
            .label_values(&datasource.url, &opts.label, &match_expr)
            .await?)
    }
}

/// Candidate record for a plan: not persisted, id empty until creation.
fn candidate_record(id: String, template_name: &str, parameters: Value) -> RuleRecord {
    let now = Utc::now();
    RuleRecord {
        id,
        template_name: template_name.to_string(),
        parameters,
        created_at: now,
        updated_at: now,
    }
}
