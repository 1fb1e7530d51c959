//! Declarative validation pipeline execution.
//!
//! Steps run in declaration order and short-circuit on the first
//! failure. Dispatch goes through a registry mapping step-type names to
//! [`StepRunner`] implementations; new step types are added by
//! registering handlers, never by branching on type strings here.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use rulegen_core::document::value_at_path;
use rulegen_metrics::MetricsQuerier;

use crate::error::{EngineError, StepError};
use crate::render;
use crate::schema_meta::{Datasource, PipelineStep, StepCondition};

/// A single pipeline step implementation.
#[async_trait::async_trait]
pub trait StepRunner: Send + Sync {
    async fn run(
        &self,
        datasource: Option<&Datasource>,
        parameters: &Value,
        step_parameters: &serde_json::Map<String, Value>,
    ) -> Result<(), StepError>;
}

/// Executes a schema's declared pipeline steps.
pub struct PipelineProcessor {
    runners: HashMap<String, Box<dyn StepRunner>>,
}

impl PipelineProcessor {
    /// Build a processor with the built-in runners registered.
    pub fn new(metrics: Arc<dyn MetricsQuerier>) -> Self {
        let mut processor = Self {
            runners: HashMap::new(),
        };
        processor.register(
            "validate_metric_exists",
            Box::new(ValidateMetricExists::new(metrics)),
        );
        processor
    }

    /// Register a step runner under a type name.
    pub fn register(&mut self, step_type: impl Into<String>, runner: Box<dyn StepRunner>) {
        self.runners.insert(step_type.into(), runner);
    }

    /// Run a sequence of steps against a parameter document.
    ///
    /// Steps whose condition does not hold are skipped without error.
    /// A failing step aborts the run with an error attributed to the
    /// step's name.
    pub async fn execute(
        &self,
        steps: &[PipelineStep],
        datasource: Option<&Datasource>,
        parameters: &Value,
    ) -> Result<(), EngineError> {
        for step in steps {
            if let Some(condition) = &step.condition {
                if !condition_holds(condition, parameters) {
                    debug!(step = %step.name, "condition not met, skipping step");
                    continue;
                }
            }

            let runner = self
                .runners
                .get(&step.step_type)
                .ok_or_else(|| EngineError::UnknownStepType(step.step_type.clone()))?;

            runner
                .run(datasource, parameters, &step.parameters)
                .await
                .map_err(|e| EngineError::Pipeline {
                    step: step.name.clone(),
                    message: e.to_string(),
                })?;
        }
        Ok(())
    }
}

/// Evaluate a step condition against the parameter document.
///
/// The property is resolved as a dot-path; when the resolved node is a
/// list, its first element is inspected. An absent property means the
/// condition does not hold (the step is skipped, not an error).
fn condition_holds(condition: &StepCondition, parameters: &Value) -> bool {
    let Some(node) = value_at_path(parameters, &condition.property) else {
        return false;
    };
    let node = match node {
        Value::Array(items) => match items.first() {
            Some(first) => first,
            None => return false,
        },
        other => other,
    };
    typed_equal(node, &condition.value)
}

/// Typed equality for condition values: strings, booleans, and numbers
/// compare within their own type; everything else never matches.
fn typed_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => false,
    }
}

/// Datasource types assumed to speak PromQL.
const PROMQL_COMPATIBLE: &[&str] = &["prometheus", "victoriametrics", "thanos"];

/// Built-in step: fail unless the named metric has at least one series
/// in the schema's datasource.
pub struct ValidateMetricExists {
    metrics: Arc<dyn MetricsQuerier>,
}

impl ValidateMetricExists {
    pub fn new(metrics: Arc<dyn MetricsQuerier>) -> Self {
        Self { metrics }
    }
}

#[async_trait::async_trait]
impl StepRunner for ValidateMetricExists {
    async fn run(
        &self,
        datasource: Option<&Datasource>,
        parameters: &Value,
        step_parameters: &serde_json::Map<String, Value>,
    ) -> Result<(), StepError> {
        let datasource = datasource.ok_or_else(|| {
            StepError::Failed("datasource configuration is required for metric validation".into())
        })?;
        if !PROMQL_COMPATIBLE.contains(&datasource.kind.as_str()) {
            return Err(StepError::Failed(format!(
                "unsupported datasource type for metric validation: {}",
                datasource.kind
            )));
        }

        let metric_template = step_parameters
            .get("metric_name")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if metric_template.is_empty() {
            return Err(StepError::Failed("metric_name is required".into()));
        }

        let metric_name = render::render_str(metric_template, parameters)
            .map_err(|e| StepError::Failed(format!("failed to render metric_name: {e}")))?;

        let query = format!("count({{__name__={metric_name:?}}})");
        let count = self.metrics.series_count(&datasource.url, &query).await?;
        if count == 0 {
            return Err(StepError::Failed(format!("metric '{metric_name}' not found")));
        }
        Ok(())
    }
}
