//! Engine error taxonomy.
//!
//! Validation errors go back to the caller verbatim and are never
//! retried. Pipeline errors abort the submission and carry the step
//! name. Render errors abort a single artifact; the aggregator
//! downgrades them to a logged skip. Collaborator errors pass through
//! unchanged.

use rulegen_metrics::MetricsError;
use rulegen_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Parameters rejected by the template's schema; the message lists
    /// every violation.
    #[error("parameter validation failed: {0}")]
    Validation(String),

    /// The schema document itself could not be parsed or compiled.
    #[error("invalid schema document: {0}")]
    Schema(String),

    #[error("unknown pipeline step type: {0}")]
    UnknownStepType(String),

    #[error("pipeline step '{step}' failed: {message}")]
    Pipeline { step: String, message: String },

    #[error("pipeline failed for rule {index} ({rule_type}): {source}")]
    ItemPipeline {
        index: usize,
        rule_type: String,
        #[source]
        source: Box<EngineError>,
    },

    #[error(transparent)]
    Render(#[from] RenderError),

    /// A rendered body that does not form a structurally valid alert rule.
    #[error("invalid rule content: {0}")]
    Content(String),

    /// Dynamic options: the addressed schema field does not exist.
    #[error("field '{0}' not found in schema")]
    FieldNotFound(String),

    /// Dynamic options: the field exists but declares no option query.
    #[error("field '{0}' does not have dynamic options configured")]
    NoDynamicOptions(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Render failures, separately reportable from a template lookup miss
/// (which surfaces as `StoreError::TemplateNotFound`).
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template parse error: {0}")]
    Parse(String),

    #[error("template execution error: {0}")]
    Execution(String),
}

/// Error raised inside a pipeline step runner. The processor attributes
/// it to the step name before surfacing.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("{0}")]
    Failed(String),

    #[error("datasource error: {0}")]
    Metrics(#[from] MetricsError),
}
