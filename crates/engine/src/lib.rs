//! Rule generation and validation engine.
//!
//! This crate provides:
//! - JSON-Schema parameter validation with human-readable violations
//! - Declarative pipeline execution with conditional steps and a
//!   registry of step runners (`validate_metric_exists` built in)
//! - Template rendering via minijinja (strict undefined access)
//! - Uniqueness-based change planning (create / update / conflict)
//! - Aggregation of all persisted rules into one grouped document
//! - Dynamic form-field option resolution against the metrics backend
//! - Directory-based template seeding

pub mod aggregate;
pub mod content;
pub mod error;
pub mod options;
pub mod pipeline;
pub mod plan;
pub mod render;
pub mod schema_meta;
pub mod seeder;
pub mod service;
pub mod validator;

pub use error::{EngineError, RenderError, StepError};
pub use pipeline::{PipelineProcessor, StepRunner};
pub use plan::{PlanAction, RulePlan};
pub use schema_meta::{Datasource, PipelineStep, SchemaMeta, StepCondition};
pub use service::RuleService;
