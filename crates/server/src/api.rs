//! Shared handler plumbing: error-to-status mapping and health.

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use rulegen_engine::EngineError;
use rulegen_store::StoreError;

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
}

pub(crate) async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Map an engine error onto an HTTP status with its message.
///
/// Validation, pipeline, and render failures are caller errors; store
/// misses are 404; everything else (unreachable collaborators and the
/// like) is a 500.
pub(crate) fn engine_error(err: EngineError) -> (StatusCode, String) {
    let status = match &err {
        EngineError::Validation(_)
        | EngineError::Schema(_)
        | EngineError::UnknownStepType(_)
        | EngineError::Pipeline { .. }
        | EngineError::ItemPipeline { .. }
        | EngineError::Render(_)
        | EngineError::Content(_) => StatusCode::BAD_REQUEST,
        EngineError::FieldNotFound(_) | EngineError::NoDynamicOptions(_) => StatusCode::NOT_FOUND,
        EngineError::Store(store_err) => return store_error_status(store_err, err.to_string()),
        EngineError::Metrics(_) | EngineError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

pub(crate) fn store_error(err: StoreError) -> (StatusCode, String) {
    let message = err.to_string();
    store_error_status(&err, message)
}

fn store_error_status(err: &StoreError, message: String) -> (StatusCode, String) {
    let status = match err {
        StoreError::SchemaNotFound(_)
        | StoreError::TemplateNotFound(_)
        | StoreError::RuleNotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, message)
}
