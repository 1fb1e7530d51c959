//! Template and schema management endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use rulegen_engine::render;
use rulegen_store::NamedSchema;

use crate::api::{engine_error, store_error};
use crate::state::AppState;

/// Only draft-07 schemas are accepted; documents without a `$schema`
/// marker are stamped with it before storage.
const SUPPORTED_SCHEMA: &str = "http://json-schema.org/draft-07/schema";

// ── Types ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateSchemaBody {
    pub name: String,
    pub content: Value,
}

#[derive(Debug, Deserialize)]
pub struct CreateTemplateBody {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub content: Value,
}

#[derive(Debug, Serialize)]
pub struct TemplateContentResponse {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidateTemplateBody {
    #[serde(rename = "templateContent")]
    pub template_content: String,
    pub parameters: Value,
}

#[derive(Debug, Serialize)]
pub struct ValidateTemplateResponse {
    pub result: String,
}

// ── Endpoints ────────────────────────────────────────────────────────

/// Create or overwrite a schema, enforcing the supported draft.
pub(crate) async fn create_schema(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateSchemaBody>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut content = match body.content {
        Value::Object(map) => map,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                "schema content must be a JSON object".to_string(),
            ))
        }
    };

    match content.get("$schema") {
        Some(Value::String(version)) if version == SUPPORTED_SCHEMA => {}
        Some(Value::String(_)) => {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("unsupported schema version. Only {SUPPORTED_SCHEMA} is supported."),
            ))
        }
        Some(_) => {
            return Err((
                StatusCode::BAD_REQUEST,
                "$schema must be a string".to_string(),
            ))
        }
        None => {
            content.insert(
                "$schema".to_string(),
                Value::String(SUPPORTED_SCHEMA.to_string()),
            );
        }
    }

    let serialized = serde_json::to_string_pretty(&Value::Object(content))
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    state
        .templates
        .create_schema(&body.name, &serialized)
        .await
        .map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn get_schema(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ContentResponse>, (StatusCode, String)> {
    let schema = state
        .templates
        .get_schema(&name)
        .await
        .map_err(store_error)?;
    let content: Value = serde_json::from_str(&schema)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(ContentResponse { content }))
}

pub(crate) async fn delete_schema(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .templates
        .delete_schema(&name)
        .await
        .map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create or overwrite a render template after a syntax check.
pub(crate) async fn create_template(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTemplateBody>,
) -> Result<StatusCode, (StatusCode, String)> {
    render::validate_syntax(&body.content)
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("invalid template: {e}")))?;

    state
        .templates
        .create_template(&body.name, &body.content)
        .await
        .map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn get_template(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<TemplateContentResponse>, (StatusCode, String)> {
    let content = state
        .templates
        .get_template(&name)
        .await
        .map_err(store_error)?;
    Ok(Json(TemplateContentResponse { content }))
}

pub(crate) async fn delete_template(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .templates
        .delete_template(&name)
        .await
        .map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn list_schemas(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NamedSchema>>, (StatusCode, String)> {
    let schemas = state.templates.list_schemas().await.map_err(store_error)?;
    Ok(Json(schemas))
}

/// Render a candidate template against sample parameters and validate
/// the generated rule content.
pub(crate) async fn validate_template(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ValidateTemplateBody>,
) -> Result<Json<ValidateTemplateResponse>, (StatusCode, String)> {
    let result = state
        .service
        .validate_template(&body.template_content, &body.parameters)
        .await
        .map_err(engine_error)?;
    Ok(Json(ValidateTemplateResponse { result }))
}
