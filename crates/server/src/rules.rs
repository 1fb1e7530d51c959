//! Rule CRUD, search, and plan endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use rulegen_core::document::deep_merge;
use rulegen_engine::RulePlan;
use rulegen_store::{RuleFilter, RuleRecord};

use crate::api::{engine_error, store_error};
use crate::state::AppState;

// ── Types ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateRuleBody {
    #[serde(rename = "templateName")]
    pub template_name: String,
    pub parameters: Value,
}

#[derive(Debug, Serialize)]
pub struct CreateRuleResponse {
    pub ids: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

#[derive(Debug, Deserialize)]
pub struct UpdateRuleBody {
    #[serde(default, rename = "templateName")]
    pub template_name: Option<String>,
    #[serde(default)]
    pub parameters: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct UpdateRuleResponse {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct PlanUpdateBody {
    #[serde(default, rename = "templateName")]
    pub template_name: Option<String>,
    #[serde(default)]
    pub parameters: Option<Value>,
}

// ── Endpoints ────────────────────────────────────────────────────────

/// Create one rule per item of the submission's `rules` array. Each
/// item is validated (schema + pipelines) and rendered before anything
/// is persisted.
pub(crate) async fn create_rule(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateRuleBody>,
) -> Result<(StatusCode, Json<CreateRuleResponse>), (StatusCode, String)> {
    let shared = body.parameters.as_object().cloned().ok_or((
        StatusCode::BAD_REQUEST,
        "parameters must be a JSON object".to_string(),
    ))?;
    if !shared.contains_key("target") {
        return Err((StatusCode::BAD_REQUEST, "'target' is required".to_string()));
    }

    let items = shared
        .get("rules")
        .and_then(Value::as_array)
        .cloned()
        .ok_or((
            StatusCode::BAD_REQUEST,
            "'rules' array is required. For a single rule, send an array with one element."
                .to_string(),
        ))?;
    if items.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "'rules' array cannot be empty".to_string(),
        ));
    }

    let mut created_ids = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        // One record per item: the shared fields minus the `rules`
        // array, plus this item as `rule`.
        let mut fields = shared.clone();
        fields.remove("rules");
        fields.insert("rule".to_string(), item.clone());
        let single = Value::Object(fields);

        state
            .service
            .validate_rule(&body.template_name, &single)
            .await
            .map_err(|e| {
                warn!(rule_index = index, template = %body.template_name, error = %e,
                      "create: validation failed");
                let (status, message) = engine_error(e);
                (status, format!("validation failed for rule {index}: {message}"))
            })?;

        // Prove renderability before persisting.
        state
            .service
            .generate_rule(&body.template_name, &single)
            .await
            .map_err(|e| {
                warn!(rule_index = index, template = %body.template_name, error = %e,
                      "create: generation failed");
                let (status, message) = engine_error(e);
                (status, format!("generation failed for rule {index}: {message}"))
            })?;

        let record = state
            .rules
            .create_rule(RuleRecord::new(&body.template_name, single))
            .await
            .map_err(store_error)?;
        created_ids.push(record.id);
    }

    info!(count = created_ids.len(), template = %body.template_name, "created rules");
    Ok((
        StatusCode::CREATED,
        Json(CreateRuleResponse {
            count: created_ids.len(),
            ids: created_ids,
        }),
    ))
}

pub(crate) async fn get_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RuleRecord>, (StatusCode, String)> {
    let rule = state.rules.get_rule(&id).await.map_err(store_error)?;
    Ok(Json(rule))
}

pub(crate) async fn list_rules(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<RuleRecord>>, (StatusCode, String)> {
    let rules = state
        .rules
        .list_rules(params.offset, params.limit)
        .await
        .map_err(store_error)?;
    Ok(Json(rules))
}

/// Update an existing rule, merging a possibly-partial parameter
/// document over the stored one.
pub(crate) async fn update_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateRuleBody>,
) -> Result<Json<UpdateRuleResponse>, (StatusCode, String)> {
    let existing = state.rules.get_rule(&id).await.map_err(store_error)?;

    let template_name = body
        .template_name
        .unwrap_or_else(|| existing.template_name.clone());

    let parameters = match body.parameters {
        Some(updates) => {
            let mut merged = existing.parameters.clone();
            deep_merge(&mut merged, updates);
            merged
        }
        None => existing.parameters.clone(),
    };

    state
        .service
        .validate_rule(&template_name, &parameters)
        .await
        .map_err(engine_error)?;
    state
        .service
        .generate_rule(&template_name, &parameters)
        .await
        .map_err(engine_error)?;

    let mut updated = existing;
    updated.template_name = template_name;
    updated.parameters = parameters;
    state
        .rules
        .update_rule(&id, updated)
        .await
        .map_err(store_error)?;

    Ok(Json(UpdateRuleResponse { id }))
}

pub(crate) async fn delete_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    state.rules.delete_rule(&id).await.map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Search rules by store field paths. `templateName` scopes to a
/// template; every other query parameter is a dot-path into the
/// parameter document (an optional `parameters.` prefix is accepted).
pub(crate) async fn search_rules(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<RuleRecord>>, (StatusCode, String)> {
    let mut filter = RuleFilter::default();
    for (key, value) in params {
        if key == "templateName" {
            filter.template_name = Some(value);
        } else {
            let path = key.strip_prefix("parameters.").unwrap_or(&key).to_string();
            filter.parameters.insert(path, value);
        }
    }

    let rules = state
        .rules
        .search_rules(&filter)
        .await
        .map_err(store_error)?;
    Ok(Json(rules))
}

/// Dry-run a creation: report create/update without persisting.
pub(crate) async fn plan_create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateRuleBody>,
) -> Result<Json<RulePlan>, (StatusCode, String)> {
    let plan = state
        .service
        .plan_rule_creation(&body.template_name, body.parameters)
        .await
        .map_err(engine_error)?;
    Ok(Json(plan))
}

/// Dry-run an update: report update/conflict without persisting.
pub(crate) async fn plan_update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<PlanUpdateBody>,
) -> Result<Json<RulePlan>, (StatusCode, String)> {
    let plan = state
        .service
        .plan_rule_update(&id, body.template_name.as_deref(), body.parameters)
        .await
        .map_err(engine_error)?;
    Ok(Json(plan))
}
