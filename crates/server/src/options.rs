//! Dynamic form-field option endpoint.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::engine_error;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OptionsBody {
    /// Dot-path of the schema field to resolve options for.
    pub field: String,
    /// The caller's current (partial) parameter state.
    #[serde(default, rename = "currentValues")]
    pub current_values: Value,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub options: Vec<String>,
}

/// Resolve a field's dynamic options by querying the schema's
/// datasource with the current parameter state substituted in.
pub(crate) async fn get_options(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(body): Json<OptionsBody>,
) -> Result<Json<OptionsResponse>, (StatusCode, String)> {
    let options = state
        .service
        .get_options(&name, &body.field, &body.current_values)
        .await
        .map_err(engine_error)?;
    Ok(Json(OptionsResponse { options }))
}
