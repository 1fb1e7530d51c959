//! Aggregate feed endpoint for the downstream alert evaluator.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

use crate::api::store_error;
use crate::state::AppState;

/// All persisted rules are fetched in one page; the feed is a full
/// snapshot by design.
const FEED_PAGE_SIZE: usize = 10_000;

/// Render every persisted rule into one grouped YAML document.
/// Records that fail to render are skipped, never failing the feed.
pub(crate) async fn get_feed(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let records = state
        .rules
        .list_rules(0, FEED_PAGE_SIZE)
        .await
        .map_err(store_error)?;

    let document = state.service.generate_aggregate(&records).await;

    Ok((
        [(header::CONTENT_TYPE, "application/x-yaml")],
        document,
    ))
}
