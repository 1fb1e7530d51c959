//! HTTP router construction.
//!
//! Assembles all Axum routes and middleware into a single `Router`.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::AppState;
use crate::{api, feed, options, rules, templates};

/// Build the application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        // Rules. Static segments (search/feed/plan) must not be
        // captured by /{id}.
        .route("/api/v1/rules", post(rules::create_rule).get(rules::list_rules))
        .route("/api/v1/rules/search", get(rules::search_rules))
        .route("/api/v1/rules/feed", get(feed::get_feed))
        .route("/api/v1/rules/plan", post(rules::plan_create))
        .route(
            "/api/v1/rules/{id}",
            get(rules::get_rule)
                .put(rules::update_rule)
                .delete(rules::delete_rule),
        )
        .route("/api/v1/rules/{id}/plan", post(rules::plan_update))
        // Templates.
        .route("/api/v1/templates", get(templates::list_schemas))
        .route("/api/v1/templates/schemas", post(templates::create_schema))
        .route(
            "/api/v1/templates/schemas/{name}",
            get(templates::get_schema).delete(templates::delete_schema),
        )
        .route("/api/v1/templates/bodies", post(templates::create_template))
        .route(
            "/api/v1/templates/bodies/{name}",
            get(templates::get_template).delete(templates::delete_template),
        )
        .route("/api/v1/templates/validate", post(templates::validate_template))
        .route("/api/v1/templates/{name}/options", post(options::get_options))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
