// Library crate for the issue tracker
// Exports modules for use by the server binary and tests

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod state;
pub mod store;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{create_issue, delete_issue, list_issues, update_issue};
use crate::state::AppState;

/// Build the application router with the given state
pub fn build_router(state: AppState) -> Router {
    let issue_routes = get(list_issues)
        .post(create_issue)
        .put(update_issue)
        .delete(delete_issue);

    Router::new()
        .route("/", get(|| async { "Issue Tracker" }))
        // Issue routes (with and without the trailing slash)
        .route("/api/issues/{project}", issue_routes.clone())
        .route("/api/issues/{project}/", issue_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
