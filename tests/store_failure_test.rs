mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use issue_tracker::state::AppState;
use serde_json::json;

use common::{test_config, test_server, FailingIssueStore};

const ISSUES: &str = "/api/issues/apitest";
const ISSUE_ID: &str = "5f665eb46e296f6b9b6a504d";

fn failing_server() -> TestServer {
    test_server(AppState::with_store(
        test_config(),
        Arc::new(FailingIssueStore),
    ))
}

#[tokio::test]
async fn test_list_store_failure_is_server_error() {
    let server = failing_server();

    let response = server.get(ISSUES).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({ "error": "Database error" }));
}

#[tokio::test]
async fn test_create_store_failure_is_server_error() {
    let server = failing_server();

    let response = server
        .post(ISSUES)
        .json(&json!({
            "issue_title": "T",
            "issue_text": "X",
            "created_by": "Me"
        }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({ "error": "Database error" }));
}

#[tokio::test]
async fn test_create_validation_runs_before_store() {
    let server = failing_server();

    let response = server
        .post(ISSUES)
        .json(&json!({ "issue_title": "T" }))
        .await;

    response.assert_status(StatusCode::OK);
    response.assert_json(&json!({ "error": "required field(s) missing" }));
}

#[tokio::test]
async fn test_update_store_failure_could_not_update() {
    let server = failing_server();

    let response = server
        .put(ISSUES)
        .json(&json!({ "_id": ISSUE_ID, "status_text": "Pending" }))
        .await;

    response.assert_status(StatusCode::OK);
    response.assert_json(&json!({ "error": "could not update", "_id": ISSUE_ID }));
}

#[tokio::test]
async fn test_update_checks_fields_before_store() {
    let server = failing_server();

    let response = server.put(ISSUES).json(&json!({ "_id": ISSUE_ID })).await;

    response.assert_json(&json!({ "error": "no update field(s) sent", "_id": ISSUE_ID }));
}

#[tokio::test]
async fn test_delete_store_failure_could_not_delete() {
    let server = failing_server();

    let response = server
        .delete(ISSUES)
        .json(&json!({ "_id": ISSUE_ID }))
        .await;

    response.assert_status(StatusCode::OK);
    response.assert_json(&json!({ "error": "could not delete", "_id": ISSUE_ID }));
}
