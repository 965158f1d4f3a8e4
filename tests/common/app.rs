use std::sync::Arc;

use axum_test::TestServer;
use issue_tracker::build_router;
use issue_tracker::config::{Config, StoreBackend};
use issue_tracker::state::AppState;
use issue_tracker::store::InMemoryIssueStore;
use serde_json::Value;

/// Test configuration
pub fn test_config() -> Config {
    Config {
        store: StoreBackend::Memory,
        mongodb_url: None,
        mongodb_database: "issue_tracker_test".to_string(),
        mongodb_collection: "issues".to_string(),
        log_json: false,
        host: "127.0.0.1".to_string(),
        port: 0,
    }
}

/// Test server over the given state
pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(build_router(state)).expect("Failed to create test server")
}

/// Test application wrapper
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub store: InMemoryIssueStore,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        // Use InMemoryIssueStore for testing (avoids MongoDB dependency in tests)
        let store = InMemoryIssueStore::new();
        let state = AppState::with_store(test_config(), Arc::new(store.clone()));

        let server = test_server(state.clone());

        Self {
            server,
            state,
            store,
        }
    }

    /// A stored issue rendered as JSON, for field assertions
    pub async fn store_issue(&self, id: &str) -> Value {
        let issue = self
            .state
            .issues
            .find_one(id)
            .await
            .unwrap()
            .expect("Issue not found in store");

        serde_json::to_value(issue).unwrap()
    }
}
