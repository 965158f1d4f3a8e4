use std::sync::Arc;

use mongodb::Client as MongoClient;

use crate::config::{Config, StoreBackend};
use crate::store::{InMemoryIssueStore, IssueStore, MongoIssueStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Backing store for the issue collection
    pub issues: Arc<dyn IssueStore>,
}

impl AppState {
    /// Create a new AppState, connecting to the configured store
    pub async fn new(config: Config) -> Result<Self, AppStateError> {
        let issues: Arc<dyn IssueStore> = match config.store {
            StoreBackend::Mongo => {
                let url = config
                    .mongodb_url
                    .as_deref()
                    .ok_or_else(|| AppStateError::Mongo("MONGODB_URL is not set".to_string()))?;

                let mongo_client = MongoClient::with_uri_str(url)
                    .await
                    .map_err(|e| AppStateError::Mongo(e.to_string()))?;
                let db = mongo_client.database(&config.mongodb_database);

                Arc::new(MongoIssueStore::new(&db, &config.mongodb_collection))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory issue store; data is lost on restart");
                Arc::new(InMemoryIssueStore::new())
            }
        };

        Ok(Self { config, issues })
    }

    /// Create AppState with a custom store (for testing)
    pub fn with_store(config: Config, issues: Arc<dyn IssueStore>) -> Self {
        Self { config, issues }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("MongoDB connection error: {0}")]
    Mongo(String),
}
