pub mod memory_store;
pub mod mongo_store;

pub use memory_store::InMemoryIssueStore;
pub use mongo_store::MongoIssueStore;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::error::AppResult;
use crate::models::{Issue, IssueFilter, IssueUpdate, NewIssue};

/// Document store holding the issue collection.
///
/// Each call is independent; concurrent updates to one record are not
/// coordinated and the last write wins.
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// Persist a new issue and return it with its assigned id
    async fn insert(&self, issue: NewIssue) -> AppResult<Issue>;

    /// All issues matching every term of the filter
    async fn find_many(&self, filter: &IssueFilter) -> AppResult<Vec<Issue>>;

    /// Get issue by ID
    async fn find_one(&self, id: &str) -> AppResult<Option<Issue>>;

    /// Overwrite the supplied fields; returns whether a record matched
    async fn update_fields(
        &self,
        id: &str,
        update: &IssueUpdate,
        updated_on: OffsetDateTime,
    ) -> AppResult<bool>;

    /// Delete by ID; returns the number of records removed (0 or 1)
    async fn delete_one(&self, id: &str) -> AppResult<u64>;
}
