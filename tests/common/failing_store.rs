use async_trait::async_trait;
use time::OffsetDateTime;

use issue_tracker::error::{AppError, AppResult};
use issue_tracker::models::{Issue, IssueFilter, IssueUpdate, NewIssue};
use issue_tracker::store::IssueStore;

/// Store whose every call fails, as an unreachable database would
#[allow(dead_code)]
#[derive(Debug, Clone, Default)]
pub struct FailingIssueStore;

#[allow(dead_code)]
impl FailingIssueStore {
    fn unavailable<T>() -> AppResult<T> {
        Err(AppError::Database("connection refused".to_string()))
    }
}

#[async_trait]
impl IssueStore for FailingIssueStore {
    async fn insert(&self, _issue: NewIssue) -> AppResult<Issue> {
        Self::unavailable()
    }

    async fn find_many(&self, _filter: &IssueFilter) -> AppResult<Vec<Issue>> {
        Self::unavailable()
    }

    async fn find_one(&self, _id: &str) -> AppResult<Option<Issue>> {
        Self::unavailable()
    }

    async fn update_fields(
        &self,
        _id: &str,
        _update: &IssueUpdate,
        _updated_on: OffsetDateTime,
    ) -> AppResult<bool> {
        Self::unavailable()
    }

    async fn delete_one(&self, _id: &str) -> AppResult<u64> {
        Self::unavailable()
    }
}
