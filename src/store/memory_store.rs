use async_trait::async_trait;
use bson::oid::ObjectId;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::models::{Issue, IssueFilter, IssueUpdate, NewIssue};
use crate::store::IssueStore;

/// In-memory issue store for tests and local runs
#[derive(Clone, Default)]
pub struct InMemoryIssueStore {
    issues: Arc<RwLock<Vec<Issue>>>,
}

impl InMemoryIssueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.issues.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.issues.read().await.is_empty()
    }
}

#[async_trait]
impl IssueStore for InMemoryIssueStore {
    async fn insert(&self, issue: NewIssue) -> AppResult<Issue> {
        let issue = issue.into_issue(ObjectId::new().to_hex());
        self.issues.write().await.push(issue.clone());
        Ok(issue)
    }

    async fn find_many(&self, filter: &IssueFilter) -> AppResult<Vec<Issue>> {
        let issues = self.issues.read().await;
        Ok(issues
            .iter()
            .filter(|issue| filter.matches(issue))
            .cloned()
            .collect())
    }

    async fn find_one(&self, id: &str) -> AppResult<Option<Issue>> {
        let issues = self.issues.read().await;
        Ok(issues.iter().find(|issue| issue.id == id).cloned())
    }

    async fn update_fields(
        &self,
        id: &str,
        update: &IssueUpdate,
        updated_on: OffsetDateTime,
    ) -> AppResult<bool> {
        let mut issues = self.issues.write().await;
        match issues.iter_mut().find(|issue| issue.id == id) {
            Some(issue) => {
                update.apply_to(issue, updated_on);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_one(&self, id: &str) -> AppResult<u64> {
        let mut issues = self.issues.write().await;
        let before = issues.len();
        issues.retain(|issue| issue.id != id);
        Ok((before - issues.len()) as u64)
    }
}
