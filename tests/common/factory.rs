use issue_tracker::models::{timestamp_now, Issue, NewIssue};
use issue_tracker::state::AppState;

/// Factory for creating test data
pub struct Factory<'a> {
    state: &'a AppState,
}

#[allow(dead_code)]
impl<'a> Factory<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Create a test issue with only the required fields
    pub async fn create_issue(&self, project: &str) -> Issue {
        self.create_issue_with(project, "Test issue", "Someone", None)
            .await
    }

    /// Create a test issue with a specific author and assignee
    pub async fn create_issue_with(
        &self,
        project: &str,
        title: &str,
        created_by: &str,
        assigned_to: Option<&str>,
    ) -> Issue {
        let input = NewIssue::new(
            project.to_string(),
            title.to_string(),
            "Test issue text".to_string(),
            created_by.to_string(),
            assigned_to.map(str::to_string),
            None,
            timestamp_now(),
        );

        self.state.issues.insert(input).await.unwrap()
    }
}
