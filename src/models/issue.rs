use std::collections::HashMap;

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// A tracked issue, scoped to a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Issue {
    pub assigned_to: String,
    pub status_text: String,
    pub open: bool,
    #[serde(rename = "_id")]
    pub id: String,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_on: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub updated_on: OffsetDateTime,
    pub project: String,
}

/// Issue creation DTO (the store assigns the id)
#[derive(Debug, Clone)]
pub struct NewIssue {
    pub project: String,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
    pub open: bool,
    pub created_on: OffsetDateTime,
}

impl NewIssue {
    /// Build the record with its defaults; both timestamps are `now`
    pub fn new(
        project: String,
        issue_title: String,
        issue_text: String,
        created_by: String,
        assigned_to: Option<String>,
        status_text: Option<String>,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            project,
            issue_title,
            issue_text,
            created_by,
            assigned_to: assigned_to.unwrap_or_default(),
            status_text: status_text.unwrap_or_default(),
            open: true,
            created_on: now,
        }
    }

    /// Attach a store-assigned id
    pub fn into_issue(self, id: String) -> Issue {
        Issue {
            assigned_to: self.assigned_to,
            status_text: self.status_text,
            open: self.open,
            id,
            issue_title: self.issue_title,
            issue_text: self.issue_text,
            created_by: self.created_by,
            created_on: self.created_on,
            updated_on: self.created_on,
            project: self.project,
        }
    }
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueUpdate {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub open: Option<bool>,
}

impl IssueUpdate {
    pub fn is_empty(&self) -> bool {
        self.issue_title.is_none()
            && self.issue_text.is_none()
            && self.created_by.is_none()
            && self.assigned_to.is_none()
            && self.status_text.is_none()
            && self.open.is_none()
    }

    /// Overwrite the supplied fields and stamp `updated_on`
    pub fn apply_to(&self, issue: &mut Issue, updated_on: OffsetDateTime) {
        if let Some(value) = &self.issue_title {
            issue.issue_title = value.clone();
        }
        if let Some(value) = &self.issue_text {
            issue.issue_text = value.clone();
        }
        if let Some(value) = &self.created_by {
            issue.created_by = value.clone();
        }
        if let Some(value) = &self.assigned_to {
            issue.assigned_to = value.clone();
        }
        if let Some(value) = &self.status_text {
            issue.status_text = value.clone();
        }
        if let Some(open) = self.open {
            issue.open = open;
        }
        issue.updated_on = updated_on;
    }
}

/// Equality filters combined with AND; `project` always applies
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueFilter {
    pub project: String,
    pub id: Option<String>,
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub open: Option<bool>,
    pub created_on: Option<OffsetDateTime>,
    pub updated_on: Option<OffsetDateTime>,
}

impl IssueFilter {
    pub fn for_project(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            ..Default::default()
        }
    }

    /// Build a filter from raw query parameters. Unknown keys are ignored.
    pub fn from_query(
        project: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> AppResult<Self> {
        let mut filter = Self::for_project(project);

        for (key, value) in params {
            match key.as_str() {
                "_id" => {
                    ObjectId::parse_str(value).map_err(|_| {
                        AppError::Validation(format!("Invalid _id filter: {}", value))
                    })?;
                    filter.id = Some(value.clone());
                }
                "issue_title" => filter.issue_title = Some(value.clone()),
                "issue_text" => filter.issue_text = Some(value.clone()),
                "created_by" => filter.created_by = Some(value.clone()),
                "assigned_to" => filter.assigned_to = Some(value.clone()),
                "status_text" => filter.status_text = Some(value.clone()),
                "open" => filter.open = Some(parse_bool(value)?),
                "created_on" => filter.created_on = Some(parse_timestamp(key, value)?),
                "updated_on" => filter.updated_on = Some(parse_timestamp(key, value)?),
                _ => {}
            }
        }

        Ok(filter)
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        fn eq<T: PartialEq>(wanted: &Option<T>, actual: &T) -> bool {
            wanted.as_ref().is_none_or(|w| w == actual)
        }

        issue.project == self.project
            && eq(&self.id, &issue.id)
            && eq(&self.issue_title, &issue.issue_title)
            && eq(&self.issue_text, &issue.issue_text)
            && eq(&self.created_by, &issue.created_by)
            && eq(&self.assigned_to, &issue.assigned_to)
            && eq(&self.status_text, &issue.status_text)
            && eq(&self.open, &issue.open)
            && eq(&self.created_on, &issue.created_on)
            && eq(&self.updated_on, &issue.updated_on)
    }
}

fn parse_bool(value: &str) -> AppResult<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(AppError::Validation(format!(
            "Invalid open filter: {} (expected true or false)",
            value
        ))),
    }
}

fn parse_timestamp(key: &str, value: &str) -> AppResult<OffsetDateTime> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|_| AppError::Validation(format!("Invalid {} filter: {}", key, value)))
}

/// Current UTC time at the millisecond precision the store keeps
pub fn timestamp_now() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_millisecond(now.millisecond()).unwrap_or(now)
}

/// A fresh `updated_on` that is strictly after `previous`
pub fn next_updated_on(previous: OffsetDateTime) -> OffsetDateTime {
    let now = timestamp_now();
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}
