use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use utoipa::openapi::schema::{ObjectBuilder, OneOfBuilder, Type};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult, IssueError};
use crate::handlers::{IssueBody, Supplied};
use crate::models::{next_updated_on, timestamp_now, Issue, IssueFilter, IssueUpdate, NewIssue};
use crate::state::AppState;

// ============ Request/Response DTOs ============

/// Query filters for listing issues (documentation only; unknown keys are ignored)
#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IssueQuery {
    #[param(rename = "_id")]
    pub id: Option<String>,
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    /// "true" or "false"
    pub open: Option<String>,
    /// RFC 3339 timestamp
    pub created_on: Option<String>,
    /// RFC 3339 timestamp
    pub updated_on: Option<String>,
}

/// `open` as it may arrive: a JSON boolean or a form string
fn open_schema() -> OneOfBuilder {
    OneOfBuilder::new()
        .item(ObjectBuilder::new().schema_type(Type::Boolean))
        .item(
            ObjectBuilder::new()
                .schema_type(Type::String)
                .enum_values(Some(["true", "false", "1", "0", "yes", "no"])),
        )
}

#[derive(Debug, Default, ToSchema)]
pub struct CreateIssueRequest {
    #[schema(value_type = Option<String>)]
    pub issue_title: Supplied<String>,
    #[schema(value_type = Option<String>)]
    pub issue_text: Supplied<String>,
    #[schema(value_type = Option<String>)]
    pub created_by: Supplied<String>,
    #[schema(value_type = Option<String>)]
    pub assigned_to: Supplied<String>,
    #[schema(value_type = Option<String>)]
    pub status_text: Supplied<String>,
}

impl From<&IssueBody> for CreateIssueRequest {
    fn from(body: &IssueBody) -> Self {
        Self {
            issue_title: body.text("issue_title"),
            issue_text: body.text("issue_text"),
            created_by: body.text("created_by"),
            assigned_to: body.text("assigned_to"),
            status_text: body.text("status_text"),
        }
    }
}

impl CreateIssueRequest {
    /// Validate the required fields and build the record to persist
    pub fn into_new_issue(self, project: String) -> AppResult<NewIssue> {
        if self.issue_title.is_absent()
            || self.issue_text.is_absent()
            || self.created_by.is_absent()
        {
            return Err(IssueError::RequiredFieldsMissing.into());
        }

        let (Some(issue_title), Some(issue_text), Some(created_by)) = (
            text_field(self.issue_title, "issue_title")?,
            text_field(self.issue_text, "issue_text")?,
            text_field(self.created_by, "created_by")?,
        ) else {
            return Err(IssueError::RequiredFieldsMissing.into());
        };
        let assigned_to = text_field(self.assigned_to, "assigned_to")?;
        let status_text = text_field(self.status_text, "status_text")?;

        Ok(NewIssue::new(
            project,
            issue_title,
            issue_text,
            created_by,
            assigned_to,
            status_text,
            timestamp_now(),
        ))
    }
}

fn text_field(field: Supplied<String>, key: &str) -> AppResult<Option<String>> {
    field
        .cast()
        .ok_or_else(|| AppError::Validation(format!("{} must be text", key)))
}

/// Fields to update. The id may also be sent as `id`.
#[derive(Debug, Default, ToSchema)]
pub struct UpdateIssueRequest {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    #[schema(value_type = Option<String>)]
    pub issue_title: Supplied<String>,
    #[schema(value_type = Option<String>)]
    pub issue_text: Supplied<String>,
    #[schema(value_type = Option<String>)]
    pub created_by: Supplied<String>,
    #[schema(value_type = Option<String>)]
    pub assigned_to: Supplied<String>,
    #[schema(value_type = Option<String>)]
    pub status_text: Supplied<String>,
    #[schema(schema_with = open_schema, required = false)]
    pub open: Supplied<bool>,
}

impl From<&IssueBody> for UpdateIssueRequest {
    fn from(body: &IssueBody) -> Self {
        Self {
            id: body.id(),
            issue_title: body.text("issue_title"),
            issue_text: body.text("issue_text"),
            created_by: body.text("created_by"),
            assigned_to: body.text("assigned_to"),
            status_text: body.text("status_text"),
            open: body.open(),
        }
    }
}

impl UpdateIssueRequest {
    /// No field besides the id was sent with a truthy value
    pub fn is_empty(&self) -> bool {
        self.issue_title.is_absent()
            && self.issue_text.is_absent()
            && self.created_by.is_absent()
            && self.assigned_to.is_absent()
            && self.status_text.is_absent()
            && self.open.is_absent()
    }

    /// The partial update, or `None` when a field does not cast to its type
    pub fn into_update(self) -> Option<IssueUpdate> {
        Some(IssueUpdate {
            issue_title: self.issue_title.cast()?,
            issue_text: self.issue_text.cast()?,
            created_by: self.created_by.cast()?,
            assigned_to: self.assigned_to.cast()?,
            status_text: self.status_text.cast()?,
            open: self.open.cast()?,
        })
    }
}

/// The id may also be sent as `id`.
#[derive(Debug, Default, ToSchema)]
pub struct DeleteIssueRequest {
    #[serde(rename = "_id")]
    pub id: Option<String>,
}

/// Success body for update and delete
#[derive(Debug, Serialize, ToSchema)]
pub struct IssueResult {
    pub result: String,
    #[serde(rename = "_id")]
    pub id: String,
}

impl IssueResult {
    fn updated(id: String) -> Self {
        Self {
            result: "successfully updated".to_string(),
            id,
        }
    }

    fn deleted(id: String) -> Self {
        Self {
            result: "successfully deleted".to_string(),
            id,
        }
    }
}

// ============ Handlers ============

/// List the issues of a project, optionally filtered by field values
#[utoipa::path(
    get,
    path = "/api/issues/{project}",
    params(
        ("project" = String, Path, description = "Project name"),
        IssueQuery
    ),
    responses(
        (status = 200, description = "Matching issues", body = Vec<Issue>),
        (status = 400, description = "Malformed filter value")
    ),
    tag = "Issues"
)]
pub async fn list_issues(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<Vec<Issue>>> {
    let filter = IssueFilter::from_query(project, &params)?;

    let issues = state.issues.find_many(&filter).await?;
    tracing::debug!(project = %filter.project, count = issues.len(), "Issues listed");

    Ok(Json(issues))
}

/// Create a new issue in a project
#[utoipa::path(
    post,
    path = "/api/issues/{project}",
    params(
        ("project" = String, Path, description = "Project name")
    ),
    request_body = CreateIssueRequest,
    responses(
        (status = 200, description = "The created issue, or {error: \"required field(s) missing\"}", body = Issue),
        (status = 400, description = "A field is not text")
    ),
    tag = "Issues"
)]
pub async fn create_issue(
    State(state): State<AppState>,
    Path(project): Path<String>,
    body: IssueBody,
) -> AppResult<Json<Issue>> {
    let new_issue = CreateIssueRequest::from(&body).into_new_issue(project)?;

    let issue = state.issues.insert(new_issue).await?;
    tracing::info!(issue_id = %issue.id, project = %issue.project, "Issue created");

    Ok(Json(issue))
}

/// Update the supplied fields of an issue
///
/// Fields sent empty (or `open: false`) are treated as not sent. A field
/// that does not cast to its type fails the update.
#[utoipa::path(
    put,
    path = "/api/issues/{project}",
    params(
        ("project" = String, Path, description = "Project name")
    ),
    request_body = UpdateIssueRequest,
    responses(
        (status = 200, description = "{result: \"successfully updated\", _id} or an {error, _id} body", body = IssueResult)
    ),
    tag = "Issues"
)]
pub async fn update_issue(
    State(state): State<AppState>,
    Path(_project): Path<String>,
    body: IssueBody,
) -> AppResult<Json<IssueResult>> {
    let mut payload = UpdateIssueRequest::from(&body);
    let id = payload.id.take().ok_or(IssueError::MissingId)?;

    if payload.is_empty() {
        return Err(IssueError::NoUpdateFields(id).into());
    }
    let Some(update) = payload.into_update() else {
        tracing::info!(issue_id = %id, "Update field does not cast to its type");
        return Err(IssueError::CouldNotUpdate(id).into());
    };

    let existing = match state.issues.find_one(&id).await {
        Ok(Some(issue)) => issue,
        Ok(None) => {
            tracing::info!(issue_id = %id, "Issue to update not found");
            return Err(IssueError::CouldNotUpdate(id).into());
        }
        Err(e) => {
            tracing::warn!(issue_id = %id, error = %e, "Issue lookup failed");
            return Err(IssueError::CouldNotUpdate(id).into());
        }
    };

    let updated_on = next_updated_on(existing.updated_on);
    match state.issues.update_fields(&id, &update, updated_on).await {
        Ok(true) => {
            tracing::info!(issue_id = %id, "Issue updated");
            Ok(Json(IssueResult::updated(id)))
        }
        Ok(false) => {
            tracing::info!(issue_id = %id, "Issue vanished before update");
            Err(IssueError::CouldNotUpdate(id).into())
        }
        Err(e) => {
            tracing::warn!(issue_id = %id, error = %e, "Issue update failed");
            Err(IssueError::CouldNotUpdate(id).into())
        }
    }
}

/// Delete an issue by id
#[utoipa::path(
    delete,
    path = "/api/issues/{project}",
    params(
        ("project" = String, Path, description = "Project name")
    ),
    request_body = DeleteIssueRequest,
    responses(
        (status = 200, description = "{result: \"successfully deleted\", _id} or an {error, _id} body", body = IssueResult)
    ),
    tag = "Issues"
)]
pub async fn delete_issue(
    State(state): State<AppState>,
    Path(_project): Path<String>,
    body: IssueBody,
) -> AppResult<Json<IssueResult>> {
    let id = body.id().ok_or(IssueError::MissingId)?;

    match state.issues.delete_one(&id).await {
        Ok(1) => {
            tracing::info!(issue_id = %id, "Issue deleted");
            Ok(Json(IssueResult::deleted(id)))
        }
        Ok(_) => {
            tracing::info!(issue_id = %id, "Issue to delete not found");
            Err(IssueError::CouldNotDelete(id).into())
        }
        Err(e) => {
            tracing::warn!(issue_id = %id, error = %e, "Issue delete failed");
            Err(IssueError::CouldNotDelete(id).into())
        }
    }
}
