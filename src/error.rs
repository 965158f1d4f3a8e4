use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that can be returned from handlers
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // Issue operation rejected with a contract body
    #[error(transparent)]
    Rejected(#[from] IssueError),
}

/// Logical failures of the issue operations.
///
/// These are answered with HTTP 200; the caller tells success from failure
/// by the presence of an `error` key instead of a `result` key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IssueError {
    #[error("required field(s) missing")]
    RequiredFieldsMissing,

    #[error("missing _id")]
    MissingId,

    #[error("no update field(s) sent")]
    NoUpdateFields(String),

    #[error("could not update")]
    CouldNotUpdate(String),

    #[error("could not delete")]
    CouldNotDelete(String),
}

impl IssueError {
    /// The issue id echoed back alongside the error, if any
    pub fn id(&self) -> Option<&str> {
        match self {
            IssueError::RequiredFieldsMissing | IssueError::MissingId => None,
            IssueError::NoUpdateFields(id)
            | IssueError::CouldNotUpdate(id)
            | IssueError::CouldNotDelete(id) => Some(id),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

/// Contract body for a rejected issue operation
#[derive(Serialize)]
struct IssueErrorBody<'a> {
    error: String,
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
}

impl IntoResponse for IssueError {
    fn into_response(self) -> Response {
        let body = Json(IssueErrorBody {
            error: self.to_string(),
            id: self.id(),
        });

        (StatusCode::OK, body).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match self {
            // 400 Bad Request
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "Validation error", Some(msg)),

            // 500 Internal Server Error
            AppError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error", None)
            }

            // 200 with an `error` body
            AppError::Rejected(err) => return err.into_response(),
        };

        let body = Json(ErrorResponse {
            error: error_message.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_error_messages() {
        assert_eq!(
            IssueError::RequiredFieldsMissing.to_string(),
            "required field(s) missing"
        );
        assert_eq!(IssueError::MissingId.to_string(), "missing _id");
        assert_eq!(
            IssueError::NoUpdateFields("abc".to_string()).to_string(),
            "no update field(s) sent"
        );
    }

    #[test]
    fn test_issue_error_id() {
        assert_eq!(IssueError::MissingId.id(), None);
        assert_eq!(
            IssueError::CouldNotDelete("abc".to_string()).id(),
            Some("abc")
        );
    }

    #[test]
    fn test_rejected_is_ok_status() {
        let response = AppError::from(IssueError::MissingId).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response = AppError::Validation("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
