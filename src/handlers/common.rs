use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Form, FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde_json::{Map, Value};

use crate::error::AppError;

/// Request body as a loose field map, from JSON or an HTML form.
///
/// An empty body yields an empty map so missing-field checks answer
/// with the contract error instead of a rejection.
#[derive(Debug, Default, Clone)]
pub struct IssueBody(pub Map<String, Value>);

impl<S> FromRequest<S> for IssueBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            return Ok(Self(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect(),
            ));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        match serde_json::from_slice(&bytes) {
            Ok(Value::Object(fields)) => Ok(Self(fields)),
            Ok(_) => Err(AppError::Validation(
                "Request body must be a JSON object".to_string(),
            )),
            Err(e) => Err(AppError::Validation(format!("Invalid JSON body: {}", e))),
        }
    }
}

/// A body field after the truthiness check and the cast to its type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Supplied<T> {
    /// Missing or falsy (`""`, `0`, `false`, `null`)
    #[default]
    Absent,
    Value(T),
    /// Truthy, but not castable to the field type
    Uncastable,
}

impl<T> Supplied<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_uncastable(&self) -> bool {
        matches!(self, Self::Uncastable)
    }

    /// `None` when the value could not be cast, otherwise the optional value
    pub fn cast(self) -> Option<Option<T>> {
        match self {
            Self::Absent => Some(None),
            Self::Value(value) => Some(Some(value)),
            Self::Uncastable => None,
        }
    }
}

impl IssueBody {
    /// A text field. Numbers and `true` are stringified; arrays and
    /// objects do not cast to text.
    pub fn text(&self, key: &str) -> Supplied<String> {
        let Some(value) = self.0.get(key) else {
            return Supplied::Absent;
        };

        match value {
            Value::String(s) if !s.is_empty() => Supplied::Value(s.clone()),
            Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => {
                Supplied::Value(n.to_string())
            }
            Value::Bool(true) => Supplied::Value("true".to_string()),
            Value::Array(_) | Value::Object(_) => Supplied::Uncastable,
            _ => Supplied::Absent,
        }
    }

    /// The issue id, sent as `_id` or `id`
    pub fn id(&self) -> Option<String> {
        match self.text("_id") {
            Supplied::Value(id) => Some(id),
            _ => match self.text("id") {
                Supplied::Value(id) => Some(id),
                _ => None,
            },
        }
    }

    /// The `open` flag.
    ///
    /// JSON `false` is falsy and therefore absent. Truthy values follow the
    /// boolean cast of the document mapper: `true`, `1`, `"true"`, `"1"`
    /// and `"yes"` are true; `"false"`, `"0"` and `"no"` are false.
    pub fn open(&self) -> Supplied<bool> {
        let Some(value) = self.0.get("open") else {
            return Supplied::Absent;
        };

        match value {
            Value::Bool(true) => Supplied::Value(true),
            Value::Number(n) => match n.as_f64() {
                Some(f) if f == 0.0 => Supplied::Absent,
                Some(f) if f == 1.0 => Supplied::Value(true),
                _ => Supplied::Uncastable,
            },
            Value::String(s) => match s.as_str() {
                "" => Supplied::Absent,
                "true" | "1" | "yes" => Supplied::Value(true),
                "false" | "0" | "no" => Supplied::Value(false),
                _ => Supplied::Uncastable,
            },
            Value::Array(_) | Value::Object(_) => Supplied::Uncastable,
            Value::Bool(false) | Value::Null => Supplied::Absent,
        }
    }
}
