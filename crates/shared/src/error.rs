use std::fmt;

use serde_json::Value;

/// Best-effort reading of a non-success response body, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// `{"detail": ...}` as produced by the framework's HTTP errors.
    Detail(String),
    /// `{"message": [...], "data": null}` from request validation failures.
    Validation(Vec<String>),
    /// `{"error": "..."}` returned by handlers that reject input.
    Error(String),
    Raw(String),
    Empty,
}

impl ServerMessage {
    pub fn from_body(body: &str) -> Self {
        let body = body.trim();
        if body.is_empty() {
            return Self::Empty;
        }

        let Ok(Value::Object(object)) = serde_json::from_str::<Value>(body) else {
            return Self::Raw(body.to_string());
        };

        if let Some(detail) = object.get("detail") {
            return Self::Detail(value_text(detail));
        }
        match object.get("message") {
            Some(Value::Array(items)) => {
                return Self::Validation(items.iter().map(value_text).collect());
            }
            Some(message) => return Self::Validation(vec![value_text(message)]),
            None => {}
        }
        if let Some(error) = object.get("error") {
            return Self::Error(value_text(error));
        }

        Self::Raw(body.to_string())
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detail(detail) => write!(f, "detail: {detail}"),
            Self::Validation(messages) => write!(f, "validation: {}", messages.join("; ")),
            Self::Error(error) => write!(f, "error: {error}"),
            Self::Raw(body) => f.write_str(body),
            Self::Empty => f.write_str("empty body"),
        }
    }
}
