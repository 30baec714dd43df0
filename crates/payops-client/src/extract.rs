//! Backend Error Extraction
//!
//! Non-2xx responses carry their message in one of three shapes: a
//! `detail` array of `{loc, msg}` validation entries, a flat
//! `detail`/`message`/`error` string, or nothing useful. Whatever comes
//! back, the caller gets a readable message, never a serialized blob.

use payops_core::{ConsoleError, FieldError};
use serde_json::Value;

const GENERIC_MESSAGE: &str = "An unexpected error occurred";

/// Drain a failed response into a `ConsoleError`
pub(crate) async fn error_from_response(response: reqwest::Response) -> ConsoleError {
    let status = response.status().as_u16();
    let url = response.url().clone();
    let body = response.text().await.unwrap_or_default();
    let error = error_from_parts(status, &body);
    tracing::warn!(%url, status, message = %error.user_message(), "backend request failed");
    error
}

/// Build a `ConsoleError` from a status code and raw body
pub fn error_from_parts(status: u16, body: &str) -> ConsoleError {
    let Ok(data) = serde_json::from_str::<Value>(body) else {
        return generic(status);
    };

    if let Some(detail) = data.get("detail") {
        if let Some(items) = detail.as_array() {
            let fields: Vec<FieldError> = items.iter().filter_map(field_error).collect();
            if !fields.is_empty() {
                return ConsoleError::Validation(fields);
            }

            let joined = items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; ");
            if !joined.is_empty() {
                return ConsoleError::Api { status, message: joined };
            }
        }

        if let Some(message) = detail.as_str() {
            return ConsoleError::Api { status, message: message.into() };
        }
    }

    for key in ["message", "error"] {
        if let Some(message) = data.get(key).and_then(Value::as_str) {
            return ConsoleError::Api { status, message: message.into() };
        }
    }

    generic(status)
}

fn generic(status: u16) -> ConsoleError {
    ConsoleError::Api {
        status,
        message: GENERIC_MESSAGE.into(),
    }
}

fn field_error(item: &Value) -> Option<FieldError> {
    let message = item.get("msg")?.as_str()?;
    let loc = item.get("loc")?.as_array()?;

    let mut parts: Vec<String> = loc
        .iter()
        .filter_map(|part| match part {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect();

    // FastAPI prefixes the request section ("body", "query", ...)
    if parts.len() > 1 && matches!(parts[0].as_str(), "body" | "query" | "path") {
        parts.remove(0);
    }

    if parts.is_empty() {
        return None;
    }

    Some(FieldError::new(parts.join("."), message))
}
