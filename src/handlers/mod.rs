pub mod projects;

use axum::Json;
use serde_json::Value;

/// Missing or malformed JSON bodies are treated as an empty object, so the
/// validation layers report their own errors (401/400) instead of a
/// framework-level body rejection.
pub(crate) fn payload_or_empty(body: Option<Json<Value>>) -> Value {
    body.map(|Json(value)| value)
        .unwrap_or_else(|| Value::Object(Default::default()))
}
