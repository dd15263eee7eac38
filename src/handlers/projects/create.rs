use axum::Json;
use serde_json::{json, Value};

use crate::auth::CallerIdentity;
use crate::database::models::project::ProjectDto;
use crate::error::ApiError;
use crate::handlers::payload_or_empty;
use crate::services::project_service;

/// POST /api/projects - create a project owned by the caller
///
/// Body: { "auth": {...}, "project_name": "...", "description"?: "..." }.
/// Success is reported with 200, not 201, for compatibility with the
/// existing frontend client.
pub async fn create_post(body: Option<Json<Value>>) -> Result<Json<Value>, ApiError> {
    let payload = payload_or_empty(body);
    let identity = CallerIdentity::from_payload(&payload)?;

    let project_name = payload
        .get("project_name")
        .and_then(Value::as_str)
        .unwrap_or("");
    let description = payload.get("description").and_then(Value::as_str);

    let project = project_service::create_project(&identity, project_name, description).await?;

    Ok(Json(json!({ "ok": true, "item": ProjectDto::from(project) })))
}
