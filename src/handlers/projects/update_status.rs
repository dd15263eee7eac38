use axum::{extract::Path, Json};
use serde_json::{json, Value};

use crate::auth::CallerIdentity;
use crate::database::models::project::ProjectDto;
use crate::error::ApiError;
use crate::handlers::payload_or_empty;
use crate::services::project_service;
use crate::types::ProjectStatus;

/// PATCH /api/projects/:id/status - flip a project's lifecycle status
///
/// Body: { "auth": {...}, "status": "ONGOING" | "COMPLETED" }.
/// Owner or admin only.
pub async fn status_patch(
    Path(project_id): Path<i32>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let payload = payload_or_empty(body);
    let identity = CallerIdentity::from_payload(&payload)?;

    let status = payload
        .get("status")
        .and_then(Value::as_str)
        .map(str::trim)
        .and_then(ProjectStatus::parse)
        .ok_or_else(|| ApiError::bad_request("Invalid status"))?;

    let project =
        project_service::update_project_status(&identity, project_id, status).await?;

    Ok(Json(json!({ "ok": true, "item": ProjectDto::from(project) })))
}
