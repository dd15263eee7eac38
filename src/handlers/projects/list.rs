use axum::Json;
use serde_json::{json, Value};

use crate::auth::CallerIdentity;
use crate::database::models::project::ProjectDto;
use crate::error::ApiError;
use crate::handlers::payload_or_empty;
use crate::services::project_service::{self, ListFilters};

/// POST /api/projects/list - list projects visible to the caller
///
/// Body: { "auth": {...}, "filters": { "status"?, "user_id"? } }.
/// The user_id filter is admin-only; non-admins always get their own rows.
pub async fn list_post(body: Option<Json<Value>>) -> Result<Json<Value>, ApiError> {
    let payload = payload_or_empty(body);
    let identity = CallerIdentity::from_payload(&payload)?;
    let filters = ListFilters::from_payload(&payload);

    let items: Vec<ProjectDto> = project_service::list_projects(&identity, &filters)
        .await?
        .into_iter()
        .map(ProjectDto::from)
        .collect();

    Ok(Json(json!({ "ok": true, "items": items })))
}
