use chrono::{NaiveDateTime, Utc};
use serde_json::Value;

use crate::auth::{coerce_int, CallerIdentity};
use crate::database::manager::DatabaseManager;
use crate::database::models::project::{NewProject, Project};
use crate::database::repository::ProjectRepository;
use crate::error::ApiError;
use crate::types::ProjectStatus;

/// Listing filters after coercion. `user_id` only ever takes effect for
/// admin callers; non-admins are pinned to their own rows regardless.
#[derive(Debug, Clone, Default)]
pub struct ListFilters {
    pub status: Option<ProjectStatus>,
    pub user_id: Option<i32>,
}

impl ListFilters {
    /// Read `filters` out of a request payload. A status value that is not
    /// exactly ONGOING/COMPLETED after trimming is ignored, as is a user_id
    /// that does not coerce to a non-zero integer.
    pub fn from_payload(payload: &Value) -> Self {
        let filters = payload.get("filters").unwrap_or(&Value::Null);

        let status = filters
            .get("status")
            .and_then(Value::as_str)
            .map(str::trim)
            .and_then(ProjectStatus::parse);

        let user_id = filters
            .get("user_id")
            .and_then(coerce_int)
            .filter(|id| *id != 0);

        Self { status, user_id }
    }
}

/// List projects visible to the caller, in response order.
pub async fn list_projects(
    identity: &CallerIdentity,
    filters: &ListFilters,
) -> Result<Vec<Project>, ApiError> {
    let owner_id = if identity.is_admin {
        filters.user_id
    } else {
        // Non-admins only ever see their own rows; a caller-supplied
        // user_id filter is ignored for them.
        Some(identity.user_id)
    };

    let repository = repository().await?;
    let rows = repository.list(owner_id, filters.status).await?;
    Ok(order_for_listing(rows))
}

/// Response order: the ongoing bucket (started_at desc) followed by the
/// completed bucket (ended_at desc). Rows missing the bucket timestamp sort
/// last within their bucket; ties keep fetch order (both sorts are stable).
pub fn order_for_listing(rows: Vec<Project>) -> Vec<Project> {
    let mut ongoing = Vec::new();
    let mut completed = Vec::new();

    for project in rows {
        match project.status() {
            Some(ProjectStatus::Ongoing) => ongoing.push(project),
            Some(ProjectStatus::Completed) => completed.push(project),
            None => {}
        }
    }

    ongoing.sort_by(|a, b| ts_or_min(b.started_at).cmp(&ts_or_min(a.started_at)));
    completed.sort_by(|a, b| ts_or_min(b.ended_at).cmp(&ts_or_min(a.ended_at)));

    ongoing.extend(completed);
    ongoing
}

fn ts_or_min(ts: Option<NaiveDateTime>) -> NaiveDateTime {
    ts.unwrap_or(NaiveDateTime::MIN)
}

/// Create a project owned by the caller. New projects always start ONGOING
/// with started_at = now and no end time.
pub async fn create_project(
    identity: &CallerIdentity,
    project_name: &str,
    description: Option<&str>,
) -> Result<Project, ApiError> {
    let project_name = project_name.trim();
    if project_name.is_empty() {
        return Err(ApiError::bad_request("project_name is required"));
    }

    let description = description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(String::from);

    let repository = repository().await?;
    let project = repository
        .insert(NewProject {
            user_id: identity.user_id,
            user_first_name: identity.first_name.clone(),
            user_last_name: identity.last_name.clone(),
            project_name: project_name.to_string(),
            description,
            started_at: utcnow(),
        })
        .await?;

    tracing::info!(project_id = project.id, user_id = identity.user_id, "project created");
    Ok(project)
}

/// Flip a project's status. Owner or admin only.
pub async fn update_project_status(
    identity: &CallerIdentity,
    project_id: i32,
    status: ProjectStatus,
) -> Result<Project, ApiError> {
    let repository = repository().await?;

    let project = repository
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    if !identity.is_admin && project.user_id != identity.user_id {
        return Err(ApiError::forbidden("Not allowed"));
    }

    let now = utcnow();
    let ended_at = next_ended_at(status, project.ended_at, now);
    let project = repository
        .update_status(project_id, status, ended_at, now)
        .await?;

    tracing::info!(project_id, status = %status, "project status updated");
    Ok(project)
}

/// End-time transition rule. Completing keeps an already-set end time
/// (re-completion is idempotent); reopening always clears it.
pub fn next_ended_at(
    target: ProjectStatus,
    current: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> Option<NaiveDateTime> {
    match target {
        ProjectStatus::Completed => current.or(Some(now)),
        ProjectStatus::Ongoing => None,
    }
}

async fn repository() -> Result<ProjectRepository, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(ProjectRepository::new(pool))
}

/// Naive UTC now, matching the TIMESTAMP (without time zone) columns.
fn utcnow() -> NaiveDateTime {
    Utc::now().naive_utc()
}
