use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::ProjectStatus;

/// A project row.
///
/// Timestamps are naive UTC, matching the TIMESTAMP (without time zone)
/// columns. `status` is kept as text in the row; `ProjectStatus` is the
/// validated vocabulary used everywhere input crosses the wire.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i32,
    pub user_id: i32,
    pub user_first_name: String,
    pub user_last_name: String,
    pub project_name: String,
    pub description: Option<String>,
    pub status: String,
    pub started_at: Option<NaiveDateTime>,
    pub ended_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Project {
    pub fn status(&self) -> Option<ProjectStatus> {
        ProjectStatus::parse(&self.status)
    }
}

/// Fields required to insert a new project. Ownership fields come from the
/// caller identity; status and ended_at are fixed by the lifecycle (new
/// projects always start ONGOING with no end time).
#[derive(Debug, Clone)]
pub struct NewProject {
    pub user_id: i32,
    pub user_first_name: String,
    pub user_last_name: String,
    pub project_name: String,
    pub description: Option<String>,
    pub started_at: NaiveDateTime,
}

/// Wire shape returned to clients. Bookkeeping timestamps stay internal;
/// the rest serializes as-is, with timestamps rendered as ISO-8601 or null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDto {
    pub id: i32,
    pub user_id: i32,
    pub user_first_name: String,
    pub user_last_name: String,
    pub project_name: String,
    pub description: Option<String>,
    pub status: String,
    pub started_at: Option<NaiveDateTime>,
    pub ended_at: Option<NaiveDateTime>,
}

impl From<Project> for ProjectDto {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            user_first_name: p.user_first_name,
            user_last_name: p.user_last_name,
            project_name: p.project_name,
            description: p.description,
            status: p.status,
            started_at: p.started_at,
            ended_at: p.ended_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn dto_serializes_timestamps_as_iso8601_or_null() {
        let started = NaiveDate::from_ymd_opt(2026, 8, 6)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let dto = ProjectDto {
            id: 1,
            user_id: 7,
            user_first_name: "Ada".into(),
            user_last_name: "Lovelace".into(),
            project_name: "engine".into(),
            description: None,
            status: "ONGOING".into(),
            started_at: Some(started),
            ended_at: None,
        };

        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["started_at"], "2026-08-06T10:30:00");
        assert_eq!(value["ended_at"], serde_json::Value::Null);
        assert_eq!(value["description"], serde_json::Value::Null);
    }
}
