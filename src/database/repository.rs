use chrono::NaiveDateTime;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::database::manager::DatabaseError;
use crate::database::models::project::{NewProject, Project};
use crate::types::ProjectStatus;

const COLUMNS: &str = "id, user_id, user_first_name, user_last_name, project_name, \
     description, status, started_at, ended_at, created_at, updated_at";

/// Data access for the projects table. One repository per request, borrowing
/// the shared pool; every method is a single awaited statement.
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch rows matching the visibility predicates. No ORDER BY: listing
    /// order is decided in the application layer.
    pub async fn list(
        &self,
        owner_id: Option<i32>,
        status: Option<ProjectStatus>,
    ) -> Result<Vec<Project>, DatabaseError> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM projects", COLUMNS));

        let mut separator = " WHERE ";
        if let Some(owner_id) = owner_id {
            query.push(separator).push("user_id = ").push_bind(owner_id);
            separator = " AND ";
        }
        if let Some(status) = status {
            query.push(separator).push("status = ").push_bind(status.as_str());
        }

        let rows = query
            .build_query_as::<Project>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Project>, DatabaseError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects WHERE id = $1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    pub async fn insert(&self, new_project: NewProject) -> Result<Project, DatabaseError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects \
                 (user_id, user_first_name, user_last_name, project_name, \
                  description, status, started_at, ended_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NULL) \
             RETURNING {}",
            COLUMNS
        ))
        .bind(new_project.user_id)
        .bind(&new_project.user_first_name)
        .bind(&new_project.user_last_name)
        .bind(&new_project.project_name)
        .bind(&new_project.description)
        .bind(ProjectStatus::Ongoing.as_str())
        .bind(new_project.started_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    /// Plain UPDATE, last-writer-wins: concurrent status updates race on
    /// whatever the transactional store serializes, with no version check.
    pub async fn update_status(
        &self,
        id: i32,
        status: ProjectStatus,
        ended_at: Option<NaiveDateTime>,
        updated_at: NaiveDateTime,
    ) -> Result<Project, DatabaseError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "UPDATE projects \
             SET status = $2, ended_at = $3, updated_at = $4 \
             WHERE id = $1 \
             RETURNING {}",
            COLUMNS
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(ended_at)
        .bind(updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }
}
