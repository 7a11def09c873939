//! Repository for the `projects` table.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;
use wr_core::custom_fields::CustomSchema;
use wr_core::types::DbId;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, name, custom_schema, created_at, updated_at";

/// Number of entities owned by a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectCounts {
    pub switches: i64,
    pub sfps: i64,
    pub ports: i64,
}

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// A missing `custom_schema` is stored as an empty schema.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, custom_schema)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let schema = input.custom_schema.clone().unwrap_or_default();
        sqlx::query_as::<_, Project>(&query)
            .bind(input.name.trim())
            .bind(Json(schema))
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project by its unique name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE name = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all projects ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY name ASC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Rename a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .fetch_optional(pool)
            .await
    }

    /// Replace the project's custom field schema.
    pub async fn update_custom_schema(
        pool: &PgPool,
        id: DbId,
        schema: &CustomSchema,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET custom_schema = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(Json(schema))
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a project. Switches, SFPs and ports cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count the switches, SFPs and ports owned by a project.
    pub async fn counts(pool: &PgPool, id: DbId) -> Result<ProjectCounts, sqlx::Error> {
        let row: (i64, i64, i64) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM switches WHERE project_id = $1),
                (SELECT COUNT(*) FROM sfps WHERE project_id = $1),
                (SELECT COUNT(*) FROM ports WHERE project_id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(ProjectCounts {
            switches: row.0,
            sfps: row.1,
            ports: row.2,
        })
    }
}
