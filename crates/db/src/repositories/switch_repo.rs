//! Repository for the `switches` table.

use sqlx::types::Json;
use sqlx::PgPool;
use wr_core::types::DbId;

use crate::models::switch::{Switch, SwitchInput};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, project_id, name, role, ip_address, mac, clock_source, \
    remarks, metadata, created_at, updated_at";

/// Provides CRUD operations for switches. Every lookup is scoped to a project.
pub struct SwitchRepo;

impl SwitchRepo {
    /// Insert a switch, or overwrite the existing one with the same name in
    /// the same project.
    pub async fn upsert(
        pool: &PgPool,
        project_id: DbId,
        input: &SwitchInput,
    ) -> Result<Switch, sqlx::Error> {
        let query = format!(
            "INSERT INTO switches
                (project_id, name, role, ip_address, mac, clock_source, remarks, metadata)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT ON CONSTRAINT uq_switches_project_name DO UPDATE SET
                role = EXCLUDED.role,
                ip_address = EXCLUDED.ip_address,
                mac = EXCLUDED.mac,
                clock_source = EXCLUDED.clock_source,
                remarks = EXCLUDED.remarks,
                metadata = EXCLUDED.metadata,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Switch>(&query)
            .bind(project_id)
            .bind(input.name.trim())
            .bind(&input.role)
            .bind(&input.ip_address)
            .bind(&input.mac)
            .bind(&input.clock_source)
            .bind(&input.remarks)
            .bind(Json(&input.metadata))
            .fetch_one(pool)
            .await
    }

    /// Find a switch by ID within a project.
    pub async fn find_by_id(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<Switch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM switches WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, Switch>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a switch by name within a project.
    pub async fn find_by_name(
        pool: &PgPool,
        project_id: DbId,
        name: &str,
    ) -> Result<Option<Switch>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM switches WHERE project_id = $1 AND name = $2");
        sqlx::query_as::<_, Switch>(&query)
            .bind(project_id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all switches of a project ordered by name.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Switch>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM switches WHERE project_id = $1 ORDER BY name ASC, id ASC"
        );
        sqlx::query_as::<_, Switch>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Replace every attribute of a switch (including its name).
    ///
    /// Returns `None` if the switch does not exist in the project.
    pub async fn update(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        input: &SwitchInput,
    ) -> Result<Option<Switch>, sqlx::Error> {
        let query = format!(
            "UPDATE switches SET
                name = $3,
                role = $4,
                ip_address = $5,
                mac = $6,
                clock_source = $7,
                remarks = $8,
                metadata = $9,
                updated_at = NOW()
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Switch>(&query)
            .bind(id)
            .bind(project_id)
            .bind(input.name.trim())
            .bind(&input.role)
            .bind(&input.ip_address)
            .bind(&input.mac)
            .bind(&input.clock_source)
            .bind(&input.remarks)
            .bind(Json(&input.metadata))
            .fetch_optional(pool)
            .await
    }

    /// Whether a switch with this ID exists in the project.
    pub async fn exists_in_project(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM switches WHERE id = $1 AND project_id = $2)",
        )
        .bind(id)
        .bind(project_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Delete a switch together with its ports.
    ///
    /// Runs in a transaction: first clear every remote reference to the
    /// switch from other ports, then delete the ports it owns, then the
    /// switch itself. Returns `false` if the switch does not exist in the
    /// project.
    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let found: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM switches WHERE id = $1 AND project_id = $2 FOR UPDATE")
                .bind(id)
                .bind(project_id)
                .fetch_optional(&mut *tx)
                .await?;
        if found.is_none() {
            return Ok(false);
        }

        let unlinked = sqlx::query(
            "UPDATE ports SET connected_to_id = NULL, connected_port_num = NULL, updated_at = NOW()
             WHERE connected_to_id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let removed_ports = sqlx::query("DELETE FROM ports WHERE switch_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM switches WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            project_id,
            switch_id = id,
            unlinked_ports = unlinked.rows_affected(),
            removed_ports = removed_ports.rows_affected(),
            "Switch deleted",
        );
        Ok(true)
    }
}
