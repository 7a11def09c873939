//! Repository for the `sfps` table.

use sqlx::types::Json;
use sqlx::PgPool;
use wr_core::types::DbId;

use crate::models::sfp::{Sfp, SfpInput};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, project_id, serial, wavelength, channel, alpha, \
    delta_tx, delta_rx, remarks, metadata, created_at, updated_at";

/// Provides CRUD operations for SFP transceivers.
pub struct SfpRepo;

impl SfpRepo {
    /// Insert a new SFP, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &SfpInput,
    ) -> Result<Sfp, sqlx::Error> {
        let query = format!(
            "INSERT INTO sfps
                (project_id, serial, wavelength, channel, alpha, delta_tx, delta_rx, remarks, metadata)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sfp>(&query)
            .bind(project_id)
            .bind(input.serial.trim())
            .bind(&input.wavelength)
            .bind(&input.channel)
            .bind(input.alpha)
            .bind(input.delta_tx)
            .bind(input.delta_rx)
            .bind(&input.remarks)
            .bind(Json(&input.metadata))
            .fetch_one(pool)
            .await
    }

    /// Find an SFP by ID within a project.
    pub async fn find_by_id(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<Sfp>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sfps WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, Sfp>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// List all SFPs of a project ordered by serial.
    pub async fn list_by_project(pool: &PgPool, project_id: DbId) -> Result<Vec<Sfp>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sfps WHERE project_id = $1 ORDER BY serial ASC, id ASC"
        );
        sqlx::query_as::<_, Sfp>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Replace every attribute of an SFP.
    ///
    /// Returns `None` if the SFP does not exist in the project.
    pub async fn update(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        input: &SfpInput,
    ) -> Result<Option<Sfp>, sqlx::Error> {
        let query = format!(
            "UPDATE sfps SET
                serial = $3,
                wavelength = $4,
                channel = $5,
                alpha = $6,
                delta_tx = $7,
                delta_rx = $8,
                remarks = $9,
                metadata = $10,
                updated_at = NOW()
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sfp>(&query)
            .bind(id)
            .bind(project_id)
            .bind(input.serial.trim())
            .bind(&input.wavelength)
            .bind(&input.channel)
            .bind(input.alpha)
            .bind(input.delta_tx)
            .bind(input.delta_rx)
            .bind(&input.remarks)
            .bind(Json(&input.metadata))
            .fetch_optional(pool)
            .await
    }

    /// Whether an SFP with this ID exists in the project.
    pub async fn exists_in_project(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM sfps WHERE id = $1 AND project_id = $2)")
                .bind(id)
                .bind(project_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// Delete an SFP.
    ///
    /// Ports are not owned by SFPs: every port referencing this SFP as its
    /// local or remote optic is unplugged first, in the same transaction.
    /// Returns `false` if the SFP does not exist in the project.
    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let found: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM sfps WHERE id = $1 AND project_id = $2 FOR UPDATE")
                .bind(id)
                .bind(project_id)
                .fetch_optional(&mut *tx)
                .await?;
        if found.is_none() {
            return Ok(false);
        }

        sqlx::query("UPDATE ports SET sfp_id = NULL, updated_at = NOW() WHERE sfp_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "UPDATE ports SET remote_sfp_id = NULL, updated_at = NOW() WHERE remote_sfp_id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM sfps WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}
