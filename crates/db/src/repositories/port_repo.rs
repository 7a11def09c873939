//! Repository for the `ports` table.

use sqlx::types::Json;
use sqlx::PgPool;
use wr_core::types::DbId;

use crate::models::port::{LinkRow, Port, PortCalibrationRow, PortDetail, PortInput};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, project_id, switch_id, port_num, sfp_id, remote_sfp_id, \
    connected_to_id, connected_port_num, port_delta_tx, port_delta_rx, vlan, remarks, metadata, \
    created_at, updated_at";

/// Provides CRUD operations and read views for ports.
///
/// Callers are responsible for checking that every referenced switch and
/// SFP belongs to the same project before writing.
pub struct PortRepo;

impl PortRepo {
    /// Insert a new port, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &PortInput,
    ) -> Result<Port, sqlx::Error> {
        let query = format!(
            "INSERT INTO ports
                (project_id, switch_id, port_num, sfp_id, remote_sfp_id, connected_to_id,
                 connected_port_num, port_delta_tx, port_delta_rx, vlan, remarks, metadata)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Port>(&query)
            .bind(project_id)
            .bind(input.switch_id)
            .bind(input.port_num)
            .bind(input.sfp_id)
            .bind(input.remote_sfp_id)
            .bind(input.connected_to_id)
            .bind(input.connected_port_num)
            .bind(input.port_delta_tx)
            .bind(input.port_delta_rx)
            .bind(input.vlan)
            .bind(&input.remarks)
            .bind(Json(&input.metadata))
            .fetch_one(pool)
            .await
    }

    /// Find a port by ID within a project.
    pub async fn find_by_id(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<Port>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ports WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, Port>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// List all ports of a project ordered by ID.
    pub async fn list_by_project(pool: &PgPool, project_id: DbId) -> Result<Vec<Port>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ports WHERE project_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, Port>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// List ports joined with switch names and SFP serials, ordered by
    /// switch name then port number.
    pub async fn list_detailed_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<PortDetail>, sqlx::Error> {
        sqlx::query_as::<_, PortDetail>(
            "SELECT
                p.id, p.project_id, p.switch_id, p.port_num, p.sfp_id, p.remote_sfp_id,
                p.connected_to_id, p.connected_port_num, p.port_delta_tx, p.port_delta_rx,
                p.vlan, p.remarks, p.metadata, p.created_at, p.updated_at,
                sw.name AS switch_name,
                sfp.serial AS sfp_serial,
                rsfp.serial AS remote_sfp_serial,
                rsw.name AS remote_switch_name
             FROM ports p
             JOIN switches sw ON sw.id = p.switch_id
             LEFT JOIN sfps sfp ON sfp.id = p.sfp_id
             LEFT JOIN sfps rsfp ON rsfp.id = p.remote_sfp_id
             LEFT JOIN switches rsw ON rsw.id = p.connected_to_id
             WHERE p.project_id = $1
             ORDER BY sw.name ASC, p.port_num ASC, p.id ASC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Replace every attribute of a port. Absent references are stored as NULL.
    ///
    /// Returns `None` if the port does not exist in the project.
    pub async fn update(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        input: &PortInput,
    ) -> Result<Option<Port>, sqlx::Error> {
        let query = format!(
            "UPDATE ports SET
                switch_id = $3,
                port_num = $4,
                sfp_id = $5,
                remote_sfp_id = $6,
                connected_to_id = $7,
                connected_port_num = $8,
                port_delta_tx = $9,
                port_delta_rx = $10,
                vlan = $11,
                remarks = $12,
                metadata = $13,
                updated_at = NOW()
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Port>(&query)
            .bind(id)
            .bind(project_id)
            .bind(input.switch_id)
            .bind(input.port_num)
            .bind(input.sfp_id)
            .bind(input.remote_sfp_id)
            .bind(input.connected_to_id)
            .bind(input.connected_port_num)
            .bind(input.port_delta_tx)
            .bind(input.port_delta_rx)
            .bind(input.vlan)
            .bind(&input.remarks)
            .bind(Json(&input.metadata))
            .fetch_optional(pool)
            .await
    }

    /// Delete a port by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ports WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Ports of one switch with their local SFP calibration, for config export.
    pub async fn list_calibration_by_switch(
        pool: &PgPool,
        switch_id: DbId,
    ) -> Result<Vec<PortCalibrationRow>, sqlx::Error> {
        sqlx::query_as::<_, PortCalibrationRow>(
            "SELECT
                p.port_num, p.remarks, p.metadata, p.port_delta_tx, p.port_delta_rx,
                p.sfp_id,
                s.alpha AS sfp_alpha,
                s.delta_tx AS sfp_delta_tx,
                s.delta_rx AS sfp_delta_rx
             FROM ports p
             LEFT JOIN sfps s ON s.id = p.sfp_id
             WHERE p.switch_id = $1
             ORDER BY p.port_num ASC, p.id ASC",
        )
        .bind(switch_id)
        .fetch_all(pool)
        .await
    }

    /// Ports of a project that point at a remote switch.
    pub async fn list_links_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<LinkRow>, sqlx::Error> {
        sqlx::query_as::<_, LinkRow>(
            "SELECT id AS port_id, switch_id, port_num, connected_to_id, connected_port_num, vlan
             FROM ports
             WHERE project_id = $1 AND connected_to_id IS NOT NULL
             ORDER BY switch_id ASC, port_num ASC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }
}
