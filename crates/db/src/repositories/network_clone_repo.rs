//! Deep copy of a project's switches, SFPs and ports into a new project.
//!
//! Order matters: switches and SFPs are copied first so their old -> new id
//! maps exist before any port is rewritten. The whole copy runs in one
//! transaction; on any error the transaction is dropped and rolled back, so
//! no partially populated project is ever visible.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use wr_core::error::CoreError;
use wr_core::network_clone::{remap_port_refs, validate_clone_name, IdMap};
use wr_core::types::DbId;

use crate::models::port::Port;
use crate::models::project::Project;
use crate::models::sfp::Sfp;
use crate::models::switch::Switch;
use crate::repositories::{port_repo, project_repo, sfp_repo, switch_repo};

#[derive(Debug, thiserror::Error)]
pub enum CloneError {
    #[error("A project named '{0}' already exists")]
    DuplicateName(String),

    #[error("Source project {0} not found")]
    SourceNotFound(DbId),

    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// Any storage failure during the copy. Nothing was committed.
    #[error("Clone failed: {0}")]
    Failed(#[from] sqlx::Error),
}

/// Result of a successful clone.
#[derive(Debug, Clone, Serialize)]
pub struct CloneSummary {
    pub project: Project,
    pub switches: usize,
    pub sfps: usize,
    pub ports: usize,
    /// Ports whose owning switch could not be mapped. Always 0 for a
    /// consistent source project.
    pub skipped_ports: usize,
}

/// Copies whole projects.
pub struct NetworkCloneRepo;

impl NetworkCloneRepo {
    /// Copy project `source_id` into a new project named `new_name`.
    ///
    /// Fails with [`CloneError::DuplicateName`] without writing anything if
    /// the name is taken.
    pub async fn clone_project(
        pool: &PgPool,
        source_id: DbId,
        new_name: &str,
    ) -> Result<CloneSummary, CloneError> {
        let new_name = validate_clone_name(new_name)?;
        let mut tx = pool.begin().await?;

        let source = sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects WHERE id = $1",
            project_repo::COLUMNS
        ))
        .bind(source_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CloneError::SourceNotFound(source_id))?;

        let taken: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM projects WHERE name = $1)")
                .bind(&new_name)
                .fetch_one(&mut *tx)
                .await?;
        if taken.0 {
            return Err(CloneError::DuplicateName(new_name));
        }

        let project = insert_project(&mut tx, &new_name, &source).await?;

        let switches = copy_switches(&mut tx, source.id, project.id).await?;
        let sfps = copy_sfps(&mut tx, source.id, project.id).await?;
        let (ports, skipped_ports) =
            copy_ports(&mut tx, source.id, project.id, &switches, &sfps).await?;

        tx.commit().await?;

        tracing::info!(
            source_id,
            project_id = project.id,
            switches = switches.len(),
            sfps = sfps.len(),
            ports,
            skipped_ports,
            "Project cloned",
        );

        Ok(CloneSummary {
            project,
            switches: switches.len(),
            sfps: sfps.len(),
            ports,
            skipped_ports,
        })
    }
}

async fn insert_project(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
    source: &Project,
) -> Result<Project, CloneError> {
    let query = format!(
        "INSERT INTO projects (name, custom_schema) VALUES ($1, $2) RETURNING {}",
        project_repo::COLUMNS
    );
    sqlx::query_as::<_, Project>(&query)
        .bind(name)
        .bind(Json(&source.custom_schema.0))
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            // Lost a race with a concurrent create of the same name.
            if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
                CloneError::DuplicateName(name.to_string())
            } else {
                CloneError::Failed(e)
            }
        })
}

async fn copy_switches(
    tx: &mut Transaction<'_, Postgres>,
    source_id: DbId,
    project_id: DbId,
) -> Result<IdMap, sqlx::Error> {
    let rows = sqlx::query_as::<_, Switch>(&format!(
        "SELECT {} FROM switches WHERE project_id = $1 ORDER BY id ASC",
        switch_repo::COLUMNS
    ))
    .bind(source_id)
    .fetch_all(&mut **tx)
    .await?;

    let mut map = IdMap::new();
    for sw in rows {
        let (new_id,): (DbId,) = sqlx::query_as(
            "INSERT INTO switches
                (project_id, name, role, ip_address, mac, clock_source, remarks, metadata)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id",
        )
        .bind(project_id)
        .bind(&sw.name)
        .bind(&sw.role)
        .bind(&sw.ip_address)
        .bind(&sw.mac)
        .bind(&sw.clock_source)
        .bind(&sw.remarks)
        .bind(&sw.metadata)
        .fetch_one(&mut **tx)
        .await?;
        map.insert(sw.id, new_id);
    }
    Ok(map)
}

async fn copy_sfps(
    tx: &mut Transaction<'_, Postgres>,
    source_id: DbId,
    project_id: DbId,
) -> Result<IdMap, sqlx::Error> {
    let rows = sqlx::query_as::<_, Sfp>(&format!(
        "SELECT {} FROM sfps WHERE project_id = $1 ORDER BY id ASC",
        sfp_repo::COLUMNS
    ))
    .bind(source_id)
    .fetch_all(&mut **tx)
    .await?;

    let mut map = IdMap::new();
    for sfp in rows {
        let (new_id,): (DbId,) = sqlx::query_as(
            "INSERT INTO sfps
                (project_id, serial, wavelength, channel, alpha, delta_tx, delta_rx, remarks, metadata)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING id",
        )
        .bind(project_id)
        .bind(&sfp.serial)
        .bind(&sfp.wavelength)
        .bind(&sfp.channel)
        .bind(sfp.alpha)
        .bind(sfp.delta_tx)
        .bind(sfp.delta_rx)
        .bind(&sfp.remarks)
        .bind(&sfp.metadata)
        .fetch_one(&mut **tx)
        .await?;
        map.insert(sfp.id, new_id);
    }
    Ok(map)
}

/// Returns `(copied, skipped)`.
async fn copy_ports(
    tx: &mut Transaction<'_, Postgres>,
    source_id: DbId,
    project_id: DbId,
    switches: &IdMap,
    sfps: &IdMap,
) -> Result<(usize, usize), sqlx::Error> {
    let rows = sqlx::query_as::<_, Port>(&format!(
        "SELECT {} FROM ports WHERE project_id = $1 ORDER BY id ASC",
        port_repo::COLUMNS
    ))
    .bind(source_id)
    .fetch_all(&mut **tx)
    .await?;

    let mut copied = 0;
    let mut skipped = 0;
    for port in rows {
        let Some(refs) = remap_port_refs(&port.refs(), switches, sfps) else {
            tracing::warn!(
                source_id,
                port_id = port.id,
                switch_id = port.switch_id,
                "Skipping port whose switch was not copied",
            );
            skipped += 1;
            continue;
        };
        // A link whose far end could not be mapped loses its remote port too.
        let connected_port_num = refs.connected_to_id.and(port.connected_port_num);

        sqlx::query(
            "INSERT INTO ports
                (project_id, switch_id, port_num, sfp_id, remote_sfp_id, connected_to_id,
                 connected_port_num, port_delta_tx, port_delta_rx, vlan, remarks, metadata)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(project_id)
        .bind(refs.switch_id)
        .bind(port.port_num)
        .bind(refs.sfp_id)
        .bind(refs.remote_sfp_id)
        .bind(refs.connected_to_id)
        .bind(connected_port_num)
        .bind(port.port_delta_tx)
        .bind(port.port_delta_rx)
        .bind(port.vlan)
        .bind(&port.remarks)
        .bind(&port.metadata)
        .execute(&mut **tx)
        .await?;
        copied += 1;
    }
    Ok((copied, skipped))
}
