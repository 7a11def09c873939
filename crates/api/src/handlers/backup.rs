//! Project backup download.

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use wr_core::types::DbId;
use wr_db::repositories::{PortRepo, SfpRepo, SwitchRepo};

use crate::backup::build_backup_archive;
use crate::error::{AppError, AppResult};
use crate::handlers::config_gen::attachment_name;
use crate::handlers::project::load_project;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/backup
///
/// Zip of `switches.jsonl`, `sfps.jsonl` and `ports.jsonl`, rows ordered by id.
pub async fn download_backup(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = load_project(&state.pool, project_id).await?;

    let mut switches = SwitchRepo::list_by_project(&state.pool, project_id).await?;
    switches.sort_by_key(|s| s.id);
    let mut sfps = SfpRepo::list_by_project(&state.pool, project_id).await?;
    sfps.sort_by_key(|s| s.id);
    let ports = PortRepo::list_by_project(&state.pool, project_id).await?;

    let bytes = build_backup_archive(&switches, &sfps, &ports)
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    tracing::info!(
        project_id,
        switches = switches.len(),
        sfps = sfps.len(),
        ports = ports.len(),
        bytes = bytes.len(),
        "Backup created",
    );

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "application/zip".to_string()),
            (
                CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"{}-backup.zip\"",
                    attachment_name(&project.name)
                ),
            ),
        ],
        bytes,
    ))
}
