//! White Rabbit `.config` download for a switch.

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use wr_core::types::DbId;
use wr_core::wr_config::{export_config, PortCalibration};
use wr_db::repositories::PortRepo;

use crate::error::AppResult;
use crate::handlers::switch::load_switch;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/switches/{id}/config
///
/// Returns the generated config as a `<switch name>.config` attachment.
pub async fn download_config(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let switch = load_switch(&state, project_id, id).await?;
    let ports: Vec<PortCalibration> = PortRepo::list_calibration_by_switch(&state.pool, switch.id)
        .await?
        .into_iter()
        .map(|row| row.into_calibration())
        .collect();

    let text = export_config(&switch.node_identity(), &ports);
    tracing::debug!(project_id, switch_id = id, ports = ports.len(), "Config exported");

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"{}.config\"",
                    attachment_name(&switch.name)
                ),
            ),
        ],
        text,
    ))
}

/// Reduce a user-supplied name to characters safe inside a quoted
/// `Content-Disposition` filename.
pub(crate) fn attachment_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_name_replaces_unsafe_characters() {
        assert_eq!(attachment_name("WRS-1"), "WRS-1");
        assert_eq!(attachment_name("lab/\"gm\""), "lab__gm_");
        assert_eq!(attachment_name("Zürich 1"), "Z_rich 1");
    }
}
