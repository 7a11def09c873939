//! Handlers for `/projects/{project_id}/ports`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use wr_core::calibration::{resolve_port_delay, ResolvedDelay};
use wr_core::custom_fields::EntityKind;
use wr_core::error::CoreError;
use wr_core::inventory::{normalize_vlan, validate_port_number, validate_vlan};
use wr_core::types::DbId;
use wr_db::models::port::{Port, PortDetail, PortInput};
use wr_db::models::project::Project;
use wr_db::repositories::{PortRepo, SfpRepo, SwitchRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::project::load_project;
use crate::handlers::switch::non_blank;
use crate::middleware::edit_access::EditAccess;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check a port payload against the project and canonicalise it.
///
/// Every referenced switch and SFP must belong to `project`; a reference
/// into another project is a [`CoreError::DanglingReference`].
async fn validate_input(
    state: &AppState,
    project: &Project,
    mut input: PortInput,
) -> AppResult<PortInput> {
    validate_port_number(input.port_num)?;

    if let Some(vlan) = input.vlan {
        validate_vlan(vlan)?;
    }
    input.vlan = normalize_vlan(input.vlan);

    match (input.connected_to_id, input.connected_port_num) {
        (None, Some(_)) => {
            return Err(CoreError::Validation(
                "connected_port_num requires connected_to_id".to_string(),
            )
            .into());
        }
        (Some(remote), _) if remote == input.switch_id => {
            return Err(
                CoreError::Validation("A port cannot link to its own switch".to_string()).into(),
            );
        }
        (_, Some(remote_port)) => validate_port_number(remote_port)?,
        _ => {}
    }

    for (field, value) in [
        ("port_delta_tx", input.port_delta_tx),
        ("port_delta_rx", input.port_delta_rx),
    ] {
        if !value.is_finite() {
            return Err(CoreError::Validation(format!("{field} must be a finite number")).into());
        }
    }

    input.remarks = non_blank(input.remarks);
    project
        .custom_schema
        .validate_metadata(EntityKind::Port, &input.metadata)?;

    let project_id = project.id;
    ensure_switch(state, project_id, input.switch_id).await?;
    if let Some(remote) = input.connected_to_id {
        ensure_switch(state, project_id, remote).await?;
    }
    for sfp_id in [input.sfp_id, input.remote_sfp_id].into_iter().flatten() {
        if !SfpRepo::exists_in_project(&state.pool, project_id, sfp_id).await? {
            return Err(CoreError::DanglingReference {
                entity: "SFP",
                id: sfp_id,
            }
            .into());
        }
    }

    Ok(input)
}

async fn ensure_switch(state: &AppState, project_id: DbId, id: DbId) -> AppResult<()> {
    if SwitchRepo::exists_in_project(&state.pool, project_id, id).await? {
        Ok(())
    } else {
        Err(CoreError::DanglingReference {
            entity: "Switch",
            id,
        }
        .into())
    }
}

async fn load_port(state: &AppState, project_id: DbId, id: DbId) -> AppResult<Port> {
    PortRepo::find_by_id(&state.pool, project_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Port", id }))
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/{project_id}/ports
pub async fn create(
    _access: EditAccess,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<PortInput>,
) -> AppResult<(StatusCode, Json<Port>)> {
    let project = load_project(&state.pool, project_id).await?;
    let input = validate_input(&state, &project, input).await?;

    let port = PortRepo::create(&state.pool, project_id, &input).await?;
    tracing::info!(
        project_id,
        port_id = port.id,
        switch_id = port.switch_id,
        port_num = port.port_num,
        "Port created",
    );
    Ok((StatusCode::CREATED, Json(port)))
}

/// GET /api/v1/projects/{project_id}/ports
///
/// Ports joined with switch names and SFP serials, ordered by switch name
/// then port number.
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<PortDetail>>>> {
    load_project(&state.pool, project_id).await?;
    let ports = PortRepo::list_detailed_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: ports }))
}

/// GET /api/v1/projects/{project_id}/ports/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Port>> {
    Ok(Json(load_port(&state, project_id, id).await?))
}

/// PUT /api/v1/projects/{project_id}/ports/{id}
///
/// Full replacement: omitted optional fields are cleared.
pub async fn update(
    _access: EditAccess,
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<PortInput>,
) -> AppResult<Json<Port>> {
    let project = load_project(&state.pool, project_id).await?;
    let input = validate_input(&state, &project, input).await?;

    let port = PortRepo::update(&state.pool, project_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Port", id }))?;
    Ok(Json(port))
}

/// DELETE /api/v1/projects/{project_id}/ports/{id}
pub async fn delete(
    _access: EditAccess,
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if PortRepo::delete(&state.pool, project_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Port", id }))
    }
}

// ---------------------------------------------------------------------------
// Calibration
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{project_id}/ports/{id}/delay
///
/// Effective TX/RX delay: the local SFP's deltas plus the port-board deltas.
pub async fn resolved_delay(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<ResolvedDelay>> {
    let port = load_port(&state, project_id, id).await?;

    let sfp = match port.sfp_id {
        Some(sfp_id) => SfpRepo::find_by_id(&state.pool, project_id, sfp_id).await?,
        None => None,
    };
    let calibration = sfp.as_ref().map(|s| s.calibration());

    Ok(Json(resolve_port_delay(
        &port.board_delta(),
        calibration.as_ref(),
    )))
}
