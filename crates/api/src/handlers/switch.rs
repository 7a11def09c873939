//! Handlers for `/projects/{project_id}/switches`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use wr_core::custom_fields::{CustomSchema, EntityKind};
use wr_core::error::CoreError;
use wr_core::inventory::{validate_ip, validate_mac, validate_name, SwitchRole};
use wr_core::types::DbId;
use wr_db::models::switch::{Switch, SwitchInput};
use wr_db::repositories::SwitchRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::project::load_project;
use crate::middleware::edit_access::EditAccess;
use crate::response::DataResponse;
use crate::state::AppState;

/// Validate a switch payload and rewrite it into canonical form: trimmed
/// name, role label, upper-case MAC, blank optionals as `None`.
fn normalize_input(mut input: SwitchInput, schema: &CustomSchema) -> AppResult<SwitchInput> {
    validate_name("Switch name", &input.name)?;
    input.name = input.name.trim().to_string();

    let role: SwitchRole = input.role.parse()?;
    input.role = role.as_str().to_string();

    input.mac = non_blank(input.mac).map(|m| validate_mac(&m)).transpose()?;
    input.ip_address = non_blank(input.ip_address);
    if let Some(ip) = &input.ip_address {
        validate_ip(ip)?;
    }
    input.clock_source = non_blank(input.clock_source);
    input.remarks = non_blank(input.remarks);

    schema.validate_metadata(EntityKind::Switch, &input.metadata)?;
    Ok(input)
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// POST /api/v1/projects/{project_id}/switches
///
/// Creates the switch, or overwrites the one with the same name.
pub async fn upsert(
    _access: EditAccess,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<SwitchInput>,
) -> AppResult<(StatusCode, Json<Switch>)> {
    let project = load_project(&state.pool, project_id).await?;
    let input = normalize_input(input, &project.custom_schema)?;

    let switch = SwitchRepo::upsert(&state.pool, project_id, &input).await?;
    tracing::info!(project_id, switch_id = switch.id, name = %switch.name, "Switch saved");
    Ok((StatusCode::CREATED, Json(switch)))
}

/// GET /api/v1/projects/{project_id}/switches
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Switch>>>> {
    load_project(&state.pool, project_id).await?;
    let switches = SwitchRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: switches }))
}

/// GET /api/v1/projects/{project_id}/switches/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Switch>> {
    Ok(Json(load_switch(&state, project_id, id).await?))
}

pub(crate) async fn load_switch(state: &AppState, project_id: DbId, id: DbId) -> AppResult<Switch> {
    SwitchRepo::find_by_id(&state.pool, project_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Switch",
            id,
        }))
}

/// PUT /api/v1/projects/{project_id}/switches/{id}
pub async fn update(
    _access: EditAccess,
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<SwitchInput>,
) -> AppResult<Json<Switch>> {
    let project = load_project(&state.pool, project_id).await?;
    let input = normalize_input(input, &project.custom_schema)?;

    let switch = SwitchRepo::update(&state.pool, project_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Switch",
            id,
        }))?;
    Ok(Json(switch))
}

/// DELETE /api/v1/projects/{project_id}/switches/{id}
///
/// Also deletes the switch's ports and disconnects ports that pointed at it.
pub async fn delete(
    _access: EditAccess,
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if SwitchRepo::delete(&state.pool, project_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Switch",
            id,
        }))
    }
}
