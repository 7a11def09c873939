//! Handlers for `/projects/{project_id}/sfps`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use wr_core::custom_fields::{CustomSchema, EntityKind};
use wr_core::error::CoreError;
use wr_core::inventory::validate_name;
use wr_core::types::DbId;
use wr_db::models::sfp::{Sfp, SfpInput};
use wr_db::repositories::SfpRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::project::load_project;
use crate::handlers::switch::non_blank;
use crate::middleware::edit_access::EditAccess;
use crate::response::DataResponse;
use crate::state::AppState;

fn normalize_input(mut input: SfpInput, schema: &CustomSchema) -> AppResult<SfpInput> {
    validate_name("SFP serial", &input.serial)?;
    input.serial = input.serial.trim().to_string();
    input.wavelength = non_blank(input.wavelength);
    input.channel = non_blank(input.channel);
    input.remarks = non_blank(input.remarks);

    for (field, value) in [
        ("alpha", input.alpha),
        ("delta_tx", input.delta_tx),
        ("delta_rx", input.delta_rx),
    ] {
        if !value.is_finite() {
            return Err(CoreError::Validation(format!("{field} must be a finite number")).into());
        }
    }

    schema.validate_metadata(EntityKind::Sfp, &input.metadata)?;
    Ok(input)
}

/// POST /api/v1/projects/{project_id}/sfps
pub async fn create(
    _access: EditAccess,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<SfpInput>,
) -> AppResult<(StatusCode, Json<Sfp>)> {
    let project = load_project(&state.pool, project_id).await?;
    let input = normalize_input(input, &project.custom_schema)?;

    let sfp = SfpRepo::create(&state.pool, project_id, &input).await?;
    tracing::info!(project_id, sfp_id = sfp.id, serial = %sfp.serial, "SFP created");
    Ok((StatusCode::CREATED, Json(sfp)))
}

/// GET /api/v1/projects/{project_id}/sfps
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Sfp>>>> {
    load_project(&state.pool, project_id).await?;
    let sfps = SfpRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: sfps }))
}

/// GET /api/v1/projects/{project_id}/sfps/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Sfp>> {
    let sfp = SfpRepo::find_by_id(&state.pool, project_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "SFP", id }))?;
    Ok(Json(sfp))
}

/// PUT /api/v1/projects/{project_id}/sfps/{id}
pub async fn update(
    _access: EditAccess,
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<SfpInput>,
) -> AppResult<Json<Sfp>> {
    let project = load_project(&state.pool, project_id).await?;
    let input = normalize_input(input, &project.custom_schema)?;

    let sfp = SfpRepo::update(&state.pool, project_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "SFP", id }))?;
    Ok(Json(sfp))
}

/// DELETE /api/v1/projects/{project_id}/sfps/{id}
///
/// Ports holding the SFP (locally or as remote) are unplugged first.
pub async fn delete(
    _access: EditAccess,
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if SfpRepo::delete(&state.pool, project_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "SFP", id }))
    }
}
