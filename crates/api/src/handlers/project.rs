//! Handlers for the `/projects` resource, its custom field schema and
//! whole-project operations (clone).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sqlx::PgPool;
use wr_core::custom_fields::{CustomSchema, EntityKind};
use wr_core::error::CoreError;
use wr_core::inventory::validate_name;
use wr_core::types::DbId;
use wr_db::models::project::{CreateProject, Project, UpdateProject};
use wr_db::repositories::{CloneSummary, NetworkCloneRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::edit_access::EditAccess;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a project or fail with 404. Used by every project-scoped handler.
pub(crate) async fn load_project(pool: &PgPool, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}

/// POST /api/v1/projects
pub async fn create(
    _access: EditAccess,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    validate_name("Project name", &input.name)?;
    if let Some(schema) = &input.custom_schema {
        schema.validate()?;
    }

    let project = ProjectRepo::create(&state.pool, &input).await?;
    tracing::info!(project_id = project.id, name = %project.name, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    Ok(Json(load_project(&state.pool, id).await?))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    _access: EditAccess,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    if let Some(name) = &input.name {
        validate_name("Project name", name)?;
    }

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
///
/// Removes the project with all of its switches, SFPs and ports.
pub async fn delete(
    _access: EditAccess,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProjectRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(project_id = id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Clone
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CloneRequest {
    pub name: String,
}

/// POST /api/v1/projects/{id}/clone
pub async fn clone_project(
    _access: EditAccess,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CloneRequest>,
) -> AppResult<(StatusCode, Json<CloneSummary>)> {
    let summary = NetworkCloneRepo::clone_project(&state.pool, id, &input.name).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

// ---------------------------------------------------------------------------
// Custom field schema
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AddFieldRequest {
    pub name: String,
}

/// GET /api/v1/projects/{id}/schema
pub async fn get_schema(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<CustomSchema>> {
    let project = load_project(&state.pool, id).await?;
    Ok(Json(project.custom_schema.0))
}

/// PUT /api/v1/projects/{id}/schema
///
/// Replaces the whole schema. Values already stored under removed keys are
/// kept on the entity rows.
pub async fn replace_schema(
    _access: EditAccess,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(schema): Json<CustomSchema>,
) -> AppResult<Json<CustomSchema>> {
    schema.validate()?;
    let project = save_schema(&state.pool, id, &schema).await?;
    Ok(Json(project.custom_schema.0))
}

/// POST /api/v1/projects/{id}/schema/{kind}
pub async fn add_field(
    _access: EditAccess,
    State(state): State<AppState>,
    Path((id, kind)): Path<(DbId, EntityKind)>,
    Json(input): Json<AddFieldRequest>,
) -> AppResult<(StatusCode, Json<CustomSchema>)> {
    let mut schema = load_project(&state.pool, id).await?.custom_schema.0;
    schema.add_field(kind, &input.name)?;
    let project = save_schema(&state.pool, id, &schema).await?;
    Ok((StatusCode::CREATED, Json(project.custom_schema.0)))
}

/// DELETE /api/v1/projects/{id}/schema/{kind}/{field}
pub async fn remove_field(
    _access: EditAccess,
    State(state): State<AppState>,
    Path((id, kind, field)): Path<(DbId, EntityKind, String)>,
) -> AppResult<StatusCode> {
    let mut schema = load_project(&state.pool, id).await?.custom_schema.0;
    if !schema.remove_field(kind, &field) {
        return Err(AppError::BadRequest(format!(
            "No {} field named '{field}'",
            kind.label()
        )));
    }
    save_schema(&state.pool, id, &schema).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn save_schema(pool: &PgPool, id: DbId, schema: &CustomSchema) -> AppResult<Project> {
    ProjectRepo::update_custom_schema(pool, id, schema)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}
