//! Topology graph of a project's switches and links.

use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use wr_core::topology::{build_topology, render_dot, LinkEnd, SwitchNode, TopologyGraph};
use wr_core::types::DbId;
use wr_db::repositories::{PortRepo, SwitchRepo};

use crate::error::AppResult;
use crate::handlers::project::load_project;
use crate::state::AppState;

async fn load_graph(state: &AppState, project_id: DbId) -> AppResult<TopologyGraph> {
    load_project(&state.pool, project_id).await?;

    let switches: Vec<SwitchNode> = SwitchRepo::list_by_project(&state.pool, project_id)
        .await?
        .iter()
        .map(|s| s.topology_node())
        .collect();
    let links: Vec<LinkEnd> = PortRepo::list_links_by_project(&state.pool, project_id)
        .await?
        .into_iter()
        .map(LinkEnd::from)
        .collect();

    Ok(build_topology(&switches, &links))
}

/// GET /api/v1/projects/{project_id}/topology
pub async fn get_graph(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<TopologyGraph>> {
    Ok(Json(load_graph(&state, project_id).await?))
}

/// GET /api/v1/projects/{project_id}/topology.dot
pub async fn get_dot(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let graph = load_graph(&state, project_id).await?;
    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, "text/vnd.graphviz; charset=utf-8")],
        render_dot(&graph),
    ))
}
