//! Route definitions for the `/projects` resource and everything nested
//! under a project.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{backup, config_gen, port, project, sfp, switch, topology};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                   -> list
/// POST   /                                   -> create
/// GET    /{id}                               -> get_by_id
/// PUT    /{id}                               -> update
/// DELETE /{id}                               -> delete
/// POST   /{id}/clone                         -> clone_project
/// GET    /{id}/backup                        -> download_backup
/// GET    /{id}/schema                        -> get_schema
/// PUT    /{id}/schema                        -> replace_schema
/// POST   /{id}/schema/{kind}                 -> add_field
/// DELETE /{id}/schema/{kind}/{field}         -> remove_field
/// GET    /{id}/topology                      -> get_graph
/// GET    /{id}/topology.dot                  -> get_dot
///
/// GET    /{project_id}/switches              -> list_by_project
/// POST   /{project_id}/switches              -> upsert
/// GET    /{project_id}/switches/{id}         -> get_by_id
/// PUT    /{project_id}/switches/{id}         -> update
/// DELETE /{project_id}/switches/{id}         -> delete
/// GET    /{project_id}/switches/{id}/config  -> download_config
///
/// GET    /{project_id}/sfps                  -> list_by_project
/// POST   /{project_id}/sfps                  -> create
/// GET    /{project_id}/sfps/{id}             -> get_by_id
/// PUT    /{project_id}/sfps/{id}             -> update
/// DELETE /{project_id}/sfps/{id}             -> delete
///
/// GET    /{project_id}/ports                 -> list_by_project
/// POST   /{project_id}/ports                 -> create
/// GET    /{project_id}/ports/{id}            -> get_by_id
/// PUT    /{project_id}/ports/{id}            -> update
/// DELETE /{project_id}/ports/{id}            -> delete
/// GET    /{project_id}/ports/{id}/delay      -> resolved_delay
/// ```
pub fn router() -> Router<AppState> {
    let switch_routes = Router::new()
        .route("/", get(switch::list_by_project).post(switch::upsert))
        .route(
            "/{id}",
            get(switch::get_by_id)
                .put(switch::update)
                .delete(switch::delete),
        )
        .route("/{id}/config", get(config_gen::download_config));

    let sfp_routes = Router::new()
        .route("/", get(sfp::list_by_project).post(sfp::create))
        .route(
            "/{id}",
            get(sfp::get_by_id).put(sfp::update).delete(sfp::delete),
        );

    let port_routes = Router::new()
        .route("/", get(port::list_by_project).post(port::create))
        .route(
            "/{id}",
            get(port::get_by_id).put(port::update).delete(port::delete),
        )
        .route("/{id}/delay", get(port::resolved_delay));

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{project_id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{project_id}/clone", post(project::clone_project))
        .route("/{project_id}/backup", get(backup::download_backup))
        .route(
            "/{project_id}/schema",
            get(project::get_schema).put(project::replace_schema),
        )
        .route("/{project_id}/schema/{kind}", post(project::add_field))
        .route(
            "/{project_id}/schema/{kind}/{field}",
            delete(project::remove_field),
        )
        .route("/{project_id}/topology", get(topology::get_graph))
        .route("/{project_id}/topology.dot", get(topology::get_dot))
        .nest("/{project_id}/switches", switch_routes)
        .nest("/{project_id}/sfps", sfp_routes)
        .nest("/{project_id}/ports", port_routes)
}
