pub mod calculator;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                        list, create
/// /projects/{id}                                   get, rename, delete
/// /projects/{id}/clone                             deep copy (POST)
/// /projects/{id}/backup                            zip download (GET)
/// /projects/{id}/schema                            get, replace custom fields
/// /projects/{id}/schema/{kind}                     add field (POST)
/// /projects/{id}/schema/{kind}/{field}             remove field (DELETE)
/// /projects/{id}/topology                          graph as JSON
/// /projects/{id}/topology.dot                      graph as Graphviz DOT
///
/// /projects/{project_id}/switches                  list, upsert
/// /projects/{project_id}/switches/{id}             get, update, delete
/// /projects/{project_id}/switches/{id}/config      WR .config download
///
/// /projects/{project_id}/sfps                      list, create
/// /projects/{project_id}/sfps/{id}                 get, update, delete
///
/// /projects/{project_id}/ports                     list (joined view), create
/// /projects/{project_id}/ports/{id}                get, update, delete
/// /projects/{project_id}/ports/{id}/delay          resolved TX/RX delay
///
/// /calculator/fiber-delay                          fiber propagation delay
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/calculator", calculator::router())
}
