use axum::routing::get;
use axum::Router;

use crate::handlers::calculator;
use crate::state::AppState;

/// Routes mounted at `/calculator`. Stateless; no project scope.
pub fn router() -> Router<AppState> {
    Router::new().route("/fiber-delay", get(calculator::fiber_delay))
}
