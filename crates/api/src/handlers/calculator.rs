//! Stateless calibration helpers.

use axum::extract::Query;
use axum::Json;
use serde::{Deserialize, Serialize};
use wr_core::calibration::fiber_delay_ns;

use crate::error::AppResult;

#[derive(Debug, Deserialize)]
pub struct FiberDelayQuery {
    pub length_km: f64,
}

#[derive(Debug, Serialize)]
pub struct FiberDelayResponse {
    pub length_km: f64,
    pub delay_ns: f64,
}

/// GET /api/v1/calculator/fiber-delay?length_km=
pub async fn fiber_delay(
    Query(params): Query<FiberDelayQuery>,
) -> AppResult<Json<FiberDelayResponse>> {
    let delay_ns = fiber_delay_ns(params.length_km)?;
    Ok(Json(FiberDelayResponse {
        length_km: params.length_km,
        delay_ns,
    }))
}
