//! Shared response envelope types for API handlers.
//!
//! Collection endpoints answer with a `{ "data": [...] }` envelope; single
//! entities are returned bare.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: switches }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
