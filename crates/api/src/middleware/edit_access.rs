//! Edit-password gate for mutating handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use wr_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Proof that the caller may modify the inventory.
///
/// With no `EDIT_PASSWORD` configured every request passes. Otherwise the
/// request must carry `Authorization: Bearer <password>`. Reads never take
/// this extractor.
///
/// ```ignore
/// async fn delete(_access: EditAccess, State(state): State<AppState>) -> AppResult<StatusCode> {
///     ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EditAccess;

impl FromRequestParts<AppState> for EditAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.edit_password.as_deref() else {
            return Ok(EditAccess);
        };

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Editing is password protected".into(),
                ))
            })?;

        let supplied = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <password>".into(),
            ))
        })?;

        if !password_matches(supplied, expected) {
            tracing::warn!(path = %parts.uri.path(), "Rejected edit with wrong password");
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid edit password".into(),
            )));
        }

        Ok(EditAccess)
    }
}

/// Compare digests in constant time so the check does not leak the length
/// or the matching prefix of the configured password.
fn password_matches(supplied: &str, expected: &str) -> bool {
    let supplied = Sha256::digest(supplied.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    bool::from(supplied.as_slice().ct_eq(expected.as_slice()))
}
