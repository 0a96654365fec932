//! Operator token extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sparkle_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Proof that the request carried the operator token from
/// [`ServerConfig::operator_token`](crate::config::ServerConfig::operator_token).
///
/// ```ignore
/// async fn my_handler(_operator: Operator) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
///
/// With no token configured every request is rejected.
#[derive(Debug, Clone, Copy)]
pub struct Operator;

impl FromRequestParts<AppState> for Operator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let expected = state.config.operator_token.as_deref().ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Operator access is not configured".into(),
            ))
        })?;

        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        if !tokens_match(token.as_bytes(), expected.as_bytes()) {
            tracing::warn!("Rejected operator request with a wrong token");
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid operator token".into(),
            )));
        }

        Ok(Operator)
    }
}

/// Compares without stopping at the first differing byte.
fn tokens_match(given: &[u8], expected: &[u8]) -> bool {
    given.len() == expected.len()
        && given
            .iter()
            .zip(expected)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
