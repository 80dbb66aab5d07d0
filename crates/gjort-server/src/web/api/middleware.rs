use crate::auth::validate_access_token;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use gjort_db::{UserRepo, UserRow};
use std::sync::Arc;
use uuid::Uuid;

const UNAUTHENTICATED: &str = "Authentication required";

/// Extractor that authenticates the request: pulls the bearer token from
/// the Authorization header, verifies it, and resolves the subject to a
/// live user row. Handlers that take a `CurrentUser` cannot run without
/// a valid token.
///
/// Every failure mode -- missing header, malformed token, bad signature,
/// expired token, user no longer exists -- collapses into the same 401;
/// the sub-reason is only logged.
#[derive(Debug)]
pub struct CurrentUser(pub UserRow);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let token = auth_header
            .and_then(|val| val.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthenticated(UNAUTHENTICATED))?;

        let claims =
            validate_access_token(token, &state.config.auth.jwt_secret).map_err(|e| {
                tracing::debug!("Rejected access token: {}", e);
                ApiError::Unauthenticated(UNAUTHENTICATED)
            })?;

        let user_id: Uuid = claims
            .sub
            .parse()
            .map_err(|_| ApiError::Unauthenticated(UNAUTHENTICATED))?;

        match UserRepo::get_by_id(&state.pool, user_id).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => {
                tracing::debug!("Token subject {} no longer exists", user_id);
                Err(ApiError::Unauthenticated(UNAUTHENTICATED))
            }
            Err(e) => Err(ApiError::Internal(e)),
        }
    }
}
