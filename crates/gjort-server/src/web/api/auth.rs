use crate::auth::{create_access_token, hash_password, verify_password};
use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::middleware::CurrentUser;
use crate::web::api::{created, ok};
use axum::{Json, extract::State, response::Response};
use gjort_common::validation::validate_registration;
use gjort_db::{UserRepo, is_unique_violation};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

const BAD_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/register
#[tracing::instrument(skip(state, req))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    let errors = validate_registration(&req.username, &req.email, &req.password);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    // Friendly duplicate checks up front; the unique indexes still
    // backstop concurrent registrations.
    if UserRepo::get_by_username(&state.pool, &req.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Username already taken"));
    }
    if UserRepo::get_by_email(&state.pool, &req.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Email already registered"));
    }

    let password_hash = hash_password(&req.password)?;
    let user = match UserRepo::create(
        &state.pool,
        Uuid::new_v4(),
        &req.username,
        &req.email,
        &password_hash,
    )
    .await
    {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::Conflict("Username or email already taken"));
        }
        Err(e) => return Err(ApiError::Internal(e)),
    };

    let token = create_access_token(&user.user_id.to_string(), &state.config.auth.jwt_secret)?;

    tracing::info!("Registered user {}", user.user_id);
    Ok(created(
        "User registered",
        json!({"user": user.to_user(), "token": token}),
    ))
}

/// POST /api/auth/login
#[tracing::instrument(skip(state, req))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    // Unknown email and wrong password are indistinguishable to the caller
    let user = UserRepo::get_by_email(&state.pool, &req.email)
        .await?
        .ok_or(ApiError::Unauthenticated(BAD_CREDENTIALS))?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::Unauthenticated(BAD_CREDENTIALS));
    }

    let token = create_access_token(&user.user_id.to_string(), &state.config.auth.jwt_secret)?;

    Ok(ok(
        "Login successful",
        json!({"user": user.to_user(), "token": token}),
    ))
}

/// GET /api/auth/verify
#[tracing::instrument(skip_all)]
pub async fn verify(user: CurrentUser) -> Response {
    ok("Token is valid", json!({"user": user.0.to_user()}))
}
