//! Handlers for the `/auth` resource (register, login).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use parkhub_core::roles::Role;
use parkhub_db::models::user::{CreateUser, User, UserResponse};
use parkhub_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, strong_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::users::{known_role, normalize_email};
use crate::response::ApiResponse;
use crate::state::AppState;

const INVALID_CREDENTIALS_MSG: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(custom(function = strong_password))]
    pub password: String,
    /// Defaults to `USER`.
    #[validate(custom(function = known_role))]
    pub role: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: UserResponse,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthPayload>>)> {
    let email = normalize_email(&input.email);

    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::conflict("User with this email already exists"));
    }

    let role = input
        .role
        .as_deref()
        .and_then(|r| r.parse::<Role>().ok())
        .unwrap_or_default();

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email,
            password_hash,
            role,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, role = %role, "User registered");

    let payload = auth_payload(&state, &user)?;
    Ok(ApiResponse::created("User registered successfully", payload))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<ApiResponse<AuthPayload>> {
    let user = UserRepo::find_by_email(&state.pool, &normalize_email(&input.email))
        .await?
        .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS_MSG))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(AppError::unauthorized(INVALID_CREDENTIALS_MSG));
    }

    tracing::info!(user_id = user.id, "User logged in");

    let payload = auth_payload(&state, &user)?;
    Ok(ApiResponse::ok("Login successful", payload))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn auth_payload(state: &AppState, user: &User) -> AppResult<AuthPayload> {
    let token = generate_access_token(user.id, user.role().as_str(), &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    Ok(AuthPayload {
        user: UserResponse::from(user),
        token,
    })
}
