//! Handlers for the `/users` resource.
//!
//! Admins manage every account; other users only see and edit their own.

use axum::extract::State;
use parkhub_core::roles::Role;
use parkhub_core::types::DbId;
use parkhub_db::models::user::{UpdateUser, UserResponse};
use parkhub_db::repositories::UserRepo;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::auth::password::{hash_password, strong_password};
use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, AppQuery, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, ACCESS_DENIED_MSG};
use crate::query::PaginationParams;
use crate::response::{ApiResponse, PagedResponse};
use crate::state::AppState;

/// Request body for profile and user updates. Absent fields are kept.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: Option<String>,
    #[validate(custom(function = strong_password))]
    pub password: Option<String>,
    #[validate(custom(function = known_role))]
    pub role: Option<String>,
}

/// Accepts any role name [`Role`] can parse, in any case.
pub fn known_role(raw: &str) -> Result<(), ValidationError> {
    raw.parse::<Role>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("role");
        err.message = Some("Role must be one of ADMIN, ATTENDANT, USER".into());
        err
    })
}

/// Emails are compared case-insensitively by storing them lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// GET /api/users
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<PagedResponse<UserResponse>> {
    let page = params.page_request();
    let users = UserRepo::list(&state.pool, page).await?;
    let total = UserRepo::count(&state.pool).await?;

    let data = users.into_iter().map(UserResponse::from).collect();
    Ok(PagedResponse::new("Users retrieved successfully", data, page, total))
}

/// GET /api/users/profile
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<ApiResponse<UserResponse>> {
    let found = find_user(&state, user.user_id).await?;
    Ok(ApiResponse::ok("Profile retrieved successfully", found))
}

/// PUT /api/users/profile
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<UpdateUserRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = apply_update(&state, &user, user.user_id, input).await?;
    Ok(ApiResponse::ok("Profile updated successfully", updated))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<ApiResponse<UserResponse>> {
    ensure_can_access(&user, id)?;
    let found = find_user(&state, id).await?;
    Ok(ApiResponse::ok("User retrieved successfully", found))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateUserRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    ensure_can_access(&user, id)?;
    let updated = apply_update(&state, &user, id, input).await?;
    Ok(ApiResponse::ok("User updated successfully", updated))
}

/// DELETE /api/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<ApiResponse<()>> {
    ensure_can_access(&user, id)?;
    if !UserRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("User"));
    }
    tracing::info!(user_id = id, deleted_by = user.user_id, "User deleted");
    Ok(ApiResponse::ok("User deleted successfully", ()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ensure_can_access(user: &AuthUser, target: DbId) -> AppResult<()> {
    if user.can_access_user(target) {
        Ok(())
    } else {
        Err(AppError::forbidden(ACCESS_DENIED_MSG))
    }
}

async fn find_user(state: &AppState, id: DbId) -> AppResult<UserResponse> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .map(UserResponse::from)
        .ok_or_else(|| AppError::not_found("User"))
}

async fn apply_update(
    state: &AppState,
    actor: &AuthUser,
    target: DbId,
    input: UpdateUserRequest,
) -> AppResult<UserResponse> {
    let role = match input.role.as_deref() {
        Some(_) if !actor.is_admin() => {
            return Err(AppError::forbidden("Only admins can change user roles"));
        }
        Some(raw) => Some(
            raw.parse::<Role>()
                .map_err(|e| AppError::BadRequest(e.to_string()))?,
        ),
        None => None,
    };

    let email = input.email.as_deref().map(normalize_email);
    if let Some(email) = &email {
        if let Some(existing) = UserRepo::find_by_email(&state.pool, email).await? {
            if existing.id != target {
                return Err(AppError::conflict("Email is already in use"));
            }
        }
    }

    let password_hash = input
        .password
        .as_deref()
        .map(hash_password)
        .transpose()
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let changes = UpdateUser {
        first_name: input.first_name.map(|s| s.trim().to_string()),
        last_name: input.last_name.map(|s| s.trim().to_string()),
        email,
        password_hash,
        role,
    };

    let updated = UserRepo::update(&state.pool, target, &changes)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    tracing::info!(user_id = target, updated_by = actor.user_id, "User updated");
    Ok(UserResponse::from(updated))
}
