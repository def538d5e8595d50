//! JWT-based authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use parkhub_core::roles::Role;
use parkhub_core::types::DbId;
use parkhub_db::repositories::UserRepo;

use crate::auth::jwt::{validate_token, TokenError};
use crate::error::AppError;
use crate::state::AppState;

/// The user behind a valid `Authorization: Bearer <token>` header.
///
/// The token only identifies the user; the role is read from the database
/// on every request so role changes and deletions take effect immediately.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins may act on anyone; everyone else only on themselves.
    pub fn can_access_user(&self, user_id: DbId) -> bool {
        self.is_admin() || self.user_id == user_id
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Access denied. No token provided"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::unauthorized("Invalid Authorization format. Expected: Bearer <token>")
            })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|e| match e {
            TokenError::Expired => AppError::unauthorized("Token expired. Please login again."),
            TokenError::Invalid => AppError::unauthorized("Invalid token"),
        })?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized("User associated with this token no longer exists")
            })?;

        Ok(AuthUser {
            user_id: user.id,
            role: user.role(),
        })
    }
}
