//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role is not
//! allowed with 403.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use parkhub_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

pub const ACCESS_DENIED_MSG: &str =
    "Access denied. You do not have permission to perform this action";

fn require(user: AuthUser, allowed: impl Fn(Role) -> bool) -> Result<AuthUser, AppError> {
    if allowed(user.role) {
        Ok(user)
    } else {
        tracing::warn!(user_id = user.user_id, role = %user.role, "Role not permitted");
        Err(AppError::forbidden(ACCESS_DENIED_MSG))
    }
}

/// Requires the `ADMIN` role.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require(user, |role| role == Role::Admin).map(RequireAdmin)
    }
}

/// Requires `ADMIN` or `ATTENDANT`: the roles that run the gates.
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require(user, Role::is_staff).map(RequireStaff)
    }
}
