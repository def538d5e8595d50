//! Handlers for the `/parking` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use parkhub_core::types::DbId;
use parkhub_db::models::parking::{CreateParking, Parking, UpdateParking};
use parkhub_db::repositories::{DeleteParkingOutcome, ParkingRepo, SpacesOutcome};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, AppQuery, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::{ApiResponse, PagedResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateParkingRequest {
    #[validate(length(min = 1, max = 50, message = "Parking code is required"))]
    pub code: String,
    #[validate(length(min = 1, message = "Parking name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[validate(range(min = 1, message = "Total spaces must be a positive integer"))]
    pub total_spaces: i32,
    #[validate(range(exclusive_min = 0.0, message = "Hourly rate must be a positive number"))]
    pub hourly_rate: f64,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParkingRequest {
    #[validate(length(min = 1, max = 50, message = "Parking code cannot be empty"))]
    pub code: Option<String>,
    #[validate(length(min = 1, message = "Parking name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Location cannot be empty"))]
    pub location: Option<String>,
    #[validate(range(min = 1, message = "Total spaces must be a positive integer"))]
    pub total_spaces: Option<i32>,
    #[validate(range(exclusive_min = 0.0, message = "Hourly rate must be a positive number"))]
    pub hourly_rate: Option<f64>,
}

/// Signed change applied to `availableSpaces`.
#[derive(Debug, Deserialize, Validate)]
pub struct AdjustSpacesRequest {
    pub change: i32,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/parking
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(input): ValidatedJson<CreateParkingRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Parking>>)> {
    let code = input.code.trim().to_string();
    if ParkingRepo::find_by_code(&state.pool, &code).await?.is_some() {
        return Err(AppError::conflict("Parking with this code already exists"));
    }

    let parking = ParkingRepo::create(
        &state.pool,
        &CreateParking {
            code,
            name: input.name.trim().to_string(),
            location: input.location.trim().to_string(),
            total_spaces: input.total_spaces,
            hourly_rate: input.hourly_rate,
        },
    )
    .await?;

    tracing::info!(
        parking_id = parking.id,
        code = %parking.code,
        total_spaces = parking.total_spaces,
        created_by = admin.user_id,
        "Parking created"
    );
    Ok(ApiResponse::created("Parking created successfully", parking))
}

/// GET /api/parking
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<PagedResponse<Parking>> {
    let page = params.page_request();
    let parkings = ParkingRepo::list(&state.pool, page).await?;
    let total = ParkingRepo::count(&state.pool).await?;
    Ok(PagedResponse::new(
        "Parkings retrieved successfully",
        parkings,
        page,
        total,
    ))
}

/// GET /api/parking/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<ApiResponse<Parking>> {
    let parking = ParkingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Parking"))?;
    Ok(ApiResponse::ok("Parking retrieved successfully", parking))
}

/// PUT /api/parking/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateParkingRequest>,
) -> AppResult<ApiResponse<Parking>> {
    let code = input.code.as_deref().map(str::trim).map(str::to_string);
    if let Some(code) = &code {
        if let Some(existing) = ParkingRepo::find_by_code(&state.pool, code).await? {
            if existing.id != id {
                return Err(AppError::conflict("Parking code is already in use"));
            }
        }
    }

    let changes = UpdateParking {
        code,
        name: input.name.map(|s| s.trim().to_string()),
        location: input.location.map(|s| s.trim().to_string()),
        total_spaces: input.total_spaces,
        hourly_rate: input.hourly_rate,
    };
    let parking = ParkingRepo::update(&state.pool, id, &changes)
        .await?
        .ok_or_else(|| AppError::not_found("Parking"))?;

    tracing::info!(
        parking_id = id,
        total_spaces = parking.total_spaces,
        available_spaces = parking.available_spaces,
        updated_by = admin.user_id,
        "Parking updated"
    );
    Ok(ApiResponse::ok("Parking updated successfully", parking))
}

/// DELETE /api/parking/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
) -> AppResult<ApiResponse<()>> {
    match ParkingRepo::delete(&state.pool, id).await? {
        DeleteParkingOutcome::Deleted => {
            tracing::info!(parking_id = id, deleted_by = admin.user_id, "Parking deleted");
            Ok(ApiResponse::ok("Parking deleted successfully", ()))
        }
        DeleteParkingOutcome::NotFound => Err(AppError::not_found("Parking")),
        DeleteParkingOutcome::HasActiveEntries(open) => {
            tracing::info!(parking_id = id, open, "Parking delete refused");
            Err(AppError::rule("Cannot delete parking with active car entries"))
        }
    }
}

/// PUT /api/parking/{id}/spaces
pub async fn update_spaces(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
    ValidatedJson(input): ValidatedJson<AdjustSpacesRequest>,
) -> AppResult<ApiResponse<Parking>> {
    match ParkingRepo::adjust_spaces(&state.pool, id, input.change).await? {
        SpacesOutcome::Adjusted(parking) => {
            tracing::info!(
                parking_id = id,
                change = input.change,
                available_spaces = parking.available_spaces,
                updated_by = admin.user_id,
                "Parking spaces adjusted"
            );
            Ok(ApiResponse::ok("Parking spaces updated successfully", parking))
        }
        SpacesOutcome::NotFound => Err(AppError::not_found("Parking")),
        SpacesOutcome::Rejected(err) => Err(err.into()),
    }
}
