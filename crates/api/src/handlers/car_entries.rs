//! Handlers for the `/car-entries` resource: arrivals, departures and bills.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use parkhub_core::billing;
use parkhub_core::capacity::NO_SPACES_MSG;
use parkhub_core::pagination::PageRequest;
use parkhub_core::types::DbId;
use parkhub_db::models::car_entry::{Bill, CarEntryFilter, CarEntryView, EntryStatus, NewCarEntry};
use parkhub_db::repositories::{CarEntryRepo, EntryOutcome, ExitOutcome};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, AppQuery, ValidatedJson};
use crate::middleware::rbac::RequireStaff;
use crate::response::{ApiResponse, PagedResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarEntryRequest {
    #[validate(length(min = 1, max = 20, message = "Plate number is required"))]
    pub plate_number: String,
    #[validate(range(min = 1, message = "Parking ID must be a positive integer"))]
    pub parking_id: DbId,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarEntryListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub plate_number: Option<String>,
    pub parking_id: Option<DbId>,
    pub status: Option<EntryStatus>,
}

/// The closed entry plus the billed duration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitResponse {
    #[serde(flatten)]
    pub entry: CarEntryView,
    pub duration_hours: f64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/car-entries
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(attendant): RequireStaff,
    ValidatedJson(input): ValidatedJson<CreateCarEntryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CarEntryView>>)> {
    let arrival = NewCarEntry {
        plate_number: input.plate_number.trim().to_string(),
        parking_id: input.parking_id,
        attendant_id: Some(attendant.user_id),
    };

    let (entry, ticket) = match CarEntryRepo::register(&state.pool, &arrival).await? {
        EntryOutcome::Registered { entry, ticket } => (entry, ticket),
        EntryOutcome::ParkingNotFound => return Err(AppError::not_found("Parking")),
        EntryOutcome::NoSpaces => return Err(AppError::rule(NO_SPACES_MSG)),
    };

    tracing::info!(
        car_entry_id = entry.id,
        plate_number = %entry.plate_number,
        parking_id = entry.parking_id,
        attendant_id = attendant.user_id,
        ticket_number = %ticket.ticket_number,
        "Car entry registered"
    );

    let view = find_view(&state, entry.id).await?;
    Ok(ApiResponse::created("Car entry registered successfully", view))
}

/// GET /api/car-entries
pub async fn list(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    AppQuery(params): AppQuery<CarEntryListParams>,
) -> AppResult<PagedResponse<CarEntryView>> {
    let page = PageRequest::new(params.page, params.limit);
    let filter = CarEntryFilter {
        plate_number: params
            .plate_number
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()),
        parking_id: params.parking_id,
        status: params.status,
    };

    let entries = CarEntryRepo::list(&state.pool, &filter, page).await?;
    let total = CarEntryRepo::count(&state.pool, &filter).await?;
    Ok(PagedResponse::new(
        "Car entries retrieved successfully",
        entries,
        page,
        total,
    ))
}

/// GET /api/car-entries/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    AppPath(id): AppPath<DbId>,
) -> AppResult<ApiResponse<CarEntryView>> {
    let view = find_view(&state, id).await?;
    Ok(ApiResponse::ok("Car entry retrieved successfully", view))
}

/// PUT /api/car-entries/{id}/exit
pub async fn exit(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    AppPath(id): AppPath<DbId>,
) -> AppResult<ApiResponse<ExitResponse>> {
    let charge = match CarEntryRepo::exit(&state.pool, id).await? {
        ExitOutcome::Exited { charge, .. } => charge,
        ExitOutcome::NotFound => return Err(AppError::not_found("Car entry")),
        ExitOutcome::AlreadyExited => return Err(AppError::rule("Car has already exited")),
    };

    tracing::info!(
        car_entry_id = id,
        duration_hours = charge.duration_hours,
        charged_amount = charge.charged_amount,
        processed_by = staff.user_id,
        "Car exit registered"
    );

    let entry = find_view(&state, id).await?;
    Ok(ApiResponse::ok(
        "Car exit registered successfully",
        ExitResponse {
            entry,
            duration_hours: charge.duration_hours,
        },
    ))
}

/// GET /api/car-entries/{id}/bill
pub async fn bill(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    AppPath(id): AppPath<DbId>,
) -> AppResult<ApiResponse<Bill>> {
    let row = CarEntryRepo::find_bill(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Car entry"))?;

    let exit_date_time = row
        .exit_date_time
        .ok_or_else(|| AppError::rule("Car has not exited yet"))?;

    let duration_hours = billing::duration_hours(row.entry_date_time, exit_date_time);
    let charged_amount = row
        .charged_amount
        .unwrap_or_else(|| billing::calculate_charge(duration_hours, row.hourly_rate));

    let bill = Bill {
        id: row.id,
        plate_number: row.plate_number,
        ticket_number: row.ticket_number,
        parking_name: row.parking_name,
        parking_location: row.parking_location,
        entry_date_time: row.entry_date_time,
        exit_date_time,
        duration_hours,
        hourly_rate: row.hourly_rate,
        charged_amount,
        bill_date: Utc::now(),
    };
    Ok(ApiResponse::ok("Bill generated successfully", bill))
}

async fn find_view(state: &AppState, id: DbId) -> AppResult<CarEntryView> {
    CarEntryRepo::find_view(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Car entry"))
}
