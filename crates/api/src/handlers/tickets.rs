//! Handlers for the `/tickets` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use parkhub_core::types::DbId;
use parkhub_db::models::ticket::TicketView;
use parkhub_db::repositories::{IssueTicketOutcome, TicketRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, ValidatedJson};
use crate::middleware::rbac::RequireStaff;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTicketRequest {
    #[validate(range(min = 1, message = "Car entry ID must be a positive integer"))]
    pub car_entry_id: DbId,
}

/// POST /api/tickets
///
/// Issue the ticket for an entry that lost or never had one.
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ValidatedJson(input): ValidatedJson<GenerateTicketRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<TicketView>>)> {
    let ticket = match TicketRepo::issue_for_entry(&state.pool, input.car_entry_id).await? {
        IssueTicketOutcome::Issued(ticket) => ticket,
        IssueTicketOutcome::EntryNotFound => return Err(AppError::not_found("Car entry")),
        IssueTicketOutcome::AlreadyExists => {
            return Err(AppError::rule("Ticket already exists for this entry"))
        }
    };

    tracing::info!(
        ticket_id = ticket.id,
        ticket_number = %ticket.ticket_number,
        car_entry_id = ticket.car_entry_id,
        issued_by = staff.user_id,
        "Ticket generated"
    );

    let view = TicketRepo::find_view_by_id(&state.pool, ticket.id)
        .await?
        .ok_or_else(|| AppError::not_found("Ticket"))?;
    Ok(ApiResponse::created("Ticket generated successfully", view))
}

/// GET /api/tickets/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    AppPath(id): AppPath<DbId>,
) -> AppResult<ApiResponse<TicketView>> {
    let ticket = TicketRepo::find_view_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Ticket"))?;
    Ok(ApiResponse::ok("Ticket retrieved successfully", ticket))
}

/// GET /api/tickets/number/{ticket_number}
pub async fn get_by_number(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    AppPath(ticket_number): AppPath<String>,
) -> AppResult<ApiResponse<TicketView>> {
    let ticket = TicketRepo::find_view_by_number(&state.pool, &ticket_number)
        .await?
        .ok_or_else(|| AppError::not_found("Ticket"))?;
    Ok(ApiResponse::ok("Ticket retrieved successfully", ticket))
}
