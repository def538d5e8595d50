//! Ticket model and read views.

use parkhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `tickets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: DbId,
    pub ticket_number: String,
    pub car_entry_id: DbId,
    pub issued_at: Timestamp,
}

/// Ticket joined with its entry and parking, as shown to staff.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketView {
    pub id: DbId,
    pub ticket_number: String,
    pub car_entry_id: DbId,
    pub plate_number: String,
    pub parking_name: String,
    pub parking_location: String,
    pub entry_date_time: Timestamp,
    pub issued_at: Timestamp,
}
