//! Car entry model, filters and joined views.

use parkhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::parking::ParkingBrief;

/// A row from the `car_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarEntry {
    pub id: DbId,
    pub plate_number: String,
    pub parking_id: DbId,
    pub attendant_id: Option<DbId>,
    pub entry_date_time: Timestamp,
    pub exit_date_time: Option<Timestamp>,
    pub charged_amount: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct NewCarEntry {
    pub plate_number: String,
    pub parking_id: DbId,
    pub attendant_id: Option<DbId>,
}

/// `active` entries are still parked; `completed` ones have exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, Default)]
pub struct CarEntryFilter {
    /// Case-insensitive substring match.
    pub plate_number: Option<String>,
    pub parking_id: Option<DbId>,
    pub status: Option<EntryStatus>,
}

/// Flat join of an entry with its parking, ticket and attendant.
#[derive(Debug, Clone, FromRow)]
pub struct CarEntryDetailRow {
    pub id: DbId,
    pub plate_number: String,
    pub parking_id: DbId,
    pub attendant_id: Option<DbId>,
    pub entry_date_time: Timestamp,
    pub exit_date_time: Option<Timestamp>,
    pub charged_amount: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub parking_code: String,
    pub parking_name: String,
    pub parking_location: String,
    pub hourly_rate: f64,
    pub ticket_id: Option<DbId>,
    pub ticket_number: Option<String>,
    pub ticket_issued_at: Option<Timestamp>,
    pub attendant_first_name: Option<String>,
    pub attendant_last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketBrief {
    pub id: DbId,
    pub ticket_number: String,
    pub issued_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendantBrief {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
}

/// Car entry as returned by the API, with its related records nested.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarEntryView {
    pub id: DbId,
    pub plate_number: String,
    pub parking_id: DbId,
    pub attendant_id: Option<DbId>,
    pub entry_date_time: Timestamp,
    pub exit_date_time: Option<Timestamp>,
    pub charged_amount: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub parking: ParkingBrief,
    pub ticket: Option<TicketBrief>,
    pub attendant: Option<AttendantBrief>,
}

impl From<CarEntryDetailRow> for CarEntryView {
    fn from(row: CarEntryDetailRow) -> Self {
        let ticket = match (row.ticket_id, row.ticket_number, row.ticket_issued_at) {
            (Some(id), Some(ticket_number), Some(issued_at)) => Some(TicketBrief {
                id,
                ticket_number,
                issued_at,
            }),
            _ => None,
        };
        let attendant = match (row.attendant_id, row.attendant_first_name, row.attendant_last_name)
        {
            (Some(id), Some(first_name), Some(last_name)) => Some(AttendantBrief {
                id,
                first_name,
                last_name,
            }),
            _ => None,
        };
        Self {
            id: row.id,
            plate_number: row.plate_number,
            parking_id: row.parking_id,
            attendant_id: row.attendant_id,
            entry_date_time: row.entry_date_time,
            exit_date_time: row.exit_date_time,
            charged_amount: row.charged_amount,
            created_at: row.created_at,
            updated_at: row.updated_at,
            parking: ParkingBrief {
                id: row.parking_id,
                code: row.parking_code,
                name: row.parking_name,
                location: row.parking_location,
                hourly_rate: row.hourly_rate,
            },
            ticket,
            attendant,
        }
    }
}

/// Everything needed to print a bill for a closed entry.
#[derive(Debug, Clone, FromRow)]
pub struct BillRow {
    pub id: DbId,
    pub plate_number: String,
    pub ticket_number: Option<String>,
    pub parking_name: String,
    pub parking_location: String,
    pub entry_date_time: Timestamp,
    pub exit_date_time: Option<Timestamp>,
    pub hourly_rate: f64,
    pub charged_amount: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: DbId,
    pub plate_number: String,
    pub ticket_number: Option<String>,
    pub parking_name: String,
    pub parking_location: String,
    pub entry_date_time: Timestamp,
    pub exit_date_time: Timestamp,
    pub duration_hours: f64,
    pub hourly_rate: f64,
    pub charged_amount: f64,
    pub bill_date: Timestamp,
}
