//! Narrow rows read by the report queries.

use parkhub_core::reports::{ChargeRecord, DateRange, EntryRecord, OccupancyRecord};
use parkhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Range plus optional parking scope shared by the range reports.
#[derive(Debug, Clone, Copy)]
pub struct ReportFilter {
    pub range: DateRange,
    pub parking_id: Option<DbId>,
}

/// A car that left inside the range.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingCar {
    pub id: DbId,
    pub plate_number: String,
    pub parking_id: DbId,
    pub parking_code: String,
    pub parking_name: String,
    pub ticket_number: Option<String>,
    pub entry_date_time: Timestamp,
    pub exit_date_time: Timestamp,
    pub charged_amount: f64,
}

/// A car that arrived inside the range, parked or not.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnteredCar {
    pub id: DbId,
    pub plate_number: String,
    pub parking_id: DbId,
    pub parking_code: String,
    pub parking_name: String,
    pub ticket_number: Option<String>,
    pub entry_date_time: Timestamp,
    pub exit_date_time: Option<Timestamp>,
    pub charged_amount: Option<f64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ChargeRow {
    pub parking_id: DbId,
    pub parking_name: String,
    pub exit_date_time: Timestamp,
    pub charged_amount: f64,
}

impl From<ChargeRow> for ChargeRecord {
    fn from(row: ChargeRow) -> Self {
        Self {
            parking_id: row.parking_id,
            parking_name: row.parking_name,
            exit_date_time: row.exit_date_time,
            charged_amount: row.charged_amount,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct EntryStatRow {
    pub parking_id: DbId,
    pub parking_name: String,
    pub exited: bool,
}

impl From<EntryStatRow> for EntryRecord {
    fn from(row: EntryStatRow) -> Self {
        Self {
            parking_id: row.parking_id,
            parking_name: row.parking_name,
            exited: row.exited,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct OccupancyRow {
    pub parking_id: DbId,
    pub parking_name: String,
    pub total_spaces: i32,
    pub available_spaces: i32,
    pub utilised_spaces: i64,
}

impl From<OccupancyRow> for OccupancyRecord {
    fn from(row: OccupancyRow) -> Self {
        Self {
            parking_id: row.parking_id,
            parking_name: row.parking_name,
            total_spaces: row.total_spaces,
            available_spaces: row.available_spaces,
            utilised_spaces: row.utilised_spaces,
        }
    }
}
