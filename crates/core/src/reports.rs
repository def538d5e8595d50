//! Report date handling and aggregation.
//!
//! The database layer fetches narrow rows for a date range; everything that
//! turns those rows into totals, averages and groupings lives here.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

pub const INVALID_RANGE_MSG: &str = "Start date must be before end date";

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Which end of a range a raw date string describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Start,
    End,
}

/// Parse a report date given as `YYYY-MM-DD` or RFC 3339.
///
/// A bare date used as the end bound resolves to the following midnight, so
/// the exclusive range end still covers that whole day.
pub fn parse_report_date(raw: &str, bound: RangeBound) -> Result<Timestamp, CoreError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CoreError::Validation(format!("Invalid date: {raw}")))?;
    let (start, next_start) = day_span(date);
    Ok(match bound {
        RangeBound::Start => start,
        RangeBound::End => next_start,
    })
}

/// Parse the calendar day of a single-day report.
pub fn parse_report_day(raw: &str) -> Result<NaiveDate, CoreError> {
    parse_report_date(raw, RangeBound::Start).map(|ts| ts.date_naive())
}

/// Start of a UTC calendar day and start of the next one.
pub fn day_span(date: NaiveDate) -> (Timestamp, Timestamp) {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    let next_start = date
        .checked_add_days(Days::new(1))
        .map(|next| next.and_time(NaiveTime::MIN).and_utc())
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    (start, next_start)
}

/// A half-open date range, `start <= t < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl DateRange {
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, CoreError> {
        if start >= end {
            return Err(CoreError::Validation(INVALID_RANGE_MSG.into()));
        }
        Ok(Self { start, end })
    }

    /// Parse both bounds and check their order.
    pub fn parse(start: &str, end: &str) -> Result<Self, CoreError> {
        Self::new(
            parse_report_date(start, RangeBound::Start)?,
            parse_report_date(end, RangeBound::End)?,
        )
    }
}

/// Round to the nearest cent; used on sums so float noise does not leak
/// into responses.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Outgoing cars
// ---------------------------------------------------------------------------

/// One closed stay, as needed for revenue aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeRecord {
    pub parking_id: DbId,
    pub parking_name: String,
    pub exit_date_time: Timestamp,
    pub charged_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingParkingStat {
    pub parking_id: DbId,
    pub parking_name: String,
    pub count: i64,
    pub total_charged: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingSummary {
    pub total_cars: i64,
    pub total_charged: f64,
    pub average_charge: f64,
    pub parking_stats: Vec<OutgoingParkingStat>,
}

pub fn summarize_outgoing(records: &[ChargeRecord]) -> OutgoingSummary {
    let mut stats: BTreeMap<DbId, OutgoingParkingStat> = BTreeMap::new();
    let mut total_charged = 0.0;

    for record in records {
        total_charged += record.charged_amount;
        let stat = stats
            .entry(record.parking_id)
            .or_insert_with(|| OutgoingParkingStat {
                parking_id: record.parking_id,
                parking_name: record.parking_name.clone(),
                count: 0,
                total_charged: 0.0,
            });
        stat.count += 1;
        stat.total_charged += record.charged_amount;
    }

    let total_cars = records.len() as i64;
    let average_charge = if total_cars > 0 {
        round2(total_charged / total_cars as f64)
    } else {
        0.0
    };

    OutgoingSummary {
        total_cars,
        total_charged: round2(total_charged),
        average_charge,
        parking_stats: stats
            .into_values()
            .map(|mut s| {
                s.total_charged = round2(s.total_charged);
                s
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Entered cars
// ---------------------------------------------------------------------------

/// One stay that started inside the report range.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryRecord {
    pub parking_id: DbId,
    pub parking_name: String,
    pub exited: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnteredParkingStat {
    pub parking_id: DbId,
    pub parking_name: String,
    pub count: i64,
    pub active: i64,
    pub completed: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnteredSummary {
    pub total_cars: i64,
    pub active_count: i64,
    pub completed_count: i64,
    pub parking_stats: Vec<EnteredParkingStat>,
}

pub fn summarize_entered(records: &[EntryRecord]) -> EnteredSummary {
    let mut stats: BTreeMap<DbId, EnteredParkingStat> = BTreeMap::new();
    let mut completed_count = 0;

    for record in records {
        let stat = stats
            .entry(record.parking_id)
            .or_insert_with(|| EnteredParkingStat {
                parking_id: record.parking_id,
                parking_name: record.parking_name.clone(),
                count: 0,
                active: 0,
                completed: 0,
            });
        stat.count += 1;
        if record.exited {
            stat.completed += 1;
            completed_count += 1;
        } else {
            stat.active += 1;
        }
    }

    let total_cars = records.len() as i64;
    EnteredSummary {
        total_cars,
        active_count: total_cars - completed_count,
        completed_count,
        parking_stats: stats.into_values().collect(),
    }
}

// ---------------------------------------------------------------------------
// Daily revenue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub count: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenueReport {
    pub total_revenue: f64,
    pub total_cars: i64,
    pub daily_data: Vec<DailyRevenue>,
}

/// Group closed stays by the UTC day they exited, oldest day first.
pub fn daily_revenue(records: &[ChargeRecord]) -> DailyRevenueReport {
    let mut days: BTreeMap<NaiveDate, DailyRevenue> = BTreeMap::new();

    for record in records {
        let date = record.exit_date_time.date_naive();
        let day = days.entry(date).or_insert_with(|| DailyRevenue {
            date,
            count: 0,
            revenue: 0.0,
        });
        day.count += 1;
        day.revenue += record.charged_amount;
    }

    let daily_data: Vec<DailyRevenue> = days
        .into_values()
        .map(|mut d| {
            d.revenue = round2(d.revenue);
            d
        })
        .collect();

    DailyRevenueReport {
        total_revenue: round2(daily_data.iter().map(|d| d.revenue).sum()),
        total_cars: daily_data.iter().map(|d| d.count).sum(),
        daily_data,
    }
}

// ---------------------------------------------------------------------------
// Utilization
// ---------------------------------------------------------------------------

/// Per-parking occupancy count for one day, as read from the database.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyRecord {
    pub parking_id: DbId,
    pub parking_name: String,
    pub total_spaces: i32,
    pub available_spaces: i32,
    pub utilised_spaces: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingUtilization {
    pub parking_id: DbId,
    pub parking_name: String,
    pub total_spaces: i32,
    pub utilised_spaces: i64,
    pub utilization_percentage: f64,
    pub current_available_spaces: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilizationReport {
    pub date: NaiveDate,
    pub total_parkings: usize,
    pub average_utilization: f64,
    pub parking_data: Vec<ParkingUtilization>,
}

/// `utilised / total * 100`, rounded to two decimals. A parking without
/// spaces reports zero.
pub fn utilization_percentage(utilised: i64, total_spaces: i32) -> f64 {
    if total_spaces <= 0 {
        return 0.0;
    }
    round2(utilised as f64 / f64::from(total_spaces) * 100.0)
}

pub fn utilization_report(date: NaiveDate, records: Vec<OccupancyRecord>) -> UtilizationReport {
    let parking_data: Vec<ParkingUtilization> = records
        .into_iter()
        .map(|r| ParkingUtilization {
            utilization_percentage: utilization_percentage(r.utilised_spaces, r.total_spaces),
            parking_id: r.parking_id,
            parking_name: r.parking_name,
            total_spaces: r.total_spaces,
            utilised_spaces: r.utilised_spaces,
            current_available_spaces: r.available_spaces,
        })
        .collect();

    let average_utilization = if parking_data.is_empty() {
        0.0
    } else {
        round2(
            parking_data
                .iter()
                .map(|p| p.utilization_percentage)
                .sum::<f64>()
                / parking_data.len() as f64,
        )
    };

    UtilizationReport {
        date,
        total_parkings: parking_data.len(),
        average_utilization,
        parking_data,
    }
}
