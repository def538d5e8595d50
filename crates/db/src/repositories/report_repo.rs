//! Read-only queries behind the report endpoints.
//!
//! Detail rows are paginated; the aggregate inputs are fetched unpaginated so
//! totals always cover the whole filtered range.

use chrono::NaiveDate;
use parkhub_core::pagination::PageRequest;
use parkhub_core::reports::{self, ChargeRecord, EntryRecord, OccupancyRecord};
use sqlx::PgPool;

use crate::models::report::{
    ChargeRow, EnteredCar, EntryStatRow, OccupancyRow, OutgoingCar, ReportFilter,
};

const OUTGOING_WHERE: &str = "WHERE ce.exit_date_time IS NOT NULL
                                AND ce.exit_date_time >= $1 AND ce.exit_date_time < $2
                                AND ($3::BIGINT IS NULL OR ce.parking_id = $3)";

const ENTERED_WHERE: &str = "WHERE ce.entry_date_time >= $1 AND ce.entry_date_time < $2
                               AND ($3::BIGINT IS NULL OR ce.parking_id = $3)";

pub struct ReportRepo;

impl ReportRepo {
    /// One page of cars that exited in range, latest exit first.
    pub async fn outgoing_cars(
        pool: &PgPool,
        filter: &ReportFilter,
        page: PageRequest,
    ) -> Result<Vec<OutgoingCar>, sqlx::Error> {
        let query = format!(
            "SELECT ce.id, ce.plate_number, ce.parking_id, p.code AS parking_code,
                    p.name AS parking_name, t.ticket_number, ce.entry_date_time,
                    ce.exit_date_time, COALESCE(ce.charged_amount, 0) AS charged_amount
             FROM car_entries ce
             JOIN parkings p ON p.id = ce.parking_id
             LEFT JOIN tickets t ON t.car_entry_id = ce.id
             {OUTGOING_WHERE}
             ORDER BY ce.exit_date_time DESC, ce.id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, OutgoingCar>(&query)
            .bind(filter.range.start)
            .bind(filter.range.end)
            .bind(filter.parking_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Parking, exit time and charge of every car that exited in range.
    pub async fn charges(
        pool: &PgPool,
        filter: &ReportFilter,
    ) -> Result<Vec<ChargeRecord>, sqlx::Error> {
        let query = format!(
            "SELECT ce.parking_id, p.name AS parking_name, ce.exit_date_time,
                    COALESCE(ce.charged_amount, 0) AS charged_amount
             FROM car_entries ce
             JOIN parkings p ON p.id = ce.parking_id
             {OUTGOING_WHERE}
             ORDER BY ce.exit_date_time ASC"
        );
        let rows = sqlx::query_as::<_, ChargeRow>(&query)
            .bind(filter.range.start)
            .bind(filter.range.end)
            .bind(filter.parking_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(ChargeRecord::from).collect())
    }

    /// One page of cars that entered in range, latest arrival first.
    pub async fn entered_cars(
        pool: &PgPool,
        filter: &ReportFilter,
        page: PageRequest,
    ) -> Result<Vec<EnteredCar>, sqlx::Error> {
        let query = format!(
            "SELECT ce.id, ce.plate_number, ce.parking_id, p.code AS parking_code,
                    p.name AS parking_name, t.ticket_number, ce.entry_date_time,
                    ce.exit_date_time, ce.charged_amount
             FROM car_entries ce
             JOIN parkings p ON p.id = ce.parking_id
             LEFT JOIN tickets t ON t.car_entry_id = ce.id
             {ENTERED_WHERE}
             ORDER BY ce.entry_date_time DESC, ce.id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, EnteredCar>(&query)
            .bind(filter.range.start)
            .bind(filter.range.end)
            .bind(filter.parking_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Parking and exit state of every car that entered in range.
    pub async fn entry_stats(
        pool: &PgPool,
        filter: &ReportFilter,
    ) -> Result<Vec<EntryRecord>, sqlx::Error> {
        let query = format!(
            "SELECT ce.parking_id, p.name AS parking_name,
                    ce.exit_date_time IS NOT NULL AS exited
             FROM car_entries ce
             JOIN parkings p ON p.id = ce.parking_id
             {ENTERED_WHERE}"
        );
        let rows = sqlx::query_as::<_, EntryStatRow>(&query)
            .bind(filter.range.start)
            .bind(filter.range.end)
            .bind(filter.parking_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(EntryRecord::from).collect())
    }

    /// Per parking, the number of stays that overlapped `date`: entered that
    /// day, or entered earlier and were still parked at the start of it.
    pub async fn occupancy(
        pool: &PgPool,
        date: NaiveDate,
    ) -> Result<Vec<OccupancyRecord>, sqlx::Error> {
        let (day_start, next_day_start) = reports::day_span(date);
        let rows = sqlx::query_as::<_, OccupancyRow>(
            "SELECT p.id AS parking_id, p.name AS parking_name, p.total_spaces,
                    p.available_spaces, COUNT(ce.id) AS utilised_spaces
             FROM parkings p
             LEFT JOIN car_entries ce
                    ON ce.parking_id = p.id
                   AND ce.entry_date_time < $2
                   AND (ce.exit_date_time IS NULL OR ce.exit_date_time >= $1)
             GROUP BY p.id
             ORDER BY p.code ASC",
        )
        .bind(day_start)
        .bind(next_day_start)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(OccupancyRecord::from).collect())
    }
}
