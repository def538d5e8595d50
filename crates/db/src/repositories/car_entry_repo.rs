//! Repository for the `car_entries` table.
//!
//! Registration and exit are the only writers of the parking space counter
//! besides manual adjustment; both run in a single transaction with the
//! entry and ticket writes.

use chrono::Utc;
use parkhub_core::billing::{self, ChargeBreakdown};
use parkhub_core::pagination::PageRequest;
use parkhub_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::car_entry::{
    BillRow, CarEntry, CarEntryDetailRow, CarEntryFilter, CarEntryView, EntryStatus, NewCarEntry,
};
use crate::models::ticket::Ticket;
use crate::repositories::ticket_repo::TicketRepo;

const COLUMNS: &str = "id, plate_number, parking_id, attendant_id, entry_date_time, \
                       exit_date_time, charged_amount, created_at, updated_at";

const DETAIL_SELECT: &str = "SELECT ce.id, ce.plate_number, ce.parking_id, ce.attendant_id, \
                                    ce.entry_date_time, ce.exit_date_time, ce.charged_amount, \
                                    ce.created_at, ce.updated_at, \
                                    p.code AS parking_code, p.name AS parking_name, \
                                    p.location AS parking_location, p.hourly_rate, \
                                    t.id AS ticket_id, t.ticket_number, \
                                    t.issued_at AS ticket_issued_at, \
                                    u.first_name AS attendant_first_name, \
                                    u.last_name AS attendant_last_name
                             FROM car_entries ce
                             JOIN parkings p ON p.id = ce.parking_id
                             LEFT JOIN tickets t ON t.car_entry_id = ce.id
                             LEFT JOIN users u ON u.id = ce.attendant_id";

/// `$1` plate pattern, `$2` parking id, `$3` status; each NULL means "any".
const FILTER_WHERE: &str = "WHERE ($1::TEXT IS NULL OR ce.plate_number ILIKE $1 ESCAPE '\\')
                              AND ($2::BIGINT IS NULL OR ce.parking_id = $2)
                              AND ($3::TEXT IS NULL
                                   OR ($3 = 'active' AND ce.exit_date_time IS NULL)
                                   OR ($3 = 'completed' AND ce.exit_date_time IS NOT NULL))";

/// Result of [`CarEntryRepo::register`].
#[derive(Debug)]
pub enum EntryOutcome {
    Registered { entry: CarEntry, ticket: Ticket },
    ParkingNotFound,
    NoSpaces,
}

/// Result of [`CarEntryRepo::exit`].
#[derive(Debug)]
pub enum ExitOutcome {
    Exited {
        entry: CarEntry,
        charge: ChargeBreakdown,
    },
    NotFound,
    AlreadyExited,
}

pub struct CarEntryRepo;

impl CarEntryRepo {
    /// Take one space, record the entry and issue its ticket atomically.
    ///
    /// The space is claimed with a conditional decrement, so concurrent
    /// registrations can never push the counter below zero.
    pub async fn register(pool: &PgPool, input: &NewCarEntry) -> Result<EntryOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let claimed = sqlx::query(
            "UPDATE parkings SET available_spaces = available_spaces - 1
             WHERE id = $1 AND available_spaces > 0",
        )
        .bind(input.parking_id)
        .execute(&mut *tx)
        .await?;

        if claimed.rows_affected() == 0 {
            let (exists,): (bool,) =
                sqlx::query_as("SELECT EXISTS (SELECT 1 FROM parkings WHERE id = $1)")
                    .bind(input.parking_id)
                    .fetch_one(&mut *tx)
                    .await?;
            return Ok(if exists {
                EntryOutcome::NoSpaces
            } else {
                EntryOutcome::ParkingNotFound
            });
        }

        let query = format!(
            "INSERT INTO car_entries (plate_number, parking_id, attendant_id, entry_date_time)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let entry = sqlx::query_as::<_, CarEntry>(&query)
            .bind(&input.plate_number)
            .bind(input.parking_id)
            .bind(input.attendant_id)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

        let ticket = TicketRepo::insert(&mut *tx, entry.id).await?;

        tx.commit().await?;
        Ok(EntryOutcome::Registered { entry, ticket })
    }

    /// Close an open entry: bill it and give its space back.
    pub async fn exit(pool: &PgPool, id: DbId) -> Result<ExitOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(DbId, Timestamp, Option<Timestamp>, f64)> = sqlx::query_as(
            "SELECT ce.parking_id, ce.entry_date_time, ce.exit_date_time, p.hourly_rate
             FROM car_entries ce
             JOIN parkings p ON p.id = ce.parking_id
             WHERE ce.id = $1
             FOR UPDATE OF ce",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((parking_id, entered_at, exited_at, hourly_rate)) = locked else {
            return Ok(ExitOutcome::NotFound);
        };
        if exited_at.is_some() {
            return Ok(ExitOutcome::AlreadyExited);
        }

        let now = Utc::now();
        let charge = billing::compute_charge(entered_at, now, hourly_rate);

        let query = format!(
            "UPDATE car_entries SET exit_date_time = $2, charged_amount = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let entry = sqlx::query_as::<_, CarEntry>(&query)
            .bind(id)
            .bind(now)
            .bind(charge.charged_amount)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE parkings SET available_spaces = LEAST(available_spaces + 1, total_spaces)
             WHERE id = $1",
        )
        .bind(parking_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(ExitOutcome::Exited { entry, charge })
    }

    /// An entry with its parking, ticket and attendant.
    pub async fn find_view(pool: &PgPool, id: DbId) -> Result<Option<CarEntryView>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE ce.id = $1");
        let row = sqlx::query_as::<_, CarEntryDetailRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(CarEntryView::from))
    }

    /// One page of entries matching `filter`, most recent arrival first.
    pub async fn list(
        pool: &PgPool,
        filter: &CarEntryFilter,
        page: PageRequest,
    ) -> Result<Vec<CarEntryView>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT} {FILTER_WHERE}
             ORDER BY ce.entry_date_time DESC, ce.id DESC
             LIMIT $4 OFFSET $5"
        );
        let rows = sqlx::query_as::<_, CarEntryDetailRow>(&query)
            .bind(filter.plate_number.as_deref().map(contains_pattern))
            .bind(filter.parking_id)
            .bind(filter.status.map(status_name))
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(CarEntryView::from).collect())
    }

    pub async fn count(pool: &PgPool, filter: &CarEntryFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM car_entries ce {FILTER_WHERE}");
        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(filter.plate_number.as_deref().map(contains_pattern))
            .bind(filter.parking_id)
            .bind(filter.status.map(status_name))
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Data for the bill of one entry, closed or not.
    pub async fn find_bill(pool: &PgPool, id: DbId) -> Result<Option<BillRow>, sqlx::Error> {
        sqlx::query_as::<_, BillRow>(
            "SELECT ce.id, ce.plate_number, t.ticket_number,
                    p.name AS parking_name, p.location AS parking_location,
                    ce.entry_date_time, ce.exit_date_time, p.hourly_rate, ce.charged_amount
             FROM car_entries ce
             JOIN parkings p ON p.id = ce.parking_id
             LEFT JOIN tickets t ON t.car_entry_id = ce.id
             WHERE ce.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}

fn status_name(status: EntryStatus) -> &'static str {
    match status {
        EntryStatus::Active => "active",
        EntryStatus::Completed => "completed",
    }
}

/// `ILIKE` pattern matching `needle` anywhere, with wildcards escaped.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
