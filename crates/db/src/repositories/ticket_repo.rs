//! Repository for the `tickets` table.

use parkhub_core::ticket::generate_ticket_number;
use parkhub_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::ticket::{Ticket, TicketView};

const COLUMNS: &str = "id, ticket_number, car_entry_id, issued_at";

const VIEW_SELECT: &str = "SELECT t.id, t.ticket_number, t.car_entry_id, ce.plate_number, \
                                  p.name AS parking_name, p.location AS parking_location, \
                                  ce.entry_date_time, t.issued_at
                           FROM tickets t
                           JOIN car_entries ce ON ce.id = t.car_entry_id
                           JOIN parkings p ON p.id = ce.parking_id";

/// Result of [`TicketRepo::issue_for_entry`].
#[derive(Debug)]
pub enum IssueTicketOutcome {
    Issued(Ticket),
    EntryNotFound,
    AlreadyExists,
}

pub struct TicketRepo;

impl TicketRepo {
    /// Insert a ticket with a freshly generated number.
    pub async fn insert<'e, E: PgExecutor<'e>>(
        executor: E,
        car_entry_id: DbId,
    ) -> Result<Ticket, sqlx::Error> {
        let number = generate_ticket_number(chrono::Utc::now());
        let query = format!(
            "INSERT INTO tickets (ticket_number, car_entry_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(&number)
            .bind(car_entry_id)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_entry<'e, E: PgExecutor<'e>>(
        executor: E,
        car_entry_id: DbId,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE car_entry_id = $1");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(car_entry_id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_view_by_id(pool: &PgPool, id: DbId) -> Result<Option<TicketView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE t.id = $1");
        sqlx::query_as::<_, TicketView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_view_by_number(
        pool: &PgPool,
        ticket_number: &str,
    ) -> Result<Option<TicketView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE t.ticket_number = $1");
        sqlx::query_as::<_, TicketView>(&query)
            .bind(ticket_number)
            .fetch_optional(pool)
            .await
    }

    /// Issue the ticket for an entry that does not have one yet.
    ///
    /// The entry row is locked so two concurrent requests cannot both pass
    /// the existence check; `uq_tickets_car_entry_id` backs this up.
    pub async fn issue_for_entry(
        pool: &PgPool,
        car_entry_id: DbId,
    ) -> Result<IssueTicketOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let entry: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM car_entries WHERE id = $1 FOR UPDATE")
                .bind(car_entry_id)
                .fetch_optional(&mut *tx)
                .await?;
        if entry.is_none() {
            return Ok(IssueTicketOutcome::EntryNotFound);
        }

        if Self::find_by_entry(&mut *tx, car_entry_id).await?.is_some() {
            return Ok(IssueTicketOutcome::AlreadyExists);
        }

        let ticket = Self::insert(&mut *tx, car_entry_id).await?;
        tx.commit().await?;
        Ok(IssueTicketOutcome::Issued(ticket))
    }
}
