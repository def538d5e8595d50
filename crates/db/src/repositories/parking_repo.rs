//! Repository for the `parkings` table and its space counter.

use parkhub_core::capacity;
use parkhub_core::error::CoreError;
use parkhub_core::pagination::PageRequest;
use parkhub_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::parking::{CreateParking, Parking, UpdateParking};

const COLUMNS: &str = "id, code, name, location, total_spaces, available_spaces, \
                       hourly_rate, created_at, updated_at";

/// Result of [`ParkingRepo::delete`].
#[derive(Debug)]
pub enum DeleteParkingOutcome {
    Deleted,
    NotFound,
    HasActiveEntries(i64),
}

/// Result of [`ParkingRepo::adjust_spaces`].
#[derive(Debug)]
pub enum SpacesOutcome {
    Adjusted(Parking),
    NotFound,
    Rejected(CoreError),
}

pub struct ParkingRepo;

impl ParkingRepo {
    /// Insert a parking with every space free.
    pub async fn create(pool: &PgPool, input: &CreateParking) -> Result<Parking, sqlx::Error> {
        let query = format!(
            "INSERT INTO parkings (code, name, location, total_spaces, available_spaces, hourly_rate)
             VALUES ($1, $2, $3, $4, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Parking>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.location)
            .bind(input.total_spaces)
            .bind(input.hourly_rate)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Parking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parkings WHERE id = $1");
        sqlx::query_as::<_, Parking>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Parking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parkings WHERE code = $1");
        sqlx::query_as::<_, Parking>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// One page of parkings ordered by code.
    pub async fn list(pool: &PgPool, page: PageRequest) -> Result<Vec<Parking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM parkings
             ORDER BY code ASC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Parking>(&query)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM parkings")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Partial update. When `total_spaces` changes, the occupied count is
    /// carried over and `available_spaces` recomputed under a row lock.
    ///
    /// Returns `None` if the parking does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateParking,
    ) -> Result<Option<Parking>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(current) = Self::lock(&mut *tx, id).await? else {
            return Ok(None);
        };

        let (total, available) = match input.total_spaces {
            Some(new_total) => (
                new_total,
                capacity::recalculate_available(
                    current.total_spaces,
                    current.available_spaces,
                    new_total,
                ),
            ),
            None => (current.total_spaces, current.available_spaces),
        };

        let query = format!(
            "UPDATE parkings SET
                code = COALESCE($2, code),
                name = COALESCE($3, name),
                location = COALESCE($4, location),
                hourly_rate = COALESCE($5, hourly_rate),
                total_spaces = $6,
                available_spaces = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Parking>(&query)
            .bind(id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.location)
            .bind(input.hourly_rate)
            .bind(total)
            .bind(available)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Delete a parking unless cars are still parked in it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<DeleteParkingOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if Self::lock(&mut *tx, id).await?.is_none() {
            return Ok(DeleteParkingOutcome::NotFound);
        }

        let (open,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM car_entries WHERE parking_id = $1 AND exit_date_time IS NULL",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if open > 0 {
            return Ok(DeleteParkingOutcome::HasActiveEntries(open));
        }

        sqlx::query("DELETE FROM parkings WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(DeleteParkingOutcome::Deleted)
    }

    /// Move the available counter by `delta`, keeping it in `[0, total]`.
    pub async fn adjust_spaces(
        pool: &PgPool,
        id: DbId,
        delta: i32,
    ) -> Result<SpacesOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(current) = Self::lock(&mut *tx, id).await? else {
            return Ok(SpacesOutcome::NotFound);
        };

        let next = match capacity::apply_delta(current.available_spaces, current.total_spaces, delta)
        {
            Ok(next) => next,
            Err(err) => return Ok(SpacesOutcome::Rejected(err)),
        };

        let query = format!(
            "UPDATE parkings SET available_spaces = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Parking>(&query)
            .bind(id)
            .bind(next)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(SpacesOutcome::Adjusted(updated))
    }

    /// `SELECT ... FOR UPDATE` on one parking row.
    async fn lock<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Parking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parkings WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Parking>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}
