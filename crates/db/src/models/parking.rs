//! Parking lot model and DTOs.

use parkhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `parkings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parking {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub location: String,
    pub total_spaces: i32,
    pub available_spaces: i32,
    pub hourly_rate: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO. `available_spaces` starts equal to `total_spaces`.
#[derive(Debug, Clone)]
pub struct CreateParking {
    pub code: String,
    pub name: String,
    pub location: String,
    pub total_spaces: i32,
    pub hourly_rate: f64,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateParking {
    pub code: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub total_spaces: Option<i32>,
    pub hourly_rate: Option<f64>,
}

/// The slice of a parking embedded in car entry responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingBrief {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub location: String,
    pub hourly_rate: f64,
}
