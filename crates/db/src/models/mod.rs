//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the table row
//! - Plain insert/patch DTOs consumed by the repositories
//! - Serializable views for joined reads

pub mod car_entry;
pub mod parking;
pub mod report;
pub mod ticket;
pub mod user;
