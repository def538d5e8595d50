//! Pure domain logic for the parking service.
//!
//! Nothing in this crate performs I/O. Database access lives in
//! `parkhub_db`, HTTP concerns in `parkhub_api`.

pub mod billing;
pub mod capacity;
pub mod error;
pub mod pagination;
pub mod reports;
pub mod roles;
pub mod ticket;
pub mod types;
