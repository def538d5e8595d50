//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! `&PgPool` as the first argument. Operations that must hold row locks open
//! their own transaction and report the outcome as an enum.

pub mod car_entry_repo;
pub mod parking_repo;
pub mod report_repo;
pub mod ticket_repo;
pub mod user_repo;

pub use car_entry_repo::{CarEntryRepo, EntryOutcome, ExitOutcome};
pub use parking_repo::{DeleteParkingOutcome, ParkingRepo, SpacesOutcome};
pub use report_repo::ReportRepo;
pub use ticket_repo::{IssueTicketOutcome, TicketRepo};
pub use user_repo::UserRepo;
