pub mod auth;
pub mod car_entries;
pub mod parking;
pub mod reports;
pub mod tickets;
pub mod users;
