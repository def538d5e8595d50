pub mod auth;
pub mod car_entries;
pub mod health;
pub mod parking;
pub mod reports;
pub mod tickets;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /auth/register                     register (public)
/// /auth/login                        login (public)
///
/// /users                             list (admin)
/// /users/profile                     get, update own profile
/// /users/{id}                        get, update, delete (admin or self)
///
/// /parking                           list (any), create (admin)
/// /parking/{id}                      get (any), update, delete (admin)
/// /parking/{id}/spaces               adjust available spaces (admin)
///
/// /car-entries                       list, register arrival (staff)
/// /car-entries/{id}                  get (staff)
/// /car-entries/{id}/exit             register departure (staff)
/// /car-entries/{id}/bill             bill for a closed entry (staff)
///
/// /tickets                           generate for an entry (staff)
/// /tickets/{id}                      get (staff)
/// /tickets/number/{ticket_number}    get by number (staff)
///
/// /reports/outgoing-cars             admin
/// /reports/entered-cars              admin
/// /reports/daily-revenue             admin
/// /reports/parking-utilization       admin
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/parking", parking::router())
        .nest("/car-entries", car_entries::router())
        .nest("/tickets", tickets::router())
        .nest("/reports", reports::router())
}
