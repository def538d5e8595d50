use axum::routing::{get, put};
use axum::Router;

use crate::handlers::car_entries;
use crate::state::AppState;

/// Routes mounted at `/car-entries`.
///
/// ```text
/// GET, POST /            -> list, create
/// GET       /{id}        -> get_by_id
/// PUT       /{id}/exit   -> exit
/// GET       /{id}/bill   -> bill
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(car_entries::list).post(car_entries::create))
        .route("/{id}", get(car_entries::get_by_id))
        .route("/{id}/exit", put(car_entries::exit))
        .route("/{id}/bill", get(car_entries::bill))
}
