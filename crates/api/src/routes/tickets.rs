use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tickets;
use crate::state::AppState;

/// Routes mounted at `/tickets`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(tickets::create))
        .route("/{id}", get(tickets::get_by_id))
        .route("/number/{ticket_number}", get(tickets::get_by_number))
}
