use axum::routing::{get, put};
use axum::Router;

use crate::handlers::parking;
use crate::state::AppState;

/// Routes mounted at `/parking`.
///
/// ```text
/// GET, POST        /             -> list, create
/// GET, PUT, DELETE /{id}         -> get_by_id, update, delete
/// PUT              /{id}/spaces  -> update_spaces
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(parking::list).post(parking::create))
        .route(
            "/{id}",
            get(parking::get_by_id)
                .put(parking::update)
                .delete(parking::delete),
        )
        .route("/{id}/spaces", put(parking::update_spaces))
}
