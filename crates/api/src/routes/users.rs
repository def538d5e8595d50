use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET              /         -> list
/// GET, PUT         /profile  -> get_profile, update_profile
/// GET, PUT, DELETE /{id}     -> get_by_id, update, delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list))
        .route(
            "/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .route(
            "/{id}",
            get(users::get_by_id)
                .put(users::update)
                .delete(users::delete),
        )
}
