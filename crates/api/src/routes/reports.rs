use axum::routing::get;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Routes mounted at `/reports`. Every route requires the admin role.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/outgoing-cars", get(reports::outgoing_cars))
        .route("/entered-cars", get(reports::entered_cars))
        .route("/daily-revenue", get(reports::daily_revenue))
        .route("/parking-utilization", get(reports::parking_utilization))
}
