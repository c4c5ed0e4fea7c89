use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/activities",
            get(handlers::list_activities).delete(handlers::clear_activities),
        )
        .route("/api/activities/:id", delete(handlers::delete_activity))
        .route("/api/rows/:id/locate", post(handlers::locate_row))
        .route("/api/map", get(handlers::get_map))
        .route("/api/map/click", post(handlers::map_click))
        .route("/api/form/type", post(handlers::change_type))
        .route("/api/form/submit", post(handlers::submit))
        .route("/api/form/cancel", post(handlers::cancel))
        .route("/api/geolocation", post(handlers::geolocation))
        .with_state(state)
}
