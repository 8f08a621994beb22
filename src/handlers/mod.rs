pub mod admin;
pub mod booking;
pub mod health;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/services", get(booking::list_services))
        .route("/api/availability", get(booking::get_availability))
        .route("/api/bookings", post(booking::create_booking))
        .route("/api/admin/bookings", get(admin::get_bookings))
        .route(
            "/api/admin/bookings/:id/status",
            post(admin::update_booking_status),
        )
        .route(
            "/api/admin/blocks",
            get(admin::get_blocks).post(admin::create_block),
        )
        .route(
            "/api/admin/settings",
            get(admin::get_settings).put(admin::put_settings),
        )
        .with_state(state)
}
