use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/auth/sign-up", post(handlers::auth::sign_up))
        .route("/api/auth/sign-in", post(handlers::auth::sign_in))
        .route("/api/auth/sign-out", post(handlers::auth::sign_out))
        .route("/api/auth/me", get(handlers::auth::me))
        .route(
            "/api/turfs",
            get(handlers::turfs::list_turfs).post(handlers::turfs::create_turf),
        )
        .route("/api/turfs/:id", get(handlers::turfs::get_turf))
        .route("/api/turfs/:id/quote", get(handlers::turfs::quote))
        .route(
            "/api/turfs/:id/bookings",
            post(handlers::bookings::create_booking),
        )
        .route(
            "/api/bookings/:id/review",
            post(handlers::bookings::review_booking),
        )
        .route("/api/dashboard", get(handlers::dashboard::get_dashboard))
        .with_state(state)
}
