use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::handlers::require_actor;
use crate::models::{Booking, NewBooking, ReviewDecision};
use crate::services::booking;
use crate::state::AppState;

// POST /api/turfs/:id/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(turf_id): Path<String>,
    Json(body): Json<NewBooking>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let actor = require_actor(&state, &headers)?;
    let created = {
        let db = state.conn()?;
        booking::create_booking(&db, &actor.id, &turf_id, body)?
    };
    Ok((StatusCode::CREATED, Json(created)))
}

// POST /api/bookings/:id/review
#[derive(Deserialize)]
pub struct ReviewRequest {
    pub decision: ReviewDecision,
    pub manager_notes: Option<String>,
}

pub async fn review_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<ReviewRequest>,
) -> Result<Json<Booking>, AppError> {
    let actor = require_actor(&state, &headers)?;
    let db = state.conn()?;
    let reviewed = booking::review_booking(&db, &actor.id, &id, body.decision, body.manager_notes)?;
    Ok(Json(reviewed))
}
