use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::handlers::require_actor;
use crate::models::{NewTurf, Turf, TurfListing};
use crate::services::booking;
use crate::services::pricing::PriceQuote;
use crate::services::turfs;
use crate::state::AppState;

// GET /api/turfs?q=
#[derive(Deserialize)]
pub struct TurfSearch {
    pub q: Option<String>,
}

pub async fn list_turfs(
    State(state): State<Arc<AppState>>,
    Query(search): Query<TurfSearch>,
) -> Result<Json<Vec<TurfListing>>, AppError> {
    let db = state.conn()?;
    Ok(Json(turfs::list_turfs(&db, search.q.as_deref())?))
}

// GET /api/turfs/:id
pub async fn get_turf(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TurfListing>, AppError> {
    let db = state.conn()?;
    Ok(Json(turfs::get_turf(&db, &id)?))
}

// POST /api/turfs
pub async fn create_turf(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<NewTurf>,
) -> Result<(StatusCode, Json<Turf>), AppError> {
    let actor = require_actor(&state, &headers)?;
    let turf = {
        let db = state.conn()?;
        turfs::create_turf(&db, &actor.id, body)?
    };
    Ok((StatusCode::CREATED, Json(turf)))
}

// GET /api/turfs/:id/quote?start_time=&end_time=
#[derive(Deserialize)]
pub struct QuoteQuery {
    pub start_time: String,
    pub end_time: String,
}

pub async fn quote(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<PriceQuote>, AppError> {
    let db = state.conn()?;
    Ok(Json(booking::quote(
        &db,
        &id,
        &query.start_time,
        &query.end_time,
    )?))
}
