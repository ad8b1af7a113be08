use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use crate::errors::AppError;
use crate::handlers::require_actor;
use crate::services::dashboard::{self, Dashboard};
use crate::state::AppState;

// GET /api/dashboard
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Dashboard>, AppError> {
    let actor = require_actor(&state, &headers)?;
    let db = state.conn()?;
    Ok(Json(dashboard::load_dashboard(&db, &actor.id)?))
}
