pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod health;
pub mod turfs;

use axum::http::HeaderMap;

use crate::errors::AppError;
use crate::models::Profile;
use crate::services;
use crate::state::AppState;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolves the bearer token to the signed-in profile, as currently stored.
pub(crate) fn require_actor(state: &AppState, headers: &HeaderMap) -> Result<Profile, AppError> {
    let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;
    let db = state.conn()?;
    services::auth::current_actor(&db, token)?.ok_or(AppError::Unauthorized)
}
