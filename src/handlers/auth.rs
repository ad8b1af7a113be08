use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::handlers::{bearer_token, require_actor};
use crate::models::Profile;
use crate::services::auth::{self, SignUp};
use crate::state::AppState;

// POST /api/auth/sign-up
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SignUp>,
) -> Result<(StatusCode, Json<Profile>), AppError> {
    let profile = {
        let db = state.conn()?;
        auth::sign_up(&db, body)?
    };
    Ok((StatusCode::CREATED, Json(profile)))
}

// POST /api/auth/sign-in
#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SignInResponse {
    token: String,
    expires_at: NaiveDateTime,
    profile: Profile,
}

pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, AppError> {
    let (session, profile) = {
        let db = state.conn()?;
        auth::sign_in(&db, &body.email, &body.password, state.config.session_ttl()?)?
    };

    Ok(Json(SignInResponse {
        token: session.token,
        expires_at: session.expires_at,
        profile,
    }))
}

// POST /api/auth/sign-out
pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    if let Some(token) = bearer_token(&headers) {
        let db = state.conn()?;
        auth::sign_out(&db, token)?;
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

// GET /api/auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(require_actor(&state, &headers)?))
}
