use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use rusqlite::Connection;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Profile, Role, Session};
use crate::validation::{optional_text, require_text};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Deserialize)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
}

pub fn sign_up(conn: &Connection, req: SignUp) -> Result<Profile, AppError> {
    let email = normalize_email(&req.email)?;
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if queries::email_taken(conn, &email)? {
        return Err(AppError::Validation(
            "an account with this email already exists".to_string(),
        ));
    }

    let profile = Profile {
        id: Uuid::new_v4().to_string(),
        full_name: require_text("full_name", &req.full_name)?,
        email,
        phone: optional_text(req.phone),
        role: req.role,
        created_at: Utc::now().naive_utc(),
    };
    let hash = hash_password(&req.password)?;
    queries::insert_profile(conn, &profile, &hash)?;

    tracing::info!(profile_id = %profile.id, role = profile.role.as_str(), "profile created");
    Ok(profile)
}

pub fn sign_in(
    conn: &Connection,
    email: &str,
    password: &str,
    ttl: Duration,
) -> Result<(Session, Profile), AppError> {
    let email = email.trim().to_lowercase();
    let Some((profile, hash)) = queries::get_credentials_by_email(conn, &email)? else {
        return Err(AppError::Auth("invalid email or password".to_string()));
    };
    if !verify_password(password, &hash) {
        tracing::warn!(profile_id = %profile.id, "sign-in with wrong password");
        return Err(AppError::Auth("invalid email or password".to_string()));
    }

    let now = Utc::now().naive_utc();
    let expires_at = now
        .checked_add_signed(ttl)
        .ok_or_else(|| AppError::Config("session expiry is out of range".to_string()))?;
    let session = Session {
        token: Uuid::new_v4().to_string(),
        profile_id: profile.id.clone(),
        created_at: now,
        expires_at,
    };
    queries::insert_session(conn, &session)?;

    let expired = queries::delete_expired_sessions(conn, &now)?;
    if expired > 0 {
        tracing::debug!(expired, "pruned expired sessions");
    }

    tracing::info!(profile_id = %profile.id, "signed in");
    Ok((session, profile))
}

pub fn sign_out(conn: &Connection, token: &str) -> Result<(), AppError> {
    queries::delete_session(conn, token)?;
    Ok(())
}

/// The signed-in actor for a session token, or `None` when anonymous.
pub fn current_actor(conn: &Connection, token: &str) -> Result<Option<Profile>, AppError> {
    let now = Utc::now().naive_utc();
    Ok(queries::get_session_profile(conn, token, &now)?)
}

fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
        .unwrap_or(false);
    if !valid {
        return Err(AppError::Validation("a valid email is required".to_string()));
    }
    Ok(email)
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Persistence(anyhow::anyhow!("failed to hash password: {e}")))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::setup_db;

    fn sign_up_req(email: &str, role: Role) -> SignUp {
        SignUp {
            email: email.to_string(),
            password: "hunter22".to_string(),
            full_name: "Asha Patil".to_string(),
            phone: Some("".to_string()),
            role,
        }
    }

    #[test]
    fn test_sign_up_then_sign_in() {
        let conn = setup_db();
        let profile = sign_up(&conn, sign_up_req("Asha@Example.com ", Role::Customer)).unwrap();
        assert_eq!(profile.email, "asha@example.com");
        assert!(profile.phone.is_none());

        let (session, signed_in) =
            sign_in(&conn, "asha@example.com", "hunter22", Duration::hours(1)).unwrap();
        assert_eq!(signed_in.id, profile.id);

        let actor = current_actor(&conn, &session.token).unwrap().unwrap();
        assert_eq!(actor.role, Role::Customer);

        sign_out(&conn, &session.token).unwrap();
        assert!(current_actor(&conn, &session.token).unwrap().is_none());
    }

    #[test]
    fn test_wrong_password_is_auth_error() {
        let conn = setup_db();
        sign_up(&conn, sign_up_req("a@example.com", Role::TurfManager)).unwrap();

        let err = sign_in(&conn, "a@example.com", "nope-nope", Duration::hours(1)).unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
        let err = sign_in(&conn, "b@example.com", "hunter22", Duration::hours(1)).unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
    }

    #[test]
    fn test_sign_up_validation() {
        let conn = setup_db();
        assert!(sign_up(&conn, sign_up_req("not-an-email", Role::Customer)).is_err());

        let mut short = sign_up_req("a@example.com", Role::Customer);
        short.password = "123".to_string();
        assert!(matches!(sign_up(&conn, short).unwrap_err(), AppError::Validation(_)));

        sign_up(&conn, sign_up_req("a@example.com", Role::Customer)).unwrap();
        let dup = sign_up(&conn, sign_up_req("A@example.com", Role::TurfManager)).unwrap_err();
        assert!(matches!(dup, AppError::Validation(_)));
    }

    #[test]
    fn test_expiry_past_calendar_range_is_config_error() {
        let conn = setup_db();
        sign_up(&conn, sign_up_req("a@example.com", Role::Customer)).unwrap();

        let ttl = Duration::days(365 * 1_000_000);
        let err = sign_in(&conn, "a@example.com", "hunter22", ttl).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_unknown_token_is_anonymous() {
        let conn = setup_db();
        assert!(current_actor(&conn, "no-such-token").unwrap().is_none());
    }
}
