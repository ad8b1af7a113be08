use std::env;

use crate::errors::AppError;

const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;
const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub session_ttl_hours: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "turfbook.db".to_string()),
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|h: &i64| (1..=MAX_SESSION_TTL_HOURS).contains(h))
                .unwrap_or(DEFAULT_SESSION_TTL_HOURS),
        }
    }

    pub fn session_ttl(&self) -> Result<chrono::Duration, AppError> {
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&self.session_ttl_hours) {
            return Err(AppError::Config(format!(
                "session ttl of {} hours is out of range",
                self.session_ttl_hours
            )));
        }
        chrono::Duration::try_hours(self.session_ttl_hours)
            .ok_or_else(|| AppError::Config("session ttl overflows".to_string()))
    }
}
