use chrono::Utc;
use rusqlite::Connection;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{NewTurf, Turf, TurfListing};
use crate::services::guard;
use crate::validation::{optional_text, parse_time_of_day, require_text};

const MAX_PRICE_PER_HOUR: i64 = 1_000_000;

pub fn create_turf(conn: &Connection, actor_id: &str, input: NewTurf) -> Result<Turf, AppError> {
    let actor = guard::load_actor(conn, actor_id)?;
    guard::ensure_can_create_turf(&actor)?;

    if input.price_per_hour <= Decimal::ZERO {
        return Err(AppError::Validation(
            "price per hour must be greater than zero".to_string(),
        ));
    }
    if input.price_per_hour > Decimal::from(MAX_PRICE_PER_HOUR) {
        return Err(AppError::Validation(format!(
            "price per hour must be at most {MAX_PRICE_PER_HOUR}"
        )));
    }
    let opening_time = parse_time_of_day("opening_time", &input.opening_time)?;
    let closing_time = parse_time_of_day("closing_time", &input.closing_time)?;
    if closing_time <= opening_time {
        return Err(AppError::Validation(
            "closing time must be after opening time".to_string(),
        ));
    }

    let turf = Turf {
        id: Uuid::new_v4().to_string(),
        manager_id: actor.id,
        name: require_text("name", &input.name)?,
        location: require_text("location", &input.location)?,
        city: require_text("city", &input.city)?,
        address: require_text("address", &input.address)?,
        price_per_hour: input.price_per_hour,
        opening_time,
        closing_time,
        amenities: input
            .amenities
            .into_iter()
            .filter_map(|a| optional_text(Some(a)))
            .collect(),
        description: optional_text(input.description),
        image_url: optional_text(input.image_url),
        created_at: Utc::now().naive_utc(),
    };
    queries::insert_turf(conn, &turf)?;

    tracing::info!(turf_id = %turf.id, manager_id = %turf.manager_id, "turf listed");
    Ok(turf)
}

/// All turfs newest first, optionally narrowed by a search string.
pub fn list_turfs(conn: &Connection, search: Option<&str>) -> Result<Vec<TurfListing>, AppError> {
    let listings = queries::list_turf_listings(conn)?;
    Ok(match search {
        Some(q) => listings
            .into_iter()
            .filter(|l| l.turf.matches_search(q))
            .collect(),
        None => listings,
    })
}

pub fn get_turf(conn: &Connection, id: &str) -> Result<TurfListing, AppError> {
    queries::get_turf_listing(conn, id)?.ok_or_else(|| AppError::NotFound(format!("turf {id}")))
}
