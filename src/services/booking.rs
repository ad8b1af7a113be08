use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, NewBooking, ReviewDecision};
use crate::services::guard;
use crate::services::pricing::{self, PriceQuote};
use crate::validation::{optional_text, parse_date, parse_time_of_day};

/// Files a booking request as `pending`. No overlap check is made against
/// other bookings for the same turf; the manager resolves clashes on review.
pub fn create_booking(
    conn: &Connection,
    actor_id: &str,
    turf_id: &str,
    input: NewBooking,
) -> Result<Booking, AppError> {
    let actor = guard::load_actor(conn, actor_id)?;
    guard::ensure_can_create_booking(&actor)?;

    let turf = queries::get_turf(conn, turf_id)?
        .ok_or_else(|| AppError::NotFound(format!("turf {turf_id}")))?;

    let booking_date = parse_date("booking_date", &input.booking_date)?;
    if booking_date < Utc::now().date_naive() {
        return Err(AppError::Validation(
            "booking date cannot be in the past".to_string(),
        ));
    }
    let start_time = parse_time_of_day("start_time", &input.start_time)?;
    let end_time = parse_time_of_day("end_time", &input.end_time)?;
    let total_price = pricing::compute_price(start_time, end_time, turf.price_per_hour)?;

    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        turf_id: turf.id.clone(),
        customer_id: actor.id.clone(),
        manager_id: turf.manager_id.clone(),
        booking_date,
        start_time,
        end_time,
        total_price,
        status: BookingStatus::Pending,
        customer_notes: optional_text(input.customer_notes),
        manager_notes: None,
        created_at: Utc::now().naive_utc(),
    };
    queries::insert_booking(conn, &booking)?;

    tracing::info!(
        booking_id = %booking.id,
        turf_id = %booking.turf_id,
        customer_id = %booking.customer_id,
        total_price = %booking.total_price,
        "booking requested"
    );
    Ok(booking)
}

/// A review that passed authorization and the in-memory transition check
/// against the status read at `prepare` time.
#[derive(Debug, Clone)]
pub struct PreparedReview {
    pub updated: Booking,
}

pub fn prepare_review(
    conn: &Connection,
    actor_id: &str,
    booking_id: &str,
    decision: ReviewDecision,
    manager_notes: Option<String>,
) -> Result<PreparedReview, AppError> {
    let actor = guard::load_actor(conn, actor_id)?;
    let booking = queries::get_booking(conn, booking_id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?;
    guard::ensure_can_review_booking(&actor, &booking)?;

    let turf = queries::get_turf(conn, &booking.turf_id)?
        .ok_or_else(|| AppError::NotFound(format!("turf {}", booking.turf_id)))?;
    if !booking.manager_matches(&turf) {
        return Err(AppError::Persistence(anyhow::anyhow!(
            "booking {} has manager {} but turf {} is managed by {}",
            booking.id,
            booking.manager_id,
            turf.id,
            turf.manager_id
        )));
    }

    let updated = booking.reviewed(decision, optional_text(manager_notes))?;
    Ok(PreparedReview { updated })
}

/// Commits a prepared review with a write conditioned on the booking still
/// being `pending`. Losing a race surfaces as `PreconditionFailed`.
pub fn commit_review(conn: &Connection, prepared: PreparedReview) -> Result<Booking, AppError> {
    let booking = prepared.updated;
    let written = queries::review_booking_if_pending(
        conn,
        &booking.id,
        booking.status,
        booking.manager_notes.as_deref(),
    )?;

    if !written {
        tracing::warn!(booking_id = %booking.id, "booking already reviewed by a concurrent request");
        return Err(AppError::PreconditionFailed);
    }

    tracing::info!(
        booking_id = %booking.id,
        manager_id = %booking.manager_id,
        status = booking.status.as_str(),
        "booking reviewed"
    );
    Ok(booking)
}

pub fn review_booking(
    conn: &Connection,
    actor_id: &str,
    booking_id: &str,
    decision: ReviewDecision,
    manager_notes: Option<String>,
) -> Result<Booking, AppError> {
    let prepared = prepare_review(conn, actor_id, booking_id, decision, manager_notes)?;
    commit_review(conn, prepared)
}

/// Price preview for the booking form.
pub fn quote(
    conn: &Connection,
    turf_id: &str,
    start_time: &str,
    end_time: &str,
) -> Result<PriceQuote, AppError> {
    let turf = queries::get_turf(conn, turf_id)?
        .ok_or_else(|| AppError::NotFound(format!("turf {turf_id}")))?;
    let start_time = parse_time_of_day("start_time", start_time)?;
    let end_time = parse_time_of_day("end_time", end_time)?;

    Ok(PriceQuote {
        turf_id: turf.id,
        start_time,
        end_time,
        hours: pricing::hours_between(start_time, end_time)?,
        price_per_hour: turf.price_per_hour,
        total_price: pricing::compute_price(start_time, end_time, turf.price_per_hour)?,
    })
}
