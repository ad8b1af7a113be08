use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, Profile, Role};

/// Re-reads the actor from storage so decisions use the stored role, never a
/// client-held copy. A token whose profile is gone is treated as signed out.
pub fn load_actor(conn: &Connection, actor_id: &str) -> Result<Profile, AppError> {
    queries::get_profile(conn, actor_id)?.ok_or(AppError::Unauthorized)
}

pub fn can_create_booking(actor: &Profile) -> bool {
    actor.role == Role::Customer
}

pub fn can_review_booking(actor: &Profile, booking: &Booking) -> bool {
    actor.id == booking.manager_id
}

pub fn can_create_turf(actor: &Profile) -> bool {
    actor.role == Role::TurfManager
}

pub fn ensure_can_create_booking(actor: &Profile) -> Result<(), AppError> {
    if !can_create_booking(actor) {
        tracing::warn!(actor_id = %actor.id, role = actor.role.as_str(), "booking creation denied");
        return Err(AppError::Forbidden(
            "only customers can make bookings".to_string(),
        ));
    }
    Ok(())
}

pub fn ensure_can_review_booking(actor: &Profile, booking: &Booking) -> Result<(), AppError> {
    if !can_review_booking(actor, booking) {
        tracing::warn!(actor_id = %actor.id, booking_id = %booking.id, "booking review denied");
        return Err(AppError::Forbidden(
            "only the turf's manager can review this booking".to_string(),
        ));
    }
    Ok(())
}

pub fn ensure_can_create_turf(actor: &Profile) -> Result<(), AppError> {
    if !can_create_turf(actor) {
        tracing::warn!(actor_id = %actor.id, "turf creation denied");
        return Err(AppError::Forbidden(
            "only turf managers can list turfs".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use rust_decimal::Decimal;

    fn actor(id: &str, role: Role) -> Profile {
        Profile {
            id: id.to_string(),
            full_name: "Test".to_string(),
            email: format!("{id}@example.com"),
            phone: None,
            role,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn booking_managed_by(manager_id: &str) -> Booking {
        Booking {
            id: "b1".to_string(),
            turf_id: "t1".to_string(),
            customer_id: "c1".to_string(),
            manager_id: manager_id.to_string(),
            booking_date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            total_price: Decimal::new(4000, 2),
            status: BookingStatus::Pending,
            customer_notes: None,
            manager_notes: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_only_customers_create_bookings() {
        assert!(can_create_booking(&actor("c1", Role::Customer)));
        assert!(!can_create_booking(&actor("m1", Role::TurfManager)));

        let err = ensure_can_create_booking(&actor("m1", Role::TurfManager)).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_only_owning_manager_reviews() {
        let booking = booking_managed_by("m1");
        assert!(can_review_booking(&actor("m1", Role::TurfManager), &booking));
        assert!(!can_review_booking(&actor("m2", Role::TurfManager), &booking));
        // the customer who made it cannot approve it either
        assert!(!can_review_booking(&actor("c1", Role::Customer), &booking));
    }

    #[test]
    fn test_only_managers_create_turfs() {
        assert!(can_create_turf(&actor("m1", Role::TurfManager)));
        assert!(ensure_can_create_turf(&actor("c1", Role::Customer)).is_err());
    }
}
