use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingDetails, BookingStatus, Profile, Role, Turf};
use crate::services::guard;
use crate::services::pricing::round_money;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CustomerSummary {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ManagerSummary {
    pub turf_count: usize,
    pub booking_count: usize,
    pub pending: usize,
    pub revenue: Decimal,
}

pub fn summarize_for_customer<'a>(
    bookings: impl IntoIterator<Item = &'a Booking>,
) -> CustomerSummary {
    let mut summary = CustomerSummary {
        total: 0,
        pending: 0,
        approved: 0,
    };
    for booking in bookings {
        summary.total += 1;
        match booking.status {
            BookingStatus::Pending => summary.pending += 1,
            BookingStatus::Approved => summary.approved += 1,
            BookingStatus::Rejected => {}
        }
    }
    summary
}

/// Revenue counts approved bookings only and is summed in exact decimal.
pub fn summarize_for_manager<'a>(
    turfs: &[Turf],
    bookings: impl IntoIterator<Item = &'a Booking>,
) -> Result<ManagerSummary, AppError> {
    let mut booking_count = 0;
    let mut pending = 0;
    let mut revenue = Decimal::ZERO;

    for booking in bookings {
        booking_count += 1;
        match booking.status {
            BookingStatus::Pending => pending += 1,
            BookingStatus::Approved => {
                revenue = revenue.checked_add(booking.total_price).ok_or_else(|| {
                    AppError::Validation("revenue is too large to total".to_string())
                })?;
            }
            BookingStatus::Rejected => {}
        }
    }

    Ok(ManagerSummary {
        turf_count: turfs.len(),
        booking_count,
        pending,
        revenue: round_money(revenue),
    })
}

/// Role-scoped dashboard. Summaries are computed from the same lists that
/// are returned, so the numbers always agree with what is shown.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Dashboard {
    Customer {
        profile: Profile,
        summary: CustomerSummary,
        bookings: Vec<BookingDetails>,
    },
    TurfManager {
        profile: Profile,
        summary: ManagerSummary,
        turfs: Vec<Turf>,
        bookings: Vec<BookingDetails>,
    },
}

pub fn load_dashboard(conn: &Connection, actor_id: &str) -> Result<Dashboard, AppError> {
    let profile = guard::load_actor(conn, actor_id)?;

    match profile.role {
        Role::Customer => {
            let bookings = queries::list_booking_details_for_customer(conn, &profile.id)?;
            let summary = summarize_for_customer(bookings.iter().map(|d| &d.booking));
            Ok(Dashboard::Customer {
                profile,
                summary,
                bookings,
            })
        }
        Role::TurfManager => {
            let turfs = queries::list_turfs_for_manager(conn, &profile.id)?;
            let bookings = queries::list_booking_details_for_manager(conn, &profile.id)?;
            let summary = summarize_for_manager(&turfs, bookings.iter().map(|d| &d.booking))?;
            Ok(Dashboard::TurfManager {
                profile,
                summary,
                turfs,
                bookings,
            })
        }
    }
}
