use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::Turf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub turf_id: String,
    pub customer_id: String,
    /// Copied from the turf when the booking is created.
    pub manager_id: String,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub customer_notes: Option<String>,
    pub manager_notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
}

/// The outcome a manager may pick when reviewing a pending booking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "approved" => Some(BookingStatus::Approved),
            "rejected" => Some(BookingStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Pending)
    }

    /// Only `pending` may move, and only once.
    pub fn transition(self, decision: ReviewDecision) -> Result<BookingStatus, AppError> {
        if self.is_terminal() {
            return Err(AppError::InvalidTransition { status: self });
        }
        Ok(decision.into())
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ReviewDecision> for BookingStatus {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approved => BookingStatus::Approved,
            ReviewDecision::Rejected => BookingStatus::Rejected,
        }
    }
}

impl Booking {
    /// Applies a review in memory. Status and manager notes are the only
    /// fields that change; omitted notes leave the field unset.
    pub fn reviewed(
        &self,
        decision: ReviewDecision,
        manager_notes: Option<String>,
    ) -> Result<Booking, AppError> {
        let status = self.status.transition(decision)?;
        Ok(Booking {
            status,
            manager_notes,
            ..self.clone()
        })
    }

    pub fn manager_matches(&self, turf: &Turf) -> bool {
        self.turf_id == turf.id && self.manager_id == turf.manager_id
    }
}

/// Booking request body. Times arrive as `HH:MM` strings from the form.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    pub booking_date: String,
    pub start_time: String,
    pub end_time: String,
    pub customer_notes: Option<String>,
}

/// A booking joined with its turf and customer, as listed on dashboards.
#[derive(Debug, Clone, Serialize)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub turf_name: String,
    pub turf_location: String,
    pub turf_city: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
}
