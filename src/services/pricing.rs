use chrono::NaiveTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::errors::AppError;

const SECONDS_PER_HOUR: i64 = 3600;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PriceQuote {
    pub turf_id: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub hours: Decimal,
    pub price_per_hour: Decimal,
    pub total_price: Decimal,
}

/// Price of a slot on a single day: elapsed hours times the hourly rate,
/// rounded half away from zero to cents. Overnight spans are not supported.
pub fn compute_price(
    start: NaiveTime,
    end: NaiveTime,
    hourly_rate: Decimal,
) -> Result<Decimal, AppError> {
    if hourly_rate <= Decimal::ZERO {
        return Err(AppError::Validation(
            "price per hour must be greater than zero".to_string(),
        ));
    }

    let seconds = elapsed_seconds(start, end)?;
    let price = Decimal::from(seconds)
        .checked_mul(hourly_rate)
        .and_then(|amount| amount.checked_div(Decimal::from(SECONDS_PER_HOUR)))
        .ok_or_else(|| AppError::Validation("price is too large".to_string()))?;
    Ok(round_money(price))
}

/// Elapsed hours as an exact decimal, for display alongside a quote.
pub fn hours_between(start: NaiveTime, end: NaiveTime) -> Result<Decimal, AppError> {
    let seconds = elapsed_seconds(start, end)?;
    Ok((Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR)).normalize())
}

/// Rounds to cents and pins the scale so `40` renders as `40.00`.
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

fn elapsed_seconds(start: NaiveTime, end: NaiveTime) -> Result<i64, AppError> {
    let seconds = (end - start).num_seconds();
    if seconds <= 0 {
        return Err(AppError::InvalidRange);
    }
    Ok(seconds)
}
