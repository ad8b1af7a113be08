use chrono::{NaiveDate, NaiveTime};

use crate::errors::AppError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accepts `HH:MM` (as sent by time inputs) or `HH:MM:SS`.
pub fn parse_time_of_day(field: &str, value: &str) -> Result<NaiveTime, AppError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| AppError::Validation(format!("{field} must be a time like 14:00")))
}

pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| AppError::Validation(format!("{field} must be a date like 2025-06-15")))
}

pub fn require_text(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Blank optional text is stored as absent.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_accepts_both_forms() {
        let short = parse_time_of_day("start_time", "14:00").unwrap();
        let long = parse_time_of_day("start_time", "14:00:00").unwrap();
        assert_eq!(short, long);
        assert_eq!(short, NaiveTime::from_hms_opt(14, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_time_rejects_garbage() {
        let err = parse_time_of_day("end_time", "2pm").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.starts_with("end_time")));
        assert!(parse_time_of_day("end_time", "25:00").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("booking_date", "2025-06-15").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
        );
        assert!(parse_date("booking_date", "15/06/2025").is_err());
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("name", "  Arena  ").unwrap(), "Arena");
        assert!(require_text("name", "   ").is_err());
    }

    #[test]
    fn test_optional_text_drops_blank() {
        assert_eq!(optional_text(Some("  ".to_string())), None);
        assert_eq!(optional_text(None), None);
        assert_eq!(
            optional_text(Some(" bring a ball ".to_string())),
            Some("bring a ball".to_string())
        );
    }
}
