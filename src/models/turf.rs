use chrono::{NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turf {
    pub id: String,
    pub manager_id: String,
    pub name: String,
    pub location: String,
    pub city: String,
    pub address: String,
    pub price_per_hour: Decimal,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub amenities: Vec<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Turf {
    /// Case-insensitive substring match over name, city and location.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        [&self.name, &self.city, &self.location]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Turf form as submitted by a manager. Times arrive as `HH:MM` strings.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTurf {
    pub name: String,
    pub location: String,
    pub city: String,
    pub address: String,
    pub price_per_hour: Decimal,
    pub opening_time: String,
    pub closing_time: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// A turf joined with its manager's contact details, for display.
#[derive(Debug, Clone, Serialize)]
pub struct TurfListing {
    #[serde(flatten)]
    pub turf: Turf,
    pub manager_name: String,
    pub manager_phone: Option<String>,
    pub manager_email: String,
}
