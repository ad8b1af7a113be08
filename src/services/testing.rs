//! Fixtures shared by the service tests.

use chrono::{NaiveTime, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::db::{self, queries};
use crate::models::{Profile, Role, Turf};

pub fn setup_db() -> Connection {
    db::init_db(":memory:").unwrap()
}

pub fn seed_profile(conn: &Connection, id: &str, role: Role) -> Profile {
    let profile = Profile {
        id: id.to_string(),
        full_name: format!("User {id}"),
        email: format!("{id}@example.com"),
        phone: None,
        role,
        created_at: Utc::now().naive_utc(),
    };
    queries::insert_profile(conn, &profile, "not-a-real-hash").unwrap();
    profile
}

pub fn seed_turf(conn: &Connection, id: &str, manager_id: &str, price_per_hour: Decimal) -> Turf {
    let turf = Turf {
        id: id.to_string(),
        manager_id: manager_id.to_string(),
        name: format!("Turf {id}"),
        location: "Baner".to_string(),
        city: "Pune".to_string(),
        address: "12 Stadium Road".to_string(),
        price_per_hour,
        opening_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
        closing_time: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
        amenities: vec![],
        description: None,
        image_url: None,
        created_at: Utc::now().naive_utc(),
    };
    queries::insert_turf(conn, &turf).unwrap();
    turf
}
