use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::models::{
    Booking, BookingDetails, BookingStatus, Profile, Role, Session, Turf, TurfListing,
};
use crate::validation::{DATE_FORMAT, TIMESTAMP_FORMAT, TIME_FORMAT};

const PROFILE_COLUMNS: &str = "p.id, p.full_name, p.email, p.phone, p.role, p.created_at";

const TURF_COLUMNS: &str = "t.id, t.manager_id, t.name, t.location, t.city, t.address, \
     t.price_per_hour, t.opening_time, t.closing_time, t.amenities, t.description, \
     t.image_url, t.created_at";

const BOOKING_COLUMNS: &str = "b.id, b.turf_id, b.customer_id, b.manager_id, b.booking_date, \
     b.start_time, b.end_time, b.total_price, b.status, b.customer_notes, b.manager_notes, \
     b.created_at";

// ── Profiles ──

pub fn insert_profile(conn: &Connection, profile: &Profile, password_hash: &str) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO profiles (id, full_name, email, phone, role, password_hash, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            profile.id,
            profile.full_name,
            profile.email,
            profile.phone,
            profile.role.as_str(),
            password_hash,
            format_timestamp(&profile.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_profile(conn: &Connection, id: &str) -> anyhow::Result<Option<Profile>> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles p WHERE p.id = ?1");
    let result = conn
        .query_row(&sql, params![id], |row| Ok(parse_profile_row(row, 0)))
        .optional()?;
    result.transpose()
}

pub fn email_taken(conn: &Connection, email: &str) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM profiles WHERE email = ?1",
        params![email],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Profile plus its stored password hash, for sign-in only.
pub fn get_credentials_by_email(
    conn: &Connection,
    email: &str,
) -> anyhow::Result<Option<(Profile, String)>> {
    let sql = format!("SELECT {PROFILE_COLUMNS}, p.password_hash FROM profiles p WHERE p.email = ?1");
    let result = conn
        .query_row(&sql, params![email], |row| {
            let hash: String = row.get(6)?;
            Ok(parse_profile_row(row, 0).map(|profile| (profile, hash)))
        })
        .optional()?;
    result.transpose()
}

// ── Sessions ──

pub fn insert_session(conn: &Connection, session: &Session) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO sessions (token, profile_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            session.token,
            session.profile_id,
            format_timestamp(&session.created_at),
            format_timestamp(&session.expires_at),
        ],
    )?;
    Ok(())
}

/// Resolves a session token to the profile as currently stored.
pub fn get_session_profile(
    conn: &Connection,
    token: &str,
    now: &NaiveDateTime,
) -> anyhow::Result<Option<Profile>> {
    let sql = format!(
        "SELECT {PROFILE_COLUMNS} FROM sessions s
         INNER JOIN profiles p ON p.id = s.profile_id
         WHERE s.token = ?1 AND s.expires_at > ?2"
    );
    let result = conn
        .query_row(&sql, params![token, format_timestamp(now)], |row| {
            Ok(parse_profile_row(row, 0))
        })
        .optional()?;
    result.transpose()
}

pub fn delete_session(conn: &Connection, token: &str) -> anyhow::Result<()> {
    conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
    Ok(())
}

pub fn delete_expired_sessions(conn: &Connection, now: &NaiveDateTime) -> anyhow::Result<usize> {
    let count = conn.execute(
        "DELETE FROM sessions WHERE expires_at <= ?1",
        params![format_timestamp(now)],
    )?;
    Ok(count)
}

// ── Turfs ──

pub fn insert_turf(conn: &Connection, turf: &Turf) -> anyhow::Result<()> {
    let amenities = serde_json::to_string(&turf.amenities)?;
    conn.execute(
        "INSERT INTO turfs (id, manager_id, name, location, city, address, price_per_hour,
                            opening_time, closing_time, amenities, description, image_url, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            turf.id,
            turf.manager_id,
            turf.name,
            turf.location,
            turf.city,
            turf.address,
            turf.price_per_hour.to_string(),
            turf.opening_time.format(TIME_FORMAT).to_string(),
            turf.closing_time.format(TIME_FORMAT).to_string(),
            amenities,
            turf.description,
            turf.image_url,
            format_timestamp(&turf.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_turf(conn: &Connection, id: &str) -> anyhow::Result<Option<Turf>> {
    let sql = format!("SELECT {TURF_COLUMNS} FROM turfs t WHERE t.id = ?1");
    let result = conn
        .query_row(&sql, params![id], |row| Ok(parse_turf_row(row, 0)))
        .optional()?;
    result.transpose()
}

pub fn get_turf_listing(conn: &Connection, id: &str) -> anyhow::Result<Option<TurfListing>> {
    let sql = format!(
        "SELECT {TURF_COLUMNS}, p.full_name, p.phone, p.email FROM turfs t
         INNER JOIN profiles p ON p.id = t.manager_id
         WHERE t.id = ?1"
    );
    let result = conn
        .query_row(&sql, params![id], |row| Ok(parse_turf_listing_row(row)))
        .optional()?;
    result.transpose()
}

/// Every turf, newest first.
pub fn list_turf_listings(conn: &Connection) -> anyhow::Result<Vec<TurfListing>> {
    let sql = format!(
        "SELECT {TURF_COLUMNS}, p.full_name, p.phone, p.email FROM turfs t
         INNER JOIN profiles p ON p.id = t.manager_id
         ORDER BY t.created_at DESC, t.rowid DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok(parse_turf_listing_row(row)))?;

    let mut turfs = vec![];
    for row in rows {
        turfs.push(row??);
    }
    Ok(turfs)
}

pub fn list_turfs_for_manager(conn: &Connection, manager_id: &str) -> anyhow::Result<Vec<Turf>> {
    let sql = format!(
        "SELECT {TURF_COLUMNS} FROM turfs t WHERE t.manager_id = ?1
         ORDER BY t.created_at DESC, t.rowid DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![manager_id], |row| Ok(parse_turf_row(row, 0)))?;

    let mut turfs = vec![];
    for row in rows {
        turfs.push(row??);
    }
    Ok(turfs)
}

// ── Bookings ──

pub fn insert_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, turf_id, customer_id, manager_id, booking_date, start_time, end_time,
                               total_price, status, customer_notes, manager_notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            booking.id,
            booking.turf_id,
            booking.customer_id,
            booking.manager_id,
            booking.booking_date.format(DATE_FORMAT).to_string(),
            booking.start_time.format(TIME_FORMAT).to_string(),
            booking.end_time.format(TIME_FORMAT).to_string(),
            booking.total_price.to_string(),
            booking.status.as_str(),
            booking.customer_notes,
            booking.manager_notes,
            format_timestamp(&booking.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_booking(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings b WHERE b.id = ?1");
    let result = conn
        .query_row(&sql, params![id], |row| Ok(parse_booking_row(row)))
        .optional()?;
    result.transpose()
}

/// Writes a review only if the stored status is still `pending`.
/// Returns false when another review got there first.
pub fn review_booking_if_pending(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
    manager_notes: Option<&str>,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, manager_notes = ?2
         WHERE id = ?3 AND status = 'pending'",
        params![status.as_str(), manager_notes, id],
    )?;
    Ok(count > 0)
}

pub fn list_booking_details_for_customer(
    conn: &Connection,
    customer_id: &str,
) -> anyhow::Result<Vec<BookingDetails>> {
    list_booking_details(conn, "b.customer_id = ?1", customer_id)
}

pub fn list_booking_details_for_manager(
    conn: &Connection,
    manager_id: &str,
) -> anyhow::Result<Vec<BookingDetails>> {
    list_booking_details(conn, "b.manager_id = ?1", manager_id)
}

fn list_booking_details(
    conn: &Connection,
    filter: &str,
    id: &str,
) -> anyhow::Result<Vec<BookingDetails>> {
    let sql = format!(
        "SELECT {BOOKING_COLUMNS}, t.name, t.location, t.city, c.full_name, c.email, c.phone
         FROM bookings b
         INNER JOIN turfs t ON t.id = b.turf_id
         INNER JOIN profiles c ON c.id = b.customer_id
         WHERE {filter}
         ORDER BY b.created_at DESC, b.rowid DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![id], |row| {
        Ok(parse_booking_row(row).and_then(|booking| {
            Ok(BookingDetails {
                booking,
                turf_name: row.get(12)?,
                turf_location: row.get(13)?,
                turf_city: row.get(14)?,
                customer_name: row.get(15)?,
                customer_email: row.get(16)?,
                customer_phone: row.get(17)?,
            })
        }))
    })?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

// ── Row parsing ──

fn parse_profile_row(row: &rusqlite::Row, offset: usize) -> anyhow::Result<Profile> {
    let role_str: String = row.get(offset + 4)?;
    let created_at_str: String = row.get(offset + 5)?;

    Ok(Profile {
        id: row.get(offset)?,
        full_name: row.get(offset + 1)?,
        email: row.get(offset + 2)?,
        phone: row.get(offset + 3)?,
        role: Role::parse(&role_str)
            .with_context(|| format!("unknown role in profiles row: {role_str}"))?,
        created_at: parse_timestamp(&created_at_str)?,
    })
}

fn parse_turf_row(row: &rusqlite::Row, offset: usize) -> anyhow::Result<Turf> {
    let price_str: String = row.get(offset + 6)?;
    let opening_str: String = row.get(offset + 7)?;
    let closing_str: String = row.get(offset + 8)?;
    let amenities_json: String = row.get(offset + 9)?;
    let created_at_str: String = row.get(offset + 12)?;

    Ok(Turf {
        id: row.get(offset)?,
        manager_id: row.get(offset + 1)?,
        name: row.get(offset + 2)?,
        location: row.get(offset + 3)?,
        city: row.get(offset + 4)?,
        address: row.get(offset + 5)?,
        price_per_hour: parse_decimal(&price_str)?,
        opening_time: parse_time(&opening_str)?,
        closing_time: parse_time(&closing_str)?,
        amenities: serde_json::from_str(&amenities_json)
            .context("invalid amenities in turfs row")?,
        description: row.get(offset + 10)?,
        image_url: row.get(offset + 11)?,
        created_at: parse_timestamp(&created_at_str)?,
    })
}

fn parse_turf_listing_row(row: &rusqlite::Row) -> anyhow::Result<TurfListing> {
    Ok(TurfListing {
        turf: parse_turf_row(row, 0)?,
        manager_name: row.get(13)?,
        manager_phone: row.get(14)?,
        manager_email: row.get(15)?,
    })
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let date_str: String = row.get(4)?;
    let start_str: String = row.get(5)?;
    let end_str: String = row.get(6)?;
    let price_str: String = row.get(7)?;
    let status_str: String = row.get(8)?;
    let created_at_str: String = row.get(11)?;

    Ok(Booking {
        id: row.get(0)?,
        turf_id: row.get(1)?,
        customer_id: row.get(2)?,
        manager_id: row.get(3)?,
        booking_date: NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
            .with_context(|| format!("invalid booking_date: {date_str}"))?,
        start_time: parse_time(&start_str)?,
        end_time: parse_time(&end_str)?,
        total_price: parse_decimal(&price_str)?,
        status: BookingStatus::parse(&status_str)
            .with_context(|| format!("unknown booking status: {status_str}"))?,
        customer_notes: row.get(9)?,
        manager_notes: row.get(10)?,
        created_at: parse_timestamp(&created_at_str)?,
    })
}

fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(s: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .with_context(|| format!("invalid timestamp: {s}"))
}

fn parse_time(s: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(s, TIME_FORMAT).with_context(|| format!("invalid time: {s}"))
}

fn parse_decimal(s: &str) -> anyhow::Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("invalid decimal: {s}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use chrono::Utc;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str(
            &Utc::now().naive_utc().format(TIMESTAMP_FORMAT).to_string(),
            TIMESTAMP_FORMAT,
        )
        .unwrap()
    }

    fn profile(conn: &Connection, id: &str, role: Role) -> Profile {
        let profile = Profile {
            id: id.to_string(),
            full_name: format!("User {id}"),
            email: format!("{id}@example.com"),
            phone: Some("+15550001111".to_string()),
            role,
            created_at: now(),
        };
        insert_profile(conn, &profile, "hash").unwrap();
        profile
    }

    fn turf(conn: &Connection, id: &str, manager_id: &str) -> Turf {
        let turf = Turf {
            id: id.to_string(),
            manager_id: manager_id.to_string(),
            name: "Green Arena".to_string(),
            location: "Baner".to_string(),
            city: "Pune".to_string(),
            address: "12 Stadium Road".to_string(),
            price_per_hour: Decimal::new(2050, 2),
            opening_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            closing_time: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
            amenities: vec!["Floodlights".to_string(), "Parking".to_string()],
            description: None,
            image_url: None,
            created_at: now(),
        };
        insert_turf(conn, &turf).unwrap();
        turf
    }

    fn booking(conn: &Connection, id: &str, turf: &Turf, customer_id: &str) -> Booking {
        let booking = Booking {
            id: id.to_string(),
            turf_id: turf.id.clone(),
            customer_id: customer_id.to_string(),
            manager_id: turf.manager_id.clone(),
            booking_date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(15, 30, 0).unwrap(),
            total_price: Decimal::new(3075, 2),
            status: BookingStatus::Pending,
            customer_notes: None,
            manager_notes: None,
            created_at: now(),
        };
        insert_booking(conn, &booking).unwrap();
        booking
    }

    #[test]
    fn test_profile_round_trip() {
        let conn = setup_db();
        let stored = profile(&conn, "m1", Role::TurfManager);

        let loaded = get_profile(&conn, "m1").unwrap().unwrap();
        assert_eq!(loaded.role, Role::TurfManager);
        assert_eq!(loaded.email, stored.email);
        assert!(get_profile(&conn, "missing").unwrap().is_none());
        assert!(email_taken(&conn, "m1@example.com").unwrap());
    }

    #[test]
    fn test_turf_keeps_price_and_amenity_order() {
        let conn = setup_db();
        profile(&conn, "m1", Role::TurfManager);
        turf(&conn, "t1", "m1");

        let loaded = get_turf(&conn, "t1").unwrap().unwrap();
        assert_eq!(loaded.price_per_hour, Decimal::new(2050, 2));
        assert_eq!(loaded.amenities, vec!["Floodlights", "Parking"]);

        let listing = get_turf_listing(&conn, "t1").unwrap().unwrap();
        assert_eq!(listing.manager_name, "User m1");
    }

    #[test]
    fn test_conditional_review_only_succeeds_once() {
        let conn = setup_db();
        profile(&conn, "m1", Role::TurfManager);
        profile(&conn, "c1", Role::Customer);
        let t = turf(&conn, "t1", "m1");
        booking(&conn, "b1", &t, "c1");

        let first =
            review_booking_if_pending(&conn, "b1", BookingStatus::Approved, Some("ok")).unwrap();
        let second =
            review_booking_if_pending(&conn, "b1", BookingStatus::Rejected, None).unwrap();

        assert!(first);
        assert!(!second);
        let stored = get_booking(&conn, "b1").unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Approved);
        assert_eq!(stored.manager_notes.as_deref(), Some("ok"));
    }

    #[test]
    fn test_booking_details_are_scoped_and_joined() {
        let conn = setup_db();
        profile(&conn, "m1", Role::TurfManager);
        profile(&conn, "m2", Role::TurfManager);
        profile(&conn, "c1", Role::Customer);
        let t1 = turf(&conn, "t1", "m1");
        let t2 = turf(&conn, "t2", "m2");
        booking(&conn, "b1", &t1, "c1");
        booking(&conn, "b2", &t2, "c1");

        let for_m1 = list_booking_details_for_manager(&conn, "m1").unwrap();
        assert_eq!(for_m1.len(), 1);
        assert_eq!(for_m1[0].booking.id, "b1");
        assert_eq!(for_m1[0].customer_email, "c1@example.com");
        assert_eq!(for_m1[0].turf_city, "Pune");

        let for_c1 = list_booking_details_for_customer(&conn, "c1").unwrap();
        assert_eq!(for_c1.len(), 2);
        // newest first
        assert_eq!(for_c1[0].booking.id, "b2");
    }

    #[test]
    fn test_expired_session_resolves_to_nothing() {
        let conn = setup_db();
        profile(&conn, "c1", Role::Customer);
        let created = now();
        let session = Session {
            token: "tok".to_string(),
            profile_id: "c1".to_string(),
            created_at: created,
            expires_at: created + chrono::Duration::hours(1),
        };
        insert_session(&conn, &session).unwrap();

        assert!(get_session_profile(&conn, "tok", &created).unwrap().is_some());
        let later = created + chrono::Duration::hours(2);
        assert!(get_session_profile(&conn, "tok", &later).unwrap().is_none());
        assert_eq!(delete_expired_sessions(&conn, &later).unwrap(), 1);
    }
}
