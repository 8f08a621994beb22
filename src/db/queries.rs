use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use crate::errors::AppResult;
use crate::models::{
    Block, BlockType, Booking, BookingStatus, Category, Customer, NewBooking, Service, Settings,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ── Services ──

pub fn list_services(conn: &Connection) -> AppResult<Vec<Service>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, category, duration, price, image, notes
         FROM services ORDER BY sort_order ASC, title ASC",
    )?;

    let rows = stmt.query_map([], parse_service_row)?;

    let mut services = vec![];
    for row in rows {
        services.push(row?);
    }
    Ok(services)
}

fn parse_service_row(row: &Row) -> rusqlite::Result<Service> {
    let category_str: String = row.get(2)?;
    let category = Category::parse(&category_str).ok_or_else(|| {
        conversion_error(2, format!("unknown service category: {category_str}"))
    })?;
    let notes_json: String = row.get(6)?;
    let notes: Vec<String> =
        serde_json::from_str(&notes_json).map_err(|e| conversion_error(6, e))?;

    Ok(Service {
        id: row.get(0)?,
        title: row.get(1)?,
        category,
        duration: row.get(3)?,
        price: decimal_column(row, 4)?,
        image: row.get(5)?,
        notes,
    })
}

// ── Bookings ──

const BOOKING_COLUMNS: &str = "id, service_id, service_title, date, time, customer_name, customer_phone, \
     customer_email, notes, status, amount_due, deposit_amount, deposit_percent, created_at, version";

pub fn insert_booking(conn: &Connection, id: &str, booking: &NewBooking) -> AppResult<()> {
    let created_at = booking.created_at.to_rfc3339();
    conn.execute(
        "INSERT INTO bookings (id, service_id, service_title, date, time, customer_name, customer_phone,
                               customer_email, notes, status, amount_due, deposit_amount, deposit_percent,
                               created_at, updated_at, version)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?14, 1)",
        params![
            id,
            booking.service_id,
            booking.service_title,
            booking.date.format(DATE_FORMAT).to_string(),
            booking.time,
            booking.customer.name,
            booking.customer.phone,
            booking.customer.email,
            booking.notes,
            booking.status.as_str(),
            booking.amount_due.to_string(),
            booking.deposit_amount.to_string(),
            booking.deposit_percent.to_string(),
            created_at,
        ],
    )?;
    Ok(())
}

pub fn list_bookings(conn: &Connection) -> AppResult<Vec<Booking>> {
    let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY date ASC, time ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], parse_booking_row)?;
    let bookings = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(bookings)
}

pub fn bookings_on_date(conn: &Connection, date: NaiveDate) -> AppResult<Vec<Booking>> {
    let sql = format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE date = ?1 AND status != 'cancelled' ORDER BY time ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![date.format(DATE_FORMAT).to_string()], parse_booking_row)?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> AppResult<Option<Booking>> {
    let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1");
    let booking = conn
        .query_row(&sql, params![id], parse_booking_row)
        .optional()?;
    Ok(booking)
}

/// Conditional on `expected_version`; returns false when another writer got
/// there first.
pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
    expected_version: i64,
) -> AppResult<bool> {
    let now = Utc::now().to_rfc3339();
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2, version = version + 1
         WHERE id = ?3 AND version = ?4",
        params![status.as_str(), now, id, expected_version],
    )?;
    Ok(count > 0)
}

fn parse_booking_row(row: &Row) -> rusqlite::Result<Booking> {
    let status_str: String = row.get(9)?;
    let status = BookingStatus::parse(&status_str)
        .ok_or_else(|| conversion_error(9, format!("unknown booking status: {status_str}")))?;
    let created_at_str: String = row.get(13)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| conversion_error(13, e))?
        .with_timezone(&Utc);

    Ok(Booking {
        id: row.get(0)?,
        service_id: row.get(1)?,
        service_title: row.get(2)?,
        date: date_column(row, 3)?,
        time: row.get(4)?,
        customer: Customer {
            name: row.get(5)?,
            phone: row.get(6)?,
            email: row.get(7)?,
        },
        notes: row.get(8)?,
        status,
        amount_due: decimal_column(row, 10)?,
        deposit_amount: decimal_column(row, 11)?,
        deposit_percent: decimal_column(row, 12)?,
        created_at,
        version: row.get(14)?,
    })
}

// ── Blocks ──

pub fn list_blocks(conn: &Connection) -> AppResult<Vec<Block>> {
    let mut stmt =
        conn.prepare("SELECT id, date, type, notes FROM blocks ORDER BY date ASC, created_at ASC")?;
    let rows = stmt.query_map([], parse_block_row)?;

    let mut blocks = vec![];
    for row in rows {
        blocks.push(row?);
    }
    Ok(blocks)
}

pub fn blocks_on_date(conn: &Connection, date: NaiveDate) -> AppResult<Vec<Block>> {
    let mut stmt = conn.prepare("SELECT id, date, type, notes FROM blocks WHERE date = ?1")?;
    let rows = stmt.query_map(params![date.format(DATE_FORMAT).to_string()], parse_block_row)?;

    let mut blocks = vec![];
    for row in rows {
        blocks.push(row?);
    }
    Ok(blocks)
}

pub fn insert_block(conn: &Connection, block: &Block) -> AppResult<()> {
    conn.execute(
        "INSERT INTO blocks (id, date, type, notes) VALUES (?1, ?2, ?3, ?4)",
        params![
            block.id,
            block.date.format(DATE_FORMAT).to_string(),
            block.block_type.as_str(),
            block.notes,
        ],
    )?;
    Ok(())
}

fn parse_block_row(row: &Row) -> rusqlite::Result<Block> {
    let type_str: String = row.get(2)?;
    Ok(Block {
        id: row.get(0)?,
        date: date_column(row, 1)?,
        block_type: BlockType::parse(&type_str),
        notes: row.get(3)?,
    })
}

// ── Settings ──

pub fn get_settings(conn: &Connection) -> AppResult<Option<Settings>> {
    let settings = conn
        .query_row(
            "SELECT business_name, deposit_percent, deposit_min, hours_open, hours_close
             FROM settings WHERE id = 1",
            [],
            |row| {
                Ok(Settings {
                    business_name: row.get(0)?,
                    deposit_percent: decimal_column(row, 1)?,
                    deposit_min: decimal_column(row, 2)?,
                    hours_open: row.get(3)?,
                    hours_close: row.get(4)?,
                })
            },
        )
        .optional()?;
    Ok(settings)
}

pub fn save_settings(conn: &Connection, settings: &Settings) -> AppResult<()> {
    conn.execute(
        "INSERT INTO settings (id, business_name, deposit_percent, deposit_min, hours_open, hours_close)
         VALUES (1, ?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
           business_name = excluded.business_name,
           deposit_percent = excluded.deposit_percent,
           deposit_min = excluded.deposit_min,
           hours_open = excluded.hours_open,
           hours_close = excluded.hours_close,
           updated_at = datetime('now')",
        params![
            settings.business_name,
            settings.deposit_percent.to_string(),
            settings.deposit_min.to_string(),
            settings.hours_open,
            settings.hours_close,
        ],
    )?;
    Ok(())
}

// ── Column helpers ──

fn decimal_column(row: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str(&raw).map_err(|e| conversion_error(idx, e))
}

fn date_column(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|e| conversion_error(idx, e))
}

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, err.into())
}
