use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{Connection, ErrorCode};
use uuid::Uuid;

use super::PersistenceGateway;
use crate::db::{self, queries};
use crate::errors::{AppError, AppResult};
use crate::models::{
    Block, BlockType, Booking, BookingReceipt, BookingStatus, NewBooking, Service, Settings,
    TimeSlot,
};
use crate::services::availability;

#[derive(Clone)]
pub struct LocalGateway {
    conn: Arc<Mutex<Connection>>,
}

impl LocalGateway {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    pub fn open(path: &str) -> anyhow::Result<Self> {
        Ok(Self::new(db::init_db(path)?))
    }

    fn conn(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Gateway("local store lock poisoned".to_string()))
    }
}

fn settings_or_default(conn: &Connection) -> AppResult<Settings> {
    Ok(queries::get_settings(conn)?.unwrap_or_default())
}

fn is_unique_violation(err: &AppError) -> bool {
    matches!(
        err,
        AppError::Database(rusqlite::Error::SqliteFailure(e, _))
            if e.code == ErrorCode::ConstraintViolation
    )
}

#[async_trait]
impl PersistenceGateway for LocalGateway {
    async fn list_services(&self) -> AppResult<Vec<Service>> {
        let conn = self.conn()?;
        queries::list_services(&conn)
    }

    async fn list_bookings(&self) -> AppResult<Vec<Booking>> {
        let conn = self.conn()?;
        queries::list_bookings(&conn)
    }

    async fn create_booking(&self, booking: &NewBooking) -> AppResult<BookingReceipt> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let settings = settings_or_default(&tx)?;
        let blocks = queries::blocks_on_date(&tx, booking.date)?;
        if availability::is_blocked(booking.date, &blocks) {
            return Err(AppError::NotAvailable(format!(
                "{} is closed for bookings",
                booking.date
            )));
        }
        let existing = queries::bookings_on_date(&tx, booking.date)?;
        if !availability::is_slot_available(
            booking.date,
            &booking.time,
            settings.opening_hours(),
            &existing,
            &blocks,
        ) {
            return Err(AppError::NotAvailable(format!(
                "{} at {} is no longer available",
                booking.date, booking.time
            )));
        }

        let id = Uuid::new_v4().to_string();
        match queries::insert_booking(&tx, &id, booking) {
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::NotAvailable(format!(
                    "{} at {} was just taken",
                    booking.date, booking.time
                )));
            }
            other => other?,
        }
        tx.commit()?;

        tracing::info!(
            booking_id = %id,
            service_id = %booking.service_id,
            date = %booking.date,
            time = %booking.time,
            deposit = %booking.deposit_amount,
            "booking created"
        );

        Ok(BookingReceipt {
            id,
            status: booking.status,
            amount_due: booking.amount_due,
            deposit_amount: booking.deposit_amount,
            payment_token: None,
        })
    }

    async fn update_booking_status(&self, id: &str, status: BookingStatus) -> AppResult<Booking> {
        let conn = self.conn()?;
        let current = queries::get_booking_by_id(&conn, id)?
            .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;

        let next = current.status.transition(status)?;
        if !queries::update_booking_status(&conn, id, next, current.version)? {
            return Err(AppError::Conflict(format!(
                "booking {id} was modified concurrently"
            )));
        }

        tracing::info!(
            booking_id = %id,
            from = current.status.as_str(),
            to = next.as_str(),
            "booking status changed"
        );

        queries::get_booking_by_id(&conn, id)?
            .ok_or_else(|| AppError::NotFound(format!("booking {id}")))
    }

    async fn list_blocks(&self) -> AppResult<Vec<Block>> {
        let conn = self.conn()?;
        queries::list_blocks(&conn)
    }

    async fn create_block(&self, date: NaiveDate, notes: &str) -> AppResult<Block> {
        let conn = self.conn()?;
        let block = Block {
            id: Uuid::new_v4().to_string(),
            date,
            block_type: BlockType::Blackout,
            notes: notes.to_string(),
        };
        queries::insert_block(&conn, &block)?;

        tracing::info!(block_id = %block.id, date = %date, "date blocked");
        Ok(block)
    }

    async fn get_settings(&self) -> AppResult<Settings> {
        let conn = self.conn()?;
        settings_or_default(&conn)
    }

    async fn put_settings(&self, settings: &Settings) -> AppResult<Settings> {
        settings.validate()?;
        let conn = self.conn()?;
        queries::save_settings(&conn, settings)?;
        settings_or_default(&conn)
    }

    async fn get_availability(&self, date: NaiveDate) -> AppResult<Vec<TimeSlot>> {
        let conn = self.conn()?;
        let settings = settings_or_default(&conn)?;
        let bookings = queries::bookings_on_date(&conn, date)?;
        let blocks = queries::blocks_on_date(&conn, date)?;
        Ok(availability::resolve_slots(
            date,
            settings.opening_hours(),
            &bookings,
            &blocks,
        ))
    }
}
