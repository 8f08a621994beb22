use async_trait::async_trait;
use chrono::NaiveDate;

use super::PersistenceGateway;
use crate::errors::{AppError, AppResult};
use crate::models::{
    Block, Booking, BookingReceipt, BookingStatus, NewBooking, Service, Settings, TimeSlot,
};

/// Sends every call to `primary`; on a transport failure retries it once
/// against `fallback`. Domain errors from the primary are returned untouched.
pub struct FallbackGateway {
    primary: Box<dyn PersistenceGateway>,
    fallback: Box<dyn PersistenceGateway>,
}

impl FallbackGateway {
    pub fn new(primary: Box<dyn PersistenceGateway>, fallback: Box<dyn PersistenceGateway>) -> Self {
        Self { primary, fallback }
    }
}

fn log_fallback(op: &'static str, err: &AppError) {
    tracing::warn!(op, error = %err, "primary gateway failed, retrying against local store");
}

fn surface(op: &'static str, err: AppError) -> AppError {
    if err.is_transport() {
        tracing::error!(op, error = %err, "fallback gateway failed");
        AppError::Gateway(format!("{op} failed on both transports: {err}"))
    } else {
        err
    }
}

#[async_trait]
impl PersistenceGateway for FallbackGateway {
    async fn list_services(&self) -> AppResult<Vec<Service>> {
        match self.primary.list_services().await {
            Err(e) if e.is_transport() => {
                log_fallback("list_services", &e);
                self.fallback
                    .list_services()
                    .await
                    .map_err(|e| surface("list_services", e))
            }
            result => result,
        }
    }

    async fn list_bookings(&self) -> AppResult<Vec<Booking>> {
        match self.primary.list_bookings().await {
            Err(e) if e.is_transport() => {
                log_fallback("list_bookings", &e);
                self.fallback
                    .list_bookings()
                    .await
                    .map_err(|e| surface("list_bookings", e))
            }
            result => result,
        }
    }

    async fn create_booking(&self, booking: &NewBooking) -> AppResult<BookingReceipt> {
        match self.primary.create_booking(booking).await {
            Err(e) if e.is_transport() => {
                log_fallback("create_booking", &e);
                self.fallback
                    .create_booking(booking)
                    .await
                    .map_err(|e| surface("create_booking", e))
            }
            result => result,
        }
    }

    async fn update_booking_status(&self, id: &str, status: BookingStatus) -> AppResult<Booking> {
        match self.primary.update_booking_status(id, status).await {
            Err(e) if e.is_transport() => {
                log_fallback("update_booking_status", &e);
                self.fallback
                    .update_booking_status(id, status)
                    .await
                    .map_err(|e| surface("update_booking_status", e))
            }
            result => result,
        }
    }

    async fn list_blocks(&self) -> AppResult<Vec<Block>> {
        match self.primary.list_blocks().await {
            Err(e) if e.is_transport() => {
                log_fallback("list_blocks", &e);
                self.fallback
                    .list_blocks()
                    .await
                    .map_err(|e| surface("list_blocks", e))
            }
            result => result,
        }
    }

    async fn create_block(&self, date: NaiveDate, notes: &str) -> AppResult<Block> {
        match self.primary.create_block(date, notes).await {
            Err(e) if e.is_transport() => {
                log_fallback("create_block", &e);
                self.fallback
                    .create_block(date, notes)
                    .await
                    .map_err(|e| surface("create_block", e))
            }
            result => result,
        }
    }

    async fn get_settings(&self) -> AppResult<Settings> {
        match self.primary.get_settings().await {
            Err(e) if e.is_transport() => {
                log_fallback("get_settings", &e);
                self.fallback
                    .get_settings()
                    .await
                    .map_err(|e| surface("get_settings", e))
            }
            result => result,
        }
    }

    async fn put_settings(&self, settings: &Settings) -> AppResult<Settings> {
        match self.primary.put_settings(settings).await {
            Err(e) if e.is_transport() => {
                log_fallback("put_settings", &e);
                self.fallback
                    .put_settings(settings)
                    .await
                    .map_err(|e| surface("put_settings", e))
            }
            result => result,
        }
    }

    async fn get_availability(&self, date: NaiveDate) -> AppResult<Vec<TimeSlot>> {
        match self.primary.get_availability(date).await {
            Err(e) if e.is_transport() => {
                log_fallback("get_availability", &e);
                self.fallback
                    .get_availability(date)
                    .await
                    .map_err(|e| surface("get_availability", e))
            }
            result => result,
        }
    }
}
