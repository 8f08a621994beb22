pub mod fallback;
pub mod local;
pub mod remote;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::AppResult;
use crate::models::{
    Block, Booking, BookingReceipt, BookingStatus, NewBooking, Service, Settings, TimeSlot,
};

pub use fallback::FallbackGateway;
pub use local::LocalGateway;
pub use remote::RemoteGateway;

#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn list_services(&self) -> AppResult<Vec<Service>>;

    async fn list_bookings(&self) -> AppResult<Vec<Booking>>;

    async fn create_booking(&self, booking: &NewBooking) -> AppResult<BookingReceipt>;

    async fn update_booking_status(&self, id: &str, status: BookingStatus) -> AppResult<Booking>;

    async fn list_blocks(&self) -> AppResult<Vec<Block>>;

    async fn create_block(&self, date: NaiveDate, notes: &str) -> AppResult<Block>;

    async fn get_settings(&self) -> AppResult<Settings>;

    async fn put_settings(&self, settings: &Settings) -> AppResult<Settings>;

    async fn get_availability(&self, date: NaiveDate) -> AppResult<Vec<TimeSlot>>;
}
