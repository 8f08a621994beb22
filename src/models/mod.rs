pub mod block;
pub mod booking;
pub mod service;
pub mod settings;
pub mod slot;

pub use block::{Block, BlockType};
pub use booking::{Booking, BookingReceipt, BookingStatus, Customer, NewBooking};
pub use service::{Category, Service};
pub use settings::{OpeningHours, Settings};
pub use slot::TimeSlot;
