pub mod availability;
pub mod booking;
pub mod deposit;
pub mod gateway;
pub mod restriction;
pub mod session;
