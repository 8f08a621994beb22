use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: String,
    pub service_id: String,
    // Copied at booking time
    pub service_title: String,
    pub date: NaiveDate,
    pub time: String,
    pub customer: Customer,
    #[serde(default)]
    pub notes: String,
    pub status: BookingStatus,
    pub amount_due: Decimal,
    pub deposit_amount: Decimal,
    pub deposit_percent: Decimal,
    pub created_at: DateTime<Utc>,
    #[serde(default = "initial_version")]
    pub version: i64,
}

fn initial_version() -> i64 {
    1
}

impl Booking {
    pub fn occupies_slot(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewBooking {
    pub service_id: String,
    pub service_title: String,
    pub date: NaiveDate,
    pub time: String,
    pub customer: Customer,
    #[serde(default)]
    pub notes: String,
    pub status: BookingStatus,
    pub amount_due: Decimal,
    pub deposit_amount: Decimal,
    pub deposit_percent: Decimal,
    pub created_at: DateTime<Utc>,
}

impl NewBooking {
    pub fn into_booking(self, id: String) -> Booking {
        Booking {
            id,
            service_id: self.service_id,
            service_title: self.service_title,
            date: self.date,
            time: self.time,
            customer: self.customer,
            notes: self.notes,
            status: self.status,
            amount_due: self.amount_due,
            deposit_amount: self.deposit_amount,
            deposit_percent: self.deposit_percent,
            created_at: self.created_at,
            version: initial_version(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingReceipt {
    pub id: String,
    pub status: BookingStatus,
    pub amount_due: Decimal,
    pub deposit_amount: Decimal,
    #[serde(default)]
    pub payment_token: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    DepositPending,
    DepositPaid,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::DepositPending,
        BookingStatus::DepositPaid,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
        BookingStatus::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::DepositPending => "deposit_pending",
            BookingStatus::DepositPaid => "deposit_paid",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::NoShow => "no_show",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_next().is_empty()
    }

    pub fn allowed_next(&self) -> &'static [BookingStatus] {
        use BookingStatus::*;
        match self {
            DepositPending => &[DepositPaid, Cancelled, NoShow],
            DepositPaid => &[Completed, Cancelled, NoShow],
            Completed | Cancelled | NoShow => &[],
        }
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    pub fn transition(self, next: BookingStatus) -> AppResult<BookingStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}
