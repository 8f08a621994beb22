use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::models::slot::{format_slot_time, parse_slot_time};
use crate::models::{BookingReceipt, Customer};

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s().\-]+$").expect("Invalid regex"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

const MIN_PHONE_DIGITS: usize = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingForm {
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub customer: CustomerForm,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmittedBooking {
    #[serde(flatten)]
    pub receipt: BookingReceipt,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

fn required<'a>(value: Option<&'a str>, field: &'static str, label: &str) -> AppResult<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::validation(field, format!("{label} is required"))),
    }
}

pub fn validate_customer(form: &CustomerForm) -> AppResult<Customer> {
    let name = required(form.name.as_deref(), "name", "name")?;

    let phone = required(form.phone.as_deref(), "phone", "phone number")?;
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !PHONE_RE.is_match(phone) || digits < MIN_PHONE_DIGITS {
        return Err(AppError::validation(
            "phone",
            "enter a valid phone number with at least 10 digits",
        ));
    }

    let email = required(form.email.as_deref(), "email", "email")?;
    if !EMAIL_RE.is_match(email) {
        return Err(AppError::validation("email", "enter a valid email address"));
    }

    Ok(Customer {
        name: name.to_string(),
        phone: phone.to_string(),
        email: email.to_string(),
    })
}

pub fn parse_date_field(value: Option<&str>) -> AppResult<NaiveDate> {
    let raw = required(value, "date", "date")?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::validation("date", "date must be YYYY-MM-DD"))
}

pub fn parse_time_field(value: Option<&str>) -> AppResult<(u32, String)> {
    let raw = required(value, "time", "time")?;
    match parse_slot_time(raw) {
        Some((hour, 0)) => Ok((hour, format_slot_time(hour))),
        Some((hour, minute)) => Ok((hour, format!("{hour:02}:{minute:02}"))),
        None => Err(AppError::validation("time", "time must be HH:MM")),
    }
}
