use chrono::NaiveDate;

use crate::models::slot::{format_slot_time, parse_slot_time};
use crate::models::{Block, Booking, OpeningHours, TimeSlot};

pub fn is_blocked(date: NaiveDate, blocks: &[Block]) -> bool {
    blocks.iter().any(|block| block.date == date)
}

pub fn is_taken(date: NaiveDate, time: &str, bookings: &[Booking]) -> bool {
    let Some(wanted) = parse_slot_time(time) else {
        return false;
    };
    bookings.iter().any(|booking| {
        booking.occupies_slot()
            && booking.date == date
            && parse_slot_time(&booking.time) == Some(wanted)
    })
}

/// Hourly slots for `date` within `[open, close)`. A blocked date yields no
/// slots at all.
pub fn resolve_slots(
    date: NaiveDate,
    hours: OpeningHours,
    bookings: &[Booking],
    blocks: &[Block],
) -> Vec<TimeSlot> {
    if is_blocked(date, blocks) {
        return Vec::new();
    }

    (hours.open..hours.close.min(24))
        .map(|hour| {
            let taken = is_taken(date, &format_slot_time(hour), bookings);
            TimeSlot::on_the_hour(hour, !taken)
        })
        .collect()
}

pub fn is_slot_available(
    date: NaiveDate,
    time: &str,
    hours: OpeningHours,
    bookings: &[Booking],
    blocks: &[Block],
) -> bool {
    match parse_slot_time(time) {
        Some((hour, 0)) if hour >= hours.open && hour < hours.close => {
            !is_blocked(date, blocks) && !is_taken(date, time, bookings)
        }
        _ => false,
    }
}
