use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeSlot {
    pub time: String,
    pub available: bool,
    pub label: String,
}

impl TimeSlot {
    pub fn on_the_hour(hour: u32, available: bool) -> Self {
        Self {
            time: format_slot_time(hour),
            available,
            label: hour_label(hour),
        }
    }
}

pub fn format_slot_time(hour: u32) -> String {
    format!("{hour:02}:00")
}

pub fn parse_slot_time(s: &str) -> Option<(u32, u32)> {
    let (h, m) = s.trim().split_once(':')?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return None;
    }
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

pub fn hour_label(hour: u32) -> String {
    let suffix = if hour % 24 < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display}:00 {suffix}")
}
