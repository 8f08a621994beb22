use std::sync::LazyLock;

use regex::Regex;

static DO_NOT_BOOK_AFTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)do not book after\s*(\d{1,2})\s*(am|pm)\b").expect("Invalid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Restriction {
    pub latest_hour: u32,
}

impl Restriction {
    pub fn is_violated_by(&self, hour: u32) -> bool {
        hour > self.latest_hour
    }

    pub fn warning(&self, time: &str) -> String {
        format!(
            "{time} is after this service's latest recommended start ({:02}:00); the stylist may need to reschedule",
            self.latest_hour
        )
    }
}

/// First note carrying a "do not book after" hint wins.
pub fn parse_restriction<S: AsRef<str>>(notes: &[S]) -> Option<Restriction> {
    notes.iter().find_map(|note| parse_note(note.as_ref()))
}

fn parse_note(note: &str) -> Option<Restriction> {
    let caps = DO_NOT_BOOK_AFTER_RE.captures(note)?;
    let hour: u32 = caps[1].parse().ok()?;
    if !(1..=12).contains(&hour) {
        return None;
    }
    let pm = caps[2].eq_ignore_ascii_case("pm");
    let latest_hour = match (hour, pm) {
        (12, true) => 12,
        (12, false) => 0,
        (h, true) => h + 12,
        (h, false) => h,
    };
    Some(Restriction { latest_hour })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(note: &str) -> Option<u32> {
        parse_restriction(&[note]).map(|r| r.latest_hour)
    }

    #[test]
    fn test_morning_cutoff() {
        assert_eq!(parse("DO NOT BOOK AFTER 8AM"), Some(8));
    }

    #[test]
    fn test_noon_and_midnight() {
        assert_eq!(parse("Please DO NOT BOOK AFTER 12PM"), Some(12));
        assert_eq!(parse("DO NOT BOOK AFTER 12AM"), Some(0));
    }

    #[test]
    fn test_pm_adds_twelve() {
        assert_eq!(parse("do not book after 3pm"), Some(15));
        assert_eq!(parse("Do Not Book After 5 PM!"), Some(17));
    }

    #[test]
    fn test_no_matching_note() {
        assert_eq!(parse("Bring your own hair"), None);
        assert_eq!(parse("DO NOT BOOK AFTER lunch"), None);
        assert_eq!(parse("DO NOT BOOK AFTER 13PM"), None);
        assert!(parse_restriction::<&str>(&[]).is_none());
    }

    #[test]
    fn test_first_matching_note_wins() {
        let notes = vec![
            "Hair included".to_string(),
            "DO NOT BOOK AFTER 10AM".to_string(),
            "DO NOT BOOK AFTER 2PM".to_string(),
        ];
        assert_eq!(parse_restriction(&notes), Some(Restriction { latest_hour: 10 }));
    }

    #[test]
    fn test_violation_is_strictly_after() {
        let restriction = Restriction { latest_hour: 8 };
        assert!(!restriction.is_violated_by(8));
        assert!(!restriction.is_violated_by(7));
        assert!(restriction.is_violated_by(9));
    }
}
