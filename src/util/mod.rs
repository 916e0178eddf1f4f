use chrono::{Local, NaiveDate};

/// Today's date in the browser's local timezone.
pub(crate) fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// Range checks are left to the form validators.
pub(crate) fn parse_priority(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok()
}
