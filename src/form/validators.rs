use super::FieldValue;
use crate::util::today_local;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::sync::Arc;

pub(crate) const DEADLINE_MESSAGE: &str = "Deadline must be in the future and not a weekend day";

pub(crate) trait Validator: Send + Sync {
    fn name(&self) -> &'static str;

    fn message(&self) -> String;

    fn validate(&self, value: &FieldValue) -> bool;
}

/// The field must hold something: non-empty text, a number, a date, a contact.
pub(crate) struct Required;

impl Validator for Required {
    fn name(&self) -> &'static str {
        "Required"
    }

    fn message(&self) -> String {
        "must not be empty".to_string()
    }

    fn validate(&self, value: &FieldValue) -> bool {
        !value.is_empty()
    }
}

pub(crate) struct NotBlank;

impl Validator for NotBlank {
    fn name(&self) -> &'static str {
        "NotBlank"
    }

    fn message(&self) -> String {
        "must not be blank".to_string()
    }

    fn validate(&self, value: &FieldValue) -> bool {
        match value {
            FieldValue::Text(s) => !s.trim().is_empty(),
            other => !other.is_empty(),
        }
    }
}

/// Lower bound for numeric fields. An empty number passes; pair with
/// [`Required`] when the field is mandatory.
pub(crate) struct Min(pub i32);

impl Validator for Min {
    fn name(&self) -> &'static str {
        "Min"
    }

    fn message(&self) -> String {
        format!("must be greater than or equal to {}", self.0)
    }

    fn validate(&self, value: &FieldValue) -> bool {
        match value {
            FieldValue::Number(Some(n)) => *n >= self.0,
            _ => true,
        }
    }
}

pub(crate) struct Max(pub i32);

impl Validator for Max {
    fn name(&self) -> &'static str {
        "Max"
    }

    fn message(&self) -> String {
        format!("must be less than or equal to {}", self.0)
    }

    fn validate(&self, value: &FieldValue) -> bool {
        match value {
            FieldValue::Number(Some(n)) => *n <= self.0,
            _ => true,
        }
    }
}

/// A deadline on a weekday, no earlier than tomorrow.
pub(crate) fn future_weekday(date: NaiveDate, today: NaiveDate) -> bool {
    let Some(tomorrow) = today.checked_add_days(Days::new(1)) else {
        return false;
    };
    date >= tomorrow && !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Deadline check against the local calendar day. A missing date fails.
#[derive(Clone)]
pub(crate) struct FutureWeekdayAndRequired {
    today: Arc<dyn Fn() -> NaiveDate + Send + Sync>,
}

impl FutureWeekdayAndRequired {
    pub fn new() -> Self {
        Self {
            today: Arc::new(today_local),
        }
    }

    /// Pin "today" to a fixed date.
    pub fn at(today: NaiveDate) -> Self {
        Self {
            today: Arc::new(move || today),
        }
    }
}

impl Default for FutureWeekdayAndRequired {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for FutureWeekdayAndRequired {
    fn name(&self) -> &'static str {
        "FutureWeekdayAndRequired"
    }

    fn message(&self) -> String {
        DEADLINE_MESSAGE.to_string()
    }

    fn validate(&self, value: &FieldValue) -> bool {
        match value {
            FieldValue::Date(Some(date)) => future_weekday(*date, (self.today)()),
            _ => false,
        }
    }
}
