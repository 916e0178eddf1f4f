//! Date picker texts and formats for the supported languages.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use strum::{Display, EnumString};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Language {
    #[default]
    Us,
    Fi,
}

pub(crate) struct DatePickerI18n {
    pub month_names: [&'static str; 12],
    /// Sunday first.
    pub weekdays: [&'static str; 7],
    pub weekdays_short: [&'static str; 7],
    pub first_day_of_week: Weekday,
    pub today: &'static str,
    pub cancel: &'static str,
    /// Input pattern as shown to the user.
    pub hint: &'static str,
    date_format: &'static str,
    date_format_short: &'static str,
}

const US: DatePickerI18n = DatePickerI18n {
    month_names: [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ],
    weekdays: [
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ],
    weekdays_short: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
    first_day_of_week: Weekday::Sun,
    today: "Today",
    cancel: "Cancel",
    hint: "MM-dd-yyyy",
    date_format: "%m-%d-%Y",
    date_format_short: "%m-%d-%y",
};

const FI: DatePickerI18n = DatePickerI18n {
    month_names: [
        "Tammikuu",
        "Helmikuu",
        "Maaliskuu",
        "Huhtikuu",
        "Toukokuu",
        "Kesäkuu",
        "Heinäkuu",
        "Elokuu",
        "Syyskuu",
        "Lokakuu",
        "Marraskuu",
        "Joulukuu",
    ],
    weekdays: [
        "Sunnuntai",
        "Maanantai",
        "Tiistai",
        "Keskiviikko",
        "Torstai",
        "Perjantai",
        "Lauantai",
    ],
    weekdays_short: ["Su", "Ma", "Ti", "Ke", "To", "Pe", "La"],
    first_day_of_week: Weekday::Mon,
    today: "Tänään",
    cancel: "Peruuta",
    hint: "dd.MM.yyyy",
    date_format: "%d.%m.%Y",
    date_format_short: "%d.%m.%y",
};

impl Language {
    pub fn i18n(self) -> &'static DatePickerI18n {
        match self {
            Language::Us => &US,
            Language::Fi => &FI,
        }
    }
}

impl DatePickerI18n {
    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(self.date_format).to_string()
    }

    /// Inputs longer than eight characters must carry a four-digit year.
    pub fn parse_date(&self, input: &str) -> Option<NaiveDate> {
        let input = input.trim();
        let format = if input.chars().count() > 8 {
            self.date_format
        } else {
            self.date_format_short
        };
        NaiveDate::parse_from_str(input, format).ok()
    }

    pub fn format_title(&self, month: u32, year: i32) -> String {
        let name = self
            .month_names
            .get(month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or_default();
        format!("{name} {year}")
    }

    /// `(short, long)` weekday names in display order.
    pub fn week_header(&self) -> Vec<(&'static str, &'static str)> {
        let start = self.first_day_of_week.num_days_from_sunday() as usize;
        (0..7)
            .map(|i| (start + i) % 7)
            .map(|d| (self.weekdays_short[d], self.weekdays[d]))
            .collect()
    }

    /// The month laid out in weeks; `None` pads the first and last rows.
    pub fn month_grid(&self, year: i32, month: u32) -> Vec<[Option<NaiveDate>; 7]> {
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return vec![];
        };
        let offset = (first.weekday().num_days_from_sunday() + 7
            - self.first_day_of_week.num_days_from_sunday())
            % 7;

        let mut weeks = vec![];
        let mut week = [None; 7];
        let mut slot = offset as usize;
        let mut day = Some(first);
        while let Some(d) = day.filter(|d| d.month() == month) {
            week[slot] = Some(d);
            slot += 1;
            if slot == 7 {
                weeks.push(week);
                week = [None; 7];
                slot = 0;
            }
            day = d.checked_add_days(Days::new(1));
        }
        if slot > 0 {
            weeks.push(week);
        }
        weeks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn formats_follow_language() {
        let d = day(2026, 10, 21);
        assert_eq!(Language::Us.i18n().format_date(d), "10-21-2026");
        assert_eq!(Language::Fi.i18n().format_date(d), "21.10.2026");
    }

    #[test]
    fn short_input_uses_two_digit_year() {
        let fi = Language::Fi.i18n();
        assert_eq!(fi.parse_date("21.10.26"), Some(day(2026, 10, 21)));
        assert_eq!(fi.parse_date("21.10.2026"), Some(day(2026, 10, 21)));
        assert_eq!(fi.parse_date("soon"), None);

        let us = Language::Us.i18n();
        assert_eq!(us.parse_date("10-21-26"), Some(day(2026, 10, 21)));
    }

    #[test]
    fn week_starts_per_language() {
        assert_eq!(Language::Us.i18n().week_header()[0], ("Sun", "Sunday"));
        assert_eq!(Language::Fi.i18n().week_header()[0], ("Ma", "Maanantai"));
        assert_eq!(Language::Fi.i18n().week_header()[6].0, "Su");
    }

    #[test]
    fn month_grid_pads_to_first_weekday() {
        // October 2026 starts on a Thursday.
        let fi = Language::Fi.i18n().month_grid(2026, 10);
        assert_eq!(fi[0][3], Some(day(2026, 10, 1)));
        assert_eq!(fi[0][2], None);

        let us = Language::Us.i18n().month_grid(2026, 10);
        assert_eq!(us[0][4], Some(day(2026, 10, 1)));

        let days: usize = fi.iter().flatten().filter(|d| d.is_some()).count();
        assert_eq!(days, 31);
    }

    #[test]
    fn titles_and_names() {
        assert_eq!(Language::Fi.i18n().format_title(6, 2026), "Kesäkuu 2026");
        assert_eq!(Language::from_str("fi").ok(), Some(Language::Fi));
        assert_eq!(Language::Us.to_string(), "us");
    }
}
