use chrono::{NaiveDate, Utc};

/// Calendar-date format shared with the backend (`2026-08-06`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}
