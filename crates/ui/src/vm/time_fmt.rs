use chrono::{DateTime, Utc};

/// Short day-first stamp used for the best game line, e.g. `14.11.23 22:13`.
#[must_use]
pub fn format_record_date(value: DateTime<Utc>) -> String {
    value.format("%d.%m.%y %H:%M").to_string()
}

/// A `[0, 1]` ratio as a percentage with two decimals, e.g. `73.33%`.
#[must_use]
pub fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}
