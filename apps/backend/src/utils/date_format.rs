//! `YYYY-MM-DD` serde for calendar dates in request and response bodies.

use time::Date;

use crate::error::AppError;

time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` value that arrived as a plain string.
pub fn parse_iso_date(field: &str, raw: &str) -> Result<Date, AppError> {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    Date::parse(raw.trim(), format)
        .map_err(|_| AppError::invalid(format!("{field} must be a date formatted as YYYY-MM-DD")))
}
