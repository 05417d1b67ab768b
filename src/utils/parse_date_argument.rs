use crate::Error;
use chrono::NaiveDate;

/// Parses a `YYYY-MM-DD` date supplied as run configuration.
///
/// # Errors
/// Returns `Error::ConfigError` naming the offending option when the date is malformed.
pub fn parse_date_argument(option_name: &str, raw: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
        Error::ConfigError(format!(
            "Invalid {} date '{}' (expected YYYY-MM-DD): {}",
            option_name, raw, e
        ))
    })
}
