use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses an ISO-8601-like creation timestamp into UTC.
///
/// Accepts explicit offsets (including a trailing `Z`), naive date-times (assumed to be
/// UTC) and bare dates (midnight UTC). Anything else yields `None`.
///
/// # Example
/// ```
/// use tech_sniffer::utils::parse_creation_timestamp;
///
/// let parsed = parse_creation_timestamp("2008-07-31T21:42:52.667").unwrap();
/// assert_eq!(parsed.to_rfc3339(), "2008-07-31T21:42:52.667+00:00");
///
/// assert!(parse_creation_timestamp("yesterday").is_none());
/// ```
pub fn parse_creation_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if raw.is_empty() {
        return None;
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
