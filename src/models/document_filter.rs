use crate::{Document, Error};
use chrono::{Days, NaiveDate};
use std::fmt;

/// An inclusive window of calendar dates (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// `None` means no lower bound.
    pub from: Option<NaiveDate>,
    pub to: NaiveDate,
}

impl DateRange {
    /// Creates a window from optional bounds. A missing `to` defaults to `today`.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if `from` is after `to`.
    pub fn new(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, Error> {
        let to = to.unwrap_or(today);

        if let Some(from) = from {
            if from > to {
                return Err(Error::ConfigError(format!(
                    "Date range start {} is after its end {}",
                    from, to
                )));
            }
        }

        Ok(DateRange { from, to })
    }

    /// The last `days` calendar days, ending with (and including) `today`.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if `days` is zero or reaches before the calendar's start.
    pub fn last_days(days: u32, today: NaiveDate) -> Result<Self, Error> {
        if days == 0 {
            return Err(Error::ConfigError(
                "The number of days must be at least 1".to_string(),
            ));
        }

        let from = today
            .checked_sub_days(Days::new(u64::from(days) - 1))
            .ok_or_else(|| Error::ConfigError(format!("Cannot go back {} days", days)))?;

        Ok(DateRange {
            from: Some(from),
            to: today,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && date <= self.to
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.from {
            Some(from) => write!(f, "{} ~ {}", from, self.to),
            None => write!(f, "(no lower bound) ~ {}", self.to),
        }
    }
}

/// Decides which documents enter the analysis: primary posts only, optionally restricted
/// to a date window.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    date_range: Option<DateRange>,
}

impl DocumentFilter {
    /// A filter which only checks the post type.
    pub fn primary_posts() -> Self {
        DocumentFilter { date_range: None }
    }

    pub fn with_date_range(date_range: DateRange) -> Self {
        DocumentFilter {
            date_range: Some(date_range),
        }
    }

    pub fn date_range(&self) -> Option<&DateRange> {
        self.date_range.as_ref()
    }

    /// With a date window active, documents without a creation date are rejected.
    pub fn accepts(&self, document: &Document) -> bool {
        if !document.is_primary() {
            return false;
        }

        match &self.date_range {
            None => true,
            Some(date_range) => document
                .created_date()
                .map_or(false, |created_date| date_range.contains(created_date)),
        }
    }
}
