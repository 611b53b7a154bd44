//! Yearless calendar dates.

use crate::error::{EventError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest possible length of each month; February allows the 29th.
const MAX_DAYS: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A month and day without a year, e.g. `--12-24`.
///
/// Ordering is by month, then day.
///
/// # Examples
///
/// ```
/// use today_core::month_day::MonthDay;
///
/// let christmas_eve: MonthDay = "--12-24".parse().unwrap();
/// assert_eq!(christmas_eve, MonthDay::new(12, 24).unwrap());
/// assert_eq!(christmas_eve.to_string(), "--12-24");
/// assert_eq!(christmas_eve.query_param(), "12-24");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// Create a month-day, validating it against the longest month length.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::MalformedDate`] for a month outside `1..=12` or a
    /// day that month can never have.
    pub fn new(month: u32, day: u32) -> Result<Self> {
        let valid = (1..=12).contains(&month) && day >= 1 && day <= MAX_DAYS[month as usize - 1];
        if valid {
            Ok(Self { month, day })
        } else {
            Err(EventError::MalformedDate(format!("--{month:02}-{day:02}")))
        }
    }

    /// Month-day projection of a full date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    /// Parse `--MM-DD` or `MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::MalformedDate`] if the text is not two-digit month
    /// and day fields or names an impossible date.
    pub fn parse(text: &str) -> Result<Self> {
        let malformed = || EventError::MalformedDate(text.to_string());
        let trimmed = text.trim();
        let body = trimmed.strip_prefix("--").unwrap_or(trimmed);

        let (month, day) = body.split_once('-').ok_or_else(malformed)?;
        let month = two_digits(month).ok_or_else(malformed)?;
        let day = two_digits(day).ok_or_else(malformed)?;

        Self::new(month, day).map_err(|_| malformed())
    }

    /// Month, `1..=12`.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// Day of month.
    #[must_use]
    pub const fn day(self) -> u32 {
        self.day
    }

    /// The `MM-DD` form used in remote queries.
    #[must_use]
    pub fn query_param(self) -> String {
        format!("{:02}-{:02}", self.month, self.day)
    }

    /// This month-day in the given year.
    ///
    /// `None` for February 29th in a non-leap year.
    #[must_use]
    pub fn in_year(self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }

    /// Whether the date falls on this month-day, ignoring its year.
    #[must_use]
    pub fn is_on(self, date: NaiveDate) -> bool {
        Self::from_date(date) == self
    }
}

fn two_digits(field: &str) -> Option<u32> {
    if field.len() == 2 && field.bytes().all(|b| b.is_ascii_digit()) {
        field.parse().ok()
    } else {
        None
    }
}

impl FromStr for MonthDay {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MonthDay {
    type Error = EventError;

    fn try_from(text: String) -> Result<Self> {
        Self::parse(&text)
    }
}

impl From<MonthDay> for String {
    fn from(value: MonthDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{:02}-{:02}", self.month, self.day)
    }
}
