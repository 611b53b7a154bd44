//! The single entry point for turning raw records into events.
//!
//! Every provider builds its events through [`make_event`], so a date string
//! is classified the same way no matter where it was read from:
//!
//! 1. a full `YYYY-MM-DD` date becomes a [`SingularEvent`]
//! 2. a `--MM-DD` (or bare `MM-DD`) month-day becomes an [`AnnualEvent`]
//! 3. anything else is [`EventError::MalformedDate`]

use crate::category::Category;
use crate::error::{EventError, Result};
use crate::event::{AnnualEvent, Event, RuleBasedEvent, SingularEvent};
use crate::month_day::MonthDay;
use crate::rule::VerbalRule;
use chrono::NaiveDate;

/// A classified date string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventDate {
    /// `YYYY-MM-DD`
    Full(NaiveDate),
    /// `--MM-DD`
    Yearless(MonthDay),
}

impl EventDate {
    /// Classify a date string.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::MalformedDate`] if the string is neither form.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if let Some(date) = parse_full_date(text) {
            return Ok(Self::Full(date));
        }
        MonthDay::parse(text)
            .map(Self::Yearless)
            .map_err(|_| EventError::MalformedDate(text.to_string()))
    }

    /// The canonical storage form: `YYYY-MM-DD` or `--MM-DD`.
    #[must_use]
    pub fn to_storage_string(self) -> String {
        match self {
            Self::Full(date) => date.format("%Y-%m-%d").to_string(),
            Self::Yearless(month_day) => month_day.to_string(),
        }
    }
}

/// Strict `YYYY-MM-DD`: four-digit year, two-digit month and day.
fn parse_full_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Build an event from a date string, description and category string.
///
/// # Errors
///
/// Returns [`EventError::MalformedDate`] for an unclassifiable date and
/// [`EventError::MalformedCategory`] for a bad category.
///
/// # Examples
///
/// ```
/// use today_core::event::Event;
/// use today_core::factory::make_event;
///
/// let release = make_event("2024-09-16", "macOS 15 Sequoia released", "apple/macos").unwrap();
/// assert!(matches!(release, Event::Singular(_)));
///
/// let eve = make_event("--12-24", "Christmas Eve", "holiday").unwrap();
/// assert!(matches!(eve, Event::Annual(_)));
///
/// assert!(make_event("tomorrow", "?", "misc").is_err());
/// ```
pub fn make_event(date: &str, description: &str, category: &str) -> Result<Event> {
    let category = Category::parse(category)?;
    make_event_with_category(date, description, category)
}

/// Like [`make_event`] for callers that already hold a parsed [`Category`].
///
/// # Errors
///
/// Returns [`EventError::MalformedDate`] for an unclassifiable date.
pub fn make_event_with_category(date: &str, description: &str, category: Category) -> Result<Event> {
    let description = description.trim();
    Ok(match EventDate::parse(date)? {
        EventDate::Full(date) => SingularEvent::new(date, description, category).into(),
        EventDate::Yearless(month_day) => AnnualEvent::new(month_day, description, category).into(),
    })
}

/// Build a rule-based event from a rule phrase.
///
/// # Errors
///
/// Returns [`EventError::UnparsableRule`] or [`EventError::MalformedCategory`].
pub fn make_rule_event(rule: &str, description: &str, category: &str) -> Result<Event> {
    let rule = VerbalRule::parse(rule)?;
    let category = Category::parse(category)?;
    Ok(RuleBasedEvent::new(rule, description.trim(), category).into())
}

/// The storage form of an event's date, `None` for rule-based events.
#[must_use]
pub fn storage_date(event: &Event) -> Option<String> {
    let date = match event {
        Event::Singular(e) => EventDate::Full(e.date()),
        Event::Annual(e) => EventDate::Yearless(e.month_day()),
        Event::RuleBased(_) => return None,
    };
    Some(date.to_storage_string())
}
