//! The event model.
//!
//! An [`Event`] is one of three closed variants that share a description and a
//! [`Category`] but differ in how their date is known:
//!
//! - [`SingularEvent`]: a one-time historical occurrence with a full date
//! - [`AnnualEvent`]: a yearless observance that recurs every year
//! - [`RuleBasedEvent`]: a date computed per year from a [`VerbalRule`]
//!
//! Every variant can project a [`MonthDay`] for a given year, which is what
//! date queries compare against.

use crate::category::Category;
use crate::error::Result;
use crate::month_day::MonthDay;
use crate::rule::VerbalRule;
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// A one-time occurrence, e.g. a software release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingularEvent {
    date: NaiveDate,
    description: String,
    category: Category,
}

impl SingularEvent {
    /// Create a singular event.
    #[must_use]
    pub fn new(date: NaiveDate, description: impl Into<String>, category: Category) -> Self {
        Self {
            date,
            description: description.into(),
            category,
        }
    }

    /// The full date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// The year of the occurrence.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// The month-day projection of the date.
    #[must_use]
    pub fn month_day(&self) -> MonthDay {
        MonthDay::from_date(self.date)
    }

    /// Event description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Event category.
    #[must_use]
    pub const fn category(&self) -> &Category {
        &self.category
    }
}

/// An observance on the same month-day every year.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnualEvent {
    month_day: MonthDay,
    description: String,
    category: Category,
}

impl AnnualEvent {
    /// Create an annual event.
    #[must_use]
    pub fn new(month_day: MonthDay, description: impl Into<String>, category: Category) -> Self {
        Self {
            month_day,
            description: description.into(),
            category,
        }
    }

    /// The recurring month-day.
    #[must_use]
    pub const fn month_day(&self) -> MonthDay {
        self.month_day
    }

    /// Event description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Event category.
    #[must_use]
    pub const fn category(&self) -> &Category {
        &self.category
    }
}

/// An observance whose date follows a rule, e.g. "fourth thursday in november".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleBasedEvent {
    rule: VerbalRule,
    description: String,
    category: Category,
}

impl RuleBasedEvent {
    /// Create a rule-based event.
    #[must_use]
    pub fn new(rule: VerbalRule, description: impl Into<String>, category: Category) -> Self {
        Self {
            rule,
            description: description.into(),
            category,
        }
    }

    /// The rule that places this event in a year.
    #[must_use]
    pub const fn rule(&self) -> &VerbalRule {
        &self.rule
    }

    /// The date of this event in `year`.
    ///
    /// # Errors
    ///
    /// Propagates [`EventError::OrdinalOutOfRange`](crate::error::EventError::OrdinalOutOfRange)
    /// from the rule.
    pub fn date_in(&self, year: i32) -> Result<NaiveDate> {
        self.rule.resolve(year)
    }

    /// Event description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Event category.
    #[must_use]
    pub const fn category(&self) -> &Category {
        &self.category
    }
}

/// Any event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Dated, one-time occurrence.
    Singular(SingularEvent),
    /// Yearless, recurring observance.
    Annual(AnnualEvent),
    /// Observance computed from a verbal rule.
    RuleBased(RuleBasedEvent),
}

/// Where an event lies relative to a reference day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TodayRelation {
    /// Strictly before the reference day.
    BeforeToday,
    /// On the reference day.
    Today,
    /// Strictly after the reference day.
    AfterToday,
}

impl TodayRelation {
    /// The relation implied by a signed day difference.
    #[must_use]
    pub const fn from_difference(days: i64) -> Self {
        match days {
            d if d < 0 => Self::BeforeToday,
            0 => Self::Today,
            _ => Self::AfterToday,
        }
    }
}

impl Event {
    /// Event description.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Singular(e) => e.description(),
            Self::Annual(e) => e.description(),
            Self::RuleBased(e) => e.description(),
        }
    }

    /// Event category.
    #[must_use]
    pub const fn category(&self) -> &Category {
        match self {
            Self::Singular(e) => e.category(),
            Self::Annual(e) => e.category(),
            Self::RuleBased(e) => e.category(),
        }
    }

    /// The month-day this event falls on in `year`.
    ///
    /// Singular and annual events ignore `year`; rule-based events are resolved
    /// against it.
    ///
    /// # Errors
    ///
    /// Fails only for rule-based events whose rule has no date in `year`.
    pub fn month_day_in(&self, year: i32) -> Result<MonthDay> {
        match self {
            Self::Singular(e) => Ok(e.month_day()),
            Self::Annual(e) => Ok(e.month_day()),
            Self::RuleBased(e) => e.date_in(year).map(MonthDay::from_date),
        }
    }

    /// Whether this event falls on `month_day`, resolving rules in `year`.
    ///
    /// A rule without a date in `year` never matches.
    #[must_use]
    pub fn falls_on(&self, month_day: MonthDay, year: i32) -> bool {
        self.month_day_in(year).is_ok_and(|md| md == month_day)
    }

    /// The date this event is observed on in `year`.
    ///
    /// Singular events are moved to `year`. A February 29th falls back to the
    /// 28th in common years.
    ///
    /// # Errors
    ///
    /// Fails only for rule-based events whose rule has no date in `year`.
    pub fn occurrence_in(&self, year: i32) -> Result<NaiveDate> {
        let month_day = match self {
            Self::Singular(e) => e.month_day(),
            Self::Annual(e) => e.month_day(),
            Self::RuleBased(e) => return e.date_in(year),
        };
        Ok(month_day.in_year(year).unwrap_or_else(|| last_of_february(year)))
    }

    /// Signed number of days from `today` to this event.
    ///
    /// Singular events use their own date; the others use their occurrence in
    /// `today`'s year.
    ///
    /// # Errors
    ///
    /// Fails only for rule-based events whose rule has no date that year.
    pub fn today_difference(&self, today: NaiveDate) -> Result<i64> {
        let date = match self {
            Self::Singular(e) => e.date(),
            _ => self.occurrence_in(today.year())?,
        };
        Ok(date.signed_duration_since(today).num_days())
    }

    /// Whether this event is before, on, or after `today`.
    ///
    /// # Errors
    ///
    /// Fails only for rule-based events whose rule has no date that year.
    pub fn today_relation(&self, today: NaiveDate) -> Result<TodayRelation> {
        self.today_difference(today).map(TodayRelation::from_difference)
    }
}

fn last_of_february(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 2, 28).unwrap_or_default()
}

impl From<SingularEvent> for Event {
    fn from(event: SingularEvent) -> Self {
        Self::Singular(event)
    }
}

impl From<AnnualEvent> for Event {
    fn from(event: AnnualEvent) -> Self {
        Self::Annual(event)
    }
}

impl From<RuleBasedEvent> for Event {
    fn from(event: RuleBasedEvent) -> Self {
        Self::RuleBased(event)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Singular(e) => write!(f, "{}: {} ({})", e.date, e.description, e.category),
            Self::Annual(e) => write!(f, "{}: {} ({})", e.month_day, e.description, e.category),
            Self::RuleBased(e) => write!(f, "{}: {} ({})", e.rule, e.description, e.category),
        }
    }
}
